//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate document-store calls into use-case level APIs.
//! - Keep transport/UI layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass the document port; all persistence goes through
//!   `DocumentStore`.

pub mod cascade_service;
pub mod graph_service;
pub mod pet_service;
pub mod workspace_service;
