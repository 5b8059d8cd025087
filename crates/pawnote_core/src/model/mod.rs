//! Canonical domain model for the ownership graph and companion pet.
//!
//! # Responsibility
//! - Define the record types shared by services and the persistence port.
//! - Keep the parent→child reference lists and their pure operations here.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId`.
//! - Child-list mutation helpers are idempotent.

pub mod entity;
