//! Core data structures and errors for the TCD tide database decoder.
//!
//! This crate defines the domain types (constituents, stations) and the
//! error taxonomy shared by the rest of the tcdb workspace.

pub mod error;
pub mod types;
