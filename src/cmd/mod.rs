//! CLI command implementations for bootcheck.

pub mod check;
pub mod doctor;
pub mod migrate;
