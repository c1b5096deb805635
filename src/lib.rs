//! Startup preflight checks and one-shot cleanup migrations for a key-value
//! properties store.

pub mod cmd;
pub mod config;
pub mod error;
pub mod migrate;
pub mod preflight;
pub mod store;

pub use error::{Error, PreflightError, Result};
