use thiserror::Error;

/// Main error type for bootcheck.
///
/// Preflight failures are kept apart from every other variant: they carry a
/// short operator-facing message and nothing else, while data-access errors
/// keep their full source so the migration caller can report them.
#[derive(Debug, Error)]
pub enum Error {
   /// A startup precondition was not met.
   #[error(transparent)]
   Preflight(#[from] PreflightError),

   /// SQLite failure during a select or an update. Propagated unmodified.
   #[error("sqlite error: {0}")]
   Sqlite(#[from] rusqlite::Error),

   /// Configuration-related error occurred.
   #[error("config error: {0}")]
   Config(#[from] ConfigError),

   /// JSON serialization error occurred.
   #[error("json error: {0}")]
   Json(#[from] serde_json::Error),

   /// A data change could not be set up or run.
   #[error("migration {name} failed: {reason}")]
   Migration { name: &'static str, reason: String },
}

impl Error {
   pub fn exit_code(&self) -> i32 {
      match self {
         Self::Preflight(_) => 2,
         Self::Sqlite(_) | Self::Migration { .. } => 3,
         _ => 1,
      }
   }
}

/// A failed preflight check.
///
/// Carries only the human-readable message. There is no source chain and no
/// captured backtrace; the message is what the operator sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PreflightError {
   message: String,
}

impl PreflightError {
   pub fn new(message: impl Into<String>) -> Self {
      Self { message: message.into() }
   }

   pub fn message(&self) -> &str {
      &self.message
   }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
   /// The layered configuration could not be extracted.
   #[error("failed to load config: {0}")]
   Load(#[source] Box<figment::Error>),

   /// Config values are present but unusable.
   #[error("invalid config: {0}")]
   Invalid(String),

   /// A `NAME=VALUE` command-line option could not be parsed.
   #[error("invalid option '{0}': expected NAME=VALUE")]
   InvalidOptionArg(String),
}

impl From<figment::Error> for ConfigError {
   fn from(e: figment::Error) -> Self {
      Self::Load(Box::new(e))
   }
}

/// Standard result type using [`enum@Error`] as the default error type
pub type Result<T, E = Error> = std::result::Result<T, E>;
