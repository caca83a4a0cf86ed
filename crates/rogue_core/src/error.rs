//! # ECS Error Types
//!
//! Every error here is a wiring bug between modules. The panicking entry
//! points on [`EntityDb`](crate::EntityDb) format these through `Display`.

use thiserror::Error;

/// Configuration errors raised by the entity database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component name was used before being registered.
    #[error("no manager registered for component '{0}'")]
    UnknownComponent(String),

    /// A component name was registered twice.
    #[error("component '{0}' is already registered")]
    DuplicateComponent(String),

    /// Typed access used a different Rust type than the registration.
    #[error("component '{name}' is registered as {registered}, not {requested}")]
    TypeMismatch {
        /// The component name.
        name: String,
        /// The Rust type it was registered with.
        registered: &'static str,
        /// The Rust type the caller asked for.
        requested: &'static str,
    },
}

/// Result type for entity database operations.
pub type EcsResult<T> = Result<T, EcsError>;
