//! Domain types for the ludoka game-library backend.
//!
//! This crate defines users, games, and library entries without any
//! database dependencies, plus the password digest shared by every
//! frontend. Persistence lives in `ludoka-db`.

pub mod error;
pub mod security;
pub mod types;

pub use error::ValidationError;
pub use security::{hash_password, validate_password, verify_password};
pub use types::*;
