use thiserror::Error;

/// Errors raised when validating user-supplied domain data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("{kind} name is too long: {len} characters (max {max})")]
    NameTooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Password does not meet the requirements (more than {min} characters)")]
    WeakPassword { min: usize },
}
