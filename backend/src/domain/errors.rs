//! Typed errors raised by the domain services.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-level validation problems accumulated over a single pass.
///
/// Services record every problem they find before raising, so the caller
/// always sees the full picture rather than the first failing field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded against a field, if any.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Names of the fields that have problems.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

/// Errors surfaced by the child and guardian services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("form validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// Raised when a guardian-set replacement names ids that do not resolve.
    /// Carries the unresolved ids so the caller can report them.
    #[error("guardian ids do not resolve: {missing:?}")]
    GuardianNotExisting { missing: Vec<i64> },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
