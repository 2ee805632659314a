//! Widget error types

use thiserror::Error;

use crate::types::Orientation;
use crate::view::ViewId;

/// Errors raised while configuring or driving the widget
///
/// Every variant is a configuration-time correctness failure. None of them
/// are retried or swallowed; they propagate to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EfabError {
    /// An operation that needs the parent layout was used before attachment
    #[error("{0} must be a child of an ExpandableFabLayout")]
    Configuration(String),

    /// A numeric optional property was given a negative or non-finite value
    #[error("illegal value for {property}: {value}")]
    IllegalArgument { property: &'static str, value: f64 },

    /// A second main button was added for an orientation that already has one
    #[error("an ExpandableFab is already set for the {0} orientation")]
    DuplicateConfiguration(Orientation),

    /// The layout does not know the view
    #[error("view {0:?} is not part of this layout")]
    UnknownView(ViewId),
}

impl EfabError {
    /// Shorthand for a configuration error naming the unattached component
    pub fn not_attached(component: impl Into<String>) -> Self {
        EfabError::Configuration(component.into())
    }
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, EfabError>;

/// Fail with [`EfabError::IllegalArgument`] when `value` is negative or not finite
pub fn non_negative(property: &'static str, value: f64) -> Result<()> {
    finite(property, value)?;
    if value < 0.0 {
        return Err(EfabError::IllegalArgument { property, value });
    }
    Ok(())
}

/// Fail with [`EfabError::IllegalArgument`] when `value` is NaN or infinite
pub fn finite(property: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EfabError::IllegalArgument { property, value });
    }
    Ok(())
}
