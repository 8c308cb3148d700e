use thiserror::Error;

/// Errors from [`crate::CostModel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    /// A transit step lacked a field needed to price it.
    ///
    /// Only raised when the fare table uses
    /// [`crate::MalformedStepPolicy::Reject`].
    #[error("transit step is missing {missing}")]
    MalformedStep {
        /// Name of the missing field.
        missing: &'static str,
    },
}
