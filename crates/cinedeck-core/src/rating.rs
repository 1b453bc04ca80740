//! Rating aggregation.

use crate::error::OrchestrationError;

/// Arithmetic mean of `ratings`.
///
/// # Errors
///
/// Returns [`OrchestrationError::NoRatings`] for an empty slice.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn average(ratings: &[f64]) -> Result<f64, OrchestrationError> {
    if ratings.is_empty() {
        return Err(OrchestrationError::NoRatings);
    }
    let sum: f64 = ratings.iter().sum();
    Ok(sum / ratings.len() as f64)
}
