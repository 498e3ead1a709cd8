//! Domain error types.
//!
//! These errors represent validation failures for individual values
//! (identifiers, coordinates, clock times, weights). They are distinct
//! from load and search errors.

/// Domain-level errors for value validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// An identifier was empty or contained only whitespace
    #[error("invalid {kind} id: must not be empty")]
    EmptyId { kind: &'static str },

    /// Latitude or longitude out of range or not finite
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// A preference weight outside [0, 1]
    #[error("preference weight for {criterion} must be within [0, 1], got {weight}")]
    InvalidWeight { criterion: String, weight: f64 },

    /// A congestion factor that would not slow traffic down
    #[error("congestion factor must be a finite number greater than 1, got {0}")]
    InvalidFactor(f64),

    /// Route sequences that don't line up
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),
}
