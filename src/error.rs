use thiserror::Error;

/// Crate-wide error type.
///
/// The simulation core only ever fails on invalid input; network and
/// configuration problems are confined to the assistant boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller passed parameters outside the documented domain.
    /// Fatal to the call - no partial results, no silent clamping.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The generative-AI call failed or returned data that does not
    /// match the expected schema.
    #[error("external service failure: {0}")]
    ExternalService(String),

    /// A required environment variable was absent at startup.
    #[error("missing configuration: {0} is not set")]
    MissingConfiguration(&'static str),
}
