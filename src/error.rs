use thiserror::Error;

/// Represents errors that can occur while generating test certificate material.
///
/// The two variants separate caller programming errors from failures reported
/// by the underlying crypto stack, so callers can tell "bad usage" apart from
/// "the provider broke."
#[derive(Debug, Error, Clone)]
pub enum CertsmithError {
    /// Malformed or contradictory input: empty spec list without a root
    /// authority, a partially present issuer, an unknown subject field or
    /// extension expression.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The crypto provider reported an error during key generation, signing,
    /// or encoding/decoding. Carries the failing operation and the provider's
    /// error text.
    #[error("Certificate/key generation failed in {op}: {detail}")]
    Provider {
        /// The operation that failed, e.g. `"encode certificate PEM"`.
        op: &'static str,
        /// The provider's underlying error message.
        detail: String,
    },
}

impl CertsmithError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CertsmithError::InvalidInput(msg.into())
    }

    pub(crate) fn provider(op: &'static str, err: impl std::fmt::Display) -> Self {
        let detail = err.to_string();
        tracing::warn!(op, error = %detail, "TLS key or certificate generation failed");
        CertsmithError::Provider { op, detail }
    }
}
