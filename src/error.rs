use thiserror::Error;

/// Error returned when parsing configuration values from strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The string does not name a [`Bc1ApproxMode`](crate::Bc1ApproxMode).
    #[error("unknown BC1 approximation mode `{0}` (expected ideal, nvidia, amd or ideal_round4)")]
    UnknownApproxMode(String),
    /// The string does not name a [`CompressionVariant`](crate::CompressionVariant).
    #[error("unknown compression variant `{0}` (expected bc1, bc3, bc4 or bc5)")]
    UnknownVariant(String),
}
