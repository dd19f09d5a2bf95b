/// Errors raised when building a heightfield from caller-supplied data.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("heightfield size must be at least 1")]
    EmptyField,

    #[error("heightfield scale must be finite and positive, got {0}")]
    InvalidScale(f64),

    #[error("sample count mismatch: expected {expected} ({size}x{size}), got {actual}")]
    SampleCountMismatch {
        size: u32,
        expected: usize,
        actual: usize,
    },
}
