/// Broad error categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A length, strength or configuration value does not fit the construction.
    Configuration,
    /// The generator is in the wrong lifecycle state for the call.
    State,
    /// A per-request limit was exceeded.
    LimitExceeded,
    /// The entropy collaborator could not deliver.
    Entropy,
    /// An underlying digest, MAC or cipher adapter failed or was misused.
    Primitive,
}

/// DRBG operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrbgError {
    // Configuration errors
    #[error("invalid {what} length: expected {expected}, got {got}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("insufficient entropy: need {need} bits, got {got}")]
    InsufficientEntropy { need: usize, got: usize },
    #[error("security strength {requested} not supported (max {max})")]
    UnsupportedStrength { requested: u32, max: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("no entropy source attached")]
    NoEntropySource,

    // State errors
    #[error("drbg: not instantiated")]
    NotInstantiated,
    #[error("drbg: already instantiated")]
    AlreadyInstantiated,
    #[error("drbg: reseed required (counter {counter}, interval {interval})")]
    ReseedRequired { counter: u64, interval: u64 },

    // Limit errors
    #[error("drbg: request of {requested} bytes exceeds limit of {max}")]
    RequestTooLarge { requested: usize, max: usize },

    // Entropy errors
    #[error("entropy exhausted: requested {requested} bytes, {remaining} remaining")]
    EntropyExhausted { requested: usize, remaining: usize },
    #[error("entropy source failure: {0}")]
    EntropyFailure(String),

    // Primitive errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },
    #[error("{0}: not initialized")]
    PrimitiveNotInitialized(&'static str),
    #[error("self-test failed: {0}")]
    SelfTestFailed(String),
}

impl DrbgError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength { .. }
            | Self::InsufficientEntropy { .. }
            | Self::UnsupportedStrength { .. }
            | Self::InvalidConfig(_)
            | Self::NoEntropySource => ErrorKind::Configuration,
            Self::NotInstantiated | Self::AlreadyInstantiated | Self::ReseedRequired { .. } => {
                ErrorKind::State
            }
            Self::RequestTooLarge { .. } => ErrorKind::LimitExceeded,
            Self::EntropyExhausted { .. } | Self::EntropyFailure(_) => ErrorKind::Entropy,
            Self::BufferTooSmall { .. }
            | Self::PrimitiveNotInitialized(_)
            | Self::SelfTestFailed(_) => ErrorKind::Primitive,
        }
    }
}
