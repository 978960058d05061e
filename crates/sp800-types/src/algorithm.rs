use std::fmt;

/// DRBG construction identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrbgAlgorithm {
    /// Hash_DRBG (SP 800-90A §10.1.1).
    Hash,
    /// HMAC_DRBG (SP 800-90A §10.1.2).
    Hmac,
    /// CTR_DRBG (SP 800-90A §10.2).
    Ctr,
    /// ANSI X9.31 Appendix A.2.4 block-cipher generator.
    X931,
}

impl DrbgAlgorithm {
    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hash => "Hash_DRBG",
            Self::Hmac => "HMAC_DRBG",
            Self::Ctr => "CTR_DRBG",
            Self::X931 => "X9.31",
        }
    }
}

impl fmt::Display for DrbgAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
