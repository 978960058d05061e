#![forbid(unsafe_code)]
//! Deterministic random bit generators per NIST SP 800-90A, plus the
//! legacy ANSI X9.31 cipher DRBG.
//!
//! A generator is a [`Drbg`] driving one [`Mechanism`]: [`HashDrbg`],
//! [`HmacDrbg`], [`CtrDrbg`] or [`X931Drbg`]. Each mechanism owns a
//! primitive adapter ([`provider`] traits, RustCrypto-backed
//! implementations in [`primitives`]). Entropy comes from an
//! [`EntropySourceProvider`](entropy::EntropySourceProvider).
//!
//! ```
//! use sp800_drbg::primitives::Sha256Digest;
//! use sp800_drbg::{Drbg, DrbgConfig, HashDrbg};
//!
//! let mut drbg = Drbg::new(HashDrbg::new(Sha256Digest::new()), DrbgConfig::default()).unwrap();
//! drbg.instantiate(&[0x42; 32], b"nonce", b"app v1").unwrap();
//! let bytes = drbg.generate_bytes(64).unwrap();
//! assert_eq!(bytes.len(), 64);
//! ```

pub mod df;
pub mod drbg;
pub mod entropy;
pub mod primitives;
pub mod provider;
pub mod selftest;

pub use drbg::{
    CtrDrbg, Drbg, DrbgConfig, DrbgLimits, DrbgState, GenerateRequest, HashDrbg, HmacDrbg,
    Mechanism, X931Drbg,
};
pub use entropy::{
    CallbackEntropyProvider, EntropyRequest, EntropySource, EntropySourceProvider,
    FixedEntropyProvider,
};
pub use sp800_types::{DrbgAlgorithm, DrbgError, ErrorKind};
