//! Deterministic Random Bit Generators.
//!
//! Four constructions behind one [`Mechanism`] trait, driven by [`Drbg`]:
//! - Hash-DRBG (SP 800-90A Section 10.1.1)
//! - HMAC-DRBG (SP 800-90A Section 10.1.2)
//! - CTR-DRBG, with or without Block_Cipher_df (SP 800-90A Section 10.2)
//! - the ANSI X9.31 cipher DRBG

mod counter;

pub mod generator;
pub use generator::{Drbg, DrbgConfig, DrbgLimits, DrbgState, GenerateRequest, Mechanism};

pub mod hash_drbg;
pub use hash_drbg::HashDrbg;

mod hmac_drbg;
pub use hmac_drbg::HmacDrbg;

pub mod ctr_drbg;
pub use ctr_drbg::CtrDrbg;

mod x931_drbg;
pub use x931_drbg::X931Drbg;
