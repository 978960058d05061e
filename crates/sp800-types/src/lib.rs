#![forbid(unsafe_code)]
#![doc = "Common error codes and algorithm identifiers for the SP 800-90A DRBG workspace."]

pub mod algorithm;
pub mod error;

pub use algorithm::*;
pub use error::*;
