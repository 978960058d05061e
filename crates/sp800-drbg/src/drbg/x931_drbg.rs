//! ANSI X9.31 Appendix A.2.4 cipher DRBG.
//!
//! Legacy construction kept for known-answer compatibility. The cipher key
//! is fixed at construction and never re-derived; seeding only replaces the
//! one-block seed vector `V`, and the date/time vector `DT` is supplied as
//! the instantiate nonce and advanced as a counter after every block.

use super::counter::increment;
use super::generator::{DrbgLimits, Mechanism};
use crate::provider::BlockCipher;
use sp800_types::{DrbgAlgorithm, DrbgError};
use zeroize::{Zeroize, Zeroizing};

/// Reseed interval with a 128-bit block cipher.
const RESEED_INTERVAL: u64 = 1 << 23;
/// Largest request with a 128-bit block cipher (2^18 bits).
const MAX_REQUEST_LEN: usize = 1 << 15;

/// Reseed interval with a 64-bit block cipher.
const RESEED_INTERVAL_64: u64 = 1 << 15;
/// Largest request with a 64-bit block cipher (2^12 bits).
const MAX_REQUEST_LEN_64: usize = 1 << 9;

pub struct X931Drbg<C: BlockCipher> {
    cipher: C,
    key_bits: u32,
    /// Seed vector V (one block).
    v: Vec<u8>,
    /// Date/time vector DT (one block).
    dt: Vec<u8>,
}

impl<C: BlockCipher> Drop for X931Drbg<C> {
    fn drop(&mut self) {
        self.v.zeroize();
        self.dt.zeroize();
    }
}

impl<C: BlockCipher> X931Drbg<C> {
    /// Key the cipher for the lifetime of the generator.
    pub fn new(mut cipher: C, key: &[u8]) -> Result<Self, DrbgError> {
        cipher.init(true, key)?;
        Ok(X931Drbg {
            cipher,
            key_bits: (key.len() * 8) as u32,
            v: Vec::new(),
            dt: Vec::new(),
        })
    }

    fn check_block(&self, what: &'static str, input: &[u8]) -> Result<(), DrbgError> {
        let block_len = self.cipher.block_size();
        if input.len() != block_len {
            return Err(DrbgError::InvalidLength {
                what,
                expected: block_len,
                got: input.len(),
            });
        }
        Ok(())
    }
}

fn reject_additional_input(additional_input: &[u8]) -> Result<(), DrbgError> {
    if !additional_input.is_empty() {
        return Err(DrbgError::InvalidConfig(
            "X9.31 does not take additional input",
        ));
    }
    Ok(())
}

impl<C: BlockCipher> Mechanism for X931Drbg<C> {
    fn algorithm(&self) -> DrbgAlgorithm {
        DrbgAlgorithm::X931
    }

    fn seed_len(&self) -> usize {
        self.cipher.block_size()
    }

    fn max_security_strength(&self) -> u32 {
        self.key_bits.min((self.cipher.block_size() * 8) as u32)
    }

    fn default_limits(&self) -> DrbgLimits {
        if self.cipher.block_size() == 8 {
            DrbgLimits {
                max_request_len: MAX_REQUEST_LEN_64,
                reseed_interval: RESEED_INTERVAL_64,
            }
        } else {
            DrbgLimits {
                max_request_len: MAX_REQUEST_LEN,
                reseed_interval: RESEED_INTERVAL,
            }
        }
    }

    fn min_entropy_len(&self, _security_strength: u32) -> usize {
        self.cipher.block_size()
    }

    /// `nonce` is the initial DT.
    fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        self.check_block("entropy input", entropy)?;
        self.check_block("date/time vector", nonce)?;
        if !personalization.is_empty() {
            return Err(DrbgError::InvalidConfig(
                "X9.31 does not take a personalization string",
            ));
        }

        self.v.zeroize();
        self.v.extend_from_slice(entropy);
        self.dt.zeroize();
        self.dt.extend_from_slice(nonce);
        Ok(())
    }

    fn reseed(&mut self, entropy: &[u8], additional_input: &[u8]) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        self.check_block("entropy input", entropy)?;
        reject_additional_input(additional_input)?;
        self.v.copy_from_slice(entropy);
        Ok(())
    }

    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: &[u8],
        _reseed_counter: u64,
    ) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        reject_additional_input(additional_input)?;

        let block_len = self.v.len();
        let mut i = Zeroizing::new(vec![0u8; block_len]);
        let mut r = Zeroizing::new(vec![0u8; block_len]);
        let mut x = Zeroizing::new(vec![0u8; block_len]);

        // A trailing partial block still runs a full iteration
        for chunk in output.chunks_mut(block_len) {
            // I = E(K, DT)
            self.cipher.process_block(&self.dt, &mut i)?;
            // R = E(K, I ^ V)
            for (dst, (a, b)) in x.iter_mut().zip(i.iter().zip(self.v.iter())) {
                *dst = a ^ b;
            }
            self.cipher.process_block(&x, &mut r)?;
            // V = E(K, R ^ I)
            for (dst, (a, b)) in x.iter_mut().zip(r.iter().zip(i.iter())) {
                *dst = a ^ b;
            }
            self.cipher.process_block(&x, &mut self.v)?;

            chunk.copy_from_slice(&r[..chunk.len()]);
            increment(&mut self.dt);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.v.zeroize();
        self.dt.zeroize();
    }
}
