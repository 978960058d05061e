//! CTR-DRBG (Counter-mode Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.2 over any [`BlockCipher`].
//! Supports both direct instantiation (without derivation function), where
//! entropy is exactly seedlen bytes and inputs are XORed in, and
//! instantiation with Block_Cipher_df for arbitrary-length inputs.

use super::counter::increment;
use super::generator::{DrbgLimits, Mechanism};
use crate::df::block_cipher_df;
use crate::provider::BlockCipher;
use sp800_types::{DrbgAlgorithm, DrbgError};
use zeroize::{Zeroize, Zeroizing};

/// Reseed interval with a 128-bit block cipher.
const RESEED_INTERVAL: u64 = 1 << 48;
/// Largest request with a 128-bit block cipher (2^19 bits).
const MAX_REQUEST_LEN: usize = 1 << 16;

/// Reseed interval with a 64-bit block cipher (TDEA).
const RESEED_INTERVAL_64: u64 = 1 << 32;
/// Largest request with a 64-bit block cipher (2^13 bits).
const MAX_REQUEST_LEN_64: usize = 1 << 10;

/// CTR-DRBG state (NIST SP 800-90A Section 10.2.1.1).
pub struct CtrDrbg<C: BlockCipher> {
    cipher: C,
    /// Cipher key (keylen bytes).
    key: Vec<u8>,
    /// Counter block V (blocklen bytes).
    v: Vec<u8>,
    use_df: bool,
}

impl<C: BlockCipher> Drop for CtrDrbg<C> {
    fn drop(&mut self) {
        self.key.zeroize();
        self.v.zeroize();
    }
}

impl<C: BlockCipher> CtrDrbg<C> {
    /// CTR-DRBG without derivation function (SP 800-90A §10.2.1.3.1).
    ///
    /// Entropy input must be exactly `seed_len()` bytes; personalization
    /// and additional input may be at most `seed_len()` bytes. The nonce is
    /// not used.
    pub fn new(cipher: C) -> Self {
        CtrDrbg {
            cipher,
            key: Vec::new(),
            v: Vec::new(),
            use_df: false,
        }
    }

    /// CTR-DRBG with Block_Cipher_df (SP 800-90A §10.2.1.3.2).
    pub fn with_df(cipher: C) -> Self {
        CtrDrbg {
            cipher,
            key: Vec::new(),
            v: Vec::new(),
            use_df: true,
        }
    }

    pub fn uses_df(&self) -> bool {
        self.use_df
    }

    fn check_input(&self, what: &'static str, input: &[u8]) -> Result<(), DrbgError> {
        let seed_len = self.seed_len();
        if !self.use_df && input.len() > seed_len {
            return Err(DrbgError::InvalidLength {
                what,
                expected: seed_len,
                got: input.len(),
            });
        }
        Ok(())
    }

    /// Seed material for instantiate / reseed: `df(inputs)` with a
    /// derivation function, `entropy XOR pad(extra)` without.
    fn seed_material(
        &mut self,
        entropy: &[u8],
        df_inputs: &[&[u8]],
        extra: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, DrbgError> {
        let seed_len = self.seed_len();
        if self.use_df {
            return block_cipher_df(&mut self.cipher, df_inputs, seed_len);
        }
        let mut seed = Zeroizing::new(entropy.to_vec());
        for (s, e) in seed.iter_mut().zip(extra) {
            *s ^= e;
        }
        Ok(seed)
    }

    /// CTR_DRBG_Update (SP 800-90A §10.2.1.2). A `provided` shorter than
    /// seedlen is treated as zero-padded.
    fn update(&mut self, provided: &[u8]) -> Result<(), DrbgError> {
        let key_len = self.key.len();
        let block_len = self.v.len();
        let seed_len = key_len + block_len;

        self.cipher.init(true, &self.key)?;
        let mut temp = Zeroizing::new(Vec::with_capacity(seed_len + block_len));
        let mut block = Zeroizing::new(vec![0u8; block_len]);
        while temp.len() < seed_len {
            increment(&mut self.v);
            self.cipher.process_block(&self.v, &mut block)?;
            temp.extend_from_slice(&block);
        }
        temp.truncate(seed_len);
        for (t, p) in temp.iter_mut().zip(provided) {
            *t ^= p;
        }

        self.key.copy_from_slice(&temp[..key_len]);
        self.v.copy_from_slice(&temp[key_len..]);
        self.cipher.init(true, &self.key)
    }
}

impl<C: BlockCipher> Mechanism for CtrDrbg<C> {
    fn algorithm(&self) -> DrbgAlgorithm {
        DrbgAlgorithm::Ctr
    }

    fn seed_len(&self) -> usize {
        self.cipher.key_size() + self.cipher.block_size()
    }

    fn max_security_strength(&self) -> u32 {
        if self.cipher.block_size() == 8 {
            112
        } else {
            (self.cipher.key_size() * 8) as u32
        }
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

    fn min_entropy_len(&self, security_strength: u32) -> usize {
        if self.use_df {
            (security_strength as usize).div_ceil(8)
        } else {
            self.seed_len()
        }
    }

    /// SP 800-90A §10.2.1.3.
    fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        let seed_len = self.seed_len();
        if !self.use_df && entropy.len() != seed_len {
            return Err(DrbgError::InvalidLength {
                what: "entropy input",
                expected: seed_len,
                got: entropy.len(),
            });
        }
        self.check_input("personalization string", personalization)?;

        let seed = self.seed_material(entropy, &[entropy, nonce, personalization], personalization)?;

        self.key.zeroize();
        self.key.resize(self.cipher.key_size(), 0);
        self.v.zeroize();
        self.v.resize(self.cipher.block_size(), 0);
        self.update(&seed)
    }

    /// SP 800-90A §10.2.1.4.
    fn reseed(&mut self, entropy: &[u8], additional_input: &[u8]) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        let seed_len = self.seed_len();
        if !self.use_df && entropy.len() != seed_len {
            return Err(DrbgError::InvalidLength {
                what: "entropy input",
                expected: seed_len,
                got: entropy.len(),
            });
        }
        self.check_input("additional input", additional_input)?;

        let seed = self.seed_material(entropy, &[entropy, additional_input], additional_input)?;
        self.update(&seed)
    }

    /// SP 800-90A §10.2.1.5.
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: &[u8],
        _reseed_counter: u64,
    ) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        self.check_input("additional input", additional_input)?;

        let seed_len = self.seed_len();
        let derived;
        let additional_input: &[u8] = if self.use_df && !additional_input.is_empty() {
            derived = block_cipher_df(&mut self.cipher, &[additional_input], seed_len)?;
            &derived
        } else {
            additional_input
        };
        if !additional_input.is_empty() {
            self.update(additional_input)?;
        } else {
            self.cipher.init(true, &self.key)?;
        }

        let mut block = Zeroizing::new(vec![0u8; self.v.len()]);
        for chunk in output.chunks_mut(self.v.len()) {
            increment(&mut self.v);
            self.cipher.process_block(&self.v, &mut block)?;
            chunk.copy_from_slice(&block[..chunk.len()]);
        }

        self.update(additional_input)
    }

    fn clear(&mut self) {
        self.key.zeroize();
        self.v.zeroize();
        self.cipher.clear();
    }
}
