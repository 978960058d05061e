//! Hash-DRBG (Hash-based Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.1.1 over any [`Digest`] adapter.

use super::counter::{add_assign, add_u64, increment};
use super::generator::{DrbgLimits, Mechanism};
use crate::df::hash_df;
use crate::provider::Digest;
use sp800_types::{DrbgAlgorithm, DrbgError};
use zeroize::{Zeroize, Zeroizing};

/// Maximum number of generate requests before reseed is required.
const RESEED_INTERVAL: u64 = 1 << 48;

/// Maximum bytes per generate request (2^19 bits).
const MAX_REQUEST_LEN: usize = 1 << 16;

/// Seed length in bytes (SP 800-90A Table 2): 440 bits for digests of at
/// most 256 bits, 888 bits above.
pub(crate) fn seed_len_for(digest_size: usize) -> usize {
    if digest_size <= 32 {
        55
    } else {
        111
    }
}

/// Highest security strength in bits a digest of this size supports.
pub(crate) fn max_strength_for(digest_size: usize) -> u32 {
    match digest_size {
        s if s >= 32 => 256,
        s if s >= 28 => 192,
        s if s >= 20 => 128,
        s => (s * 4) as u32,
    }
}

/// Hash-DRBG state (SP 800-90A Section 10.1.1.1).
pub struct HashDrbg<D: Digest> {
    digest: D,
    /// State value V (seedLen bytes).
    v: Vec<u8>,
    /// Constant C (seedLen bytes).
    c: Vec<u8>,
    /// Seed length in bytes.
    seed_len: usize,
}

impl<D: Digest> Drop for HashDrbg<D> {
    fn drop(&mut self) {
        self.v.zeroize();
        self.c.zeroize();
    }
}

/// Hash(parts[0] || parts[1] || ..) into `out`.
fn hash<D: Digest>(digest: &mut D, parts: &[&[u8]], out: &mut [u8]) -> Result<(), DrbgError> {
    digest.reset();
    for part in parts {
        digest.update(part)?;
    }
    digest.finish(out)?;
    Ok(())
}

impl<D: Digest> HashDrbg<D> {
    /// Wrap a digest. The seed length is fixed here for the life of the value.
    pub fn new(digest: D) -> Self {
        let seed_len = seed_len_for(digest.digest_size());
        HashDrbg {
            digest,
            v: Vec::new(),
            c: Vec::new(),
            seed_len,
        }
    }

    /// V = seed; C = Hash_df(0x00 || V, seedlen).
    fn set_seed(&mut self, seed: Zeroizing<Vec<u8>>) -> Result<(), DrbgError> {
        let c = hash_df(&mut self.digest, &[&[0x00][..], &seed[..]], self.seed_len)?;
        self.v.zeroize();
        self.v.extend_from_slice(&seed);
        self.c.zeroize();
        self.c.extend_from_slice(&c);
        Ok(())
    }

    /// Hashgen (SP 800-90A §10.1.1.4).
    fn hashgen(&mut self, output: &mut [u8]) -> Result<(), DrbgError> {
        let hash_size = self.digest.digest_size();
        let mut data = Zeroizing::new(self.v.clone());
        let mut block = Zeroizing::new(vec![0u8; hash_size]);

        for chunk in output.chunks_mut(hash_size) {
            hash(&mut self.digest, &[&data[..]], &mut block)?;
            chunk.copy_from_slice(&block[..chunk.len()]);
            // data = (data + 1) mod 2^seedlen
            increment(&mut data);
        }
        Ok(())
    }
}

impl<D: Digest> Mechanism for HashDrbg<D> {
    fn algorithm(&self) -> DrbgAlgorithm {
        DrbgAlgorithm::Hash
    }

    fn seed_len(&self) -> usize {
        self.seed_len
    }

    fn max_security_strength(&self) -> u32 {
        max_strength_for(self.digest.digest_size())
    }

    fn default_limits(&self) -> DrbgLimits {
        DrbgLimits {
            max_request_len: MAX_REQUEST_LEN,
            reseed_interval: RESEED_INTERVAL,
        }
    }

    /// SP 800-90A §10.1.1.2.
    fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        // V = Hash_df(entropy_input || nonce || personalization_string, seedlen)
        let seed = hash_df(
            &mut self.digest,
            &[entropy, nonce, personalization],
            self.seed_len,
        )?;
        self.set_seed(seed)
    }

    /// SP 800-90A §10.1.1.3.
    fn reseed(&mut self, entropy: &[u8], additional_input: &[u8]) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        // V = Hash_df(0x01 || V || entropy_input || additional_input, seedlen)
        let seed = hash_df(
            &mut self.digest,
            &[&[0x01][..], &self.v[..], entropy, additional_input],
            self.seed_len,
        )?;
        self.set_seed(seed)
    }

    /// SP 800-90A §10.1.1.4.
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: &[u8],
        reseed_counter: u64,
    ) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        let hash_size = self.digest.digest_size();
        let mut h = Zeroizing::new(vec![0u8; hash_size]);

        if !additional_input.is_empty() {
            // w = Hash(0x02 || V || additional_input); V = (V + w) mod 2^seedlen
            hash(
                &mut self.digest,
                &[&[0x02][..], &self.v[..], additional_input],
                &mut h,
            )?;
            add_assign(&mut self.v, &h);
        }

        self.hashgen(output)?;

        // H = Hash(0x03 || V)
        hash(&mut self.digest, &[&[0x03][..], &self.v[..]], &mut h)?;

        // V = (V + H + C + reseed_counter) mod 2^seedlen
        add_assign(&mut self.v, &h);
        add_assign(&mut self.v, &self.c);
        add_u64(&mut self.v, reseed_counter);
        Ok(())
    }

    fn clear(&mut self) {
        self.v.zeroize();
        self.c.zeroize();
        self.digest.reset();
    }
}
