//! Primitive adapters backed by the RustCrypto hash, HMAC and AES crates.
//!
//! Each adapter exposes exactly the [`provider`](crate::provider) surface a
//! DRBG construction consumes, so the constructions stay generic over the
//! primitive.

use crate::provider::{BlockCipher, Digest, Mac};
use aes::cipher::{Block, BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit, KeySizeUser};
use hmac::SimpleHmac;
use sha2::digest::{self, core_api::BlockSizeUser as DigestBlockSizeUser, FixedOutputReset, Reset};
use sp800_types::DrbgError;
use zeroize::{Zeroize, Zeroizing};

/// [`Digest`] adapter over any RustCrypto hash.
pub struct DigestAdapter<D> {
    inner: D,
}

/// SHA-1 (160-bit output).
pub type Sha1Digest = DigestAdapter<sha1::Sha1>;
/// SHA-224.
pub type Sha224Digest = DigestAdapter<sha2::Sha224>;
/// SHA-256.
pub type Sha256Digest = DigestAdapter<sha2::Sha256>;
/// SHA-384.
pub type Sha384Digest = DigestAdapter<sha2::Sha384>;
/// SHA-512.
pub type Sha512Digest = DigestAdapter<sha2::Sha512>;
/// SHA-512/256.
#[allow(non_camel_case_types)]
pub type Sha512_256Digest = DigestAdapter<sha2::Sha512_256>;

impl<D: digest::Digest> DigestAdapter<D> {
    pub fn new() -> Self {
        DigestAdapter { inner: D::new() }
    }
}

impl<D: digest::Digest> Default for DigestAdapter<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Digest for DigestAdapter<D>
where
    D: digest::Digest + FixedOutputReset + Reset + Send,
{
    fn digest_size(&self) -> usize {
        <D as digest::Digest>::output_size()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), DrbgError> {
        digest::Digest::update(&mut self.inner, data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<usize, DrbgError> {
        let size = self.digest_size();
        if out.len() < size {
            return Err(DrbgError::BufferTooSmall {
                need: size,
                got: out.len(),
            });
        }
        let result = digest::Digest::finalize_reset(&mut self.inner);
        out[..size].copy_from_slice(&result);
        Ok(size)
    }

    fn reset(&mut self) {
        digest::Digest::reset(&mut self.inner);
    }
}

/// [`Mac`] adapter: HMAC over any RustCrypto hash.
pub struct HmacAdapter<D: digest::Digest + DigestBlockSizeUser> {
    ctx: Option<SimpleHmac<D>>,
    key: Zeroizing<Vec<u8>>,
}

/// HMAC-SHA-1.
pub type HmacSha1 = HmacAdapter<sha1::Sha1>;
/// HMAC-SHA-224.
pub type HmacSha224 = HmacAdapter<sha2::Sha224>;
/// HMAC-SHA-256.
pub type HmacSha256 = HmacAdapter<sha2::Sha256>;
/// HMAC-SHA-384.
pub type HmacSha384 = HmacAdapter<sha2::Sha384>;
/// HMAC-SHA-512.
pub type HmacSha512 = HmacAdapter<sha2::Sha512>;

impl<D: digest::Digest + DigestBlockSizeUser> HmacAdapter<D> {
    /// Create an unkeyed HMAC; [`Mac::init`] must be called before use.
    pub fn new() -> Self {
        HmacAdapter {
            ctx: None,
            key: Zeroizing::new(Vec::new()),
        }
    }

    fn keyed(key: &[u8]) -> Result<SimpleHmac<D>, DrbgError> {
        <SimpleHmac<D> as hmac::Mac>::new_from_slice(key).map_err(|_| DrbgError::InvalidLength {
            what: "hmac key",
            expected: <D as DigestBlockSizeUser>::block_size(),
            got: key.len(),
        })
    }
}

impl<D: digest::Digest + DigestBlockSizeUser> Default for HmacAdapter<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Mac for HmacAdapter<D>
where
    D: digest::Digest + DigestBlockSizeUser + Send,
{
    fn mac_size(&self) -> usize {
        <D as digest::Digest>::output_size()
    }

    fn init(&mut self, key: &[u8]) -> Result<(), DrbgError> {
        self.ctx = Some(Self::keyed(key)?);
        self.key = Zeroizing::new(key.to_vec());
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<(), DrbgError> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or(DrbgError::PrimitiveNotInitialized("hmac"))?;
        hmac::Mac::update(ctx, data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<usize, DrbgError> {
        let size = self.mac_size();
        if out.len() < size {
            return Err(DrbgError::BufferTooSmall {
                need: size,
                got: out.len(),
            });
        }
        let ctx = self
            .ctx
            .take()
            .ok_or(DrbgError::PrimitiveNotInitialized("hmac"))?;
        let tag = hmac::Mac::finalize(ctx).into_bytes();
        out[..size].copy_from_slice(&tag);
        self.ctx = Some(Self::keyed(&self.key)?);
        Ok(size)
    }

    fn reset(&mut self) {
        if self.ctx.is_some() {
            self.ctx = Self::keyed(&self.key).ok();
        }
    }

    fn clear(&mut self) {
        self.ctx = None;
        self.key.zeroize();
    }
}

/// [`BlockCipher`] adapter over any RustCrypto block cipher.
pub struct BlockCipherAdapter<C> {
    cipher: Option<C>,
    encrypt: bool,
}

/// AES with a 128-bit key.
pub type Aes128Cipher = BlockCipherAdapter<aes::Aes128>;
/// AES with a 192-bit key.
pub type Aes192Cipher = BlockCipherAdapter<aes::Aes192>;
/// AES with a 256-bit key.
pub type Aes256Cipher = BlockCipherAdapter<aes::Aes256>;

impl<C> BlockCipherAdapter<C> {
    /// Create an unkeyed cipher; [`BlockCipher::init`] must be called before use.
    pub fn new() -> Self {
        BlockCipherAdapter {
            cipher: None,
            encrypt: true,
        }
    }
}

impl<C> Default for BlockCipherAdapter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> BlockCipher for BlockCipherAdapter<C>
where
    C: BlockEncrypt + BlockDecrypt + KeyInit + Send,
{
    fn block_size(&self) -> usize {
        <C as BlockSizeUser>::block_size()
    }

    fn key_size(&self) -> usize {
        <C as KeySizeUser>::key_size()
    }

    fn init(&mut self, encrypt: bool, key: &[u8]) -> Result<(), DrbgError> {
        let expected = self.key_size();
        if key.len() != expected {
            return Err(DrbgError::InvalidLength {
                what: "cipher key",
                expected,
                got: key.len(),
            });
        }
        let cipher = C::new_from_slice(key).map_err(|_| DrbgError::InvalidLength {
            what: "cipher key",
            expected,
            got: key.len(),
        })?;
        self.cipher = Some(cipher);
        self.encrypt = encrypt;
        Ok(())
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, DrbgError> {
        let size = self.block_size();
        if input.len() < size {
            return Err(DrbgError::InvalidLength {
                what: "cipher block",
                expected: size,
                got: input.len(),
            });
        }
        if output.len() < size {
            return Err(DrbgError::BufferTooSmall {
                need: size,
                got: output.len(),
            });
        }
        let cipher = self
            .cipher
            .as_ref()
            .ok_or(DrbgError::PrimitiveNotInitialized("block cipher"))?;

        let mut block = Block::<C>::clone_from_slice(&input[..size]);
        if self.encrypt {
            cipher.encrypt_block(&mut block);
        } else {
            cipher.decrypt_block(&mut block);
        }
        output[..size].copy_from_slice(&block);
        Ok(size)
    }

    fn clear(&mut self) {
        // Dropping the cipher zeroizes its key schedule
        self.cipher = None;
    }
}
