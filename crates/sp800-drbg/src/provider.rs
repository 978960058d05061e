//! Primitive adapter traits.
//!
//! These are the only operations a DRBG construction needs from a digest,
//! a MAC or a block cipher. Implementations live in [`crate::primitives`]
//! or can be supplied by the caller.

use sp800_types::DrbgError;

/// A hash / message digest algorithm.
pub trait Digest: Send {
    /// The output size in bytes.
    fn digest_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), DrbgError>;

    /// Finalize the hash, write the digest to `out` and reset the state.
    /// Returns the number of bytes written (`digest_size()`).
    fn finish(&mut self, out: &mut [u8]) -> Result<usize, DrbgError>;

    /// Reset the hash state to process a new message.
    fn reset(&mut self);
}

/// A keyed Message Authentication Code (HMAC for the DRBGs here).
pub trait Mac: Send {
    /// The output size of the MAC in bytes.
    fn mac_size(&self) -> usize;

    /// Key the MAC. Any previous key and pending input are discarded.
    fn init(&mut self, key: &[u8]) -> Result<(), DrbgError>;

    /// Feed data into the MAC computation.
    fn update(&mut self, data: &[u8]) -> Result<(), DrbgError>;

    /// Finalize, write the MAC value to `out` and reset for reuse with the
    /// same key. Returns the number of bytes written (`mac_size()`).
    fn finish(&mut self, out: &mut [u8]) -> Result<usize, DrbgError>;

    /// Drop pending input, keeping the key.
    fn reset(&mut self);

    /// Discard the key. `init` must be called again before further use.
    fn clear(&mut self);
}

/// A block cipher (e.g., AES).
pub trait BlockCipher: Send {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Key size in bytes.
    fn key_size(&self) -> usize;

    /// Set the key and the direction.
    fn init(&mut self, encrypt: bool, key: &[u8]) -> Result<(), DrbgError>;

    /// Process one block from `input` into `output`.
    /// Returns the number of bytes written (`block_size()`).
    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, DrbgError>;

    /// Discard the key schedule. `init` must be called again before further use.
    fn clear(&mut self);
}

impl<T: Digest + ?Sized> Digest for Box<T> {
    fn digest_size(&self) -> usize {
        (**self).digest_size()
    }
    fn update(&mut self, data: &[u8]) -> Result<(), DrbgError> {
        (**self).update(data)
    }
    fn finish(&mut self, out: &mut [u8]) -> Result<usize, DrbgError> {
        (**self).finish(out)
    }
    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<T: Mac + ?Sized> Mac for Box<T> {
    fn mac_size(&self) -> usize {
        (**self).mac_size()
    }
    fn init(&mut self, key: &[u8]) -> Result<(), DrbgError> {
        (**self).init(key)
    }
    fn update(&mut self, data: &[u8]) -> Result<(), DrbgError> {
        (**self).update(data)
    }
    fn finish(&mut self, out: &mut [u8]) -> Result<usize, DrbgError> {
        (**self).finish(out)
    }
    fn reset(&mut self) {
        (**self).reset()
    }
    fn clear(&mut self) {
        (**self).clear()
    }
}

impl<T: BlockCipher + ?Sized> BlockCipher for Box<T> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }
    fn key_size(&self) -> usize {
        (**self).key_size()
    }
    fn init(&mut self, encrypt: bool, key: &[u8]) -> Result<(), DrbgError> {
        (**self).init(encrypt, key)
    }
    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, DrbgError> {
        (**self).process_block(input, output)
    }
    fn clear(&mut self) {
        (**self).clear()
    }
}
