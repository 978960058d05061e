//! Derivation functions (NIST SP 800-90A §10.3).
//!
//! Both functions condense seed material of any length into exactly
//! `out_len` bytes. Inputs are passed as a list of slices and treated as
//! their concatenation, so callers never build the seed material buffer.

use crate::provider::{BlockCipher, Digest};
use sp800_types::DrbgError;
use zeroize::{Zeroize, Zeroizing};

/// Largest output `block_cipher_df` may be asked for (512 bits).
pub const BLOCK_CIPHER_DF_MAX_OUT: usize = 64;

/// Hash_df (SP 800-90A §10.3.1).
///
/// `Hash(counter || no_of_bits_to_return || input)` for counter = 1, 2, ..
/// concatenated and truncated to `out_len` bytes.
pub fn hash_df<D: Digest + ?Sized>(
    digest: &mut D,
    inputs: &[&[u8]],
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>, DrbgError> {
    let hash_size = digest.digest_size();
    let max = 255 * hash_size;
    if out_len == 0 || out_len > max {
        return Err(DrbgError::InvalidLength {
            what: "hash_df output",
            expected: max,
            got: out_len,
        });
    }
    let bits = (out_len as u32) * 8;

    let mut out = Zeroizing::new(vec![0u8; out_len]);
    let mut block = Zeroizing::new(vec![0u8; hash_size]);
    let mut counter: u8 = 1;
    digest.reset();

    for chunk in out.chunks_mut(hash_size) {
        digest.update(&[counter])?;
        digest.update(&bits.to_be_bytes())?;
        for input in inputs {
            digest.update(input)?;
        }
        digest.finish(&mut block)?;
        chunk.copy_from_slice(&block[..chunk.len()]);
        counter = counter.wrapping_add(1);
    }

    Ok(out)
}

/// Block_Cipher_df (SP 800-90A §10.3.2).
///
/// The cipher is re-keyed twice (fixed key, then derived key); callers must
/// re-initialise it before further use.
pub fn block_cipher_df<C: BlockCipher + ?Sized>(
    cipher: &mut C,
    inputs: &[&[u8]],
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>, DrbgError> {
    let key_len = cipher.key_size();
    let block_len = cipher.block_size();
    if out_len == 0 || out_len > BLOCK_CIPHER_DF_MAX_OUT {
        return Err(DrbgError::InvalidLength {
            what: "block_cipher_df output",
            expected: BLOCK_CIPHER_DF_MAX_OUT,
            got: out_len,
        });
    }
    let input_len: usize = inputs.iter().map(|i| i.len()).sum();
    let l = u32::try_from(input_len).map_err(|_| DrbgError::InvalidLength {
        what: "block_cipher_df input",
        expected: u32::MAX as usize,
        got: input_len,
    })?;

    // S = L || N || input_string || 0x80 || 0x00..  (multiple of outlen)
    let mut s = Zeroizing::new(Vec::with_capacity(8 + input_len + 1 + block_len));
    s.extend_from_slice(&l.to_be_bytes());
    s.extend_from_slice(&(out_len as u32).to_be_bytes());
    for input in inputs {
        s.extend_from_slice(input);
    }
    s.push(0x80);
    while s.len() % block_len != 0 {
        s.push(0x00);
    }

    // K = leftmost keylen bytes of 0x00010203...
    let df_key: Vec<u8> = (0..key_len).map(|i| i as u8).collect();
    cipher.init(true, &df_key)?;

    let mut temp = Zeroizing::new(Vec::with_capacity(key_len + 2 * block_len));
    let mut iv = vec![0u8; block_len];
    let mut chaining = Zeroizing::new(vec![0u8; block_len]);
    let mut i: u32 = 0;
    while temp.len() < key_len + block_len {
        iv[..4].copy_from_slice(&i.to_be_bytes());
        bcc(cipher, &iv, &s, &mut chaining)?;
        temp.extend_from_slice(&chaining);
        i += 1;
    }

    let (new_key, rest) = temp.split_at(key_len);
    let mut x = Zeroizing::new(rest[..block_len].to_vec());
    cipher.init(true, new_key)?;

    let mut out = Zeroizing::new(vec![0u8; out_len]);
    let mut block = Zeroizing::new(vec![0u8; block_len]);
    for chunk in out.chunks_mut(block_len) {
        cipher.process_block(&x, &mut block)?;
        x.copy_from_slice(&block);
        chunk.copy_from_slice(&block[..chunk.len()]);
    }

    Ok(out)
}

/// BCC (SP 800-90A §10.3.3): CBC-MAC of `iv || data` with a zero IV.
fn bcc<C: BlockCipher + ?Sized>(
    cipher: &mut C,
    iv: &[u8],
    data: &[u8],
    chaining: &mut [u8],
) -> Result<(), DrbgError> {
    let block_len = chaining.len();
    let mut input = vec![0u8; block_len];
    chaining.fill(0);

    for block in std::iter::once(iv).chain(data.chunks(block_len)) {
        for (dst, (c, b)) in input.iter_mut().zip(chaining.iter().zip(block)) {
            *dst = c ^ b;
        }
        cipher.process_block(&input, chaining)?;
    }

    input.zeroize();
    Ok(())
}
