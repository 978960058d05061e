//! Entropy collaborator interface.
//!
//! A DRBG never collects entropy itself. It asks an
//! [`EntropySourceProvider`] for an [`EntropySource`] sized for its security
//! strength and pulls from it on instantiate, reseed, and every
//! prediction-resistant generate.
//!
//! Two providers ship with the crate:
//! - [`FixedEntropyProvider`] deals sequential slices of a fixed buffer and
//!   is what known-answer tests run against.
//! - [`CallbackEntropyProvider`] forwards to a caller closure, e.g. one
//!   reading the OS or a hardware noise source.

use std::cell::RefCell;
use std::rc::Rc;

use sp800_types::DrbgError;
use zeroize::{Zeroize, Zeroizing};

/// What a generator needs from an entropy source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntropyRequest {
    /// Bits of entropy required per `get_entropy` call.
    pub bits_required: usize,
    /// Whether the generator is configured for prediction resistance.
    pub prediction_resistant: bool,
}

impl EntropyRequest {
    /// Bytes per `get_entropy` call.
    pub fn bytes_required(&self) -> usize {
        self.bits_required.div_ceil(8)
    }
}

/// A live source of entropy bound to one generator.
pub trait EntropySource {
    /// Whether every call yields fresh, independent entropy.
    fn is_prediction_resistant(&self) -> bool;

    /// Return `entropy_size() / 8` fresh bytes. Bytes are never handed out twice.
    fn get_entropy(&mut self) -> Result<Vec<u8>, DrbgError>;

    /// Size in bits of each `get_entropy` result.
    fn entropy_size(&self) -> usize;
}

/// Factory for entropy sources of a given size.
pub trait EntropySourceProvider {
    fn get(&self, bits_required: usize) -> Box<dyn EntropySource>;
}

struct FixedBuffer {
    data: Vec<u8>,
    offset: usize,
}

impl Drop for FixedBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

/// Deterministic provider over a fixed byte string.
///
/// All sources obtained from one provider share the same cursor, so
/// successive calls consume consecutive, non-overlapping slices. Running
/// off the end is an error; there is no wraparound.
#[derive(Clone)]
pub struct FixedEntropyProvider {
    buffer: Rc<RefCell<FixedBuffer>>,
    prediction_resistant: bool,
}

impl FixedEntropyProvider {
    pub fn new(data: &[u8], prediction_resistant: bool) -> Self {
        FixedEntropyProvider {
            buffer: Rc::new(RefCell::new(FixedBuffer {
                data: data.to_vec(),
                offset: 0,
            })),
            prediction_resistant,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        let buf = self.buffer.borrow();
        buf.data.len() - buf.offset
    }
}

impl EntropySourceProvider for FixedEntropyProvider {
    fn get(&self, bits_required: usize) -> Box<dyn EntropySource> {
        Box::new(FixedEntropySource {
            buffer: Rc::clone(&self.buffer),
            bits: bits_required,
            prediction_resistant: self.prediction_resistant,
        })
    }
}

struct FixedEntropySource {
    buffer: Rc<RefCell<FixedBuffer>>,
    bits: usize,
    prediction_resistant: bool,
}

impl EntropySource for FixedEntropySource {
    fn is_prediction_resistant(&self) -> bool {
        self.prediction_resistant
    }

    fn get_entropy(&mut self) -> Result<Vec<u8>, DrbgError> {
        let len = self.bits.div_ceil(8);
        let mut buf = self.buffer.borrow_mut();
        let remaining = buf.data.len() - buf.offset;
        if remaining < len {
            return Err(DrbgError::EntropyExhausted {
                requested: len,
                remaining,
            });
        }
        let start = buf.offset;
        buf.offset += len;
        Ok(buf.data[start..start + len].to_vec())
    }

    fn entropy_size(&self) -> usize {
        self.bits
    }
}

type FillFn = dyn FnMut(&mut [u8]) -> Result<(), DrbgError>;

/// Provider that forwards every request to a caller-supplied closure.
#[derive(Clone)]
pub struct CallbackEntropyProvider {
    fill: Rc<RefCell<Box<FillFn>>>,
    prediction_resistant: bool,
}

impl CallbackEntropyProvider {
    pub fn new<F>(prediction_resistant: bool, fill: F) -> Self
    where
        F: FnMut(&mut [u8]) -> Result<(), DrbgError> + 'static,
    {
        CallbackEntropyProvider {
            fill: Rc::new(RefCell::new(Box::new(fill))),
            prediction_resistant,
        }
    }
}

impl EntropySourceProvider for CallbackEntropyProvider {
    fn get(&self, bits_required: usize) -> Box<dyn EntropySource> {
        Box::new(CallbackEntropySource {
            fill: Rc::clone(&self.fill),
            bits: bits_required,
            prediction_resistant: self.prediction_resistant,
        })
    }
}

struct CallbackEntropySource {
    fill: Rc<RefCell<Box<FillFn>>>,
    bits: usize,
    prediction_resistant: bool,
}

impl EntropySource for CallbackEntropySource {
    fn is_prediction_resistant(&self) -> bool {
        self.prediction_resistant
    }

    fn get_entropy(&mut self) -> Result<Vec<u8>, DrbgError> {
        let mut out = Zeroizing::new(vec![0u8; self.bits.div_ceil(8)]);
        let mut fill = self.fill.borrow_mut();
        (*fill)(&mut out[..])?;
        Ok(std::mem::take(&mut *out))
    }

    fn entropy_size(&self) -> usize {
        self.bits
    }
}
