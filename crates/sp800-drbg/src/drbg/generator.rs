//! Generator core shared by every construction.
//!
//! [`Drbg`] owns the instantiate / reseed / generate protocol: lifecycle
//! state, the reseed counter, per-request and reseed-interval limits,
//! prediction resistance and entropy validation. The construction-specific
//! state update lives behind the [`Mechanism`] trait.

use crate::entropy::{EntropyRequest, EntropySource};
use sp800_types::{DrbgAlgorithm, DrbgError, ErrorKind};
use zeroize::{Zeroize, Zeroizing};

/// Operational limits of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrbgLimits {
    /// Largest single generate request, in bytes.
    pub max_request_len: usize,
    /// Generate calls allowed between two (re)seeds.
    pub reseed_interval: u64,
}

/// Generator configuration. Unset values take the construction's maximum.
#[derive(Debug, Clone, Default)]
pub struct DrbgConfig {
    /// Security strength in bits.
    pub security_strength: Option<u32>,
    /// Pull fresh entropy before every generate.
    pub prediction_resistance: bool,
    /// Tighter reseed interval than the construction allows.
    pub reseed_interval: Option<u64>,
    /// Tighter per-request limit than the construction allows.
    pub max_request_len: Option<usize>,
}

/// Lifecycle state of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrbgState {
    Uninstantiated,
    Instantiated,
    /// The reseed interval is used up; only `reseed` (or a
    /// prediction-resistant generate) makes progress.
    ReseedRequired,
}

/// One generate call, as a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub output_len: usize,
    pub additional_input: Option<Vec<u8>>,
    pub prediction_resistance: bool,
}

impl GenerateRequest {
    pub fn new(output_len: usize) -> Self {
        GenerateRequest {
            output_len,
            ..Default::default()
        }
    }

    pub fn with_additional_input(mut self, additional_input: &[u8]) -> Self {
        self.additional_input = Some(additional_input.to_vec());
        self
    }

    pub fn with_prediction_resistance(mut self) -> Self {
        self.prediction_resistance = true;
        self
    }
}

/// The construction-specific half of a DRBG.
///
/// Implementations validate every length before touching their state, so a
/// `Configuration` error leaves the state exactly as it was.
pub trait Mechanism {
    fn algorithm(&self) -> DrbgAlgorithm;

    /// Length in bytes of the secret state that seeding fills.
    fn seed_len(&self) -> usize;

    /// Highest security strength (bits) the underlying primitive supports.
    fn max_security_strength(&self) -> u32;

    /// The construction's own request and reseed limits.
    fn default_limits(&self) -> DrbgLimits;

    /// Shortest acceptable entropy input (bytes) for `security_strength`.
    fn min_entropy_len(&self, security_strength: u32) -> usize {
        (security_strength as usize).div_ceil(8)
    }

    fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError>;

    fn reseed(&mut self, entropy: &[u8], additional_input: &[u8]) -> Result<(), DrbgError>;

    /// Fill `output` and advance the state. `reseed_counter` is the value
    /// before this call is counted.
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: &[u8],
        reseed_counter: u64,
    ) -> Result<(), DrbgError>;

    /// Zeroize all secret state.
    fn clear(&mut self);
}

impl<T: Mechanism + ?Sized> Mechanism for Box<T> {
    fn algorithm(&self) -> DrbgAlgorithm {
        (**self).algorithm()
    }
    fn seed_len(&self) -> usize {
        (**self).seed_len()
    }
    fn max_security_strength(&self) -> u32 {
        (**self).max_security_strength()
    }
    fn default_limits(&self) -> DrbgLimits {
        (**self).default_limits()
    }
    fn min_entropy_len(&self, security_strength: u32) -> usize {
        (**self).min_entropy_len(security_strength)
    }
    fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        (**self).instantiate(entropy, nonce, personalization)
    }
    fn reseed(&mut self, entropy: &[u8], additional_input: &[u8]) -> Result<(), DrbgError> {
        (**self).reseed(entropy, additional_input)
    }
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: &[u8],
        reseed_counter: u64,
    ) -> Result<(), DrbgError> {
        (**self).generate(output, additional_input, reseed_counter)
    }
    fn clear(&mut self) {
        (**self).clear()
    }
}

/// A deterministic random bit generator.
pub struct Drbg<M: Mechanism> {
    mechanism: M,
    security_strength: u32,
    prediction_resistance: bool,
    limits: DrbgLimits,
    source: Option<Box<dyn EntropySource>>,
    reseed_counter: u64,
    instantiated: bool,
}

impl<M: Mechanism> Drbg<M> {
    /// Create an uninstantiated generator.
    pub fn new(mechanism: M, config: DrbgConfig) -> Result<Self, DrbgError> {
        let max = mechanism.max_security_strength();
        let security_strength = config.security_strength.unwrap_or(max);
        if security_strength == 0 {
            return Err(DrbgError::InvalidConfig("security strength must be non-zero"));
        }
        if security_strength > max {
            return Err(DrbgError::UnsupportedStrength {
                requested: security_strength,
                max,
            });
        }

        let defaults = mechanism.default_limits();
        let reseed_interval = match config.reseed_interval {
            None => defaults.reseed_interval,
            Some(0) => return Err(DrbgError::InvalidConfig("reseed interval must be non-zero")),
            Some(n) if n > defaults.reseed_interval => {
                return Err(DrbgError::InvalidConfig(
                    "reseed interval above construction maximum",
                ))
            }
            Some(n) => n,
        };
        let max_request_len = match config.max_request_len {
            None => defaults.max_request_len,
            Some(0) => return Err(DrbgError::InvalidConfig("request limit must be non-zero")),
            Some(n) if n > defaults.max_request_len => {
                return Err(DrbgError::InvalidConfig(
                    "request limit above construction maximum",
                ))
            }
            Some(n) => n,
        };

        Ok(Drbg {
            mechanism,
            security_strength,
            prediction_resistance: config.prediction_resistance,
            limits: DrbgLimits {
                max_request_len,
                reseed_interval,
            },
            source: None,
            reseed_counter: 0,
            instantiated: false,
        })
    }

    /// Attach the entropy collaborator used by the `*_from_source` calls
    /// and by prediction resistance. Each pull must cover
    /// [`entropy_request`](Self::entropy_request).
    pub fn with_entropy_source(mut self, source: Box<dyn EntropySource>) -> Result<Self, DrbgError> {
        if self.prediction_resistance && !source.is_prediction_resistant() {
            return Err(DrbgError::InvalidConfig(
                "prediction resistance requires a prediction-resistant entropy source",
            ));
        }
        let need = self.entropy_request().bits_required;
        if source.entropy_size() < need {
            return Err(DrbgError::InsufficientEntropy {
                need,
                got: source.entropy_size(),
            });
        }
        self.source = Some(source);
        Ok(self)
    }

    /// What this generator needs from an entropy provider.
    pub fn entropy_request(&self) -> EntropyRequest {
        EntropyRequest {
            bits_required: self.mechanism.min_entropy_len(self.security_strength) * 8,
            prediction_resistant: self.prediction_resistance,
        }
    }

    pub fn algorithm(&self) -> DrbgAlgorithm {
        self.mechanism.algorithm()
    }

    pub fn security_strength(&self) -> u32 {
        self.security_strength
    }

    pub fn seed_len(&self) -> usize {
        self.mechanism.seed_len()
    }

    pub fn limits(&self) -> DrbgLimits {
        self.limits
    }

    pub fn prediction_resistance(&self) -> bool {
        self.prediction_resistance
    }

    pub fn mechanism(&self) -> &M {
        &self.mechanism
    }

    pub fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }

    pub fn state(&self) -> DrbgState {
        if !self.instantiated {
            DrbgState::Uninstantiated
        } else if self.reseed_counter > self.limits.reseed_interval {
            DrbgState::ReseedRequired
        } else {
            DrbgState::Instantiated
        }
    }

    /// Instantiate from caller-supplied entropy (SP 800-90A §9.1).
    pub fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        if self.instantiated {
            return Err(DrbgError::AlreadyInstantiated);
        }
        self.check_entropy(entropy)?;

        if let Err(e) = self.mechanism.instantiate(entropy, nonce, personalization) {
            return Err(self.fail("instantiate", e));
        }
        self.reseed_counter = 1;
        self.instantiated = true;

        log::debug!(
            "{} instantiated: strength={} seedlen={}",
            self.algorithm(),
            self.security_strength,
            self.seed_len()
        );
        Ok(())
    }

    /// Instantiate with entropy pulled from the attached source.
    pub fn instantiate_from_source(
        &mut self,
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        if self.instantiated {
            return Err(DrbgError::AlreadyInstantiated);
        }
        let entropy = self.pull_entropy()?;
        self.instantiate(&entropy, nonce, personalization)
    }

    /// Reseed from caller-supplied entropy (SP 800-90A §9.2).
    pub fn reseed(
        &mut self,
        entropy: &[u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), DrbgError> {
        if !self.instantiated {
            return Err(DrbgError::NotInstantiated);
        }
        self.check_entropy(entropy)?;

        if let Err(e) = self
            .mechanism
            .reseed(entropy, additional_input.unwrap_or_default())
        {
            return Err(self.fail("reseed", e));
        }
        self.reseed_counter = 1;

        log::debug!("{} reseeded", self.algorithm());
        Ok(())
    }

    /// Reseed with entropy pulled from the attached source.
    pub fn reseed_from_source(&mut self, additional_input: Option<&[u8]>) -> Result<(), DrbgError> {
        if !self.instantiated {
            return Err(DrbgError::NotInstantiated);
        }
        let entropy = self.pull_entropy()?;
        self.reseed(&entropy, additional_input)
    }

    /// Fill `output` with pseudorandom bytes (SP 800-90A §9.3).
    ///
    /// On error nothing usable is written: `output` is either untouched or
    /// zeroized.
    pub fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: Option<&[u8]>,
        prediction_resistance: bool,
    ) -> Result<(), DrbgError> {
        if !self.instantiated {
            return Err(DrbgError::NotInstantiated);
        }
        if output.len() > self.limits.max_request_len {
            return Err(DrbgError::RequestTooLarge {
                requested: output.len(),
                max: self.limits.max_request_len,
            });
        }

        let mut additional_input = additional_input.unwrap_or_default();
        if prediction_resistance || self.prediction_resistance {
            self.reseed_from_source(Some(additional_input))?;
            additional_input = &[];
        } else if self.reseed_counter > self.limits.reseed_interval {
            log::warn!(
                "{} refused generate: reseed counter {} exceeds interval {}",
                self.algorithm(),
                self.reseed_counter,
                self.limits.reseed_interval
            );
            return Err(DrbgError::ReseedRequired {
                counter: self.reseed_counter,
                interval: self.limits.reseed_interval,
            });
        }

        log::trace!(
            "{} generate: {} bytes, counter {}",
            self.algorithm(),
            output.len(),
            self.reseed_counter
        );
        if let Err(e) = self
            .mechanism
            .generate(output, additional_input, self.reseed_counter)
        {
            output.zeroize();
            return Err(self.fail("generate", e));
        }
        self.reseed_counter += 1;
        Ok(())
    }

    /// Run a [`GenerateRequest`] and return the bytes.
    pub fn generate_request(&mut self, request: &GenerateRequest) -> Result<Vec<u8>, DrbgError> {
        let mut output = vec![0u8; request.output_len];
        self.generate(
            &mut output,
            request.additional_input.as_deref(),
            request.prediction_resistance,
        )?;
        Ok(output)
    }

    /// Generate `len` bytes without additional input.
    pub fn generate_bytes(&mut self, len: usize) -> Result<Vec<u8>, DrbgError> {
        self.generate_request(&GenerateRequest::new(len))
    }

    /// Zeroize all internal state (SP 800-90A §9.4).
    pub fn uninstantiate(&mut self) {
        self.mechanism.clear();
        self.reseed_counter = 0;
        if self.instantiated {
            log::debug!("{} uninstantiated", self.algorithm());
        }
        self.instantiated = false;
    }

    fn check_entropy(&self, entropy: &[u8]) -> Result<(), DrbgError> {
        let min = self.mechanism.min_entropy_len(self.security_strength);
        if entropy.len() < min {
            return Err(DrbgError::InsufficientEntropy {
                need: min * 8,
                got: entropy.len() * 8,
            });
        }
        Ok(())
    }

    fn pull_entropy(&mut self) -> Result<Zeroizing<Vec<u8>>, DrbgError> {
        let source = self.source.as_mut().ok_or(DrbgError::NoEntropySource)?;
        let expected = source.entropy_size().div_ceil(8);
        let entropy = Zeroizing::new(source.get_entropy()?);
        if entropy.len() != expected {
            return Err(DrbgError::InvalidLength {
                what: "entropy source output",
                expected,
                got: entropy.len(),
            });
        }
        Ok(entropy)
    }

    /// Configuration errors are raised before the mechanism mutates
    /// anything; anything else may have left it half-updated.
    fn fail(&mut self, op: &str, err: DrbgError) -> DrbgError {
        if err.kind() != ErrorKind::Configuration {
            log::error!("{} {} failed: {}", self.algorithm(), op, err);
            self.uninstantiate();
        }
        err
    }
}
