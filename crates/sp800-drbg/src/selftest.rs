//! Power-on self-tests.
//!
//! Each construction is instantiated from fixed inputs and its output is
//! compared against a stored known answer. [`SelfTest`] tracks the module
//! state: PreOperational → SelfTesting → Operational / Error.

use crate::drbg::{CtrDrbg, Drbg, DrbgConfig, HashDrbg, HmacDrbg, Mechanism, X931Drbg};
use crate::primitives::{Aes128Cipher, HmacSha256, Sha1Digest};
use sp800_types::DrbgError;
use subtle::ConstantTimeEq;

/// Self-test module states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestState {
    /// Self-tests have not been run.
    PreOperational,
    /// Self-tests are executing.
    SelfTesting,
    /// Every known-answer test passed.
    Operational,
    /// A known-answer test failed; the generators must not be used.
    Error,
}

/// Owns the self-test state.
///
/// ```
/// use sp800_drbg::selftest::SelfTest;
///
/// let mut st = SelfTest::new();
/// st.run().unwrap();
/// assert!(st.is_operational());
/// ```
pub struct SelfTest {
    state: SelfTestState,
}

impl SelfTest {
    pub fn new() -> Self {
        SelfTest {
            state: SelfTestState::PreOperational,
        }
    }

    pub fn state(&self) -> SelfTestState {
        self.state
    }

    pub fn is_operational(&self) -> bool {
        self.state == SelfTestState::Operational
    }

    /// Run every known-answer test. The `Error` state is permanent.
    pub fn run(&mut self) -> Result<(), DrbgError> {
        if self.state == SelfTestState::Error {
            return Err(DrbgError::SelfTestFailed(
                "module is in the error state".into(),
            ));
        }

        self.state = SelfTestState::SelfTesting;
        if let Err(e) = run_self_tests() {
            log::error!("DRBG self-test failed: {e}");
            self.state = SelfTestState::Error;
            return Err(e);
        }
        self.state = SelfTestState::Operational;
        log::info!("DRBG self-tests passed");
        Ok(())
    }
}

impl Default for SelfTest {
    fn default() -> Self {
        Self::new()
    }
}

/// Run all known-answer tests. Returns on first failure.
pub fn run_self_tests() -> Result<(), DrbgError> {
    kat_hash_drbg()?;
    kat_hmac_drbg()?;
    kat_ctr_drbg()?;
    kat_x931_drbg()?;
    Ok(())
}

fn hex(s: &str) -> Result<Vec<u8>, DrbgError> {
    hex::decode(s).map_err(|e| DrbgError::SelfTestFailed(format!("bad test vector: {e}")))
}

fn check(name: &str, got: &[u8], expected: &[u8]) -> Result<(), DrbgError> {
    if got.len() != expected.len() || !bool::from(got.ct_eq(expected)) {
        return Err(DrbgError::SelfTestFailed(format!("{name} output mismatch")));
    }
    Ok(())
}

fn instantiated<M: Mechanism>(
    mechanism: M,
    entropy: &[u8],
    nonce: &[u8],
    personalization: &[u8],
) -> Result<Drbg<M>, DrbgError> {
    let mut drbg = Drbg::new(mechanism, DrbgConfig::default())?;
    drbg.instantiate(entropy, nonce, personalization)?;
    Ok(drbg)
}

/// Hash-DRBG SHA-1, two successive generates.
fn kat_hash_drbg() -> Result<(), DrbgError> {
    let entropy: Vec<u8> = (0x00..0x37).collect();
    let mut drbg = instantiated(
        HashDrbg::new(Sha1Digest::new()),
        &entropy,
        &hex("2021222324")?,
        b"",
    )?;
    drbg.generate_bytes(40)?;
    let out = drbg.generate_bytes(40)?;
    check(
        "Hash_DRBG",
        &out,
        &hex("B77AA5C0CD55BBCEED7574AF223AFD988C7EEC8EFF4A94E5E89D26A04F58FA79F5E0D3702D7A9A6A")?,
    )
}

/// HMAC-DRBG SHA-256 (NIST CAVP, reseed with additional input).
fn kat_hmac_drbg() -> Result<(), DrbgError> {
    let mut drbg = instantiated(
        HmacDrbg::new(HmacSha256::new()),
        &hex("cdb0d9117cc6dbc9ef9dcb06a97579841d72dc18b2d46a1cb61e314012bdf416")?,
        &hex("d0c0d01d156016d0eb6b7e9c7c3c8da8")?,
        &hex("6f0fb9eab3f9ea7ab0a719bfa879bf0aaed683307fda0c6d73ce018b6e34faaa")?,
    )?;
    let addin_reseed = hex("1ab4ca9014fa98a55938316de8ba5a68c629b0741bdd058c4d70c91cda5099b3")?;
    drbg.reseed(
        &hex("8ec6f7d5a8e2e88f43986f70b86e050d07c84b931bcf18e601c5a3eee3064c82")?,
        Some(addin_reseed.as_slice()),
    )?;

    let mut out = vec![0u8; 128];
    let addin1 = hex("16e2d0721b58d839a122852abd3bf2c942a31c84d82fca74211871880d7162ff")?;
    drbg.generate(&mut out, Some(addin1.as_slice()), false)?;
    let addin2 = hex("53686f042a7b087d5d2eca0d2a96de131f275ed7151189f7ca52deaa78b79fb2")?;
    drbg.generate(&mut out, Some(addin2.as_slice()), false)?;

    let expected = hex(
        "dda04a2ca7b8147af1548f5d086591ca4fd951a345ce52b3cd49d47e84aa31a1\
         83e31fbc42a1ff1d95afec7143c8008c97bc2a9c091df0a763848391f68cb4a3\
         66ad89857ac725a53b303ddea767be8dc5f605b1b95f6d24c9f06be65a973a08\
         9320b3cc42569dcfd4b92b62a993785b0301b3fc452445656fce22664827b88f",
    )?;
    check("HMAC_DRBG", &out, &expected)
}

/// CTR-DRBG AES-128 with derivation function.
fn kat_ctr_drbg() -> Result<(), DrbgError> {
    let entropy: Vec<u8> = (0x00..0x20).collect();
    let mut drbg = instantiated(
        CtrDrbg::with_df(Aes128Cipher::new()),
        &entropy,
        &hex("2021222324252627")?,
        b"",
    )?;
    let out = drbg.generate_bytes(32)?;
    check(
        "CTR_DRBG",
        &out,
        &hex("8cf59c8cf6888b96eb1c1e3e79d82387af08a9e5ff75e23f1fbcd4559b6b997e")?,
    )
}

/// X9.31 AES-128.
fn kat_x931_drbg() -> Result<(), DrbgError> {
    let mechanism = X931Drbg::new(Aes128Cipher::new(), &hex("f7d36762b9915f1ed585eb8e91700eb2")?)?;
    let mut drbg = instantiated(
        mechanism,
        &hex("35cc0ea481fc8a4f5f05c7d4667233b2")?,
        &hex("259e67249288597a4d61e7c0e690afae")?,
        b"",
    )?;
    let out = drbg.generate_bytes(32)?;
    check(
        "X9.31",
        &out,
        &hex("15f013af5a8e9df9a8e37500edaeac43a9d74bb1c90a222adc398546d64879cf")?,
    )
}
