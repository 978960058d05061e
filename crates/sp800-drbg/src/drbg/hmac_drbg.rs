//! HMAC-DRBG (Deterministic Random Bit Generator) implementation.
//!
//! NIST SP 800-90A Section 10.1.2 over any keyed [`Mac`] adapter.

use super::generator::{DrbgLimits, Mechanism};
use super::hash_drbg::max_strength_for;
use crate::provider::Mac;
use sp800_types::{DrbgAlgorithm, DrbgError};
use zeroize::{Zeroize, Zeroizing};

/// Maximum number of generate requests before reseed is required.
const RESEED_INTERVAL: u64 = 1 << 48;

/// Maximum bytes per generate request (2^19 bits).
const MAX_REQUEST_LEN: usize = 1 << 16;

/// HMAC-DRBG state (NIST SP 800-90A Section 10.1.2.1).
pub struct HmacDrbg<M: Mac> {
    mac: M,
    /// HMAC key K (outlen bytes).
    k: Vec<u8>,
    /// HMAC value V (outlen bytes).
    v: Vec<u8>,
}

impl<M: Mac> Drop for HmacDrbg<M> {
    fn drop(&mut self) {
        self.k.zeroize();
        self.v.zeroize();
    }
}

impl<M: Mac> HmacDrbg<M> {
    pub fn new(mac: M) -> Self {
        HmacDrbg {
            mac,
            k: Vec::new(),
            v: Vec::new(),
        }
    }

    /// V = HMAC(K, V)
    fn refresh_v(&mut self, scratch: &mut [u8]) -> Result<(), DrbgError> {
        self.mac.init(&self.k)?;
        self.mac.update(&self.v)?;
        self.mac.finish(scratch)?;
        self.v.copy_from_slice(scratch);
        Ok(())
    }

    /// HMAC_DRBG_Update (SP 800-90A Section 10.1.2.2). `provided` is the
    /// concatenation of its slices; the second round runs only when it is
    /// non-empty.
    fn update(&mut self, provided: &[&[u8]]) -> Result<(), DrbgError> {
        let mut scratch = Zeroizing::new(vec![0u8; self.mac.mac_size()]);
        let has_data = provided.iter().any(|p| !p.is_empty());

        for round in [0x00u8, 0x01] {
            if round == 0x01 && !has_data {
                break;
            }
            // K = HMAC(K, V || round || provided_data)
            self.mac.init(&self.k)?;
            self.mac.update(&self.v)?;
            self.mac.update(&[round])?;
            for part in provided {
                self.mac.update(part)?;
            }
            self.mac.finish(&mut scratch)?;
            self.k.copy_from_slice(&scratch);

            self.refresh_v(&mut scratch)?;
        }
        Ok(())
    }
}

impl<M: Mac> Mechanism for HmacDrbg<M> {
    fn algorithm(&self) -> DrbgAlgorithm {
        DrbgAlgorithm::Hmac
    }

    fn seed_len(&self) -> usize {
        self.mac.mac_size()
    }

    fn max_security_strength(&self) -> u32 {
        max_strength_for(self.mac.mac_size())
    }

    fn default_limits(&self) -> DrbgLimits {
        DrbgLimits {
            max_request_len: MAX_REQUEST_LEN,
            reseed_interval: RESEED_INTERVAL,
        }
    }

    /// SP 800-90A Section 10.1.2.3.
    fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: &[u8],
    ) -> Result<(), DrbgError> {
        let size = self.mac.mac_size();
        // K = 0x00 00 .. 00, V = 0x01 01 .. 01
        self.k.zeroize();
        self.k.resize(size, 0x00);
        self.v.zeroize();
        self.v.resize(size, 0x01);
        self.update(&[entropy, nonce, personalization])
    }

    /// SP 800-90A Section 10.1.2.4.
    fn reseed(&mut self, entropy: &[u8], additional_input: &[u8]) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        self.update(&[entropy, additional_input])
    }

    /// SP 800-90A Section 10.1.2.5.
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: &[u8],
        _reseed_counter: u64,
    ) -> Result<(), DrbgError> {
        if self.v.is_empty() {
            return Err(DrbgError::NotInstantiated);
        }
        if !additional_input.is_empty() {
            self.update(&[additional_input])?;
        }

        let mut scratch = Zeroizing::new(vec![0u8; self.v.len()]);
        for chunk in output.chunks_mut(self.v.len()) {
            self.refresh_v(&mut scratch)?;
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }

        self.update(&[additional_input])
    }

    fn clear(&mut self) {
        self.k.zeroize();
        self.v.zeroize();
        self.mac.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drbg::generator::{Drbg, DrbgConfig};
    use crate::entropy::{EntropySourceProvider, FixedEntropyProvider};
    use crate::primitives::{HmacSha1, HmacSha256, HmacSha512};

    fn hex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    fn range(from: u8, to: u8) -> Vec<u8> {
        (from..to).collect()
    }

    fn sha1_drbg(config: DrbgConfig) -> Drbg<HmacDrbg<HmacSha1>> {
        Drbg::new(HmacDrbg::new(HmacSha1::new()), config).unwrap()
    }

    #[test]
    fn test_hmac_drbg_parameters() {
        let m = HmacDrbg::new(HmacSha1::new());
        assert_eq!(m.seed_len(), 20);
        assert_eq!(m.max_security_strength(), 128);
        let m = HmacDrbg::new(HmacSha512::new());
        assert_eq!(m.seed_len(), 64);
        assert_eq!(m.max_security_strength(), 256);
    }

    #[test]
    fn test_hmac_drbg_sha1_kat() {
        let mut drbg = sha1_drbg(DrbgConfig::default());
        drbg.instantiate(&range(0x00, 0x37), &hex("2021222324"), b"")
            .unwrap();
        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("5A7D3B449F481CB38DF79AD2B1FCC01E57F8135E8C0B22CD0630BFB0127FB5408C8EFC17A929896E")
        );
        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("82CF772EC3E84B00FC74F5DF104EFBFB2428554E9CE367D03AEADE37827FA8E9CB6A08196115D948")
        );
    }

    #[test]
    fn test_hmac_drbg_sha1_personalization() {
        let mut drbg = sha1_drbg(DrbgConfig::default());
        drbg.instantiate(&range(0x00, 0x37), &hex("2021222324"), &range(0x40, 0x67))
            .unwrap();
        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("3787053937dfc2951c3a561eeeeb64a28b1dedb4e4011de49ba74a166f5fdff133daddfbc8d75074")
        );
        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("909e617b1597f0f4423aec66930c712334b8b0464b3c59445b869bba93467936cc0d408084442312")
        );
    }

    #[test]
    fn test_hmac_drbg_sha1_prediction_resistant_kat() {
        let mut data = range(0x00, 0x37);
        data.extend(range(0x80, 0xB7));
        data.extend(range(0xC0, 0xF7));
        let provider = FixedEntropyProvider::new(&data, true);

        let mut drbg = sha1_drbg(DrbgConfig {
            prediction_resistance: true,
            ..Default::default()
        })
        .with_entropy_source(provider.get(440))
        .unwrap();
        drbg.instantiate_from_source(&hex("2021222324"), b"").unwrap();

        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("fec4597f06a3a8cc8529d59557b9e661053809c0bc0efc282abd87605cc90cba9b8633dcb1dae02e")
        );
        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("84add5e2d2041c01723a4de4335b13efdf16b0e51a0ad39bd15e862e644f31e4a2d7d843e57c5968")
        );
    }

    /// NIST CAVP HMAC_DRBG SHA-256, no prediction resistance, with reseed.
    #[test]
    fn test_hmac_drbg_sha256_cavp() {
        let mut drbg =
            Drbg::new(HmacDrbg::new(HmacSha256::new()), DrbgConfig::default()).unwrap();
        drbg.instantiate(
            &hex("cdb0d9117cc6dbc9ef9dcb06a97579841d72dc18b2d46a1cb61e314012bdf416"),
            &hex("d0c0d01d156016d0eb6b7e9c7c3c8da8"),
            &hex("6f0fb9eab3f9ea7ab0a719bfa879bf0aaed683307fda0c6d73ce018b6e34faaa"),
        )
        .unwrap();
        drbg.reseed(
            &hex("8ec6f7d5a8e2e88f43986f70b86e050d07c84b931bcf18e601c5a3eee3064c82"),
            Some(hex("1ab4ca9014fa98a55938316de8ba5a68c629b0741bdd058c4d70c91cda5099b3").as_slice()),
        )
        .unwrap();

        let mut out = vec![0u8; 128];
        let adin1 = hex("16e2d0721b58d839a122852abd3bf2c942a31c84d82fca74211871880d7162ff");
        drbg.generate(&mut out, Some(adin1.as_slice()), false).unwrap();
        let adin2 = hex("53686f042a7b087d5d2eca0d2a96de131f275ed7151189f7ca52deaa78b79fb2");
        drbg.generate(&mut out, Some(adin2.as_slice()), false).unwrap();

        assert_eq!(
            out,
            hex("dda04a2ca7b8147af1548f5d086591ca4fd951a345ce52b3cd49d47e84aa31a1\
                 83e31fbc42a1ff1d95afec7143c8008c97bc2a9c091df0a763848391f68cb4a3\
                 66ad89857ac725a53b303ddea767be8dc5f605b1b95f6d24c9f06be65a973a08\
                 9320b3cc42569dcfd4b92b62a993785b0301b3fc452445656fce22664827b88f")
        );
    }

    #[test]
    fn test_hmac_drbg_empty_additional_input_is_absent() {
        let mut a = sha1_drbg(DrbgConfig::default());
        a.instantiate(&range(0x00, 0x37), b"nonce", b"").unwrap();
        let mut b = sha1_drbg(DrbgConfig::default());
        b.instantiate(&range(0x00, 0x37), b"nonce", b"").unwrap();

        let mut out_a = [0u8; 33];
        let mut out_b = [0u8; 33];
        a.generate(&mut out_a, Some(&[][..]), false).unwrap();
        b.generate(&mut out_b, None, false).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_hmac_drbg_additional_input_changes_output() {
        let mut a = sha1_drbg(DrbgConfig::default());
        a.instantiate(&range(0x00, 0x37), b"nonce", b"").unwrap();
        let mut b = sha1_drbg(DrbgConfig::default());
        b.instantiate(&range(0x00, 0x37), b"nonce", b"").unwrap();

        let mut out_a = [0u8; 20];
        let mut out_b = [0u8; 20];
        a.generate(&mut out_a, Some(&b"extra"[..]), false).unwrap();
        b.generate(&mut out_b, None, false).unwrap();
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn test_hmac_drbg_mechanism_requires_instantiate() {
        let mut m = HmacDrbg::new(HmacSha1::new());
        let mut out = [0u8; 4];
        assert_eq!(m.generate(&mut out, &[], 1), Err(DrbgError::NotInstantiated));
        assert_eq!(m.reseed(&[0u8; 20], &[]), Err(DrbgError::NotInstantiated));
        assert_eq!(out, [0u8; 4]);
    }

    #[test]
    fn test_hmac_drbg_clear_unkeys_mac() {
        let mut m = HmacDrbg::new(HmacSha1::new());
        m.instantiate(&range(0x00, 0x37), &hex("2021222324"), b"")
            .unwrap();
        m.clear();
        assert!(m.k.is_empty() && m.v.is_empty());
        assert_eq!(
            m.mac.update(b"x"),
            Err(DrbgError::PrimitiveNotInitialized("hmac"))
        );
        let mut out = [0u8; 4];
        assert_eq!(m.generate(&mut out, &[], 1), Err(DrbgError::NotInstantiated));

        // A fresh instantiate rekeys and reproduces the known answer
        let mut drbg = Drbg::new(m, DrbgConfig::default()).unwrap();
        drbg.instantiate(&range(0x00, 0x37), &hex("2021222324"), b"")
            .unwrap();
        assert_eq!(
            drbg.generate_bytes(40).unwrap(),
            hex("5A7D3B449F481CB38DF79AD2B1FCC01E57F8135E8C0B22CD0630BFB0127FB5408C8EFC17A929896E")
        );
    }
}
