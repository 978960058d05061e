//! Known-answer vectors for every construction.
//!
//! Vectors live in `tests/vectors/drbg_kat.json`. Each case instantiates a
//! generator and replays a list of generate / reseed steps; a generate step
//! with an `expected` value must reproduce it (the value may be a prefix of
//! the requested output). Prediction-resistant cases take their entropy from
//! a fixed provider holding `entropy`, dealt out `entropyBits` at a time.

use serde::Deserialize;
use sp800_drbg::primitives::{
    Aes128Cipher, Aes256Cipher, HmacSha1, HmacSha256, Sha1Digest, Sha256Digest, Sha512Digest,
};
use sp800_drbg::{
    CtrDrbg, Drbg, DrbgConfig, EntropySourceProvider, FixedEntropyProvider, HashDrbg, HmacDrbg,
    Mechanism, X931Drbg,
};
use std::path::PathBuf;

#[derive(Deserialize)]
struct KatFile {
    #[serde(rename = "numberOfTests")]
    number_of_tests: usize,
    tests: Vec<KatTest>,
}

#[derive(Deserialize)]
struct KatTest {
    #[serde(rename = "tcId")]
    tc_id: usize,
    comment: String,
    algorithm: String,
    primitive: String,
    #[serde(default)]
    df: bool,
    #[serde(default)]
    key: String,
    #[serde(rename = "predictionResistance", default)]
    prediction_resistance: bool,
    entropy: String,
    #[serde(rename = "entropyBits", default)]
    entropy_bits: usize,
    nonce: String,
    #[serde(default)]
    personalization: String,
    steps: Vec<Step>,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Step {
    Generate {
        length: usize,
        #[serde(rename = "additionalInput", default)]
        additional_input: String,
        #[serde(default)]
        expected: String,
    },
    Reseed {
        entropy: String,
        #[serde(rename = "additionalInput", default)]
        additional_input: String,
    },
}

fn load() -> KatFile {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/vectors/drbg_kat.json");
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    serde_json::from_str(&data)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap_or_else(|e| panic!("bad hex {s:?}: {e}"))
}

fn optional(bytes: &[u8]) -> Option<&[u8]> {
    if bytes.is_empty() {
        None
    } else {
        Some(bytes)
    }
}

fn mechanism(tc: &KatTest) -> Box<dyn Mechanism> {
    match (tc.algorithm.as_str(), tc.primitive.as_str()) {
        ("Hash_DRBG", "SHA-1") => Box::new(HashDrbg::new(Sha1Digest::new())),
        ("Hash_DRBG", "SHA-256") => Box::new(HashDrbg::new(Sha256Digest::new())),
        ("Hash_DRBG", "SHA-512") => Box::new(HashDrbg::new(Sha512Digest::new())),
        ("HMAC_DRBG", "SHA-1") => Box::new(HmacDrbg::new(HmacSha1::new())),
        ("HMAC_DRBG", "SHA-256") => Box::new(HmacDrbg::new(HmacSha256::new())),
        ("CTR_DRBG", "AES-128") if tc.df => Box::new(CtrDrbg::with_df(Aes128Cipher::new())),
        ("CTR_DRBG", "AES-128") => Box::new(CtrDrbg::new(Aes128Cipher::new())),
        ("CTR_DRBG", "AES-256") if tc.df => Box::new(CtrDrbg::with_df(Aes256Cipher::new())),
        ("CTR_DRBG", "AES-256") => Box::new(CtrDrbg::new(Aes256Cipher::new())),
        ("X9.31", "AES-128") => {
            Box::new(X931Drbg::new(Aes128Cipher::new(), &unhex(&tc.key)).unwrap())
        }
        (alg, prim) => panic!("tc {}: unsupported {alg} / {prim}", tc.tc_id),
    }
}

fn run(tc: &KatTest) {
    let config = DrbgConfig {
        prediction_resistance: tc.prediction_resistance,
        ..Default::default()
    };
    let mut drbg = Drbg::new(mechanism(tc), config).unwrap();
    assert_eq!(drbg.algorithm().name(), tc.algorithm, "tc {}", tc.tc_id);

    let entropy = unhex(&tc.entropy);
    let nonce = unhex(&tc.nonce);
    let personalization = unhex(&tc.personalization);
    if tc.prediction_resistance {
        let provider = FixedEntropyProvider::new(&entropy, true);
        drbg = drbg
            .with_entropy_source(provider.get(tc.entropy_bits))
            .unwrap();
        drbg.instantiate_from_source(&nonce, &personalization)
            .unwrap_or_else(|e| panic!("tc {} instantiate: {e}", tc.tc_id));
    } else {
        drbg.instantiate(&entropy, &nonce, &personalization)
            .unwrap_or_else(|e| panic!("tc {} instantiate: {e}", tc.tc_id));
    }

    for (i, step) in tc.steps.iter().enumerate() {
        match step {
            Step::Generate {
                length,
                additional_input,
                expected,
            } => {
                let adin = unhex(additional_input);
                let mut out = vec![0u8; *length];
                drbg.generate(&mut out, optional(&adin), false)
                    .unwrap_or_else(|e| panic!("tc {} step {i}: {e}", tc.tc_id));
                let expected = unhex(expected);
                assert_eq!(
                    hex::encode(&out[..expected.len()]),
                    hex::encode(&expected),
                    "tc {} ({}) step {i}",
                    tc.tc_id,
                    tc.comment
                );
            }
            Step::Reseed {
                entropy,
                additional_input,
            } => {
                let adin = unhex(additional_input);
                drbg.reseed(&unhex(entropy), optional(&adin))
                    .unwrap_or_else(|e| panic!("tc {} step {i}: {e}", tc.tc_id));
            }
        }
    }
}

#[test]
fn drbg_known_answers() {
    let file = load();
    assert_eq!(file.tests.len(), file.number_of_tests);

    let mut tested = 0;
    for tc in &file.tests {
        run(tc);
        tested += 1;
    }
    assert!(tested >= 15, "only {tested} vectors ran");
}

#[test]
fn drbg_known_answers_cover_every_construction() {
    let file = load();
    for alg in ["Hash_DRBG", "HMAC_DRBG", "CTR_DRBG", "X9.31"] {
        assert!(
            file.tests.iter().any(|tc| tc.algorithm == alg),
            "no vector for {alg}"
        );
    }
    assert!(file.tests.iter().any(|tc| tc.prediction_resistance));
    assert!(file
        .tests
        .iter()
        .any(|tc| tc.algorithm == "CTR_DRBG" && !tc.df));
}
