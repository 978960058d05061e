#![no_main]
use libfuzzer_sys::fuzz_target;
use sp800_drbg::primitives::{Aes128Cipher, HmacSha256, Sha256Digest};
use sp800_drbg::{CtrDrbg, Drbg, DrbgConfig, HashDrbg, HmacDrbg, Mechanism, X931Drbg};

// Input: selector byte, then 0xFF-separated fields:
// entropy, nonce, personalization, then one field per generate call.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let mechanism: Box<dyn Mechanism> = match selector % 5 {
        0 => Box::new(HashDrbg::new(Sha256Digest::new())),
        1 => Box::new(HmacDrbg::new(HmacSha256::new())),
        2 => Box::new(CtrDrbg::new(Aes128Cipher::new())),
        3 => Box::new(CtrDrbg::with_df(Aes128Cipher::new())),
        _ => match X931Drbg::new(Aes128Cipher::new(), &[0x2B; 16]) {
            Ok(m) => Box::new(m),
            Err(_) => return,
        },
    };
    let Ok(mut drbg) = Drbg::new(mechanism, DrbgConfig::default()) else {
        return;
    };

    let mut fields = rest.split(|&b| b == 0xFF);
    let entropy = fields.next().unwrap_or_default();
    let nonce = fields.next().unwrap_or_default();
    let personalization = fields.next().unwrap_or_default();
    if drbg.instantiate(entropy, nonce, personalization).is_err() {
        return;
    }

    for field in fields {
        let len = field.first().map_or(0, |&b| b as usize * 4);
        let mut out = vec![0u8; len];
        if drbg.generate(&mut out, Some(field), false).is_err() {
            assert!(out.iter().all(|&b| b == 0));
        }
        if field.len() % 3 == 0 {
            let _ = drbg.reseed(field, None);
        }
    }
});
