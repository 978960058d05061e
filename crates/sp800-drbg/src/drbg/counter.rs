//! Big-endian modular arithmetic on byte strings.

/// v = (v + addend) mod 2^(8*len(v)). `addend` is right-aligned.
pub(crate) fn add_assign(v: &mut [u8], addend: &[u8]) {
    let len = v.len();
    let alen = addend.len().min(len);
    let addend = &addend[addend.len() - alen..];
    let mut carry: u16 = 0;
    for i in (0..len).rev() {
        let a = if i >= len - alen {
            addend[i - (len - alen)] as u16
        } else {
            0
        };
        let sum = v[i] as u16 + a + carry;
        v[i] = sum as u8;
        carry = sum >> 8;
    }
}

/// v = (v + val) mod 2^(8*len(v)).
pub(crate) fn add_u64(v: &mut [u8], val: u64) {
    add_assign(v, &val.to_be_bytes());
}

/// v = (v + 1) mod 2^(8*len(v)).
pub(crate) fn increment(v: &mut [u8]) {
    for byte in v.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}
