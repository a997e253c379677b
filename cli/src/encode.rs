//! ABI word encoding for cross-runtime comparison
//!
//! Results are diffed byte-for-byte against an independently computed
//! on-chain value, so the encoding is fixed: big-endian 256-bit words,
//! hex, `0x`-prefixed. Unsigned values must fit `uint256`; signed values
//! are two's-complement `int256`.

use anyhow::{bail, Result};
use ethereum_types::U256;
use num_bigint::{BigInt, BigUint};
use num_traits::One;

fn word_from_biguint(v: &BigUint) -> Result<U256> {
    let bytes = v.to_bytes_be();
    if bytes.len() > 32 {
        bail!("value {v} does not fit in a 256-bit word");
    }
    Ok(U256::from_big_endian(&bytes))
}

fn push_word(out: &mut String, word: &U256) {
    let mut buf = [0u8; 32];
    word.to_big_endian(&mut buf);
    for byte in buf {
        out.push_str(&format!("{byte:02x}"));
    }
}

/// Two concatenated big-endian `uint256` words, `0x`-prefixed.
pub fn encode_uint256_pair(a: &BigUint, b: &BigUint) -> Result<String> {
    let mut out = String::with_capacity(2 + 2 * 64);
    out.push_str("0x");
    push_word(&mut out, &word_from_biguint(a)?);
    push_word(&mut out, &word_from_biguint(b)?);
    Ok(out)
}

/// One two's-complement big-endian `int256` word, `0x`-prefixed.
pub fn encode_int256(v: &BigInt) -> Result<String> {
    let half: BigInt = BigInt::one() << 255;
    if v >= &half || v < &(-&half) {
        bail!("value {v} does not fit in int256");
    }
    let wrapped = match v.to_biguint() {
        Some(unsigned) => unsigned,
        // negative: wrap modulo 2^256; in range by the check above
        None => match ((BigInt::one() << 256u32) + v).to_biguint() {
            Some(unsigned) => unsigned,
            None => bail!("value {v} does not fit in int256"),
        },
    };
    let mut out = String::with_capacity(2 + 64);
    out.push_str("0x");
    push_word(&mut out, &word_from_biguint(&wrapped)?);
    Ok(out)
}
