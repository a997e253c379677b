//! High-precision decimal arithmetic for the oracle.
//!
//! `Dec` is an exact big-rational: products, quotients and integer powers
//! never lose precision. The single rounding point is [`sqrt`], which
//! truncates to a fixed number of fractional decimal digits carried by
//! [`Precision`]. The precision is threaded explicitly through every call
//! that needs it; there is no process-wide precision context.
//!
//! Calibration: with the default 40 digits, every square root carries at
//! least 40 significant digits for any operand of magnitude >= 1, which is
//! the documented floor for bit-exact comparison on the final truncated
//! integer.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{Pow, Signed};

use crate::CapError;

/// Exact rational decimal. All intermediate quantities in the oracle are
/// values of this type.
pub type Dec = BigRational;

/// Number of fractional decimal digits kept by [`sqrt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    /// Default square-root precision (fractional decimal digits).
    pub const DEFAULT_DIGITS: u32 = 40;

    pub fn new(digits: u32) -> Self {
        Precision(digits)
    }

    pub fn digits(self) -> u32 {
        self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision(Self::DEFAULT_DIGITS)
    }
}

/// Square root truncated to `precision` fractional decimal digits.
///
/// Computes `isqrt(floor(numer * 10^(2p) / denom)) / 10^p`. Exact whenever
/// the operand is a perfect square of a `p`-digit decimal (in particular for
/// perfect-square integers).
pub fn sqrt(x: &Dec, precision: Precision) -> Result<Dec, CapError> {
    if x.is_negative() {
        return Err(CapError::NegativeSqrt);
    }
    let digits = precision.digits();
    let shift: BigInt = BigInt::from(10u32).pow(2 * digits);
    // Denominator of a normalized BigRational is always positive, so this
    // floor-divides a non-negative numerator.
    let scaled: BigInt = x.numer() * shift / x.denom();
    let root = scaled.sqrt();
    Ok(Dec::new(root, BigInt::from(10u32).pow(digits)))
}

/// Exact integer power. Callers clamp the exponent before exponentiation.
pub fn powi(x: &Dec, exp: u32) -> Dec {
    x.clone().pow(exp as i32)
}

/// Exact conversion of a 1e18-scaled integer into a fraction, e.g.
/// `10^16 -> 0.01`. This is how per-step bound parameters arrive on the wire.
pub fn from_scaled_1e18(raw: u128) -> Dec {
    Dec::new(BigInt::from(raw), BigInt::from(10u64).pow(18u32))
}

pub fn from_biguint(v: &BigUint) -> Dec {
    Dec::from_integer(BigInt::from(v.clone()))
}

pub fn from_u64(v: u64) -> Dec {
    Dec::from_integer(BigInt::from(v))
}

/// Truncation toward zero (not rounding), per the wire contract.
pub fn trunc(x: &Dec) -> BigInt {
    x.to_integer()
}
