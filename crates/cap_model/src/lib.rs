//! Cap Model - Pure constant product math (x·y=k) with bounded reserve updates
//!
//! This crate is the reference oracle for a constant-product AMM's capped
//! reserve update: given the last accepted reserves and a candidate pair, it
//! limits (a) the instantaneous price ratio change and (b) the implied
//! LP-supply change, both as per-block exponential growth caps, and projects
//! out-of-band candidates back onto the allowed boundary.
//!
//! All arithmetic is exact rational (`num-rational`); only square roots round,
//! and they round at an explicit, configurable precision (40 decimal digits by
//! default). There is no global precision state. Results are exposed as exact
//! integers via truncation, compatible with a big-endian 256-bit wire
//! encoding computed by the caller.

use thiserror::Error;

pub mod cap;
pub mod decimal;
pub mod invariant;

pub use cap::{cap_lp_supply, cap_ratios, cap_reserves, RateBounds};
pub use decimal::{Dec, Precision};
pub use invariant::{other, ConstantProduct, Reserves};

/// Fixed precision constant applied under the square root when deriving the
/// LP supply from reserves (1e12). Avoids precision loss from the square root
/// of a product of large integers.
pub const EXP_PRECISION: u64 = 1_000_000_000_000;

/// Ceiling applied to the step count before any exponentiation. A safety
/// valve against numeric blow-up, applied identically in both capping stages.
pub const MAX_CAP_EXPONENT: u32 = 14_000;

/// Error types for capped-reserve computations.
///
/// All of these are precondition violations: the computation is undefined on
/// such inputs and the caller is expected to validate before calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapError {
    /// A reserve that is divided by is zero (or a reserve pair is not
    /// strictly positive).
    #[error("reserve must be strictly positive")]
    ZeroReserve,
    /// LP token supply of zero in a proportional-share division.
    #[error("lp token supply must be non-zero")]
    ZeroSupply,
    /// A target ratio entry that is divided by is zero.
    #[error("target ratio entry must be non-zero")]
    ZeroRatio,
    /// Square root of a negative quantity.
    #[error("square root of a negative value")]
    NegativeSqrt,
}
