//! Constant product invariant engine (x·y=k)
//!
//! Pure, closed-form conversions between a reserve pair, its LP token supply
//! and target price ratios. Every operation is a single evaluation over
//! exact rational arithmetic; square roots round at the engine's configured
//! [`Precision`].

use crate::decimal::{self, Dec, Precision};
use crate::{CapError, EXP_PRECISION};

use num_traits::Zero;

/// Ordered pair of token balances held by the pool, indexed 0 and 1.
/// Strictly positive in all valid calls.
pub type Reserves = [Dec; 2];

/// The opposite index of a two-token pool.
#[inline]
pub fn other(j: usize) -> usize {
    1 - j
}

/// Invariant engine with an explicit square-root precision, constructed once
/// per computation.
#[derive(Debug, Clone, Copy)]
pub struct ConstantProduct {
    precision: Precision,
}

impl ConstantProduct {
    pub fn new(precision: Precision) -> Self {
        ConstantProduct { precision }
    }

    fn exp_precision(&self) -> Dec {
        decimal::from_u64(EXP_PRECISION)
    }

    /// Proportional share of the reserves backing `lp_amount` LP tokens:
    /// `lp_amount * reserve[i] / lp_supply` for each index.
    pub fn lp_underlying(
        &self,
        lp_amount: &Dec,
        reserves: &Reserves,
        lp_supply: &Dec,
    ) -> Result<Reserves, CapError> {
        if lp_supply.is_zero() {
            return Err(CapError::ZeroSupply);
        }
        Ok([
            lp_amount * &reserves[0] / lp_supply,
            lp_amount * &reserves[1] / lp_supply,
        ])
    }

    /// LP token supply implied by a reserve pair:
    /// `sqrt(reserve0 * reserve1 * EXP_PRECISION)`.
    pub fn supply_from_reserves(&self, reserves: &Reserves) -> Result<Dec, CapError> {
        let product = &reserves[0] * &reserves[1] * self.exp_precision();
        decimal::sqrt(&product, self.precision)
    }

    /// Solves the invariant for the reserve at index `j` given a target
    /// supply, holding the opposite reserve fixed:
    /// `supply^2 / (reserve[1-j] * EXP_PRECISION)`.
    ///
    /// Note the index relationship: the value associated with index `j` is
    /// computed from the reserve at the opposite index. The capper logic
    /// depends on exactly this pairing.
    pub fn reserve_from_supply(
        &self,
        reserves: &Reserves,
        j: usize,
        supply: &Dec,
    ) -> Result<Dec, CapError> {
        let i = other(j);
        if reserves[i].is_zero() {
            return Err(CapError::ZeroReserve);
        }
        Ok(supply * supply / (&reserves[i] * self.exp_precision()))
    }

    /// Reserve at index `j` after moving the pool to ratio
    /// `ratios[j]/ratios[1-j]` via a swap, holding the product invariant
    /// constant: `sqrt(reserve[1-j] * reserve[j] * ratios[j] / ratios[1-j])`.
    pub fn reserve_at_ratio_swap(
        &self,
        reserves: &Reserves,
        j: usize,
        ratios: &[Dec; 2],
    ) -> Result<Dec, CapError> {
        let i = other(j);
        if ratios[i].is_zero() {
            return Err(CapError::ZeroRatio);
        }
        let scaled = &reserves[i] * &reserves[j] * &ratios[j] / &ratios[i];
        decimal::sqrt(&scaled, self.precision)
    }

    /// Reserve at index `j` after moving to the target ratio via proportional
    /// liquidity change (invariant not held): `reserve[1-j] * ratios[j] / ratios[1-j]`.
    pub fn reserve_at_ratio_liquidity(
        &self,
        reserves: &Reserves,
        j: usize,
        ratios: &[Dec; 2],
    ) -> Result<Dec, CapError> {
        let i = other(j);
        if ratios[i].is_zero() {
            return Err(CapError::ZeroRatio);
        }
        Ok(&reserves[i] * &ratios[j] / &ratios[i])
    }

    /// Pairwise rate `reserve[i] / reserve[j]`, the instantaneous exchange
    /// price of token `j` in token `i`.
    pub fn rate(&self, reserves: &Reserves, i: usize, j: usize) -> Result<Dec, CapError> {
        if reserves[j].is_zero() {
            return Err(CapError::ZeroReserve);
        }
        Ok(&reserves[i] / &reserves[j])
    }
}
