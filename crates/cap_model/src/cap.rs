//! Two-stage bounded reserve update
//!
//! [`cap_lp_supply`] clamps the implied LP-supply change (magnitude),
//! [`cap_ratios`] clamps the price ratio change (rate), and [`cap_reserves`]
//! composes them: magnitude first, ratio second, in a single non-iterated
//! pass. The ratio stage runs on the magnitude stage's output, so the final
//! pair can land slightly outside the supply band again; that is accepted
//! behavior and must not be "fixed" into a combined clamp or a fixed-point
//! loop, or differential comparison against the on-chain side breaks.

use log::debug;
use num_traits::{One, Zero};

use crate::decimal::{powi, Dec};
use crate::invariant::{ConstantProduct, Reserves};
use crate::{CapError, MAX_CAP_EXPONENT};

/// 2x2 table of per-step maximum fractional rate increases, indexed by
/// direction. Diagonal entries are unused and held at a neutral zero
/// placeholder.
pub type RateBounds = [[Dec; 2]; 2];

fn ensure_positive(reserves: &Reserves) -> Result<(), CapError> {
    if reserves[0] <= Dec::zero() || reserves[1] <= Dec::zero() {
        return Err(CapError::ZeroReserve);
    }
    Ok(())
}

/// Clamps a candidate's pairwise rate to an exponential bound around the
/// last accepted rate.
///
/// The bound matrix is `max[0][1] = r01_last * (1+bounds[0][1])^c` and
/// `max[1][0] = (1/r01_last) * (1+bounds[1][0])^c` with `c` the clamped step
/// count. If the candidate exceeds a bound, both reserves are replaced by
/// the swap projection onto the bound ratio, which keeps the output on the
/// candidate's own constant-product curve. At most one branch fires:
/// `ratio01 * ratio10 = 1` while `max01 * max10 >= 1`, so the conditions are
/// mutually exclusive for positive reserves.
///
/// `verbose` only emits debug diagnostics; it never changes the result.
pub fn cap_ratios(
    cp: &ConstantProduct,
    last: &Reserves,
    candidate: &Reserves,
    cap_exponent: u32,
    max_rate_changes: &RateBounds,
    verbose: bool,
) -> Result<Reserves, CapError> {
    let cap_exponent = cap_exponent.min(MAX_CAP_EXPONENT);
    let r01_last = cp.rate(last, 0, 1)?;

    let growth01 = powi(&(Dec::one() + &max_rate_changes[0][1]), cap_exponent);
    let growth10 = powi(&(Dec::one() + &max_rate_changes[1][0]), cap_exponent);
    if verbose {
        debug!("rate growth factors: 0->1 {growth01}, 1->0 {growth10}");
    }

    let max01 = &r01_last * growth01;
    let max10 = Dec::one() / &r01_last * growth10;
    if verbose {
        debug!("rate bound matrix: max[0][1] = {max01}, max[1][0] = {max10}");
    }
    let rs_max: RateBounds = [[Dec::zero(), max01], [max10, Dec::zero()]];

    let mut capped = candidate.clone();
    if cp.rate(candidate, 0, 1)? > rs_max[0][1] {
        if verbose {
            debug!("capping rate 0->1 at {}", rs_max[0][1]);
        }
        let target = [rs_max[0][1].clone(), Dec::one()];
        capped[0] = cp.reserve_at_ratio_swap(candidate, 0, &target)?;
        capped[1] = cp.reserve_at_ratio_swap(candidate, 1, &target)?;
    } else if cp.rate(candidate, 1, 0)? > rs_max[1][0] {
        if verbose {
            debug!("capping rate 1->0 at {}", rs_max[1][0]);
        }
        let target = [Dec::one(), rs_max[1][0].clone()];
        capped[0] = cp.reserve_at_ratio_swap(candidate, 0, &target)?;
        capped[1] = cp.reserve_at_ratio_swap(candidate, 1, &target)?;
    }
    Ok(capped)
}

/// Clamps a candidate's implied LP supply to an exponential band around the
/// last accepted supply.
///
/// Out-of-band candidates are rescaled proportionally (both reserves by the
/// same factor, via the proportional-share formula) so the implied supply
/// lands exactly on the band edge while the candidate's ratio is preserved.
pub fn cap_lp_supply(
    cp: &ConstantProduct,
    last: &Reserves,
    candidate: &Reserves,
    cap_exponent: u32,
    max_lp_increase: &Dec,
    max_lp_decrease: &Dec,
) -> Result<Reserves, CapError> {
    let cap_exponent = cap_exponent.min(MAX_CAP_EXPONENT);
    let supply_last = cp.supply_from_reserves(last)?;
    let supply_candidate = cp.supply_from_reserves(candidate)?;

    let supply_max = &supply_last * powi(&(Dec::one() + max_lp_increase), cap_exponent);
    let supply_min = &supply_last * powi(&(Dec::one() - max_lp_decrease), cap_exponent);

    if supply_candidate > supply_max {
        cp.lp_underlying(&supply_max, candidate, &supply_candidate)
    } else if supply_candidate < supply_min {
        cp.lp_underlying(&supply_min, candidate, &supply_candidate)
    } else {
        Ok(candidate.clone())
    }
}

/// Derives the accepted reserve pair for this step: magnitude cap, then rate
/// cap, on a step count clamped to [`MAX_CAP_EXPONENT`].
///
/// The clamp here is redundant with the ones inside both stages and is
/// idempotent by construction.
#[allow(clippy::too_many_arguments)]
pub fn cap_reserves(
    cp: &ConstantProduct,
    last: &Reserves,
    candidate: &Reserves,
    cap_exponent: u32,
    max_lp_increase: &Dec,
    max_lp_decrease: &Dec,
    max_rate_changes: &RateBounds,
    verbose: bool,
) -> Result<Reserves, CapError> {
    ensure_positive(last)?;
    ensure_positive(candidate)?;
    let cap_exponent = cap_exponent.min(MAX_CAP_EXPONENT);

    let partial = cap_lp_supply(
        cp,
        last,
        candidate,
        cap_exponent,
        max_lp_increase,
        max_lp_decrease,
    )?;
    if verbose {
        debug!("partial (magnitude-capped): [{}, {}]", partial[0], partial[1]);
    }

    cap_ratios(cp, last, &partial, cap_exponent, max_rate_changes, verbose)
}
