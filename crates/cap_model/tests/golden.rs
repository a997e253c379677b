//! Golden vectors for the capped-reserve oracle
//!
//! Expected integers were pinned once from the reference semantics (exact
//! rational arithmetic, 40-digit truncated square roots) and must never be
//! regenerated casually: downstream comparison is bit-exact on the truncated
//! output.

use cap_model::decimal::{from_scaled_1e18, trunc};
use cap_model::{cap_reserves, ConstantProduct, Dec, Precision, RateBounds, Reserves};

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use std::str::FromStr;

/// 0.01 per step, 1e18-scaled.
const PCT1: u128 = 10_000_000_000_000_000;

struct Vector {
    last: [&'static str; 2],
    candidate: [&'static str; 2],
    cap_exponent: u32,
    max_lp_increase: u128,
    max_lp_decrease: u128,
    max_rate_01: u128,
    max_rate_10: u128,
    expected: [&'static str; 2],
}

fn reserves(pair: [&str; 2]) -> Reserves {
    [
        Dec::from_integer(BigInt::from(BigUint::from_str(pair[0]).unwrap())),
        Dec::from_integer(BigInt::from(BigUint::from_str(pair[1]).unwrap())),
    ]
}

fn run(v: &Vector) -> [BigInt; 2] {
    let cp = ConstantProduct::new(Precision::default());
    let bounds: RateBounds = [
        [Dec::zero(), from_scaled_1e18(v.max_rate_01)],
        [from_scaled_1e18(v.max_rate_10), Dec::zero()],
    ];
    let out = cap_reserves(
        &cp,
        &reserves(v.last),
        &reserves(v.candidate),
        v.cap_exponent,
        &from_scaled_1e18(v.max_lp_increase),
        &from_scaled_1e18(v.max_lp_decrease),
        &bounds,
        false,
    )
    .unwrap();
    [trunc(&out[0]), trunc(&out[1])]
}

fn check(v: &Vector) {
    let got = run(v);
    assert_eq!(got[0], BigInt::from_str(v.expected[0]).unwrap(), "reserve 0");
    assert_eq!(got[1], BigInt::from_str(v.expected[1]).unwrap(), "reserve 1");
}

#[test]
fn golden_doubled_reserve1_both_caps_fire() {
    // magnitude cap shrinks onto the supply band, rate cap then pins the
    // 1->0 ratio at 1.01
    check(&Vector {
        last: ["1000", "1000"],
        candidate: ["1000", "2000"],
        cap_exponent: 1,
        max_lp_increase: PCT1,
        max_lp_decrease: PCT1,
        max_rate_01: PCT1,
        max_rate_10: PCT1,
        expected: ["1004", "1015"],
    });
}

#[test]
fn golden_unchanged_candidate_passes_through() {
    check(&Vector {
        last: ["1000000000000000000000000", "2000000000000000000000000"],
        candidate: ["1000000000000000000000000", "2000000000000000000000000"],
        cap_exponent: 10,
        max_lp_increase: PCT1,
        max_lp_decrease: PCT1,
        max_rate_01: PCT1,
        max_rate_10: PCT1,
        expected: [
            "1000000000000000000000000",
            "2000000000000000000000000",
        ],
    });
}

#[test]
fn golden_ratio_tripled_two_steps() {
    check(&Vector {
        last: ["1000000000000000000000000", "1000000000000000000000000"],
        candidate: ["3000000000000000000000000", "1000000000000000000000000"],
        cap_exponent: 2,
        max_lp_increase: 5 * PCT1,
        max_lp_decrease: 5 * PCT1,
        max_rate_01: PCT1,
        max_rate_10: PCT1,
        expected: [
            "1113525000000000000000000",
            "1091584158415841584158415",
        ],
    });
}

#[test]
fn golden_lp_drain_grows_to_band_floor() {
    // candidate removes 99% of the pool; three steps of 1% decrease allow
    // exactly 0.99^3 = 0.970299 of the last supply
    check(&Vector {
        last: ["1000000000000000000000000", "1000000000000000000000000"],
        candidate: ["10000000000000000000000", "10000000000000000000000"],
        cap_exponent: 3,
        max_lp_increase: PCT1,
        max_lp_decrease: PCT1,
        max_rate_01: 10 * PCT1,
        max_rate_10: 10 * PCT1,
        expected: [
            "970299000000000000000000",
            "970299000000000000000000",
        ],
    });
}

#[test]
fn golden_step_count_clamped_at_ceiling() {
    // with a 1e-9 per-step rate bound the cap still binds at 14000 steps, so
    // 20000 and 14000 must produce identical output
    let tight = Vector {
        last: ["1000000000000000000000", "1000000000000000000000"],
        candidate: ["5000000000000000000000", "100000000000000000000"],
        cap_exponent: 20000,
        max_lp_increase: 999999999999999999,
        max_lp_decrease: 999999999999999999,
        max_rate_01: 1_000_000_000,
        max_rate_10: 1_000_000_000,
        expected: ["707111730951337511904", "707101831456405769140"],
    };
    check(&tight);
    check(&Vector {
        cap_exponent: 14000,
        ..tight
    });
}

#[test]
fn golden_step_zero_collapses_band() {
    check(&Vector {
        last: ["1000", "1000"],
        candidate: ["4000", "4000"],
        cap_exponent: 0,
        max_lp_increase: PCT1,
        max_lp_decrease: PCT1,
        max_rate_01: 999999999999999999,
        max_rate_10: 999999999999999999,
        expected: ["1000", "1000"],
    });
}

#[test]
fn golden_wide_asymmetric_bounds() {
    check(&Vector {
        last: ["123456789000000000000000", "987654321000000000000000"],
        candidate: ["23456789000000000000000", "887654321000000000000000"],
        cap_exponent: 7,
        max_lp_increase: 2 * PCT1,
        max_lp_decrease: 3 * PCT1,
        max_rate_01: 4 * PCT1,
        max_rate_10: 5 * PCT1,
        expected: ["84091978440066325843433", "946606875866095873450597"],
    });
}
