//! Transcendental functions on Q8.24 values
//!
//! log2 and exp2 reduce their argument into [1, 2) by shifting the raw bit
//! pattern, then evaluate a 65-entry table with linear interpolation.
//! sqrt uses Newton-Raphson on an argument normalized into [1, 4).
//!
//! Inputs outside the documented domains are programming errors: they trip
//! a debug assertion and give an unspecified (but non-hanging) result in
//! release builds.

use super::tables::{EXP2_TABLE, LOG2_TABLE, TABLE_DEGREE};
use super::Fix24;

/// Newton-Raphson stops once |y² - x| is below this (about 1e-4)
pub const SQRT_EPS: Fix24 = Fix24::from_raw(1678);

/// Iteration cap; the closed-form first step converges in at most 4
const SQRT_MAX_STEPS: u32 = 16;

/// exp2 overflows Q8.24 at and beyond this magnitude
const EXP2_LIMIT: Fix24 = Fix24::from_int(7);

/// Evaluate a sampled function with linear interpolation
///
/// `x` must lie in [1, 2). `table` holds `2^degree + 1` samples of f on
/// evenly spaced points spanning [1, 2]. The top `degree` bits of the
/// fractional part of x select the lower sample; the remaining bits are the
/// interpolation fraction towards the next one.
pub fn interpolate_table(x: Fix24, table: &[i32], degree: u32) -> Fix24 {
    debug_assert!(x >= Fix24::ONE && x < Fix24::TWO, "table input outside [1, 2)");
    debug_assert_eq!(table.len(), (1 << degree) + 1);

    let shift = Fix24::FRAC_BITS - degree;
    let frac = (x - Fix24::ONE).raw();
    let i0 = (frac >> shift) as usize;
    let rem = Fix24::from_raw((frac - ((i0 as i32) << shift)) << degree);

    let y0 = Fix24::from_raw(table[i0]);
    let y1 = Fix24::from_raw(table[i0 + 1]);

    y0 + (y1 - y0) * rem
}

/// Shift `raw` until it lies in [1, 2), counting doublings as negative
/// and halvings as positive steps.
fn normalize_unit_octave(mut raw: i32) -> (i32, i32) {
    let mut n = 0;
    while raw >= Fix24::TWO.raw() {
        raw >>= 1;
        n += 1;
    }
    while raw < Fix24::ONE.raw() {
        raw <<= 1;
        n -= 1;
    }
    (raw, n)
}

/// Base-2 logarithm
///
/// Uses log2(x) = n + log2(x / 2^n) with x / 2^n in [1, 2).
///
/// Precondition: x > 0. Returns [`Fix24::MIN`] otherwise.
pub fn log2(x: Fix24) -> Fix24 {
    debug_assert!(x > Fix24::ZERO, "log2 of non-positive value");
    if x <= Fix24::ZERO {
        return Fix24::MIN;
    }

    let (raw, n) = normalize_unit_octave(x.raw());
    let y = interpolate_table(Fix24::from_raw(raw), &LOG2_TABLE, TABLE_DEGREE);

    Fix24::from_int(n) + y
}

/// Power of two
///
/// Positive arguments are halved or doubled into [1, 2), looked up, and the
/// reduction undone with 2^x = (2^(x/2))² (squaring) or its inverse
/// (square root). Negative arguments use 2^x = 1 / 2^-x.
///
/// Precondition: |x| < 7, beyond which the result is not representable.
pub fn exp2(x: Fix24) -> Fix24 {
    if x.is_zero() {
        return Fix24::ONE;
    }
    debug_assert!(x.abs() < EXP2_LIMIT, "exp2 argument out of range");
    if x.is_negative() {
        return Fix24::ONE / exp2(-x);
    }

    let (raw, n) = normalize_unit_octave(x.raw());
    let mut y = interpolate_table(Fix24::from_raw(raw), &EXP2_TABLE, TABLE_DEGREE);

    for _ in 0..n {
        y = y * y;
    }
    for _ in n..0 {
        y = sqrt(y);
    }

    y
}

/// Square root
///
/// x is scaled into [1, 4) by factors of 4 so that the root lies in [1, 2).
/// The first Newton step from y = 1 is unrolled to y = 1 - (1 - x) / 2.
///
/// Precondition: x >= 0. Returns zero for negative input.
pub fn sqrt(x: Fix24) -> Fix24 {
    if x.is_zero() {
        return Fix24::ZERO;
    }
    debug_assert!(x > Fix24::ZERO, "sqrt of negative value");
    if x.is_negative() {
        return Fix24::ZERO;
    }

    let mut raw = x.raw();
    let mut n: i32 = 0;
    while raw < Fix24::ONE.raw() {
        raw <<= 2;
        n -= 1;
    }
    while raw >= Fix24::FOUR.raw() {
        raw >>= 2;
        n += 1;
    }
    let x = Fix24::from_raw(raw);

    let mut y = Fix24::ONE - (Fix24::ONE - x) / Fix24::TWO;
    let mut error = y * y - x;

    let mut steps = 0;
    while error.abs() > SQRT_EPS && steps < SQRT_MAX_STEPS {
        y -= error / (Fix24::TWO * y);
        error = y * y - x;
        steps += 1;
    }

    // sqrt(x * 4^n) = sqrt(x) * 2^n
    if n > 0 {
        Fix24::from_raw(y.raw() << n)
    } else if n < 0 {
        Fix24::from_raw(y.raw() >> -n)
    } else {
        y
    }
}
