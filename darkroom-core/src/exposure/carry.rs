//! Bounded carry accumulator

use crate::config::Bounds;
use crate::fixed::Fix24;

/// Add `delta` to `var`, clamping to `bounds`
///
/// Returns the part of `delta` that did not fit: negative when `var` hit
/// the lower bound, positive when it hit the upper bound, zero otherwise.
/// After the call `var` lies within `bounds` and
/// `var_after - var_before + carry == delta` exactly.
///
/// `var` must start within `bounds`.
pub fn modify_var_with_carry(var: &mut Fix24, delta: Fix24, bounds: Bounds) -> Fix24 {
    debug_assert!(bounds.contains(*var), "carry variable starts out of bounds");

    if delta < -bounds.headroom_down(*var) {
        // Underflow: absorb what fits, carry the rest
        let carry = delta + bounds.headroom_down(*var);
        *var = bounds.min;
        carry
    } else if delta > bounds.headroom_up(*var) {
        // Overflow
        let carry = delta - bounds.headroom_up(*var);
        *var = bounds.max;
        carry
    } else {
        *var += delta;
        Fix24::ZERO
    }
}
