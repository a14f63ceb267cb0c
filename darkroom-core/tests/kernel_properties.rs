//! Property tests for the fixed-point transcendental kernel

use darkroom_core::fixed::{exp2, log2, sqrt, Fix24, SQRT_EPS};
use proptest::prelude::*;

proptest! {
    /// Property: log2 undoes exp2 across the representable domain
    #[test]
    fn log2_of_exp2_round_trips(x in -6.0f64..6.0) {
        let x = Fix24::from_f64(x);
        let back = log2(exp2(x));
        prop_assert!((back - x).to_f64().abs() < 1e-3, "x = {:?}, back = {:?}", x, back);
    }

    /// Property: exp2 undoes log2 within 0.1% relative error
    #[test]
    fn exp2_of_log2_round_trips(x in 0.01f64..100.0) {
        let fx = Fix24::from_f64(x);
        let back = exp2(log2(fx)).to_f64();
        prop_assert!(((back - fx.to_f64()) / fx.to_f64()).abs() < 1e-3);
    }

    /// Property: log2 agrees with the floating-point reference
    #[test]
    fn log2_matches_reference(x in 0.001f64..127.0) {
        let y = log2(Fix24::from_f64(x)).to_f64();
        prop_assert!((y - x.log2()).abs() < 1e-4);
    }

    /// Property: sqrt(x)² is within the Newton tolerance of x
    #[test]
    fn sqrt_squares_back(x in 0.0001f64..127.0) {
        let fx = Fix24::from_f64(x);
        let y = sqrt(fx);
        let err = (y.to_f64() * y.to_f64() - fx.to_f64()).abs();
        prop_assert!(err <= SQRT_EPS.to_f64() * fx.to_f64().max(1.0) + 1e-5);
    }

    /// Property: exp2 is positive and increasing
    #[test]
    fn exp2_increasing(a in -6.0f64..6.0, step in 0.01f64..0.5) {
        let lo = exp2(Fix24::from_f64(a));
        let hi = exp2(Fix24::from_f64(a + step));
        prop_assert!(lo > Fix24::ZERO);
        prop_assert!(hi > lo);
    }
}

#[test]
fn exact_special_values() {
    assert_eq!(exp2(Fix24::ZERO), Fix24::ONE);
    assert_eq!(sqrt(Fix24::ZERO), Fix24::ZERO);
    assert_eq!(log2(Fix24::ONE), Fix24::ZERO);
}
