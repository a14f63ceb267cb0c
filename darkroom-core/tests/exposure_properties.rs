//! Property tests for the exposure reciprocity engine

use darkroom_core::exposure::ZAPSMALL_EPS;
use darkroom_core::{Exposure, ExposureCommand, ExposureLimits, Fix24};
use proptest::prelude::*;

fn fx(range: core::ops::Range<f64>) -> impl Strategy<Value = Fix24> {
    range.prop_map(Fix24::from_f64)
}

/// Any state within the default limits
fn exposure_strategy() -> impl Strategy<Value = Exposure> {
    (fx(2.0..5.0), fx(-5.0..0.0), fx(1.0..5.0), fx(8.0..14.0)).prop_map(
        |(log2_t, log2_phi, log2_n2, log2_s2)| {
            Exposure::new(ExposureLimits::default(), log2_t, log2_phi, log2_n2, log2_s2)
                .expect("strategy stays within default limits")
        },
    )
}

fn command_strategy() -> impl Strategy<Value = ExposureCommand> {
    prop_oneof![
        fx(-8.0..8.0).prop_map(ExposureCommand::ChangeExposure),
        fx(-4.0..4.0).prop_map(ExposureCommand::ChangeLog2Time),
        fx(-127.0..127.0).prop_map(ExposureCommand::ChangeTime),
        (-200_000i32..200_000).prop_map(ExposureCommand::ChangeTimeMillis),
        fx(1.0..6.0).prop_map(ExposureCommand::SetAperture),
        fx(10.0..127.0).prop_map(ExposureCommand::SetDistance),
    ]
}

fn assert_within_limits(e: &Exposure) -> Result<(), TestCaseError> {
    let limits = e.limits();
    prop_assert!(limits.log2_t.contains(e.log2_t()));
    prop_assert!(limits.log2_phi.contains(e.log2_phi()));
    prop_assert!(limits.log2_n2.contains(e.log2_n2()));
    prop_assert!(limits.log2_s2.contains(e.log2_s2()));
    Ok(())
}

proptest! {
    /// Property: the reciprocity law and every bound hold after each command
    #[test]
    fn law_holds_after_any_sequence(
        mut exposure in exposure_strategy(),
        commands in prop::collection::vec(command_strategy(), 1..30),
    ) {
        for command in commands {
            exposure.apply(command);
            prop_assert_eq!(exposure.discrepancy(), Fix24::ZERO);
            assert_within_limits(&exposure)?;
        }
    }

    /// Property: time and setpoint changes never move total exposure
    #[test]
    fn holding_commands_preserve_total_exposure(
        mut exposure in exposure_strategy(),
        command in command_strategy(),
    ) {
        let before = exposure.log2_h();
        exposure.apply(command);
        match command {
            ExposureCommand::ChangeExposure(_) => {}
            ExposureCommand::SetAperture(_) | ExposureCommand::SetDistance(_) => {
                prop_assert!((exposure.log2_h() - before).abs() < ZAPSMALL_EPS);
            }
            _ => prop_assert_eq!(exposure.log2_h(), before),
        }
    }

    /// Property: a refused setpoint leaves every field untouched
    #[test]
    fn refused_setpoints_are_no_ops(
        exposure in exposure_strategy(),
        n in fx(1.0..6.0),
        s in fx(10.0..127.0),
    ) {
        let mut e = exposure.clone();
        if !e.set_n(n).is_zero() {
            prop_assert_eq!(&e, &exposure);
        }

        let mut e = exposure.clone();
        if !e.set_s(s).is_zero() {
            prop_assert_eq!(&e, &exposure);
        }
    }

    /// Property: an accepted setpoint lands on the requested value
    #[test]
    fn accepted_aperture_is_committed(exposure in exposure_strategy(), n in fx(1.5..5.5)) {
        let mut e = exposure.clone();
        if e.set_n(n).is_zero() {
            let expected = n.log2() + n.log2();
            prop_assert!((e.log2_n2() - expected).abs() < ZAPSMALL_EPS);
        }
    }

    /// Property: a change that fits in the lamp output leaves time alone
    #[test]
    fn exposure_change_prefers_output(exposure in exposure_strategy(), frac in 0.0f64..1.0) {
        let mut e = exposure.clone();
        let limits = *e.limits();
        let down = limits.log2_phi.headroom_down(e.log2_phi()).to_f64();
        let up = limits.log2_phi.headroom_up(e.log2_phi()).to_f64();
        let delta = Fix24::from_f64(-down + frac * (down + up));
        prop_assume!(limits.log2_phi.contains(e.log2_phi() + delta));

        let carry = e.change_log2_h(delta);
        prop_assert_eq!(carry, Fix24::ZERO);
        prop_assert_eq!(e.log2_t(), exposure.log2_t());
        prop_assert_eq!(e.log2_phi(), exposure.log2_phi() + delta);
    }

    /// Property: output spills into time once it is exhausted
    #[test]
    fn exposure_change_cascades_into_time(exposure in exposure_strategy(), frac in 0.01f64..0.99) {
        let mut e = exposure.clone();
        let limits = *e.limits();
        let output_room = limits.log2_phi.headroom_up(e.log2_phi());
        let time_room = limits.log2_t.headroom_up(e.log2_t());
        let delta = output_room + Fix24::from_f64(frac * time_room.to_f64());
        prop_assume!(delta > output_room);

        let carry = e.change_log2_h(delta);
        prop_assert_eq!(carry, Fix24::ZERO);
        prop_assert_eq!(e.log2_phi(), limits.log2_phi.max);
        prop_assert_eq!(e.log2_t(), exposure.log2_t() + delta - output_room);
    }

    /// Property: beyond both headrooms the carry is exactly the excess
    #[test]
    fn exposure_change_exhausts_both(exposure in exposure_strategy(), excess in 0.001f64..10.0) {
        let mut e = exposure.clone();
        let limits = *e.limits();
        let combined = limits.log2_phi.headroom_down(e.log2_phi())
            + limits.log2_t.headroom_down(e.log2_t());
        let delta = -combined - Fix24::from_f64(excess);

        let carry = e.change_log2_h(delta);
        prop_assert_eq!(e.log2_phi(), limits.log2_phi.min);
        prop_assert_eq!(e.log2_t(), limits.log2_t.min);
        prop_assert_eq!(carry, delta + combined);
    }

    /// Property: a linear time request never moves time the other way
    #[test]
    fn linear_time_change_keeps_direction(
        exposure in exposure_strategy(),
        delta in fx(-127.0..127.0),
    ) {
        let mut e = exposure.clone();
        e.change_t(delta);
        // Allow for log2/exp2 round-trip noise
        let noise = Fix24::from_f64(1e-3);
        if delta > Fix24::ZERO {
            prop_assert!(e.log2_t() >= exposure.log2_t() - noise);
        } else {
            prop_assert!(e.log2_t() <= exposure.log2_t() + noise);
        }
    }

    /// Property: time change plus carry accounts for the whole request
    #[test]
    fn time_change_accounting(exposure in exposure_strategy(), delta in fx(-4.0..4.0)) {
        let mut e = exposure.clone();
        let carry = e.change_log2_t(delta);
        prop_assert_eq!(e.log2_t() - exposure.log2_t() + carry, delta);
        prop_assert_eq!(e.log2_h(), exposure.log2_h());
    }
}

#[test]
fn doubling_time_halves_output() {
    let limits = ExposureLimits::default();
    let mut e = Exposure::new(
        limits,
        Fix24::from_int(3),
        Fix24::ZERO,
        Fix24::from_int(3),
        Fix24::from_int(10),
    )
    .unwrap();
    let h = e.log2_h();

    assert_eq!(e.change_log2_t(Fix24::ONE), Fix24::ZERO);
    assert_eq!(e.log2_phi(), -Fix24::ONE);
    assert_eq!(e.log2_t(), Fix24::from_int(4));
    assert_eq!(e.log2_h(), h);
}

#[test]
fn output_floor_limits_time_change() {
    let limits = ExposureLimits::default();
    let mut e = Exposure::new(
        limits,
        Fix24::from_int(2),
        Fix24::from_int(-4),
        Fix24::from_int(3),
        Fix24::from_int(10),
    )
    .unwrap();
    let h = e.log2_h();

    // Asking for 8x the time: the lamp can only drop one more stop
    let carry = e.change_log2_t(Fix24::from_int(3));
    assert_eq!(e.log2_phi(), limits.log2_phi.min);
    assert_eq!(carry, Fix24::TWO);
    assert_eq!(e.log2_t(), Fix24::from_int(3));
    assert_eq!(e.log2_h(), h);
}
