//! Tests for the unit conversion library.

use aquastreamxt_lib::units::SCALES;

#[test]
fn temperature_converts_centidegrees() {
    assert_eq!(SCALES.temperature(2500), 25.0);
    assert_eq!(SCALES.temperature(0), 0.0);
    assert_eq!(SCALES.to_temperature(25.0), 2500);
    assert_eq!(SCALES.to_temperature(0.5), 50);
}

#[test]
fn percent_scale_clamps_both_directions() {
    assert_eq!(SCALES.to_scale_percent(120.0), 255, "above 100 % must clamp to 255");
    assert_eq!(SCALES.to_scale_percent(0.0), 0);
    assert_eq!(SCALES.to_scale_percent(-3.0), 0, "negative input must clamp to 0");

    // 100.0 * 2.55 lands just under 255 in binary and truncates to 254; the
    // wire behavior keeps that quirk
    assert_eq!(SCALES.to_scale_percent(100.0), 254);
    // in-range values round-trip through the truncation
    assert_eq!(SCALES.to_scale_percent(SCALES.scale_percent(204)), 204);

    assert!(
        (SCALES.scale_percent(255) - 100.0).abs() < 0.01,
        "255 should read as ~100 %, got {}",
        SCALES.scale_percent(255)
    );
    assert_eq!(SCALES.scale_percent(0), 0.0);
}

#[test]
fn frequency_limiter_inverse_stays_in_storable_range() {
    assert_eq!(SCALES.to_frequency_limiter(0.0), 1, "zero must clamp up to 1");
    assert_eq!(SCALES.to_frequency_limiter(-10.0), 1);
    assert_eq!(SCALES.to_frequency_limiter(1.0e9), 255, "huge input must clamp to 255");

    for hz in [0.001, 0.5, 1.7, 3.0, 1000.0] {
        let raw = SCALES.to_frequency_limiter(hz);
        assert!((1..=255).contains(&raw), "limiter count {raw} out of range for {hz} Hz");
    }

    assert!((SCALES.frequency_limiter(100) - 1.333_155).abs() < 1e-9);
}

#[test]
fn flow_saturates_to_zero_at_threshold() {
    assert_eq!(SCALES.flow(600_000, 4, 10), 0.0);
    assert_eq!(SCALES.flow(2_000_000, 4, 10), 0.0);

    let flow = SCALES.flow(500_000, 4, 10);
    assert!(flow > 0.0 && flow.is_finite(), "below threshold should be a real flow, got {flow}");
    // 46875 * 3600 / (500000 / 0.2) = 67.5 l/h
    assert!((flow - 67.5).abs() < 1e-9);
}

#[test]
fn fan_rpm_saturates_to_zero_at_threshold() {
    assert_eq!(SCALES.fan_rpm(300_000, 2), 0);
    assert_eq!(SCALES.fan_rpm(4_000_000, 2), 0);

    let rpm = SCALES.fan_rpm(150_000, 2);
    assert_eq!(rpm, 9, "150000 counts at 2 edges is 9 rpm");
    assert!(rpm > 0);
}

#[test]
fn fan_rpm_uses_quarter_edge_divisor() {
    // 4 edges doubles the divisor relative to 2 edges
    let two_edges = SCALES.fan_rpm(50_000, 2);
    let four_edges = SCALES.fan_rpm(50_000, 4);
    assert_eq!(two_edges, 28);
    assert_eq!(four_edges, 56);
}

#[test]
fn frequency_round_trips_within_integer_steps() {
    // The inverse truncates to whole half-periods, so exact equality must not
    // be asserted; the error stays below one hertz across the pump's range.
    for hz in 30..=90 {
        let count = SCALES.to_frequency(f64::from(hz));
        let back = SCALES.frequency(count);
        assert!(
            (back - f64::from(hz)).abs() < 1.0,
            "{hz} Hz went through count {count} and came back as {back}"
        );
    }
}

#[test]
fn frequency_forward_matches_timer_arithmetic() {
    assert_eq!(SCALES.frequency(12500), 60.0);
    assert_eq!(SCALES.to_frequency(60.0), 12500);
}

#[test]
fn frequency_reset_cycle_uses_fixed_divisor() {
    assert_eq!(SCALES.frequency_reset_cycle(0x113 * 7), 7);
    assert_eq!(SCALES.to_frequency_reset_cycle(7), 0x113 * 7);
    assert_eq!(SCALES.frequency_reset_cycle(0), 0);
}

#[test]
fn static_tacho_rpm_forward() {
    // 46875 * 60 / (1000 * 9.9)
    assert!((SCALES.static_tacho_rpm(1000) - 284.090_909).abs() < 1e-3);
}

#[test]
fn voltage_and_current_scales() {
    assert_eq!(SCALES.voltage(610), 10.0);
    assert_eq!(SCALES.fan_voltage(630), 10.0);
    assert_eq!(SCALES.current(100), 160);
    assert_eq!(SCALES.current(312), 499);
}

#[test]
fn controller_output_uses_integer_scaled_divisor() {
    // 0xffffff / 100 truncates to 167772
    assert_eq!(SCALES.controller_out_scale(167_772), 1.0);
    assert_eq!(SCALES.controller_out_scale(-167_772), -1.0);
    assert!(
        (SCALES.controller_out_scale(0xff_ffff) - 100.0).abs() < 0.001,
        "full-scale term should read as ~100 %"
    );
}
