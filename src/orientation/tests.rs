use super::{HeadingCalculator, ObserverHandle, ObserverOrientationUpdater, OrientationSample, SharedObserver};
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < EPS, "expected {expected}, got {actual}");
}

#[test]
fn test_vendor_heading_is_taken_verbatim() {
    let sample = OrientationSample::from_vendor(90.0, None);
    assert_close(HeadingCalculator::compute_heading(&sample), FRAC_PI_2);
}

#[test]
fn test_vendor_heading_wins_over_euler_angles() {
    let sample = OrientationSample {
        absolute: false,
        alpha: Some(10.0),
        beta: Some(90.0),
        gamma: Some(0.0),
        vendor_heading: Some(180.0),
    };
    assert_close(HeadingCalculator::compute_heading(&sample), PI);
}

#[test]
fn test_zero_vendor_heading_counts_as_present() {
    let sample = OrientationSample { vendor_heading: Some(0.0), ..OrientationSample::from_euler(30.0, 90.0, 0.0) };
    assert_close(HeadingCalculator::compute_heading(&sample), 0.0);
    let direction = HeadingCalculator::solve(&sample).unwrap();
    assert_close(direction.yaw, 0.0);
    assert_close(direction.pitch, 0.0);
}

#[test]
fn test_pitch_is_identical_on_both_paths() {
    let expected = 45.0_f64.to_radians() - FRAC_PI_2;
    let vendor = OrientationSample::from_vendor(12.0, Some(45.0));
    let euler = OrientationSample::from_euler(12.0, 45.0, 3.0);
    assert_close(HeadingCalculator::compute_pitch(&vendor), expected);
    assert_close(HeadingCalculator::compute_pitch(&euler), expected);
    assert_close(expected, -FRAC_PI_4);
}

#[test]
fn test_missing_beta_gives_level_pitch() {
    let vendor = OrientationSample::from_vendor(12.0, None);
    let euler = OrientationSample { beta: None, ..OrientationSample::from_euler(12.0, 0.0, 3.0) };
    assert_close(HeadingCalculator::compute_pitch(&vendor), 0.0);
    assert_close(HeadingCalculator::compute_pitch(&euler), 0.0);
}

#[test]
fn test_upright_device_heading_mirrors_alpha() {
    // Held upright (beta = 90) the heading runs against alpha.
    for (alpha, expected_deg) in [(30.0, 330.0), (120.0, 240.0), (300.0, 60.0)] {
        let sample = OrientationSample::from_euler(alpha, 90.0, 0.0);
        let heading = HeadingCalculator::compute_heading(&sample);
        assert!((heading - f64::to_radians(expected_deg)).abs() < 1e-6, "alpha {alpha}: {heading}");
    }
}

#[test]
fn test_negative_projection_takes_half_turn_branch() {
    let sample = OrientationSample::from_euler(0.0, -90.0, 0.0);
    let (v_x, v_y) = HeadingCalculator::projection(&sample);
    assert_close(v_x, 0.0);
    assert_close(v_y, -1.0);
    assert_close(HeadingCalculator::compute_heading(&sample), PI);
}

#[test]
fn test_flat_device_coalesces_undefined_heading() {
    let sample = OrientationSample::from_euler(0.0, 0.0, 0.0);
    let (v_x, v_y) = HeadingCalculator::projection(&sample);
    assert_close(v_x, 0.0);
    assert_close(v_y, 0.0);
    assert_close(HeadingCalculator::compute_heading(&sample), 0.0);
}

#[test]
fn test_missing_angles_are_taken_as_zero() {
    let partial = OrientationSample { alpha: Some(0.0), beta: Some(-90.0), ..Default::default() };
    let full = OrientationSample::from_euler(0.0, -90.0, 0.0);
    assert_close(
        HeadingCalculator::compute_heading(&partial),
        HeadingCalculator::compute_heading(&full),
    );
}

#[test]
fn test_corrected_branches_stay_in_full_turn() {
    let mut rng = rand::rng();
    let mut corrected = 0;
    for _ in 0..10_000 {
        let sample = OrientationSample::from_euler(
            rng.random_range(0.0..360.0),
            rng.random_range(-180.0..180.0),
            rng.random_range(-90.0..90.0),
        );
        let (v_x, v_y) = HeadingCalculator::projection(&sample);
        let heading = HeadingCalculator::compute_heading(&sample);
        if v_y < 0.0 || v_x < 0.0 {
            corrected += 1;
            assert!((0.0..=TAU).contains(&heading), "{sample} -> {heading}");
        } else {
            assert_close(heading, (v_x / v_y).atan());
        }
    }
    assert!(corrected > 0);
}

#[test]
fn test_solve_skips_samples_without_heading_source() {
    let sample = OrientationSample { beta: Some(20.0), gamma: Some(5.0), ..Default::default() };
    assert!(HeadingCalculator::solve(&sample).is_none());

    let direction = HeadingCalculator::solve(&OrientationSample::from_vendor(90.0, Some(90.0))).unwrap();
    assert_close(direction.yaw, FRAC_PI_2);
    assert_close(direction.pitch, 0.0);
}

#[test]
fn test_sample_parses_platform_event_shape() {
    let raw = r#"{"absolute": false, "alpha": 12.5, "beta": null, "webkitCompassHeading": 270}"#;
    let sample: OrientationSample = serde_json::from_str(raw).unwrap();
    assert_eq!(sample.alpha, Some(12.5));
    assert_eq!(sample.beta, None);
    assert_eq!(sample.gamma, None);
    assert_eq!(sample.vendor_heading, Some(270.0));
    assert!(!sample.absolute);
}

#[test]
fn test_updater_writes_both_fields_in_place() {
    let observer = SharedObserver::new(1.0, 1.0);
    let before: *const SharedObserver = &observer;
    ObserverOrientationUpdater::apply(&observer, PI, -FRAC_PI_4);
    assert_close(observer.yaw(), PI);
    assert_close(observer.pitch(), -FRAC_PI_4);
    assert!(std::ptr::eq(before, &observer));
}
