use super::*;

fn all() -> Vec<Ease> {
    vec![
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::OutQuart,
        Ease::OutQuint,
        Ease::OutExpo,
        Ease::CINEMATIC,
        Ease::HEAVY_SPRING,
        Ease::Spring {
            stiffness: 180.0,
            damping: 11.0,
            mass: 1.0,
        },
    ]
}

#[test]
fn endpoints_are_stable() {
    for ease in all() {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
    }
}

#[test]
fn monotonic_spot_check() {
    // Underdamped springs overshoot, so they are left out here.
    for ease in &all()[..12] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn deceleration_curves_are_front_loaded() {
    assert!(Ease::OutQuint.apply(0.25) > 0.75);
    assert!(Ease::OutQuint.apply(0.25) > Ease::OutCubic.apply(0.25));
    assert!(Ease::CINEMATIC.apply(0.25) > 0.5);
}

#[test]
fn linear_bezier_tracks_identity() {
    let ease = Ease::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    for t in [0.1, 0.3, 0.5, 0.9] {
        assert!((ease.apply(t) - t).abs() < 1e-4);
    }
}

#[test]
fn underdamped_spring_overshoots() {
    let ease = Ease::Spring {
        stiffness: 180.0,
        damping: 8.0,
        mass: 1.0,
    };
    let peak = (1..100)
        .map(|i| ease.apply(f64::from(i) / 100.0))
        .fold(0.0f64, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn out_of_range_input_is_clamped() {
    assert_eq!(Ease::OutCubic.apply(-3.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(7.0), 1.0);
    assert_eq!(Ease::Linear.apply(f64::NAN), 0.0);
}

#[test]
fn validate_rejects_bad_parameters() {
    assert!(Ease::CINEMATIC.validate().is_ok());
    assert!(
        Ease::CubicBezier {
            x1: 1.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0
        }
        .validate()
        .is_err()
    );
    assert!(
        Ease::Spring {
            stiffness: 0.0,
            damping: 1.0,
            mass: 1.0
        }
        .validate()
        .is_err()
    );
}

#[test]
fn step_start_jumps_off_the_origin() {
    assert_eq!(Ease::StepStart.apply(0.0), 0.0);
    assert_eq!(Ease::StepStart.apply(1e-6), 1.0);
    assert_eq!(Ease::StepStart.apply(1.0), 1.0);
    assert_eq!(Ease::StepStart.apply(-3.0), 0.0);
    let json = serde_json::to_string(&Ease::StepStart).unwrap();
    assert_eq!(json, r#""StepStart""#);
}
