use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert!(close(ease.apply(0.0), 0.0), "{ease} at 0");
        assert!(close(ease.apply(1.0), 1.0), "{ease} at 1");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in [
        Ease::Linear,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuart,
        Ease::InQuint,
        Ease::OutQuint,
        Ease::InExpo,
        Ease::OutExpo,
        Ease::InCirc,
        Ease::OutCirc,
    ] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease}");
        assert!(b < c, "{ease}");
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(Ease::Linear.apply(-0.5), 0.0);
    assert_eq!(Ease::Linear.apply(1.0000001), 1.0);
    assert!(Ease::OutElastic.apply(1.5).is_finite());
}

#[test]
fn back_overshoots() {
    assert!(Ease::InBack.apply(0.2) < 0.0);
    assert!(Ease::OutBack.apply(0.8) > 1.0);
}

#[test]
fn names_round_trip() {
    for ease in Ease::ALL {
        assert_eq!(Ease::from_name(ease.name()).unwrap(), ease);
    }
    assert_eq!(Ease::InOutQuad.name(), "easeInOutQuad");
}

#[test]
fn unknown_names_are_rejected() {
    let err = create_easer("wobble").err().unwrap();
    assert!(matches!(err, SegueError::InvalidEasing(_)));
    assert!(err.to_string().contains("wobble"));
}

#[test]
fn create_easer_matches_enum() {
    let easer = create_easer("easeInQuad").unwrap();
    assert_eq!(easer(0.5), 0.25);
}

#[test]
fn standard_registry_contains_every_function() {
    let registry = EaserRegistry::standard();
    assert_eq!(registry.names().count(), Ease::ALL.len());
    for ease in Ease::ALL {
        assert!(registry.contains(ease.name()));
    }
}

#[test]
fn registry_accepts_custom_functions() {
    let registry = EaserRegistry::empty().with("step", |t| if t < 0.5 { 0.0 } else { 1.0 });
    let step = registry.resolve("step").unwrap();
    assert_eq!(step(0.4), 0.0);
    assert_eq!(step(0.6), 1.0);
    assert!(matches!(
        registry.resolve("linear"),
        Err(SegueError::InvalidEasing(_))
    ));
}
