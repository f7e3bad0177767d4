use super::*;

fn options() -> AnimationOptions {
    AnimationOptions::new("linear").round(false)
}

fn two_step() -> Animation {
    Animation::new([1.0, 2.0], 100.0, options())
        .unwrap()
        .then_for([2.0, 4.0], 100.0)
        .unwrap()
}

fn first_tween() -> Tween {
    Tween {
        start: 0.0,
        duration: 100.0,
        end: 100.0,
        values: vec![
            TweenValue {
                value: 1.0,
                delta: Some(1.0),
            },
            TweenValue {
                value: 2.0,
                delta: Some(2.0),
            },
        ],
    }
}

fn second_tween() -> Tween {
    Tween {
        start: 100.0,
        duration: 100.0,
        end: 200.0,
        values: vec![
            TweenValue {
                value: 2.0,
                delta: Some(-1.0),
            },
            TweenValue {
                value: 4.0,
                delta: Some(-2.0),
            },
        ],
    }
}

#[test]
fn keeps_default_duration_and_options() {
    let anim = two_step();
    assert_eq!(anim.default_duration(), 100.0);
    assert!(!anim.options().round);
    assert!(anim.options().looping);
    assert_eq!(anim.options().easing, "linear");
}

#[test]
fn tweens_are_contiguous_with_back_patched_deltas() {
    let anim = two_step();
    assert_eq!(anim.tweens(), &[first_tween(), second_tween()]);
    assert_eq!(anim.last_tween(), &second_tween());
    assert_eq!(anim.total_duration(), 200.0);
    assert_eq!(anim.cardinality(), 2);
}

#[test]
fn single_tween_has_no_delta_yet() {
    let anim = Animation::new(5.0, 100.0, options()).unwrap();
    assert_eq!(anim.tweens()[0].values, vec![TweenValue::at_rest(5.0)]);
    assert_eq!(anim.at_time(50.0).unwrap(), Some(vec![5.0]));
}

#[test]
fn tween_uses_default_duration_when_omitted() {
    let mut anim = Animation::new([0.0], 250.0, options()).unwrap();
    anim.tween([10.0], None).unwrap().tween([20.0], Some(50.0)).unwrap();
    let ends: Vec<f64> = anim.tweens().iter().map(|t| t.end).collect();
    assert_eq!(ends, vec![250.0, 500.0, 550.0]);
}

#[test]
fn construction_rejects_bad_input() {
    assert!(matches!(
        Animation::new(Vec::<f64>::new(), 100.0, options()),
        Err(SegueError::Tween(_))
    ));
    assert!(matches!(
        Animation::new([1.0, f64::NAN], 100.0, options()),
        Err(SegueError::Tween(_))
    ));
    assert!(matches!(
        Animation::new([1.0], 0.0, options()),
        Err(SegueError::Tween(_))
    ));
    assert!(matches!(
        Animation::new([1.0], -5.0, options()),
        Err(SegueError::Tween(_))
    ));
    assert!(matches!(
        Animation::new([1.0], 100.0, options().easing("nope")),
        Err(SegueError::InvalidEasing(_))
    ));
}

#[test]
fn tween_rejects_mismatched_cardinality() {
    let mut anim = Animation::new([1.0, 2.0], 100.0, options()).unwrap();
    let err = anim.tween([1.0], None).unwrap_err();
    assert!(matches!(err, SegueError::Tween(_)));
    assert!(err.to_string().contains("same number of values"));
    assert!(anim.tween([1.0, 2.0], Some(0.0)).is_err());
    assert_eq!(anim.tweens().len(), 1);
}

#[test]
fn elapsed_to_duration_rejects_negative_time() {
    let err = two_step().elapsed_to_duration(-100.0).unwrap_err();
    assert!(
        err.to_string()
            .contains("cannot find a tween before the animation starts")
    );
}

#[test]
fn elapsed_to_duration_wraps_when_looping() {
    let anim = two_step();
    assert_eq!(anim.elapsed_to_duration(0.0).unwrap(), Some(0.0));
    assert_eq!(anim.elapsed_to_duration(100.0).unwrap(), Some(100.0));
    assert_eq!(anim.elapsed_to_duration(200.0).unwrap(), Some(0.0));
    assert_eq!(anim.elapsed_to_duration(201.0).unwrap(), Some(1.0));
    assert_eq!(anim.elapsed_to_duration(300.0).unwrap(), Some(100.0));
    assert_eq!(anim.elapsed_to_duration(400.0).unwrap(), Some(0.0));
}

#[test]
fn elapsed_to_duration_finishes_without_looping() {
    let anim = Animation::new([1.0, 2.0], 100.0, options().looping(false))
        .unwrap()
        .then([2.0, 4.0])
        .unwrap();
    assert_eq!(anim.elapsed_to_duration(0.0).unwrap(), Some(0.0));
    assert_eq!(anim.elapsed_to_duration(100.0).unwrap(), Some(100.0));
    assert_eq!(anim.elapsed_to_duration(200.0).unwrap(), None);
    assert_eq!(anim.elapsed_to_duration(201.0).unwrap(), None);
    assert_eq!(anim.at_time(199.0).unwrap().map(|v| v.len()), Some(2));
    assert_eq!(anim.at_time(200.0).unwrap(), None);
}

#[test]
fn tween_at_time_uses_half_open_intervals() {
    let anim = two_step();
    let at = |t: f64| {
        anim.tween_at_time(t)
            .unwrap()
            .map(|(tween, d)| (tween.clone(), d))
    };
    assert_eq!(at(0.0), Some((first_tween(), 0.0)));
    assert_eq!(at(90.0), Some((first_tween(), 90.0)));
    assert_eq!(at(100.0), Some((second_tween(), 100.0)));
    assert_eq!(at(101.0), Some((second_tween(), 101.0)));
    assert_eq!(at(200.0), Some((first_tween(), 0.0)));
    assert_eq!(at(201.0), Some((first_tween(), 1.0)));
    assert_eq!(at(300.0), Some((second_tween(), 100.0)));
    assert_eq!(at(400.0), Some((first_tween(), 0.0)));
}

#[test]
fn interpolate_scales_deltas_by_eased_progress() {
    let anim = two_step();
    assert_eq!(anim.interpolate(&first_tween(), 50.0), vec![1.5, 3.0]);
    assert_eq!(anim.interpolate(&first_tween(), 0.0), vec![1.0, 2.0]);
    assert_eq!(anim.interpolate(&first_tween(), 100.0), vec![2.0, 4.0]);
}

#[test]
fn interpolate_rounds_when_enabled() {
    let anim = Animation::new([1.0, 2.0], 100.0, options().round(true))
        .unwrap()
        .then([2.0, 4.0])
        .unwrap();
    assert_eq!(anim.interpolate(&first_tween(), 50.0), vec![2.0, 3.0]);
}

#[test]
fn rounding_breaks_negative_ties_towards_positive_infinity() {
    let anim = Animation::new([0.0], 100.0, options().round(true))
        .unwrap()
        .then([-5.0])
        .unwrap();
    assert_eq!(anim.at_time(50.0).unwrap(), Some(vec![-2.0]));
    assert_eq!(anim.at_time(150.0).unwrap(), Some(vec![-2.0]));
}

#[test]
fn an_easing_function_is_required() {
    for name in ["", "  "] {
        let err = Animation::new([0.0], 100.0, AnimationOptions::new(name)).unwrap_err();
        assert!(matches!(err, SegueError::InvalidEasing(_)));
        assert!(err.to_string().contains("easing function is required"));
    }
    let registry = EaserRegistry::standard();
    let err = Animation::with_registry([0.0], 100.0, AnimationOptions::new(""), &registry)
        .unwrap_err();
    assert!(matches!(err, SegueError::InvalidEasing(_)));
}

#[test]
fn options_need_an_easing_name_in_json() {
    let err = serde_json::from_str::<AnimationOptions>(r#"{ "round": false }"#).unwrap_err();
    assert!(err.to_string().contains("easing"));
    let parsed: AnimationOptions = serde_json::from_str(r#"{ "easing": "linear" }"#).unwrap();
    assert_eq!(parsed, AnimationOptions::new("linear"));
}

#[test]
fn interpolate_uses_the_easing_function() {
    let registry = EaserRegistry::empty().with("half", |t| t / 2.0);
    let anim = Animation::with_registry([0.0], 100.0, options().easing("half"), &registry)
        .unwrap()
        .then([10.0])
        .unwrap();
    assert_eq!(anim.at_time(50.0).unwrap(), Some(vec![2.5]));
}

#[test]
fn samples_the_reference_timeline() {
    let anim = two_step();
    assert_eq!(anim.at_time(0.0).unwrap(), Some(vec![1.0, 2.0]));
    assert_eq!(anim.at_time(50.0).unwrap(), Some(vec![1.5, 3.0]));
    assert_eq!(anim.at_time(100.0).unwrap(), Some(vec![2.0, 4.0]));
    assert_eq!(anim.at_time(150.0).unwrap(), Some(vec![1.5, 3.0]));
    assert_eq!(anim.at_time(200.0).unwrap(), Some(vec![1.0, 2.0]));
}

#[test]
fn loop_seam_is_continuous() {
    let anim = Animation::new([3.0, -7.5, 0.25], 120.0, options())
        .unwrap()
        .then_for([10.0, 4.0, 9.0], 80.0)
        .unwrap()
        .then_for([-2.0, 0.0, 1.0], 33.0)
        .unwrap();
    let last = anim.last_tween();
    let first = &anim.tweens()[0];
    let end_of_last = anim.interpolate(last, last.end);
    let start_of_first = anim.interpolate(first, first.start);
    for (a, b) in end_of_last.iter().zip(&start_of_first) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn looping_repeats_every_pass() {
    let anim = Animation::new([0.0, 100.0], 70.0, options().easing("easeInOutQuad"))
        .unwrap()
        .then_for([35.0, 20.0], 45.0)
        .unwrap();
    let total = anim.total_duration();
    for t in [0.0, 1.0, 33.0, 69.999, 70.0, 100.0, 114.0] {
        let base = anim.at_time(t).unwrap();
        for pass in 1..4 {
            let later = anim.at_time(t + total * f64::from(pass)).unwrap();
            let (base, later) = (base.clone().unwrap(), later.unwrap());
            for (a, b) in base.iter().zip(&later) {
                assert!((a - b).abs() < 1e-6, "t={t} pass={pass}");
            }
        }
    }
    assert_eq!(anim.at_time(total * 3.0).unwrap(), anim.at_time(0.0).unwrap());
}

#[test]
fn implements_timeline_source() {
    let anim = two_step();
    let source: &dyn TimelineSource = &anim;
    assert_eq!(source.cardinality(), 2);
    assert_eq!(source.total_duration(), 200.0);
    assert_eq!(
        source.at_time(50.0).unwrap(),
        Some(Channel::numbers([1.5, 3.0]))
    );
}
