use super::*;
use crate::animation::anim::{Animation, AnimationOptions};

fn options() -> AnimationOptions {
    AnimationOptions::new("linear").round(false)
}

fn constant(value: f64) -> SharedTimeline {
    Rc::new(Animation::new(value, 100.0, options()).unwrap())
}

fn ramp(from: Vec<f64>, to: Vec<f64>, duration: f64, looping: bool) -> SharedTimeline {
    Rc::new(
        Animation::new(from, duration, options().looping(looping))
            .unwrap()
            .then_for(to, duration)
            .unwrap(),
    )
}

#[test]
fn combine_sums_single_channel_members() {
    let group = AnimationGroup::new(
        vec![constant(1.0), constant(2.0)],
        AggregationMethod::Combine,
    );
    assert_eq!(group.at_time(0.0).unwrap(), Some(Channel::numbers([3.0])));
}

#[test]
fn combine_sizes_result_to_widest_member() {
    let group = AnimationGroup::new(
        vec![
            ramp(vec![0.0, 0.0, 0.0], vec![10.0, 20.0, 30.0], 100.0, true),
            constant(5.0),
        ],
        AggregationMethod::Combine,
    );
    assert_eq!(group.cardinality(), 3);
    assert_eq!(
        group.at_time(50.0).unwrap(),
        Some(Channel::numbers([10.0, 10.0, 15.0]))
    );
}

#[test]
fn combine_skips_finished_members() {
    let short = ramp(vec![1.0], vec![2.0], 50.0, false);
    let long = ramp(vec![10.0], vec![20.0], 100.0, true);
    let group = AnimationGroup::new(vec![short, long], AggregationMethod::Combine);
    assert_eq!(group.total_duration(), 200.0);
    // `short` finished at 100, `long` is at its second tween.
    assert_eq!(group.at_time(150.0).unwrap(), Some(Channel::numbers([15.0])));
}

#[test]
fn combine_reports_no_value_when_every_member_finished() {
    let group = AnimationGroup::new(
        vec![
            ramp(vec![1.0], vec![2.0], 50.0, false),
            ramp(vec![1.0], vec![2.0], 80.0, false),
        ],
        AggregationMethod::Combine,
    );
    assert!(group.at_time(159.0).unwrap().is_some());
    assert_eq!(group.at_time(160.0).unwrap(), None);
}

#[test]
fn compose_keeps_one_slot_per_member() {
    let group = AnimationGroup::new(
        vec![
            ramp(vec![0.0, 100.0], vec![10.0, 200.0], 100.0, true),
            constant(7.0),
            ramp(vec![1.0], vec![2.0], 10.0, false),
        ],
        AggregationMethod::Compose,
    );
    assert_eq!(group.cardinality(), 3);
    assert_eq!(
        group.at_time(50.0).unwrap(),
        Some(vec![
            Channel::from(vec![5.0, 150.0]),
            Channel::Number(7.0),
            Channel::Absent,
        ])
    );
}

#[test]
fn compose_reports_no_value_when_every_member_finished() {
    let group = AnimationGroup::new(
        vec![ramp(vec![1.0], vec![2.0], 10.0, false)],
        AggregationMethod::Compose,
    );
    assert_eq!(group.at_time(20.0).unwrap(), None);
}

#[test]
fn empty_group_has_no_size_and_no_value() {
    let group = AnimationGroup::new(Vec::new(), AggregationMethod::Combine);
    assert_eq!(group.cardinality(), 0);
    assert_eq!(group.total_duration(), 0.0);
    assert_eq!(group.at_time(0.0).unwrap(), None);
    assert!(matches!(group.at_time(-1.0), Err(SegueError::Tween(_))));
}

#[test]
fn membership_changes_resize_the_group() {
    let a = constant(1.0);
    let b = ramp(vec![0.0, 0.0], vec![1.0, 1.0], 300.0, true);
    let mut group = AnimationGroup::new(vec![a.clone()], AggregationMethod::Combine);
    assert_eq!((group.cardinality(), group.total_duration()), (1, 100.0));

    group.add(b.clone()).unwrap();
    assert_eq!((group.cardinality(), group.total_duration()), (2, 600.0));

    let err = group.add(a.clone()).unwrap_err();
    assert!(matches!(err, SegueError::Group(_)));

    assert!(group.remove(&b));
    assert!(!group.remove(&b));
    assert_eq!((group.cardinality(), group.total_duration()), (1, 100.0));
    assert!(group.contains(&a));
}

#[test]
fn compose_cardinality_counts_members() {
    let mut group = AnimationGroup::new(Vec::new(), AggregationMethod::Compose);
    group
        .add(ramp(vec![0.0, 0.0], vec![1.0, 1.0], 10.0, true))
        .unwrap()
        .add(constant(3.0))
        .unwrap();
    assert_eq!(group.cardinality(), 2);
    assert_eq!(group.members().len(), 2);
}

#[test]
fn groups_nest() {
    let inner: SharedTimeline = Rc::new(AnimationGroup::new(
        vec![constant(1.0), constant(2.0)],
        AggregationMethod::Combine,
    ));
    let outer = AnimationGroup::new(vec![inner, constant(10.0)], AggregationMethod::Compose);
    assert_eq!(
        outer.at_time(0.0).unwrap(),
        Some(vec![Channel::Number(3.0), Channel::Number(10.0)])
    );
}

#[test]
fn negative_elapsed_time_is_an_error() {
    let group = AnimationGroup::new(vec![constant(1.0)], AggregationMethod::Compose);
    assert!(matches!(group.compose(-5.0), Err(SegueError::Tween(_))));
}
