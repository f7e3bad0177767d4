use super::*;

#[test]
fn slot_unwraps_single_channel_results() {
    assert_eq!(Channel::slot(vec![]), Channel::Absent);
    assert_eq!(Channel::slot(Channel::numbers([4.0])), Channel::Number(4.0));
    assert_eq!(
        Channel::slot(Channel::numbers([1.0, 2.0])),
        Channel::from(vec![1.0, 2.0])
    );
}

#[test]
fn accumulate_sums_numbers_and_lists() {
    let mut a = Channel::Number(1.0);
    assert!(a.accumulate(&Channel::Number(2.5)));
    assert_eq!(a, Channel::Number(3.5));

    let mut list = Channel::from(vec![1.0, 2.0]);
    assert!(list.accumulate(&Channel::from(vec![10.0, 20.0, 30.0])));
    assert_eq!(list, Channel::from(vec![11.0, 22.0, 30.0]));

    let mut absent = Channel::Absent;
    assert!(absent.accumulate(&Channel::Number(7.0)));
    assert_eq!(absent, Channel::Number(7.0));
    assert!(absent.accumulate(&Channel::Absent));
    assert_eq!(absent, Channel::Number(7.0));
}

#[test]
fn accumulate_rejects_mismatched_shapes() {
    let mut a = Channel::Number(1.0);
    assert!(!a.accumulate(&Channel::from(vec![1.0, 2.0])));
    assert_eq!(a, Channel::Number(1.0));
}

#[test]
fn accumulator_starts_zeroed_and_reports_emptiness() {
    assert_eq!(Accumulator::zeroed(2).finish(), None);

    let mut acc = Accumulator::zeroed(3);
    acc.add(&Channel::numbers([1.0, 2.0]));
    acc.add(&Channel::numbers([0.5]));
    assert_eq!(acc.finish(), Some(Channel::numbers([1.5, 2.0, 0.0])));
}

#[test]
fn accumulator_takes_list_channels_on_first_touch() {
    let mut acc = Accumulator::zeroed(2);
    acc.add(&[Channel::Number(1.0), Channel::from(vec![1.0, 1.0])]);
    acc.add(&[Channel::Number(2.0), Channel::from(vec![2.0, 3.0])]);
    assert_eq!(
        acc.finish(),
        Some(vec![Channel::Number(3.0), Channel::from(vec![3.0, 4.0])])
    );
}

#[test]
fn aggregation_method_parses_known_names_only() {
    assert_eq!(
        "combine".parse::<AggregationMethod>().unwrap(),
        AggregationMethod::Combine
    );
    assert_eq!(
        "compose".parse::<AggregationMethod>().unwrap(),
        AggregationMethod::Compose
    );
    let err = "merge".parse::<AggregationMethod>().unwrap_err();
    assert!(matches!(err, SegueError::Group(_)));
    assert_eq!(AggregationMethod::Compose.to_string(), "compose");
}

#[test]
fn channels_serialize_positionally() {
    let values = vec![
        Channel::Number(1.0),
        Channel::from(vec![2.0, 3.0]),
        Channel::Absent,
    ];
    assert_eq!(
        serde_json::to_string(&values).unwrap(),
        "[1.0,[2.0,3.0],null]"
    );
}
