//! Segue is a keyframe tweening engine.
//!
//! An [`Animation`] is a template: a list of tweens with durations, sampled at any
//! elapsed time. A [`Playback`] is a cursor that turns caller-supplied clock times into
//! elapsed times and reports values and completion through listeners. Groups merge
//! several timelines, or several live playbacks, into one stream of values.
//!
//! # Model overview
//!
//! 1. **Author**: `animate(initial, duration, options)` then `.tween(values, duration)`
//! 2. **Aggregate** (optional): [`combine`] sums members channel-wise, [`compose`] keeps a
//!    slot per member
//! 3. **Play**: `playback(timeline, entities, options)`, `start(now)`, then `tick(now)`
//!    each frame
//! 4. **Stop**: immediately, or gracefully at the next loop seam
//!
//! The crate never schedules its own ticks and never spawns threads; every listener
//! fires synchronously inside the call that caused it.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Caller-driven clock**: times are `f64` milliseconds supplied by the caller.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod definition;
mod foundation;
mod playback;

pub use animation::anim::{Animation, AnimationOptions, ChannelValues};
pub use animation::ease::{Ease, Easer, EaserRegistry, create_easer};
pub use animation::group::AnimationGroup;
pub use animation::timeline::{SharedTimeline, TimelineSource};
pub use animation::tween::{Tween, TweenValue};
pub use definition::model::{
    AnimationDef, GroupDef, PlaybackDef, SceneDef, TimelineDef, TweenDef, ValuesDef,
};
pub use foundation::core::{AggregationMethod, Channel, Values};
pub use foundation::error::{SegueError, SegueResult};
pub use playback::events::{CompleteFn, ListenerId, TickFn};
pub use playback::group::PlaybackGroup;
pub use playback::player::{
    Playable, Playback, PlaybackOptions, PlaybackState, SharedPlayable,
};

/// Create an animation holding `initial` for `default_duration` milliseconds.
///
/// Extend it with [`Animation::tween`] or [`Animation::then`].
pub fn animate(
    initial: impl Into<ChannelValues>,
    default_duration: f64,
    options: AnimationOptions,
) -> SegueResult<Animation> {
    Animation::new(initial, default_duration, options)
}

/// Group timelines with an explicit aggregation method.
pub fn group(members: Vec<SharedTimeline>, method: AggregationMethod) -> AnimationGroup {
    AnimationGroup::new(members, method)
}

/// Group timelines, summing their samples channel-wise.
pub fn combine(members: Vec<SharedTimeline>) -> AnimationGroup {
    AnimationGroup::new(members, AggregationMethod::Combine)
}

/// Group timelines, keeping one slot per member.
pub fn compose(members: Vec<SharedTimeline>) -> AnimationGroup {
    AnimationGroup::new(members, AggregationMethod::Compose)
}

/// Wrap a timeline in an idle playback carrying `entities`.
pub fn playback<E: 'static>(
    timeline: SharedTimeline,
    entities: E,
    options: PlaybackOptions,
) -> Playback<E> {
    Playback::new(timeline, entities, options)
}

/// Tick several playbacks together.
pub fn playback_group<E: 'static>(
    members: Vec<SharedPlayable>,
    method: AggregationMethod,
    entities: E,
) -> PlaybackGroup<E> {
    PlaybackGroup::new(members, method, entities)
}
