use std::rc::Rc;

use crate::foundation::core::Values;
use crate::foundation::error::SegueResult;

/// Anything a [`Playback`](crate::Playback) can drive: a single animation or a group.
pub trait TimelineSource {
    /// Sample at `elapsed` milliseconds since the timeline started.
    ///
    /// `Ok(None)` means the timeline has nothing to show at that time (a non-looping
    /// timeline has run to completion). Negative times are an error.
    fn at_time(&self, elapsed: f64) -> SegueResult<Option<Values>>;

    /// Number of channels a sample carries.
    fn cardinality(&self) -> usize;

    /// Length of one pass through the timeline, in milliseconds.
    fn total_duration(&self) -> f64;
}

/// Shared handle to a timeline. One timeline may back many playbacks and groups.
pub type SharedTimeline = Rc<dyn TimelineSource>;
