use std::fmt;
use std::rc::Rc;

use crate::animation::timeline::{SharedTimeline, TimelineSource};
use crate::foundation::core::{Accumulator, AggregationMethod, Channel, Values};
use crate::foundation::error::{SegueError, SegueResult};

/// Several timelines sampled at the same elapsed time and merged into one result.
///
/// The group is itself a [`TimelineSource`], so it can be played back, or nested in
/// another group, exactly like a single animation. `cardinality` and
/// `total_duration` are cached and only recomputed when membership changes.
pub struct AnimationGroup {
    members: Vec<SharedTimeline>,
    method: AggregationMethod,
    cardinality: usize,
    total_duration: f64,
}

impl AnimationGroup {
    /// Create a group; `members` may be empty.
    pub fn new(members: Vec<SharedTimeline>, method: AggregationMethod) -> Self {
        let mut group = Self {
            members,
            method,
            cardinality: 0,
            total_duration: 0.0,
        };
        group.resize();
        group
    }

    /// Add a member. Adding the same timeline twice is an error.
    pub fn add(&mut self, member: SharedTimeline) -> SegueResult<&mut Self> {
        if self.contains(&member) {
            return Err(SegueError::group(
                "timeline is already a member of this group",
            ));
        }
        self.members.push(member);
        self.resize();
        Ok(self)
    }

    /// Remove a member; returns whether it was present. The member itself is untouched.
    pub fn remove(&mut self, member: &SharedTimeline) -> bool {
        let before = self.members.len();
        self.members.retain(|m| !Rc::ptr_eq(m, member));
        let removed = self.members.len() != before;
        if removed {
            self.resize();
        }
        removed
    }

    /// True when `member` (by identity) belongs to the group.
    pub fn contains(&self, member: &SharedTimeline) -> bool {
        self.members.iter().any(|m| Rc::ptr_eq(m, member))
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[SharedTimeline] {
        &self.members
    }

    /// How member samples are aggregated.
    pub fn method(&self) -> AggregationMethod {
        self.method
    }

    /// Recompute the cached cardinality and total duration.
    #[tracing::instrument(skip(self), fields(members = self.members.len(), method = %self.method))]
    pub fn resize(&mut self) {
        self.cardinality = match self.method {
            AggregationMethod::Combine => self
                .members
                .iter()
                .map(|m| m.cardinality())
                .max()
                .unwrap_or(0),
            AggregationMethod::Compose => self.members.len(),
        };
        self.total_duration = self
            .members
            .iter()
            .map(|m| m.total_duration())
            .fold(0.0, f64::max);
        tracing::debug!(
            cardinality = self.cardinality,
            total_duration = self.total_duration,
            "resized animation group"
        );
    }

    /// Sum every member's sample channel-wise. Members without a value add nothing.
    pub fn combine(&self, elapsed: f64) -> SegueResult<Option<Values>> {
        check_elapsed(elapsed)?;
        let mut acc = Accumulator::zeroed(self.cardinality);
        for member in &self.members {
            if let Some(values) = member.at_time(elapsed)? {
                acc.add(&values);
            }
        }
        Ok(acc.finish())
    }

    /// One slot per member, in insertion order.
    pub fn compose(&self, elapsed: f64) -> SegueResult<Option<Values>> {
        check_elapsed(elapsed)?;
        let mut any = false;
        let mut slots = Vec::with_capacity(self.members.len());
        for member in &self.members {
            match member.at_time(elapsed)? {
                Some(values) => {
                    any = true;
                    slots.push(Channel::slot(values));
                }
                None => slots.push(Channel::Absent),
            }
        }
        Ok(any.then_some(slots))
    }
}

impl TimelineSource for AnimationGroup {
    fn at_time(&self, elapsed: f64) -> SegueResult<Option<Values>> {
        match self.method {
            AggregationMethod::Combine => self.combine(elapsed),
            AggregationMethod::Compose => self.compose(elapsed),
        }
    }

    fn cardinality(&self) -> usize {
        self.cardinality
    }

    fn total_duration(&self) -> f64 {
        self.total_duration
    }
}

impl fmt::Debug for AnimationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationGroup")
            .field("members", &self.members.len())
            .field("method", &self.method)
            .field("cardinality", &self.cardinality)
            .field("total_duration", &self.total_duration)
            .finish()
    }
}

fn check_elapsed(elapsed: f64) -> SegueResult<()> {
    if elapsed.is_nan() || elapsed < 0.0 {
        return Err(SegueError::tween(format!(
            "cannot sample a group before it starts: {elapsed} < 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/group.rs"]
mod tests;
