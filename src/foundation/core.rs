use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{SegueError, SegueResult};

/// One output channel of a timeline sample.
///
/// Plain animations only ever produce [`Channel::Number`]. Composed groups produce one
/// channel per member: a bare number for single-channel members, a [`Channel::List`]
/// for multi-channel members and [`Channel::Absent`] for members without a value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel {
    /// A single interpolated value.
    Number(f64),
    /// The full result of a multi-channel member.
    List(Vec<Channel>),
    /// Placeholder for a member that produced no value this sample.
    Absent,
}

/// A sample: channels in positional order.
pub type Values = Vec<Channel>;

impl Channel {
    /// The numeric value, if this is a [`Channel::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// True for [`Channel::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Wrap plain numbers as channels.
    pub fn numbers(values: impl IntoIterator<Item = f64>) -> Values {
        values.into_iter().map(Self::Number).collect()
    }

    /// Collapse a member result into a single compose slot.
    ///
    /// Empty results become [`Channel::Absent`], single-channel results are unwrapped,
    /// anything wider is kept as a list.
    pub fn slot(mut values: Values) -> Self {
        match values.len() {
            0 => Self::Absent,
            1 => values.pop().unwrap_or(Self::Absent),
            _ => Self::List(values),
        }
    }

    /// Add `other` into `self`, element-wise for lists.
    ///
    /// Returns `false` when the shapes cannot be summed (a number against a list); in
    /// that case `self` is left unchanged.
    pub fn accumulate(&mut self, other: &Channel) -> bool {
        if other.is_absent() {
            return true;
        }
        if self.is_absent() {
            *self = other.clone();
            return true;
        }
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                *a += *b;
                true
            }
            (Self::List(a), Self::List(b)) => {
                let mut ok = true;
                for (i, item) in b.iter().enumerate() {
                    match a.get_mut(i) {
                        Some(slot) => ok &= slot.accumulate(item),
                        None => a.push(item.clone()),
                    }
                }
                ok
            }
            _ => false,
        }
    }
}

impl From<f64> for Channel {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<f64>> for Channel {
    fn from(values: Vec<f64>) -> Self {
        Self::List(Channel::numbers(values))
    }
}

/// Channel-wise sum used by the `combine` aggregation.
///
/// Starts as `cardinality` zeros. The first contribution to a channel replaces the
/// zero outright so that list-shaped channels (from composed members) can be summed
/// as well as numbers.
#[derive(Debug)]
pub(crate) struct Accumulator {
    slots: Values,
    touched: Vec<bool>,
    any: bool,
}

impl Accumulator {
    pub(crate) fn zeroed(cardinality: usize) -> Self {
        Self {
            slots: vec![Channel::Number(0.0); cardinality],
            touched: vec![false; cardinality],
            any: false,
        }
    }

    pub(crate) fn add(&mut self, values: &[Channel]) {
        self.any = true;
        for (i, value) in values.iter().enumerate() {
            if i >= self.slots.len() {
                self.slots.push(Channel::Number(0.0));
                self.touched.push(false);
            }
            if !self.touched[i] {
                if !value.is_absent() {
                    self.slots[i] = value.clone();
                    self.touched[i] = true;
                }
            } else if !self.slots[i].accumulate(value) {
                tracing::warn!(channel = i, "cannot combine a number with a list; skipping");
            }
        }
    }

    /// The summed channels, or `None` when nothing was added.
    pub(crate) fn finish(self) -> Option<Values> {
        self.any.then_some(self.slots)
    }
}

/// How a group merges the results of its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    /// Sum member results channel-wise.
    Combine,
    /// Keep each member's result in its own positional slot.
    Compose,
}

impl AggregationMethod {
    /// The configuration name of this method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Combine => "combine",
            Self::Compose => "compose",
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMethod {
    type Err = SegueError;

    fn from_str(s: &str) -> SegueResult<Self> {
        match s {
            "combine" => Ok(Self::Combine),
            "compose" => Ok(Self::Compose),
            other => Err(SegueError::group(format!(
                "invalid aggregation method \"{other}\", expected one of: combine, compose"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
