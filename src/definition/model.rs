use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::animation::anim::{Animation, AnimationOptions};
use crate::animation::ease::EaserRegistry;
use crate::animation::group::AnimationGroup;
use crate::animation::timeline::{SharedTimeline, TimelineSource};
use crate::foundation::core::AggregationMethod;
use crate::foundation::error::{SegueError, SegueResult};
use crate::playback::player::{Playback, PlaybackOptions};

/// Channel values as written in JSON: a bare number or an array of numbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValuesDef(pub Vec<f64>);

impl<'de> Deserialize<'de> for ValuesDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(f64),
            Many(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::One(v) => Ok(Self(vec![v])),
            Repr::Many(v) => Ok(Self(v)),
        }
    }
}

/// One tween after the initial values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TweenDef {
    /// Target values.
    pub values: ValuesDef,
    /// Falls back to the animation's default duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// An animation: the initial values held for `duration`, then each tween in order.
///
/// Options sit next to the other keys (`"easing"`, `"round"`, `"loop"`); any other key
/// is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnimationRepr")]
pub struct AnimationDef {
    /// Values of the first tween.
    pub initial: ValuesDef,
    /// Duration of the first tween and of tweens without their own.
    pub duration: f64,
    /// Easing, rounding and looping.
    #[serde(flatten)]
    pub options: AnimationOptions,
    /// Tweens following the initial values.
    pub tweens: Vec<TweenDef>,
}

// `flatten` cannot be combined with `deny_unknown_fields`, so the wire shape is spelled out.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AnimationRepr {
    initial: ValuesDef,
    duration: f64,
    easing: String,
    #[serde(default)]
    round: Option<bool>,
    #[serde(default, rename = "loop")]
    looping: Option<bool>,
    #[serde(default)]
    tweens: Vec<TweenDef>,
}

impl From<AnimationRepr> for AnimationDef {
    fn from(repr: AnimationRepr) -> Self {
        let mut options = AnimationOptions::new(repr.easing);
        if let Some(round) = repr.round {
            options = options.round(round);
        }
        if let Some(looping) = repr.looping {
            options = options.looping(looping);
        }
        Self {
            initial: repr.initial,
            duration: repr.duration,
            options,
            tweens: repr.tweens,
        }
    }
}

impl AnimationDef {
    /// Build the animation, resolving the easing name in `registry`.
    pub fn build(&self, registry: &EaserRegistry) -> SegueResult<Animation> {
        let mut anim = Animation::with_registry(
            self.initial.0.clone(),
            self.duration,
            self.options.clone(),
            registry,
        )?;
        for tween in &self.tweens {
            anim.tween(tween.values.0.clone(), tween.duration)?;
        }
        Ok(anim)
    }
}

/// An animation group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDef {
    /// `"combine"` or `"compose"`.
    pub aggregation: AggregationMethod,
    /// Nested timelines, in order.
    pub members: Vec<TimelineDef>,
}

impl GroupDef {
    /// Build every member and group them.
    pub fn build(&self, registry: &EaserRegistry) -> SegueResult<AnimationGroup> {
        let members = self
            .members
            .iter()
            .map(|m| m.build(registry))
            .collect::<SegueResult<Vec<_>>>()?;
        Ok(AnimationGroup::new(members, self.aggregation))
    }
}

/// A timeline definition. Objects with a `members` key are groups.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TimelineDef {
    /// A combined or composed group.
    Group(GroupDef),
    /// A single animation.
    Animation(AnimationDef),
}

impl<'de> Deserialize<'de> for TimelineDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let parsed = if value.get("members").is_some() {
            GroupDef::deserialize(value).map(Self::Group)
        } else {
            AnimationDef::deserialize(value).map(Self::Animation)
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

impl TimelineDef {
    /// Build into a shared timeline handle.
    pub fn build(&self, registry: &EaserRegistry) -> SegueResult<SharedTimeline> {
        Ok(match self {
            Self::Group(def) => Rc::new(def.build(registry)?),
            Self::Animation(def) => Rc::new(def.build(registry)?),
        })
    }
}

/// Playback settings in a scene file (`{ "gracefulStop": bool }`).
pub type PlaybackDef = PlaybackOptions;

/// A timeline plus the options to play it with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    /// The timeline to play.
    pub timeline: TimelineDef,
    /// Defaults to graceful stops.
    #[serde(default)]
    pub playback: PlaybackDef,
}

impl SceneDef {
    /// Parse a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SegueResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SegueError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from any reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SegueResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SegueError::serde(format!("parse scene JSON: {e}")))
    }

    /// Read and parse a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> SegueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open scene JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build the timeline and wrap it in an idle playback.
    #[tracing::instrument(skip_all)]
    pub fn build(&self, registry: &EaserRegistry) -> SegueResult<Playback> {
        let timeline = self.timeline.build(registry)?;
        tracing::debug!(
            cardinality = timeline.cardinality(),
            total_duration = timeline.total_duration(),
            "built scene"
        );
        Ok(Playback::new(timeline, (), self.playback))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/model.rs"]
mod tests;
