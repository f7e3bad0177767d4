use std::fmt;

use serde::{Deserialize, Serialize};

use crate::animation::ease::{Easer, EaserRegistry, create_easer};
use crate::animation::timeline::TimelineSource;
use crate::animation::tween::{Tween, TweenValue};
use crate::foundation::core::{Channel, Values};
use crate::foundation::error::{SegueError, SegueResult};

/// Options fixed when an [`Animation`] is created.
///
/// The easing name has no default; `round` and `loop` default to `true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    /// Registry name of the easing function.
    pub easing: String,
    /// Round interpolated values to the nearest integer, halves towards +∞.
    #[serde(default = "enabled")]
    pub round: bool,
    /// Wrap around at the end of the timeline instead of finishing.
    #[serde(rename = "loop", default = "enabled")]
    pub looping: bool,
}

fn enabled() -> bool {
    true
}

impl AnimationOptions {
    /// Options using the named easing function, rounding and looping.
    pub fn new(easing: impl Into<String>) -> Self {
        Self {
            easing: easing.into(),
            round: true,
            looping: true,
        }
    }

    /// Set the easing function by registry name.
    pub fn easing(mut self, name: impl Into<String>) -> Self {
        self.easing = name.into();
        self
    }

    /// Enable or disable rounding.
    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Enable or disable looping.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

/// Values for one tween: a bare number or a list of channel values.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelValues(pub Vec<f64>);

impl From<f64> for ChannelValues {
    fn from(value: f64) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<f64>> for ChannelValues {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for ChannelValues {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ChannelValues {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

/// A reusable template of tweens describing one timeline.
///
/// Time 0 is when the first tween starts; a tween starting at 200 starts 200ms after
/// the animation begins. An animation holds no playback state, so one definition can
/// back any number of [`Playback`](crate::Playback)s.
pub struct Animation {
    tweens: Vec<Tween>,
    default_duration: f64,
    options: AnimationOptions,
    ease: Easer,
}

impl Animation {
    /// Create an animation whose first tween holds `initial` for `default_duration`.
    ///
    /// The easing function is resolved from the standard easing set.
    pub fn new(
        initial: impl Into<ChannelValues>,
        default_duration: f64,
        options: AnimationOptions,
    ) -> SegueResult<Self> {
        let ease = create_easer(required_easing(&options)?)?;
        Self::build(initial.into(), default_duration, options, ease)
    }

    /// Like [`Animation::new`], resolving the easing function from `registry`.
    pub fn with_registry(
        initial: impl Into<ChannelValues>,
        default_duration: f64,
        options: AnimationOptions,
        registry: &EaserRegistry,
    ) -> SegueResult<Self> {
        let ease = registry.resolve(required_easing(&options)?)?;
        Self::build(initial.into(), default_duration, options, ease)
    }

    fn build(
        initial: ChannelValues,
        default_duration: f64,
        options: AnimationOptions,
        ease: Easer,
    ) -> SegueResult<Self> {
        validate_values(&initial.0)?;
        validate_duration(default_duration)?;

        let values = initial.0.into_iter().map(TweenValue::at_rest).collect();
        Ok(Self {
            tweens: vec![Tween::new(0.0, default_duration, values)],
            default_duration,
            options,
            ease,
        })
    }

    /// Append a tween towards `targets`, lasting `duration` (or the default duration).
    ///
    /// The previous last tween now eases towards `targets`, and the new tween eases
    /// back towards the first tween's values so looping is seamless.
    pub fn tween(
        &mut self,
        targets: impl Into<ChannelValues>,
        duration: Option<f64>,
    ) -> SegueResult<&mut Self> {
        let targets = targets.into().0;
        let duration = duration.unwrap_or(self.default_duration);

        validate_values(&targets)?;
        validate_duration(duration)?;
        if targets.len() != self.cardinality() {
            return Err(SegueError::tween(format!(
                "all tweens must have the same number of values: expected {}, got {}",
                self.cardinality(),
                targets.len()
            )));
        }

        let first: Vec<f64> = self.tweens[0].values.iter().map(|v| v.value).collect();
        let Some(previous) = self.tweens.last_mut() else {
            return Err(SegueError::tween("animation has no tweens"));
        };

        let values = previous
            .values
            .iter_mut()
            .zip(targets)
            .zip(first)
            .map(|((prev, target), first)| {
                prev.delta = Some(target - prev.value);
                TweenValue {
                    value: target,
                    delta: Some(first - target),
                }
            })
            .collect();

        let start = previous.end;
        self.tweens.push(Tween::new(start, duration, values));
        Ok(self)
    }

    /// Builder form of [`Animation::tween`] using the default duration.
    pub fn then(mut self, targets: impl Into<ChannelValues>) -> SegueResult<Self> {
        self.tween(targets, None)?;
        Ok(self)
    }

    /// Builder form of [`Animation::tween`] with an explicit duration.
    pub fn then_for(
        mut self,
        targets: impl Into<ChannelValues>,
        duration: f64,
    ) -> SegueResult<Self> {
        self.tween(targets, Some(duration))?;
        Ok(self)
    }

    /// Tweens in timeline order; the first holds the initial values.
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// The tween that eases back to the initial values.
    pub fn last_tween(&self) -> &Tween {
        &self.tweens[self.tweens.len() - 1]
    }

    /// Length of one pass, in milliseconds.
    pub fn total_duration(&self) -> f64 {
        self.last_tween().end
    }

    /// Number of channels every tween carries.
    pub fn cardinality(&self) -> usize {
        self.tweens[0].cardinality()
    }

    /// Duration used by tweens created without one.
    pub fn default_duration(&self) -> f64 {
        self.default_duration
    }

    /// Options this animation was created with.
    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    /// Map an elapsed time onto the timeline, wrapping when looping.
    ///
    /// Returns `None` once a non-looping animation has finished.
    pub fn elapsed_to_duration(&self, elapsed: f64) -> SegueResult<Option<f64>> {
        if elapsed.is_nan() || elapsed < 0.0 {
            return Err(SegueError::tween(format!(
                "cannot find a tween before the animation starts: {elapsed} < 0"
            )));
        }

        let total = self.total_duration();
        if elapsed >= total {
            if !self.options.looping {
                return Ok(None);
            }
            return Ok(Some(elapsed % total));
        }
        Ok(Some(elapsed))
    }

    /// The tween active at `elapsed`, with the wrapped time inside the timeline.
    ///
    /// A time exactly on a tween's end belongs to the following tween.
    pub fn tween_at_time(&self, elapsed: f64) -> SegueResult<Option<(&Tween, f64)>> {
        let Some(duration) = self.elapsed_to_duration(elapsed)? else {
            return Ok(None);
        };
        Ok(self
            .tweens
            .iter()
            .find(|tween| tween.contains(duration))
            .map(|tween| (tween, duration)))
    }

    /// Interpolate `tween` at timeline time `time`.
    pub fn interpolate(&self, tween: &Tween, time: f64) -> Vec<f64> {
        let eased = (self.ease)((time - tween.start) / tween.duration);
        tween
            .values
            .iter()
            .map(|v| {
                let value = v.at(eased);
                if self.options.round {
                    round_half_up(value)
                } else {
                    value
                }
            })
            .collect()
    }

    /// Interpolated values at `elapsed`, or `None` once a non-looping animation has finished.
    pub fn at_time(&self, elapsed: f64) -> SegueResult<Option<Vec<f64>>> {
        Ok(self
            .tween_at_time(elapsed)?
            .map(|(tween, duration)| self.interpolate(tween, duration)))
    }
}

impl TimelineSource for Animation {
    fn at_time(&self, elapsed: f64) -> SegueResult<Option<Values>> {
        Ok(Animation::at_time(self, elapsed)?.map(Channel::numbers))
    }

    fn cardinality(&self) -> usize {
        Animation::cardinality(self)
    }

    fn total_duration(&self) -> f64 {
        Animation::total_duration(self)
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("tweens", &self.tweens)
            .field("default_duration", &self.default_duration)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn required_easing(options: &AnimationOptions) -> SegueResult<&str> {
    if options.easing.trim().is_empty() {
        return Err(SegueError::invalid_easing("an easing function is required"));
    }
    Ok(&options.easing)
}

/// Nearest integer, with ties going towards positive infinity (`-2.5` becomes `-2`).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn validate_values(values: &[f64]) -> SegueResult<()> {
    if values.is_empty() {
        return Err(SegueError::tween("tween values must not be empty"));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(SegueError::tween(format!(
            "tween values must be finite numbers, got {bad}"
        )));
    }
    Ok(())
}

fn validate_duration(duration: f64) -> SegueResult<()> {
    if !(duration.is_finite() && duration > 0.0) {
        return Err(SegueError::tween(format!(
            "tween duration must be a positive number of milliseconds, got {duration}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
