/// One channel of a tween: its starting value and the change towards the next tween.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TweenValue {
    /// Value at the start of the tween.
    pub value: f64,
    /// Signed difference to the next tween's value (wrapping back to the first tween
    /// for the last one). `None` until a following tween exists.
    pub delta: Option<f64>,
}

impl TweenValue {
    pub(crate) fn at_rest(value: f64) -> Self {
        Self { value, delta: None }
    }

    /// Value at eased progress `eased`; a missing delta holds the value.
    pub(crate) fn at(self, eased: f64) -> f64 {
        self.value + self.delta.unwrap_or(0.0) * eased
    }
}

/// One interpolation segment of an [`Animation`](crate::Animation).
///
/// Offsets are milliseconds from the start of the animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Tween {
    /// Offset at which the tween begins.
    pub start: f64,
    /// Length of the tween.
    pub duration: f64,
    /// `start + duration`; the following tween starts here.
    pub end: f64,
    /// One entry per channel.
    pub values: Vec<TweenValue>,
}

impl Tween {
    pub(crate) fn new(start: f64, duration: f64, values: Vec<TweenValue>) -> Self {
        Self {
            start,
            duration,
            end: start + duration,
            values,
        }
    }

    /// Half-open `[start, end)` membership test.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }

    /// Number of channels.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }
}
