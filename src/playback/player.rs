use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::timeline::SharedTimeline;
use crate::foundation::core::{Channel, Values};
use crate::foundation::error::{SegueError, SegueResult};
use crate::playback::events::{CompleteFn, ListenerId, Listeners, TickFn, once};

/// Lifecycle of a playback or playback group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not running; ticks sample nothing.
    #[default]
    Idle,
    /// Running and sampling on every tick.
    Started,
    /// A graceful stop was requested; completion happens at the next loop seam.
    Stopping,
}

impl PlaybackState {
    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playback configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackOptions {
    /// Defer `stop(false)` to the next loop seam instead of stopping immediately.
    pub graceful_stop: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            graceful_stop: true,
        }
    }
}

impl PlaybackOptions {
    /// Enable or disable graceful stops.
    pub fn graceful_stop(mut self, graceful_stop: bool) -> Self {
        self.graceful_stop = graceful_stop;
        self
    }
}

/// Object-safe lifecycle shared by [`Playback`] and
/// [`PlaybackGroup`](crate::PlaybackGroup), so groups can hold either.
pub trait Playable {
    /// Begin playing with `time` as the start of the timeline.
    fn start(&mut self, time: f64) -> SegueResult<()>;

    /// Request a stop; see [`Playback::stop`].
    fn stop(&mut self, ignore_graceful: bool);

    /// Advance to `time` and return the sampled channels.
    fn tick(&mut self, time: f64) -> SegueResult<Values>;

    /// Current lifecycle state.
    fn state(&self) -> PlaybackState;

    /// Number of channels (or slots) each tick yields.
    fn cardinality(&self) -> usize;

    /// Register a completion listener that fires at most once.
    fn once_complete(&mut self, callback: Box<dyn FnOnce()>) -> ListenerId;

    /// Unregister a listener added through any of the `on_*`/`once_*` methods.
    fn off(&mut self, id: ListenerId) -> bool;

    /// Stop silently, drop all listeners and refuse further starts.
    fn destroy(&mut self);
}

/// Shared handle to a playable; groups and callers hold the same member.
pub type SharedPlayable = Rc<RefCell<dyn Playable>>;

/// A time cursor over one timeline.
///
/// The caller drives the clock: `start(now)` once, then `tick(now)` every frame.
/// `entities` is opaque caller context handed to every tick listener.
pub struct Playback<E = ()> {
    source: SharedTimeline,
    entities: E,
    options: PlaybackOptions,
    state: PlaybackState,
    started_at: f64,
    elapsed_durations: i64,
    destroyed: bool,
    on_tick: Listeners<TickFn<E>>,
    on_complete: Listeners<CompleteFn>,
}

impl<E: 'static> Playback<E> {
    /// An idle playback of `source`.
    pub fn new(source: SharedTimeline, entities: E, options: PlaybackOptions) -> Self {
        Self {
            source,
            entities,
            options,
            state: PlaybackState::Idle,
            started_at: 0.0,
            elapsed_durations: 0,
            destroyed: false,
            on_tick: Listeners::default(),
            on_complete: Listeners::default(),
        }
    }

    /// Move into a shared handle usable as a group member.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Start playing; `time` maps to elapsed time 0.
    ///
    /// Fails when the playback is already running or has been destroyed.
    pub fn start(&mut self, time: f64) -> SegueResult<&mut Self> {
        if self.destroyed {
            return Err(SegueError::playback("playback has been destroyed"));
        }
        if self.state != PlaybackState::Idle {
            return Err(SegueError::playback("playback already started"));
        }
        self.state = PlaybackState::Started;
        self.started_at = time;
        self.elapsed_durations = 0;
        tracing::debug!(time, "playback started");
        Ok(self)
    }

    /// Stop now, or at the next loop seam when graceful stops are enabled and
    /// `ignore_graceful` is false. Stopping an idle playback does nothing.
    pub fn stop(&mut self, ignore_graceful: bool) -> &mut Self {
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Started | PlaybackState::Stopping
                if !ignore_graceful && self.options.graceful_stop =>
            {
                if self.state == PlaybackState::Started {
                    tracing::debug!("playback stopping at next loop seam");
                }
                self.state = PlaybackState::Stopping;
            }
            _ => {
                self.state = PlaybackState::Idle;
                tracing::debug!("playback completed");
                self.on_complete.emit();
            }
        }
        self
    }

    /// Advance to `time` and return the sampled channels.
    ///
    /// Returns an empty sample while idle and on the tick that completes the
    /// playback, either because the timeline ran out or because a graceful stop
    /// reached a loop seam.
    pub fn tick(&mut self, time: f64) -> SegueResult<Values> {
        if self.state == PlaybackState::Idle {
            return Ok(Vec::new());
        }
        let elapsed = time - self.started_at;
        let total = self.source.total_duration();
        let elapsed_durations = if total > 0.0 {
            (elapsed / total).floor() as i64
        } else {
            0
        };
        let just_looped = elapsed_durations > self.elapsed_durations;
        self.elapsed_durations = elapsed_durations;

        let current = if self.state == PlaybackState::Stopping && just_looped {
            None
        } else {
            self.source.at_time(elapsed)?
        };
        let Some(values) = current else {
            self.stop(true);
            return Ok(Vec::new());
        };
        tracing::trace!(time, elapsed, channels = values.len(), "playback tick");
        self.on_tick.emit_with(|callback| callback(&values, time, &self.entities));
        Ok(values)
    }

    /// Forcibly stop without notifying anyone. A destroyed playback cannot restart.
    pub fn destroy(&mut self) {
        self.on_tick.clear();
        self.on_complete.clear();
        self.stop(true);
        self.destroyed = true;
        tracing::debug!("playback destroyed");
    }

    /// Called with the sampled values, the tick time and the entities on every tick.
    pub fn on_tick(
        &mut self,
        callback: impl FnMut(&[Channel], f64, &E) + 'static,
    ) -> ListenerId {
        self.on_tick.add(Box::new(callback))
    }

    /// Called every time the playback completes.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) -> ListenerId {
        self.on_complete.add(Box::new(callback))
    }

    /// Called the next time the playback completes, then dropped.
    pub fn once_complete(&mut self, callback: impl FnOnce() + 'static) -> ListenerId {
        self.on_complete.add_once(once(callback))
    }

    /// Remove a tick or completion listener. Returns false for unknown ids.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.on_tick.remove(id) || self.on_complete.remove(id)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// True while started or stopping.
    pub fn is_started(&self) -> bool {
        self.state != PlaybackState::Idle
    }

    /// True between a graceful stop request and completion.
    pub fn is_stopping(&self) -> bool {
        self.state == PlaybackState::Stopping
    }

    /// True after [`Playback::destroy`].
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Channel count of the timeline.
    pub fn cardinality(&self) -> usize {
        self.source.cardinality()
    }

    /// Length of one pass of the timeline.
    pub fn total_duration(&self) -> f64 {
        self.source.total_duration()
    }

    /// The timeline being played.
    pub fn source(&self) -> &SharedTimeline {
        &self.source
    }

    /// Caller context passed to tick listeners.
    pub fn entities(&self) -> &E {
        &self.entities
    }

    /// Options this playback was created with.
    pub fn options(&self) -> PlaybackOptions {
        self.options
    }
}

impl<E: 'static> Playable for Playback<E> {
    fn start(&mut self, time: f64) -> SegueResult<()> {
        Playback::start(self, time).map(|_| ())
    }

    fn stop(&mut self, ignore_graceful: bool) {
        Playback::stop(self, ignore_graceful);
    }

    fn tick(&mut self, time: f64) -> SegueResult<Values> {
        Playback::tick(self, time)
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn cardinality(&self) -> usize {
        Playback::cardinality(self)
    }

    fn once_complete(&mut self, callback: Box<dyn FnOnce()>) -> ListenerId {
        Playback::once_complete(self, callback)
    }

    fn off(&mut self, id: ListenerId) -> bool {
        Playback::off(self, id)
    }

    fn destroy(&mut self) {
        Playback::destroy(self);
    }
}

impl<E: fmt::Debug> fmt::Debug for Playback<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("entities", &self.entities)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("elapsed_durations", &self.elapsed_durations)
            .field("destroyed", &self.destroyed)
            .field("on_tick", &self.on_tick)
            .field("on_complete", &self.on_complete)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
