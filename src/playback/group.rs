use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::foundation::core::{Accumulator, AggregationMethod, Channel, Values};
use crate::foundation::error::{SegueError, SegueResult};
use crate::playback::events::{CompleteFn, ListenerId, Listeners, TickFn, emit_shared, once};
use crate::playback::player::{Playable, PlaybackState, SharedPlayable};

/// State reachable from member completion listeners without borrowing the group.
#[derive(Default)]
struct GroupShared {
    state: Cell<PlaybackState>,
    on_complete: RefCell<Listeners<CompleteFn>>,
}

impl GroupShared {
    fn complete(&self) {
        self.state.set(PlaybackState::Idle);
        tracing::debug!("playback group completed");
        emit_shared(&self.on_complete);
    }
}

/// Fan-in for a group stop: counts members still finishing their graceful stop.
struct StopBarrier {
    pending: Cell<usize>,
    closed: Cell<bool>,
    shared: Rc<GroupShared>,
}

impl StopBarrier {
    fn new(shared: Rc<GroupShared>) -> Self {
        Self {
            pending: Cell::new(0),
            closed: Cell::new(false),
            shared,
        }
    }

    fn wait_for_one(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    fn arrive(&self) {
        if self.closed.get() {
            return;
        }
        let left = self.pending.get().saturating_sub(1);
        self.pending.set(left);
        tracing::trace!(left, "stop barrier arrival");
        if left == 0 {
            self.release();
        }
    }

    fn release(&self) {
        if !self.closed.replace(true) {
            self.shared.complete();
        }
    }

    /// Superseded barriers never complete the group.
    fn cancel(&self) {
        self.closed.set(true);
    }
}

/// Several playbacks ticked together, with their samples combined or composed.
///
/// Members keep their own start times and lifecycles. Stopping the group stops
/// every member and completes only once each member has finished.
pub struct PlaybackGroup<E = ()> {
    members: Vec<SharedPlayable>,
    method: AggregationMethod,
    entities: E,
    cardinality: usize,
    shared: Rc<GroupShared>,
    barrier: Option<Rc<StopBarrier>>,
    last_time: f64,
    destroyed: bool,
    on_tick: Listeners<TickFn<E>>,
}

impl<E: 'static> PlaybackGroup<E> {
    /// An idle group over `members`, aggregated with `method`.
    pub fn new(members: Vec<SharedPlayable>, method: AggregationMethod, entities: E) -> Self {
        let mut group = Self {
            members,
            method,
            entities,
            cardinality: 0,
            shared: Rc::default(),
            barrier: None,
            last_time: 0.0,
            destroyed: false,
            on_tick: Listeners::default(),
        };
        group.resize();
        group
    }

    /// Move into a shared handle usable as a member of another group.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Start every idle member at `time`. Members already running are left alone.
    ///
    /// If a member fails to start, the members started by this call are stopped
    /// again and the group stays idle.
    pub fn start(&mut self, time: f64) -> SegueResult<&mut Self> {
        if self.destroyed {
            return Err(SegueError::group("playback group has been destroyed"));
        }
        if self.state() != PlaybackState::Idle {
            return Err(SegueError::group("playback group already started"));
        }
        let mut started: Vec<usize> = Vec::new();
        for (index, member) in self.members.iter().enumerate() {
            let mut member = member.borrow_mut();
            if member.state() != PlaybackState::Idle {
                continue;
            }
            if let Err(err) = member.start(time) {
                drop(member);
                tracing::warn!(index, error = %err, "group member failed to start");
                for &undo in &started {
                    self.members[undo].borrow_mut().stop(true);
                }
                return Err(err);
            }
            started.push(index);
        }
        self.barrier = None;
        self.last_time = time;
        self.shared.state.set(PlaybackState::Started);
        tracing::debug!(time, members = self.members.len(), "playback group started");
        Ok(self)
    }

    /// Stop every member; completes once the last member still stopping finishes.
    pub fn stop(&mut self, ignore_graceful: bool) -> &mut Self {
        if self.state() == PlaybackState::Idle {
            return self;
        }
        if let Some(previous) = self.barrier.take() {
            previous.cancel();
        }
        self.shared.state.set(PlaybackState::Stopping);

        let barrier = Rc::new(StopBarrier::new(Rc::clone(&self.shared)));
        for member in &self.members {
            let mut member = member.borrow_mut();
            member.stop(ignore_graceful);
            if member.state() == PlaybackState::Stopping {
                barrier.wait_for_one();
                let barrier = Rc::clone(&barrier);
                member.once_complete(Box::new(move || barrier.arrive()));
            }
        }
        tracing::debug!(
            pending = barrier.pending.get(),
            ignore_graceful,
            "playback group stopping"
        );
        if barrier.pending.get() == 0 {
            barrier.release();
        } else {
            self.barrier = Some(barrier);
        }
        self
    }

    /// Tick every member in insertion order and aggregate their samples.
    pub fn tick(&mut self, time: f64) -> SegueResult<Values> {
        if self.state() == PlaybackState::Idle {
            return Ok(Vec::new());
        }
        self.last_time = time;
        let sample = match self.method {
            AggregationMethod::Combine => self.combine(time)?,
            AggregationMethod::Compose => self.compose(time)?,
        };
        let Some(values) = sample else {
            return Ok(Vec::new());
        };
        tracing::trace!(time, channels = values.len(), "playback group tick");
        self.on_tick.emit_with(|callback| callback(&values, time, &self.entities));
        Ok(values)
    }

    fn combine(&self, time: f64) -> SegueResult<Option<Values>> {
        let mut acc = Accumulator::zeroed(self.cardinality);
        for member in &self.members {
            let values = member.borrow_mut().tick(time)?;
            if !values.is_empty() {
                acc.add(&values);
            }
        }
        Ok(acc.finish())
    }

    fn compose(&self, time: f64) -> SegueResult<Option<Values>> {
        let mut any = false;
        let mut slots = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let values = member.borrow_mut().tick(time)?;
            any |= !values.is_empty();
            slots.push(Channel::slot(values));
        }
        Ok(any.then_some(slots))
    }

    /// Add a member. A member joining a started group is started at the group's
    /// most recent clock time.
    pub fn add(&mut self, member: SharedPlayable) -> SegueResult<&mut Self> {
        if self.contains(&member) {
            return Err(SegueError::group(
                "playback is already a member of this group",
            ));
        }
        if self.state() == PlaybackState::Started {
            let mut joining = member.borrow_mut();
            if joining.state() == PlaybackState::Idle {
                joining.start(self.last_time)?;
            }
        }
        self.members.push(member);
        self.resize();
        Ok(self)
    }

    /// Remove and stop a member; returns whether it was present.
    ///
    /// While the group is stopping the member is stopped immediately, since it
    /// will no longer be ticked by the group.
    pub fn remove(&mut self, member: &SharedPlayable) -> bool {
        let Some(index) = self.members.iter().position(|m| Rc::ptr_eq(m, member)) else {
            return false;
        };
        let removed = self.members.remove(index);
        self.resize();
        let immediate = self.state() == PlaybackState::Stopping;
        removed.borrow_mut().stop(immediate);
        true
    }

    /// True when `member` (by identity) belongs to the group.
    pub fn contains(&self, member: &SharedPlayable) -> bool {
        self.members.iter().any(|m| Rc::ptr_eq(m, member))
    }

    /// Members in tick order.
    pub fn members(&self) -> &[SharedPlayable] {
        &self.members
    }

    fn resize(&mut self) {
        self.cardinality = match self.method {
            AggregationMethod::Combine => self
                .members
                .iter()
                .map(|m| m.borrow().cardinality())
                .max()
                .unwrap_or(0),
            AggregationMethod::Compose => self.members.len(),
        };
        tracing::debug!(
            members = self.members.len(),
            cardinality = self.cardinality,
            "resized playback group"
        );
    }

    /// Destroy every member and drop all listeners. The group cannot restart.
    pub fn destroy(&mut self) {
        for member in &self.members {
            member.borrow_mut().destroy();
        }
        if let Some(barrier) = self.barrier.take() {
            barrier.cancel();
        }
        self.on_tick.clear();
        self.shared.on_complete.borrow_mut().clear();
        self.shared.state.set(PlaybackState::Idle);
        self.destroyed = true;
        tracing::debug!("playback group destroyed");
    }

    /// Called with the aggregated values, the tick time and the entities on every tick.
    pub fn on_tick(
        &mut self,
        callback: impl FnMut(&[Channel], f64, &E) + 'static,
    ) -> ListenerId {
        self.on_tick.add(Box::new(callback))
    }

    /// Called every time the group completes.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) -> ListenerId {
        self.shared.on_complete.borrow_mut().add(Box::new(callback))
    }

    /// Called the next time the group completes, then dropped.
    pub fn once_complete(&mut self, callback: impl FnOnce() + 'static) -> ListenerId {
        self.shared.on_complete.borrow_mut().add_once(once(callback))
    }

    /// Remove a tick or completion listener. Returns false for unknown ids.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.on_tick.remove(id) || self.shared.on_complete.borrow_mut().remove(id)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.shared.state.get()
    }

    /// True while started or stopping.
    pub fn is_started(&self) -> bool {
        self.state() != PlaybackState::Idle
    }

    /// True while waiting for members to finish a graceful stop.
    pub fn is_stopping(&self) -> bool {
        self.state() == PlaybackState::Stopping
    }

    /// True after [`PlaybackGroup::destroy`].
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Widest member for combine, member count for compose.
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// How member samples are aggregated.
    pub fn method(&self) -> AggregationMethod {
        self.method
    }

    /// Caller context passed to tick listeners.
    pub fn entities(&self) -> &E {
        &self.entities
    }
}

impl<E: 'static> Playable for PlaybackGroup<E> {
    fn start(&mut self, time: f64) -> SegueResult<()> {
        PlaybackGroup::start(self, time).map(|_| ())
    }

    fn stop(&mut self, ignore_graceful: bool) {
        PlaybackGroup::stop(self, ignore_graceful);
    }

    fn tick(&mut self, time: f64) -> SegueResult<Values> {
        PlaybackGroup::tick(self, time)
    }

    fn state(&self) -> PlaybackState {
        PlaybackGroup::state(self)
    }

    fn cardinality(&self) -> usize {
        self.cardinality
    }

    fn once_complete(&mut self, callback: Box<dyn FnOnce()>) -> ListenerId {
        PlaybackGroup::once_complete(self, callback)
    }

    fn off(&mut self, id: ListenerId) -> bool {
        PlaybackGroup::off(self, id)
    }

    fn destroy(&mut self) {
        PlaybackGroup::destroy(self);
    }
}

impl<E: fmt::Debug> fmt::Debug for PlaybackGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackGroup")
            .field("members", &self.members.len())
            .field("method", &self.method)
            .field("entities", &self.entities)
            .field("cardinality", &self.cardinality)
            .field("state", &self.shared.state.get())
            .field("last_time", &self.last_time)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/group.rs"]
mod tests;
