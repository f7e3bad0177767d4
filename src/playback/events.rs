use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::Channel;

/// Handle returned when registering a listener; pass it to `off` to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Tick listener: the sampled channels, the clock time and the playback's entities.
pub type TickFn<E> = dyn FnMut(&[Channel], f64, &E);

/// Completion listener.
pub type CompleteFn = dyn FnMut();

struct Entry<F: ?Sized> {
    id: ListenerId,
    once: bool,
    callback: Box<F>,
}

/// Ordered listener list. Listeners fire in registration order.
pub(crate) struct Listeners<F: ?Sized> {
    entries: Vec<Entry<F>>,
}

impl<F: ?Sized> Listeners<F> {
    pub(crate) fn add(&mut self, callback: Box<F>) -> ListenerId {
        self.push(callback, false)
    }

    /// Register a listener that is dropped after it fires once.
    pub(crate) fn add_once(&mut self, callback: Box<F>) -> ListenerId {
        self.push(callback, true)
    }

    fn push(&mut self, callback: Box<F>, once: bool) -> ListenerId {
        let id = ListenerId::next();
        self.entries.push(Entry { id, once, callback });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Invoke every listener through `call`, then drop the one-shot ones.
    pub(crate) fn emit_with(&mut self, mut call: impl FnMut(&mut F)) {
        for entry in &mut self.entries {
            call(&mut entry.callback);
        }
        self.entries.retain(|e| !e.once);
    }

    fn absorb(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

impl Listeners<CompleteFn> {
    pub(crate) fn emit(&mut self) {
        self.emit_with(|callback| callback());
    }
}

/// Fire completion listeners held in a shared cell.
///
/// The list is moved out while firing, so listeners may register further
/// listeners on the same cell; those are kept for the next emission.
pub(crate) fn emit_shared(cell: &RefCell<Listeners<CompleteFn>>) {
    let mut firing = cell.take();
    firing.emit();
    let added = cell.replace(firing);
    cell.borrow_mut().absorb(added);
}

/// Adapt a one-shot closure to the completion listener shape.
pub(crate) fn once(callback: impl FnOnce() + 'static) -> Box<CompleteFn> {
    let mut callback = Some(callback);
    Box::new(move || {
        if let Some(callback) = callback.take() {
            callback();
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/playback/events.rs"]
mod tests;
