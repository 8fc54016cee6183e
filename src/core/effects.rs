//! Delayed cosmetic effects, invalidated by session resets.
//!
//! Every scheduled item remembers the session generation it was created in.
//! When it comes due under a different generation it is dropped, so a hit
//! flash or a melody loop queued before a restart can never fire into the
//! next session.

/// Something scheduled to happen later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedEffect {
    /// Start (or loop) the background melody.
    Music,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due_at: f64,
    generation: u64,
    payload: T,
}

/// Generation-guarded queue of delayed payloads, keyed by loop time in seconds.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: f64, delay: f64, generation: u64, payload: T) {
        self.pending.push(Scheduled {
            due_at: now + delay,
            generation,
            payload,
        });
    }

    /// Remove and return every payload due at `now` that still belongs to
    /// `generation`. Due payloads from other generations are discarded.
    pub fn take_due(&mut self, now: f64, generation: u64) -> Vec<T> {
        let (due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|item| item.due_at <= now);
        self.pending = pending;

        due.into_iter()
            .filter(|item| {
                let current = item.generation == generation;
                if !current {
                    log::debug!("dropping effect from session {}", item.generation);
                }
                current
            })
            .map(|item| item.payload)
            .collect()
    }

    /// Whether anything is queued for `generation`.
    pub fn has_pending(&self, generation: u64) -> bool {
        self.pending.iter().any(|item| item.generation == generation)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// A purely visual window (hit flash, score pulse). Active only while both
/// the clock and the session generation still match.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Highlight {
    window: Option<(f64, u64)>,
}

impl Highlight {
    pub fn trigger(&mut self, now: f64, duration: f64, generation: u64) {
        self.window = Some((now + duration, generation));
    }

    pub fn is_active(&self, now: f64, generation: u64) -> bool {
        matches!(self.window, Some((until, g)) if g == generation && now < until)
    }
}
