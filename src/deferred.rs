//! Deferred work: the search debouncer and the reveal-on-visible tracker
//!
//! Both are driven by the caller's event loop. Time is passed in explicitly
//! as an [`Instant`], so the debouncer never spawns timers of its own and
//! tests can step through time deterministically. Both can be torn down
//! (`cancel` / `disconnect`), after which they never act on stale state.

use std::collections::HashSet;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Last-write-wins debouncer
///
/// Pushing a value replaces any pending one and re-arms the deadline, so at
/// most one value is ever pending.
///
/// # Examples
///
/// ```rust
/// use lonko_content::deferred::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(300));
///
/// debouncer.push("at", start);
/// debouncer.push("atom", start + Duration::from_millis(100));
/// assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
/// assert_eq!(debouncer.poll(start + Duration::from_millis(400)), Some("atom"));
/// assert!(!debouncer.is_pending());
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and re-arm the deadline
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value regardless of the deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drop the pending value
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

/// One-shot visibility tracker
///
/// An observed element is revealed the first time its visible ratio reaches
/// the threshold and stays revealed afterwards. Once disconnected the tracker
/// ignores all further visibility reports.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    threshold: f32,
    observed: HashSet<K>,
    revealed: HashSet<K>,
    connected: bool,
}

impl<K: Eq + Hash + Clone> RevealTracker<K> {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed: HashSet::new(),
            revealed: HashSet::new(),
            connected: true,
        }
    }

    /// Start watching an element
    pub fn observe(&mut self, key: K) {
        if self.connected && !self.revealed.contains(&key) {
            self.observed.insert(key);
        }
    }

    /// Report an element's visible ratio
    ///
    /// Returns true only on the report that reveals the element.
    pub fn report(&mut self, key: &K, visible_ratio: f32) -> bool {
        if !self.connected || visible_ratio < self.threshold || visible_ratio <= 0.0 {
            return false;
        }
        if !self.observed.remove(key) {
            return false;
        }
        self.revealed.insert(key.clone());
        true
    }

    pub fn is_revealed(&self, key: &K) -> bool {
        self.revealed.contains(key)
    }

    /// Number of elements still waiting to be revealed
    pub fn pending(&self) -> usize {
        self.observed.len()
    }

    /// Stop observing; revealed elements stay revealed
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.observed.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
