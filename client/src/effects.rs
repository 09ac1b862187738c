use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Keyed one-shot deadlines for transient visual effects.
///
/// Timers do not fire on their own: the owner calls `expire` with the current
/// clock and reacts to the keys that come back. Arming an armed key restarts it.
#[derive(Debug, Clone)]
pub struct EffectTimers<K> {
    deadlines: HashMap<K, f64>,
}

impl<K> Default for EffectTimers<K> {
    fn default() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> EffectTimers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, key: K, now_ms: f64, duration_ms: f64) {
        self.deadlines.insert(key, now_ms + duration_ms.max(0.0));
    }

    /// Returns whether the key was armed. Cancelling twice is harmless.
    pub fn cancel<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadlines.remove(key).is_some()
    }

    pub fn is_armed<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadlines.contains_key(key)
    }

    pub fn deadline<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadlines.get(key).copied()
    }

    /// Removes and returns every key whose deadline is at or before `now_ms`.
    pub fn expire(&mut self, now_ms: f64) -> Vec<K> {
        let fired: Vec<K> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &fired {
            self.deadlines.remove(key);
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.deadlines.values().copied().reduce(f64::min)
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

/// Browser wake-up for the field's next effect deadline. Holds at most one
/// pending `Timeout`; rescheduling or dropping cancels the previous one.
#[derive(Default)]
pub struct WakeTimer {
    pending: Option<gloo_timers::callback::Timeout>,
}

impl WakeTimer {
    pub fn schedule(&mut self, delay_ms: f64, callback: impl FnOnce() + 'static) {
        let delay = delay_ms.clamp(0.0, u32::MAX as f64).ceil() as u32;
        self.pending = Some(gloo_timers::callback::Timeout::new(delay, callback));
    }

    pub fn cancel(&mut self) {
        // Dropping a gloo `Timeout` clears it.
        self.pending = None;
    }
}
