//! Transition history tracking.
//!
//! Keeps a bounded, in-memory log of completed transitions. Records are
//! appended when the current pointer swaps, so nested transitions appear in
//! the order the machine actually moved.

use super::key::StateKey;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use stance::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: 1u8,
///     to: 2u8,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.from, 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord<K: StateKey> {
    /// The key being transitioned from
    pub from: K,
    /// The key being transitioned to
    pub to: K,
    /// When the current pointer swapped
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of transitions.
///
/// Once `capacity` records are held, recording evicts the oldest one.
/// A capacity of zero disables recording.
///
/// # Example
///
/// ```rust
/// use stance::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_capacity(8);
/// history.record(TransitionRecord { from: 'a', to: 'b', timestamp: Utc::now() });
/// history.record(TransitionRecord { from: 'b', to: 'c', timestamp: Utc::now() });
///
/// let path = history.path();
/// assert_eq!(path, vec![&'a', &'b', &'c']);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionHistory<K: StateKey> {
    records: VecDeque<TransitionRecord<K>>,
    capacity: usize,
}

/// History capacity used when none is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

impl<K: StateKey> Default for TransitionHistory<K> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<K: StateKey> TransitionHistory<K> {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Maximum number of records retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest if the history is full.
    pub fn record(&mut self, record: TransitionRecord<K>) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Iterate over retained records, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord<K>> {
        self.records.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<K>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the path of keys traversed.
    ///
    /// Returns the `from` key of the oldest retained record followed by the
    /// `to` key of every record.
    pub fn path(&self) -> Vec<&K> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|record| &record.to));
        path
    }

    /// Time between the oldest and newest retained record.
    ///
    /// Returns `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestKey {
        Idle,
        Run,
        Jump,
    }

    impl StateKey for TestKey {}

    fn record(from: TestKey, to: TestKey) -> TransitionRecord<TestKey> {
        TransitionRecord {
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: TransitionHistory<TestKey> = TransitionHistory::default();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn path_returns_key_sequence() {
        let mut history = TransitionHistory::default();
        history.record(record(TestKey::Idle, TestKey::Run));
        history.record(record(TestKey::Run, TestKey::Jump));

        assert_eq!(
            history.path(),
            vec![&TestKey::Idle, &TestKey::Run, &TestKey::Jump]
        );
        assert_eq!(history.last().map(|r| r.to), Some(TestKey::Jump));
    }

    #[test]
    fn full_history_evicts_oldest() {
        let mut history = TransitionHistory::with_capacity(2);
        history.record(record(TestKey::Idle, TestKey::Run));
        history.record(record(TestKey::Run, TestKey::Jump));
        history.record(record(TestKey::Jump, TestKey::Idle));

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.path(),
            vec![&TestKey::Run, &TestKey::Jump, &TestKey::Idle]
        );
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = TransitionHistory::with_capacity(0);
        history.record(record(TestKey::Idle, TestKey::Run));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = TransitionHistory::default();
        history.record(record(TestKey::Idle, TestKey::Run));

        std::thread::sleep(Duration::from_millis(10));

        history.record(record(TestKey::Run, TestKey::Jump));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn single_record_has_duration_zero() {
        let mut history = TransitionHistory::default();
        history.record(record(TestKey::Idle, TestKey::Run));

        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }
}
