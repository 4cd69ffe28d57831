use std::collections::BTreeMap;

/// Round number together with iteration within this round.
pub type Turn = (u32, u32);

/// Values recorded during negotiations, ordered by round and iteration.
/// Keeps only `max_rounds` most recent rounds.
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: BTreeMap<Turn, T>,
    max_rounds: usize,
}

impl<T> History<T> {
    pub fn new(max_rounds: usize) -> History<T> {
        History {
            entries: BTreeMap::new(),
            max_rounds: max_rounds.max(1),
        }
    }

    /// Returns previous value recorded for the same turn.
    pub fn record(&mut self, round: u32, iteration: u32, value: T) -> Option<T> {
        let previous = self.entries.insert((round, iteration), value);
        self.evict();
        previous
    }

    pub fn get(&self, round: u32, iteration: u32) -> Option<&T> {
        self.entries.get(&(round, iteration))
    }

    pub fn round(&self, round: u32) -> impl Iterator<Item = (u32, &T)> {
        self.entries
            .range((round, 0)..=(round, u32::MAX))
            .map(|((_, iteration), value)| (*iteration, value))
    }

    pub fn last(&self) -> Option<(Turn, &T)> {
        self.entries.iter().next_back().map(|(turn, value)| (*turn, value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Turn, &T)> {
        self.entries.iter().map(|(turn, value)| (*turn, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rounds(&self) -> Vec<u32> {
        let mut rounds: Vec<u32> = self.entries.keys().map(|(round, _)| *round).collect();
        rounds.dedup();
        rounds
    }

    fn evict(&mut self) {
        let rounds = self.rounds();
        if rounds.len() <= self.max_rounds {
            return;
        }

        let first_kept = rounds[rounds.len() - self.max_rounds];
        self.entries = self.entries.split_off(&(first_kept, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_ordered_by_turn() {
        let mut history = History::new(10);
        history.record(1, 2, "c");
        history.record(0, 5, "b");
        history.record(0, 1, "a");

        let values: Vec<_> = history.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        assert_eq!(history.last(), Some(((1, 2), &"c")));
    }

    #[test]
    fn test_history_round_view() {
        let mut history = History::new(10);
        history.record(0, 1, 1.0);
        history.record(1, 1, 2.0);
        history.record(1, 2, 3.0);
        history.record(2, 1, 4.0);

        let round: Vec<_> = history.round(1).collect();
        assert_eq!(round, vec![(1, &2.0), (2, &3.0)]);
        assert_eq!(history.round(5).count(), 0);
    }

    #[test]
    fn test_history_keeps_recent_rounds() {
        let mut history = History::new(2);
        for round in 0..5 {
            history.record(round, 1, round);
            history.record(round, 2, round);
        }

        assert_eq!(history.rounds(), vec![3, 4]);
        assert_eq!(history.len(), 4);
        assert_eq!(history.get(2, 1), None);
        assert_eq!(history.get(4, 2), Some(&4));
    }

    #[test]
    fn test_history_overwrites_turn() {
        let mut history = History::new(1);
        assert_eq!(history.record(0, 1, "a"), None);
        assert_eq!(history.record(0, 1, "b"), Some("a"));
        assert_eq!(history.len(), 1);
    }
}
