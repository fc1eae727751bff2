//! Lap recorder for the stopwatch

use std::collections::VecDeque;

/// A single stopwatch snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapEntry {
    pub elapsed_ms: u64,
}

/// Newest-first list of laps. Unbounded; cleared only by `clear`.
#[derive(Debug, Default, Clone)]
pub struct LapRecorder {
    entries: VecDeque<LapEntry>,
}

impl LapRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed_ms: u64) {
        self.entries.push_front(LapEntry { elapsed_ms });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Laps, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &LapEntry> {
        self.entries.iter()
    }

    /// Laps paired with their 1-based ordinal (the oldest lap is 1)
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &LapEntry)> {
        let len = self.entries.len();
        self.entries
            .iter()
            .enumerate()
            .map(move |(index, entry)| (len - index, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_newest_first() {
        let mut laps = LapRecorder::new();
        for ms in [1000, 2500, 4000] {
            laps.record(ms);
        }
        let recorded: Vec<u64> = laps.iter().map(|lap| lap.elapsed_ms).collect();
        assert_eq!(recorded, vec![4000, 2500, 1000]);
        assert_eq!(laps.len(), 3);
    }

    #[test]
    fn test_numbering_and_duplicates() {
        let mut laps = LapRecorder::new();
        laps.record(500);
        laps.record(500);
        let numbered: Vec<(usize, u64)> = laps
            .numbered()
            .map(|(n, lap)| (n, lap.elapsed_ms))
            .collect();
        assert_eq!(numbered, vec![(2, 500), (1, 500)]);

        laps.clear();
        assert!(laps.is_empty());
    }
}
