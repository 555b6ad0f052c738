use serde::Serialize;

/// One recorded evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub iteration: usize,
    pub parameters: Vec<f64>,
    pub energy: f64,
}

/// Ordered record of the evaluations of one optimization run.
///
/// Only the minimizers in this crate append to it; callers get a read-only
/// view through [`OptimizationResult`](crate::OptimizationResult).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConvergenceHistory {
    entries: Vec<HistoryEntry>,
}

impl ConvergenceHistory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, iteration: usize, parameters: &[f64], energy: f64) {
        self.entries.push(HistoryEntry {
            iteration,
            parameters: parameters.to_vec(),
            energy,
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Lowest-energy entry; the earliest one wins ties.
    pub fn best(&self) -> Option<&HistoryEntry> {
        self.best_within(self.entries.len())
    }

    /// Lowest-energy entry among the first `prefix_len` entries.
    pub fn best_within(&self, prefix_len: usize) -> Option<&HistoryEntry> {
        let end = prefix_len.min(self.entries.len());
        self.entries[..end]
            .iter()
            .fold(None, |best: Option<&HistoryEntry>, entry| match best {
                Some(b) if b.energy <= entry.energy => Some(b),
                _ => Some(entry),
            })
    }

    /// `(iteration, energy)` pairs, for plotting.
    pub fn energies(&self) -> Vec<(usize, f64)> {
        self.entries.iter().map(|e| (e.iteration, e.energy)).collect()
    }

    /// Best-so-far energy after each entry. Non-increasing.
    pub fn running_minima(&self) -> Vec<f64> {
        self.entries
            .iter()
            .scan(f64::INFINITY, |best, e| {
                *best = best.min(e.energy);
                Some(*best)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ConvergenceHistory;

    fn sample() -> ConvergenceHistory {
        let mut h = ConvergenceHistory::default();
        h.record(0, &[0.0], 3.0);
        h.record(1, &[1.0], 1.0);
        h.record(2, &[2.0], 2.0);
        h.record(3, &[3.0], 1.0);
        h
    }

    #[test]
    fn best_prefers_earliest_minimum() {
        let h = sample();
        let best = h.best().unwrap();
        assert_eq!(best.iteration, 1);
        assert_eq!(best.parameters, vec![1.0]);
    }

    #[test]
    fn best_within_prefix() {
        let h = sample();
        assert_eq!(h.best_within(1).unwrap().iteration, 0);
        assert_eq!(h.best_within(3).unwrap().iteration, 1);
        assert_eq!(h.best_within(100).unwrap().iteration, 1);
        assert!(h.best_within(0).is_none());
    }

    #[test]
    fn running_minima_never_increase() {
        assert_eq!(sample().running_minima(), vec![3.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn energies_for_plotting() {
        assert_eq!(
            sample().energies(),
            vec![(0, 3.0), (1, 1.0), (2, 2.0), (3, 1.0)]
        );
    }

    #[test]
    fn empty_history_has_no_best() {
        let h = ConvergenceHistory::default();
        assert!(h.is_empty());
        assert!(h.best().is_none());
        assert!(h.running_minima().is_empty());
    }
}
