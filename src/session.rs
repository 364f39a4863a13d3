//! Per-session run log
//!
//! Every finished run is appended in order. Nothing is stored between
//! launches; the headless binary prints the log as its summary.

use serde::{Deserialize, Serialize};

use crate::ticks_to_secs;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// 1-based run number within the session
    pub run: u32,
    /// Gaps passed
    pub score: u64,
    /// Ticks from scene build to death
    pub ticks_survived: u64,
    /// Session tick at which the run ended
    pub ended_at: u64,
}

impl RunRecord {
    pub fn seconds_survived(&self) -> f32 {
        ticks_to_secs(self.ticks_survived)
    }
}

/// All runs finished since launch, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    pub runs: Vec<RunRecord>,
    /// Index into `runs` of the best run so far
    best: Option<usize>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished run; returns true if it is a new session best
    ///
    /// Best means highest score. On equal scores the longer survival wins,
    /// and an exact tie keeps the earlier run.
    pub fn record(&mut self, score: u64, ticks_survived: u64, ended_at: u64) -> bool {
        let record = RunRecord {
            run: self.runs.len() as u32 + 1,
            score,
            ticks_survived,
            ended_at,
        };
        let beats = match self.best() {
            None => true,
            Some(best) => (score, ticks_survived) > (best.score, best.ticks_survived),
        };
        self.runs.push(record);
        if beats {
            self.best = Some(self.runs.len() - 1);
        }
        beats
    }

    pub fn best(&self) -> Option<&RunRecord> {
        self.best.and_then(|i| self.runs.get(i))
    }

    pub fn best_score(&self) -> u64 {
        self.best().map_or(0, |r| r.score)
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn total_score(&self) -> u64 {
        self.runs.iter().map(|r| r.score).sum()
    }

    /// Mean score per run (0 with no runs)
    pub fn mean_score(&self) -> f32 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.total_score() as f32 / self.runs.len() as f32
    }

    pub fn longest_survival_ticks(&self) -> u64 {
        self.runs.iter().map(|r| r.ticks_survived).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log() {
        let log = SessionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.best(), None);
        assert_eq!(log.best_score(), 0);
        assert_eq!(log.mean_score(), 0.0);
        assert_eq!(log.longest_survival_ticks(), 0);
    }

    #[test]
    fn test_runs_numbered_in_order() {
        let mut log = SessionLog::new();
        log.record(3, 900, 900);
        log.record(0, 130, 1200);
        log.record(5, 1400, 2700);
        let numbers: Vec<u32> = log.runs.iter().map(|r| r.run).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(log.run_count(), 3);
        assert_eq!(log.total_score(), 8);
        assert_eq!(log.longest_survival_ticks(), 1400);
    }

    #[test]
    fn test_best_tracking() {
        let mut log = SessionLog::new();
        // A zero-score first run is still the best so far
        assert!(log.record(0, 130, 130));
        assert!(log.record(4, 1000, 1200));
        assert!(!log.record(2, 2000, 3300));
        // Same score, survived longer
        assert!(log.record(4, 1100, 4500));
        // Exact tie keeps the earlier run
        assert!(!log.record(4, 1100, 5700));

        let best = log.best().map(|r| r.run);
        assert_eq!(best, Some(4));
        assert_eq!(log.best_score(), 4);
    }

    #[test]
    fn test_mean_score() {
        let mut log = SessionLog::new();
        log.record(1, 10, 10);
        log.record(2, 10, 20);
        assert!((log.mean_score() - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_seconds_survived() {
        let record = RunRecord {
            run: 1,
            score: 1,
            ticks_survived: 240,
            ended_at: 0,
        };
        assert!((record.seconds_survived() - 2.0).abs() < 0.001);
    }
}
