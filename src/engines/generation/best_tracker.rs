use crate::engines::evaluation::FitnessRecord;
use crate::engines::generation::genome::Individual;
use serde::Serialize;

/// An individual and the fitness it achieved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Champion {
    pub individual: Individual,
    pub fitness: f64,
}

/// Best of the latest generation and best across the whole run.
///
/// Both only change on a strictly greater fitness, so ties keep whichever
/// individual was found first.
#[derive(Debug, Clone, Default)]
pub struct BestTracker {
    generation_best: Option<Champion>,
    global_best: Option<Champion>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// First record holding the highest fitness, `None` for an empty slice.
    pub fn best_of(records: &[FitnessRecord]) -> Option<Champion> {
        let mut best: Option<&FitnessRecord> = None;
        for record in records {
            if best.map_or(true, |b| record.fitness > b.fitness) {
                best = Some(record);
            }
        }
        best.map(|r| Champion {
            individual: r.individual.clone(),
            fitness: r.fitness,
        })
    }

    /// Scan one generation's records and update both bests.
    /// Returns true when the global best changed.
    pub fn track(&mut self, records: &[FitnessRecord]) -> bool {
        self.generation_best = Self::best_of(records);

        let Some(candidate) = &self.generation_best else {
            return false;
        };
        let improved = self
            .global_best
            .as_ref()
            .map_or(true, |global| candidate.fitness > global.fitness);
        if improved {
            self.global_best = Some(candidate.clone());
        }
        improved
    }

    pub fn generation_best(&self) -> Option<&Champion> {
        self.generation_best.as_ref()
    }

    pub fn global_best(&self) -> Option<&Champion> {
        self.global_best.as_ref()
    }

    pub fn into_global_best(self) -> Option<Champion> {
        self.global_best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::FAILED_FITNESS;

    fn recs(values: &[(i64, f64)]) -> Vec<FitnessRecord> {
        values
            .iter()
            .map(|&(g, f)| FitnessRecord::new(vec![g], f))
            .collect()
    }

    #[test]
    fn test_best_of_keeps_first_on_tie() {
        let best = BestTracker::best_of(&recs(&[(1, 2.0), (2, 5.0), (3, 5.0)])).unwrap();
        assert_eq!(best.individual, vec![2]);
        assert_eq!(best.fitness, 5.0);
        assert!(BestTracker::best_of(&[]).is_none());
    }

    #[test]
    fn test_global_only_moves_on_strict_improvement() {
        let mut tracker = BestTracker::new();
        assert!(tracker.track(&recs(&[(1, 3.0), (2, 1.0)])));
        assert!(!tracker.track(&recs(&[(5, 3.0)])));
        assert_eq!(tracker.global_best().unwrap().individual, vec![1]);
        assert_eq!(tracker.generation_best().unwrap().individual, vec![5]);

        assert!(!tracker.track(&recs(&[(6, 0.5)])));
        assert_eq!(tracker.global_best().unwrap().fitness, 3.0);

        assert!(tracker.track(&recs(&[(7, 4.0)])));
        assert_eq!(tracker.into_global_best().unwrap().individual, vec![7]);
    }

    #[test]
    fn test_success_beats_failures() {
        let mut tracker = BestTracker::new();
        tracker.track(&recs(&[(1, FAILED_FITNESS), (2, FAILED_FITNESS)]));
        assert_eq!(tracker.global_best().unwrap().individual, vec![1]);

        assert!(tracker.track(&recs(&[(3, FAILED_FITNESS), (4, -100.0)])));
        assert_eq!(tracker.global_best().unwrap().individual, vec![4]);
    }
}
