use crate::config::OptimizerConfig;
use crate::engines::evaluation::FitnessRecord;
use crate::engines::generation::genome::Individual;
use crate::engines::generation::operators::crossover;
use crate::error::Result;
use rand::Rng;
use std::collections::HashSet;

/// The three parts of a freshly selected population.
#[derive(Debug, Clone, Default)]
pub struct SelectionOutcome {
    pub elites: Vec<Individual>,
    pub stochastic: Vec<Individual>,
    pub offspring: Vec<Individual>,
}

impl SelectionOutcome {
    pub fn len(&self) -> usize {
        self.elites.len() + self.stochastic.len() + self.offspring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elites first, then stochastic picks, then offspring.
    pub fn into_population(self) -> Vec<Individual> {
        let mut population = self.elites;
        population.extend(self.stochastic);
        population.extend(self.offspring);
        population
    }
}

/// Mean over successfully evaluated records, `None` when every evaluation failed.
pub fn mean_fitness(records: &[FitnessRecord]) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter(|r| !r.is_failed())
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.fitness, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Pick up to `quota` distinct individuals with fitness strictly above the mean,
/// best first. Ties keep the earlier record.
pub fn select_elites(records: &[FitnessRecord], quota: usize) -> Vec<Individual> {
    let Some(mean) = mean_fitness(records) else {
        return Vec::new();
    };

    let mut above_mean: Vec<&FitnessRecord> = records
        .iter()
        .filter(|r| !r.is_failed() && r.fitness > mean)
        .collect();
    let quota = quota.min(above_mean.len());

    // Stable sort keeps first-occurrence order among equal fitness.
    above_mean.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

    let mut elites: Vec<Individual> = Vec::with_capacity(quota);
    for record in above_mean {
        if elites.len() == quota {
            break;
        }
        if !elites.contains(&record.individual) {
            elites.push(record.individual.clone());
        }
    }
    elites
}

/// Roulette weights for a set of fitness values.
///
/// Failed (non-finite) values weigh zero. If any remaining value is negative,
/// all of them are shifted so the minimum becomes zero.
fn roulette_weights(fitness: &[f64]) -> Vec<f64> {
    let min = fitness
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(f64::INFINITY, f64::min);
    let shift = if min < 0.0 { -min } else { 0.0 };

    fitness
        .iter()
        .map(|&f| if f.is_finite() { f + shift } else { 0.0 })
        .collect()
}

/// Cumulative selection probabilities in record order.
///
/// The table is non-decreasing and ends at 1.0. A zero total falls back to a
/// uniform distribution over the successfully evaluated entries (or over all
/// entries when none succeeded).
pub fn cumulative_frequencies(fitness: &[f64]) -> Vec<f64> {
    if fitness.is_empty() {
        return Vec::new();
    }

    let mut weights = roulette_weights(fitness);
    let mut total: f64 = weights.iter().sum();

    if total == 0.0 {
        let any_success = fitness.iter().any(|f| f.is_finite());
        weights = fitness
            .iter()
            .map(|f| if f.is_finite() || !any_success { 1.0 } else { 0.0 })
            .collect();
        total = weights.iter().sum();
    }

    let mut cumulated = 0.0;
    weights
        .iter()
        .map(|w| {
            cumulated += w / total;
            cumulated
        })
        .collect()
}

/// Index of the first weighted entry whose cumulative frequency reaches `draw`.
///
/// Leading zero-weight entries are never returned, even for a draw of 0.0.
/// Rounding can leave the final entry a hair under 1.0; draws above it land on
/// the last entry that carries any weight.
fn spin(cumulative: &[f64], draw: f64) -> usize {
    cumulative
        .iter()
        .position(|&c| c > 0.0 && c >= draw)
        .unwrap_or_else(|| {
            let mut previous = 0.0;
            let mut last_weighted = cumulative.len() - 1;
            for (i, &c) in cumulative.iter().enumerate() {
                if c > previous {
                    last_weighted = i;
                }
                previous = c;
            }
            last_weighted
        })
}

/// Roulette wheel selection: `count` independent fitness-proportionate draws
pub fn roulette_selection<R: Rng>(
    records: &[FitnessRecord],
    count: usize,
    rng: &mut R,
) -> Vec<Individual> {
    if records.is_empty() {
        return Vec::new();
    }

    let fitness: Vec<f64> = records.iter().map(|r| r.fitness).collect();
    let cumulative = cumulative_frequencies(&fitness);

    (0..count)
        .map(|_| {
            let draw = rng.gen::<f64>();
            records[spin(&cumulative, draw)].individual.clone()
        })
        .collect()
}

/// Individuals of the generation that were neither elite nor picked by the
/// roulette, in record order.
pub fn crossover_parents(
    records: &[FitnessRecord],
    elites: &[Individual],
    stochastic: &[Individual],
) -> Vec<Individual> {
    let excluded: HashSet<&Individual> = elites.iter().chain(stochastic).collect();
    records
        .iter()
        .map(|r| &r.individual)
        .filter(|ind| !excluded.contains(ind))
        .cloned()
        .collect()
}

/// Run elitism, roulette selection and crossover for one generation.
///
/// Elites are the best structurally distinct individuals strictly above the
/// generation mean, capped by the elitist quota. Stochastic picks are
/// fitness-proportionate draws (with replacement) from the records left after
/// removing elites. Offspring are bred from everyone that was neither elite
/// nor picked, filling the remaining slots.
///
/// The result always holds exactly `config.population_size` individuals: when
/// crossover rounds an odd offspring count up, the surplus child is dropped.
pub fn select_next_generation<R: Rng>(
    records: &[FitnessRecord],
    config: &OptimizerConfig,
    rng: &mut R,
) -> Result<SelectionOutcome> {
    let elites = select_elites(records, config.elitist_count());
    let elite_set: HashSet<&Individual> = elites.iter().collect();

    let mut working: Vec<FitnessRecord> = records
        .iter()
        .filter(|r| !elite_set.contains(&r.individual))
        .cloned()
        .collect();

    let stochastic_count = config.stochastic_count();
    if working.is_empty() && stochastic_count > 0 {
        log::warn!("Every individual was elite; roulette draws from the whole generation");
        working = records.to_vec();
    }
    let stochastic = roulette_selection(&working, stochastic_count, rng);

    let child_count = config
        .population_size
        .saturating_sub(elites.len() + stochastic.len());

    let offspring = if child_count == 0 {
        Vec::new()
    } else {
        let mut parents = crossover_parents(records, &elites, &stochastic);
        if parents.len() < 2 {
            log::warn!(
                "Only {} crossover parent(s) left after selection; breeding from the whole generation",
                parents.len()
            );
            parents = records.iter().map(|r| r.individual.clone()).collect();
        }

        let mut children = crossover(&parents, child_count, rng)?;
        children.truncate(child_count);
        children
    };

    log::debug!(
        "Selected {} elites, {} stochastic, {} offspring",
        elites.len(),
        stochastic.len(),
        offspring.len()
    );

    Ok(SelectionOutcome {
        elites,
        stochastic,
        offspring,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::FAILED_FITNESS;
    use crate::engines::generation::range_table::RangeTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn records(values: &[(Individual, f64)]) -> Vec<FitnessRecord> {
        values
            .iter()
            .map(|(ind, f)| FitnessRecord::new(ind.clone(), *f))
            .collect()
    }

    fn config(population_size: usize, elitist: u32, stochastic: u32) -> OptimizerConfig {
        OptimizerConfig {
            population_size,
            parameters_count: 2,
            range_table: RangeTable::from(vec![(1, 50), (1, 50)]),
            elitist_percentage: elitist,
            stochastic_percentage: stochastic,
            ..Default::default()
        }
    }

    #[test]
    fn test_mean_ignores_failures() {
        let recs = records(&[(vec![1], 2.0), (vec![2], FAILED_FITNESS), (vec![3], 4.0)]);
        assert_eq!(mean_fitness(&recs), Some(3.0));
        assert_eq!(mean_fitness(&records(&[(vec![1], FAILED_FITNESS)])), None);
    }

    #[test]
    fn test_elites_capped_by_above_mean_count() {
        // Mean is 3.0; only two records are strictly above it.
        let recs = records(&[
            (vec![1, 1], 1.0),
            (vec![2, 2], 5.0),
            (vec![3, 3], 2.0),
            (vec![4, 4], 4.0),
            (vec![5, 5], 3.0),
        ]);
        let elites = select_elites(&recs, 4);
        assert_eq!(elites, vec![vec![2, 2], vec![4, 4]]);

        let capped = select_elites(&recs, 1);
        assert_eq!(capped, vec![vec![2, 2]]);
    }

    #[test]
    fn test_elites_ties_keep_first_occurrence_and_are_distinct() {
        let recs = records(&[
            (vec![9, 9], 0.0),
            (vec![1, 2], 10.0),
            (vec![3, 4], 10.0),
            (vec![1, 2], 10.0),
        ]);
        let elites = select_elites(&recs, 3);
        assert_eq!(elites, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_no_elites_without_variance() {
        let recs = records(&[(vec![1], 2.0), (vec![2], 2.0), (vec![3], 2.0)]);
        assert!(select_elites(&recs, 3).is_empty());
    }

    #[test]
    fn test_cumulative_frequencies_non_decreasing_and_ends_at_one() {
        let cases: Vec<Vec<f64>> = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![-5.0, 0.0, 5.0],
            vec![0.0, 0.0, 0.0],
            vec![-3.0, -3.0],
            vec![2.0, FAILED_FITNESS, 1.0],
            vec![FAILED_FITNESS, FAILED_FITNESS],
        ];
        for fitness in cases {
            let cumulative = cumulative_frequencies(&fitness);
            assert_eq!(cumulative.len(), fitness.len());
            assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
            let last = *cumulative.last().unwrap();
            assert!((last - 1.0).abs() < 1e-9, "{:?} ended at {}", fitness, last);
        }
    }

    #[test]
    fn test_negative_fitness_is_shifted() {
        // Shifted weights are 0, 1, 2.
        let cumulative = cumulative_frequencies(&[-1.0, 0.0, 1.0]);
        assert!((cumulative[0] - 0.0).abs() < 1e-12);
        assert!((cumulative[1] - 1.0 / 3.0).abs() < 1e-12);
        assert!((cumulative[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total_is_uniform() {
        let cumulative = cumulative_frequencies(&[0.0, 0.0, 0.0, 0.0]);
        for (i, c) in cumulative.iter().enumerate() {
            assert!((c - (i + 1) as f64 * 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spin_picks_first_reaching_entry() {
        let cumulative = vec![0.1, 0.1, 0.6, 1.0];
        assert_eq!(spin(&cumulative, 0.05), 0);
        assert_eq!(spin(&cumulative, 0.1), 0);
        assert_eq!(spin(&cumulative, 0.35), 2);
        assert_eq!(spin(&cumulative, 0.99), 3);
        assert_eq!(spin(&[0.5, 0.9999999, 0.9999999], 0.99999995), 1);
    }

    #[test]
    fn test_spin_skips_zero_weight_entries_on_zero_draw() {
        assert_eq!(spin(&[0.0, 0.0, 0.5, 1.0], 0.0), 2);
        assert_eq!(spin(&[0.25, 0.5, 1.0], 0.0), 0);
    }

    #[test]
    fn test_roulette_never_picks_failed_records() {
        let mut rng = StdRng::seed_from_u64(17);
        let recs = records(&[(vec![1], 3.0), (vec![2], FAILED_FITNESS), (vec![3], 1.0)]);
        let picked = roulette_selection(&recs, 500, &mut rng);
        assert_eq!(picked.len(), 500);
        assert!(picked.iter().all(|ind| ind != &vec![2]));

        let heavy = picked.iter().filter(|ind| *ind == &vec![1]).count();
        assert!(heavy > 300, "3:1 weighting should dominate, got {}", heavy);
    }

    #[test]
    fn test_selection_fills_population_exactly() {
        let mut rng = StdRng::seed_from_u64(1);
        let recs: Vec<FitnessRecord> = (0..10)
            .map(|i| FitnessRecord::new(vec![i + 1, 50 - i], (i * i) as f64))
            .collect();

        for (elitist, stochastic) in [(20, 30), (0, 0), (50, 50), (0, 100), (10, 15), (90, 0)] {
            let outcome =
                select_next_generation(&recs, &config(10, elitist, stochastic), &mut rng).unwrap();
            assert_eq!(outcome.len(), 10, "elitist {} stochastic {}", elitist, stochastic);
            assert!(outcome.elites.len() <= 10 * elitist as usize / 100);
            assert_eq!(outcome.stochastic.len(), 10 * stochastic as usize / 100);
        }
    }

    fn ladder() -> Vec<FitnessRecord> {
        // Mean is 28.5; fitness 36, 49, 64 and 81 lie above it.
        (0..10)
            .map(|i| FitnessRecord::new(vec![i + 1, 50 - i], (i * i) as f64))
            .collect()
    }

    #[test]
    fn test_stochastic_picks_never_repeat_an_elite() {
        let recs = ladder();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = select_next_generation(&recs, &config(10, 30, 50), &mut rng).unwrap();
            assert_eq!(outcome.elites, vec![vec![10, 41], vec![9, 42], vec![8, 43]]);
            assert_eq!(outcome.stochastic.len(), 5);
            assert!(
                outcome.stochastic.iter().all(|ind| !outcome.elites.contains(ind)),
                "seed {} picked an elite: {:?}",
                seed,
                outcome.stochastic
            );
        }
    }

    #[test]
    fn test_crossover_parents_exclude_elites_and_stochastic_picks() {
        let recs = ladder();
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = select_next_generation(&recs, &config(10, 20, 30), &mut rng).unwrap();

        let parents = crossover_parents(&recs, &outcome.elites, &outcome.stochastic);
        let expected: Vec<Individual> = recs
            .iter()
            .map(|r| r.individual.clone())
            .filter(|ind| !outcome.elites.contains(ind) && !outcome.stochastic.contains(ind))
            .collect();
        assert_eq!(parents, expected);
        assert!(parents.len() >= 10 - 2 - 3);

        let all = crossover_parents(&recs, &[], &[]);
        assert_eq!(all.len(), 10);
        let none = crossover_parents(&recs, &all[..4], &all[4..]);
        assert!(none.is_empty());
    }

    #[test]
    fn test_selection_survives_converged_population() {
        let mut rng = StdRng::seed_from_u64(8);
        let recs: Vec<FitnessRecord> = (0..10)
            .map(|_| FitnessRecord::new(vec![7, 7], 1.0))
            .collect();
        let outcome = select_next_generation(&recs, &config(10, 20, 30), &mut rng).unwrap();
        assert_eq!(outcome.len(), 10);
        assert!(outcome.elites.is_empty());
        assert!(outcome.into_population().iter().all(|ind| ind == &vec![7, 7]));
    }

    #[test]
    fn test_selection_with_every_evaluation_failed() {
        let mut rng = StdRng::seed_from_u64(4);
        let recs: Vec<FitnessRecord> = (0..6)
            .map(|i| FitnessRecord::new(vec![i, i + 1], FAILED_FITNESS))
            .collect();
        let outcome = select_next_generation(&recs, &config(6, 50, 50), &mut rng).unwrap();
        assert!(outcome.elites.is_empty());
        assert_eq!(outcome.stochastic.len(), 3);
        assert_eq!(outcome.len(), 6);
    }
}
