use crate::engines::generation::genome::Individual;
use crate::engines::generation::range_table::RangeTable;
use crate::error::{Result, TradetuneError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Resolution of the per-individual mutation draw.
const MUTATION_DRAW_SCALE: u32 = 1000;

/// Generate a random individual, each gene drawn independently from its range
pub fn random_individual<R: Rng>(ranges: &RangeTable, rng: &mut R) -> Individual {
    ranges.iter().map(|range| range.sample(rng)).collect()
}

/// Build generation zero.
pub fn initialize_population<R: Rng>(
    population_size: usize,
    ranges: &RangeTable,
    rng: &mut R,
) -> Result<Vec<Individual>> {
    if population_size == 0 {
        return Err(TradetuneError::Configuration(
            "Population size must be greater than 0".to_string(),
        ));
    }
    if ranges.is_empty() {
        return Err(TradetuneError::Configuration(
            "Range table must not be empty".to_string(),
        ));
    }

    Ok((0..population_size)
        .map(|_| random_individual(ranges, rng))
        .collect())
}

/// Draw `cut1 <= cut2` in `[0, len)`, resampling the second cut until ordered.
pub fn draw_cut_points<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let cut1 = rng.gen_range(0..len);
    let mut cut2 = rng.gen_range(0..len);
    while cut1 > cut2 {
        cut2 = rng.gen_range(0..len);
    }
    (cut1, cut2)
}

/// Two-point crossover: swap the `[cut1, cut2)` segment between parents
pub fn two_point_crossover(
    parent1: &Individual,
    parent2: &Individual,
    cut1: usize,
    cut2: usize,
) -> (Individual, Individual) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1[cut1..cut2].copy_from_slice(&parent2[cut1..cut2]);
    child2[cut1..cut2].copy_from_slice(&parent1[cut1..cut2]);

    (child1, child2)
}

/// Produce offspring from `parents` in complementary pairs.
///
/// An odd `child_count` is rounded up, so the result length is always even;
/// trimming the surplus is the caller's job. The pool is shuffled once for the
/// whole call, then each pair picks two distinct parent indices.
pub fn crossover<R: Rng>(
    parents: &[Individual],
    child_count: usize,
    rng: &mut R,
) -> Result<Vec<Individual>> {
    let child_count = child_count + child_count % 2;
    if child_count == 0 {
        return Ok(Vec::new());
    }
    if parents.len() < 2 {
        return Err(TradetuneError::Configuration(format!(
            "Crossover needs at least 2 parents, got {}",
            parents.len()
        )));
    }

    let mut pool = parents.to_vec();
    pool.shuffle(rng);

    let mut children = Vec::with_capacity(child_count);
    for _ in 0..child_count / 2 {
        let first = rng.gen_range(0..pool.len());
        let mut second = rng.gen_range(0..pool.len());
        while first == second {
            second = rng.gen_range(0..pool.len());
        }

        let parent1 = &pool[first];
        let parent2 = &pool[second];
        let (cut1, cut2) = draw_cut_points(parent1.len(), rng);
        let (child1, child2) = two_point_crossover(parent1, parent2, cut1, cut2);

        children.push(child1);
        children.push(child2);
    }

    Ok(children)
}

/// Mutation: with probability `mutation_rate`, replace one random gene with a
/// fresh draw from its range. Returns true when a gene was redrawn.
pub fn mutate<R: Rng>(
    individual: &mut Individual,
    mutation_rate: f64,
    ranges: &RangeTable,
    rng: &mut R,
) -> bool {
    let threshold = mutation_rate * MUTATION_DRAW_SCALE as f64;
    let draw = rng.gen_range(0..MUTATION_DRAW_SCALE);
    if (draw as f64) >= threshold {
        return false;
    }

    let position = rng.gen_range(0..individual.len());
    if let Some(range) = ranges.get(position) {
        individual[position] = range.sample(rng);
    }
    true
}

/// Apply [`mutate`] to every individual; returns how many were mutated.
pub fn mutate_population<R: Rng>(
    population: &mut [Individual],
    mutation_rate: f64,
    ranges: &RangeTable,
    rng: &mut R,
) -> usize {
    population
        .iter_mut()
        .map(|individual| mutate(individual, mutation_rate, ranges, rng))
        .filter(|&mutated| mutated)
        .count()
}
