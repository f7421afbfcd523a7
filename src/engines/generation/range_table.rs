use super::genome::Gene;
use crate::error::TradetuneError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` bounds for one gene position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRange {
    pub min: Gene,
    pub max: Gene,
}

impl GeneRange {
    pub fn new(min: Gene, max: Gene) -> Self {
        Self { min, max }
    }

    /// Uniform draw from the inclusive range. Used for both creation and mutation.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Gene {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, gene: Gene) -> bool {
        (self.min..=self.max).contains(&gene)
    }
}

/// Per-position gene bounds, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable(Vec<GeneRange>);

impl RangeTable {
    pub fn new(ranges: Vec<GeneRange>) -> Self {
        Self(ranges)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&GeneRange> {
        self.0.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneRange> {
        self.0.iter()
    }

    pub fn validate(&self) -> Result<(), TradetuneError> {
        if self.is_empty() {
            return Err(TradetuneError::Configuration(
                "Range table must not be empty".to_string(),
            ));
        }
        for (i, range) in self.0.iter().enumerate() {
            if range.min > range.max {
                return Err(TradetuneError::Configuration(format!(
                    "Range for param{} has min {} greater than max {}",
                    i, range.min, range.max
                )));
            }
        }
        Ok(())
    }

    /// True when every gene lies inside its position's range.
    pub fn admits(&self, individual: &[Gene]) -> bool {
        individual.len() == self.len()
            && individual
                .iter()
                .zip(self.iter())
                .all(|(&gene, range)| range.contains(gene))
    }
}

impl From<Vec<(Gene, Gene)>> for RangeTable {
    fn from(pairs: Vec<(Gene, Gene)>) -> Self {
        Self(pairs.into_iter().map(|(min, max)| GeneRange::new(min, max)).collect())
    }
}
