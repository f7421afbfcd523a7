use std::collections::BTreeMap;

/// One parameter value. Position `i` is always bounded by range-table entry `i`.
pub type Gene = i64;

/// Candidate parameter set for the strategy under optimization.
///
/// The genetic operators only ever see this fixed-length vector. Names are
/// attached at the boundary by [`to_parameter_map`], when an individual is
/// handed to a fitness evaluator or returned as the final answer.
///
/// # Example
///
/// ```
/// use tradetune::engines::generation::genome::{parameter_name, to_parameter_map};
///
/// let params = to_parameter_map(&[12, 48]);
/// assert_eq!(params[&parameter_name(0)], 12);
/// assert_eq!(params["param1"], 48);
/// ```
pub type Individual = Vec<Gene>;

/// Named view of an individual, `param0 … param{n-1}`.
pub type ParameterMap = BTreeMap<String, Gene>;

pub fn parameter_name(index: usize) -> String {
    format!("param{}", index)
}

pub fn to_parameter_map(individual: &[Gene]) -> ParameterMap {
    individual
        .iter()
        .enumerate()
        .map(|(i, &gene)| (parameter_name(i), gene))
        .collect()
}
