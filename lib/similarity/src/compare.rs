//! All-pairs object similarity
//!
//! Scores every unordered pair of objects as the unweighted average of the
//! per-parameter value similarities.

use crate::value::{NumericDomain, ValueComparer};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use simlens_core::{Dataset, ObjectSummary, ParameterId, ParameterState, ParameterType, ParameterValue};
use tracing::debug;

/// Similarity of one unordered pair of distinct objects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityPair {
    pub object_a: ObjectSummary,
    pub object_b: ObjectSummary,
    /// In [0.0, 1.0]
    pub similarity_percentage: f64,
}

/// Computes pairwise similarities for a dataset
#[derive(Debug, Clone, Default)]
pub struct SimilarityComparer {
    values: ValueComparer,
}

impl SimilarityComparer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare every pair `(i, j)` with `i < j`.
    ///
    /// Pairs are emitted in enumeration order: `i` ascending, then `j` ascending.
    pub fn compare_all_objects(&self, dataset: &Dataset) -> Vec<SimilarityPair> {
        let parameters: Vec<&ParameterState> = dataset.active_parameters().collect();
        let domains = numeric_domains(dataset, &parameters);

        let indexed: Vec<AHashMap<ParameterId, &ParameterValue>> = dataset
            .objects
            .iter()
            .map(|o| o.values().iter().map(|v| (v.parameter_id(), v)).collect())
            .collect();

        let n = dataset.objects.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let similarity = self.score(&indexed[i], &indexed[j], &parameters, &domains);
                pairs.push(SimilarityPair {
                    object_a: dataset.objects[i].summary(),
                    object_b: dataset.objects[j].summary(),
                    similarity_percentage: similarity,
                });
            }
        }

        debug!(
            dataset = dataset.id,
            objects = n,
            parameters = parameters.len(),
            pairs = pairs.len(),
            "compared all objects"
        );
        pairs
    }

    /// The `top_n` most similar pairs, highest first.
    ///
    /// Equal scores keep their enumeration order.
    pub fn most_similar(&self, dataset: &Dataset, top_n: usize) -> Vec<SimilarityPair> {
        let mut pairs = self.compare_all_objects(dataset);
        pairs.sort_by(|a, b| b.similarity_percentage.total_cmp(&a.similarity_percentage));
        pairs.truncate(top_n);
        pairs
    }

    fn score(
        &self,
        a: &AHashMap<ParameterId, &ParameterValue>,
        b: &AHashMap<ParameterId, &ParameterValue>,
        parameters: &[&ParameterState],
        domains: &AHashMap<ParameterId, NumericDomain>,
    ) -> f64 {
        if parameters.is_empty() {
            return 0.0;
        }

        let total: f64 = parameters
            .iter()
            .map(|p| match (a.get(&p.id), b.get(&p.id)) {
                (Some(x), Some(y)) => self.values.compare(x, y, domains.get(&p.id)),
                // a missing value counts as a full mismatch
                _ => 0.0,
            })
            .sum();

        total / parameters.len() as f64
    }
}

fn numeric_domains(
    dataset: &Dataset,
    parameters: &[&ParameterState],
) -> AHashMap<ParameterId, NumericDomain> {
    let mut domains: AHashMap<ParameterId, NumericDomain> = AHashMap::new();
    for parameter in parameters.iter().filter(|p| p.param_type == ParameterType::Numeric) {
        for object in &dataset.objects {
            let Some(x) = object.value_for(parameter.id).and_then(ParameterValue::as_number) else {
                continue;
            };
            domains
                .entry(parameter.id)
                .and_modify(|d| d.observe(x))
                .or_insert_with(|| NumericDomain::new(x));
        }
    }
    domains
}

#[cfg(test)]
mod tests {
    use super::*;
    use simlens_core::DataObject;

    fn catalog() -> Dataset {
        let price = ParameterState::numeric(1, "price");
        let color = ParameterState::categorical(2, "color");
        let item = |id: u64, p: &str, c: &str| {
            DataObject::new(
                id,
                format!("item{}", id),
                vec![
                    ParameterValue::raw(id * 10 + 1, price.clone(), p),
                    ParameterValue::raw(id * 10 + 2, color.clone(), c),
                ],
            )
        };
        Dataset::new(
            1,
            "catalog",
            vec![price.clone(), color.clone()],
            vec![
                item(1, "10", "Red"),
                item(2, "10", "Red"),
                item(3, "30", "Blue"),
                item(4, "20", "Red, Blue"),
            ],
        )
    }

    #[test]
    fn test_pair_count_and_order() {
        let pairs = SimilarityComparer::new().compare_all_objects(&catalog());
        assert_eq!(pairs.len(), 6);
        let ids: Vec<(u64, u64)> = pairs.iter().map(|p| (p.object_a.id, p.object_b.id)).collect();
        assert_eq!(ids, vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_unweighted_average() {
        let pairs = SimilarityComparer::new().compare_all_objects(&catalog());
        // identical objects
        assert_eq!(pairs[0].similarity_percentage, 1.0);
        // price 10 vs 30 over [10, 30] -> 0.0, Red vs Blue -> 0.0
        assert_eq!(pairs[1].similarity_percentage, 0.0);
        // price 10 vs 20 -> 0.5, Red vs {Red, Blue} -> 0.5
        assert!((pairs[2].similarity_percentage - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weights_do_not_change_score() {
        let mut dataset = catalog();
        dataset.parameters[0].weight = 10.0;
        let weighted = SimilarityComparer::new().compare_all_objects(&dataset);
        let plain = SimilarityComparer::new().compare_all_objects(&catalog());
        assert_eq!(weighted, plain);
    }

    #[test]
    fn test_inactive_parameters_skipped() {
        let mut dataset = catalog();
        dataset.parameters[0].is_active = false;
        let pairs = SimilarityComparer::new().compare_all_objects(&dataset);
        // only color remains: Red vs Blue
        assert_eq!(pairs[1].similarity_percentage, 0.0);
        // Red vs {Red, Blue}
        assert!((pairs[2].similarity_percentage - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_prices_stay_in_range() {
        let price = ParameterState::numeric(1, "price");
        let objects = ["NaN", "10", "inf", "1e400"]
            .iter()
            .enumerate()
            .map(|(i, &raw)| {
                let id = i as u64 + 1;
                DataObject::new(id, format!("item{}", id), vec![ParameterValue::raw(id, price.clone(), raw)])
            })
            .collect();
        let dataset = Dataset::new(1, "broken", vec![price.clone()], objects);

        let pairs = SimilarityComparer::new().compare_all_objects(&dataset);
        assert_eq!(pairs.len(), 6);
        for pair in &pairs {
            let s = pair.similarity_percentage;
            assert!((0.0..=1.0).contains(&s), "{:?}", pair);
        }
        // non-numbers fall back to comparing the raw text
        assert_eq!(pairs[0].similarity_percentage, 0.0);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new(1, "empty", vec![], vec![]);
        assert!(SimilarityComparer::new().compare_all_objects(&dataset).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let comparer = SimilarityComparer::new();
        let first = comparer.compare_all_objects(&catalog());
        let second = comparer.compare_all_objects(&catalog());
        assert_eq!(first, second);
    }

    #[test]
    fn test_most_similar() {
        let top = SimilarityComparer::new().most_similar(&catalog(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].object_a.id, top[0].object_b.id), (1, 2));
        assert!(top[0].similarity_percentage >= top[1].similarity_percentage);
    }

    #[test]
    fn test_serialized_field_names() {
        let pairs = SimilarityComparer::new().compare_all_objects(&catalog());
        let json = serde_json::to_value(&pairs[0]).unwrap();
        assert!(json.get("similarityPercentage").is_some());
        assert_eq!(json["objectA"]["id"], 1);
    }
}
