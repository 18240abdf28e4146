//! Dataset preparation
//!
//! Turns raw values into the form the distance calculator expects:
//! numeric parameters min-max scaled to [0, 1], categorical parameters
//! one-hot encoded over the categories observed for that parameter.
//! Categorical raw values may carry several categories ("Red, Blue").

use crate::error::{Error, Result};
use crate::model::{
    DataObject, Dataset, ParameterId, ParameterState, ParameterType, ParameterValue, ValueData,
};
use ahash::AHashMap;
use std::collections::BTreeSet;
use tracing::debug;

/// Split a multi-valued categorical string into its trimmed, lowercase parts
pub fn split_categories(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Per-parameter encoding learned from the whole dataset
#[derive(Debug, Clone, PartialEq)]
enum Encoding {
    MinMax { min: f64, max: f64 },
    OneHot { categories: Vec<String> },
}

impl Encoding {
    fn encode(&self, value: &ParameterValue) -> Result<ValueData> {
        match self {
            Encoding::MinMax { min, max } => {
                let raw = parse_number(value)?;
                let range = max - min;
                let normalized = if range > 0.0 { (raw - min) / range } else { 0.0 };
                Ok(ValueData::Numeric { normalized })
            }
            Encoding::OneHot { categories } => {
                let present: BTreeSet<String> = split_categories(&value.raw_value).collect();
                let one_hot = categories
                    .iter()
                    .map(|c| u8::from(present.contains(c)))
                    .collect();
                Ok(ValueData::Categorical { one_hot })
            }
        }
    }
}

fn parse_number(value: &ParameterValue) -> Result<f64> {
    value
        .raw_value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| {
            Error::Normalization(format!(
                "value '{}' of parameter '{}' is not a finite number",
                value.raw_value, value.parameter.name
            ))
        })
}

/// Normalizes raw datasets; values that are already normalized pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce a normalized copy of `dataset` restricted to active parameters.
    ///
    /// Output parameters and object values are ordered by parameter id.
    /// Every object with resolved values must carry a value for every
    /// active parameter of the dataset.
    pub fn normalize(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut parameters: Vec<_> = dataset.active_parameters().cloned().collect();
        parameters.sort_by_key(|p| p.id);

        let encodings = self.learn_encodings(dataset)?;

        let objects = dataset
            .objects
            .iter()
            .map(|object| self.normalize_object(object, &parameters, &encodings))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            dataset = dataset.id,
            parameters = parameters.len(),
            objects = objects.len(),
            "normalized dataset"
        );

        Ok(Dataset {
            id: dataset.id,
            name: dataset.name.clone(),
            parameters,
            objects,
        })
    }

    fn learn_encodings(&self, dataset: &Dataset) -> Result<AHashMap<ParameterId, Encoding>> {
        let mut numeric: AHashMap<ParameterId, (f64, f64)> = AHashMap::new();
        let mut categorical: AHashMap<ParameterId, BTreeSet<String>> = AHashMap::new();

        for value in dataset.objects.iter().flat_map(|o| o.values()) {
            if !value.parameter.is_active || value.is_normalized() {
                continue;
            }
            match value.parameter.param_type {
                ParameterType::Numeric => {
                    let x = parse_number(value)?;
                    let entry = numeric.entry(value.parameter_id()).or_insert((x, x));
                    entry.0 = entry.0.min(x);
                    entry.1 = entry.1.max(x);
                }
                ParameterType::Categorical => {
                    categorical
                        .entry(value.parameter_id())
                        .or_default()
                        .extend(split_categories(&value.raw_value));
                }
            }
        }

        let mut encodings = AHashMap::with_capacity(numeric.len() + categorical.len());
        for (id, (min, max)) in numeric {
            encodings.insert(id, Encoding::MinMax { min, max });
        }
        for (id, categories) in categorical {
            encodings.insert(
                id,
                Encoding::OneHot {
                    categories: categories.into_iter().collect(),
                },
            );
        }
        Ok(encodings)
    }

    fn normalize_object(
        &self,
        object: &DataObject,
        parameters: &[ParameterState],
        encodings: &AHashMap<ParameterId, Encoding>,
    ) -> Result<DataObject> {
        let Some(values) = object.values.as_ref() else {
            return Ok(object.clone());
        };

        let mut normalized = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let value = values
                .iter()
                .find(|v| v.parameter_id() == parameter.id)
                .ok_or_else(|| {
                    Error::Normalization(format!(
                        "object {} has no value for parameter '{}'",
                        object.id, parameter.name
                    ))
                })?;

            let data = match (&value.data, encodings.get(&parameter.id)) {
                (ValueData::Raw, Some(encoding)) => encoding.encode(value)?,
                (data, _) => data.clone(),
            };

            normalized.push(ParameterValue {
                id: value.id,
                raw_value: value.raw_value.clone(),
                parameter: value.parameter.clone(),
                data,
            });
        }

        Ok(DataObject {
            id: object.id,
            name: object.name.clone(),
            values: Some(normalized),
        })
    }
}
