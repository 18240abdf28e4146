//! Dataset model: parameters, typed values and objects
//!
//! A [`Dataset`] is a read-only snapshot handed to the analysis components.
//! Nothing in this workspace mutates the values of a [`DataObject`] once the
//! caller has built it.

use serde::{Deserialize, Serialize};

pub type ObjectId = u64;
pub type ParameterId = u64;

/// Kind of attribute a parameter holds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Numeric attribute, compared by magnitude
    Numeric,
    /// Categorical attribute, possibly multi-valued ("Red, Blue")
    Categorical,
}

/// Per-parameter state attached to a dataset snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterState {
    pub id: ParameterId,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Relative multiplier; the core does not require weights to sum to 1.0
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_active() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

impl ParameterState {
    pub fn numeric(id: ParameterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            param_type: ParameterType::Numeric,
            is_active: true,
            weight: 1.0,
        }
    }

    pub fn categorical(id: ParameterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            param_type: ParameterType::Categorical,
            is_active: true,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Normalized payload of a value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueData {
    /// Not normalized yet; only `raw_value` is meaningful
    Raw,
    /// Numeric value scaled, typically to [0, 1]
    Numeric { normalized: f64 },
    /// One entry per category in the parameter's domain
    Categorical {
        #[serde(rename = "oneHot")]
        one_hot: Vec<u8>,
    },
}

/// A single attribute value of an object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValue {
    pub id: u64,
    pub raw_value: String,
    pub parameter: ParameterState,
    #[serde(default = "default_data")]
    pub data: ValueData,
}

fn default_data() -> ValueData {
    ValueData::Raw
}

impl ParameterValue {
    pub fn raw(id: u64, parameter: ParameterState, raw_value: impl Into<String>) -> Self {
        Self {
            id,
            raw_value: raw_value.into(),
            parameter,
            data: ValueData::Raw,
        }
    }

    pub fn numeric(id: u64, parameter: ParameterState, normalized: f64) -> Self {
        Self {
            id,
            raw_value: normalized.to_string(),
            parameter,
            data: ValueData::Numeric { normalized },
        }
    }

    pub fn categorical(id: u64, parameter: ParameterState, one_hot: Vec<u8>) -> Self {
        Self {
            id,
            raw_value: String::new(),
            parameter,
            data: ValueData::Categorical { one_hot },
        }
    }

    #[inline]
    pub fn parameter_id(&self) -> ParameterId {
        self.parameter.id
    }

    #[inline]
    pub fn is_normalized(&self) -> bool {
        !matches!(self.data, ValueData::Raw)
    }

    /// Numeric view of the value: the normalized number if present,
    /// otherwise the raw string parsed as `f64`. Only finite numbers count.
    pub fn as_number(&self) -> Option<f64> {
        let number = match &self.data {
            ValueData::Numeric { normalized } => Some(*normalized),
            ValueData::Raw => self.raw_value.trim().parse::<f64>().ok(),
            ValueData::Categorical { .. } => None,
        };
        number.filter(|x| x.is_finite())
    }
}

/// A named row of the dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataObject {
    pub id: ObjectId,
    pub name: String,
    /// `None` means the caller never resolved the values of this object
    #[serde(default)]
    pub values: Option<Vec<ParameterValue>>,
}

impl DataObject {
    pub fn new(id: ObjectId, name: impl Into<String>, values: Vec<ParameterValue>) -> Self {
        Self {
            id,
            name: name.into(),
            values: Some(values),
        }
    }

    /// Object whose value vector was never resolved
    pub fn without_values(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            values: None,
        }
    }

    pub fn values(&self) -> &[ParameterValue] {
        self.values.as_deref().unwrap_or(&[])
    }

    pub fn value_for(&self, parameter_id: ParameterId) -> Option<&ParameterValue> {
        self.values().iter().find(|v| v.parameter_id() == parameter_id)
    }

    pub fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Identity of an object without its values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub name: String,
}

/// Transient, read-only view of a dataset assembled per request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub id: u64,
    pub name: String,
    pub parameters: Vec<ParameterState>,
    pub objects: Vec<DataObject>,
}

impl Dataset {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        parameters: Vec<ParameterState>,
        objects: Vec<DataObject>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parameters,
            objects,
        }
    }

    /// Active parameters in declaration order
    pub fn active_parameters(&self) -> impl Iterator<Item = &ParameterState> {
        self.parameters.iter().filter(|p| p.is_active)
    }

    pub fn is_normalized(&self) -> bool {
        self.objects
            .iter()
            .flat_map(|o| o.values())
            .all(ParameterValue::is_normalized)
    }
}
