//! Per-value similarity functions
//!
//! All functions return a similarity score in range [0.0, 1.0] where 1.0 means identical.

use ahash::AHashSet;
use simlens_core::{split_categories, ParameterType, ParameterValue, ValueData};

/// Observed range of a numeric parameter across a dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
}

impl NumericDomain {
    pub fn new(value: f64) -> Self {
        Self { min: value, max: value }
    }

    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// `1 - |a - b| / width`
    ///
    /// With a zero-width domain only identical values score 1.0.
    pub fn closeness(&self, a: f64, b: f64) -> f64 {
        let width = self.width();
        if width <= 0.0 {
            return if a == b { 1.0 } else { 0.0 };
        }
        (1.0 - (a - b).abs() / width).clamp(0.0, 1.0)
    }
}

/// Case-insensitive Jaccard overlap of two multi-valued strings ("Red, Blue")
pub fn set_overlap(a: &str, b: &str) -> f64 {
    let set_a: AHashSet<String> = split_categories(a).collect();
    let set_b: AHashSet<String> = split_categories(b).collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Overlap of the "on" bits of two one-hot vectors
pub fn one_hot_overlap(a: &[u8], b: &[u8]) -> f64 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).is_some_and(|&v| v != 0);
        let y = b.get(i).is_some_and(|&v| v != 0);
        intersection += usize::from(x && y);
        union += usize::from(x || y);
    }
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Compares two values of the same parameter
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueComparer;

impl ValueComparer {
    pub fn new() -> Self {
        Self
    }

    /// Similarity of two values.
    ///
    /// Numeric parameters use closeness over `domain` when both sides parse as
    /// numbers; everything else falls back to set overlap of the raw strings.
    pub fn compare(
        &self,
        a: &ParameterValue,
        b: &ParameterValue,
        domain: Option<&NumericDomain>,
    ) -> f64 {
        if let (ValueData::Categorical { one_hot: x }, ValueData::Categorical { one_hot: y }) =
            (&a.data, &b.data)
        {
            return one_hot_overlap(x, y);
        }

        if a.parameter.param_type == ParameterType::Numeric {
            if let (Some(x), Some(y), Some(domain)) = (a.as_number(), b.as_number(), domain) {
                return domain.closeness(x, y);
            }
        }

        set_overlap(&a.raw_value, &b.raw_value)
    }
}
