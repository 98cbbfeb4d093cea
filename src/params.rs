//! Hyperparameter values, domains, and sampling

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An ordered hyperparameter mapping.
///
/// Ordered so canonical names and persisted JSON are deterministic.
pub type ParamMap = BTreeMap<String, ParameterValue>;

/// A single hyperparameter value.
///
/// Untagged: persisted files carry bare JSON scalars (`{"lr": 0.01}`).
/// `Int` is tried before `Float` so integer literals stay integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    Categorical(String),
}

impl ParameterValue {
    /// Get as float (converts int to float if needed)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Int(v) => Some(*v as f64),
            ParameterValue::Categorical(_) => None,
        }
    }

    /// Get as int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            ParameterValue::Float(v) => Some(*v as i64),
            ParameterValue::Categorical(_) => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Categorical(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a literal: integer first, then float, else categorical text.
    pub fn parse(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            return ParameterValue::Int(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return ParameterValue::Float(v);
        }
        ParameterValue::Categorical(raw.to_string())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Categorical(s) => write!(f, "{s}"),
        }
    }
}

/// Canonical name of a parameter mapping: keys sorted alphabetically,
/// `key=value` pairs joined with commas.
///
/// Invariant under the mapping's insertion order, so identical parameter
/// sets always resolve to the same persisted directory.
pub fn canonical_name(params: &ParamMap) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parameter domain (search space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParameterDomain {
    /// Continuous range [low, high], optionally log-scaled
    Continuous { low: f64, high: f64, log_scale: bool },
    /// Discrete integer range [low, high]
    Discrete { low: i64, high: i64 },
    /// Categorical choices
    Categorical { choices: Vec<String> },
}

impl ParameterDomain {
    /// Sample a random value from this domain
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            ParameterDomain::Continuous { low, high, log_scale } => {
                let value = if *log_scale {
                    let log_low = low.ln();
                    let log_high = high.ln();
                    let log_val = log_low + rng.random::<f64>() * (log_high - log_low);
                    log_val.exp()
                } else {
                    low + rng.random::<f64>() * (high - low)
                };
                ParameterValue::Float(value)
            }
            ParameterDomain::Discrete { low, high } => {
                let range = (*high - *low + 1) as usize;
                let offset = (rng.random::<f64>() * range as f64).floor() as i64;
                let value = (*low + offset).min(*high);
                ParameterValue::Int(value)
            }
            ParameterDomain::Categorical { choices } => {
                let idx = (rng.random::<f64>() * choices.len() as f64).floor() as usize;
                let idx = idx.min(choices.len() - 1);
                ParameterValue::Categorical(choices[idx].clone())
            }
        }
    }

    /// Check if a value is valid for this domain
    pub fn is_valid(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterDomain::Continuous { low, high, .. }, ParameterValue::Float(v)) => {
                *v >= *low && *v <= *high
            }
            (ParameterDomain::Discrete { low, high }, ParameterValue::Int(v)) => {
                *v >= *low && *v <= *high
            }
            (ParameterDomain::Categorical { choices }, ParameterValue::Categorical(s)) => {
                choices.contains(s)
            }
            _ => false,
        }
    }
}

/// Hyperparameter search space
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HyperparameterSpace {
    /// Parameter name -> domain mapping
    params: BTreeMap<String, ParameterDomain>,
}

impl HyperparameterSpace {
    /// Create an empty search space
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the search space
    pub fn add(&mut self, name: &str, domain: ParameterDomain) {
        self.params.insert(name.to_string(), domain);
    }

    /// Get a parameter domain
    pub fn get(&self, name: &str) -> Option<&ParameterDomain> {
        self.params.get(name)
    }

    /// Check if space is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Sample a random configuration
    pub fn sample_random<R: Rng>(&self, rng: &mut R) -> ParamMap {
        self.params
            .iter()
            .map(|(name, domain)| (name.clone(), domain.sample(rng)))
            .collect()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_sampled_value_valid(low in -100.0f64..0.0, high in 0.0f64..100.0) {
            let domain = ParameterDomain::Continuous { low, high, log_scale: false };
            let mut rng = rand::rng();
            let value = domain.sample(&mut rng);
            prop_assert!(domain.is_valid(&value));
        }

        #[test]
        fn prop_canonical_name_permutation_invariant(
            pairs in proptest::collection::btree_map("[a-z]{1,8}", -1000i64..1000, 1..8)
        ) {
            let forward: ParamMap = pairs
                .iter()
                .map(|(k, v)| (k.clone(), ParameterValue::Int(*v)))
                .collect();
            let reverse: ParamMap = pairs
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), ParameterValue::Int(*v)))
                .collect();
            prop_assert_eq!(canonical_name(&forward), canonical_name(&reverse));
        }

        #[test]
        fn prop_parameter_value_json_roundtrip(v in -1000i64..1000) {
            let value = ParameterValue::Int(v);
            let json = serde_json::to_string(&value).unwrap();
            let parsed: ParameterValue = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(value, parsed);
        }
    }
}
