//! JSON model documents.

use serde::{Deserialize, Serialize};

use moai_core::{Parameter, Result, Set, Variable};

use crate::constraint::{Constraint, Objective};

/// A model as it is exchanged over the wire.
///
/// Every object is checked for unknown fields. Converting to a
/// [`Model`](crate::Model) with `Model::from_data` runs the registry
/// checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelData {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<Set>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub objective: Option<Objective>,
}

impl ModelData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moai_core::CompileError;

    const COST_MODEL: &str = r#"{
        "name": "costs",
        "sets": [{"name": "I", "elements": [1, 2, 3]}],
        "parameters": [{
            "name": "cost", "indices": ["I"],
            "values": [
                {"index": [1], "value": 5},
                {"index": [2], "value": 10},
                {"index": [3], "value": 15}
            ]
        }],
        "variables": [{"name": "x", "indices": ["I"], "domain": "NonNegativeReals"}],
        "constraints": [{
            "type": "constraint", "name": "upper",
            "expr": {
                "type": "comparison", "op": "le",
                "left": {"type": "variable", "name": "x",
                         "index_expr": [{"type": "index_variable", "name": "i"}]},
                "right": {"type": "parameter", "name": "cost",
                          "index_expr": [{"type": "index_variable", "name": "i"}]}
            },
            "quantifiers": [{"index": "i", "over": "I"}]
        }],
        "objective": {
            "name": "total", "sense": "max",
            "expr": {
                "type": "aggregation", "op": "sum",
                "expr": {"type": "variable", "name": "x",
                         "index_expr": [{"type": "index_variable", "name": "i"}]},
                "bindings": [{"type": "index_binding", "index_var": "i", "set_name": "I"}]
            }
        }
    }"#;

    #[test]
    fn test_read_document() {
        let data = ModelData::from_json(COST_MODEL).unwrap();
        assert_eq!(data.name, "costs");
        assert_eq!(data.sets.len(), 1);
        assert_eq!(data.constraints[0].display(), "x[i] <= cost[i] for i in I");
        assert!(data.objective.is_some());
    }

    #[test]
    fn test_json_survives_a_second_pass() {
        let data = ModelData::from_json(COST_MODEL).unwrap();
        let again = ModelData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(again, data);
    }

    #[test]
    fn test_unknown_top_level_field() {
        let err = ModelData::from_json(r#"{"name": "m", "solver": "cbc"}"#).unwrap_err();
        assert!(matches!(err, CompileError::Document(_)));
    }
}
