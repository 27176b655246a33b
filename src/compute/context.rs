// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! The compute context
//!
//! Carries the active symbolic-variable-to-column mapping and the set of
//! constant columns for one compute pass. Owned by the caller (the reactive
//! layer) and borrowed by every compute step; no pipe ever owns or mutates
//! it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{TabflowError, TabflowResult};

/// Variable resolution and constant-column information for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeContext {
    /// Symbolic variable name to concrete column name
    #[serde(default)]
    pub vars: HashMap<String, String>,

    /// Columns whose values must survive every transform unmodified
    #[serde(default)]
    pub constants: Vec<String>,
}

impl ComputeContext {
    /// Build a context from variable mappings and constant column names.
    pub fn new<K, V, C>(
        vars: impl IntoIterator<Item = (K, V)>,
        constants: impl IntoIterator<Item = C>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        C: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve one symbolic variable to its column name.
    pub fn resolve(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(String::as_str)
    }

    /// Resolve every variable, or fail naming all missing ones at once, so
    /// the caller can fix the whole mapping in one pass.
    pub fn resolve_all(&self, vars: &[String]) -> TabflowResult<Vec<String>> {
        let missing: Vec<String> = vars
            .iter()
            .filter(|v| !self.vars.contains_key(*v))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TabflowError::unresolved(missing));
        }
        Ok(vars.iter().map(|v| self.vars[v].clone()).collect())
    }

    /// Whether a column is marked constant.
    pub fn is_constant(&self, column: &str) -> bool {
        self.constants.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_reports_every_missing_var() {
        let ctx = ComputeContext::new([("x", "speed")], ["label"]);
        let vars = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        match ctx.resolve_all(&vars).unwrap_err() {
            TabflowError::UnresolvedVariable { variables } => {
                assert_eq!(variables, vec!["y", "z"]);
            }
            other => panic!("expected UnresolvedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_all_in_order() {
        let ctx = ComputeContext::new([("x", "speed"), ("y", "dist")], Vec::<String>::new());
        let vars = vec!["y".to_string(), "x".to_string()];
        assert_eq!(ctx.resolve_all(&vars).unwrap(), vec!["dist", "speed"]);
    }

    #[test]
    fn test_is_constant() {
        let ctx = ComputeContext::new(Vec::<(String, String)>::new(), ["label"]);
        assert!(ctx.is_constant("label"));
        assert!(!ctx.is_constant("x"));
    }

    #[test]
    fn test_yaml_shape() {
        let ctx: ComputeContext =
            serde_yaml::from_str("vars: {x: speed}\nconstants: [label]\n").unwrap();
        assert_eq!(ctx.resolve("x"), Some("speed"));
        assert!(ctx.is_constant("label"));
    }
}
