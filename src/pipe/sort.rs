// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! The sort transform
//!
//! Multi-key stable sort over named context variables. Ordering options are a
//! closed struct rather than pass-through arguments: unknown options are a
//! type error at the call site, not something forwarded opaquely downstream.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::errors::{TabflowError, TabflowResult};
use crate::table::FlatTable;

/// Sort direction, applied uniformly to all keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first (default)
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// Placement of rows whose sort key is null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// Null keys before all others
    First,
    /// Null keys after all others (default)
    #[default]
    Last,
    /// Remove rows whose key is null
    Drop,
}

/// Ordering options for a sort transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    /// Direction for every key
    #[serde(default)]
    pub direction: SortDirection,
    /// What to do with null keys
    #[serde(default)]
    pub nulls: NullPolicy,
}

/// A sort over one or more context variables, first variable is the primary
/// key and later ones break ties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortTransform {
    /// Symbolic variable names to sort by, in priority order
    pub vars: Vec<String>,
    /// Ordering options
    #[serde(flatten)]
    pub options: SortOptions,
}

// Hand-written so unrecognized option keys are rejected at parse time: the
// option set is closed, and a typo'd key must not silently fall back to the
// defaults. (`deny_unknown_fields` cannot be combined with `flatten`, so the
// derive would let unknown keys through.)
impl<'de> Deserialize<'de> for SortTransform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Doc {
            vars: Vec<String>,
            #[serde(default)]
            direction: SortDirection,
            #[serde(default)]
            nulls: NullPolicy,
        }

        let doc = Doc::deserialize(deserializer)?;
        Ok(Self {
            vars: doc.vars,
            options: SortOptions {
                direction: doc.direction,
                nulls: doc.nulls,
            },
        })
    }
}

impl SortTransform {
    /// Create a sort transform; an empty variable list is malformed.
    pub fn new<S: Into<String>>(
        vars: impl IntoIterator<Item = S>,
        options: SortOptions,
    ) -> TabflowResult<Self> {
        let transform = Self {
            vars: vars.into_iter().map(Into::into).collect(),
            options,
        };
        transform.validate()?;
        Ok(transform)
    }

    /// Check the parameter contract (also run on deserialized pipes).
    pub fn validate(&self) -> TabflowResult<()> {
        if self.vars.is_empty() {
            return Err(TabflowError::malformed("sort", "no sort variables given"));
        }
        Ok(())
    }

    /// Sort one flat table by the given resolved key columns.
    ///
    /// Computes a row permutation (stable, so ties keep their input order)
    /// and applies it to every column. With `nulls: drop`, rows whose key is
    /// null in any key column are removed before ordering.
    pub fn apply(&self, table: &FlatTable, key_columns: &[String]) -> TabflowResult<FlatTable> {
        let keys: Vec<_> = key_columns
            .iter()
            .map(|name| table.require_column(name))
            .collect::<TabflowResult<_>>()?;

        let mut indices: Vec<usize> = (0..table.row_count()).collect();
        if self.options.nulls == NullPolicy::Drop {
            indices.retain(|&row| !keys.iter().any(|col| col[row].is_null()));
        }

        indices.sort_by(|&a, &b| self.compare_rows(&keys, a, b));
        Ok(table.take_rows(&indices))
    }

    /// Compare two rows key by key, primary first.
    fn compare_rows(&self, keys: &[&[crate::table::Value]], a: usize, b: usize) -> Ordering {
        for col in keys {
            let (va, vb) = (&col[a], &col[b]);
            let ord = match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                // Null placement is a policy of its own, independent of
                // direction.
                (true, false) => match self.options.nulls {
                    NullPolicy::First => Ordering::Less,
                    _ => Ordering::Greater,
                },
                (false, true) => match self.options.nulls {
                    NullPolicy::First => Ordering::Greater,
                    _ => Ordering::Less,
                },
                (false, false) => {
                    let ord = va.total_cmp(vb);
                    match self.options.direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                }
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for SortTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sort: {}", self.vars.join(", "))?;
        let mut notes = Vec::new();
        if self.options.direction == SortDirection::Descending {
            notes.push("descending");
        }
        match self.options.nulls {
            NullPolicy::First => notes.push("nulls first"),
            NullPolicy::Drop => notes.push("nulls dropped"),
            NullPolicy::Last => {}
        }
        if !notes.is_empty() {
            write!(f, " [{}]", notes.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn table(cols: Vec<(&str, Vec<Value>)>) -> FlatTable {
        FlatTable::from_columns(cols).unwrap()
    }

    #[test]
    fn test_empty_vars_rejected() {
        let err = SortTransform::new(Vec::<String>::new(), SortOptions::default()).unwrap_err();
        assert!(matches!(err, TabflowError::MalformedParameters { .. }));
    }

    #[test]
    fn test_single_key_sort() {
        let t = table(vec![
            ("x", vec![3.into(), 1.into(), 2.into()]),
            ("label", vec!["c".into(), "a".into(), "b".into()]),
        ]);
        let sort = SortTransform::new(["x"], SortOptions::default()).unwrap();
        let sorted = sort.apply(&t, &["x".to_string()]).unwrap();
        assert_eq!(
            sorted.column("x").unwrap(),
            &[1.into(), 2.into(), 3.into()]
        );
        assert_eq!(
            sorted.column("label").unwrap(),
            &[Value::from("a"), "b".into(), "c".into()]
        );
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let t = table(vec![
            ("x", vec![1.into(), 1.into(), 2.into()]),
            ("y", vec![2.into(), 1.into(), 3.into()]),
        ]);
        let sort = SortTransform::new(["x", "y"], SortOptions::default()).unwrap();
        let sorted = sort
            .apply(&t, &["x".to_string(), "y".to_string()])
            .unwrap();
        assert_eq!(sorted.column("x").unwrap(), &[1.into(), 1.into(), 2.into()]);
        assert_eq!(sorted.column("y").unwrap(), &[1.into(), 2.into(), 3.into()]);
    }

    #[test]
    fn test_descending_applies_to_all_keys() {
        let t = table(vec![
            ("x", vec![1.into(), 1.into(), 2.into()]),
            ("y", vec![1.into(), 2.into(), 3.into()]),
        ]);
        let options = SortOptions {
            direction: SortDirection::Descending,
            ..SortOptions::default()
        };
        let sort = SortTransform::new(["x", "y"], options).unwrap();
        let sorted = sort
            .apply(&t, &["x".to_string(), "y".to_string()])
            .unwrap();
        assert_eq!(sorted.column("x").unwrap(), &[2.into(), 1.into(), 1.into()]);
        assert_eq!(sorted.column("y").unwrap(), &[3.into(), 2.into(), 1.into()]);
    }

    #[test]
    fn test_nulls_last_by_default() {
        let t = table(vec![(
            "x",
            vec![Value::Null, 2.into(), 1.into()],
        )]);
        let sort = SortTransform::new(["x"], SortOptions::default()).unwrap();
        let sorted = sort.apply(&t, &["x".to_string()]).unwrap();
        assert_eq!(
            sorted.column("x").unwrap(),
            &[1.into(), 2.into(), Value::Null]
        );
    }

    #[test]
    fn test_nulls_drop_removes_rows() {
        let t = table(vec![
            ("x", vec![Value::Null, 2.into(), 1.into()]),
            ("y", vec!["n".into(), "b".into(), "a".into()]),
        ]);
        let options = SortOptions {
            nulls: NullPolicy::Drop,
            ..SortOptions::default()
        };
        let sort = SortTransform::new(["x"], options).unwrap();
        let sorted = sort.apply(&t, &["x".to_string()]).unwrap();
        assert_eq!(sorted.row_count(), 2);
        assert_eq!(sorted.column("x").unwrap(), &[1.into(), 2.into()]);
        assert_eq!(
            sorted.column("y").unwrap(),
            &[Value::from("a"), "b".into()]
        );
    }

    #[test]
    fn test_stable_on_ties() {
        let t = table(vec![
            ("x", vec![1.into(), 1.into(), 1.into()]),
            ("order", vec!["first".into(), "second".into(), "third".into()]),
        ]);
        let sort = SortTransform::new(["x"], SortOptions::default()).unwrap();
        let sorted = sort.apply(&t, &["x".to_string()]).unwrap();
        assert_eq!(
            sorted.column("order").unwrap(),
            &[Value::from("first"), "second".into(), "third".into()]
        );
    }

    #[test]
    fn test_known_options_parse() {
        let sort: SortTransform =
            serde_yaml::from_str("vars: [x]\ndirection: descending\nnulls: first\n").unwrap();
        assert_eq!(sort.options.direction, SortDirection::Descending);
        assert_eq!(sort.options.nulls, NullPolicy::First);
    }

    #[test]
    fn test_unknown_option_key_rejected() {
        // typo'd option keys must be a parse error, not an ascending sort
        let err = serde_yaml::from_str::<SortTransform>("vars: [x]\ndirecton: descending\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_display() {
        let options = SortOptions {
            direction: SortDirection::Descending,
            nulls: NullPolicy::First,
        };
        let sort = SortTransform::new(["x", "y"], options).unwrap();
        assert_eq!(sort.to_string(), "sort: x, y [descending, nulls first]");
    }
}
