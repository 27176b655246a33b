// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Shape dispatch and pipeline evaluation
//!
//! `compute` executes one pipe; `Pipeline::evaluate` folds it over the whole
//! sequence. Both are pure: pipes, context, and inputs are never mutated, so
//! evaluation is deterministic and re-entrant.

use tracing::debug;

use crate::compute::ComputeContext;
use crate::errors::{TabflowError, TabflowResult};
use crate::pipe::{Pipe, SortTransform};
use crate::pipeline::Pipeline;
use crate::table::{Dataset, FlatTable, PartitionedTable, Value};

/// Execute one pipe against the current dataset.
///
/// A source ignores its input and emits its own table. Every other pipe
/// needs upstream data and fails with [`TabflowError::NoDataSource`] without
/// it.
pub fn compute(
    pipe: &Pipe,
    context: &ComputeContext,
    input: Option<Dataset>,
) -> TabflowResult<Dataset> {
    match pipe {
        Pipe::Source { name, table } => {
            debug!(source = %name, rows = table.row_count(), "emitting source table");
            Ok(Dataset::Flat(table.clone()))
        }
        Pipe::GroupBy { vars } => {
            pipe.validate()?;
            let input = input.ok_or(TabflowError::NoDataSource)?;
            group(vars, context, input)
        }
        Pipe::Sort(sort) => {
            let input = input.ok_or(TabflowError::NoDataSource)?;
            transform(sort, context, input)
        }
    }
}

/// Partition the dataset by the resolved grouping columns.
///
/// A context mapping wins; an unmapped grouping variable names its column
/// directly. Already-partitioned input is flattened first, so grouping
/// always re-derives partitions from the full data.
fn group(vars: &[String], context: &ComputeContext, input: Dataset) -> TabflowResult<Dataset> {
    let columns: Vec<String> = vars
        .iter()
        .map(|v| context.resolve(v).unwrap_or(v.as_str()).to_string())
        .collect();

    let flat = input.into_flat();
    let grouped = PartitionedTable::from_flat(&flat, &columns)?;
    debug!(
        keys = %columns.join(","),
        partitions = grouped.len(),
        "partitioned dataset"
    );
    Ok(Dataset::Partitioned(grouped))
}

/// Execute a transform with shape dispatch and constant re-attachment.
///
/// The transform's own algorithm only ever sees flat tables: a partitioned
/// input is processed one partition at a time, in existing key order, and
/// reassembled under the same keys. Partitions never interact.
fn transform(
    sort: &SortTransform,
    context: &ComputeContext,
    input: Dataset,
) -> TabflowResult<Dataset> {
    sort.validate()?;
    // Precondition: every referenced variable must resolve, before any data
    // is touched.
    let key_columns = context.resolve_all(&sort.vars)?;
    debug!(
        vars = %sort.vars.join(","),
        columns = %key_columns.join(","),
        shape = input.shape(),
        "applying sort transform"
    );

    let apply = |table: &FlatTable| -> TabflowResult<FlatTable> {
        let out = sort.apply(table, &key_columns)?;
        reattach_constants(context, table, out)
    };

    match input {
        Dataset::Flat(table) => Ok(Dataset::Flat(apply(&table)?)),
        Dataset::Partitioned(grouped) => {
            Ok(Dataset::Partitioned(grouped.map_partitions(apply)?))
        }
    }
}

/// Copy constant columns from the transform's input onto its output.
///
/// Transforms are not trusted to preserve identity-only columns: a verbatim
/// copy when the row count is unchanged, a re-fill from the constant value
/// when the transform changed the row count.
fn reattach_constants(
    context: &ComputeContext,
    original: &FlatTable,
    mut out: FlatTable,
) -> TabflowResult<FlatTable> {
    for column in original.columns() {
        if !context.is_constant(&column.name) {
            continue;
        }
        let values = if column.values.len() == out.row_count() {
            column.values.clone()
        } else {
            let fill = column.values.first().cloned().unwrap_or(Value::Null);
            vec![fill; out.row_count()]
        };
        out.set_column(&column.name, values)?;
    }
    Ok(out)
}

impl Pipeline {
    /// Evaluate the pipeline: a sequential fold of [`compute`] over the pipe
    /// sequence.
    ///
    /// Returns `Ok(None)` for the empty pipeline. A trimmed pipeline that
    /// still needs upstream data fails with `NoDataSource`; use
    /// [`Pipeline::evaluate_with`] to seed it.
    pub fn evaluate(&self, context: &ComputeContext) -> TabflowResult<Option<Dataset>> {
        self.fold(context, None)
    }

    /// Evaluate the pipeline seeded with caller-supplied data, for sequences
    /// that begin mid-stream.
    pub fn evaluate_with(
        &self,
        context: &ComputeContext,
        seed: Dataset,
    ) -> TabflowResult<Option<Dataset>> {
        self.fold(context, Some(seed))
    }

    fn fold(
        &self,
        context: &ComputeContext,
        seed: Option<Dataset>,
    ) -> TabflowResult<Option<Dataset>> {
        let mut current = seed;
        for (index, pipe) in self.pipes().iter().enumerate() {
            debug!(stage = index, kind = %pipe.kind(), "computing stage");
            current = Some(compute(pipe, context, current.take())?);
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::{NullPolicy, SortOptions};

    fn cars() -> FlatTable {
        FlatTable::from_columns(vec![
            ("speed", vec![3.into(), 1.into(), 2.into()]),
            (
                "label",
                vec!["const".into(), "const".into(), "const".into()],
            ),
        ])
        .unwrap()
    }

    fn ctx() -> ComputeContext {
        ComputeContext::new([("x", "speed")], ["label"])
    }

    fn sort_x() -> Pipe {
        Pipe::sort(["x"], SortOptions::default()).unwrap()
    }

    #[test]
    fn test_source_ignores_input() {
        let pipe = Pipe::source("cars", cars());
        let out = compute(&pipe, &ctx(), None).unwrap();
        assert_eq!(out, Dataset::Flat(cars()));
    }

    #[test]
    fn test_flat_sort_through_compute() {
        let out = compute(&sort_x(), &ctx(), Some(Dataset::Flat(cars()))).unwrap();
        let flat = out.as_flat().unwrap();
        assert_eq!(
            flat.column("speed").unwrap(),
            &[1.into(), 2.into(), 3.into()]
        );
    }

    #[test]
    fn test_constant_column_survives_sort() {
        let table = FlatTable::from_columns(vec![
            ("speed", vec![3.into(), 1.into(), 2.into()]),
            ("label", vec!["const".into(), "const".into(), "const".into()]),
        ])
        .unwrap();
        let out = compute(&sort_x(), &ctx(), Some(Dataset::Flat(table.clone()))).unwrap();
        let flat = out.as_flat().unwrap();
        assert_eq!(flat.column("speed").unwrap(), &[1.into(), 2.into(), 3.into()]);
        assert_eq!(flat.column("label").unwrap(), table.column("label").unwrap());
    }

    #[test]
    fn test_constant_refilled_after_row_drop() {
        let table = FlatTable::from_columns(vec![
            ("speed", vec![Value::Null, 2.into(), 1.into()]),
            ("label", vec!["const".into(), "const".into(), "const".into()]),
        ])
        .unwrap();
        let options = SortOptions {
            nulls: NullPolicy::Drop,
            ..SortOptions::default()
        };
        let pipe = Pipe::sort(["x"], options).unwrap();
        let out = compute(&pipe, &ctx(), Some(Dataset::Flat(table))).unwrap();
        let flat = out.as_flat().unwrap();
        assert_eq!(flat.row_count(), 2);
        assert_eq!(
            flat.column("label").unwrap(),
            &[Value::from("const"), "const".into()]
        );
    }

    #[test]
    fn test_missing_variable_names_all_missing() {
        let pipe = Pipe::sort(["z", "w"], SortOptions::default()).unwrap();
        let err = compute(&pipe, &ctx(), Some(Dataset::Flat(cars()))).unwrap_err();
        match err {
            TabflowError::UnresolvedVariable { variables } => {
                assert_eq!(variables, vec!["z", "w"]);
            }
            other => panic!("expected UnresolvedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_partitioned_sort_preserves_keys_and_order() {
        let table = FlatTable::from_columns(vec![
            ("g", vec!["b".into(), "a".into(), "b".into(), "a".into()]),
            ("speed", vec![4.into(), 2.into(), 3.into(), 1.into()]),
        ])
        .unwrap();
        let grouped = PartitionedTable::from_flat(&table, &["g".to_string()]).unwrap();
        let out = compute(
            &sort_x(),
            &ctx(),
            Some(Dataset::Partitioned(grouped.clone())),
        )
        .unwrap();

        let Dataset::Partitioned(sorted) = out else {
            panic!("expected partitioned output");
        };
        assert_eq!(sorted.len(), 2);
        // same keys, same order
        assert_eq!(sorted.partitions()[0].key, grouped.partitions()[0].key);
        assert_eq!(sorted.partitions()[1].key, grouped.partitions()[1].key);
        // each partition sorted independently
        assert_eq!(
            sorted.partitions()[0].table.column("speed").unwrap(),
            &[3.into(), 4.into()]
        );
        assert_eq!(
            sorted.partitions()[1].table.column("speed").unwrap(),
            &[1.into(), 2.into()]
        );
    }

    #[test]
    fn test_partition_then_sort_commutes_with_sort_then_partition() {
        let table = FlatTable::from_columns(vec![
            ("g", vec!["b".into(), "a".into(), "b".into(), "a".into()]),
            ("speed", vec![4.into(), 2.into(), 3.into(), 1.into()]),
        ])
        .unwrap();
        let keys = vec!["g".to_string()];

        // partition, then sort each partition
        let grouped = PartitionedTable::from_flat(&table, &keys).unwrap();
        let partition_first = compute(
            &sort_x(),
            &ctx(),
            Some(Dataset::Partitioned(grouped)),
        )
        .unwrap();
        let Dataset::Partitioned(partition_first) = partition_first else {
            panic!("expected partitioned output");
        };

        // sort the whole table, then partition
        let sorted = compute(&sort_x(), &ctx(), Some(Dataset::Flat(table))).unwrap();
        let sort_first =
            PartitionedTable::from_flat(sorted.as_flat().unwrap(), &keys).unwrap();

        // key order differs (first-appearance vs sorted-row order), but the
        // rows within each group must be identical: match partitions by key
        assert_eq!(partition_first.len(), sort_first.len());
        for a in partition_first.partitions() {
            let b = sort_first
                .partitions()
                .iter()
                .find(|b| b.key == a.key)
                .expect("partition key missing after sort-then-partition");
            assert_eq!(a.table, b.table);
        }
    }

    #[test]
    fn test_group_by_resolves_through_context_first() {
        let table = FlatTable::from_columns(vec![
            ("cyl", vec![4.into(), 6.into(), 4.into()]),
            ("speed", vec![1.into(), 2.into(), 3.into()]),
        ])
        .unwrap();
        let context = ComputeContext::new([("group", "cyl")], Vec::<String>::new());
        let pipe = Pipe::group_by(["group"]).unwrap();
        let out = compute(&pipe, &context, Some(Dataset::Flat(table))).unwrap();
        let Dataset::Partitioned(grouped) = out else {
            panic!("expected partitioned output");
        };
        assert_eq!(grouped.key_vars(), &["cyl".to_string()]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_transform_without_input_fails() {
        let err = compute(&sort_x(), &ctx(), None).unwrap_err();
        assert!(matches!(err, TabflowError::NoDataSource));
    }

    #[test]
    fn test_evaluate_folds_whole_pipeline() {
        let pipeline = Pipeline::new([
            Pipe::source("cars", cars()),
            Pipe::group_by(["g"]).unwrap(),
        ]);
        // no "g" column in cars: grouping fails cleanly
        assert!(matches!(
            pipeline.evaluate(&ctx()).unwrap_err(),
            TabflowError::UnknownColumn { .. }
        ));

        let pipeline = Pipeline::new([Pipe::source("cars", cars()), sort_x()]);
        let out = pipeline.evaluate(&ctx()).unwrap().unwrap();
        assert_eq!(
            out.as_flat().unwrap().column("speed").unwrap(),
            &[1.into(), 2.into(), 3.into()]
        );
    }

    #[test]
    fn test_evaluate_empty_pipeline_is_none() {
        assert_eq!(Pipeline::empty().evaluate(&ctx()).unwrap(), None);
    }

    #[test]
    fn test_evaluate_with_seeds_mid_stream_pipeline() {
        let pipeline = Pipeline::new([sort_x()]);
        assert!(matches!(
            pipeline.evaluate(&ctx()).unwrap_err(),
            TabflowError::NoDataSource
        ));

        let out = pipeline
            .evaluate_with(&ctx(), Dataset::Flat(cars()))
            .unwrap()
            .unwrap();
        assert_eq!(
            out.as_flat().unwrap().column("speed").unwrap(),
            &[1.into(), 2.into(), 3.into()]
        );
    }
}
