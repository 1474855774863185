//! End-to-end clustering scenarios through the public API.

use qt_miner::data::{ColumnSpec, Dataset, DatasetView, RawValue};
use qt_miner::error::QtError;
use qt_miner::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ReportFormatter};
use qt_miner::mining::{run_clustering, ClusterSet, CollisionPolicy, MinerConfig, QtMiner, Radius};

fn four_points() -> Dataset {
    Dataset::builder(vec![ColumnSpec::numeric("x"), ColumnSpec::numeric("y")])
        .row(vec![0.0.into(), 0.0.into()])
        .row(vec![0.0.into(), 1.0.into()])
        .row(vec![10.0.into(), 10.0.into()])
        .row(vec![10.0.into(), 11.0.into()])
        .build()
        .unwrap()
}

fn letter_pair() -> Dataset {
    Dataset::builder(vec![ColumnSpec::categorical("letter")])
        .row(vec!["a".into()])
        .row(vec!["b".into()])
        .build()
        .unwrap()
}

#[test]
fn test_four_points_form_two_pairs() {
    let data = four_points();
    let outcome = run_clustering(&data, 1.5).unwrap();
    assert_eq!(outcome.cluster_count, 2);

    let members: Vec<Vec<usize>> = outcome
        .clusters
        .iter()
        .map(|c| c.members().collect())
        .collect();
    assert_eq!(members, vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(outcome.clusters.render(), "1:Centroid=(0 0)\n2:Centroid=(10 10)\n");
}

#[test]
fn test_four_points_radius_too_large() {
    let err = run_clustering(&four_points(), 20.0).unwrap_err();
    assert!(matches!(err, QtError::RadiusTooLarge { records: 4, .. }));
    assert!(err.to_string().contains("4 records"));
}

#[test]
fn test_categorical_pair() {
    let data = letter_pair();
    let outcome = run_clustering(&data, 0.5).unwrap();
    assert_eq!(outcome.cluster_count, 2);
    assert!(matches!(
        run_clustering(&data, 1.0),
        Err(QtError::RadiusTooLarge { records: 2, .. })
    ));
}

#[test]
fn test_constant_numeric_attribute_contributes_nothing() {
    let data = Dataset::builder(vec![ColumnSpec::numeric("k"), ColumnSpec::categorical("c")])
        .row(vec![5.0.into(), "a".into()])
        .row(vec![5.0.into(), "b".into()])
        .row(vec![5.0.into(), "a".into()])
        .build()
        .unwrap();
    let a = data.record(0).unwrap();
    let b = data.record(1).unwrap();
    assert_eq!(a.distance(b).unwrap(), 1.0);

    let outcome = run_clustering(&data, 0.5).unwrap();
    assert_eq!(outcome.cluster_count, 2);
    assert_eq!(outcome.clusters.cluster_of(0).unwrap().size(), 2);
}

#[test]
fn test_missing_value_is_never_zero() {
    let data = Dataset::builder(vec![ColumnSpec::categorical("c")])
        .row(vec!["a".into()])
        .row(vec![RawValue::Null])
        .build()
        .unwrap();
    let err = run_clustering(&data, 5.0).unwrap_err();
    assert!(matches!(err, QtError::MissingValue { ref attribute } if attribute == "c"));
}

#[test]
fn test_empty_dataset() {
    let data = Dataset::builder(vec![ColumnSpec::categorical("c")]).build().unwrap();
    assert!(matches!(run_clustering(&data, 0.5), Err(QtError::EmptyDataset)));
}

#[test]
fn test_distinct_rows_collapse_duplicates() {
    let data = Dataset::builder(vec![ColumnSpec::categorical("c")])
        .row(vec!["a".into()])
        .row(vec!["a".into()])
        .row(vec!["b".into()])
        .distinct_rows(true)
        .build()
        .unwrap();
    assert_eq!(data.record_count(), 2);
    assert_eq!(run_clustering(&data, 0.5).unwrap().cluster_count, 2);
}

#[test]
fn test_collision_policy_changes_collection_not_count() {
    // Both records render as "a b c" yet are 2 apart, so at radius 0 the
    // second accepted cluster collides with the first.
    let data = Dataset::builder(vec![ColumnSpec::categorical("l"), ColumnSpec::categorical("r")])
        .row(vec!["a b".into(), "c".into()])
        .row(vec!["a".into(), "b c".into()])
        .build()
        .unwrap();
    let radius = Radius::new(0.0).unwrap();
    let run = |policy| {
        QtMiner::new(MinerConfig::default().with_collision_policy(policy))
            .compute(&data, radius)
            .unwrap()
    };

    let merged = run(CollisionPolicy::Merge);
    assert_eq!(merged.cluster_count, 2);
    assert_eq!(merged.clusters.len(), 1);
    assert_eq!(merged.clusters.total_members(), 2);

    let replaced = run(CollisionPolicy::Replace);
    assert_eq!(replaced.cluster_count, 2);
    assert!(replaced.clusters.cluster_of(1).is_some());
    assert!(replaced.clusters.cluster_of(0).is_none());

    let rejected = run(CollisionPolicy::Reject);
    assert_eq!(rejected.cluster_count, 2);
    assert!(rejected.clusters.cluster_of(0).is_some());
    assert!(rejected.clusters.cluster_of(1).is_none());
}

#[test]
fn test_merge_may_exceed_radius_while_reject_keeps_membership() {
    let data = Dataset::builder(vec![ColumnSpec::categorical("l"), ColumnSpec::categorical("r")])
        .row(vec!["x y".into(), "z".into()])
        .row(vec!["x".into(), "y z".into()])
        .row(vec!["q".into(), "q".into()])
        .build()
        .unwrap();
    let radius = Radius::new(0.5).unwrap();
    let run = |policy| {
        QtMiner::new(MinerConfig::default().with_collision_policy(policy))
            .compute(&data, radius)
            .unwrap()
    };
    let farthest = |clusters: &ClusterSet| {
        let mut max = 0.0f64;
        for cluster in clusters.iter() {
            for id in cluster.members() {
                let record = data.record(id).unwrap();
                max = max.max(cluster.centroid().distance(record).unwrap());
            }
        }
        max
    };

    let merged = run(CollisionPolicy::Merge);
    assert_eq!(merged.cluster_count, 3);
    assert_eq!(merged.clusters.len(), 2);
    assert_eq!(merged.clusters.total_members(), 3);
    assert_eq!(farthest(&merged.clusters), 2.0);
    assert!(merged.clusters.render_with(&data).unwrap().contains("[x y z] dist=2"));

    let rejected = run(CollisionPolicy::Reject);
    assert_eq!(rejected.clusters.len(), 2);
    assert!(farthest(&rejected.clusters) <= radius.value());
}

#[test]
fn test_reports_from_public_formatters() {
    let data = four_points();
    let outcome = run_clustering(&data, 1.5).unwrap();

    let human = HumanFormatter::with_config(FormatterConfig::detailed())
        .format(&outcome, Some(&data as &dyn DatasetView))
        .unwrap();
    assert!(human.contains("1:Centroid=(0 0)\nExamples:\n[0 0] dist=0\n"));
    assert!(human.contains("AvgDistance="));

    let json = JsonFormatter::new().format(&outcome, None).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["clusters"].as_array().unwrap().len(), 2);
    assert_eq!(doc["clusters"][1]["centroid"], "10 10");
}

#[test]
fn test_record_batch_to_clusters() {
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    let schema = Arc::new(Schema::new(vec![
        Field::new("outlook", DataType::Utf8, false),
        Field::new("temperature", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["sunny", "sunny", "rain", "rain"])),
            Arc::new(Float64Array::from(vec![30.0, 29.0, 11.0, 10.0])),
        ],
    )
    .unwrap();

    let data = Dataset::from_record_batch(&batch).unwrap();
    let outcome = run_clustering(&data, 0.2).unwrap();
    assert_eq!(outcome.cluster_count, 2);
    assert_eq!(outcome.clusters.total_members(), 4);
}
