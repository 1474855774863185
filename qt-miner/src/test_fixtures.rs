//! Common datasets for clustering tests and benchmarks.
//!
//! Available to dependent crates through the `test-utils` feature.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{ColumnSpec, Dataset, RawValue};
use crate::error::Result;

/// Two numeric pairs far apart: `(0,0),(0,1)` and `(10,10),(10,11)`.
///
/// Within-pair scaled distance is 1/11, across pairs at least 20/11.
pub fn four_points() -> Result<Dataset> {
    Dataset::builder(vec![ColumnSpec::numeric("x"), ColumnSpec::numeric("y")])
        .row(vec![0.0.into(), 0.0.into()])
        .row(vec![0.0.into(), 1.0.into()])
        .row(vec![10.0.into(), 10.0.into()])
        .row(vec![10.0.into(), 11.0.into()])
        .build()
}

/// Two categorical records at distance exactly 1.
pub fn letter_pair() -> Result<Dataset> {
    Dataset::builder(vec![ColumnSpec::categorical("letter")])
        .row(vec!["a".into()])
        .row(vec!["b".into()])
        .build()
}

/// A small weather table mixing categorical and numeric attributes.
pub fn weather() -> Result<Dataset> {
    let rows: Vec<Vec<RawValue>> = vec![
        vec!["sunny".into(), 30.0.into(), "high".into()],
        vec!["sunny".into(), 27.0.into(), "high".into()],
        vec!["overcast".into(), 28.0.into(), "high".into()],
        vec!["rain".into(), 21.0.into(), "high".into()],
        vec!["rain".into(), 12.0.into(), "normal".into()],
        vec!["rain".into(), 11.0.into(), "normal".into()],
        vec!["overcast".into(), 10.0.into(), "normal".into()],
        vec!["sunny".into(), 22.0.into(), "high".into()],
        vec!["sunny".into(), 14.0.into(), "normal".into()],
        vec!["rain".into(), 20.0.into(), "normal".into()],
    ];
    Dataset::builder(vec![
        ColumnSpec::categorical("outlook"),
        ColumnSpec::numeric("temperature"),
        ColumnSpec::categorical("humidity"),
    ])
    .rows(rows)
    .build()
}

/// `groups` tight numeric groups of `per_group` points each.
///
/// Group `g` is centred on `(g * 100, g * 100)` and every point lies within
/// 1 unit of its centre on each axis, so for two or more groups any scaled
/// radius between the group width and the gap keeps the groups apart.
pub fn grouped(groups: usize, per_group: usize, seed: u64) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(groups * per_group);
    for g in 0..groups {
        let centre = g as f64 * 100.0;
        for _ in 0..per_group {
            let x = centre + rng.random_range(-1.0..1.0f64);
            let y = centre + rng.random_range(-1.0..1.0f64);
            rows.push(vec![RawValue::from(x), RawValue::from(y)]);
        }
    }
    Dataset::builder(vec![ColumnSpec::numeric("x"), ColumnSpec::numeric("y")])
        .rows(rows)
        .build()
}

/// `size` records of random values over one categorical and two numeric columns.
pub fn random_mixed(size: usize, seed: u64) -> Result<Dataset> {
    const COLORS: [&str; 4] = ["red", "green", "blue", "yellow"];
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..size).map(|_| {
        vec![
            RawValue::from(COLORS[rng.random_range(0..COLORS.len())]),
            RawValue::from(rng.random_range(0.0..100.0f64)),
            RawValue::from(rng.random_range(0..10i64)),
        ]
    });
    Dataset::builder(vec![
        ColumnSpec::categorical("color"),
        ColumnSpec::numeric("weight"),
        ColumnSpec::numeric("rank"),
    ])
    .rows(rows.collect::<Vec<_>>())
    .build()
}

/// An Arrow batch with an integer, a float and a nullable string column.
pub fn weather_batch() -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("day", DataType::Int64, false),
        Field::new("temperature", DataType::Float64, false),
        Field::new("outlook", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
            Arc::new(Float64Array::from(vec![30.0, 28.0, 12.0, 10.0])),
            Arc::new(StringArray::from(vec![
                Some("sunny"),
                Some("sunny"),
                Some("rain"),
                None,
            ])),
        ],
    )?;
    Ok(batch)
}
