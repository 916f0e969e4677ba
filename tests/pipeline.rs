//! End-to-end checks through the public API: raw per-block data in, chart
//! series out.

use chrono::NaiveDate;
use lvr_analytics::bands::{block_intervals, calendar_days, stitch};
use lvr_analytics::categories::{aggregate, aggregate_by_cluster};
use lvr_analytics::core::{
    CategoryRow, IndexKey, MarkoutTime, Observation, PoolCluster, all_cents_to_dollars,
};
use lvr_analytics::estimators::{ActivityTally, MomentState, Quartiles, observations_by_markout};
use lvr_analytics::histogram::{BucketLayout, consolidate};
use lvr_analytics::regression::BoundedRatioRegressor;
use lvr_analytics::ui::types::build::run_transform;
use lvr_analytics::ui::types::choices::TransformChoice;
use lvr_analytics::TransformError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

fn lvr_cents(rng: &mut StdRng, n: usize, zero_share: f64) -> Vec<u64> {
    (0..n)
        .map(|_| {
            if rng.random_bool(zero_share) {
                0
            } else {
                let u: f64 = rng.random_range(0.0..10.0);
                (u.exp() * 100.0) as u64
            }
        })
        .collect()
}

#[test]
fn markout_activity_feeds_the_regression() {
    let mut rng = StdRng::seed_from_u64(11);
    let tallies: Vec<(MarkoutTime, ActivityTally)> = MarkoutTime::offsets()
        .into_iter()
        .map(|m| {
            let secs = m.as_seconds().unwrap_or(0.0);
            let zero_share = 0.7 - 0.1 * secs;
            let mut tally = ActivityTally::default();
            for c in all_cents_to_dollars(&lvr_cents(&mut rng, 4_000, zero_share)) {
                tally.record(c);
            }
            (m, tally)
        })
        .collect();

    let observations = observations_by_markout(&tallies);
    assert_eq!(observations.len(), tallies.len());

    let summary = BoundedRatioRegressor::effect_at_mean(&observations).unwrap();
    assert!(summary.fit.beta > 0.0);
    assert!(summary.marginal_effect > 0.0);
    assert!((0.0..1.0).contains(&summary.predicted));
}

#[test]
fn partitioned_moments_agree_with_a_single_pass() {
    let mut rng = StdRng::seed_from_u64(3);
    let dollars = all_cents_to_dollars(&lvr_cents(&mut rng, 10_000, 0.5));

    let whole = MomentState::from_values(&dollars).finalize().unwrap();
    let merged = MomentState::merge_all(dollars.chunks(7_200).map(MomentState::from_values))
        .finalize()
        .unwrap();

    assert_eq!(whole.count, merged.count);
    for (a, b) in [
        (whole.mean, merged.mean),
        (whole.variance, merged.variance),
        (whole.skewness, merged.skewness),
        (whole.excess_kurtosis, merged.excess_kurtosis),
    ] {
        assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0), "{a} vs {b}");
    }
}

#[test]
fn histogram_from_values_then_consolidated() {
    let mut rng = StdRng::seed_from_u64(5);
    let dollars = all_cents_to_dollars(&lvr_cents(&mut rng, 5_000, 0.3));
    let non_zero = dollars.iter().filter(|&&d| d >= 0.01).count() as u64;

    let layout = BucketLayout::lvr_dollars();
    let buckets = layout.bucketize(&dollars);
    assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), non_zero);

    let merged = consolidate(&buckets, 1_000.0).unwrap();
    assert_eq!(merged.iter().map(|b| b.count).sum::<u64>(), non_zero);
    assert_eq!(merged.last().map(|b| b.label.as_str()), Some("1000+"));
    assert_eq!(consolidate(&merged, 1_000.0).unwrap(), merged);
}

#[test]
fn daily_quartiles_stitch_onto_a_calendar() {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let days = calendar_days(start, end).unwrap();
    assert_eq!(days.len(), 10);

    let mut rng = StdRng::seed_from_u64(9);
    let triples: Vec<_> = (0..7)
        .map(|d| {
            let values: Vec<f64> = (0..200).map(|_| rng.random_range(0.0..50.0)).collect();
            Quartiles::from_values(&values).unwrap().as_triple(d)
        })
        .collect();

    let band = stitch(&triples, &days).unwrap();
    assert_eq!(band.len(), 7);
    assert_eq!(band.points[0].key, days[3]);
    assert!(band.is_valid());
    assert_eq!(band.outline.len(), 14);

    let too_short = &days[..5];
    assert_eq!(
        stitch(&triples, too_short).unwrap_err(),
        TransformError::AlignmentError { series: 7, index: 5 }
    );
}

#[test]
fn block_interval_keys_index_category_rows() {
    let intervals = block_intervals(15_537_393, 15_537_393 + 3 * 7_200, 7_200).unwrap();
    let keys: Vec<String> = intervals.iter().map(|r| r.to_string()).collect();

    let rows: Vec<CategoryRow<String>> = keys
        .iter()
        .rev()
        .flat_map(|k| {
            [
                CategoryRow::new("USDC-WETH-500", k.clone(), 2.0),
                CategoryRow::new("WBTC-WETH-500", k.clone(), 1.0),
            ]
        })
        .collect();

    let universe = vec!["WBTC-WETH-500".to_string(), "USDC-WETH-500".to_string()];
    let agg = aggregate(&rows, &universe).unwrap();
    let usdc = agg.get("USDC-WETH-500").unwrap();
    assert_eq!(usdc.len(), 3);
    assert_eq!(usdc[0].0, keys[0]);

    let running = agg.cumulative();
    assert_eq!(running.get("USDC-WETH-500").unwrap()[2].1, 6.0);
}

#[test]
fn cluster_job_over_json() {
    let job: TransformChoice = serde_json::from_value(json!({
        "type": "category-aggregation",
        "params": { "by_cluster": true }
    }))
    .unwrap();
    let input = json!({
        "rows": [
            {
                "category": "0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640",
                "index_key": "2024-03",
                "value": 3.0
            },
            {
                "category": "0x3416cF6C708Da44DB2624D63ea0AAef7113527C6",
                "index_key": "2024-02",
                "value": 1.0
            }
        ]
    });

    let out = run_transform(&job, input).unwrap();
    let series = out["series"].as_object().unwrap();
    assert_eq!(series.len(), PoolCluster::universe().len());
    assert_eq!(series.keys().next().map(String::as_str), Some("Stable Pairs"));
    assert_eq!(out["series"]["USDC-WETH"], json!([["2024-03", 3.0]]));
}

#[test]
fn cluster_aggregation_rejects_untracked_pools() {
    let rows = vec![CategoryRow::new("0x0000", IndexKey::from(1), 1.0)];
    assert_eq!(
        aggregate_by_cluster(&rows).unwrap_err(),
        TransformError::UnknownCategory("0x0000".into())
    );
}

#[test]
fn degenerate_regression_input() {
    let obs = vec![Observation::new(0.0, 0.2), Observation::new(0.0, 0.3)];
    assert_eq!(
        BoundedRatioRegressor::fit(&obs).unwrap_err(),
        TransformError::DegenerateCovariate
    );
}
