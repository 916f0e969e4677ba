use crate::bands::{StitchedBand, stitch};
use crate::categories::{
    CategoryAggregate, CategoryShare, StackedSeries, aggregate, aggregate_by_cluster,
};
use crate::core::{Bucket, IndexKey, Observation, PercentileTriple, units::CENTS_PER_DOLLAR};
use crate::estimators::{CentralMoments, MomentState};
use crate::histogram::{BucketLayout, consolidate};
use crate::regression::BoundedRatioRegressor;
use crate::ui::types::build::{BandInput, BuildError, CategoryInput};
use crate::ui::types::choices::{
    BoundedRatioParameters, CategoryParameters, HistogramParameters, MomentsParameters,
    PercentileBandParameters, TransformChoice,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluated {
    pub covariate: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionReport {
    pub alpha: f64,
    pub beta: f64,
    pub mean_covariate: f64,
    pub predicted_at_mean: f64,
    pub marginal_effect: f64,
    pub evaluated: Option<Evaluated>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub series: CategoryAggregate<IndexKey>,
    pub shares: Vec<CategoryShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacked: Option<Vec<StackedSeries<IndexKey>>>,
}

pub fn read_job(path: &Path) -> Result<TransformChoice, BuildError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn read_input(path: &Path) -> Result<Value, BuildError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Deserializes `input` into the dataset `choice` expects, runs the
/// transform and returns its JSON result.
pub fn run_transform(choice: &TransformChoice, input: Value) -> Result<Value, BuildError> {
    info!(kind = %choice.kind(), "running transform");
    let out = match choice {
        TransformChoice::BoundedRatio(p) => to_json(regress(p, serde_json::from_value(input)?)?),
        TransformChoice::Moments(p) => to_json(moments(p, serde_json::from_value(input)?)?),
        TransformChoice::HistogramConsolidation(p) => to_json(histogram(p, input)?),
        TransformChoice::PercentileBand(p) => {
            let band = band(p, serde_json::from_value(input)?)?;
            if !band.is_valid() {
                warn!(
                    invalid = band.invalid_points(),
                    "percentile band has crossed quartiles"
                );
            }
            to_json(band)
        }
        TransformChoice::CategoryAggregation(p) => {
            to_json(categories(p, serde_json::from_value(input)?)?)
        }
    }?;
    Ok(out)
}

fn to_json<T: Serialize>(value: T) -> Result<Value, BuildError> {
    Ok(serde_json::to_value(value)?)
}

pub fn regress(
    p: &BoundedRatioParameters,
    observations: Vec<Observation>,
) -> Result<RegressionReport, BuildError> {
    let summary = BoundedRatioRegressor::effect_at_mean(&observations)?;
    let scale = if p.as_percent { 100.0 } else { 1.0 };

    let evaluated = match p.evaluate_at {
        Some(x) if !x.is_finite() => {
            return Err(BuildError::InvalidParameter(format!(
                "evaluate_at must be finite, got {x}"
            )));
        }
        Some(x) => Some(Evaluated {
            covariate: x,
            predicted: summary.fit.predict(x) * scale,
        }),
        None => None,
    };

    Ok(RegressionReport {
        alpha: summary.fit.alpha,
        beta: summary.fit.beta,
        mean_covariate: summary.mean_covariate,
        predicted_at_mean: summary.predicted * scale,
        marginal_effect: summary.marginal_effect * scale,
        evaluated,
    })
}

pub fn moments(p: &MomentsParameters, values: Vec<f64>) -> Result<CentralMoments, BuildError> {
    if p.partitions == 0 {
        return Err(BuildError::InvalidParameter("partitions must be ≥ 1".into()));
    }
    let values: Vec<f64> = if p.from_cents {
        values.into_iter().map(|v| v / CENTS_PER_DOLLAR).collect()
    } else {
        values
    };

    let parts = usize::try_from(p.partitions).unwrap_or(usize::MAX);
    let chunk = values.len().div_ceil(parts).max(1);
    let state = MomentState::merge_all(values.chunks(chunk).map(MomentState::from_values));
    Ok(state.finalize()?)
}

pub fn histogram(p: &HistogramParameters, input: Value) -> Result<Vec<Bucket>, BuildError> {
    let buckets: Vec<Bucket> = if p.from_values {
        let values: Vec<f64> = serde_json::from_value(input)?;
        BucketLayout::lvr_dollars().bucketize(&values)
    } else {
        serde_json::from_value(input)?
    };
    Ok(consolidate(&buckets, p.cutoff)?)
}

pub fn band(
    p: &PercentileBandParameters,
    input: BandInput,
) -> Result<StitchedBand<IndexKey, IndexKey>, BuildError> {
    let series: Vec<PercentileTriple<IndexKey>> = if p.from_cents {
        input
            .series
            .into_iter()
            .map(|t| {
                PercentileTriple::new(
                    t.index_key,
                    t.p25 / CENTS_PER_DOLLAR,
                    t.median / CENTS_PER_DOLLAR,
                    t.p75 / CENTS_PER_DOLLAR,
                )
            })
            .collect()
    } else {
        input.series
    };
    Ok(stitch(&series, &input.index)?)
}

pub fn categories(
    p: &CategoryParameters,
    input: CategoryInput,
) -> Result<CategoryReport, BuildError> {
    let aggregated = if p.by_cluster {
        aggregate_by_cluster(&input.rows)?
    } else {
        let universe = input.categories.as_deref().ok_or_else(|| {
            BuildError::InvalidParameter("categories are required unless by_cluster is set".into())
        })?;
        aggregate(&input.rows, universe)?
    };

    let stacked = p.stacked.then(|| {
        let axis: Vec<IndexKey> = input
            .rows
            .iter()
            .map(|r| r.index_key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        aggregated.stacked(&axis)
    });

    let shares = aggregated.shares();
    let series = if p.cumulative {
        aggregated.cumulative()
    } else {
        aggregated
    };

    Ok(CategoryReport {
        series,
        shares,
        stacked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn bounded_ratio_job() {
        let job = TransformChoice::BoundedRatio(BoundedRatioParameters {
            evaluate_at: Some(0.0),
            as_percent: true,
        });
        let input = json!([
            { "covariate": -2.0, "proportion": 0.10 },
            { "covariate": 0.0, "proportion": 0.30 },
            { "covariate": 2.0, "proportion": 0.70 }
        ]);
        let out = run_transform(&job, input).unwrap();
        assert!(out["beta"].as_f64().unwrap() > 0.0);
        let at_zero = out["evaluated"]["predicted"].as_f64().unwrap();
        assert!(approx_eq(at_zero, out["predicted_at_mean"].as_f64().unwrap(), 1e-9));
        assert!(at_zero > 1.0 && at_zero < 100.0);
    }

    #[test]
    fn bounded_ratio_rejects_non_finite_evaluation_point() {
        let p = BoundedRatioParameters {
            evaluate_at: Some(f64::NAN),
            as_percent: false,
        };
        let obs = vec![Observation::new(0.0, 0.2), Observation::new(1.0, 0.4)];
        assert!(matches!(regress(&p, obs), Err(BuildError::InvalidParameter(_))));
    }

    #[test]
    fn moments_job_with_partitions_and_cents() {
        let p = MomentsParameters {
            from_cents: true,
            partitions: 3,
        };
        let m = moments(&p, vec![200.0, 400.0, 400.0, 400.0, 500.0, 500.0, 700.0, 900.0]).unwrap();
        assert_eq!(m.count, 8);
        assert!(approx_eq(m.mean, 5.0, 1e-12));
        assert!(approx_eq(m.variance, 4.0, 1e-12));
        assert!(approx_eq(m.skewness, 0.65625, 1e-12));
    }

    #[test]
    fn moments_job_errors() {
        let zero = MomentsParameters {
            from_cents: false,
            partitions: 0,
        };
        assert!(matches!(moments(&zero, vec![1.0]), Err(BuildError::InvalidParameter(_))));
        assert!(matches!(
            moments(&MomentsParameters::default(), vec![]),
            Err(BuildError::Transform(TransformError::EmptyInput))
        ));
    }

    #[test]
    fn histogram_job_from_raw_values() {
        let p = HistogramParameters {
            cutoff: 3000.0,
            from_values: true,
        };
        let out = histogram(&p, json!([5.0, 50.0, 4000.0, 12000.0, 50000.0, 0.001])).unwrap();
        let last = out.last().unwrap();
        assert_eq!(last.label, "3000+");
        assert_eq!(last.count, 3);
        assert_eq!(out.iter().map(|b| b.count).sum::<u64>(), 5);
    }

    #[test]
    fn histogram_job_from_buckets() {
        let job = TransformChoice::HistogramConsolidation(HistogramParameters {
            cutoff: 100.0,
            from_values: false,
        });
        let input = json!([
            { "range_start": 0.0, "range_end": 10.0, "count": 5, "label": "0-10" },
            { "range_start": 10.0, "range_end": 100.0, "count": 3, "label": "10-100" },
            { "range_start": 100.0, "range_end": 1000.0, "count": 2, "label": "100-1000" },
            { "range_start": 1000.0, "range_end": null, "count": 1, "label": "1000+" }
        ]);
        let out = run_transform(&job, input).unwrap();
        assert_eq!(out.as_array().unwrap().len(), 3);
        assert_eq!(out[2]["label"], "100+");
        assert_eq!(out[2]["count"], 3);
        assert_eq!(out[2]["range_end"], Value::Null);
    }

    #[test]
    fn band_job_right_aligns_and_scales() {
        let job = TransformChoice::PercentileBand(PercentileBandParameters { from_cents: true });
        let input = json!({
            "series": [
                { "index_key": 1, "p25": 100.0, "median": 200.0, "p75": 300.0 },
                { "index_key": 2, "p25": 150.0, "median": 250.0, "p75": 350.0 }
            ],
            "index": ["2024-01-01", "2024-01-02", "2024-01-03"]
        });
        let out = run_transform(&job, input).unwrap();
        let points = out["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["key"], "2024-01-02");
        assert_eq!(points[1]["triple"]["p75"], 3.5);
        assert_eq!(out["outline"]["values"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn band_job_reports_misalignment() {
        let job = TransformChoice::PercentileBand(PercentileBandParameters::default());
        let input = json!({
            "series": [
                { "index_key": 1, "p25": 1.0, "median": 2.0, "p75": 3.0 },
                { "index_key": 2, "p25": 1.0, "median": 2.0, "p75": 3.0 }
            ],
            "index": [1]
        });
        assert!(matches!(
            run_transform(&job, input),
            Err(BuildError::Transform(TransformError::AlignmentError { series: 2, index: 1 }))
        ));
    }

    #[test]
    fn category_job_keeps_order_and_accumulates() {
        let job = TransformChoice::CategoryAggregation(CategoryParameters {
            cumulative: true,
            by_cluster: false,
            stacked: true,
        });
        let input = json!({
            "categories": ["B", "A"],
            "rows": [
                { "category": "A", "index_key": 1, "value": 10.0 },
                { "category": "B", "index_key": 1, "value": 5.0 },
                { "category": "A", "index_key": 2, "value": 7.0 }
            ]
        });
        let out = run_transform(&job, input).unwrap();
        let keys: Vec<&String> = out["series"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(out["series"]["A"], json!([[1, 10.0], [2, 17.0]]));
        assert_eq!(out["shares"][1]["total"], 17.0);
        assert_eq!(out["stacked"][1]["layers"][0]["top"], 15.0);
    }

    #[test]
    fn category_job_needs_a_universe() {
        let p = CategoryParameters::default();
        let input = CategoryInput {
            categories: None,
            rows: vec![],
        };
        assert!(matches!(categories(&p, input), Err(BuildError::InvalidParameter(_))));
    }

    #[test]
    fn unknown_category_surfaces_as_transform_error() {
        let job = TransformChoice::CategoryAggregation(CategoryParameters::default());
        let input = json!({
            "categories": ["A"],
            "rows": [{ "category": "C", "index_key": "x", "value": 1.0 }]
        });
        let err = run_transform(&job, input).unwrap_err();
        assert_eq!(err.to_string(), "unknown category: C");
    }

    #[test]
    fn wrong_input_shape_is_a_json_error() {
        let job = TransformChoice::Moments(MomentsParameters::default());
        assert!(matches!(
            run_transform(&job, json!({ "not": "a list" })),
            Err(BuildError::Json(_))
        ));
    }

    #[test]
    fn job_and_input_files() {
        let mut job_file = NamedTempFile::new().unwrap();
        write!(job_file, r#"{{"type":"moments","params":{{"partitions":2}}}}"#).unwrap();
        let mut input_file = NamedTempFile::new().unwrap();
        write!(input_file, "[1.0, 2.0, 3.0, 4.0]").unwrap();

        let job = read_job(job_file.path()).unwrap();
        assert_eq!(
            job,
            TransformChoice::Moments(MomentsParameters {
                from_cents: false,
                partitions: 2,
            })
        );
        let out = run_transform(&job, read_input(input_file.path()).unwrap()).unwrap();
        assert_eq!(out["mean"], 2.5);
        assert_eq!(out["count"], 4);

        assert!(matches!(
            read_job(Path::new("/definitely/not/here.json")),
            Err(BuildError::Io(_))
        ));
    }
}
