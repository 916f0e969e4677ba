use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

/// Overflow threshold of the dashboard's LVR histograms, in dollars.
pub const DEFAULT_CUTOFF: f64 = 10_000.0;

fn default_cutoff() -> f64 {
    DEFAULT_CUTOFF
}

fn default_partitions() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(default)]
pub struct BoundedRatioParameters {
    #[schemars(
        title = "Evaluate At",
        description = "Also report the fitted proportion at this covariate (blank = none)"
    )]
    pub evaluate_at: Option<f64>,

    #[schemars(
        title = "As Percent",
        description = "Report proportions and marginal effects in percent"
    )]
    pub as_percent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MomentsParameters {
    #[schemars(title = "From Cents", description = "Input values are integer cents")]
    pub from_cents: bool,

    #[schemars(
        title = "Partitions",
        description = "Accumulate this many contiguous chunks separately, then merge",
        range(min = 1),
        default = "default_partitions"
    )]
    pub partitions: u64,
}

impl Default for MomentsParameters {
    fn default() -> Self {
        Self {
            from_cents: false,
            partitions: default_partitions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HistogramParameters {
    #[schemars(
        title = "Cutoff",
        description = "Buckets starting at or above this value collapse into one",
        default = "default_cutoff"
    )]
    pub cutoff: f64,

    #[schemars(
        title = "From Values",
        description = "Input is raw dollar values to bucket on the LVR layout first"
    )]
    pub from_values: bool,
}

impl Default for HistogramParameters {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            from_values: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(default)]
pub struct PercentileBandParameters {
    #[schemars(title = "From Cents", description = "Percentiles are integer cents")]
    pub from_cents: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(default)]
pub struct CategoryParameters {
    #[schemars(title = "Cumulative", description = "Report running totals per category")]
    pub cumulative: bool,

    #[schemars(
        title = "By Cluster",
        description = "Rows name pool addresses; group them by pool cluster"
    )]
    pub by_cluster: bool,

    #[schemars(
        title = "Stacked",
        description = "Also emit stacked-area layers over every key seen"
    )]
    pub stacked: bool,
}

/// A transform job: which transform to run and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TransformKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TransformChoice {
    #[strum_discriminants(strum(
        message = "Bounded Ratio Regression",
        detailed_message = "Logit-linear fit of a proportion against a covariate."
    ))]
    BoundedRatio(BoundedRatioParameters),

    #[strum_discriminants(strum(
        message = "Streaming Moments",
        detailed_message = "Mean, variance, skewness and kurtosis in one pass."
    ))]
    Moments(MomentsParameters),

    #[strum_discriminants(strum(
        message = "Histogram Consolidation",
        detailed_message = "Collapse the long tail of a histogram into one bucket."
    ))]
    HistogramConsolidation(HistogramParameters),

    #[strum_discriminants(strum(
        message = "Percentile Band",
        detailed_message = "Align a p25/median/p75 series to a time index."
    ))]
    PercentileBand(PercentileBandParameters),

    #[strum_discriminants(strum(
        message = "Category Aggregation",
        detailed_message = "Group rows into one ordered series per category."
    ))]
    CategoryAggregation(CategoryParameters),
}

impl TransformChoice {
    pub fn kind(&self) -> TransformKind {
        TransformKind::from(self)
    }
}

impl UIChoice for TransformChoice {
    type Kind = TransformKind;

    fn schema() -> Schema {
        schema_for!(TransformChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a transform:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            TransformKind::BoundedRatio => json!({ "evaluate_at": null, "as_percent": false }),
            TransformKind::Moments => {
                json!({ "from_cents": false, "partitions": default_partitions() })
            }
            TransformKind::HistogramConsolidation => {
                json!({ "cutoff": DEFAULT_CUTOFF, "from_values": false })
            }
            TransformKind::PercentileBand => json!({ "from_cents": false }),
            TransformKind::CategoryAggregation => {
                json!({ "cumulative": false, "by_cluster": false, "stacked": false })
            }
        }
    }
}
