use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Time offset (seconds) at which the alternative execution price is taken.
///
/// `Brontes` is the observed series, which has no offset and therefore no
/// covariate value.
///
/// Variants are declared in ascending offset order, `Brontes` last; `Ord`
/// follows that order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
pub enum MarkoutTime {
    #[strum(to_string = "-2.0", serialize = "-2")]
    Negative2,
    #[strum(to_string = "-1.5")]
    Negative15,
    #[strum(to_string = "-1.0", serialize = "-1")]
    Negative1,
    #[strum(to_string = "-0.5")]
    Negative05,
    #[strum(to_string = "0.0", serialize = "0")]
    Zero,
    #[strum(to_string = "0.5")]
    Positive05,
    #[strum(to_string = "1.0", serialize = "1")]
    Positive1,
    #[strum(to_string = "1.5")]
    Positive15,
    #[strum(to_string = "2.0", serialize = "2")]
    Positive2,
    #[strum(to_string = "brontes", ascii_case_insensitive)]
    Brontes,
}

impl MarkoutTime {
    pub fn as_seconds(&self) -> Option<f64> {
        match self {
            MarkoutTime::Negative2 => Some(-2.0),
            MarkoutTime::Negative15 => Some(-1.5),
            MarkoutTime::Negative1 => Some(-1.0),
            MarkoutTime::Negative05 => Some(-0.5),
            MarkoutTime::Zero => Some(0.0),
            MarkoutTime::Positive05 => Some(0.5),
            MarkoutTime::Positive1 => Some(1.0),
            MarkoutTime::Positive15 => Some(1.5),
            MarkoutTime::Positive2 => Some(2.0),
            MarkoutTime::Brontes => None,
        }
    }

    pub fn from_seconds(value: f64) -> Option<Self> {
        const EPSILON: f64 = 1e-10;
        MarkoutTime::iter().find(|m| m.as_seconds().is_some_and(|s| (s - value).abs() < EPSILON))
    }

    /// The nine offsets that carry a covariate value, ascending.
    pub fn offsets() -> impl Iterator<Item = MarkoutTime> {
        MarkoutTime::iter().filter(|m| m.as_seconds().is_some())
    }
}

impl Serialize for MarkoutTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MarkoutTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MarkoutTime::from_str(raw.trim()).map_err(|_| {
            serde::de::Error::custom(format!("unknown markout time: {raw}"))
        })
    }
}
