use crate::core::CategoryRow;
use crate::error::{TransformError, TransformResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// One category's points, ascending by key.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries<K> {
    pub category: String,
    pub points: Vec<(K, f64)>,
}

/// Per-category series in canonical category order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAggregate<K> {
    series: Vec<CategorySeries<K>>,
}

impl<K> CategoryAggregate<K> {
    pub fn series(&self) -> &[CategorySeries<K>] {
        &self.series
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.category.as_str())
    }

    pub fn get(&self, category: &str) -> Option<&[(K, f64)]> {
        self.series
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.points.as_slice())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total and share of the grand total per category (pie charts).
    /// A zero grand total yields zero shares.
    pub fn shares(&self) -> Vec<CategoryShare> {
        let totals: Vec<f64> = self
            .series
            .iter()
            .map(|s| s.points.iter().map(|(_, v)| v).sum())
            .collect();
        let grand: f64 = totals.iter().sum();

        self.series
            .iter()
            .zip(totals)
            .map(|(s, total)| CategoryShare {
                category: s.category.clone(),
                total,
                share: if grand != 0.0 { total / grand } else { 0.0 },
            })
            .collect()
    }
}

impl<K: Clone> CategoryAggregate<K> {
    /// Running totals within each category.
    pub fn cumulative(&self) -> Self {
        Self {
            series: self
                .series
                .iter()
                .map(|s| CategorySeries {
                    category: s.category.clone(),
                    points: cumulative_sum(&s.points),
                })
                .collect(),
        }
    }
}

impl<K: Ord + Clone> CategoryAggregate<K> {
    /// Stacked-area layers over `axis`: categories stack in canonical order,
    /// values sharing a key are summed, keys with no value contribute 0.
    pub fn stacked(&self, axis: &[K]) -> Vec<StackedSeries<K>> {
        let mut base = vec![0.0; axis.len()];
        let mut off_axis = 0usize;

        let out = self
            .series
            .iter()
            .map(|s| {
                let mut per_key: BTreeMap<&K, f64> = BTreeMap::new();
                for (k, v) in &s.points {
                    *per_key.entry(k).or_insert(0.0) += v;
                }
                off_axis += per_key
                    .keys()
                    .filter(|k| !axis.contains(**k))
                    .count();

                let layers = axis
                    .iter()
                    .zip(base.iter_mut())
                    .map(|(key, b)| {
                        let value = per_key.get(key).copied().unwrap_or(0.0);
                        let layer = StackLayer {
                            key: key.clone(),
                            base: *b,
                            top: *b + value,
                        };
                        *b += value;
                        layer
                    })
                    .collect();

                StackedSeries {
                    category: s.category.clone(),
                    layers,
                }
            })
            .collect();

        if off_axis > 0 {
            debug!(off_axis, "keys outside the stacking axis were ignored");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StackLayer<K> {
    pub key: K,
    pub base: f64,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StackedSeries<K> {
    pub category: String,
    pub layers: Vec<StackLayer<K>>,
}

impl<K: Serialize> Serialize for CategoryAggregate<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len()))?;
        for s in &self.series {
            map.serialize_entry(&s.category, &s.points)?;
        }
        map.end()
    }
}

/// Groups rows by category in the order given by `categories`.
///
/// Every listed category appears in the output, empty if no row has it.
/// Within a category, points are stably sorted by key; no accumulation is
/// applied (see [`cumulative_sum`]). A row whose category is not listed
/// fails the whole call.
pub fn aggregate<K: Ord + Clone>(
    rows: &[CategoryRow<K>],
    categories: &[String],
) -> TransformResult<CategoryAggregate<K>> {
    let mut seen = HashSet::with_capacity(categories.len());
    if let Some(dup) = categories.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(TransformError::InvalidParameter(format!(
            "category listed twice: {dup}"
        )));
    }

    let slot: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut grouped: Vec<Vec<(K, f64)>> = vec![Vec::new(); categories.len()];
    for row in rows {
        let i = *slot
            .get(row.category.as_str())
            .ok_or_else(|| TransformError::UnknownCategory(row.category.clone()))?;
        grouped[i].push((row.index_key.clone(), row.value));
    }

    let series = categories
        .iter()
        .zip(grouped)
        .map(|(category, mut points)| {
            points.sort_by(|a, b| a.0.cmp(&b.0));
            CategorySeries {
                category: category.clone(),
                points,
            }
        })
        .collect();

    Ok(CategoryAggregate { series })
}

/// Running total of `points`, in their given order.
pub fn cumulative_sum<K: Clone>(points: &[(K, f64)]) -> Vec<(K, f64)> {
    points
        .iter()
        .scan(0.0, |acc, (k, v)| {
            *acc += v;
            Some((k.clone(), *acc))
        })
        .collect()
}
