//! Ordered group-by and the numeric reductions applied per group.
//!
//! Grouping is a single pass over the records into a [`Grouped`] map that
//! remembers the order in which keys were first seen. Every reduction
//! treats missing values explicitly: they never count as zero.

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;

/// An insertion-ordered map from group key to accumulator.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::calculation::Grouped;
///
/// let colleges = ["Engineering", "Business", "Engineering"];
/// let counts =
///     Grouped::<&str, usize>::accumulate(colleges.iter(), |c| Some(**c), |count, _| *count += 1);
///
/// let pairs: Vec<_> = counts.iter().map(|(k, v)| (*k, *v)).collect();
/// assert_eq!(pairs, vec![("Engineering", 2), ("Business", 1)]);
/// ```
#[derive(Debug, Clone)]
pub struct Grouped<K, A> {
    index: HashMap<K, usize>,
    entries: Vec<(K, A)>,
}

impl<K, A> Default for Grouped<K, A> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, A> Grouped<K, A> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulator for `key`, inserting one from `init` if absent.
    pub fn entry_or_insert_with(&mut self, key: K, init: impl FnOnce() -> A) -> &mut A {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.clone(), position);
                self.entries.push((key, init()));
                position
            }
        };
        &mut self.entries[position].1
    }

    /// Groups `items` in one pass.
    ///
    /// Items whose key is `None` are skipped; each group's accumulator
    /// starts from `A::default()`.
    pub fn accumulate<T, I, F, U>(items: I, key: F, mut update: U) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<K>,
        U: FnMut(&mut A, &T),
        A: Default,
    {
        let mut grouped = Self::new();
        for item in items {
            if let Some(k) = key(&item) {
                update(grouped.entry_or_insert_with(k, A::default), &item);
            }
        }
        grouped
    }

    /// Looks up the accumulator of a key.
    pub fn get(&self, key: &K) -> Option<&A> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no group exists.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &A)> {
        self.entries.iter().map(|(k, a)| (k, a))
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Consumes the map, yielding groups in first-seen order.
    pub fn into_entries(self) -> Vec<(K, A)> {
        self.entries
    }
}

/// Hit / total counter for conditional-count rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateCounter {
    /// Records satisfying the predicate.
    pub hits: usize,
    /// All records in the group.
    pub total: usize,
}

impl RateCounter {
    /// Counts one record.
    pub fn record(&mut self, hit: bool) {
        self.total += 1;
        if hit {
            self.hits += 1;
        }
    }

    /// The rate as a percentage, or `None` for an empty group.
    pub fn rate(&self) -> Option<f64> {
        rate(self.hits, self.total)
    }
}

/// Collects the non-missing values of a numeric field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSummary {
    values: Vec<f64>,
}

impl NumericSummary {
    /// Adds a value; missing and non-finite values are ignored.
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.values.push(v);
        }
    }

    /// Number of non-missing values.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Mean of the non-missing values.
    pub fn mean(&self) -> Option<f64> {
        mean(self.values.iter().copied().map(Some))
    }

    /// Median of the non-missing values.
    pub fn median(&self) -> Option<f64> {
        median(self.values.iter().copied().map(Some))
    }

    /// Smallest value.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest value.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

impl FromIterator<Option<f64>> for NumericSummary {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut summary = Self::default();
        for value in iter {
            summary.push(value);
        }
        summary
    }
}

/// Conditional-count rate: `hits / total × 100`.
///
/// Returns `None` when `total` is zero.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::calculation::rate;
///
/// assert_eq!(rate(1, 2), Some(50.0));
/// assert_eq!(rate(0, 0), None);
/// ```
pub fn rate(hits: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(hits as f64 / total as f64 * 100.0)
}

/// Mean over non-missing values. All missing gives `None`, not zero.
pub fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Median over non-missing values; the mean of the middle pair for even counts.
pub fn median<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let mut sorted: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Exact mean of monetary amounts over non-missing values.
///
/// Undefined when there are no amounts or their sum leaves the `Decimal` range.
pub fn decimal_mean<I: IntoIterator<Item = Option<Decimal>>>(values: I) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut count = 0i64;
    for value in values.into_iter().flatten() {
        sum = sum.checked_add(value)?;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count))
}

/// Sorts rows by a metric, highest first.
///
/// The sort is stable, so ties keep their current order. Rows whose metric
/// is `None` go last.
pub fn sort_desc_by<T, F>(rows: &mut [T], metric: F)
where
    F: Fn(&T) -> Option<f64>,
{
    rows.sort_by(|a, b| match (metric(a), metric(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
