//! Counting, top-N selection, percentage distributions and cross-tabs.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{ResultTable, Value};

use super::grouping::Grouped;

/// Counts items per key in first-seen order. `None` keys are skipped.
pub fn count_by<T, K, I, F>(items: I, key: F) -> Grouped<K, usize>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<K>,
    K: Eq + Hash + Clone,
{
    Grouped::accumulate(items, key, |count: &mut usize, _| *count += 1)
}

/// Orders counts from largest to smallest and keeps the first `n`.
///
/// The sort is stable: equal counts stay in first-seen order.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::calculation::{count_by, top_n};
///
/// let colleges = ["Arts", "Business", "Business", "Nursing", "Arts"];
/// let counts = count_by(colleges.iter(), |c| Some(**c));
///
/// assert_eq!(top_n(&counts, 2), vec![("Arts", 2), ("Business", 2)]);
/// ```
pub fn top_n<K: Eq + Hash + Clone>(counts: &Grouped<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut ranked: Vec<(K, usize)> = counts.iter().map(|(k, c)| (k.clone(), *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Share of each category as a percentage of all counted items.
///
/// Categories are ordered from most to least frequent (stable). An empty
/// input gives an empty distribution.
pub fn percentage_distribution<K: Eq + Hash + Clone>(counts: &Grouped<K, usize>) -> Vec<(K, f64)> {
    let total: usize = counts.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        return Vec::new();
    }

    top_n(counts, counts.len())
        .into_iter()
        .map(|(k, c)| (k, c as f64 / total as f64 * 100.0))
        .collect()
}

/// Two-way table of counts (or row percentages).
///
/// Rows are outer keys in first-seen order. Columns are the union of inner
/// labels in first-seen order; a combination that never occurs is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab<K> {
    outer_label: String,
    columns: Vec<String>,
    rows: Vec<(K, Vec<f64>)>,
    normalized: bool,
}

impl<K: Eq + Hash + Clone> CrossTab<K> {
    /// Builds a cross-tab from `(outer, inner)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrollment_analytics::calculation::CrossTab;
    ///
    /// let tab = CrossTab::from_pairs(
    ///     "college",
    ///     vec![
    ///         ("Arts", "Female".to_string()),
    ///         ("Arts", "Male".to_string()),
    ///         ("Nursing", "Female".to_string()),
    ///     ],
    /// );
    ///
    /// assert_eq!(tab.columns(), &["Female", "Male"]);
    /// assert_eq!(tab.row(&"Nursing"), Some(&[1.0, 0.0][..]));
    /// ```
    pub fn from_pairs<I>(outer_label: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut column_index: HashMap<String, usize> = HashMap::new();
        let mut grouped: Grouped<K, Vec<f64>> = Grouped::new();

        for (outer, inner) in pairs {
            let position = match column_index.get(&inner) {
                Some(&position) => position,
                None => {
                    column_index.insert(inner.clone(), columns.len());
                    columns.push(inner);
                    columns.len() - 1
                }
            };

            let cells = grouped.entry_or_insert_with(outer, Vec::new);
            if cells.len() <= position {
                cells.resize(position + 1, 0.0);
            }
            cells[position] += 1.0;
        }

        let width = columns.len();
        let rows = grouped
            .into_entries()
            .into_iter()
            .map(|(key, mut cells)| {
                cells.resize(width, 0.0);
                (key, cells)
            })
            .collect();

        Self {
            outer_label: outer_label.into(),
            columns,
            rows,
            normalized: false,
        }
    }

    /// Inner labels in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Outer keys in row order.
    pub fn outer_keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|(k, _)| k)
    }

    /// Cells of one row, aligned with [`CrossTab::columns`].
    pub fn row(&self, key: &K) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, cells)| cells.as_slice())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scales every row to sum to 100 across all columns.
    ///
    /// A row whose total is zero is left at zero.
    pub fn row_normalized(mut self) -> Self {
        for (_, cells) in &mut self.rows {
            let total: f64 = cells.iter().sum();
            if total > 0.0 {
                for cell in cells.iter_mut() {
                    *cell = *cell / total * 100.0;
                }
            }
        }
        self.normalized = true;
        self
    }

    /// Orders rows by one column, highest first (stable).
    ///
    /// An unknown column leaves the order unchanged, since every row would
    /// hold zero for it.
    pub fn sorted_by_column(mut self, column: &str) -> Self {
        if let Some(position) = self.columns.iter().position(|c| c == column) {
            self.rows
                .sort_by(|a, b| b.1[position].total_cmp(&a.1[position]));
        }
        self
    }

    /// Keeps only the first `n` rows.
    pub fn truncated(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }
}

impl<K: Eq + Hash + Clone + Ord> CrossTab<K> {
    /// Orders rows by outer key, ascending.
    pub fn sorted_by_key(mut self) -> Self {
        self.rows.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl<K: Eq + Hash + Clone + Into<Value>> CrossTab<K> {
    /// Renders the cross-tab as a result table.
    ///
    /// The first column holds the outer key; counts are integers and
    /// normalized rows are numbers.
    pub fn to_table(&self, name: impl Into<String>) -> ResultTable {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(self.outer_label.clone());
        columns.extend(self.columns.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|(key, cells)| {
                let mut row = Vec::with_capacity(cells.len() + 1);
                row.push(key.clone().into());
                row.extend(cells.iter().map(|&cell| {
                    if self.normalized {
                        Value::from(cell)
                    } else {
                        Value::Integer(cell as i64)
                    }
                }));
                row
            })
            .collect();

        ResultTable {
            name: name.into(),
            columns,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gender_pairs() -> Vec<(String, String)> {
        [
            ("Engineering", "Male"),
            ("Engineering", "Male"),
            ("Engineering", "Female"),
            ("Nursing", "Female"),
            ("Nursing", "Female"),
            ("Nursing", "Non-Binary"),
            ("Arts", "Female"),
        ]
        .into_iter()
        .map(|(o, i)| (o.to_string(), i.to_string()))
        .collect()
    }

    #[test]
    fn test_top_n_ties_keep_first_seen_order() {
        let items = ["B", "A", "A", "B", "C"];
        let counts = count_by(items.iter(), |i| Some(**i));

        assert_eq!(top_n(&counts, 3), vec![("B", 2), ("A", 2), ("C", 1)]);
        assert_eq!(top_n(&counts, 1), vec![("B", 2)]);
        assert_eq!(top_n(&counts, 10).len(), 3);
    }

    #[test]
    fn test_percentage_distribution_excludes_missing() {
        let genders = [Some("Female"), None, Some("Female"), Some("Male"), None, Some("Male")];
        let counts = count_by(genders.iter(), |g| **g);

        let distribution = percentage_distribution(&counts);
        assert_eq!(distribution, vec![("Female", 50.0), ("Male", 50.0)]);
    }

    #[test]
    fn test_percentage_distribution_of_nothing_is_empty() {
        let counts: Grouped<String, usize> = Grouped::new();
        assert!(percentage_distribution(&counts).is_empty());
    }

    #[test]
    fn test_crosstab_fills_absent_cells_with_zero() {
        let tab = CrossTab::from_pairs("college", gender_pairs());

        assert_eq!(tab.columns(), &["Male", "Female", "Non-Binary"]);
        assert_eq!(tab.row(&"Engineering".to_string()), Some(&[2.0, 1.0, 0.0][..]));
        assert_eq!(tab.row(&"Arts".to_string()), Some(&[0.0, 1.0, 0.0][..]));
    }

    #[test]
    fn test_crosstab_row_normalization_sums_to_100() {
        let tab = CrossTab::from_pairs("college", gender_pairs()).row_normalized();

        for key in tab.outer_keys() {
            let total: f64 = tab.row(key).unwrap().iter().sum();
            assert!((total - 100.0).abs() < 1e-9, "{} sums to {}", key, total);
        }
        assert_eq!(tab.row(&"Arts".to_string()), Some(&[0.0, 100.0, 0.0][..]));
    }

    #[test]
    fn test_crosstab_sort_and_truncate() {
        let tab = CrossTab::from_pairs("college", gender_pairs())
            .row_normalized()
            .sorted_by_column("Female")
            .truncated(2);

        let keys: Vec<&String> = tab.outer_keys().collect();
        assert_eq!(keys, vec!["Arts", "Nursing"]);
    }

    #[test]
    fn test_crosstab_to_table() {
        let table = CrossTab::from_pairs("college", gender_pairs()).to_table("gender_by_college");

        assert_eq!(table.columns, vec!["college", "Male", "Female", "Non-Binary"]);
        assert_eq!(
            table.rows[0],
            vec![
                Value::from("Engineering"),
                Value::Integer(2),
                Value::Integer(1),
                Value::Integer(0)
            ]
        );
    }

    #[test]
    fn test_crosstab_with_integer_outer_key() {
        let pairs = vec![(2020, "White".to_string()), (2021, "Asian".to_string())];
        let table = CrossTab::from_pairs("year", pairs).to_table("ethnicity_by_year");

        assert_eq!(table.rows[0][0], Value::Integer(2020));
        assert_eq!(table.rows[1], vec![Value::Integer(2021), Value::Integer(0), Value::Integer(1)]);
    }

    proptest! {
        #[test]
        fn prop_normalized_rows_sum_to_100(
            pairs in prop::collection::vec((0u8..5, 0u8..6), 1..200)
        ) {
            let tab = CrossTab::from_pairs(
                "outer",
                pairs.into_iter().map(|(o, i)| (o, format!("c{}", i))),
            )
            .row_normalized();

            for key in tab.outer_keys() {
                let total: f64 = tab.row(key).unwrap().iter().sum();
                prop_assert!((total - 100.0).abs() < 1e-9);
            }
        }
    }
}
