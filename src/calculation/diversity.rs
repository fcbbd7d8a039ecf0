//! Simpson's diversity index.

/// Computes Simpson's diversity index `1 − Σ pᵢ²` from category counts.
///
/// Returns `None` when the counts sum to zero. A single category gives 0;
/// the value approaches 1 as categories become more numerous and even.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::calculation::simpson_index;
///
/// let index = simpson_index([60, 20, 20]).unwrap();
/// assert!((index - 0.56).abs() < 1e-12);
///
/// assert_eq!(simpson_index([42]), Some(0.0));
/// assert_eq!(simpson_index(Vec::new()), None);
/// ```
pub fn simpson_index<I: IntoIterator<Item = usize>>(counts: I) -> Option<f64> {
    let counts: Vec<usize> = counts.into_iter().collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }

    let total = total as f64;
    let concentration: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum();

    Some(1.0 - concentration)
}
