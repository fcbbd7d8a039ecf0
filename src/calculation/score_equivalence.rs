//! Score equivalence lookup.
//!
//! Converts a secondary-scale score (SAT) to its reference-scale equivalent
//! (ACT) with the step table held by [`ScoreEquivalenceTable`].

use crate::models::ScoreEquivalenceTable;

impl ScoreEquivalenceTable {
    /// Converts a score to its equivalent.
    ///
    /// Bands are scanned from the highest threshold down and the first band
    /// with `score >= threshold` wins. Scores below every threshold map to
    /// the floor. A missing (or non-finite) score converts to missing.
    ///
    /// No range validation is applied: a score above the scale maximum maps
    /// to the top band.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrollment_analytics::models::ScoreEquivalenceTable;
    ///
    /// let table = ScoreEquivalenceTable::default();
    ///
    /// assert_eq!(table.convert(Some(1250.0)), Some(26));
    /// assert_eq!(table.convert(Some(1260.0)), Some(27));
    /// assert_eq!(table.convert(Some(500.0)), Some(15));
    /// assert_eq!(table.convert(None), None);
    /// ```
    pub fn convert(&self, score: Option<f64>) -> Option<u32> {
        let score = score.filter(|s| s.is_finite())?;

        let equivalent = self
            .bands()
            .iter()
            .find(|band| score >= band.threshold)
            .map_or(self.floor(), |band| band.equivalent);

        Some(equivalent)
    }
}
