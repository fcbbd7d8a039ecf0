//! Score equivalence table model.
//!
//! A table maps scores on a secondary scale (SAT, 400-1600) to an equivalent
//! on the reference scale (ACT, 1-36) as a descending step function. The
//! lookup itself lives in [`crate::calculation`].

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// One step of the equivalence table: scores at or above `threshold` map to
/// `equivalent` unless a higher band also matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Inclusive lower bound on the secondary scale.
    pub threshold: f64,
    /// Equivalent score on the reference scale.
    pub equivalent: u32,
}

/// A validated, monotone step table.
///
/// Bands are held in descending threshold order. Scores below every
/// threshold map to `floor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEquivalenceTable {
    bands: Vec<ScoreBand>,
    floor: u32,
}

/// SAT thresholds and ACT equivalents used when no table file is supplied.
const DEFAULT_SAT_TO_ACT: [(f64, u32); 21] = [
    (1570.0, 36),
    (1530.0, 35),
    (1490.0, 34),
    (1450.0, 33),
    (1420.0, 32),
    (1390.0, 31),
    (1360.0, 30),
    (1330.0, 29),
    (1300.0, 28),
    (1260.0, 27),
    (1230.0, 26),
    (1200.0, 25),
    (1160.0, 24),
    (1130.0, 23),
    (1100.0, 22),
    (1060.0, 21),
    (1030.0, 20),
    (990.0, 19),
    (960.0, 18),
    (920.0, 17),
    (880.0, 16),
];

/// ACT equivalent for SAT scores below the lowest threshold.
const DEFAULT_SAT_TO_ACT_FLOOR: u32 = 15;

impl ScoreEquivalenceTable {
    /// Builds a table from bands in any order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScoreTable` if a threshold is not finite, two bands
    /// share a threshold, a higher threshold maps to a lower equivalent, or
    /// the floor exceeds the lowest band's equivalent.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrollment_analytics::models::{ScoreBand, ScoreEquivalenceTable};
    ///
    /// let table = ScoreEquivalenceTable::new(
    ///     vec![
    ///         ScoreBand { threshold: 1230.0, equivalent: 26 },
    ///         ScoreBand { threshold: 1260.0, equivalent: 27 },
    ///     ],
    ///     25,
    /// )
    /// .unwrap();
    /// assert_eq!(table.bands()[0].threshold, 1260.0);
    /// ```
    pub fn new(mut bands: Vec<ScoreBand>, floor: u32) -> AnalyticsResult<Self> {
        if let Some(band) = bands.iter().find(|b| !b.threshold.is_finite()) {
            return Err(AnalyticsError::InvalidScoreTable {
                message: format!("threshold {} is not a finite number", band.threshold),
            });
        }

        bands.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));

        for pair in bands.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            if higher.threshold == lower.threshold {
                return Err(AnalyticsError::InvalidScoreTable {
                    message: format!("threshold {} appears more than once", higher.threshold),
                });
            }
            if higher.equivalent < lower.equivalent {
                return Err(AnalyticsError::InvalidScoreTable {
                    message: format!(
                        "band {} -> {} is below band {} -> {}",
                        higher.threshold, higher.equivalent, lower.threshold, lower.equivalent
                    ),
                });
            }
        }

        if let Some(lowest) = bands.last() {
            if floor > lowest.equivalent {
                return Err(AnalyticsError::InvalidScoreTable {
                    message: format!(
                        "floor {} exceeds lowest band equivalent {}",
                        floor, lowest.equivalent
                    ),
                });
            }
        }

        Ok(Self { bands, floor })
    }

    /// Bands in descending threshold order.
    pub fn bands(&self) -> &[ScoreBand] {
        &self.bands
    }

    /// Equivalent returned for scores below every threshold.
    pub fn floor(&self) -> u32 {
        self.floor
    }
}

impl Default for ScoreEquivalenceTable {
    fn default() -> Self {
        Self {
            bands: DEFAULT_SAT_TO_ACT
                .iter()
                .map(|&(threshold, equivalent)| ScoreBand {
                    threshold,
                    equivalent,
                })
                .collect(),
            floor: DEFAULT_SAT_TO_ACT_FLOOR,
        }
    }
}
