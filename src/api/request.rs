//! Query parameters accepted by the analytics API.

use serde::{Deserialize, Serialize};

/// Query string of the breakdown endpoints, e.g. `?by=college`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownQuery {
    /// Name of the grouping dimension.
    pub by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_query_deserializes() {
        let query: BreakdownQuery = serde_json::from_str(r#"{"by": "college"}"#).unwrap();
        assert_eq!(query.by, "college");
    }

    #[test]
    fn test_breakdown_query_requires_by() {
        let result: Result<BreakdownQuery, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
