use serde::{Deserialize, Serialize};

/// Search configuration.
///
/// Every field has a default, so a host may load a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Longest reportable chain, in nodes
    pub max_length: usize,
    /// Add box/line intersection nodes to the link graph
    pub grouped_nodes: bool,
    /// Add almost locked set nodes, strongly linked digit to digit
    pub almost_locked_sets: bool,
    /// Only follow links on the start node's digit (X-chains)
    pub single_digit_only: bool,
    /// Return as soon as one chain with conclusions is found
    pub stop_at_first: bool,
    /// Search each start digit on its own thread
    pub parallel: bool,
    /// Upper bound on the number of steps returned
    pub max_steps: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_length: 12,
            grouped_nodes: true,
            almost_locked_sets: false,
            single_digit_only: false,
            stop_at_first: false,
            parallel: false,
            max_steps: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.max_length, 12);
        assert!(options.grouped_nodes);
        assert!(!options.almost_locked_sets);
        assert!(!options.parallel);
        assert_eq!(options.max_steps, 64);
    }

    #[test]
    fn test_partial_json() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"max_length": 8, "parallel": true}"#).unwrap();
        assert_eq!(options.max_length, 8);
        assert!(options.parallel);
        assert!(options.grouped_nodes);
        assert!(!options.almost_locked_sets);
        assert!(!options.stop_at_first);
    }
}
