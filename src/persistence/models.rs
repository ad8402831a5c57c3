//! Persisted stats document.

use serde::{Deserialize, Serialize};

/// Aggregate usage counters plus the append-only event log.
///
/// Stored on disk as
/// `{"currentUsers": <int>, "totalUsers": <int>, "log": [<string>, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Sessions currently registered.
    pub current_users: u64,
    /// Sessions ever admitted. Never decremented.
    pub total_users: u64,
    /// Timestamped event lines, oldest first.
    pub log: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uses_camel_case_keys() {
        let stats = Stats {
            current_users: 2,
            total_users: 9,
            log: vec!["(1/1/2024, 1:00:00 AM) Spinning up.".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&stats).ok(),
            Some(json!({
                "currentUsers": 2,
                "totalUsers": 9,
                "log": ["(1/1/2024, 1:00:00 AM) Spinning up."],
            }))
        );
    }

    #[test]
    fn missing_keys_are_rejected() {
        assert!(serde_json::from_str::<Stats>(r#"{"totalUsers": 3}"#).is_err());
    }
}
