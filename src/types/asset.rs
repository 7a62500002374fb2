use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw asset object from the inventory API, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRecord(pub Value);

impl AssetRecord {
    /// `IsComputerAgent` is boolean `true`; absent or non-boolean counts as false
    pub fn is_computer_agent(&self) -> bool {
        self.0
            .get("IsComputerAgent")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_computer_agent() {
        assert!(AssetRecord(json!({"IsComputerAgent": true})).is_computer_agent());
        assert!(!AssetRecord(json!({"IsComputerAgent": false})).is_computer_agent());
        assert!(!AssetRecord(json!({"AssetName": "printer"})).is_computer_agent());
        assert!(!AssetRecord(json!({"IsComputerAgent": "true"})).is_computer_agent());
        assert!(!AssetRecord(json!(null)).is_computer_agent());
    }

    #[test]
    fn test_serializes_verbatim() {
        let raw = json!({"AssetName": "ws-01", "IsComputerAgent": true, "Nested": {"a": [1, 2]}});
        let record: AssetRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }
}
