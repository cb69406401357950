use serde_json::Value;

use crate::relay::{Record, RelayError, StateRelay};

pub const LAST_URL_KEY: &str = "lastUrl";
pub const LAST_Q_KEY: &str = "lastQ";

/// Last URL and last question as stored in the relay. Each field is
/// independent; `None` means no value, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagedInput {
    pub last_url: Option<String>,
    pub last_q: Option<String>,
}

impl StagedInput {
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            last_url: None,
            last_q: Some(question.into()),
        }
    }

    pub fn from_record(record: &Record) -> Self {
        let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            last_url: text(LAST_URL_KEY),
            last_q: text(LAST_Q_KEY),
        }
    }

    /// Only the fields that are set, so a merge-write leaves the others alone.
    pub fn to_patch(&self) -> Record {
        let mut patch = Record::new();
        if let Some(url) = &self.last_url {
            patch.insert(LAST_URL_KEY.to_string(), Value::String(url.clone()));
        }
        if let Some(question) = &self.last_q {
            patch.insert(LAST_Q_KEY.to_string(), Value::String(question.clone()));
        }
        patch
    }

    pub async fn load(relay: &dyn StateRelay) -> Result<Self, RelayError> {
        let record = relay.get(&[LAST_URL_KEY, LAST_Q_KEY]).await?;
        Ok(Self::from_record(&record))
    }

    pub async fn store(&self, relay: &dyn StateRelay) -> Result<(), RelayError> {
        let patch = self.to_patch();
        if patch.is_empty() {
            return Ok(());
        }
        relay.set(patch).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{StagedInput, LAST_Q_KEY, LAST_URL_KEY};
    use crate::relay::Record;

    #[test]
    fn patch_only_carries_present_fields() {
        let patch = StagedInput::question("why?").to_patch();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch[LAST_Q_KEY], json!("why?"));
        assert!(!patch.contains_key(LAST_URL_KEY));
    }

    #[test]
    fn non_string_values_read_as_absent() {
        let mut record = Record::new();
        record.insert(LAST_URL_KEY.into(), json!(12));
        record.insert(LAST_Q_KEY.into(), json!("kept"));

        let staged = StagedInput::from_record(&record);
        assert_eq!(staged.last_url, None);
        assert_eq!(staged.last_q.as_deref(), Some("kept"));
    }
}
