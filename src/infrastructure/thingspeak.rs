// ThingSpeak channel client
use crate::application::telemetry_provider::{ProviderError, TelemetryProvider};
use crate::domain::telemetry::FeedRecord;
use crate::infrastructure::config::ProviderSettings;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ThingSpeakClient {
    http: reqwest::Client,
    base_url: String,
    channel_id: String,
    read_key: String,
    write_key: String,
    motor_field: String,
}

#[derive(Debug, Deserialize)]
struct FeedsResponse {
    #[serde(default)]
    feeds: Vec<Feed>,
}

#[derive(Debug, Deserialize)]
struct Feed {
    created_at: String,
    #[serde(flatten)]
    fields: HashMap<String, serde_json::Value>,
}

impl Feed {
    /// Keep only the field values that actually carry data; nulls from the
    /// channel disappear here and later parse as 0 downstream.
    fn into_record(self) -> FeedRecord {
        let fields = self
            .fields
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(s) => Some((name, s)),
                serde_json::Value::Number(n) => Some((name, n.to_string())),
                _ => None,
            })
            .collect();

        FeedRecord {
            timestamp: self.created_at,
            fields,
        }
    }
}

impl ThingSpeakClient {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            channel_id: settings.channel_id.clone(),
            read_key: settings.read_key.clone(),
            write_key: settings.write_key.clone(),
            motor_field: settings.fields.motor_state.clone(),
        }
    }

    async fn fetch_feeds(&self, results: usize) -> Result<Vec<FeedRecord>, ProviderError> {
        let url = format!(
            "{}/channels/{}/feeds.json",
            self.base_url, self.channel_id
        );
        let results = results.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.read_key.as_str()),
                ("results", results.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Upstream(format!(
                "channel read failed with status {}",
                response.status()
            )));
        }

        let body: FeedsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Upstream(format!("malformed channel response: {e}")))?;

        Ok(body.feeds.into_iter().map(Feed::into_record).collect())
    }
}

#[async_trait]
impl TelemetryProvider for ThingSpeakClient {
    async fn latest_record(&self) -> Result<FeedRecord, ProviderError> {
        let mut records = self.fetch_feeds(1).await?;
        records.pop().ok_or(ProviderError::NoData)
    }

    async fn recent_records(&self, count: usize) -> Result<Vec<FeedRecord>, ProviderError> {
        self.fetch_feeds(count).await
    }

    async fn write_motor_state(&self, mode: u8) -> Result<u64, ProviderError> {
        let url = format!("{}/update", self.base_url);
        let mode = mode.to_string();

        let response = self
            .http
            .post(&url)
            .form(&[
                ("api_key", self.write_key.as_str()),
                (self.motor_field.as_str(), mode.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Upstream(format!(
                "channel write failed with status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;

        // The update endpoint answers with the new entry id, or 0 when the
        // write was refused (typically rate limiting).
        let entry_id: u64 = body
            .trim()
            .parse()
            .map_err(|_| ProviderError::Upstream(format!("unexpected update response: {body}")))?;

        if entry_id == 0 {
            return Err(ProviderError::Rejected(
                "provider refused the update".to_string(),
            ));
        }

        Ok(entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_deserializes_and_drops_nulls() {
        let raw = r#"{
            "channel": {"id": 123456, "name": "ev-battery"},
            "feeds": [
                {
                    "created_at": "2024-05-01T10:00:00Z",
                    "entry_id": 9001,
                    "field1": "3.82",
                    "field2": "-20.5",
                    "field3": null,
                    "field5": "80"
                }
            ]
        }"#;

        let parsed: FeedsResponse = serde_json::from_str(raw).unwrap();
        let record = parsed.feeds.into_iter().next().unwrap().into_record();

        assert_eq!(record.timestamp, "2024-05-01T10:00:00Z");
        assert_eq!(record.fields.get("field1").unwrap(), "3.82");
        assert_eq!(record.fields.get("field5").unwrap(), "80");
        assert!(!record.fields.contains_key("field3"));
    }

    #[test]
    fn empty_feed_list_deserializes() {
        let parsed: FeedsResponse = serde_json::from_str(r#"{"feeds": []}"#).unwrap();
        assert!(parsed.feeds.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let settings = ProviderSettings {
            base_url: "https://api.thingspeak.com/".to_string(),
            channel_id: "42".to_string(),
            read_key: "r".to_string(),
            write_key: "w".to_string(),
            fields: Default::default(),
        };
        let client = ThingSpeakClient::new(&settings);
        assert_eq!(client.base_url, "https://api.thingspeak.com");
        assert_eq!(client.motor_field, "field8");
    }
}
