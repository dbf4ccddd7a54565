//! Plain-data snapshot of the timer registry.
//!
//! Records decode leniently: a field that is missing or has the wrong type
//! falls back to its default instead of rejecting the record, so partially
//! damaged state still loads.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timer::{DurationSource, Timer};

/// One timer as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration_acc: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub resumed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_running: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "is_computed"
    )]
    pub duration_source: DurationSource,
}

impl TimerRecord {
    /// Rebuild a timer; `None` when the record has no usable id.
    #[must_use]
    pub fn into_timer(self) -> Option<Timer> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let mut timer = Timer::new(id);
        timer.duration_acc = self.duration_acc;
        timer.started_at = self.started_at;
        timer.resumed_at = self.resumed_at;
        timer.paused_at = self.paused_at;
        timer.is_running = self.is_running;
        timer.tags = self.tags;
        timer.source = self.duration_source;
        Some(timer)
    }
}

impl From<&Timer> for TimerRecord {
    fn from(timer: &Timer) -> Self {
        Self {
            id: Some(timer.id.clone()),
            duration_acc: timer.duration_acc,
            started_at: timer.started_at,
            resumed_at: timer.resumed_at,
            paused_at: timer.paused_at,
            is_running: timer.is_running,
            tags: timer.tags.clone(),
            duration_source: timer.source,
        }
    }
}

fn is_computed(source: &DurationSource) -> bool {
    *source == DurationSource::Computed
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Seconds as a non-negative number or a numeric string.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let seconds = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(truncate_seconds)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(seconds.unwrap_or(0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_seconds(f: f64) -> u64 {
    f as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_field_names() {
        let mut timer = Timer::new("write-docs");
        timer.started_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        timer.is_running = true;
        timer.tags.push("jira".to_string());

        let json = serde_json::to_value(TimerRecord::from(&timer)).unwrap();
        assert_eq!(json["id"], "write-docs");
        assert_eq!(json["durationAcc"], 0);
        assert_eq!(json["startedAt"], "2024-01-02T03:04:05Z");
        assert_eq!(json["pausedAt"], Value::Null);
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["tags"][0], "jira");
        assert!(json.get("durationSource").is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let record: TimerRecord = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        let timer = record.into_timer().unwrap();
        assert_eq!(timer.id(), "a");
        assert!(timer.started_at().is_none());
        assert_eq!(timer.duration_acc(), 0);
        assert!(!timer.is_running());
        assert!(timer.tags().is_empty());
    }

    #[test]
    fn test_mistyped_fields_default_individually() {
        let record: TimerRecord = serde_json::from_str(
            r#"{
                "id": "b",
                "durationAcc": "125",
                "startedAt": "not a date",
                "pausedAt": "2024-01-02T03:04:05.250Z",
                "isRunning": "yes",
                "tags": 7,
                "unknown": {"x": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(record.duration_acc, 125);
        assert!(record.started_at.is_none());
        assert!(record.paused_at.is_some());
        assert!(!record.is_running);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_record_without_id_is_unusable() {
        let record: TimerRecord = serde_json::from_str(r#"{"durationAcc": 5}"#).unwrap();
        assert!(record.into_timer().is_none());

        let record: TimerRecord = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(record.into_timer().is_none());
    }

    #[test]
    fn test_overridden_source_survives() {
        let mut timer = Timer::new("c");
        timer.source = DurationSource::Overridden;
        timer.duration_acc = 60;

        let json = serde_json::to_string(&TimerRecord::from(&timer)).unwrap();
        assert!(json.contains("\"durationSource\":\"overridden\""));

        let back: TimerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_timer().unwrap(), timer);
    }

    #[test]
    fn test_fractional_accumulator_truncates() {
        let record: TimerRecord =
            serde_json::from_str(r#"{"id": "d", "durationAcc": 12.9}"#).unwrap();
        assert_eq!(record.duration_acc, 12);

        let record: TimerRecord =
            serde_json::from_str(r#"{"id": "d", "durationAcc": -3}"#).unwrap();
        assert_eq!(record.duration_acc, 0);
    }
}
