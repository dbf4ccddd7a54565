//! Routing of saved timers.
//!
//! A saved timer goes to exactly one sink, chosen by its tags, and is then
//! either kept (e.g. recurring pomodoros) or deleted from the registry.

use chrono::{DateTime, Utc};

use crate::config::RoutingConfig;
use crate::error::TrackerError;
use crate::storage::{Journal, Outbox, OutboxEntry};

/// A saved timer as handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEntry {
    pub id: String,
    /// Approximated duration in seconds
    pub duration: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

/// Destination for saved timers.
#[cfg_attr(test, mockall::automock)]
pub trait Sink {
    /// Short name for messages and logs.
    fn name(&self) -> String;

    /// Record a saved timer.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be stored.
    fn deliver(&mut self, entry: &SavedEntry) -> Result<(), TrackerError>;
}

/// What to do with a timer once it has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// Leave it registered
    Keep,
    /// Remove it from the registry
    Delete,
}

/// Result of routing one saved timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    /// Name of the sink that took the entry
    pub sink: String,
    pub disposal: Disposal,
}

/// Writes saved timers to the markdown journal.
#[derive(Debug, Clone)]
pub struct JournalSink {
    journal: Journal,
}

impl JournalSink {
    #[must_use]
    pub const fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl Sink for JournalSink {
    fn name(&self) -> String {
        format!("journal '{}'", self.journal.path().display())
    }

    fn deliver(&mut self, entry: &SavedEntry) -> Result<(), TrackerError> {
        self.journal
            .append(entry.saved_at.date_naive(), &entry.id, entry.duration)
    }
}

/// Hands saved timers to external trackers through the outbox.
#[derive(Debug, Clone)]
pub struct OutboxSink {
    outbox: Outbox,
}

impl OutboxSink {
    #[must_use]
    pub const fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }
}

impl Sink for OutboxSink {
    fn name(&self) -> String {
        "outbox".to_string()
    }

    fn deliver(&mut self, entry: &SavedEntry) -> Result<(), TrackerError> {
        self.outbox.push(&OutboxEntry {
            id: entry.id.clone(),
            duration: entry.duration,
            started_at: entry.started_at,
            tags: entry.tags.clone(),
            saved_at: entry.saved_at,
        })
    }
}

/// Picks a sink for each saved timer and decides its disposal.
pub struct SaveRouter {
    external_tags: Vec<String>,
    keep_tags: Vec<String>,
    external: Box<dyn Sink>,
    fallback: Box<dyn Sink>,
}

impl SaveRouter {
    /// Build a router from routing settings.
    ///
    /// Timers carrying any external tag go to `external`, all others to
    /// `fallback`.
    #[must_use]
    pub fn new(config: &RoutingConfig, external: Box<dyn Sink>, fallback: Box<dyn Sink>) -> Self {
        Self {
            external_tags: config.external_tags.clone(),
            keep_tags: config.keep_tags.clone(),
            external,
            fallback,
        }
    }

    /// Deliver an entry to its sink and decide whether the timer stays.
    ///
    /// # Errors
    ///
    /// Returns the sink's error; the timer should then stay registered.
    pub fn route(&mut self, entry: &SavedEntry) -> Result<Routed, TrackerError> {
        let has_any = |tags: &[String]| tags.iter().any(|t| entry.tags.contains(t));

        let sink = if has_any(&self.external_tags) {
            &mut self.external
        } else {
            &mut self.fallback
        };
        sink.deliver(entry)?;

        let disposal = if has_any(&self.keep_tags) {
            Disposal::Keep
        } else {
            Disposal::Delete
        };
        tracing::debug!(timer = %entry.id, sink = %sink.name(), ?disposal, "saved timer routed");

        Ok(Routed {
            sink: sink.name(),
            disposal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockall::predicate::function;
    use tempfile::TempDir;

    fn entry(tags: &[&str]) -> SavedEntry {
        SavedEntry {
            id: "task".to_string(),
            duration: 600,
            started_at: None,
            tags: tags.iter().map(ToString::to_string).collect(),
            saved_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
        }
    }

    fn sink(name: &'static str, calls: usize) -> Box<MockSink> {
        let mut sink = MockSink::new();
        sink.expect_name().returning(move || name.to_string());
        sink.expect_deliver()
            .with(function(|e: &SavedEntry| e.id == "task"))
            .times(calls)
            .returning(|_| Ok(()));
        Box::new(sink)
    }

    #[test]
    fn test_untagged_goes_to_fallback_and_is_deleted() {
        let mut router = SaveRouter::new(
            &RoutingConfig::default(),
            sink("outbox", 0),
            sink("journal", 1),
        );

        let routed = router.route(&entry(&[])).unwrap();
        assert_eq!(routed.sink, "journal");
        assert_eq!(routed.disposal, Disposal::Delete);
    }

    #[test]
    fn test_external_tag_goes_to_outbox() {
        let mut router = SaveRouter::new(
            &RoutingConfig::default(),
            sink("outbox", 1),
            sink("journal", 0),
        );

        let routed = router.route(&entry(&["redmine"])).unwrap();
        assert_eq!(routed.sink, "outbox");
        assert_eq!(routed.disposal, Disposal::Delete);
    }

    #[test]
    fn test_pomodoro_is_kept() {
        let mut router = SaveRouter::new(
            &RoutingConfig::default(),
            sink("outbox", 0),
            sink("journal", 1),
        );

        let routed = router.route(&entry(&["pomodoro"])).unwrap();
        assert_eq!(routed.disposal, Disposal::Keep);
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut failing = MockSink::new();
        failing.expect_name().returning(|| "journal".to_string());
        failing
            .expect_deliver()
            .returning(|_| Err(TrackerError::Storage("read-only".to_string())));

        let mut router = SaveRouter::new(
            &RoutingConfig::default(),
            sink("outbox", 0),
            Box::new(failing),
        );

        assert!(matches!(
            router.route(&entry(&[])),
            Err(TrackerError::Storage(_))
        ));
    }

    #[test]
    fn test_journal_sink_writes_markdown() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("TimeTracker.md");
        let mut sink = JournalSink::new(Journal::new(path.clone()));

        sink.deliver(&entry(&[])).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "## 2024-05-06\n\ntask: `00:10:00`");
    }

    #[test]
    fn test_outbox_sink_writes_json_line() {
        let temp_dir = TempDir::new().unwrap();
        let outbox = Outbox::new(temp_dir.path().join("outbox.jsonl"));
        let mut sink = OutboxSink::new(outbox.clone());

        sink.deliver(&entry(&["jira"])).unwrap();

        let entries = outbox.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration, 600);
        assert_eq!(entries[0].tags, vec!["jira"]);
    }
}
