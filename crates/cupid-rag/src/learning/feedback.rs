//! Durable feedback log
//!
//! The log is a single JSON array rewritten on every append. Appends are
//! serialized by a mutex and the new array replaces the old file by rename,
//! so a crash mid-write leaves the previous contents intact.

use chrono::{DateTime, NaiveDateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::FeedbackRequest;

/// One user verdict on an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub answer_id: String,
    pub is_satisfied: bool,
    pub comment: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "timestamp_any_format")]
    pub timestamp: DateTime<Utc>,
}

/// Timestamp layout of logs written before RFC 3339 was adopted
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// legacy timestamps carry no offset and are taken as UTC
fn timestamp_any_format<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, LEGACY_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}

impl FeedbackRecord {
    /// Stamp a request with the current time
    pub fn from_request(request: FeedbackRequest) -> Self {
        Self {
            answer_id: request.answer_id,
            is_satisfied: request.is_satisfied,
            comment: request.comment,
            question: request.question,
            answer: request.answer,
            timestamp: Utc::now(),
        }
    }
}

struct FeedbackLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Append-only store for [`FeedbackRecord`]s
#[derive(Clone)]
pub struct FeedbackStore {
    log: Arc<FeedbackLog>,
}

impl FeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log: Arc::new(FeedbackLog {
                path: path.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log.path
    }

    /// Append one record; runs the file rewrite on the blocking pool
    pub async fn append(&self, record: FeedbackRecord) -> Result<()> {
        let log = Arc::clone(&self.log);
        tokio::task::spawn_blocking(move || log.append(record))
            .await
            .map_err(|e| Error::feedback_storage(format!("feedback writer failed: {}", e)))?
    }

    /// Number of committed records
    pub fn len(&self) -> Result<usize> {
        let _guard = self.log.write_lock.lock();
        Ok(self.log.read_records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// All committed records in arrival order
    pub fn records(&self) -> Result<Vec<FeedbackRecord>> {
        let _guard = self.log.write_lock.lock();
        self.log.read_records()
    }
}

impl FeedbackLog {
    fn append(&self, record: FeedbackRecord) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut records = match self.read_records() {
            Ok(records) => records,
            Err(Error::Json(e)) => {
                self.quarantine(&e)?;
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let answer_id = record.answer_id.clone();
        records.push(record);
        self.write_records(&records)?;

        tracing::info!(
            "Saved feedback for answer_id={} ({} records)",
            answer_id,
            records.len()
        );
        Ok(())
    }

    fn read_records(&self) -> Result<Vec<FeedbackRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::feedback_storage(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_records(&self, records: &[FeedbackRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |e: std::io::Error| {
            Error::feedback_storage(format!("cannot write {}: {}", self.path.display(), e))
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, records)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        Ok(())
    }

    /// Move an unparseable log aside so its bytes are kept
    fn quarantine(&self, cause: &serde_json::Error) -> Result<()> {
        let mut aside = self.path.clone().into_os_string();
        aside.push(format!(".corrupt-{}", Utc::now().timestamp()));
        let aside = PathBuf::from(aside);

        tracing::warn!(
            "Feedback log {} is not valid JSON ({}), moving it to {}",
            self.path.display(),
            cause,
            aside.display()
        );

        std::fs::rename(&self.path, &aside).map_err(|e| {
            Error::feedback_storage(format!("cannot move corrupt log aside: {}", e))
        })
    }
}
