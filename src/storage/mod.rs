// Record storage
// Keyed upsert/read plus field scans
//
// Every write is a full-record overwrite; the last write wins. Two
// implementations: in-memory (tests, ephemeral sessions) and one JSON file
// per record under a data directory.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::engine::Conversation;
use crate::report::{ActionPlan, Report};

/// Fields a record can be scanned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProjectId,
    ModuleType,
}

/// `field == value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: Field,
    pub value: String,
}

impl FieldFilter {
    pub fn project(project_id: impl Into<String>) -> Self {
        Self {
            field: Field::ProjectId,
            value: project_id.into(),
        }
    }

    pub fn module(module: crate::coaching::ModuleType) -> Self {
        Self {
            field: Field::ModuleType,
            value: module.as_str().to_string(),
        }
    }
}

/// A storable record type.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Record kind; also the storage namespace ("conversation", "report", ...)
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn field(&self, field: Field) -> Option<&str>;

    /// Scans return newest first by this timestamp.
    fn recency(&self) -> DateTime<Utc>;

    fn matches(&self, filters: &[FieldFilter]) -> bool {
        filters
            .iter()
            .all(|f| self.field(f.field) == Some(f.value.as_str()))
    }
}

#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Insert or fully replace the record with the same id.
    async fn put(&self, record: &T) -> Result<()>;

    /// All records matching every filter, newest first. Empty filters match all.
    async fn scan_by_field(&self, filters: &[FieldFilter]) -> Result<Vec<T>>;
}

/// The three repositories the engine and report services share.
#[derive(Clone)]
pub struct Stores {
    pub conversations: Arc<dyn Repository<Conversation>>,
    pub reports: Arc<dyn Repository<Report>>,
    pub plans: Arc<dyn Repository<ActionPlan>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            conversations: Arc::new(MemoryRepository::new()),
            reports: Arc::new(MemoryRepository::new()),
            plans: Arc::new(MemoryRepository::new()),
        }
    }

    /// One directory per record kind under `root`.
    pub fn json_files(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            conversations: Arc::new(JsonFileRepository::new(root)),
            reports: Arc::new(JsonFileRepository::new(root)),
            plans: Arc::new(JsonFileRepository::new(root)),
        }
    }
}

pub(crate) fn sort_newest_first<T: Record>(records: &mut [T]) {
    records.sort_by(|a, b| b.recency().cmp(&a.recency()));
}

impl Record for Conversation {
    const KIND: &'static str = "conversation";

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::ProjectId => Some(&self.project_id),
            Field::ModuleType => Some(self.module_type.as_str()),
        }
    }

    fn recency(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Record for Report {
    const KIND: &'static str = "report";

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::ProjectId => Some(&self.project_id),
            Field::ModuleType => Some(self.module_type.as_str()),
        }
    }

    fn recency(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

impl Record for ActionPlan {
    const KIND: &'static str = "plan";

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::ProjectId => Some(&self.project_id),
            Field::ModuleType => None,
        }
    }

    fn recency(&self) -> DateTime<Utc> {
        self.generated_at
    }
}
