//! Template storage abstraction.
//!
//! The [`TemplateStore`] trait defines the two operations the generation
//! pipeline needs — create and read — enabling pluggable backends. The
//! bundled [`InMemoryTemplateStore`] holds records for the process lifetime
//! with no eviction or persistence; a production deployment would swap in a
//! persistent or TTL-evicting backend behind the same trait.
//!
//! Records are immutable after creation, so concurrent reads need no
//! coordination beyond the per-record atomicity of `put`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{SharedTemplate, SourceFormat, TemplateRecord};

/// Abstract storage backend for uploaded templates.
///
/// All operations are async (via `async-trait`) so a future backend can do
/// I/O; the in-memory implementation returns immediately-ready futures.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Stores a new immutable template record and returns its fresh id.
    ///
    /// Ids never collide across concurrent calls.
    async fn put(
        &self,
        content: String,
        format: SourceFormat,
        original_name: String,
    ) -> Result<String>;

    /// Retrieves a record by id. Returns `None` for ids never issued.
    async fn get(&self, id: &str) -> Result<Option<SharedTemplate>>;

    /// Number of records currently held.
    async fn len(&self) -> usize;
}

/// In-memory store: a `HashMap` behind `RwLock`, records behind `Arc`.
///
/// Insertion happens under the write lock, so a `get` always observes a
/// fully-written record.
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<String, SharedTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn put(
        &self,
        content: String,
        format: SourceFormat,
        original_name: String,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let record = Arc::new(TemplateRecord {
            id: id.clone(),
            content,
            format,
            original_name,
            created_at: chrono::Utc::now().timestamp(),
        });
        let mut templates = self.templates.write().unwrap();
        templates.insert(id.clone(), record);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<SharedTemplate>> {
        let templates = self.templates.read().unwrap();
        Ok(templates.get(id).cloned())
    }

    async fn len(&self) -> usize {
        self.templates.read().unwrap().len()
    }
}
