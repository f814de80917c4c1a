// JSON-file repository: one `<root>/<kind>/<id>.json` file per record

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{sort_newest_first, FieldFilter, Record, Repository};

pub struct JsonFileRepository<T: Record> {
    dir: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileRepository<T> {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(T::KIND),
            _record: PhantomData,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid {} id '{}'", T::KIND, id);
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl<T: Record> Repository<T> for JsonFileRepository<T> {
    async fn get(&self, id: &str) -> Result<Option<T>> {
        let path = self.path_for(id)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(record))
    }

    async fn put(&self, record: &T) -> Result<()> {
        let path = self.path_for(record.id())?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(record)
            .with_context(|| format!("Failed to serialize {} {}", T::KIND, record.id()))?;

        // Write-then-rename so readers never see a half-written record
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to move {} into place", path.display()))?;

        debug!(kind = T::KIND, id = record.id(), "Stored record");
        Ok(())
    }

    async fn scan_by_field(&self, filters: &[FieldFilter]) -> Result<Vec<T>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to list {}", self.dir.display()))
            }
        };

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping unreadable {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<T>(&contents) {
                Ok(record) if record.matches(filters) => found.push(record),
                Ok(_) => {}
                Err(e) => warn!("Skipping invalid {} record {}: {}", T::KIND, path.display(), e),
            }
        }

        sort_newest_first(&mut found);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coaching::ModuleType;
    use crate::engine::Conversation;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_and_missing() {
        let dir = TempDir::new().unwrap();
        let repo: JsonFileRepository<Conversation> = JsonFileRepository::new(dir.path());

        assert!(repo.get("conv_missing").await.unwrap().is_none());

        let conv = Conversation::new(ModuleType::Solution, "p1");
        repo.put(&conv).await.unwrap();
        assert_eq!(repo.get(&conv.id).await.unwrap(), Some(conv.clone()));
        assert!(repo.dir().join(format!("{}.json", conv.id)).exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = TempDir::new().unwrap();
        let repo: JsonFileRepository<Conversation> = JsonFileRepository::new(dir.path());
        assert!(repo.get("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_scan_skips_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let repo: JsonFileRepository<Conversation> = JsonFileRepository::new(dir.path());

        let conv = Conversation::new(ModuleType::Story, "p1");
        repo.put(&conv).await.unwrap();
        std::fs::write(repo.dir().join("broken.json"), "{not json").unwrap();

        let found = repo.scan_by_field(&[FieldFilter::project("p1")]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, conv.id);
    }

    #[tokio::test]
    async fn test_scan_of_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo: JsonFileRepository<Conversation> =
            JsonFileRepository::new(dir.path().join("nothing-here"));
        assert!(repo.scan_by_field(&[]).await.unwrap().is_empty());
    }
}
