// In-memory repository backed by DashMap

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::{sort_newest_first, FieldFilter, Record, Repository};

pub struct MemoryRepository<T: Record> {
    records: DashMap<String, T>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, record: &T) -> Result<()> {
        self.records.insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn scan_by_field(&self, filters: &[FieldFilter]) -> Result<Vec<T>> {
        let mut found: Vec<T> = self
            .records
            .iter()
            .filter(|entry| entry.value().matches(filters))
            .map(|entry| entry.value().clone())
            .collect();
        sort_newest_first(&mut found);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coaching::ModuleType;
    use crate::engine::Conversation;
    use chrono::Duration;

    #[tokio::test]
    async fn test_put_overwrites_whole_record() {
        let repo = MemoryRepository::new();
        let mut conv = Conversation::new(ModuleType::Story, "p1");
        repo.put(&conv).await.unwrap();

        conv.completed = true;
        repo.put(&conv).await.unwrap();

        assert_eq!(repo.len(), 1);
        let stored = repo.get(&conv.id).await.unwrap().unwrap();
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn test_scan_filters_and_orders_newest_first() {
        let repo = MemoryRepository::new();

        let mut older = Conversation::new(ModuleType::Story, "p1");
        older.updated_at = older.updated_at - Duration::minutes(5);
        let newer = Conversation::new(ModuleType::Story, "p1");
        let other_module = Conversation::new(ModuleType::Success, "p1");
        let other_project = Conversation::new(ModuleType::Story, "p2");

        for c in [&older, &newer, &other_module, &other_project] {
            repo.put(c).await.unwrap();
        }

        let found = repo
            .scan_by_field(&[FieldFilter::project("p1"), FieldFilter::module(ModuleType::Story)])
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);

        assert_eq!(repo.scan_by_field(&[]).await.unwrap().len(), 4);
    }
}
