use anyhow::{Context, Result};

use crate::cache::LocalFileStorage;
use crate::models::GeneratedResult;

/// Single storage slot that holds the whole serialized history list.
pub const HISTORY_SLOT: &str = "socialMuseHistory.json";

/// Newest-first list of generated campaigns, mirrored to [`HISTORY_SLOT`] on every change.
#[derive(Debug)]
pub struct HistoryStore {
    storage: LocalFileStorage,
    entries: Vec<GeneratedResult>,
}

impl HistoryStore {
    /// Reads the slot once. A missing or unreadable list starts an empty history.
    pub async fn load(storage: LocalFileStorage) -> Result<Self> {
        let entries = match storage.get(HISTORY_SLOT).await? {
            Some(bytes) => match serde_json::from_slice::<Vec<GeneratedResult>>(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(error = %err, slot = HISTORY_SLOT, "history slot is not valid, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        tracing::info!(count = entries.len(), "loaded campaign history");
        Ok(Self { storage, entries })
    }

    pub fn all(&self) -> &[GeneratedResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedResult> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Case-insensitive match on campaign title or copy. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<GeneratedResult> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.request.campaign_title.to_lowercase().contains(&needle)
                    || entry.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub async fn prepend(&mut self, result: GeneratedResult) -> Result<()> {
        self.entries.insert(0, result);
        if let Err(err) = self.persist().await {
            self.entries.remove(0);
            return Err(err);
        }
        Ok(())
    }

    /// Removes the record with `id`. Returns `None` when no such record exists.
    pub async fn delete(&mut self, id: &str) -> Result<Option<GeneratedResult>> {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return Ok(None);
        };
        let removed = self.entries.remove(index);
        if let Err(err) = self.persist().await {
            self.entries.insert(index, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    async fn persist(&self) -> Result<()> {
        let payload = serde_json::to_vec(&self.entries).context("serialize history")?;
        self.storage
            .put(HISTORY_SLOT, &payload)
            .await
            .context("write history slot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DesignBrief, GenerationRequest, Length, Platform, Tone};

    fn record(id: &str, title: &str, content: &str) -> GeneratedResult {
        GeneratedResult {
            id: id.to_string(),
            content: content.to_string(),
            brief: Some(DesignBrief {
                description: format!("{title} description"),
                look_and_feel: "blue cube, gold coins".to_string(),
                messaging_hierarchy: "1. Gift 2. Cube 3. Logo".to_string(),
            }),
            image_url: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            request: GenerationRequest {
                campaign_title: title.to_string(),
                visual_concept: "gift box".to_string(),
                copy_topic: "holiday gift".to_string(),
                platform: Platform::Instagram,
                length: Length::Four,
                tone: vec![Tone::Warm, Tone::Urgent],
            },
            timestamp: 1_734_000_000_000,
        }
    }

    async fn store(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::load(LocalFileStorage::new(dir.path().to_path_buf()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reload_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = store(&dir).await;
        history.prepend(record("a", "Spring", "Bloom?")).await.unwrap();
        let mut bare = record("b", "Summer", "Sun?");
        bare.brief = None;
        bare.image_url = None;
        history.prepend(bare).await.unwrap();

        let reloaded = store(&dir).await;
        assert_eq!(reloaded.all(), history.all());
        assert_eq!(reloaded.all()[0].id, "b");
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = store(&dir).await;
        for id in ["a", "b", "c"] {
            history.prepend(record(id, id, "copy")).await.unwrap();
        }
        let removed = history.delete("b").await.unwrap();
        assert_eq!(removed.map(|entry| entry.id), Some("b".to_string()));
        let ids: Vec<_> = history.all().iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
        assert!(history.delete("missing").await.unwrap().is_none());
        assert_eq!(store(&dir).await.len(), 2);
    }

    #[tokio::test]
    async fn corrupt_slot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HISTORY_SLOT), b"{not json").unwrap();
        let history = store(&dir).await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn search_matches_title_or_content_ignoring_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = store(&dir).await;
        history.prepend(record("a", "Winter Sale", "Cozy rewards?")).await.unwrap();
        history.prepend(record("b", "Daily Puzzle", "Solve the WINTER riddle?")).await.unwrap();
        history.prepend(record("c", "Gift Drop", "Unwrap prizes?")).await.unwrap();

        let ids = |query: &str| {
            history
                .search(query)
                .into_iter()
                .map(|entry| entry.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("winter"), ["b", "a"]);
        assert_eq!(ids("GIFT"), ["c"]);
        assert_eq!(ids(" drop"), ["c"]);
        assert!(ids(" gift").is_empty());
        assert_eq!(ids(""), ["c", "b", "a"]);
        assert!(ids("casino").is_empty());
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_in_step_with_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = store(&dir).await;
        history.prepend(record("a", "Spring", "Bloom?")).await.unwrap();

        std::fs::create_dir(dir.path().join("socialMuseHistory.tmp")).unwrap();
        assert!(history.delete("a").await.is_err());
        assert_eq!(history.get("a").map(|entry| entry.id.as_str()), Some("a"));
        assert!(history.prepend(record("b", "Summer", "Sun?")).await.is_err());
        assert!(history.get("b").is_none());

        std::fs::remove_dir(dir.path().join("socialMuseHistory.tmp")).unwrap();
        let on_disk = store(&dir).await;
        assert_eq!(on_disk.all(), history.all());
    }
}
