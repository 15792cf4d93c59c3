use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{HistoryStore, get_extension_from_mime_type};
use crate::error::{MuseError, MuseResult};
use crate::form::{FormState, FormUpdate, FormView};
use crate::image_processing;
use crate::models::{CopyFragment, GeneratedResult, Tone};
use crate::orchestrator::{self, GenerationOutcome};
use crate::provider::CampaignProvider;

const DOWNLOAD_PREFIX: &str = "realprize";

/// Decoded artwork of a campaign, ready to be sent as a file.
#[derive(Debug, Clone)]
pub struct ImageDownload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The assistant as the outside world sees it: one shared form, one history,
/// one provider. No lock is held while the provider is working.
pub struct CreativeAssistant {
    provider: Arc<dyn CampaignProvider>,
    history: Mutex<HistoryStore>,
    form: Mutex<FormState>,
}

impl CreativeAssistant {
    pub fn new(provider: Arc<dyn CampaignProvider>, history: HistoryStore) -> Self {
        Self {
            provider,
            history: Mutex::new(history),
            form: Mutex::new(FormState::default()),
        }
    }

    pub async fn form(&self) -> FormView {
        self.form.lock().await.view()
    }

    pub async fn update_form(&self, update: FormUpdate) -> MuseResult<FormView> {
        let mut form = self.form.lock().await;
        form.apply(update)?;
        Ok(form.view())
    }

    pub async fn toggle_tone(&self, tone: Tone) -> FormView {
        let mut form = self.form.lock().await;
        if !form.toggle_tone(tone) {
            tracing::debug!(%tone, "refusing to deselect the last tone");
        }
        form.view()
    }

    pub async fn attach_reference(&self, bytes: Vec<u8>, declared_mime: Option<&str>) -> MuseResult<FormView> {
        let image = image_processing::reference_image_from_bytes(bytes, declared_mime)
            .map_err(|err| MuseError::InvalidReferenceImage(err.to_string()))?;
        let mut form = self.form.lock().await;
        form.set_reference_image(image);
        Ok(form.view())
    }

    pub async fn clear_reference(&self) -> FormView {
        let mut form = self.form.lock().await;
        form.clear_reference_image();
        form.view()
    }

    /// Seeds the shared form from a stored campaign. History is left untouched.
    pub async fn tweak(&self, id: &str) -> MuseResult<FormView> {
        let result = self.get(id).await?;
        let mut form = self.form.lock().await;
        form.begin_tweak(&result);
        tracing::info!(campaign_id = %id, "tweak session opened");
        Ok(form.view())
    }

    pub async fn cancel_refinement(&self) -> FormView {
        let mut form = self.form.lock().await;
        form.cancel_refinement();
        form.view()
    }

    /// Generates from the shared form and closes its tweak session on success.
    pub async fn generate(&self) -> MuseResult<GenerationOutcome> {
        let snapshot = self.form.lock().await.clone();
        let refined_id = snapshot.refining().map(|result| result.id.clone());
        let outcome = self.generate_with(&snapshot).await?;
        self.form.lock().await.finish_generation(refined_id.as_deref());
        Ok(outcome)
    }

    /// Generates from a caller-owned form and commits the result to history.
    pub async fn generate_with(&self, form: &FormState) -> MuseResult<GenerationOutcome> {
        let plan = form.plan()?;
        let outcome = orchestrator::generate(self.provider.as_ref(), plan).await?;
        self.history
            .lock()
            .await
            .prepend(outcome.result.clone())
            .await
            .map_err(MuseError::Storage)?;
        Ok(outcome)
    }

    pub async fn search(&self, query: &str) -> Vec<GeneratedResult> {
        self.history.lock().await.search(query)
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn get(&self, id: &str) -> MuseResult<GeneratedResult> {
        self.history
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MuseError::NotFound(id.to_string()))
    }

    pub async fn delete(&self, id: &str) -> MuseResult<GeneratedResult> {
        let removed = self
            .history
            .lock()
            .await
            .delete(id)
            .await
            .map_err(MuseError::Storage)?
            .ok_or_else(|| MuseError::NotFound(id.to_string()))?;
        tracing::info!(campaign_id = %id, "campaign deleted");
        Ok(removed)
    }

    pub async fn fragment(&self, id: &str, kind: CopyFragment) -> MuseResult<String> {
        let result = self.get(id).await?;
        result
            .fragment(kind)
            .map(str::to_string)
            .ok_or_else(|| MuseError::NotFound(format!("{id} has no design brief")))
    }

    pub async fn image_download(&self, id: &str) -> MuseResult<ImageDownload> {
        let result = self.get(id).await?;
        let data_url = result
            .image_url
            .ok_or_else(|| MuseError::NotFound(format!("{id} has no image")))?;
        let (mime_type, bytes) = image_processing::parse_data_url(&data_url).map_err(MuseError::Storage)?;
        let ext = get_extension_from_mime_type(&mime_type);
        let ext = if ext == "bin" { "png" } else { ext };
        Ok(ImageDownload {
            file_name: format!("{DOWNLOAD_PREFIX}-{id}.{ext}"),
            mime_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use assert_matches::assert_matches;

    use super::*;
    use crate::cache::LocalFileStorage;
    use crate::form::FormUpdate;
    use crate::orchestrator::tests::ScriptedProvider;

    async fn assistant(provider: Arc<ScriptedProvider>, dir: &tempfile::TempDir) -> CreativeAssistant {
        let history = HistoryStore::load(LocalFileStorage::new(dir.path().to_path_buf()))
            .await
            .unwrap();
        CreativeAssistant::new(provider, history)
    }

    fn topic(copy_topic: &str) -> FormUpdate {
        FormUpdate {
            copy_topic: Some(copy_topic.to_string()),
            visual_concept: Some("gold cube".to_string()),
            ..FormUpdate::default()
        }
    }

    #[tokio::test]
    async fn blank_form_never_reaches_provider() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(ScriptedProvider::default());
        let assistant = assistant(provider.clone(), &dir).await;
        assert_matches!(assistant.generate().await, Err(MuseError::Validation(_)));
        assert_eq!(provider.copy_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.image_calls.load(Ordering::SeqCst), 0);
        assert_eq!(assistant.history_len().await, 0);
    }

    #[tokio::test]
    async fn tweak_then_generate_closes_session_and_adds_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(ScriptedProvider::default());
        let assistant = assistant(provider, &dir).await;
        assistant.update_form(topic("weekly gift")).await.unwrap();
        let first = assistant.generate().await.unwrap().result;

        let view = assistant.tweak(&first.id).await.unwrap();
        assert_eq!(view.refining.map(|r| r.id), Some(first.id.clone()));
        assert_eq!(assistant.history_len().await, 1);

        assistant
            .update_form(FormUpdate {
                refinement: Some("shorter please".to_string()),
                ..FormUpdate::default()
            })
            .await
            .unwrap();
        let second = assistant.generate().await.unwrap();
        assert_eq!(second.result.image_url, first.image_url);
        assert_eq!(assistant.history_len().await, 2);
        let form = assistant.form().await;
        assert!(form.refining.is_none());
        assert_eq!(form.refinement, "");
        assert_eq!(assistant.search("").await[0].id, second.result.id);
    }

    #[tokio::test]
    async fn copy_failure_leaves_history_and_session_alone() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(ScriptedProvider {
            fail_copy: true,
            ..ScriptedProvider::default()
        });
        let assistant = assistant(provider, &dir).await;
        assistant.update_form(topic("gift")).await.unwrap();
        assert_matches!(assistant.generate().await, Err(MuseError::CopyGeneration(_)));
        assert_eq!(assistant.history_len().await, 0);
        assert_eq!(assistant.form().await.copy_topic, "gift");
    }

    #[tokio::test]
    async fn fragments_downloads_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = assistant(Arc::new(ScriptedProvider::default()), &dir).await;
        assistant.update_form(topic("gift")).await.unwrap();
        let id = assistant.generate().await.unwrap().result.id;

        let look = assistant.fragment(&id, CopyFragment::LookAndFeel).await.unwrap();
        assert_eq!(look, "Blue cube on gold coins");
        let download = assistant.image_download(&id).await.unwrap();
        assert_eq!(download.file_name, format!("realprize-{id}.png"));
        assert_eq!(download.bytes, b"NEW".to_vec());

        assistant.delete(&id).await.unwrap();
        assert_matches!(assistant.get(&id).await, Err(MuseError::NotFound(_)));
        assert_matches!(assistant.delete(&id).await, Err(MuseError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_non_image_reference() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = assistant(Arc::new(ScriptedProvider::default()), &dir).await;
        let err = assistant
            .attach_reference(b"plain text".to_vec(), Some("text/plain"))
            .await
            .unwrap_err();
        assert_matches!(err, MuseError::InvalidReferenceImage(_));
        assert!(assistant.form().await.reference_image.is_none());
    }

    #[tokio::test]
    async fn concurrent_generations_both_land_in_history() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = Arc::new(assistant(Arc::new(ScriptedProvider::default()), &dir).await);
        assistant.update_form(topic("race")).await.unwrap();
        let (a, b) = tokio::join!(assistant.generate(), assistant.generate());
        let (a, b) = (a.unwrap().result.id, b.unwrap().result.id);
        assert_ne!(a, b);
        let ids: Vec<_> = assistant.search("").await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }
}
