use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use assert_matches::assert_matches;
use async_trait::async_trait;

use social_muse::{
    CreativeAssistant, MuseError,
    cache::{HistoryStore, LocalFileStorage},
    form::FormUpdate,
    models::{DesignBrief, Length, Platform, Tone},
    provider::{CampaignProvider, CopyDraft, CopyParams, ImageParams, InlineImage},
};

#[derive(Default)]
struct CountingProvider {
    copy_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

#[async_trait]
impl CampaignProvider for CountingProvider {
    async fn generate_copy(&self, params: CopyParams) -> Result<CopyDraft> {
        let call = self.copy_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CopyDraft {
            social_copy: format!("Copy #{call} about {}", params.copy_topic),
            brief: Some(DesignBrief {
                description: "Hero shot".to_string(),
                look_and_feel: "Glossy".to_string(),
                messaging_hierarchy: "Headline, CTA".to_string(),
            }),
        })
    }

    async fn generate_image(&self, _params: ImageParams) -> Result<Option<InlineImage>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(InlineImage {
            mime_type: "image/png".to_string(),
            data: "UE5H".to_string(),
        }))
    }
}

async fn open(dir: &tempfile::TempDir, provider: Arc<CountingProvider>) -> CreativeAssistant {
    let history = HistoryStore::load(LocalFileStorage::new(dir.path().to_path_buf()))
        .await
        .unwrap();
    CreativeAssistant::new(provider, history)
}

fn fill(topic: &str) -> FormUpdate {
    FormUpdate {
        campaign_title: Some(format!("{topic} campaign")),
        platform: Some(Platform::Instagram),
        length: Some(Length::Two),
        tones: Some(vec![Tone::Witty, Tone::Urgent]),
        visual_concept: Some("coins raining on a trophy".to_string()),
        copy_topic: Some(topic.to_string()),
        ..FormUpdate::default()
    }
}

#[tokio::test]
async fn blank_submission_is_rejected_without_provider_calls() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(CountingProvider::default());
    let assistant = open(&dir, provider.clone()).await;

    assistant
        .update_form(FormUpdate {
            copy_topic: Some("   ".to_string()),
            visual_concept: Some(String::new()),
            ..FormUpdate::default()
        })
        .await
        .unwrap();
    assert_matches!(assistant.generate().await, Err(MuseError::Validation(_)));
    assert_eq!(provider.copy_calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.image_calls.load(Ordering::SeqCst), 0);
    assert_eq!(assistant.history_len().await, 0);
}

#[tokio::test]
async fn generation_prepends_one_record_and_clears_refinement() {
    let dir = tempfile::tempdir().unwrap();
    let assistant = open(&dir, Arc::new(CountingProvider::default())).await;

    assistant.update_form(fill("spring drop")).await.unwrap();
    let first = assistant.generate().await.unwrap().result;
    assistant.update_form(fill("summer drop")).await.unwrap();
    let second = assistant.generate().await.unwrap().result;
    assert_eq!(assistant.history_len().await, 2);
    assert_eq!(assistant.search("").await[0].id, second.id);

    let view = assistant.tweak(&first.id).await.unwrap();
    assert_eq!(view.refining.as_ref().map(|r| r.id.as_str()), Some(first.id.as_str()));
    assistant
        .update_form(FormUpdate {
            refinement: Some("shorter please".to_string()),
            ..FormUpdate::default()
        })
        .await
        .unwrap();
    let refined = assistant.generate().await.unwrap().result;

    let history = assistant.search("").await;
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, refined.id);
    let view = assistant.form().await;
    assert!(view.refining.is_none());
    assert!(view.refinement.is_empty());
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let assistant = open(&dir, Arc::new(CountingProvider::default())).await;

    let mut ids = Vec::new();
    for topic in ["one", "two", "three"] {
        assistant.update_form(fill(topic)).await.unwrap();
        ids.push(assistant.generate().await.unwrap().result.id);
    }
    let removed = assistant.delete(&ids[1]).await.unwrap();
    assert_eq!(removed.id, ids[1]);

    let remaining: Vec<String> = assistant.search("").await.into_iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![ids[2].clone(), ids[0].clone()]);
    assert_matches!(assistant.delete(&ids[1]).await, Err(MuseError::NotFound(_)));
}

#[tokio::test]
async fn history_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let before = {
        let assistant = open(&dir, Arc::new(CountingProvider::default())).await;
        assistant.update_form(fill("loyalty week")).await.unwrap();
        assistant.generate().await.unwrap();
        assistant.update_form(fill("flash sale")).await.unwrap();
        assistant.generate().await.unwrap();
        assistant.search("").await
    };

    let reopened = open(&dir, Arc::new(CountingProvider::default())).await;
    let after = reopened.search("").await;
    assert_eq!(after, before);
    assert_eq!(after[0].request.platform, Platform::Instagram);
    assert_eq!(after[0].request.tone, vec![Tone::Witty, Tone::Urgent]);
    assert_eq!(after[0].image_url.as_deref(), Some("data:image/png;base64,UE5H"));
}

#[tokio::test]
async fn tweak_repopulates_form_without_new_history() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(CountingProvider::default());
    let assistant = open(&dir, provider.clone()).await;

    assistant.update_form(fill("referral bonus")).await.unwrap();
    let original = assistant.generate().await.unwrap().result;

    assistant
        .update_form(FormUpdate {
            campaign_title: Some("Something else".to_string()),
            platform: Some(Platform::Reddit),
            copy_topic: Some("unrelated".to_string()),
            ..FormUpdate::default()
        })
        .await
        .unwrap();

    let view = assistant.tweak(&original.id).await.unwrap();
    assert_eq!(view.campaign_title, original.request.campaign_title);
    assert_eq!(view.platform, original.request.platform);
    assert_eq!(view.length, original.request.length);
    assert_eq!(view.tones, original.request.tone);
    assert_eq!(view.copy_topic, original.request.copy_topic);
    assert_eq!(view.visual_concept, original.request.visual_concept);
    assert_eq!(assistant.history_len().await, 1);
    assert_eq!(provider.copy_calls.load(Ordering::SeqCst), 1);

    assistant.generate().await.unwrap();
    assert_eq!(assistant.history_len().await, 2);
}
