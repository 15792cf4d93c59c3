use chrono::Utc;
use serde::Serialize;

use crate::cache::new_campaign_id;
use crate::error::{MuseError, MuseResult};
use crate::models::{GeneratedResult, GenerationRequest};
use crate::provider::{CampaignProvider, CopyParams, ImageParams, InlineImage};

/// Everything one generation needs, captured from the form at submit time.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub request: GenerationRequest,
    pub include_image: bool,
    pub reference: Option<InlineImage>,
    pub refinement: Option<RefinementPlan>,
}

#[derive(Debug, Clone)]
pub struct RefinementPlan {
    pub source_id: String,
    pub instruction: String,
    pub previous_content: String,
    pub previous_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ImageDecision {
    Generate,
    Reuse(Option<String>),
    Skip,
}

/// What happened to the image half of a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Generated,
    Reused,
    Skipped,
    /// The provider answered but returned no image.
    Empty,
    /// The image call failed; the campaign was kept without an image.
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub result: GeneratedResult,
    pub image: ImageOutcome,
}

impl GenerationOutcome {
    pub fn notice(&self) -> Option<&'static str> {
        match self.image {
            ImageOutcome::Failed { .. } => Some("Image generation failed; the campaign was saved without an image."),
            ImageOutcome::Empty => Some("The image model returned no image; the campaign was saved without one."),
            _ => None,
        }
    }
}

/// A tweak only re-renders when the instruction talks about the picture.
fn wants_new_image(instruction: &str) -> bool {
    let lowered = instruction.to_lowercase();
    lowered.contains("image") || lowered.contains("look")
}

fn decide_image(plan: &GenerationPlan) -> ImageDecision {
    let regenerate = plan
        .refinement
        .as_ref()
        .is_none_or(|refinement| wants_new_image(&refinement.instruction));
    let can_render = plan.include_image && !plan.request.visual_concept.trim().is_empty();
    match &plan.refinement {
        _ if can_render && regenerate => ImageDecision::Generate,
        Some(refinement) => ImageDecision::Reuse(refinement.previous_image.clone()),
        _ => ImageDecision::Skip,
    }
}

/// Runs the copy and image calls concurrently and assembles the new record.
/// Copy failure aborts the generation; image failure only drops the image.
pub async fn generate(provider: &dyn CampaignProvider, plan: GenerationPlan) -> MuseResult<GenerationOutcome> {
    let request = plan.request.clone();
    let refinement = plan.refinement.as_ref();
    let copy_params = CopyParams {
        copy_topic: request.copy_topic.clone(),
        visual_concept: request.visual_concept.clone(),
        platform: request.platform,
        length: request.length,
        tones: request.tone.clone(),
        refinement: refinement
            .map(|refinement| refinement.instruction.trim().to_string())
            .filter(|instruction| !instruction.is_empty()),
        previous_content: refinement.map(|refinement| refinement.previous_content.clone()),
    };
    let decision = decide_image(&plan);
    tracing::info!(
        title = %request.campaign_title,
        platform = %request.platform,
        refining = refinement.map(|r| r.source_id.as_str()),
        image = ?decision,
        "starting generation"
    );

    let image_task = async {
        let outcome = match decision {
            ImageDecision::Generate => {
                let params = ImageParams {
                    visual_concept: request.visual_concept.clone(),
                    platform: request.platform,
                    tones: request.tone.clone(),
                    reference: plan.reference.clone(),
                };
                match provider.generate_image(params).await {
                    Ok(Some(image)) => (Some(image.to_data_url()), ImageOutcome::Generated),
                    Ok(None) => (None, ImageOutcome::Empty),
                    Err(err) => {
                        tracing::warn!(error = %err, "image generation failed, keeping campaign without image");
                        (None, ImageOutcome::Failed { reason: err.to_string() })
                    }
                }
            }
            ImageDecision::Reuse(previous) => {
                let outcome = if previous.is_some() { ImageOutcome::Reused } else { ImageOutcome::Skipped };
                (previous, outcome)
            }
            ImageDecision::Skip => (None, ImageOutcome::Skipped),
        };
        Ok::<_, anyhow::Error>(outcome)
    };

    let (draft, (image_url, image)) = tokio::try_join!(provider.generate_copy(copy_params), image_task)
        .map_err(|err| {
            tracing::error!(error = %err, "copy generation failed");
            MuseError::CopyGeneration(err)
        })?;

    let result = GeneratedResult {
        id: new_campaign_id(&draft.social_copy),
        content: draft.social_copy,
        brief: draft.brief,
        image_url,
        request,
        timestamp: Utc::now().timestamp_millis(),
    };
    tracing::info!(campaign_id = %result.id, image = ?image, "generation finished");
    Ok(GenerationOutcome { result, image })
}
