use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    assistant::CreativeAssistant,
    form::FormState,
    models::{Length, Platform, Tone},
    tools::{outcome_result, reference::attach_reference, to_mcp_error},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCampaignRequest {
    #[schemars(description = "Campaign name, defaults to \"New Campaign\"")]
    pub campaign_title: Option<String>,
    #[schemars(description = "Key message topic of the copy")]
    pub copy_topic: Option<String>,
    #[schemars(description = "Visual concept for the artwork; at least one of copy_topic and visual_concept is required")]
    pub visual_concept: Option<String>,
    #[schemars(description = "Twitter/X, Facebook, Instagram, TikTok, Reddit or Discord. Default Facebook")]
    pub platform: Option<String>,
    #[schemars(description = "Copy length in sentences, 1-6. Default 3")]
    pub length: Option<u8>,
    #[schemars(description = "Tones: Entertaining, Fun, Warm, Playful, Witty, Casual, Urgent, Inspirational. Default [Fun]")]
    pub tones: Option<Vec<String>>,
    #[schemars(description = "Whether to render artwork. Default true")]
    pub include_image: Option<bool>,
    #[schemars(description = "http(s) URL of a composition reference image")]
    pub reference_image_url: Option<String>,
    #[schemars(description = "Local path of a composition reference image")]
    pub reference_image_path: Option<String>,
}

impl CreateCampaignRequest {
    fn to_form(&self) -> Result<FormState, McpError> {
        let mut form = FormState::default();
        form.campaign_title = self.campaign_title.clone().unwrap_or_default();
        form.copy_topic = self.copy_topic.clone().unwrap_or_default();
        form.visual_concept = self.visual_concept.clone().unwrap_or_default();
        if let Some(platform) = self.platform.as_deref() {
            form.platform = platform.parse::<Platform>().map_err(to_mcp_error)?;
        }
        if let Some(length) = self.length {
            form.length = Length::from_sentences(length)
                .ok_or_else(|| McpError::invalid_params("length must be between 1 and 6", None))?;
        }
        if let Some(tones) = self.tones.as_ref() {
            let tones = tones
                .iter()
                .map(|tone| tone.parse::<Tone>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(to_mcp_error)?;
            form.set_tones(tones).map_err(to_mcp_error)?;
        }
        if let Some(include_image) = self.include_image {
            form.include_image = include_image;
        }
        Ok(form)
    }
}

pub async fn create_campaign(
    assistant: &CreativeAssistant,
    Parameters(request): Parameters<CreateCampaignRequest>,
) -> Result<CallToolResult, McpError> {
    let mut form = request.to_form()?;
    attach_reference(
        &mut form,
        request.reference_image_url.as_deref(),
        request.reference_image_path.as_deref(),
    )
    .await?;
    if request.include_image == Some(false) {
        form.include_image = false;
    }
    let outcome = assistant.generate_with(&form).await.map_err(to_mcp_error)?;
    outcome_result(&outcome)
}
