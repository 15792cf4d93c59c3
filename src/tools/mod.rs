pub mod create_campaign;
pub mod delete_campaign;
pub mod get_campaign;
pub mod list_campaigns;
pub mod reference;
pub mod tweak_campaign;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::{
    error::MuseError,
    image_processing,
    models::{DesignBrief, GeneratedResult},
    orchestrator::{GenerationOutcome, ImageOutcome},
};

/// Text half of every campaign tool answer; the artwork travels as an image content.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: String,
    pub title: String,
    pub platform: String,
    pub length: String,
    pub tones: String,
    pub content: String,
    pub brief: Option<DesignBrief>,
    pub has_image: bool,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CampaignResponse {
    fn from_record(record: &GeneratedResult) -> Self {
        Self {
            id: record.id.clone(),
            title: record.display_title().to_string(),
            platform: record.request.platform.to_string(),
            length: record.request.length.to_string(),
            tones: record.tone_display(),
            content: record.content.clone(),
            brief: record.brief.clone(),
            has_image: record.has_image(),
            timestamp: record.timestamp,
            image: None,
            notice: None,
        }
    }
}

pub(crate) fn to_mcp_error(err: MuseError) -> McpError {
    let data = Some(serde_json::Value::String(err.to_string()));
    match err {
        MuseError::Validation(message) => McpError::invalid_params(message, None),
        MuseError::NotFound(_) => McpError::invalid_params("campaign not found", data),
        MuseError::InvalidReferenceImage(_) => McpError::invalid_params("invalid reference image", data),
        MuseError::CopyGeneration(source) => McpError::internal_error(
            "AI generation failed. Please try again.",
            Some(serde_json::Value::String(format!("{source:#}"))),
        ),
        MuseError::Storage(_) | MuseError::Config(_) => McpError::internal_error("campaign storage failed", data),
    }
}

fn respond(response: CampaignResponse, image_url: Option<&str>) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(&response).map_err(|err| {
        McpError::internal_error(
            "serialize tool response failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    let mut contents = vec![Content::text(json)];
    if let Some(image_url) = image_url {
        match image_processing::parse_data_url(image_url) {
            Ok((mime_type, _)) => {
                let data = image_url.split_once(',').map(|(_, data)| data).unwrap_or_default();
                contents.push(Content::image(data.to_string(), mime_type));
            }
            Err(err) => tracing::warn!(error = %err, "stored image is not a valid data url"),
        }
    }
    Ok(CallToolResult::success(contents))
}

pub(crate) fn record_result(record: &GeneratedResult) -> Result<CallToolResult, McpError> {
    respond(CampaignResponse::from_record(record), record.image_url.as_deref())
}

pub(crate) fn outcome_result(outcome: &GenerationOutcome) -> Result<CallToolResult, McpError> {
    let mut response = CampaignResponse::from_record(&outcome.result);
    response.image = Some(outcome.image.clone());
    response.notice = outcome.notice().map(str::to_string);
    respond(response, outcome.result.image_url.as_deref())
}

pub use create_campaign::{CreateCampaignRequest, create_campaign};
pub use delete_campaign::{DeleteCampaignRequest, delete_campaign};
pub use get_campaign::{GetCampaignRequest, get_campaign};
pub use list_campaigns::{ListCampaignsRequest, list_campaigns};
pub use tweak_campaign::{TweakCampaignRequest, tweak_campaign};
