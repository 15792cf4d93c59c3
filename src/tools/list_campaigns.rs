use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars::JsonSchema,
};
use serde::{Deserialize, Serialize};

use crate::assistant::CreativeAssistant;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListCampaignsRequest {
    #[schemars(description = "Filter on campaign title or copy, case-insensitive")]
    pub query: Option<String>,
    #[schemars(description = "Maximum number of campaigns, default 10")]
    pub limit: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignSummary {
    id: String,
    title: String,
    platform: String,
    tones: String,
    content: String,
    has_image: bool,
    timestamp: i64,
}

pub async fn list_campaigns(
    assistant: &CreativeAssistant,
    Parameters(request): Parameters<ListCampaignsRequest>,
) -> Result<CallToolResult, McpError> {
    let limit = request.limit.unwrap_or(10).max(1) as usize;
    let summaries: Vec<CampaignSummary> = assistant
        .search(request.query.as_deref().unwrap_or(""))
        .await
        .into_iter()
        .take(limit)
        .map(|record| CampaignSummary {
            title: record.display_title().to_string(),
            platform: record.request.platform.to_string(),
            tones: record.tone_display(),
            has_image: record.has_image(),
            timestamp: record.timestamp,
            id: record.id,
            content: record.content,
        })
        .collect();
    let json = serde_json::to_string(&summaries).map_err(|err| {
        McpError::internal_error(
            "serialize campaign list failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
