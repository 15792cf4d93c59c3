use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{assistant::CreativeAssistant, tools::to_mcp_error};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteCampaignRequest {
    #[schemars(description = "Campaign id")]
    pub id: String,
}

pub async fn delete_campaign(
    assistant: &CreativeAssistant,
    Parameters(request): Parameters<DeleteCampaignRequest>,
) -> Result<CallToolResult, McpError> {
    let removed = assistant.delete(request.id.trim()).await.map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(format!(
        "Deleted campaign {} ({}).",
        removed.id,
        removed.display_title()
    ))]))
}
