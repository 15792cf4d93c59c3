use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    assistant::CreativeAssistant,
    tools::{record_result, to_mcp_error},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetCampaignRequest {
    #[schemars(description = "Campaign id")]
    pub id: String,
}

pub async fn get_campaign(
    assistant: &CreativeAssistant,
    Parameters(request): Parameters<GetCampaignRequest>,
) -> Result<CallToolResult, McpError> {
    let record = assistant.get(request.id.trim()).await.map_err(to_mcp_error)?;
    record_result(&record)
}
