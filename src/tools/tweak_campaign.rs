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
    tools::{outcome_result, to_mcp_error},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TweakCampaignRequest {
    #[schemars(description = "Id of the campaign to refine")]
    pub id: String,
    #[schemars(description = "What should change, e.g. \"make it shorter\". Mention the image or look to re-render the artwork")]
    pub instruction: String,
    #[schemars(description = "Whether new artwork may be rendered. The prior artwork is kept when none is rendered")]
    pub include_image: Option<bool>,
}

pub async fn tweak_campaign(
    assistant: &CreativeAssistant,
    Parameters(request): Parameters<TweakCampaignRequest>,
) -> Result<CallToolResult, McpError> {
    let original = assistant.get(request.id.trim()).await.map_err(to_mcp_error)?;
    let mut form = FormState::default();
    form.begin_tweak(&original);
    form.set_refinement(request.instruction);
    if let Some(include_image) = request.include_image {
        form.include_image = include_image;
    }
    let outcome = assistant.generate_with(&form).await.map_err(to_mcp_error)?;
    outcome_result(&outcome)
}
