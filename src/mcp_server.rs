use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::assistant::CreativeAssistant;
use crate::tools::{
    CreateCampaignRequest, DeleteCampaignRequest, GetCampaignRequest, ListCampaignsRequest,
    TweakCampaignRequest,
};

#[derive(Clone)]
pub struct CampaignServer {
    tool_router: ToolRouter<Self>,
    assistant: Arc<CreativeAssistant>,
}

impl CampaignServer {
    pub fn new(assistant: Arc<CreativeAssistant>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            assistant,
        }
    }
}

#[tool_router]
impl CampaignServer {
    #[tool(
        description = "Create a social campaign: copy, designer brief and artwork. Tell the user this can take a while. Needs copy_topic or visual_concept."
    )]
    async fn create_campaign(
        &self,
        Parameters(request): Parameters<CreateCampaignRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::create_campaign(&self.assistant, Parameters(request)).await
    }

    #[tool(
        description = "Refine an existing campaign with a free-text instruction. The artwork is only re-rendered when the instruction mentions the image or look."
    )]
    async fn tweak_campaign(
        &self,
        Parameters(request): Parameters<TweakCampaignRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::tweak_campaign(&self.assistant, Parameters(request)).await
    }

    #[tool(description = "List stored campaigns, newest first, optionally filtered by a search query")]
    async fn list_campaigns(
        &self,
        Parameters(request): Parameters<ListCampaignsRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::list_campaigns(&self.assistant, Parameters(request)).await
    }

    #[tool(description = "Show one stored campaign with its artwork")]
    async fn get_campaign(
        &self,
        Parameters(request): Parameters<GetCampaignRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::get_campaign(&self.assistant, Parameters(request)).await
    }

    #[tool(description = "Delete one stored campaign")]
    async fn delete_campaign(
        &self,
        Parameters(request): Parameters<DeleteCampaignRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::delete_campaign(&self.assistant, Parameters(request)).await
    }
}

#[tool_handler]
impl ServerHandler for CampaignServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
