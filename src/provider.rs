use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DesignBrief, Length, Platform, Tone};

#[derive(Debug, Clone)]
pub struct CopyParams {
    pub copy_topic: String,
    pub visual_concept: String,
    pub platform: Platform,
    pub length: Length,
    pub tones: Vec<Tone>,
    pub refinement: Option<String>,
    pub previous_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyDraft {
    pub social_copy: String,
    pub brief: Option<DesignBrief>,
}

#[derive(Debug, Clone)]
pub struct ImageParams {
    pub visual_concept: String,
    pub platform: Platform,
    pub tones: Vec<Tone>,
    pub reference: Option<InlineImage>,
}

/// Base64 payload plus media type, the shape the provider exchanges images in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Hosted model that writes campaign copy and renders campaign art.
#[async_trait]
pub trait CampaignProvider: Send + Sync {
    async fn generate_copy(&self, params: CopyParams) -> Result<CopyDraft>;

    /// `Ok(None)` when the provider answered without an image.
    async fn generate_image(&self, params: ImageParams) -> Result<Option<InlineImage>>;
}
