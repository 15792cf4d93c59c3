use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::DesignBrief;
use crate::prompts::{self, Refinement};
use crate::provider::{CampaignProvider, CopyDraft, CopyParams, ImageParams, InlineImage};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_COPY_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const IMAGE_ASPECT_RATIO: &str = "1:1";
const COPY_TEMPERATURE: f64 = 0.7;

async fn assert_ok_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "Gemini request rejected");
    Err(anyhow!("Gemini request failed: {status} {text}"))
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CopyPayload {
    social_copy: Option<String>,
    asana_brief: Option<DesignBrief>,
}

impl GenerateContentResponse {
    fn into_parts(self) -> Result<Vec<Part>> {
        if let Some(message) = self.error.and_then(|err| err.message) {
            return Err(anyhow!("Gemini returned an error: {message}"));
        }
        Ok(self
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .unwrap_or_default())
    }
}

fn copy_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "socialCopy": { "type": "STRING" },
            "asanaBrief": {
                "type": "OBJECT",
                "properties": {
                    "description": { "type": "STRING" },
                    "lookAndFeel": { "type": "STRING" },
                    "messagingHierarchy": { "type": "STRING" }
                },
                "required": ["description", "lookAndFeel", "messagingHierarchy"]
            }
        },
        "required": ["socialCopy", "asanaBrief"]
    })
}

fn build_copy_body(params: &CopyParams) -> Value {
    let refinement = match (params.refinement.as_deref(), params.previous_content.as_deref()) {
        (Some(instruction), Some(previous_content)) => Some(Refinement {
            instruction,
            previous_content,
        }),
        _ => None,
    };
    let system = prompts::copy_system_instruction(&params.copy_topic, params.length, refinement);
    let user = prompts::copy_user_content(
        params.platform,
        &params.copy_topic,
        &params.visual_concept,
        params.refinement.as_deref(),
    );
    json!({
        "systemInstruction": { "parts": [{ "text": system }] },
        "contents": [{ "role": "user", "parts": [{ "text": user }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": copy_response_schema(),
            "temperature": COPY_TEMPERATURE
        }
    })
}

fn build_image_body(params: &ImageParams) -> Value {
    let prompt = prompts::image_prompt(&params.visual_concept, params.reference.is_some());
    let mut parts = Vec::new();
    if let Some(reference) = params.reference.as_ref() {
        parts.push(json!({
            "inlineData": { "mimeType": reference.mime_type, "data": reference.data }
        }));
    }
    parts.push(json!({ "text": prompt }));
    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": { "aspectRatio": IMAGE_ASPECT_RATIO }
        }
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_copy_response(payload: GenerateContentResponse) -> Result<CopyDraft> {
    let text: String = payload
        .into_parts()?
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        return Err(anyhow!("Gemini returned no copy"));
    }
    let parsed: CopyPayload = serde_json::from_str(strip_code_fence(&text))
        .with_context(|| format!("copy response is not the expected JSON: {text}"))?;
    let social_copy = parsed
        .social_copy
        .map(|copy| copy.trim().to_string())
        .filter(|copy| !copy.is_empty())
        .ok_or_else(|| anyhow!("copy response has no socialCopy"))?;
    Ok(CopyDraft {
        social_copy,
        brief: parsed.asana_brief,
    })
}

fn extract_image(payload: GenerateContentResponse) -> Result<Option<InlineImage>> {
    let image = payload.into_parts()?.into_iter().find_map(|part| {
        let inline = part.inline_data?;
        let data = inline.data.filter(|data| !data.is_empty())?;
        Some(InlineImage {
            mime_type: inline.mime_type.unwrap_or_else(|| "image/png".to_string()),
            data,
        })
    });
    Ok(image)
}

/// Gemini REST client for both campaign calls.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    copy_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        api_base: &str,
        copy_model: String,
        image_model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            copy_model,
            image_model,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base)
    }

    async fn generate_content(&self, model: &str, body: &Value) -> Result<GenerateContentResponse> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("missing GEMINI_API_KEY"));
        }
        tracing::debug!(%model, "calling Gemini generateContent");
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        let response = assert_ok_response(response).await?;
        let payload = response.json::<GenerateContentResponse>().await?;
        Ok(payload)
    }
}

#[async_trait]
impl CampaignProvider for GeminiClient {
    async fn generate_copy(&self, params: CopyParams) -> Result<CopyDraft> {
        let body = build_copy_body(&params);
        let payload = self.generate_content(&self.copy_model, &body).await?;
        parse_copy_response(payload)
    }

    async fn generate_image(&self, params: ImageParams) -> Result<Option<InlineImage>> {
        let body = build_image_body(&params);
        let payload = self.generate_content(&self.image_model, &body).await?;
        extract_image(payload)
    }
}
