use serde::{Deserialize, Serialize};

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{MuseError, MuseResult};
use crate::models::{GeneratedResult, GenerationRequest, Length, Platform, ReferenceImage, Tone};
use crate::orchestrator::{GenerationPlan, RefinementPlan};
use crate::provider::InlineImage;

pub const DEFAULT_CAMPAIGN_TITLE: &str = "New Campaign";

/// Campaign parameters being composed, plus the tweak session if one is open.
#[derive(Debug, Clone)]
pub struct FormState {
    pub campaign_title: String,
    pub platform: Platform,
    pub length: Length,
    pub visual_concept: String,
    pub copy_topic: String,
    pub include_image: bool,
    tones: Vec<Tone>,
    reference_image: Option<ReferenceImage>,
    refining: Option<GeneratedResult>,
    refinement_text: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            campaign_title: String::new(),
            platform: Platform::default(),
            length: Length::default(),
            visual_concept: String::new(),
            copy_topic: String::new(),
            include_image: true,
            tones: vec![Tone::Fun],
            reference_image: None,
            refining: None,
            refinement_text: String::new(),
        }
    }
}

impl FormState {
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Flips `tone` in the selection. The last selected tone cannot be removed;
    /// returns whether the selection changed.
    pub fn toggle_tone(&mut self, tone: Tone) -> bool {
        if let Some(index) = self.tones.iter().position(|selected| *selected == tone) {
            if self.tones.len() == 1 {
                return false;
            }
            self.tones.remove(index);
        } else {
            self.tones.push(tone);
        }
        true
    }

    pub fn set_tones(&mut self, tones: Vec<Tone>) -> MuseResult<()> {
        let mut unique = Vec::with_capacity(tones.len());
        for tone in tones {
            if !unique.contains(&tone) {
                unique.push(tone);
            }
        }
        if unique.is_empty() {
            return Err(MuseError::Validation("select at least one tone".to_string()));
        }
        self.tones = unique;
        Ok(())
    }

    pub fn reference_image(&self) -> Option<&ReferenceImage> {
        self.reference_image.as_ref()
    }

    pub fn set_reference_image(&mut self, image: ReferenceImage) {
        self.reference_image = Some(image);
        self.include_image = true;
    }

    pub fn clear_reference_image(&mut self) {
        self.reference_image = None;
    }

    pub fn refining(&self) -> Option<&GeneratedResult> {
        self.refining.as_ref()
    }

    pub fn refinement_text(&self) -> &str {
        &self.refinement_text
    }

    pub fn set_refinement(&mut self, text: impl Into<String>) {
        self.refinement_text = text.into();
    }

    /// Seeds the form from `result` and opens a tweak session on it.
    pub fn begin_tweak(&mut self, result: &GeneratedResult) {
        let request = &result.request;
        self.campaign_title = request.campaign_title.clone();
        self.platform = request.platform;
        self.length = request.length;
        if self.set_tones(request.tone.clone()).is_err() {
            self.tones = vec![Tone::Fun];
        }
        self.visual_concept = request.visual_concept.clone();
        self.copy_topic = request.copy_topic.clone();
        self.include_image = result.has_image();
        self.refinement_text.clear();
        self.refining = Some(result.clone());
    }

    pub fn cancel_refinement(&mut self) {
        self.refining = None;
    }

    /// Closes the tweak session after a successful generation, unless the user
    /// already moved on to a different record meanwhile.
    pub fn finish_generation(&mut self, refined_id: Option<&str>) {
        let current = self.refining.as_ref().map(|result| result.id.as_str());
        if current == refined_id {
            self.refining = None;
            self.refinement_text.clear();
        }
    }

    pub fn plan(&self) -> MuseResult<GenerationPlan> {
        if self.copy_topic.trim().is_empty() && self.visual_concept.trim().is_empty() && self.refining.is_none() {
            return Err(MuseError::missing_content());
        }
        if self.tones.is_empty() {
            return Err(MuseError::Validation("select at least one tone".to_string()));
        }
        let campaign_title = if self.campaign_title.trim().is_empty() {
            DEFAULT_CAMPAIGN_TITLE.to_string()
        } else {
            self.campaign_title.clone()
        };
        let reference = self.reference_image.as_ref().map(|image| InlineImage {
            mime_type: image.mime_type.clone(),
            data: STANDARD.encode(&image.bytes),
        });
        let refinement = self.refining.as_ref().map(|result| RefinementPlan {
            source_id: result.id.clone(),
            instruction: self.refinement_text.clone(),
            previous_content: result.content.clone(),
            previous_image: result.image_url.clone(),
        });
        Ok(GenerationPlan {
            request: GenerationRequest {
                campaign_title,
                visual_concept: self.visual_concept.clone(),
                copy_topic: self.copy_topic.clone(),
                platform: self.platform,
                length: self.length,
                tone: self.tones.clone(),
            },
            include_image: self.include_image,
            reference,
            refinement,
        })
    }

    pub fn apply(&mut self, update: FormUpdate) -> MuseResult<()> {
        if let Some(tones) = update.tones {
            self.set_tones(tones)?;
        }
        if let Some(title) = update.campaign_title {
            self.campaign_title = title;
        }
        if let Some(platform) = update.platform {
            self.platform = platform;
        }
        if let Some(length) = update.length {
            self.length = length;
        }
        if let Some(visual_concept) = update.visual_concept {
            self.visual_concept = visual_concept;
        }
        if let Some(copy_topic) = update.copy_topic {
            self.copy_topic = copy_topic;
        }
        if let Some(include_image) = update.include_image {
            self.include_image = include_image;
        }
        if let Some(refinement) = update.refinement {
            self.refinement_text = refinement;
        }
        Ok(())
    }

    pub fn view(&self) -> FormView {
        FormView {
            campaign_title: self.campaign_title.clone(),
            platform: self.platform,
            length: self.length,
            tones: self.tones.clone(),
            visual_concept: self.visual_concept.clone(),
            copy_topic: self.copy_topic.clone(),
            include_image: self.include_image,
            reference_image: self.reference_image.as_ref().map(|image| ReferenceView {
                mime_type: image.mime_type.clone(),
                size: image.bytes.len(),
                preview: image.preview.clone(),
            }),
            refining: self.refining.as_ref().map(|result| RefiningView {
                id: result.id.clone(),
                title: result.display_title().to_string(),
            }),
            refinement: self.refinement_text.clone(),
        }
    }
}

/// Partial update of the form; absent fields are left as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUpdate {
    pub campaign_title: Option<String>,
    pub platform: Option<Platform>,
    pub length: Option<Length>,
    pub tones: Option<Vec<Tone>>,
    pub visual_concept: Option<String>,
    pub copy_topic: Option<String>,
    pub include_image: Option<bool>,
    pub refinement: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub campaign_title: String,
    pub platform: Platform,
    pub length: Length,
    pub tones: Vec<Tone>,
    pub visual_concept: String,
    pub copy_topic: String,
    pub include_image: bool,
    pub reference_image: Option<ReferenceView>,
    pub refining: Option<RefiningView>,
    pub refinement: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceView {
    pub mime_type: String,
    pub size: usize,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefiningView {
    pub id: String,
    pub title: String,
}
