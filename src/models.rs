use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MuseError;

/// Destination network for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Platform {
    #[serde(rename = "Twitter/X")]
    Twitter,
    #[default]
    Facebook,
    Instagram,
    TikTok,
    Reddit,
    Discord,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
        Platform::TikTok,
        Platform::Reddit,
        Platform::Discord,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter/X",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Reddit => "Reddit",
            Platform::Discord => "Discord",
        }
    }
}

/// Copy length in sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Length {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[default]
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
}

impl Length {
    pub const ALL: [Length; 6] = [
        Length::One,
        Length::Two,
        Length::Three,
        Length::Four,
        Length::Five,
        Length::Six,
    ];

    pub fn sentences(self) -> u8 {
        match self {
            Length::One => 1,
            Length::Two => 2,
            Length::Three => 3,
            Length::Four => 4,
            Length::Five => 5,
            Length::Six => 6,
        }
    }

    pub fn from_sentences(count: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|length| length.sentences() == count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Tone {
    Entertaining,
    Fun,
    Warm,
    Playful,
    Witty,
    Casual,
    Urgent,
    Inspirational,
}

impl Tone {
    pub const ALL: [Tone; 8] = [
        Tone::Entertaining,
        Tone::Fun,
        Tone::Warm,
        Tone::Playful,
        Tone::Witty,
        Tone::Casual,
        Tone::Urgent,
        Tone::Inspirational,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Entertaining => "Entertaining",
            Tone::Fun => "Fun",
            Tone::Warm => "Warm",
            Tone::Playful => "Playful",
            Tone::Witty => "Witty",
            Tone::Casual => "Casual",
            Tone::Urgent => "Urgent",
            Tone::Inspirational => "Inspirational",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sentences())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = MuseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Platform::ALL
            .into_iter()
            .find(|platform| {
                platform.label().eq_ignore_ascii_case(trimmed)
                    || (*platform == Platform::Twitter
                        && (trimmed.eq_ignore_ascii_case("twitter") || trimmed.eq_ignore_ascii_case("x")))
            })
            .ok_or_else(|| MuseError::Validation(format!("unknown platform: {trimmed}")))
    }
}

impl FromStr for Length {
    type Err = MuseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(Length::from_sentences)
            .ok_or_else(|| MuseError::Validation(format!("length must be 1-6, got {}", raw.trim())))
    }
}

impl FromStr for Tone {
    type Err = MuseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MuseError::Validation(format!("unknown tone: {trimmed}")))
    }
}

/// Guidance for the human designer that accompanies the copy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignBrief {
    pub description: String,
    pub look_and_feel: String,
    pub messaging_hierarchy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub campaign_title: String,
    pub visual_concept: String,
    pub copy_topic: String,
    pub platform: Platform,
    pub length: Length,
    pub tone: Vec<Tone>,
}

/// One committed campaign. Never mutated after it enters the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedResult {
    pub id: String,
    pub content: String,
    #[serde(rename = "asanaBrief", default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<DesignBrief>,
    /// Inline `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub request: GenerationRequest,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GeneratedResult {
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    pub fn display_title(&self) -> &str {
        let title = self.request.campaign_title.trim();
        if title.is_empty() { "Untitled Campaign" } else { title }
    }

    pub fn tone_display(&self) -> String {
        self.request
            .tone
            .iter()
            .map(|tone| tone.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn fragment(&self, kind: CopyFragment) -> Option<&str> {
        match kind {
            CopyFragment::Message => Some(self.content.as_str()),
            CopyFragment::Description => self.brief.as_ref().map(|brief| brief.description.as_str()),
            CopyFragment::LookAndFeel => self.brief.as_ref().map(|brief| brief.look_and_feel.as_str()),
            CopyFragment::MessagingHierarchy => self
                .brief
                .as_ref()
                .map(|brief| brief.messaging_hierarchy.as_str()),
        }
    }
}

/// Pieces of a result that can be copied to the clipboard on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CopyFragment {
    Message,
    Description,
    LookAndFeel,
    MessagingHierarchy,
}

impl FromStr for CopyFragment {
    type Err = MuseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "message" | "main" => Ok(CopyFragment::Message),
            "description" | "desc" => Ok(CopyFragment::Description),
            "look-and-feel" | "look" => Ok(CopyFragment::LookAndFeel),
            "messaging-hierarchy" | "hierarchy" => Ok(CopyFragment::MessagingHierarchy),
            other => Err(MuseError::Validation(format!("unknown fragment: {other}"))),
        }
    }
}

/// Image attached to the form as a composition reference. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// `data:` URL used for display.
    pub preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeneratedResult {
        GeneratedResult {
            id: "abc123".to_string(),
            content: "Winter rewards are here. Ready to play?".to_string(),
            brief: Some(DesignBrief {
                description: "Winter promo".to_string(),
                look_and_feel: "Snowy blue cube".to_string(),
                messaging_hierarchy: "1. Cube 2. Snow 3. Logo".to_string(),
            }),
            image_url: Some("data:image/png;base64,AAAA".to_string()),
            request: GenerationRequest {
                campaign_title: "Winter".to_string(),
                visual_concept: "snowy cube".to_string(),
                copy_topic: "winter rewards".to_string(),
                platform: Platform::Twitter,
                length: Length::Two,
                tone: vec![Tone::Fun, Tone::Witty],
            },
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn serializes_with_browser_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["asanaBrief"]["lookAndFeel"], "Snowy blue cube");
        assert_eq!(value["imageUrl"], "data:image/png;base64,AAAA");
        assert_eq!(value["request"]["campaignTitle"], "Winter");
        assert_eq!(value["request"]["platform"], "Twitter/X");
        assert_eq!(value["request"]["length"], "2");
        assert_eq!(value["request"]["tone"], serde_json::json!(["Fun", "Witty"]));
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let raw = r#"{
            "id": "x1",
            "content": "Hi?",
            "request": {
                "campaignTitle": "",
                "visualConcept": "",
                "copyTopic": "gift",
                "platform": "Discord",
                "length": "6",
                "tone": ["Warm"]
            },
            "timestamp": 5
        }"#;
        let result: GeneratedResult = serde_json::from_str(raw).unwrap();
        assert!(result.brief.is_none());
        assert!(!result.has_image());
        assert_eq!(result.request.length, Length::Six);
        assert_eq!(result.display_title(), "Untitled Campaign");
    }

    #[test]
    fn length_rejects_values_outside_range() {
        assert!("0".parse::<Length>().is_err());
        assert!("7".parse::<Length>().is_err());
        assert_eq!("4".parse::<Length>().unwrap(), Length::Four);
        assert!(serde_json::from_str::<Length>("\"9\"").is_err());
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("twitter/x".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("tiktok".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!("playful".parse::<Tone>().unwrap(), Tone::Playful);
        assert!("grumpy".parse::<Tone>().is_err());
    }

    #[test]
    fn fragments_follow_brief_presence() {
        let mut result = sample();
        assert_eq!(result.fragment(CopyFragment::LookAndFeel), Some("Snowy blue cube"));
        assert_eq!(result.tone_display(), "Fun, Witty");
        result.brief = None;
        assert_eq!(result.fragment(CopyFragment::Description), None);
        assert_eq!(
            result.fragment(CopyFragment::Message),
            Some("Winter rewards are here. Ready to play?")
        );
        assert_eq!("look".parse::<CopyFragment>().unwrap(), CopyFragment::LookAndFeel);
    }
}
