//! Rewrite styles and their instruction templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of rewrite styles. Each maps to a fixed instruction that is
/// prefixed to the transcript before it is sent to the rewrite endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Casual,
    Email,
    Summary,
    Story,
}

impl StyleKind {
    /// The instruction template for this style.
    pub fn instruction(&self) -> &'static str {
        match self {
            StyleKind::Casual => CASUAL_INSTRUCTION,
            StyleKind::Email => EMAIL_INSTRUCTION,
            StyleKind::Summary => SUMMARY_INSTRUCTION,
            StyleKind::Story => STORY_INSTRUCTION,
        }
    }

    /// Build the full prompt for a transcript.
    pub fn prompt_for(&self, transcript: &str) -> String {
        format!("{}{}", self.instruction(), transcript)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKind::Casual => "casual",
            StyleKind::Email => "email",
            StyleKind::Summary => "summary",
            StyleKind::Story => "story",
        }
    }

    /// All style names, for CLI listings and error messages.
    pub fn all() -> &'static [StyleKind] {
        &[
            StyleKind::Casual,
            StyleKind::Email,
            StyleKind::Summary,
            StyleKind::Story,
        ]
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "casual" | "text" => Ok(StyleKind::Casual),
            "email" => Ok(StyleKind::Email),
            "summary" => Ok(StyleKind::Summary),
            "story" => Ok(StyleKind::Story),
            _ => Err(format!(
                "Unknown style: '{}'. Available: casual, email, summary, story",
                s
            )),
        }
    }
}

const CASUAL_INSTRUCTION: &str =
    "Transform the following text into a concise, clear casual text message: ";

const EMAIL_INSTRUCTION: &str = "Transform the following text into a concise, clear email: ";

const SUMMARY_INSTRUCTION: &str = "Transform the following text into a concise, clear summary: ";

const STORY_INSTRUCTION: &str = "Transform the following text into a concise, clear story with \
smooth transitions, that sounds good when spoken out loud: ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_str() {
        assert_eq!("casual".parse::<StyleKind>().unwrap(), StyleKind::Casual);
        assert_eq!("Email".parse::<StyleKind>().unwrap(), StyleKind::Email);
        assert_eq!("summary".parse::<StyleKind>().unwrap(), StyleKind::Summary);
        assert_eq!("story".parse::<StyleKind>().unwrap(), StyleKind::Story);
        assert!("haiku".parse::<StyleKind>().is_err());
    }

    #[test]
    fn test_style_serialization() {
        let json = serde_json::to_string(&StyleKind::Casual).unwrap();
        assert_eq!(json, "\"casual\"");

        let parsed: StyleKind = serde_json::from_str("\"story\"").unwrap();
        assert_eq!(parsed, StyleKind::Story);
    }

    #[test]
    fn test_every_style_has_an_instruction() {
        for style in StyleKind::all() {
            assert!(style.instruction().starts_with("Transform the following text"));
            assert!(style.instruction().ends_with(": "));
        }
    }

    #[test]
    fn test_prompt_for_appends_transcript() {
        let prompt = StyleKind::Casual.prompt_for("buy milk");
        assert_eq!(
            prompt,
            "Transform the following text into a concise, clear casual text message: buy milk"
        );
    }
}
