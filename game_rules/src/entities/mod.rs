//! Character references used by authored content.
//!
//! Characters themselves live in the character/voice database. The graph only
//! stores a reference to them.

use serde::{Deserialize, Serialize};

/// Identifier of a character in the character database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub String);

impl CharacterId {
    /// Create a character reference from its database key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw database key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Emotion a dialogue line is delivered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Worried,
    Thoughtful,
}

impl Emotion {
    /// All emotions in display order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Worried,
        Emotion::Thoughtful,
    ];

    /// Lowercase name as stored in exported records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Worried => "worried",
            Emotion::Thoughtful => "thoughtful",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_display() {
        let id = CharacterId::new("maya");
        assert_eq!(id.to_string(), "maya");
        assert_eq!(id.as_str(), "maya");
    }

    #[test]
    fn test_emotion_serializes_lowercase() {
        let json = serde_json::to_string(&Emotion::Thoughtful).unwrap();
        assert_eq!(json, "\"thoughtful\"");

        for emotion in Emotion::ALL {
            let json = format!("\"{}\"", emotion.as_str());
            let parsed: Emotion = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, emotion);
        }
    }
}
