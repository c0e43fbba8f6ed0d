//! Dialogue nodes - a single spoken line.

use game_rules::{CharacterId, Emotion};
use serde::{Deserialize, Serialize};

use super::{truncate, NodeBehavior, PortLayout};

/// A line of dialogue delivered by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogueData {
    /// Speaking character. `None` is narration.
    pub speaker: Option<CharacterId>,
    pub text: String,
    pub emotion: Emotion,
    /// Voice clip id for the speech-preview service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_line: Option<String>,
}

impl DialogueData {
    pub fn new(speaker: Option<CharacterId>, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the emotion.
    pub fn with_emotion(mut self, emotion: Emotion) -> Self {
        self.emotion = emotion;
        self
    }

    pub fn apply(&mut self, patch: DialoguePatch) {
        if let Some(speaker) = patch.speaker {
            self.speaker = speaker;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(emotion) = patch.emotion {
            self.emotion = emotion;
        }
        if let Some(voice_line) = patch.voice_line {
            self.voice_line = voice_line;
        }
    }
}

/// Partial update for a dialogue node. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialoguePatch {
    pub speaker: Option<Option<CharacterId>>,
    pub text: Option<String>,
    pub emotion: Option<Emotion>,
    pub voice_line: Option<Option<String>>,
}

impl NodeBehavior for DialogueData {
    fn header_label(&self) -> String {
        match &self.speaker {
            Some(speaker) => format!("Dialogue: {}", speaker),
            None => "Dialogue: Narrator".to_string(),
        }
    }

    fn port_layout(&self) -> PortLayout {
        PortLayout::single_flow()
    }

    fn content_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.emotion != Emotion::Neutral {
            lines.push(format!("({})", self.emotion.as_str()));
        }
        lines.push(truncate(&self.text, 40));
        lines
    }
}
