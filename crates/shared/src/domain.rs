use std::fmt;

use serde::{Deserialize, Serialize};

/// Visual theme selected from the label of the last successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKey {
    Anger,
    Sadness,
    Joy,
    Love,
    Fear,
    Surprise,
    #[default]
    Default,
}

impl ThemeKey {
    pub const EMOTIONS: [ThemeKey; 6] = [
        ThemeKey::Anger,
        ThemeKey::Sadness,
        ThemeKey::Joy,
        ThemeKey::Love,
        ThemeKey::Fear,
        ThemeKey::Surprise,
    ];

    /// Case-insensitive match against the six emotion labels. Anything else,
    /// including the empty string, selects [`ThemeKey::Default`].
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "anger" => Self::Anger,
            "sadness" => Self::Sadness,
            "joy" => Self::Joy,
            "love" => Self::Love,
            "fear" => Self::Fear,
            "surprise" => Self::Surprise,
            _ => Self::Default,
        }
    }

    pub fn for_result(result: Option<&PredictionResult>) -> Self {
        result.map_or(Self::Default, PredictionResult::theme_key)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Sadness => "sadness",
            Self::Joy => "joy",
            Self::Love => "love",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    /// Percentage in `0..=100` as reported by the classifier.
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    pub fn theme_key(&self) -> ThemeKey {
        ThemeKey::from_label(&self.label)
    }
}
