//! Color palettes projected by the view for each theme key.

use crate::domain::ThemeKey;

#[derive(Debug, PartialEq, Eq)]
pub struct ThemeDescriptor {
    /// CSS gradient used as the page background.
    pub background: &'static str,
    pub accent: &'static str,
    pub accent_secondary: &'static str,
    pub text: &'static str,
    /// Fill colors of the decorative background shapes.
    pub shapes: [&'static str; 6],
}

const ANGER: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #ffe5e5 0%, #ffd6e0 100%)",
    accent: "#d7263d",
    accent_secondary: "#a8182e",
    text: "#a8182e",
    shapes: ["#d7263d", "#a8182e", "#ffb3b3", "#ffb199", "#ff6e7f", "#fff"],
};

const SADNESS: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #e3e6f3 0%, #dbeafe 100%)",
    accent: "#355c7d",
    accent_secondary: "#6c5b7b",
    text: "#355c7d",
    shapes: ["#355c7d", "#6c5b7b", "#a8c0ff", "#6dd5ed", "#2193b0", "#fff"],
};

const JOY: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #fffbe5 0%, #fff6d1 100%)",
    accent: "#f7971e",
    accent_secondary: "#ffd200",
    text: "#b8860b",
    shapes: ["#f7971e", "#ffd200", "#ffe259", "#ffa751", "#fffbe5", "#fff"],
};

const LOVE: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #ffe5f0 0%, #ffe5ec 100%)",
    accent: "#ff6a88",
    accent_secondary: "#ff99ac",
    text: "#c2185b",
    shapes: ["#ff6a88", "#ff99ac", "#fbc2eb", "#fcb69f", "#ffb6b9", "#fff"],
};

const FEAR: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #eaeaea 0%, #cfd9df 100%)",
    accent: "#232526",
    accent_secondary: "#414345",
    text: "#232526",
    shapes: ["#232526", "#414345", "#636363", "#757f9a", "#434343", "#fff"],
};

const SURPRISE: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #e0f7fa 0%, #e1f5fe 100%)",
    accent: "#43cea2",
    accent_secondary: "#185a9d",
    text: "#185a9d",
    shapes: ["#185a9d", "#43cea2", "#f7971e", "#ffd200", "#43e97b", "#fff"],
};

const DEFAULT: ThemeDescriptor = ThemeDescriptor {
    background: "linear-gradient(-45deg, #f6f8fb 0%, #fbc2eb 50%, #fad0c4 100%, #e3e6f3 100%)",
    accent: "#7f53ac",
    accent_secondary: "#647dee",
    text: "#22223b",
    shapes: ["#7f53ac", "#647dee", "#a18cd1", "#fbc2eb", "#fad0c4", "#fff"],
};

impl ThemeKey {
    pub fn descriptor(self) -> &'static ThemeDescriptor {
        match self {
            Self::Anger => &ANGER,
            Self::Sadness => &SADNESS,
            Self::Joy => &JOY,
            Self::Love => &LOVE,
            Self::Fear => &FEAR,
            Self::Surprise => &SURPRISE,
            Self::Default => &DEFAULT,
        }
    }
}
