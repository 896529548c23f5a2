//! UI element kinds.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Closed set of UI element kinds the detector recognizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Downward arrow (download)
    ArrowDown,
    /// Upward arrow (upload)
    ArrowUp,
    /// Leftward arrow
    ArrowLeft,
    /// Rightward arrow
    ArrowRight,
    /// Play triangle
    PlayButton,
    /// Pause bars
    PauseButton,
    /// Stop square
    StopButton,
    /// Labelled button
    Button,
    /// Progress indicator
    ProgressBar,
    /// Checkbox toggle
    Checkbox,
    /// Radio toggle
    RadioButton,
    /// Text input field
    TextInput,
}

impl ElementKind {
    /// Every kind, in declaration order.
    pub const ALL: [ElementKind; 12] = [
        ElementKind::ArrowDown,
        ElementKind::ArrowUp,
        ElementKind::ArrowLeft,
        ElementKind::ArrowRight,
        ElementKind::PlayButton,
        ElementKind::PauseButton,
        ElementKind::StopButton,
        ElementKind::Button,
        ElementKind::ProgressBar,
        ElementKind::Checkbox,
        ElementKind::RadioButton,
        ElementKind::TextInput,
    ];

    /// Stable snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::ArrowDown => "arrow_down",
            ElementKind::ArrowUp => "arrow_up",
            ElementKind::ArrowLeft => "arrow_left",
            ElementKind::ArrowRight => "arrow_right",
            ElementKind::PlayButton => "play_button",
            ElementKind::PauseButton => "pause_button",
            ElementKind::StopButton => "stop_button",
            ElementKind::Button => "button",
            ElementKind::ProgressBar => "progress_bar",
            ElementKind::Checkbox => "checkbox",
            ElementKind::RadioButton => "radio_button",
            ElementKind::TextInput => "text_input",
        }
    }

    /// Canonical replacement symbol written into the grid.
    pub fn symbol(&self) -> &'static str {
        match self {
            ElementKind::ArrowDown => "⬇",
            ElementKind::ArrowUp => "⬆",
            ElementKind::ArrowLeft => "⬅",
            ElementKind::ArrowRight => "➡",
            ElementKind::PlayButton => "▶",
            ElementKind::PauseButton => "⏸",
            ElementKind::StopButton => "⏹",
            ElementKind::Button => "■",
            ElementKind::ProgressBar => "▬",
            ElementKind::Checkbox => "☐",
            ElementKind::RadioButton => "○",
            ElementKind::TextInput => "▭",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown element kind: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.name().parse::<ElementKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert!("slider".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ElementKind::ArrowDown).unwrap();
        assert_eq!(json, "\"arrow_down\"");
        let kind: ElementKind = serde_json::from_str("\"progress_bar\"").unwrap();
        assert_eq!(kind, ElementKind::ProgressBar);
    }

    #[test]
    fn test_symbols_are_single_char() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.symbol().chars().count(), 1, "{kind}");
        }
    }
}
