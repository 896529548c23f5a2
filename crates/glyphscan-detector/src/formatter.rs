//! Replacement formatters for single-line matches.

use lazy_static::lazy_static;
use regex::Regex;

use glyphscan_core::{ElementKind, Error, RenderSettings, Result};

lazy_static! {
    static ref EXPLICIT_PERCENT: Regex = Regex::new(r"(\d+)%").unwrap();
}

const FILLED_GLYPHS: &[char] = &['█', '▓', '#', '='];
const LABEL_FRAME: &[char] = &['▓', '█', '[', ']', '│', '┃', ' '];

/// How a single-line rule turns matched text into replacement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    /// The kind's canonical symbol
    Symbol,
    /// Fixed replacement text
    Fixed(String),
    /// Normalized `[████_____] 50%` bar
    ProgressBar,
    /// Frame glyphs stripped, label wrapped in brackets
    Label,
    /// ☑ when marked, ☐ otherwise
    Checkbox,
    /// ◉ when marked, ○ otherwise
    Radio,
    /// Boxed content, or `[___]` when empty
    Input,
}

impl Formatter {
    /// Default formatter for a kind.
    pub fn for_kind(kind: ElementKind) -> Self {
        match kind {
            ElementKind::ProgressBar => Formatter::ProgressBar,
            ElementKind::Button => Formatter::Label,
            ElementKind::Checkbox => Formatter::Checkbox,
            ElementKind::RadioButton => Formatter::Radio,
            ElementKind::TextInput => Formatter::Input,
            _ => Formatter::Symbol,
        }
    }

    /// Produce the replacement for `text`.
    pub fn apply(&self, kind: ElementKind, text: &str, render: &RenderSettings) -> Result<String> {
        match self {
            Formatter::Symbol => Ok(kind.symbol().to_string()),
            Formatter::Fixed(value) => Ok(value.clone()),
            Formatter::ProgressBar => format_progress_bar(text, render.bar_width),
            Formatter::Label => {
                let label = text.trim_matches(LABEL_FRAME);
                if label.is_empty() {
                    return Err(Error::Formatter(format!("no label in {text:?}")));
                }
                Ok(format!("[{label}]"))
            }
            Formatter::Checkbox => Ok(if text.contains(['x', 'X']) { "☑" } else { "☐" }.to_string()),
            Formatter::Radio => Ok(if text.contains(['o', '*', '•']) { "◉" } else { "○" }.to_string()),
            Formatter::Input => {
                let content = text.trim_matches(|c: char| c == '│' || c == '┃' || c == '_' || c == ' ');
                if content.is_empty() {
                    Ok("[___]".to_string())
                } else {
                    Ok(format!("[{content}]"))
                }
            }
        }
    }
}

/// Percentage shown by a progress indicator.
///
/// An explicit `NN%` wins; otherwise the ratio of filled glyphs to all glyphs
/// inside the brackets (or the whole trimmed match when unbracketed), rounded.
pub fn progress_percent(text: &str) -> Result<u32> {
    if let Some(caps) = EXPLICIT_PERCENT.captures(text) {
        let value: u32 = caps[1]
            .parse()
            .map_err(|e| Error::Formatter(format!("bad percentage {:?}: {e}", &caps[1])))?;
        return Ok(value.min(100));
    }

    let body = match (text.find('['), text.rfind(']')) {
        (Some(open), Some(close)) if open < close => &text[open + 1..close],
        _ => text.trim(),
    };

    let total = body.chars().count();
    if total == 0 {
        return Err(Error::Formatter(format!("empty progress indicator {text:?}")));
    }
    let filled = body.chars().filter(|c| FILLED_GLYPHS.contains(c)).count();

    Ok(((filled as f64 / total as f64) * 100.0).round() as u32)
}

/// Render a fixed-width bar plus percentage.
pub fn format_progress_bar(text: &str, bar_width: usize) -> Result<String> {
    let percent = progress_percent(text)?;
    let filled = ((percent as f64 / 100.0) * bar_width as f64).round() as usize;
    let filled = filled.min(bar_width);
    Ok(format!(
        "[{}{}] {percent}%",
        "█".repeat(filled),
        "_".repeat(bar_width - filled)
    ))
}
