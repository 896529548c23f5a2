//! Template library: the immutable table of UI element patterns.
//!
//! Each [`ElementKind`] has zero or more multi-row [`Template`]s and zero or
//! more [`SingleLineRule`]s. The built-in table is compiled in and shared
//! process-wide through [`TemplateLibrary::builtin`]; custom libraries are
//! assembled with [`TemplateLibraryBuilder`]. Malformed entries are rejected
//! individually at build time and recorded, never scanned with.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use glyphscan_core::{DetectorConfig, ElementKind, Error, RenderSettings, Result};

use crate::formatter::Formatter;

/// Fixed-size multi-row glyph pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    kind: ElementKind,
    rows: Vec<Vec<char>>,
    weight: f64,
}

impl Template {
    /// Create a template, validating its shape and weight.
    ///
    /// Rejects zero height, zero width, rows of unequal width, and weights
    /// outside (0, 1].
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        kind: ElementKind,
        rows: &[S],
        weight: f64,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| Error::InvalidTemplate {
            name: name.clone(),
            reason,
        };

        let rows: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
        let Some(first) = rows.first() else {
            return Err(invalid("template has no rows".to_string()));
        };
        let width = first.len();
        if width == 0 {
            return Err(invalid("template has zero width".to_string()));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(invalid(format!(
                "row {idx} has width {}, expected {width}",
                row.len()
            )));
        }
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(invalid(format!("weight {weight} outside (0, 1]")));
        }

        Ok(Self {
            name,
            kind,
            rows,
            weight,
        })
    }

    /// Template name (unique within a library).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element kind detected by this template.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Cells covered.
    pub fn area(&self) -> usize {
        self.height() * self.width()
    }

    /// Base confidence weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Pattern rows.
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }
}

/// Single-line match rule.
#[derive(Debug, Clone)]
pub struct SingleLineRule {
    name: String,
    kind: ElementKind,
    regex: Regex,
    confidence: f64,
    formatter: Formatter,
}

impl SingleLineRule {
    /// Create a rule, compiling and validating its pattern.
    ///
    /// Patterns that can match the empty string are rejected: every match
    /// must cover at least one cell.
    pub fn new(
        name: impl Into<String>,
        kind: ElementKind,
        pattern: &str,
        confidence: f64,
        formatter: Formatter,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| Error::InvalidPattern {
            name: name.clone(),
            reason,
        };

        let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        if regex.is_match("") {
            return Err(invalid("pattern matches the empty string".to_string()));
        }
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(invalid(format!("confidence {confidence} outside (0, 1]")));
        }

        Ok(Self {
            name,
            kind,
            regex,
            confidence,
            formatter,
        })
    }

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element kind generated by this rule.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Fixed confidence for every match.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Replacement formatter.
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Format the replacement for a matched span.
    pub fn format(&self, text: &str, render: &RenderSettings) -> Result<String> {
        self.formatter.apply(self.kind, text, render)
    }
}

/// Read-only table of templates and rules, indexed by kind.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: BTreeMap<ElementKind, Vec<Template>>,
    rules: BTreeMap<ElementKind, Vec<SingleLineRule>>,
    rejected: Vec<String>,
    templates_rejected: usize,
    rules_rejected: usize,
}

lazy_static! {
    static ref BUILTIN: Arc<TemplateLibrary> =
        Arc::new(TemplateLibrary::builder().with_builtin().build());
}

impl TemplateLibrary {
    /// Start an empty builder.
    pub fn builder() -> TemplateLibraryBuilder {
        TemplateLibraryBuilder::default()
    }

    /// The shared compiled-in library.
    pub fn builtin() -> Arc<TemplateLibrary> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in table plus the extra templates and patterns from config.
    pub fn from_config(config: &DetectorConfig) -> Self {
        let mut builder = Self::builder().with_builtin();
        for template in &config.templates {
            builder = builder.template(template.kind, template.rows.as_slice(), template.weight);
        }
        for pattern in &config.patterns {
            let formatter = match &pattern.replacement {
                Some(fixed) => Formatter::Fixed(fixed.clone()),
                None => Formatter::for_kind(pattern.kind),
            };
            builder = builder.rule(
                pattern.name.clone(),
                pattern.kind,
                &pattern.pattern,
                pattern.confidence,
                formatter,
            );
        }
        builder.build()
    }

    /// Templates for one kind.
    pub fn templates_for(&self, kind: ElementKind) -> &[Template] {
        self.templates.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Single-line rules for one kind.
    pub fn single_line_rules_for(&self, kind: ElementKind) -> &[SingleLineRule] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds with at least one template or rule.
    pub fn all_kinds(&self) -> BTreeSet<ElementKind> {
        self.templates.keys().chain(self.rules.keys()).copied().collect()
    }

    /// Every template, in kind order then insertion order.
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values().flatten()
    }

    /// Every rule, in kind order then insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &SingleLineRule> {
        self.rules.values().flatten()
    }

    /// Number of accepted templates.
    pub fn template_count(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }

    /// Number of accepted rules.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Messages for entries rejected at build time.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Number of templates rejected at build time.
    pub fn templates_rejected(&self) -> usize {
        self.templates_rejected
    }

    /// Number of rules rejected at build time.
    pub fn rules_rejected(&self) -> usize {
        self.rules_rejected
    }
}

/// Builder for [`TemplateLibrary`].
#[derive(Debug, Default)]
pub struct TemplateLibraryBuilder {
    library: TemplateLibrary,
    next_index: BTreeMap<ElementKind, usize>,
    templates_rejected: usize,
    rules_rejected: usize,
}

impl TemplateLibraryBuilder {
    /// Add a template. Named `<kind>#<n>` with `n` counting per kind.
    pub fn template<S: AsRef<str>>(mut self, kind: ElementKind, rows: &[S], weight: f64) -> Self {
        let index = self.next_index.entry(kind).or_insert(0);
        let name = format!("{kind}#{index}");
        *index += 1;
        match Template::new(name, kind, rows, weight) {
            Ok(template) => self.library.templates.entry(kind).or_default().push(template),
            Err(e) => {
                tracing::warn!("Rejecting template: {}", e);
                self.templates_rejected += 1;
                self.library.rejected.push(e.to_string());
            }
        }
        self
    }

    /// Add a single-line rule.
    pub fn rule(
        mut self,
        name: impl Into<String>,
        kind: ElementKind,
        pattern: &str,
        confidence: f64,
        formatter: Formatter,
    ) -> Self {
        match SingleLineRule::new(name, kind, pattern, confidence, formatter) {
            Ok(rule) => self.library.rules.entry(kind).or_default().push(rule),
            Err(e) => {
                tracing::warn!("Rejecting rule: {}", e);
                self.rules_rejected += 1;
                self.library.rejected.push(e.to_string());
            }
        }
        self
    }

    /// Add the compiled-in templates and rules.
    pub fn with_builtin(mut self) -> Self {
        for (kind, rows, weight) in BUILTIN_TEMPLATES {
            self = self.template(*kind, *rows, *weight);
        }
        for (name, kind, pattern, confidence, fixed) in BUILTIN_RULES {
            let formatter = match fixed {
                Some(text) => Formatter::Fixed(text.to_string()),
                None => Formatter::for_kind(*kind),
            };
            self = self.rule(*name, *kind, pattern, *confidence, formatter);
        }
        self
    }

    /// Templates rejected so far.
    pub fn templates_rejected(&self) -> usize {
        self.templates_rejected
    }

    /// Rules rejected so far.
    pub fn rules_rejected(&self) -> usize {
        self.rules_rejected
    }

    /// Finish the library.
    pub fn build(mut self) -> TemplateLibrary {
        self.library.templates_rejected = self.templates_rejected;
        self.library.rules_rejected = self.rules_rejected;
        tracing::debug!(
            "Template library built: {} templates, {} rules, {} rejected",
            self.library.template_count(),
            self.library.rule_count(),
            self.library.rejected.len()
        );
        self.library
    }
}

type TemplateDef = (ElementKind, &'static [&'static str], f64);
type RuleDef = (&'static str, ElementKind, &'static str, f64, Option<&'static str>);

const BUILTIN_TEMPLATES: &[TemplateDef] = &[
    // Down arrows
    (ElementKind::ArrowDown, &[" █ ", "███"], 0.9),
    (ElementKind::ArrowDown, &[" ▓ ", "▓▓▓"], 0.9),
    (ElementKind::ArrowDown, &[" ▒ ", "▒▒▒"], 0.8),
    (ElementKind::ArrowDown, &[" █ ", " █ ", "███"], 0.95),
    (ElementKind::ArrowDown, &[" ▓ ", " ▓ ", "▓▓▓"], 0.95),
    (ElementKind::ArrowDown, &[" ▓ ", "▓ ▓", "▓▓▓"], 0.85),
    (ElementKind::ArrowDown, &["  █  ", " ███ ", "█████"], 0.95),
    (ElementKind::ArrowDown, &["  ▓  ", " ▓▓▓ ", "▓▓▓▓▓"], 0.95),
    (ElementKind::ArrowDown, &["  ▒  ", " ▒▒▒ ", "▒▒▒▒▒"], 0.9),
    (ElementKind::ArrowDown, &["  █  ", "  █  ", " ███ ", "█████"], 0.98),
    (ElementKind::ArrowDown, &["  ▓  ", "  ▓  ", " ▓▓▓ ", "▓▓▓▓▓"], 0.98),
    (ElementKind::ArrowDown, &[" ███ ", " ███ ", "█████", "█████"], 0.9),
    (ElementKind::ArrowDown, &["   █   ", "  ███  ", " █████ ", "███████"], 0.95),
    (ElementKind::ArrowDown, &["   ▓   ", "  ▓▓▓  ", " ▓▓▓▓▓ ", "▓▓▓▓▓▓▓"], 0.95),
    (
        ElementKind::ArrowDown,
        &["    █    ", "   ███   ", "  █████  ", " ███████ ", "█████████"],
        0.95,
    ),
    // Up arrows
    (ElementKind::ArrowUp, &["███", " █ "], 0.9),
    (ElementKind::ArrowUp, &["▓▓▓", " ▓ "], 0.9),
    (ElementKind::ArrowUp, &["███", " █ ", " █ "], 0.95),
    (ElementKind::ArrowUp, &["█████", " ███ ", "  █  "], 0.95),
    (ElementKind::ArrowUp, &["▓▓▓▓▓", " ▓▓▓ ", "  ▓  "], 0.95),
    (ElementKind::ArrowUp, &["███████", " █████ ", "  ███  ", "   █   "], 0.95),
    // Right arrows
    (ElementKind::ArrowRight, &["█ ", "██", "██", "█ "], 0.9),
    (ElementKind::ArrowRight, &["▓ ", "▓▓", "▓▓", "▓ "], 0.9),
    (ElementKind::ArrowRight, &["█  ", "██ ", "███", "██ ", "█  "], 0.95),
    // Left arrows
    (ElementKind::ArrowLeft, &[" █", "██", "██", " █"], 0.9),
    (ElementKind::ArrowLeft, &[" ▓", "▓▓", "▓▓", " ▓"], 0.9),
    (ElementKind::ArrowLeft, &["  █", " ██", "███", " ██", "  █"], 0.95),
    // Media controls
    (ElementKind::PlayButton, &["▓  ", "▓▓ ", "▓▓▓", "▓▓ ", "▓  "], 0.9),
    (ElementKind::PauseButton, &["█ █", "█ █", "█ █"], 0.9),
    (ElementKind::PauseButton, &["▓ ▓", "▓ ▓", "▓ ▓"], 0.9),
    (ElementKind::PauseButton, &["██ ██", "██ ██", "██ ██"], 0.95),
    (ElementKind::StopButton, &["███", "███", "███"], 0.9),
    (ElementKind::StopButton, &["▓▓▓", "▓▓▓", "▓▓▓"], 0.9),
    // Framed buttons
    (ElementKind::Button, &["▓▓▓▓▓", "▓   ▓", "▓▓▓▓▓"], 0.9),
    (ElementKind::Button, &["░▓▓▓░", "▓   ▓", "░▓▓▓░"], 0.9),
];

const BUILTIN_RULES: &[RuleDef] = &[
    ("block_progress", ElementKind::ProgressBar, r"[█▓#=]{2,}[░▒ \-_.]{2,}", 0.9, None),
    ("bracket_progress", ElementKind::ProgressBar, r"\[[=#][=#>]*[-\s.]*\]", 0.9, None),
    ("percent_progress", ElementKind::ProgressBar, r"\d+%\s*[█▓#]{2,}[░▒ \-_.]*", 0.9, None),
    ("bracket_label", ElementKind::Button, r"\[[\w\s]+\]", 0.9, None),
    ("framed_label", ElementKind::Button, r"[▓█]{3,}\s*\w+\s*[▓█]{3,}", 0.9, None),
    ("checkbox", ElementKind::Checkbox, r"\[[ xX]\]", 0.95, None),
    ("radio", ElementKind::RadioButton, r"\([ o*•]\)", 0.95, None),
    ("underscore_input", ElementKind::TextInput, r"_{3,}", 0.9, Some("[___]")),
    ("boxed_input", ElementKind::TextInput, r"[│┃][ \w]*[│┃]", 0.9, None),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_valid() {
        let t = Template::new("down", ElementKind::ArrowDown, &["  #  ", " ### ", "#####"], 0.95)
            .unwrap();
        assert_eq!(t.height(), 3);
        assert_eq!(t.width(), 5);
        assert_eq!(t.area(), 15);
        assert_eq!(t.weight(), 0.95);
    }

    #[test]
    fn test_template_unequal_rows_rejected() {
        let err = Template::new("bad", ElementKind::ArrowDown, &["##", "###"], 0.9).unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate { .. }));
        assert!(err.to_string().contains("row 1 has width 3"));
    }

    #[test]
    fn test_template_zero_extent_rejected() {
        let empty: [&str; 0] = [];
        assert!(Template::new("none", ElementKind::ArrowUp, &empty, 0.9).is_err());
        assert!(Template::new("thin", ElementKind::ArrowUp, &["", ""], 0.9).is_err());
    }

    #[test]
    fn test_template_weight_range() {
        assert!(Template::new("w0", ElementKind::ArrowUp, &["#"], 0.0).is_err());
        assert!(Template::new("w2", ElementKind::ArrowUp, &["#"], 1.5).is_err());
        assert!(Template::new("w1", ElementKind::ArrowUp, &["#"], 1.0).is_ok());
    }

    #[test]
    fn test_rule_rejects_bad_regex_and_empty_match() {
        assert!(SingleLineRule::new("bad", ElementKind::Button, "([", 0.9, Formatter::Label).is_err());
        assert!(SingleLineRule::new("empty", ElementKind::Button, "x*", 0.9, Formatter::Label).is_err());
        assert!(SingleLineRule::new("conf", ElementKind::Button, "x", 0.0, Formatter::Label).is_err());
    }

    #[test]
    fn test_builder_records_rejections() {
        let builder = TemplateLibrary::builder()
            .template(ElementKind::ArrowDown, &["#", "##"], 0.9)
            .template(ElementKind::ArrowDown, &["#"], 0.9)
            .rule("bad", ElementKind::Button, "([", 0.9, Formatter::Label);
        assert_eq!(builder.templates_rejected(), 1);
        assert_eq!(builder.rules_rejected(), 1);

        let library = builder.build();
        assert_eq!(library.template_count(), 1);
        assert_eq!(library.rule_count(), 0);
        assert_eq!(library.rejected().len(), 2);
        assert_eq!(library.templates_rejected(), 1);
        assert_eq!(library.rules_rejected(), 1);
        // Names keep counting past rejected entries
        assert_eq!(library.templates_for(ElementKind::ArrowDown)[0].name(), "arrow_down#1");
    }

    #[test]
    fn test_builtin_library_is_well_formed() {
        let library = TemplateLibrary::builtin();
        assert!(library.rejected().is_empty(), "{:?}", library.rejected());
        assert_eq!(library.template_count(), BUILTIN_TEMPLATES.len());
        assert_eq!(library.rule_count(), BUILTIN_RULES.len());
        assert!(!library.templates_for(ElementKind::ArrowDown).is_empty());
        assert!(!library.single_line_rules_for(ElementKind::ProgressBar).is_empty());
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = TemplateLibrary::builtin();
        let b = TemplateLibrary::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_all_kinds() {
        let library = TemplateLibrary::builder()
            .template(ElementKind::ArrowUp, &["#"], 0.9)
            .rule("cb", ElementKind::Checkbox, r"\[x\]", 0.95, Formatter::Checkbox)
            .build();
        let kinds: Vec<ElementKind> = library.all_kinds().into_iter().collect();
        assert_eq!(kinds, vec![ElementKind::ArrowUp, ElementKind::Checkbox]);
        assert!(library.templates_for(ElementKind::Button).is_empty());
    }

    #[test]
    fn test_from_config_adds_extras() {
        let config = DetectorConfig::from_yaml(
            r######"
templates:
  - kind: arrow_down
    rows: ["  #  ", " ### ", "#####"]
    weight: 0.95
  - kind: arrow_up
    rows: ["#", "##"]
    weight: 0.9
patterns:
  - name: ok
    kind: button
    pattern: "<OK>"
    replacement: "[OK]"
"######,
        )
        .unwrap();

        let library = TemplateLibrary::from_config(&config);
        assert_eq!(library.template_count(), BUILTIN_TEMPLATES.len() + 1);
        assert_eq!(library.rule_count(), BUILTIN_RULES.len() + 1);
        assert_eq!(library.rejected().len(), 1);

        let ok = library
            .single_line_rules_for(ElementKind::Button)
            .iter()
            .find(|r| r.name() == "ok")
            .unwrap();
        assert_eq!(ok.formatter(), &Formatter::Fixed("[OK]".to_string()));
    }
}
