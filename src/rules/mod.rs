// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility rules and the runner that executes them.
//!
//! Each rule is an independent scanner: it sees the whole text, returns its
//! issues, and keeps no state between calls. The registry runs rules in a
//! declared order and concatenates their output.

pub mod aria_hidden_focus;
pub mod button_name;
pub mod duplicate_id;
pub mod form_control_label;
pub mod heading_order;
pub mod html_lang;
pub mod image_alt;
pub mod input_label;
pub mod labels;
pub mod link_name;
pub mod markup;
pub mod positive_tabindex;

pub use markup::Syntax;

use crate::config::AnalysisConfig;
use crate::edit::{Position, Range, TextEdit};
use crate::issue::Issue;
use crate::position::{LineEndings, LineIndex};
use labels::Labeler;
use markup::{Element, ElementIndex, Tag};
use serde::{Deserialize, Serialize};
use std::ops::Range as Span;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Priority for fixes that insert a missing attribute
pub const PRIORITY_INSERT: u8 = 10;
/// Priority for fixes that remove an attribute
pub const PRIORITY_REMOVE: u8 = 20;
/// Priority for fixes that rename identifiers or tags
pub const PRIORITY_RENAME: u8 = 30;

/// The text under analysis plus its line table and element pairing, both
/// built once per run
pub struct SourceText<'a> {
    index: LineIndex<'a>,
    elements: ElementIndex,
    syntax: Syntax,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str, endings: LineEndings) -> Self {
        Self::with_syntax(text, endings, Syntax::Html)
    }

    pub fn with_syntax(text: &'a str, endings: LineEndings, syntax: Syntax) -> Self {
        Self {
            index: LineIndex::new(text, endings),
            elements: ElementIndex::new(text),
            syntax,
        }
    }

    pub fn text(&self) -> &'a str {
        self.index.text()
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn elements(&self) -> &ElementIndex {
        &self.elements
    }

    /// Resolve the element opened by `tag`
    pub fn element<'t>(&self, tag: Tag<'t>) -> Element<'t> {
        self.elements.element(tag)
    }

    /// Offset where a new attribute goes on `tag`
    pub fn attribute_point(&self, tag: &Tag<'_>) -> usize {
        tag.insertion_point_for(self.syntax)
    }

    pub fn position(&self, offset: usize) -> Position {
        self.index.offset_to_position(offset)
    }

    pub fn range(&self, span: Span<usize>) -> Range {
        Range::new(self.position(span.start), self.position(span.end))
    }

    /// Insert `text` at byte offset `at`
    pub fn insert(&self, at: usize, text: impl Into<String>) -> TextEdit {
        TextEdit::insert(self.position(at), text)
    }

    /// Replace the bytes in `span` with `text`
    pub fn replace(&self, span: Span<usize>, text: impl Into<String>) -> TextEdit {
        TextEdit::replace(self.range(span), text)
    }
}

/// Trait implemented by all rules
pub trait Rule: Send + Sync {
    /// Stable identifier used as the issue id and diagnostic code
    fn id(&self) -> &'static str;

    /// Short description of what this rule checks
    fn description(&self) -> &'static str;

    /// Priority stamped on this rule's fixes for conflict resolution
    fn priority(&self) -> u8 {
        PRIORITY_INSERT
    }

    /// Scan the whole text and return every violation found
    fn check(&self, source: &SourceText<'_>) -> Vec<Issue>;
}

/// A rule that panicked during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule: String,
    pub message: String,
}

/// Output of one registry run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    /// Issues in registry order, each rule's own order preserved
    pub issues: Vec<Issue>,
    /// Rules that failed; their issues are missing from `issues`
    pub failures: Vec<RuleFailure>,
}

/// Ordered set of rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    line_endings: LineEndings,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl RuleRegistry {
    /// Registry with an explicit rule list
    pub fn new(rules: Vec<Box<dyn Rule>>, line_endings: LineEndings) -> Self {
        Self { rules, line_endings }
    }

    /// The standard rule set, minus anything disabled in the config
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let labeler = Labeler::new(config.labels, &config.placeholder);
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(image_alt::ImageAlt::new(labeler.clone())),
            Box::new(input_label::InputLabel::new(labeler.clone())),
            Box::new(link_name::LinkName::new(labeler.clone())),
            Box::new(button_name::ButtonName::new(labeler.clone())),
            Box::new(duplicate_id::DuplicateId),
            Box::new(heading_order::HeadingOrder),
            Box::new(positive_tabindex::NoPositiveTabindex),
            Box::new(html_lang::HtmlLang::new(&config.default_language)),
            Box::new(form_control_label::FormControlLabel::new(labeler)),
            Box::new(aria_hidden_focus::AriaHiddenFocus),
        ];

        let rules = rules
            .into_iter()
            .filter(|rule| !config.disabled_rules.iter().any(|d| d == rule.id()))
            .collect();

        Self::new(rules, config.line_endings)
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules().map(|r| r.id()).collect()
    }

    pub fn line_endings(&self) -> LineEndings {
        self.line_endings
    }

    /// Run every rule over `text` as HTML
    pub fn run(&self, text: &str) -> Analysis {
        self.run_as(text, Syntax::Html)
    }

    /// Run every rule over `text` written in `syntax`
    pub fn run_as(&self, text: &str, syntax: Syntax) -> Analysis {
        let source = SourceText::with_syntax(text, self.line_endings, syntax);
        let mut analysis = Analysis::default();

        for rule in &self.rules {
            match panic::catch_unwind(AssertUnwindSafe(|| rule.check(&source))) {
                Ok(mut issues) => {
                    debug!(rule = rule.id(), count = issues.len(), "rule finished");
                    for fix in issues.iter_mut().filter_map(|i| i.fix.as_mut()) {
                        fix.priority = rule.priority();
                    }
                    analysis.issues.extend(issues);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(rule = rule.id(), "rule failed: {}", message);
                    analysis.failures.push(RuleFailure {
                        rule: rule.id().to_string(),
                        message,
                    });
                }
            }
        }

        analysis
    }

    /// Run every rule and return only the issues
    pub fn analyze(&self, text: &str) -> Vec<Issue> {
        self.run(text).issues
    }

    pub fn analyze_as(&self, text: &str, syntax: Syntax) -> Vec<Issue> {
        self.run_as(text, syntax).issues
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

static DEFAULT_REGISTRY: LazyLock<RuleRegistry> = LazyLock::new(RuleRegistry::default);

/// Analyze `text` with the default rule set
pub fn analyze(text: &str) -> Vec<Issue> {
    DEFAULT_REGISTRY.analyze(text)
}
