// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-fixer - accessibility diagnostics for markup with safe automatic fixes
//!
//! Scans HTML-like fragments (plain HTML, JSX, Vue and Svelte templates) for
//! WCAG violations, reports each one as a precisely located [`Issue`], and
//! attaches a [`Fix`] wherever a repair is safe. Batches of fixes are applied
//! through the [`EditResolver`], which keeps offsets valid and settles
//! overlapping edits deterministically.
//!
//! ## Rules
//!
//! - **image-alt** (1.1.1): `<img>` without alt text
//! - **input-label** (3.3.2): unlabelled `<input>`, `<select>`, `<textarea>`
//! - **link-name** (2.4.4): links with no accessible name
//! - **button-name** (4.1.2): buttons with no accessible name
//! - **duplicate-id** (4.1.1): repeated id values
//! - **heading-order** (1.3.1): skipped heading levels
//! - **no-positive-tabindex** (2.4.3): tabindex above zero
//! - **html-lang** (3.1.1): `<html>` without a language
//! - **form-control-has-label** (4.1.2): custom widgets with no name
//! - **aria-hidden-focus** (4.1.2): hidden content that can take focus
//!
//! ## Example
//!
//! ```
//! use a11y_fixer::{analyze, EditResolver};
//!
//! let mut html = String::from(r#"<img src="hero.jpg">"#);
//! let issues = analyze(&html);
//! assert_eq!(issues[0].id, "image-alt");
//!
//! EditResolver::default().fix_all(&mut html, &issues);
//! assert_eq!(html, r#"<img src="hero.jpg" alt="TODO: describe">"#);
//! ```

pub mod config;
pub mod diagnostics;
pub mod edit;
pub mod error;
pub mod issue;
pub mod position;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod scanner;
pub mod service;

pub use edit::{Fix, Position, Range, TextEdit};
pub use error::{A11yError, Result};
pub use issue::Issue;
pub use resolver::{EditResolver, OverlapPolicy};
pub use rules::{analyze, RuleRegistry, Syntax};
