//! User-facing text: configurable prefix plus per-denial templates.
//!
//! Templates use MiniMessage-style markup (`<red>`, `<bold>`) and a single
//! numeric placeholder such as `<diamond-level>`. Rendering to markup is left
//! to the host; [`RichText::plain`] strips tags for logs and tests.

use crate::config::MessagesConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static TAG_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"</?[a-zA-Z_#][a-zA-Z0-9_:#-]*>").ok());

/// Markup text ready to hand to the host's formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText(String);

impl RichText {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn markup(&self) -> &str {
        &self.0
    }

    /// Text with every markup tag removed.
    pub fn plain(&self) -> String {
        match TAG_PATTERN.as_ref() {
            Some(pattern) => pattern.replace_all(&self.0, "").into_owned(),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composes prefixed messages from the active [`MessagesConfig`].
pub struct Messages<'a> {
    config: &'a MessagesConfig,
}

impl<'a> Messages<'a> {
    pub fn new(config: &'a MessagesConfig) -> Self {
        Self { config }
    }

    /// Prefix + `body`, no substitution.
    pub fn prefixed(&self, body: &str) -> RichText {
        RichText::new(format!("{}{}", self.config.prefix, body))
    }

    /// Prefix + `template` with `placeholder` replaced by `value`.
    pub fn templated(&self, template: &str, placeholder: &str, value: u32) -> RichText {
        self.prefixed(&template.replace(placeholder, &value.to_string()))
    }

    pub fn not_ready(&self) -> RichText {
        self.prefixed(&self.config.not_ready)
    }
}
