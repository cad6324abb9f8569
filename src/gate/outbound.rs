//! Outbound content filter.
//!
//! Runs on every message the bot is about to send, independent of the
//! decision pipeline. Any matching rule suppresses the whole message.

use crate::config::{OutboundConfig, OutboundFilterRule};
use crate::message::Outbound;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

#[derive(Debug)]
enum Matcher {
    /// Case-sensitive substring.
    Plain(String),
    /// Case-insensitive expression.
    Regex(Regex),
    /// Pattern failed to compile; never matches.
    Invalid,
}

impl Matcher {
    fn compile(rule: &OutboundFilterRule) -> Self {
        if !rule.regex {
            return Matcher::Plain(rule.pattern.clone());
        }

        let pattern = strip_delimiters(&rule.pattern);
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Matcher::Regex(regex),
            Err(e) => {
                warn!(
                    pattern = %rule.pattern,
                    error = %e,
                    "Invalid outbound filter regex; rule will never match"
                );
                Matcher::Invalid
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Plain(needle) => text.contains(needle.as_str()),
            Matcher::Regex(regex) => regex.is_match(text),
            Matcher::Invalid => false,
        }
    }
}

/// Remove one leading and one trailing `/` from a `/pattern/` literal.
fn strip_delimiters(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
    pattern.strip_suffix('/').unwrap_or(pattern)
}

/// Compiled outbound filter.
#[derive(Debug)]
pub struct OutboundFilter {
    enabled: bool,
    matchers: Vec<Matcher>,
}

impl OutboundFilter {
    /// Compile every rule once. Invalid regexes are logged and kept as
    /// never-matching entries so the rest of the list still applies.
    pub fn new(config: &OutboundConfig) -> Self {
        Self {
            enabled: config.enabled,
            matchers: config.rules.iter().map(Matcher::compile).collect(),
        }
    }

    /// Index of the first rule matching `text`.
    pub fn first_match(&self, text: &str) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        self.matchers.iter().position(|m| m.is_match(text))
    }

    /// Forward `content` unchanged, or suppress it on any match.
    pub fn apply(&self, content: String) -> Outbound {
        match self.first_match(&content) {
            Some(rule) => {
                debug!(rule, "Outbound message suppressed");
                crate::metrics::record_outbound_suppressed();
                Outbound::Suppressed
            }
            None => Outbound::Send(content),
        }
    }
}
