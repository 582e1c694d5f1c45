//! Tag selector parsing.
//!
//! The routing layer expresses channel selection as a selector string like
//! `tag:qwen,free,!embedding`: positive tags intersect, `!`-prefixed tags
//! exclude. A selector must carry at least one positive tag — resolving
//! pure exclusions over the whole index is never meaningful.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed tag selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelector {
    /// Tags every result must carry
    pub include: Vec<String>,
    /// Tags no result may carry
    pub exclude: Vec<String>,
}

impl TagSelector {
    /// Parse a selector string, with or without the `tag:` prefix.
    pub fn parse(input: &str) -> Result<Self> {
        let body = input.strip_prefix("tag:").unwrap_or(input);
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for token in body.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.strip_prefix('!') {
                Some(tag) if !tag.trim().is_empty() => {
                    exclude.push(tag.trim().to_lowercase());
                }
                Some(_) => continue,
                None => include.push(token.to_lowercase()),
            }
        }

        if include.is_empty() {
            return Err(Error::Selector(format!(
                "no positive tags in {input:?}"
            )));
        }
        Ok(Self { include, exclude })
    }
}

impl FromStr for TagSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TagSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag:{}", self.include.join(","))?;
        for tag in &self.exclude {
            write!(f, ",!{tag}")?;
        }
        Ok(())
    }
}
