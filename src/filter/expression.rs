//! Tag expressions accepted by the filter
//!
//! Only a single literal tag is supported: no boolean combinators and no
//! wildcards. Characters that would mean something in a richer expression
//! language are rejected rather than matched literally.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::Tag;

const RESERVED: &[char] = &['*', '?', ',', '(', ')', '!', '&', '|', '~'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagExpressionError {
    #[error("tag expression `{0}` contains whitespace; only a single tag is supported")]
    Whitespace(String),

    #[error("tag expression `{0}` has no tag name")]
    EmptyName(String),

    #[error("tag expression `{0}` has more than one `@`")]
    RepeatedMarker(String),

    #[error("tag expression `{expression}` contains `{found}`; combinators and wildcards are not supported")]
    Reserved { expression: String, found: char },
}

/// A single literal tag to match against feature and scenario tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExpression {
    tag: Tag,
}

impl TagExpression {
    /// Parse user input. Empty or blank input means "no expression".
    pub fn parse(raw: &str) -> Result<Option<Self>, TagExpressionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(TagExpressionError::Whitespace(trimmed.to_string()));
        }
        if let Some(found) = trimmed.chars().find(|c| RESERVED.contains(c)) {
            return Err(TagExpressionError::Reserved {
                expression: trimmed.to_string(),
                found,
            });
        }

        let name = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if name.is_empty() {
            return Err(TagExpressionError::EmptyName(trimmed.to_string()));
        }
        if name.contains('@') {
            return Err(TagExpressionError::RepeatedMarker(trimmed.to_string()));
        }
        Ok(Some(TagExpression { tag: Tag::new(name) }))
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn matches_any(&self, tags: &[Tag]) -> bool {
        tags.iter().any(|t| t.matches(&self.tag))
    }
}

impl FromStr for TagExpression {
    type Err = TagExpressionError;

    /// Like [`TagExpression::parse`], but blank input is an error
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagExpression::parse(s)?.ok_or_else(|| TagExpressionError::EmptyName(s.to_string()))
    }
}

impl fmt::Display for TagExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tag, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_none() {
        assert_eq!(TagExpression::parse("").unwrap(), None);
        assert_eq!(TagExpression::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_marker_applied() {
        let expr = TagExpression::parse("slow").unwrap().unwrap();
        assert_eq!(expr.tag().as_str(), "@slow");
        let expr = TagExpression::parse(" @Slow ").unwrap().unwrap();
        assert_eq!(expr.to_string(), "@Slow");
        assert!(expr.matches_any(&[Tag::new("@SLOW")]));
    }

    #[test]
    fn test_structurally_invalid() {
        assert!(matches!(
            TagExpression::parse("smoke slow"),
            Err(TagExpressionError::Whitespace(_))
        ));
        assert!(matches!(
            TagExpression::parse("@"),
            Err(TagExpressionError::EmptyName(_))
        ));
        assert!(matches!(
            TagExpression::parse("@@smoke"),
            Err(TagExpressionError::RepeatedMarker(_))
        ));
        assert_eq!(
            TagExpression::parse("@smoke,@slow"),
            Err(TagExpressionError::Reserved {
                expression: "@smoke,@slow".to_string(),
                found: ','
            })
        );
        assert!(TagExpression::parse("~@wip").is_err());
        assert!(TagExpression::parse("sm*").is_err());
    }

    #[test]
    fn test_from_str_rejects_blank() {
        assert!("".parse::<TagExpression>().is_err());
        assert_eq!("wip".parse::<TagExpression>().unwrap().tag(), &Tag::new("@wip"));
    }
}
