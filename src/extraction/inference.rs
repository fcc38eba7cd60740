//! Literal-shape type inference for initializer expressions.
//!
//! The expression is never evaluated. Rules are tried in priority order and
//! the first one that matches decides the type text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexer::CodeChars;

/// Type used when an initializer is not a recognizable literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackType {
    #[default]
    Any,
    String,
}

impl FallbackType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
        }
    }
}

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-?(?:0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|(?:\d[\d_]*\.?[\d_]*|\.\d[\d_]*)(?:[eE][+-]?\d+)?)n?$",
    )
    .expect("numeric literal pattern is valid")
});

/// Infers the type text of a literal expression, falling back to the
/// configured default when the expression is not a recognized literal.
pub fn infer_value_type(expr: &str, fallback: FallbackType) -> String {
    literal_type(expr).unwrap_or_else(|| fallback.as_str().to_string())
}

/// Type text for `expr` when it is a recognized literal.
pub fn literal_type(expr: &str) -> Option<String> {
    let expr = normalize(expr);

    if expr == "true" || expr == "false" || is_numeric_literal(expr) || is_string_literal(expr)
    {
        Some(expr.to_string())
    } else if expr.starts_with('[') && expr.ends_with(']') {
        Some("any[]".to_string())
    } else {
        None
    }
}

fn normalize(expr: &str) -> &str {
    let expr = expr.trim().trim_end_matches(';').trim_end();
    expr.strip_suffix("as const")
        .map(str::trim_end)
        .unwrap_or(expr)
}

fn is_numeric_literal(expr: &str) -> bool {
    !expr.is_empty() && NUMERIC_LITERAL.is_match(expr)
}

/// A single quoted string spanning the whole expression. `'a' + 'b'` starts
/// and ends with a quote but is not one literal.
fn is_string_literal(expr: &str) -> bool {
    let Some(quote) = expr.chars().next().filter(|c| matches!(c, '\'' | '"')) else {
        return false;
    };
    if expr.len() < 2 || !expr.ends_with(quote) {
        return false;
    }
    // The only code character a lone literal has is none at all.
    CodeChars::new(expr).next().is_none()
}
