//! Turns raw blocks into canonical declaration text.
//!
//! Implementation bodies and default values are stripped, object literal
//! constants get a structural type, and everything without an implementation
//! (interfaces, type aliases, re-exports) passes through. Blocks that match no
//! known shape are dropped rather than reported.

use super::inference::{infer_value_type, literal_type, FallbackType};
use super::lexer::{
    collapse_whitespace, find_assignment, find_top_level, leading_ident, matching_close,
    split_top_level, strip_line_comments,
};
use super::scanner::{BlockKind, RawBlock};

/// Canonical kind of an emitted declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Const,
    Function,
    Interface,
    Type,
    ReExport,
    Other,
}

/// A rendered declaration plus the comment that documents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSymbol {
    pub kind: SymbolKind,
    pub comment: Option<String>,
    pub text: String,
}

impl DeclaredSymbol {
    /// Comment (if any) directly above the declaration.
    pub fn render(&self) -> String {
        match &self.comment {
            Some(comment) => format!("{comment}\n{}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Classifies one block. Returns `None` for shapes that produce no declaration.
pub fn classify(block: &RawBlock, fallback: FallbackType) -> Option<DeclaredSymbol> {
    let (kind, text) = match block.kind {
        BlockKind::Const => (SymbolKind::Const, variable(&block.body, "const", fallback)?),
        BlockKind::Let => (SymbolKind::Const, variable(&block.body, "let", fallback)?),
        BlockKind::Var => (SymbolKind::Const, variable(&block.body, "var", fallback)?),
        BlockKind::Function => (SymbolKind::Function, function(&block.body)?),
        BlockKind::Interface if block.exported => (SymbolKind::Interface, ambient(&block.body)?),
        BlockKind::TypeAlias if block.exported => (SymbolKind::Type, ambient(&block.body)?),
        BlockKind::Interface | BlockKind::TypeAlias => return None,
        BlockKind::ReExport => (SymbolKind::ReExport, block.body.clone()),
        BlockKind::Other => (SymbolKind::Other, terminated(&block.body)),
    };

    Some(DeclaredSymbol {
        kind,
        comment: block.comment.clone(),
        text,
    })
}

fn declaration_head<'a>(code: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = code.trim_start().strip_prefix("export")?.trim_start();
    let rest = rest.strip_prefix("async").map_or(rest, str::trim_start);
    rest.strip_prefix(keyword).map(str::trim_start)
}

fn variable(body: &str, keyword: &str, fallback: FallbackType) -> Option<String> {
    let code = strip_line_comments(body);
    let rest = declaration_head(&code, keyword)?.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest);

    let (target, init) = match find_assignment(rest) {
        Some(eq) => (&rest[..eq], Some(rest[eq + 1..].trim())),
        None => (rest, None),
    };
    let (name, annotation) = match find_top_level(target, |_, c| c == ':') {
        Some(colon) => (target[..colon].trim(), Some(target[colon + 1..].trim())),
        None => (target.trim(), None),
    };
    let name = name.trim_end_matches('!');
    let annotation = annotation.filter(|a| !a.is_empty()).map(str::to_string);

    // Destructuring patterns have no single name to declare.
    if leading_ident(name) != Some(name) {
        return None;
    }

    let ty = match init.filter(|i| !i.is_empty()) {
        None => annotation.unwrap_or_else(|| "any".to_string()),
        Some(init) if init.starts_with('{') => object_type(init, fallback, 0),
        Some(init) => literal_type(init)
            .or(annotation)
            .unwrap_or_else(|| fallback.as_str().to_string()),
    };

    Some(format!("export declare {keyword} {name}: {ty};"))
}

/// Structural type for an object literal, one `key: type;` line per field.
fn object_type(literal: &str, fallback: FallbackType, depth: usize) -> String {
    let inner = match matching_close(literal, 0) {
        Some(close) => &literal[1..close],
        None => &literal[1..],
    };

    let fields: Vec<String> = split_top_level(inner, ',')
        .into_iter()
        .filter_map(|field| field_type(field, fallback, depth + 1))
        .collect();
    if fields.is_empty() {
        return "{}".to_string();
    }

    let pad = "  ".repeat(depth + 1);
    let lines: Vec<String> = fields.iter().map(|f| format!("{pad}{f}")).collect();
    format!("{{\n{}\n{}}}", lines.join("\n"), "  ".repeat(depth))
}

fn field_type(field: &str, fallback: FallbackType, depth: usize) -> Option<String> {
    let field = skip_leading_block_comments(field);
    if field.is_empty() || field.starts_with("...") {
        return None;
    }

    let Some(colon) = find_top_level(field, |_, c| c == ':') else {
        // Shorthand `name` or method `name() {}`: the key is all we can see.
        let key = leading_ident(field)?;
        return Some(format!("{key}: {};", fallback.as_str()));
    };

    let key = field[..colon].trim();
    let value = field[colon + 1..].trim();
    let ty = if value.starts_with('{') {
        object_type(value, fallback, depth)
    } else {
        infer_value_type(value, fallback)
    };
    Some(format!("{key}: {ty};"))
}

fn skip_leading_block_comments(mut text: &str) -> &str {
    text = text.trim();
    while text.starts_with("/*") {
        match text.find("*/") {
            Some(end) => text = text[end + 2..].trim_start(),
            None => return "",
        }
    }
    text
}

fn function(body: &str) -> Option<String> {
    let code = strip_line_comments(body);
    let rest = declaration_head(&code, "function")?;
    let rest = rest.trim_start_matches('*').trim_start();

    let name = leading_ident(rest)?;
    let mut tail = rest[name.len()..].trim_start();

    let mut generics = "";
    if tail.starts_with('<') {
        let close = matching_close(tail, 0)?;
        generics = &tail[..=close];
        tail = tail[close + 1..].trim_start();
    }

    if !tail.starts_with('(') {
        return None;
    }
    let close = matching_close(tail, 0)?;
    let params: Vec<String> = split_top_level(&tail[1..close], ',')
        .into_iter()
        .map(|param| collapse_whitespace(strip_default(param)))
        .collect();

    let after = tail[close + 1..].trim_start();
    let returns = after
        .strip_prefix(':')
        .map(return_type)
        .filter(|ty| !ty.is_empty())
        .map(|ty| format!(": {ty}"))
        .unwrap_or_default();

    Some(format!(
        "export declare function {name}{}({}){returns};",
        collapse_whitespace(generics),
        params.join(", ")
    ))
}

fn strip_default(param: &str) -> &str {
    match find_assignment(param) {
        Some(eq) => param[..eq].trim_end(),
        None => param,
    }
}

/// Return type text up to the function body (or the end of a bodiless
/// overload signature).
fn return_type(text: &str) -> String {
    let end = find_top_level(text, |idx, c| match c {
        ';' => true,
        '{' => {
            let before = text[..idx].trim_end();
            !before.is_empty()
                && !before.ends_with(['|', '&', ':', ',', '<', '('])
                && !before.ends_with("=>")
        }
        _ => false,
    })
    .unwrap_or(text.len());
    collapse_whitespace(&text[..end])
}

fn ambient(body: &str) -> Option<String> {
    let rest = body.strip_prefix("export")?.trim_start();
    Some(format!("export declare {rest}"))
}

fn terminated(body: &str) -> String {
    if body.ends_with(';') {
        body.to_string()
    } else {
        format!("{body};")
    }
}
