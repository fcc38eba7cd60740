//! Line-oriented declaration scanner.
//!
//! Partitions source text into raw declaration blocks, each carrying the
//! documentation comment that immediately preceded it. Import statements are
//! collected separately and passed through untouched. Everything else (plain
//! code, local functions, blank lines) is skipped.

use super::lexer::{is_ident_char, leading_ident, matching_close, strip_line_comments, LexState};

/// Kind of construct a raw block opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Const,
    Let,
    Var,
    Function,
    Interface,
    TypeAlias,
    ReExport,
    Other,
}

/// One unclassified top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub comment: Option<String>,
    pub body: String,
    pub kind: BlockKind,
    pub exported: bool,
}

/// Everything the scanner keeps from a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub blocks: Vec<RawBlock>,
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opening {
    Import,
    Declaration,
}

#[derive(Debug)]
struct OpenBlock {
    opening: Opening,
    text: String,
    depth: i32,
    lex: LexState,
}

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    InComment {
        keep: bool,
    },
    InDeclaration(OpenBlock),
}

/// Scans `source` into raw blocks in source order.
pub fn scan(source: &str) -> ScanOutput {
    let lines: Vec<&str> = source.lines().collect();
    let mut scanner = Scanner::default();
    for (idx, line) in lines.iter().enumerate() {
        scanner.feed(line, lines.get(idx + 1).copied());
    }
    scanner.finish()
}

#[derive(Debug, Default)]
struct Scanner {
    state: ScanState,
    comment: Option<String>,
    comment_buf: String,
    output: ScanOutput,
}

impl Scanner {
    fn feed(&mut self, line: &str, next: Option<&str>) {
        match std::mem::take(&mut self.state) {
            ScanState::Idle => self.idle(line, next),
            ScanState::InComment { keep } => self.in_comment(line, keep),
            ScanState::InDeclaration(block) => self.extend(block, line, next),
        }
    }

    fn idle(&mut self, line: &str, next: Option<&str>) {
        let trimmed = line.trim();

        if trimmed.starts_with("/**") {
            // A new doc block replaces whatever was pending.
            self.comment = None;
            self.comment_buf = line.to_string();
            if closes_on_open_line(trimmed) {
                self.comment = Some(std::mem::take(&mut self.comment_buf));
            } else {
                self.state = ScanState::InComment { keep: true };
            }
        } else if trimmed.starts_with("/*") {
            if !closes_on_open_line(trimmed) {
                self.state = ScanState::InComment { keep: false };
            }
        } else if let Some(opening) = opening(trimmed) {
            let block = OpenBlock {
                opening,
                text: String::new(),
                depth: 0,
                lex: LexState::default(),
            };
            self.extend(block, line, next);
        } else if !trimmed.is_empty() && !trimmed.starts_with("//") {
            self.comment = None;
        }
    }

    fn in_comment(&mut self, line: &str, keep: bool) {
        if keep {
            self.comment_buf.push('\n');
            self.comment_buf.push_str(line);
        }
        if line.contains("*/") {
            if keep {
                self.comment = Some(std::mem::take(&mut self.comment_buf));
            }
        } else {
            self.state = ScanState::InComment { keep };
        }
    }

    fn extend(&mut self, mut block: OpenBlock, line: &str, next: Option<&str>) {
        block.text.push_str(line);
        block.text.push('\n');
        block.depth += block.lex.bracket_delta(line);

        if block.depth > 0 || !block.lex.is_code() || continues(line, next) {
            self.state = ScanState::InDeclaration(block);
        } else {
            self.close(block);
        }
    }

    fn close(&mut self, block: OpenBlock) {
        let body = block.text.trim().to_string();
        match block.opening {
            Opening::Import => {
                self.comment = None;
                self.output.imports.push(body);
            }
            Opening::Declaration => {
                let (kind, exported) = block_kind(&body);
                self.output.blocks.push(RawBlock {
                    comment: self.comment.take(),
                    body,
                    kind,
                    exported,
                });
            }
        }
    }

    fn finish(mut self) -> ScanOutput {
        // Input that ends mid-declaration still yields the partial block.
        if let ScanState::InDeclaration(block) = std::mem::take(&mut self.state) {
            self.close(block);
        }
        self.output
    }
}

fn closes_on_open_line(trimmed: &str) -> bool {
    trimmed.len() > 3 && trimmed[2..].contains("*/")
}

/// Whether a declaration that is balanced after `line` still continues on the
/// next line.
fn continues(line: &str, next: Option<&str>) -> bool {
    let Some(next) = next else {
        return false;
    };
    let code = strip_line_comments(line);
    let code = code.trim_end();
    let dangling = [",", "=", "|", "&", "=>", ":"]
        .iter()
        .any(|token| code.ends_with(token));
    let next = next.trim_start();
    dangling
        || next.starts_with('|')
        || next.starts_with('&')
        || (next.starts_with('.') && !next.starts_with("..."))
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| !rest.starts_with(is_ident_char))
}

/// Text after `keyword` when `text` starts with it as a whole word.
fn after_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    starts_with_keyword(text, keyword).then(|| text[keyword.len()..].trim_start())
}

fn opening(trimmed: &str) -> Option<Opening> {
    if let Some(rest) = after_keyword(trimmed, "import") {
        if rest.starts_with('(') || rest.starts_with('.') || trimmed.starts_with("import.") {
            return None;
        }
        return Some(Opening::Import);
    }
    if starts_with_keyword(trimmed, "export") {
        return Some(Opening::Declaration);
    }
    if let Some(rest) = after_keyword(trimmed, "interface") {
        return leading_ident(rest).map(|_| Opening::Declaration);
    }
    if let Some(rest) = after_keyword(trimmed, "type") {
        let name = leading_ident(rest)?;
        let after = rest[name.len()..].trim_start();
        if after.starts_with('=') || after.starts_with('<') {
            return Some(Opening::Declaration);
        }
    }
    None
}

/// Decides the opening keyword kind and export status of a closed block.
fn block_kind(body: &str) -> (BlockKind, bool) {
    let Some(rest) = after_keyword(body, "export") else {
        let kind = if starts_with_keyword(body, "interface") {
            BlockKind::Interface
        } else {
            BlockKind::TypeAlias
        };
        return (kind, false);
    };

    if rest.starts_with('*') {
        return (BlockKind::ReExport, true);
    }
    if rest.starts_with('{') {
        return (export_list_kind(rest), true);
    }
    if let Some(list) = after_keyword(rest, "type").filter(|r| r.starts_with('{')) {
        return (export_list_kind(list), true);
    }

    let rest = after_keyword(rest, "async").unwrap_or(rest);
    let kind = match leading_ident(rest) {
        Some("const") if after_keyword(rest, "const").is_some_and(|r| r.starts_with("enum")) => {
            BlockKind::Other
        }
        Some("const") => BlockKind::Const,
        Some("let") => BlockKind::Let,
        Some("var") => BlockKind::Var,
        Some("function") => BlockKind::Function,
        Some("interface") => BlockKind::Interface,
        Some("type") => BlockKind::TypeAlias,
        _ => BlockKind::Other,
    };
    (kind, true)
}

/// `export { a, b } from './x'` re-exports; a bare `export { a, b }` does not.
fn export_list_kind(list: &str) -> BlockKind {
    let has_from = matching_close(list, 0)
        .map(|close| list[close + 1..].trim_start())
        .is_some_and(|tail| starts_with_keyword(tail, "from"));
    if has_from {
        BlockKind::ReExport
    } else {
        BlockKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(output: &ScanOutput) -> Vec<BlockKind> {
        output.blocks.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_plain_code_is_ignored() {
        let output = scan(indoc! {"
            const local = 1
            function helper() {
              return local
            }
        "});
        assert!(output.blocks.is_empty());
        assert!(output.imports.is_empty());
    }

    #[test]
    fn test_nested_braces_close_only_at_depth_zero() {
        let output = scan(indoc! {"
            export const config = {
              server: {
                port: 8080,
              },
              name: 'app',
            }
            export const after = 1
        "});
        assert_eq!(output.blocks.len(), 2);
        assert!(output.blocks[0].body.ends_with("name: 'app',\n}"));
        assert_eq!(output.blocks[1].body, "export const after = 1");
    }

    #[test]
    fn test_braces_in_strings_do_not_affect_depth() {
        let output = scan(indoc! {"
            export const open = '{'
            export const close = \"}\"
        "});
        assert_eq!(output.blocks.len(), 2);
    }

    #[test]
    fn test_comment_attaches_to_following_declaration() {
        let output = scan(indoc! {"
            /**
             * Adds two numbers.
             */
            export function add(a: number, b: number): number {
              return a + b
            }
        "});
        assert_eq!(output.blocks.len(), 1);
        assert_eq!(
            output.blocks[0].comment.as_deref(),
            Some("/**\n * Adds two numbers.\n */")
        );
        assert_eq!(output.blocks[0].kind, BlockKind::Function);
    }

    #[test]
    fn test_new_comment_replaces_pending_comment() {
        let output = scan(indoc! {"
            /** first */
            /** second */
            export const x = 1
        "});
        assert_eq!(output.blocks[0].comment.as_deref(), Some("/** second */"));
    }

    #[test]
    fn test_comment_on_local_code_is_not_carried() {
        let output = scan(indoc! {"
            /** helper docs */
            const helper = 1

            export const x = helper
        "});
        assert_eq!(output.blocks[0].comment, None);
    }

    #[test]
    fn test_imports_are_collected_separately() {
        let output = scan(indoc! {"
            import type { Comment } from './types'
            import {
              a,
              b,
            } from './lib'
            export const x = 1
        "});
        assert_eq!(output.imports.len(), 2);
        assert!(output.imports[1].starts_with("import {"));
        assert_eq!(output.blocks.len(), 1);
    }

    #[test]
    fn test_brace_in_regex_literal_does_not_open_block() {
        let output = scan(indoc! {"
            export const re = /[{]/
            export const a = 1
            export function f(): void {}
        "});
        assert_eq!(
            kinds(&output),
            vec![BlockKind::Const, BlockKind::Const, BlockKind::Function]
        );
        assert_eq!(output.blocks[0].body, "export const re = /[{]/");
    }

    #[test]
    fn test_dynamic_import_is_not_an_import_statement() {
        let output = scan("import('./lazy')\nimport.meta.url\n");
        assert!(output.imports.is_empty());
    }

    #[test]
    fn test_trailing_comma_keeps_block_open() {
        let output = scan(indoc! {"
            export function make(
              a: string,
              b: number,
            ): void {}
        "});
        assert_eq!(output.blocks.len(), 1);
        assert!(output.blocks[0].body.contains("b: number"));
    }

    #[test]
    fn test_input_ending_mid_literal_still_emits() {
        let output = scan("export const partial = {\n  a: 1,");
        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.blocks[0].body, "export const partial = {\n  a: 1,");
    }

    #[test]
    fn test_union_continuation_lines() {
        let output = scan(indoc! {"
            export type Method =
              | 'GET'
              | 'POST'
            export const y = 2
        "});
        assert_eq!(output.blocks.len(), 2);
        assert!(output.blocks[0].body.ends_with("| 'POST'"));
    }

    #[test]
    fn test_block_kinds() {
        let output = scan(indoc! {"
            export const a = 1
            export let b = 2
            export var c = 3
            export async function d() {}
            export interface E {}
            export type F = string
            export * from './g'
            export { h } from './h'
            export { i }
            export default j
            export const enum K { A }
            interface Local {}
        "});
        assert_eq!(
            kinds(&output),
            vec![
                BlockKind::Const,
                BlockKind::Let,
                BlockKind::Var,
                BlockKind::Function,
                BlockKind::Interface,
                BlockKind::TypeAlias,
                BlockKind::ReExport,
                BlockKind::ReExport,
                BlockKind::Other,
                BlockKind::Other,
                BlockKind::Other,
                BlockKind::Interface,
            ]
        );
        assert!(!output.blocks.last().unwrap().exported);
    }

    #[test]
    fn test_plain_block_comment_is_skipped() {
        let output = scan(indoc! {"
            /** docs */
            /*
            export const inside = 1
            */
            export const x = 1
        "});
        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.blocks[0].comment.as_deref(), Some("/** docs */"));
    }
}
