//! Declaration extraction: source text in, declaration text out.
//!
//! The pipeline runs scanner → classifier → import resolver and composes the
//! result into one document:
//!
//! ```text
//! import type { ... } from '...'     (only modules with used bindings)
//!
//! /** doc comment */                 (when kept)
//! export declare ...
//! ```
//!
//! Every stage is pure and holds no state between files.

pub mod classifier;
pub mod imports;
pub mod inference;
pub mod lexer;
pub mod scanner;

pub use classifier::{classify, DeclaredSymbol, SymbolKind};
pub use imports::{resolve_imports, used_type_names, ImportBindings};
pub use inference::{infer_value_type, FallbackType};
pub use scanner::{scan, BlockKind, RawBlock, ScanOutput};

/// Knobs for a single extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub fallback_type: FallbackType,
    pub keep_comments: bool,
}

impl ExtractOptions {
    pub fn new(fallback_type: FallbackType, keep_comments: bool) -> Self {
        Self {
            fallback_type,
            keep_comments,
        }
    }
}

/// Canonical declarations of `source`, in source order.
pub fn extract_symbols(source: &str, options: &ExtractOptions) -> (Vec<DeclaredSymbol>, Vec<String>) {
    let ScanOutput { blocks, imports } = scan(source);
    let symbols = blocks
        .iter()
        .filter_map(|block| classify(block, options.fallback_type))
        .map(|mut symbol| {
            if !options.keep_comments {
                symbol.comment = None;
            }
            symbol
        })
        .collect();
    (symbols, imports)
}

/// Produces the declaration document for one source file. An empty string
/// means the file has nothing to declare.
pub fn generate_dts(source: &str, options: &ExtractOptions) -> String {
    let (symbols, import_statements) = extract_symbols(source, options);
    if symbols.is_empty() {
        return String::new();
    }

    let bindings = ImportBindings::from_statements(import_statements.iter().map(String::as_str));
    let used = used_type_names(symbols.iter().map(|s| s.text.as_str()));
    let import_lines = resolve_imports(&bindings, &used);

    let mut out = String::new();
    if !import_lines.is_empty() {
        out.push_str(&import_lines.join("\n"));
        out.push_str("\n\n");
    }
    let declarations: Vec<String> = symbols.iter().map(DeclaredSymbol::render).collect();
    out.push_str(&declarations.join("\n"));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn options() -> ExtractOptions {
        ExtractOptions::new(FallbackType::Any, true)
    }

    #[test]
    fn test_no_exports_yields_empty_document() {
        let source = indoc! {"
            import { helper } from './helper'
            const local = helper()
            function run() {
              return local
            }
        "};
        assert_eq!(generate_dts(source, &options()), "");
    }

    #[test]
    fn test_full_document() {
        let source = indoc! {"
            import type { Comment, Unused } from './types'
            import { api } from './api'

            export const defaultHeaders = {
              'Content-Type': 'application/json',
            }

            export interface CommentsResponse {
              comments: Comment[]
            }

            /**
             * Fetch comments for a post
             */
            export async function fetchComments(postId: number): Promise<CommentsResponse> {
              return api.get(`/posts/${postId}/comments`)
            }
        "};
        let expected = indoc! {"
            import type { Comment } from './types'

            export declare const defaultHeaders: {
              'Content-Type': 'application/json';
            };
            export declare interface CommentsResponse {
              comments: Comment[]
            }
            /**
             * Fetch comments for a post
             */
            export declare function fetchComments(postId: number): Promise<CommentsResponse>;
        "};
        assert_eq!(generate_dts(source, &options()), expected);
    }

    #[test]
    fn test_comments_dropped_when_disabled() {
        let source = "/** docs */\nexport const a = 1\n";
        let out = generate_dts(source, &ExtractOptions::new(FallbackType::Any, false));
        assert_eq!(out, "export declare const a: 1;\n");
    }

    #[test]
    fn test_unused_import_module_is_omitted() {
        let source = indoc! {"
            import type { Comment } from './types'
            export const n = 1
        "};
        assert_eq!(generate_dts(source, &options()), "export declare const n: 1;\n");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let source = indoc! {"
            import { A, B } from './ab'
            export function f(a: A, b: B = {}): void {}
        "};
        let first = generate_dts(source, &options());
        assert_eq!(first, generate_dts(source, &options()));
        assert!(first.starts_with("import type { A, B } from './ab'\n\n"));
    }
}
