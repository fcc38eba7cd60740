//! Import resolution for declaration output.
//!
//! Every import statement of the source is parsed into module → bindings.
//! The rendered declarations are then scanned for type references, and only
//! the bindings they actually use survive, re-emitted as `import type` lines.

use std::collections::HashSet;

use super::lexer::{
    collapse_whitespace, is_ident_char, matching_close, split_top_level, strip_line_comments, CodeChars,
};

/// How a local name was bound by an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// `{ imported }` or `{ imported as local }`
    Named { imported: String },
    /// `import local from '...'`
    Default,
    /// `import * as local from '...'`
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub local: String,
    pub kind: BindingKind,
}

impl Binding {
    fn named(imported: &str, local: &str) -> Self {
        Self {
            local: local.to_string(),
            kind: BindingKind::Named {
                imported: imported.to_string(),
            },
        }
    }

    /// Specifier text inside `import type { ... }`.
    fn specifier(&self) -> Option<String> {
        match &self.kind {
            BindingKind::Named { imported } if *imported == self.local => Some(self.local.clone()),
            BindingKind::Named { imported } => Some(format!("{imported} as {}", self.local)),
            BindingKind::Default => Some(format!("default as {}", self.local)),
            BindingKind::Namespace => None,
        }
    }
}

/// Bindings of one module, in the order they were first imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImports {
    pub module: String,
    pub bindings: Vec<Binding>,
}

/// Module path → locally bound names for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBindings {
    modules: Vec<ModuleImports>,
}

impl ImportBindings {
    pub fn from_statements<'a>(statements: impl IntoIterator<Item = &'a str>) -> Self {
        let mut bindings = Self::default();
        for statement in statements {
            if let Some((module, parsed)) = parse_import(statement) {
                for binding in parsed {
                    bindings.add(&module, binding);
                }
            }
        }
        bindings
    }

    /// Adds a binding, merging with earlier imports of the same module. A
    /// local name is recorded once per module.
    pub fn add(&mut self, module: &str, binding: Binding) {
        let entry = match self.modules.iter().position(|m| m.module == module) {
            Some(idx) => &mut self.modules[idx],
            None => {
                self.modules.push(ModuleImports {
                    module: module.to_string(),
                    bindings: Vec::new(),
                });
                let last = self.modules.len() - 1;
                &mut self.modules[last]
            }
        };
        if !entry.bindings.iter().any(|b| b.local == binding.local) {
            entry.bindings.push(binding);
        }
    }

    pub fn modules(&self) -> &[ModuleImports] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Parses one import statement into its module path and bindings.
///
/// Side-effect imports (`import './polyfill'`) and statements that cannot be
/// read return `None`.
pub fn parse_import(statement: &str) -> Option<(String, Vec<Binding>)> {
    // Comments go first: collapsing would otherwise join them with the code
    // on the following line.
    let text = collapse_whitespace(&strip_line_comments(statement));
    let text = text.trim_end_matches(';').trim_end();
    let rest = text.strip_prefix("import")?.trim_start();

    // `import type X from` is type-only; `import type from` binds `type`.
    let rest = match rest.strip_prefix("type ") {
        Some(after) if !after.trim_start().starts_with("from") => after.trim_start(),
        _ => rest,
    };

    let quote = rest.chars().last().filter(|c| matches!(c, '\'' | '"'))?;
    let body = &rest[..rest.len() - 1];
    let open = body.rfind(quote)?;
    let module = &body[open + 1..];
    let clause = body[..open].trim_end().strip_suffix("from")?.trim();
    if clause.is_empty() {
        return None;
    }

    let mut bindings = Vec::new();
    let (head, named) = match clause.find('{') {
        Some(brace) => {
            let close = matching_close(clause, brace)?;
            (&clause[..brace], Some(&clause[brace + 1..close]))
        }
        None => (clause, None),
    };

    for part in split_top_level(head, ',') {
        if let Some(alias) = part.strip_prefix('*') {
            let local = alias.trim_start().strip_prefix("as")?.trim();
            bindings.push(Binding {
                local: local.to_string(),
                kind: BindingKind::Namespace,
            });
        } else {
            bindings.push(Binding {
                local: part.to_string(),
                kind: BindingKind::Default,
            });
        }
    }

    for specifier in named.map(|n| split_top_level(n, ',')).unwrap_or_default() {
        let specifier = specifier.strip_prefix("type ").map_or(specifier, str::trim_start);
        let binding = match specifier.split_once(" as ") {
            Some((imported, local)) => Binding::named(imported.trim(), local.trim()),
            None => Binding::named(specifier, specifier),
        };
        bindings.push(binding);
    }

    Some((module.to_string(), bindings))
}

/// Identifier tokens in `texts` that look like type references: capitalized
/// names (with or without generic arguments) and the root of qualified names
/// such as `ns.Type`. Strings and comments are not searched.
pub fn used_type_names<'a>(texts: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    let mut used = HashSet::new();
    for text in texts {
        collect_type_names(text, &mut used);
    }
    used
}

fn collect_type_names(text: &str, used: &mut HashSet<String>) {
    let mut tokens: Vec<(usize, usize)> = Vec::new();
    for (idx, c) in CodeChars::new(text) {
        if !is_ident_char(c) {
            continue;
        }
        match tokens.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + c.len_utf8(),
            _ => tokens.push((idx, idx + c.len_utf8())),
        }
    }

    for (start, end) in tokens {
        let token = &text[start..end];
        let preceded_by_dot = text[..start].ends_with('.');
        let qualifier = !preceded_by_dot && text[end..].starts_with('.');
        let capitalized = token.starts_with(|c: char| c.is_ascii_uppercase());
        if capitalized || qualifier {
            used.insert(token.to_string());
        }
    }
}

/// Renders the minimal `import type` block: one line per module whose
/// bindings intersect `used`, in first-import order. Namespace bindings need
/// their own statement form.
pub fn resolve_imports(bindings: &ImportBindings, used: &HashSet<String>) -> Vec<String> {
    let mut lines = Vec::new();
    for module in bindings.modules() {
        let used_bindings = module.bindings.iter().filter(|b| used.contains(&b.local));
        let mut specifiers = Vec::new();
        let mut namespaces = Vec::new();
        for binding in used_bindings {
            match binding.specifier() {
                Some(specifier) => specifiers.push(specifier),
                None => namespaces.push(binding.local.as_str()),
            }
        }

        if !specifiers.is_empty() {
            lines.push(format!(
                "import type {{ {} }} from '{}'",
                specifiers.join(", "),
                module.module
            ));
        }
        for namespace in namespaces {
            lines.push(format!(
                "import type * as {namespace} from '{}'",
                module.module
            ));
        }
    }
    lines
}
