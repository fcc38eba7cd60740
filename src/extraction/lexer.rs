//! Character-level scanning shared by every extraction stage.
//!
//! Nothing in here understands TypeScript grammar. It knows just enough about
//! string quoting, comments and bracket nesting to answer one question for the
//! stages above it: "is this character part of code at the top level of the
//! text?". Braces inside `'...'`, `"..."`, template literals and comments never
//! count towards depth.

use std::iter::Peekable;
use std::str::CharIndices;

/// Lexical state that survives across line boundaries.
///
/// Single and double quoted strings cannot span lines, so they are dropped at
/// the end of every line. Template literals and block comments carry over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexState {
    quote: Option<char>,
    block_comment: bool,
}

impl LexState {
    /// True when the next character starts in plain code.
    pub fn is_code(&self) -> bool {
        self.quote.is_none() && !self.block_comment
    }

    /// Net bracket depth change over one line (`{`, `(`, `[` open; their
    /// counterparts close), updating the carried state.
    pub fn bracket_delta(&mut self, line: &str) -> i32 {
        let mut chars = CodeChars::resume(line, *self);
        let delta = chars.by_ref().map(|(_, c)| bracket_weight(c)).sum();
        *self = chars.state;
        if matches!(self.quote, Some('\'' | '"')) {
            self.quote = None;
        }
        delta
    }
}

/// Characters after which a `/` opens a regular expression literal rather
/// than dividing. `<` and `>` are left out so JSX closing tags stay code.
const REGEX_PRECEDERS: [char; 17] = [
    '(', ',', '=', ':', '[', '!', '&', '|', '?', '{', '}', ';', '+', '-', '*', '%', '~',
];

/// Iterator over the characters of `text` that are code: string contents,
/// quote characters, regex literals and comments are skipped. Yields byte
/// offsets into `text`.
pub struct CodeChars<'a> {
    chars: Peekable<CharIndices<'a>>,
    state: LexState,
    line_comment: Option<usize>,
    prev: Option<char>,
}

impl<'a> CodeChars<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::resume(text, LexState::default())
    }

    pub fn resume(text: &'a str, state: LexState) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            state,
            line_comment: None,
            prev: None,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn regex_allowed(&self) -> bool {
        self.prev.is_none_or(|prev| REGEX_PRECEDERS.contains(&prev))
    }

    /// Consumes a regex literal body up to its closing `/`. A `/` inside a
    /// `[...]` class does not close it, and the literal never spans lines.
    fn skip_regex(&mut self) {
        let mut in_class = false;
        while let Some((_, c)) = self.chars.next_if(|&(_, n)| n != '\n') {
            match c {
                '\\' => {
                    self.chars.next_if(|&(_, n)| n != '\n');
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => return,
                _ => {}
            }
        }
    }
}

impl Iterator for CodeChars<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, c)) = self.chars.next() {
            if self.state.block_comment {
                if c == '*' && self.chars.next_if(|&(_, n)| n == '/').is_some() {
                    self.state.block_comment = false;
                }
                continue;
            }

            if let Some(quote) = self.state.quote {
                if c == '\\' {
                    self.chars.next();
                } else if c == quote || (c == '\n' && quote != '`') {
                    self.state.quote = None;
                }
                continue;
            }

            match c {
                '\'' | '"' | '`' => {
                    self.state.quote = Some(c);
                    self.prev = Some(c);
                }
                '/' if self.peek_char() == Some('/') => {
                    self.line_comment.get_or_insert(idx);
                    while self.chars.next_if(|&(_, n)| n != '\n').is_some() {}
                }
                '/' if self.peek_char() == Some('*') => {
                    self.chars.next();
                    self.state.block_comment = true;
                }
                '/' if self.regex_allowed() => {
                    self.skip_regex();
                    self.prev = Some(c);
                }
                _ => {
                    if !c.is_whitespace() {
                        self.prev = Some(c);
                    }
                    return Some((idx, c));
                }
            }
        }
        None
    }
}

fn bracket_weight(c: char) -> i32 {
    match c {
        '{' | '(' | '[' => 1,
        '}' | ')' | ']' => -1,
        _ => 0,
    }
}

/// Tracks nesting while walking code characters. Angle brackets are tracked
/// separately so that `=>` and comparison-free generic lists both work.
#[derive(Debug, Default)]
struct Nesting {
    brackets: i32,
    angles: i32,
    prev: Option<char>,
}

impl Nesting {
    fn step(&mut self, c: char) {
        match c {
            '<' => self.angles += 1,
            '>' if self.prev != Some('=') && self.angles > 0 => self.angles -= 1,
            _ => self.brackets += bracket_weight(c),
        }
        self.prev = Some(c);
    }

    fn at_top(&self) -> bool {
        self.brackets == 0 && self.angles == 0
    }
}

/// Splits `text` on `sep` wherever the separator sits outside strings,
/// comments, brackets and generic argument lists. Pieces are trimmed and empty
/// pieces (e.g. after a trailing comma) are dropped.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;

    for (idx, c) in CodeChars::new(text) {
        if c == sep && nesting.at_top() {
            pieces.push(&text[start..idx]);
            start = idx + c.len_utf8();
            nesting.prev = Some(c);
            continue;
        }
        nesting.step(c);
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Byte offset of the first top-level code character satisfying `pred`,
/// which receives the character's offset and the character itself.
pub fn find_top_level(text: &str, pred: impl Fn(usize, char) -> bool) -> Option<usize> {
    let mut nesting = Nesting::default();
    for (idx, c) in CodeChars::new(text) {
        if nesting.at_top() && pred(idx, c) {
            return Some(idx);
        }
        nesting.step(c);
    }
    None
}

/// Byte offset of the first top-level assignment `=`, ignoring `=>`, `==`,
/// `<=`, `>=` and `!=`.
pub fn find_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut nesting = Nesting::default();
    for (idx, c) in CodeChars::new(text) {
        if c == '=' && nesting.at_top() {
            let next = bytes.get(idx + 1).copied();
            let prev = idx.checked_sub(1).map(|p| bytes[p]);
            let compound = matches!(next, Some(b'>' | b'='))
                || matches!(prev, Some(b'=' | b'!' | b'<' | b'>'));
            if !compound {
                return Some(idx);
            }
        }
        nesting.step(c);
    }
    None
}

/// Given the offset of an opening `{`, `(`, `[` or `<`, returns the offset of
/// its matching close, or `None` when the text ends first.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let opener = text[open..].chars().next()?;
    let closer = match opener {
        '{' => '}',
        '(' => ')',
        '[' => ']',
        '<' => '>',
        _ => return None,
    };

    let mut depth = 0i32;
    let mut prev = None;
    for (idx, c) in CodeChars::new(&text[open..]) {
        if c == opener {
            depth += 1;
        } else if c == closer && !(closer == '>' && prev == Some('=')) {
            depth -= 1;
            if depth == 0 {
                return Some(open + idx);
            }
        }
        prev = Some(c);
    }
    None
}

/// Removes `//` line comments that sit outside string literals, keeping line
/// structure intact.
pub fn strip_line_comments(text: &str) -> String {
    let mut state = LexState::default();
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let mut chars = CodeChars::resume(line, state);
        chars.by_ref().for_each(drop);
        match chars.line_comment {
            Some(cut) => {
                out.push_str(line[..cut].trim_end());
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
        state.bracket_delta(line);
    }
    out
}

/// True for characters that may appear in a JavaScript identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Leading identifier of `text`, if any.
pub fn leading_ident(text: &str) -> Option<&str> {
    let end = text
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(text.len(), |(idx, _)| idx);
    (end > 0).then(|| &text[..end])
}

/// Collapses every run of whitespace (including newlines) into one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
