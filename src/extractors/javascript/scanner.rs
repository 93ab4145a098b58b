//! Brace matching over JavaScript/TypeScript source.
//!
//! A tagged state machine walks the bytes and reports which of them are
//! structural code, so brace depth is only ever adjusted outside strings
//! and comments. `${...}` interpolation inside template literals is opaque:
//! the whole template is skipped without tracking nested braces, a known
//! simplification.

/// Lexical context of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    SingleQuote,
    DoubleQuote,
    Template,
    LineComment,
    BlockComment,
}

/// One scanner advance: how many bytes were consumed, and whether the
/// first of them counts as structural code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub consumed: usize,
    pub in_code: bool,
}

impl Step {
    fn code() -> Self {
        Self {
            consumed: 1,
            in_code: true,
        }
    }

    fn skip(consumed: usize) -> Self {
        Self {
            consumed,
            in_code: false,
        }
    }
}

/// Re-entrant lexical scanner; create one per match.
#[derive(Debug)]
pub struct CodeScanner {
    state: ScanState,
}

impl CodeScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Normal,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Advance over `byte`, with one byte of lookahead for the two-byte
    /// tokens (`//`, `/*`, `*/`, escapes).
    pub fn step(&mut self, byte: u8, lookahead: Option<u8>) -> Step {
        match self.state {
            ScanState::Normal => match byte {
                b'\'' => {
                    self.state = ScanState::SingleQuote;
                    Step::skip(1)
                }
                b'"' => {
                    self.state = ScanState::DoubleQuote;
                    Step::skip(1)
                }
                b'`' => {
                    self.state = ScanState::Template;
                    Step::skip(1)
                }
                b'/' if lookahead == Some(b'/') => {
                    self.state = ScanState::LineComment;
                    Step::skip(2)
                }
                b'/' if lookahead == Some(b'*') => {
                    self.state = ScanState::BlockComment;
                    Step::skip(2)
                }
                _ => Step::code(),
            },
            ScanState::SingleQuote => match byte {
                b'\\' if lookahead.is_some() => Step::skip(2),
                b'\'' => {
                    self.state = ScanState::Normal;
                    Step::skip(1)
                }
                _ => Step::skip(1),
            },
            ScanState::DoubleQuote => match byte {
                b'\\' if lookahead.is_some() => Step::skip(2),
                b'"' => {
                    self.state = ScanState::Normal;
                    Step::skip(1)
                }
                _ => Step::skip(1),
            },
            ScanState::Template => match byte {
                b'\\' if lookahead.is_some() => Step::skip(2),
                b'`' => {
                    self.state = ScanState::Normal;
                    Step::skip(1)
                }
                _ => Step::skip(1),
            },
            ScanState::LineComment => {
                if byte == b'\n' {
                    self.state = ScanState::Normal;
                }
                Step::skip(1)
            }
            ScanState::BlockComment => {
                if byte == b'*' && lookahead == Some(b'/') {
                    self.state = ScanState::Normal;
                    Step::skip(2)
                } else {
                    Step::skip(1)
                }
            }
        }
    }
}

impl Default for CodeScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a block capture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    /// Byte offset one past the matching close brace.
    Closed(usize),
    /// No opening brace between `from` and end of input.
    NoBrace,
    /// An opening brace was seen but depth never returned to zero.
    Unterminated,
}

/// Scan forward from `from`, find the first structural `{`, and return the
/// offset just past its matching `}`. Braces inside strings, comments, and
/// template literals never affect depth.
pub fn find_block_end(source: &str, from: usize) -> BlockEnd {
    let bytes = source.as_bytes();
    let mut scanner = CodeScanner::new();
    let mut depth = 0usize;
    let mut seen_open = false;
    let mut i = from;

    while i < bytes.len() {
        let step = scanner.step(bytes[i], bytes.get(i + 1).copied());
        if step.in_code {
            match bytes[i] {
                b'{' => {
                    depth += 1;
                    seen_open = true;
                }
                // Stray closers before the first open are ignored.
                b'}' if seen_open => {
                    depth -= 1;
                    if depth == 0 {
                        return BlockEnd::Closed(i + 1);
                    }
                }
                _ => {}
            }
        }
        i += step.consumed;
    }

    if seen_open {
        BlockEnd::Unterminated
    } else {
        BlockEnd::NoBrace
    }
}
