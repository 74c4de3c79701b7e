// SPDX-License-Identifier: Apache-2.0

//! Token scanner for structural gate-level Verilog.
//!
//! The scanner pulls bytes from a `BufReader` one at a time and produces
//! tokens on demand with a single token of lookahead. Line comments are
//! surfaced as `TokenPayload::Comment` tokens rather than being discarded so
//! that the parser can report them to the caller.

use std::fmt;
use std::io::{BufRead, BufReader, Read};

use crate::reader_error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Module,
    Input,
    Output,
    Wire,
    Assign,
    Endmodule,
}

impl Keyword {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "module" => Some(Keyword::Module),
            "input" => Some(Keyword::Input),
            "output" => Some(Keyword::Output),
            "wire" => Some(Keyword::Wire),
            "assign" => Some(Keyword::Assign),
            "endmodule" => Some(Keyword::Endmodule),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Module => "module",
            Keyword::Input => "input",
            Keyword::Output => "output",
            Keyword::Wire => "wire",
            Keyword::Assign => "assign",
            Keyword::Endmodule => "endmodule",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPayload {
    Identifier(String),
    /// Name of an escaped identifier with the leading backslash removed.
    EscapedIdentifier(String),
    Keyword(Keyword),
    /// Single-bit constant, `0`/`1` or a sized form such as `1'b0`.
    Constant(bool),
    OParen,
    CParen,
    Comma,
    Semi,
    Equals,
    Amp,
    Pipe,
    Caret,
    Tilde,
    /// Text following `//` up to the end of the line.
    Comment(String),
}

/// Returns true if `s` can be written without escaping: starts with a letter
/// or underscore and continues with letters, digits and underscores.
pub fn is_simple_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Spelling used for single-bit constants wherever they are reported as a
/// signal name.
pub fn constant_name(value: bool) -> &'static str {
    if value {
        "1'b1"
    } else {
        "1'b0"
    }
}

impl fmt::Display for TokenPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPayload::Identifier(s) => write!(f, "{}", s),
            // Escaped identifiers are terminated by whitespace.
            TokenPayload::EscapedIdentifier(s) => write!(f, "\\{} ", s),
            TokenPayload::Keyword(kw) => write!(f, "{}", kw.as_str()),
            TokenPayload::Constant(value) => write!(f, "{}", constant_name(*value)),
            TokenPayload::OParen => write!(f, "("),
            TokenPayload::CParen => write!(f, ")"),
            TokenPayload::Comma => write!(f, ","),
            TokenPayload::Semi => write!(f, ";"),
            TokenPayload::Equals => write!(f, "="),
            TokenPayload::Amp => write!(f, "&"),
            TokenPayload::Pipe => write!(f, "|"),
            TokenPayload::Caret => write!(f, "^"),
            TokenPayload::Tilde => write!(f, "~"),
            TokenPayload::Comment(s) => write!(f, "//{}\n", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub lineno: u32,
    pub colno: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub limit: Pos,
}

impl Span {
    /// Zero-width span at `pos`.
    pub fn at(pos: Pos) -> Self {
        Span {
            start: pos,
            limit: pos,
        }
    }

    pub fn to_human_string(&self) -> String {
        format!(
            "{}:{}..{}:{}",
            self.start.lineno, self.start.colno, self.limit.lineno, self.limit.colno
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub payload: TokenPayload,
    pub span: Span,
}

/// Lexical extensions that are off unless asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Skip `` `timescale `` directive lines instead of rejecting the
    /// backtick.
    pub skip_timescale: bool,
    /// Skip `/* ... */` comments. Skipped block comments produce no token.
    pub skip_block_comments: bool,
}

impl ScanOptions {
    /// Only the tokens of the structural netlist grammar are accepted.
    pub fn strict() -> Self {
        Self {
            skip_timescale: false,
            skip_block_comments: false,
        }
    }

    /// Tolerates the directive and block comment noise commonly found in
    /// synthesis tool output.
    pub fn permissive() -> Self {
        Self {
            skip_timescale: true,
            skip_block_comments: true,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::strict()
    }
}

pub struct TokenScanner<R: Read> {
    reader: BufReader<R>,
    pub pos: Pos,
    lookahead: Option<Token>,
    done: bool,
    options: ScanOptions,
}

impl<R: Read> TokenScanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ScanOptions::default())
    }

    pub fn with_options(reader: R, options: ScanOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            pos: Pos {
                lineno: 1,
                colno: 1,
            },
            lookahead: None,
            done: false,
            options,
        }
    }
}

impl<'a> TokenScanner<std::io::Cursor<&'a [u8]>> {
    /// Construct a TokenScanner over an in-memory string.
    pub fn from_str(input: &'a str) -> Self {
        Self::new(std::io::Cursor::new(input.as_bytes()))
    }
}

impl<R: Read> TokenScanner<R> {
    #[inline]
    fn peekb(&mut self) -> Option<u8> {
        if self.done {
            return None;
        }
        match self.reader.fill_buf() {
            Ok(buf) => buf.first().copied(),
            Err(e) => {
                log::debug!("TokenScanner: read error treated as end of input: {}", e);
                self.done = true;
                None
            }
        }
    }

    #[inline]
    fn popb(&mut self) -> Option<u8> {
        let b = self.peekb()?;
        if b == b'\n' {
            self.pos.lineno += 1;
            self.pos.colno = 1;
        } else {
            self.pos.colno += 1;
        }
        // Consume exactly one byte.
        self.reader.consume(1);
        Some(b)
    }

    pub fn peekt(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = self.next_token()?;
        }
        Ok(self.lookahead.as_ref())
    }

    pub fn popt(&mut self) -> Result<Option<Token>, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = self.next_token()?;
        }
        Ok(self.lookahead.take())
    }

    fn lexical_error(&self, msg: &str, span: Span) -> ParseError {
        log::debug!("scan error: {} @ {}", msg, span.to_human_string());
        ParseError::lexical(msg, span)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peekb() {
            if b.is_ascii_whitespace() {
                self.popb();
            } else {
                break;
            }
        }
    }

    fn pop_identifier(&mut self, start: Pos) -> Token {
        let mut ident = String::new();
        while let Some(b) = self.peekb() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.popb();
                ident.push(b as char);
            } else {
                break;
            }
        }
        let limit = self.pos;
        let payload = match Keyword::from_str(&ident) {
            Some(kw) => TokenPayload::Keyword(kw),
            None => TokenPayload::Identifier(ident),
        };
        Token {
            payload,
            span: Span { start, limit },
        }
    }

    /// Escaped identifiers run from the backslash up to the next whitespace
    /// byte, which is consumed as the terminator. A `,` also ends the name but
    /// is left in place so that `\y[0], \y[1]` scans as a list. Keywords are
    /// never recognized here: `\wire ` names a signal called `wire`.
    fn pop_escaped_identifier(&mut self, start: Pos) -> Result<Token, ParseError> {
        self.popb(); // Consume the backslash character.
        let mut bytes = Vec::new();
        let limit = loop {
            match self.peekb() {
                Some(b) if b.is_ascii_whitespace() => {
                    let limit = self.pos;
                    self.popb();
                    break limit;
                }
                Some(b',') => break self.pos,
                Some(b) => {
                    self.popb();
                    bytes.push(b);
                }
                None => {
                    return Err(self.lexical_error(
                        "unterminated escaped identifier; expected whitespace after name",
                        Span {
                            start,
                            limit: self.pos,
                        },
                    ));
                }
            }
        };
        let span = Span { start, limit };
        if bytes.is_empty() {
            return Err(self.lexical_error("empty escaped identifier", span));
        }
        let name = String::from_utf8(bytes)
            .map_err(|_| self.lexical_error("escaped identifier is not valid UTF-8", span))?;
        Ok(Token {
            payload: TokenPayload::EscapedIdentifier(name),
            span,
        })
    }

    /// Numbers are only accepted when they denote a single bit: `0`, `1`,
    /// or a width-1 sized literal such as `1'b1`.
    fn pop_constant(&mut self, start: Pos) -> Result<Token, ParseError> {
        let mut num = String::new();
        while let Some(b) = self.peekb() {
            if b.is_ascii_digit() {
                self.popb();
                num.push(b as char);
            } else {
                break;
            }
        }
        let (radix, digits) = if self.peekb() == Some(b'\'') {
            self.popb(); // consume '
            let radix = match self.popb() {
                Some(b'b') | Some(b'B') => 2,
                Some(b'o') | Some(b'O') => 8,
                Some(b'd') | Some(b'D') => 10,
                Some(b'h') | Some(b'H') => 16,
                _ => {
                    return Err(self.lexical_error(
                        &format!("expected base specifier after '{}''", num),
                        Span {
                            start,
                            limit: self.pos,
                        },
                    ));
                }
            };
            if num != "1" {
                return Err(self.lexical_error(
                    &format!(
                        "only single-bit constants are supported; got width {}",
                        num
                    ),
                    Span {
                        start,
                        limit: self.pos,
                    },
                ));
            }
            let mut digits = String::new();
            while let Some(b) = self.peekb() {
                if b.is_ascii_alphanumeric() || b == b'_' || b == b'?' {
                    self.popb();
                    if b != b'_' {
                        digits.push(b as char);
                    }
                } else {
                    break;
                }
            }
            (radix, digits)
        } else {
            (10, num.clone())
        };
        let span = Span {
            start,
            limit: self.pos,
        };
        match u64::from_str_radix(&digits, radix) {
            Ok(0) => Ok(Token {
                payload: TokenPayload::Constant(false),
                span,
            }),
            Ok(1) => Ok(Token {
                payload: TokenPayload::Constant(true),
                span,
            }),
            _ => Err(self.lexical_error(
                &format!(
                    "unsupported constant '{}'; only single-bit 0 and 1 are accepted",
                    digits
                ),
                span,
            )),
        }
    }

    /// Handles everything that starts with '/'. Returns `None` when a block
    /// comment was skipped and scanning should continue.
    fn pop_slash(&mut self, start: Pos) -> Result<Option<Token>, ParseError> {
        self.popb(); // consume '/'
        match self.peekb() {
            Some(b'/') => {
                self.popb();
                let mut bytes = Vec::new();
                while let Some(b) = self.popb() {
                    if b == b'\n' {
                        break;
                    }
                    bytes.push(b);
                }
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                let comment = String::from_utf8_lossy(&bytes).into_owned();
                Ok(Some(Token {
                    payload: TokenPayload::Comment(comment),
                    span: Span {
                        start,
                        limit: self.pos,
                    },
                }))
            }
            Some(b'*') if self.options.skip_block_comments => {
                self.popb(); // consume '*'
                let mut prev = None;
                loop {
                    match self.popb() {
                        Some(b'/') if prev == Some(b'*') => break,
                        Some(b) => prev = Some(b),
                        None => {
                            return Err(self.lexical_error(
                                "unterminated block comment",
                                Span {
                                    start,
                                    limit: self.pos,
                                },
                            ));
                        }
                    }
                }
                log::trace!("TokenScanner: skipped block comment");
                Ok(None)
            }
            Some(b'*') => Err(self.lexical_error(
                "block comments are not supported",
                Span {
                    start,
                    limit: self.pos,
                },
            )),
            _ => Err(self.lexical_error(
                "unexpected '/'",
                Span {
                    start,
                    limit: self.pos,
                },
            )),
        }
    }

    /// Skips a `` `timescale `` line when enabled by the scan options.
    fn skip_directive(&mut self, start: Pos) -> Result<(), ParseError> {
        if !self.options.skip_timescale {
            return Err(self.lexical_error("unexpected character '`'", Span::at(start)));
        }
        self.popb(); // consume backtick
        let mut word = String::new();
        while let Some(b) = self.peekb() {
            if b.is_ascii_alphabetic() || b == b'_' {
                self.popb();
                word.push(b as char);
            } else {
                break;
            }
        }
        if word != "timescale" {
            return Err(self.lexical_error(
                &format!("unsupported directive '`{}'", word),
                Span {
                    start,
                    limit: self.pos,
                },
            ));
        }
        while let Some(b) = self.popb() {
            if b == b'\n' {
                break;
            }
        }
        log::trace!("TokenScanner: skipped `timescale directive line");
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let b = match self.peekb() {
                Some(b) => b,
                None => return Ok(None),
            };
            if b == b'`' {
                self.skip_directive(start)?;
                continue;
            }
            if b == b'/' {
                match self.pop_slash(start)? {
                    Some(tok) => return Ok(Some(tok)),
                    None => continue,
                }
            }
            if b == b'\\' {
                return self.pop_escaped_identifier(start).map(Some);
            }
            if b.is_ascii_alphabetic() || b == b'_' {
                return Ok(Some(self.pop_identifier(start)));
            }
            if b.is_ascii_digit() {
                return self.pop_constant(start).map(Some);
            }
            let payload = match b {
                b'(' => TokenPayload::OParen,
                b')' => TokenPayload::CParen,
                b',' => TokenPayload::Comma,
                b';' => TokenPayload::Semi,
                b'=' => TokenPayload::Equals,
                b'&' => TokenPayload::Amp,
                b'|' => TokenPayload::Pipe,
                b'^' => TokenPayload::Caret,
                b'~' => TokenPayload::Tilde,
                _ => {
                    return Err(self.lexical_error(
                        &format!("unexpected character '{}'", b.escape_ascii()),
                        Span::at(start),
                    ));
                }
            };
            self.popb();
            return Ok(Some(Token {
                payload,
                span: Span {
                    start,
                    limit: self.pos,
                },
            }));
        }
    }
}
