// SPDX-License-Identifier: Apache-2.0

//! Statement-level parser for a single structural module.
//!
//! The parser walks a fixed sequence of states:
//!
//! ```text
//! AwaitModule -> AwaitHeaderOpen -> InHeaderPortList -> AwaitHeaderClose
//!   -> AwaitHeaderSemicolon -> InBody -> Done
//! ```
//!
//! and reports every construct to a `VerilogReader` as soon as it has been
//! recognized. Comment tokens are reported wherever they occur and are
//! otherwise invisible to the grammar.

use std::io::Read;

use crate::decompose::{decompose, nesting_error, MAX_GROUP_DEPTH};
use crate::reader::VerilogReader;
use crate::reader_error::ParseError;
use crate::scanner::{Keyword, ScanOptions, Token, TokenPayload, TokenScanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    /// Before the `module` keyword.
    AwaitModule,
    /// After `module`; the module name and `(` come next.
    AwaitHeaderOpen,
    InHeaderPortList,
    AwaitHeaderClose,
    AwaitHeaderSemicolon,
    /// Between statements of the module body.
    InBody,
    /// `endmodule` has been consumed.
    Done,
}

pub struct Parser<R: Read> {
    scanner: TokenScanner<R>,
    state: ParserState,
    module_name: String,
    ports: Vec<String>,
}

impl<R: Read> Parser<R> {
    pub fn new(scanner: TokenScanner<R>) -> Self {
        Self {
            scanner,
            state: ParserState::AwaitModule,
            module_name: String::new(),
            ports: Vec::new(),
        }
    }

    pub fn from_reader_with_options(input: R, options: ScanOptions) -> Self {
        Self::new(TokenScanner::with_options(input, options))
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Reads one module, through `endmodule`, reporting to `reader`.
    ///
    /// Stops at the first error; nothing after `endmodule` is read.
    pub fn parse_module<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
    ) -> Result<(), ParseError> {
        log::trace!("parse_module: start in state {:?}", self.state);
        while self.state != ParserState::Done {
            let next = match self.step(reader) {
                Ok(next) => next,
                Err(e) => {
                    log::debug!("parse_module: aborting in state {:?}: {}", self.state, e);
                    return Err(e);
                }
            };
            if next != self.state {
                log::trace!("parse_module: {:?} -> {:?}", self.state, next);
            }
            self.state = next;
        }
        Ok(())
    }

    /// Performs the work of the current state and returns the next one.
    fn step<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
    ) -> Result<ParserState, ParseError> {
        match self.state {
            ParserState::AwaitModule => {
                self.expect(reader, TokenPayload::Keyword(Keyword::Module), "to begin module")?;
                Ok(ParserState::AwaitHeaderOpen)
            }
            ParserState::AwaitHeaderOpen => {
                self.module_name = self.pop_name(reader, "module name")?;
                self.expect(reader, TokenPayload::OParen, "after module name")?;
                Ok(ParserState::InHeaderPortList)
            }
            ParserState::InHeaderPortList => {
                self.ports = self.parse_name_list(reader, "port name")?;
                Ok(ParserState::AwaitHeaderClose)
            }
            ParserState::AwaitHeaderClose => {
                self.expect(reader, TokenPayload::CParen, "to close port list")?;
                Ok(ParserState::AwaitHeaderSemicolon)
            }
            ParserState::AwaitHeaderSemicolon => {
                self.expect(reader, TokenPayload::Semi, "after port list")?;
                let ports = std::mem::take(&mut self.ports);
                log::trace!(
                    "module header: {} with {} ports",
                    self.module_name,
                    ports.len()
                );
                reader.on_module_header(&self.module_name, &ports);
                Ok(ParserState::InBody)
            }
            ParserState::InBody => self.parse_statement(reader),
            ParserState::Done => Ok(ParserState::Done),
        }
    }

    fn parse_statement<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
    ) -> Result<ParserState, ParseError> {
        let tok = match self.pop_significant(reader)? {
            Some(tok) => tok,
            None => {
                return Err(ParseError::unexpected_eof(
                    "expected statement or 'endmodule'",
                    self.scanner.pos,
                ));
            }
        };
        match tok.payload {
            TokenPayload::Keyword(Keyword::Input) => {
                let names = self.parse_declaration(reader)?;
                reader.on_inputs(&names);
            }
            TokenPayload::Keyword(Keyword::Output) => {
                let names = self.parse_declaration(reader)?;
                reader.on_outputs(&names);
            }
            TokenPayload::Keyword(Keyword::Wire) => {
                let names = self.parse_declaration(reader)?;
                reader.on_wires(&names);
            }
            TokenPayload::Keyword(Keyword::Assign) => self.parse_assign(reader)?,
            TokenPayload::Keyword(Keyword::Endmodule) => {
                reader.on_endmodule();
                return Ok(ParserState::Done);
            }
            other => {
                return Err(ParseError::syntax(
                    format!(
                        "expected 'input', 'output', 'wire', 'assign' or 'endmodule', got '{}'",
                        other
                    ),
                    tok.span,
                ));
            }
        }
        Ok(ParserState::InBody)
    }

    /// Parses the remainder of a declaration after its keyword:
    /// `name {, name} ;`
    fn parse_declaration<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
    ) -> Result<Vec<String>, ParseError> {
        let names = self.parse_name_list(reader, "signal name in declaration")?;
        self.expect(reader, TokenPayload::Semi, "after declaration")?;
        Ok(names)
    }

    /// Parses the remainder of an assign after the keyword:
    /// `lhs = expr ;`
    ///
    /// Parenthesis nesting is checked as the right-hand side is collected.
    fn parse_assign<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
    ) -> Result<(), ParseError> {
        let lhs = self.pop_name(reader, "left-hand side of assign")?;
        self.expect(reader, TokenPayload::Equals, "after assign left-hand side")?;
        let mut rhs = Vec::new();
        let mut depth = 0usize;
        let semi = loop {
            let tok = self.pop_significant(reader)?.ok_or_else(|| {
                ParseError::unexpected_eof("expected ';' after assign", self.scanner.pos)
            })?;
            match tok.payload {
                TokenPayload::Semi => break tok,
                TokenPayload::OParen => {
                    depth += 1;
                    if depth > MAX_GROUP_DEPTH {
                        return Err(nesting_error(tok.span));
                    }
                    rhs.push(tok);
                }
                TokenPayload::CParen => {
                    depth = depth.saturating_sub(1);
                    rhs.push(tok);
                }
                TokenPayload::Identifier(_)
                | TokenPayload::EscapedIdentifier(_)
                | TokenPayload::Constant(_)
                | TokenPayload::Amp
                | TokenPayload::Pipe
                | TokenPayload::Caret
                | TokenPayload::Tilde => rhs.push(tok),
                other => {
                    return Err(ParseError::syntax(
                        format!("expected ';' after assign, got '{}'", other),
                        tok.span,
                    ));
                }
            }
        };
        let shape = decompose(&rhs, semi.span)?;
        log::trace!("assign {} = {:?}", lhs, shape);
        shape.dispatch(&lhs, reader);
        Ok(())
    }

    /// `name {, name}`; at least one name is required.
    fn parse_name_list<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
        what: &str,
    ) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.pop_name(reader, what)?];
        while self.peek_is(reader, &TokenPayload::Comma)? {
            self.scanner.popt()?; // consume ','
            names.push(self.pop_name(reader, what)?);
        }
        Ok(names)
    }

    fn pop_name<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
        what: &str,
    ) -> Result<String, ParseError> {
        match self.pop_significant(reader)? {
            Some(Token {
                payload: TokenPayload::Identifier(name),
                ..
            })
            | Some(Token {
                payload: TokenPayload::EscapedIdentifier(name),
                ..
            }) => Ok(name),
            Some(tok) => Err(ParseError::syntax(
                format!("expected {}, got '{}'", what, tok.payload),
                tok.span,
            )),
            None => Err(ParseError::unexpected_eof(
                &format!("expected {}", what),
                self.scanner.pos,
            )),
        }
    }

    fn expect<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
        want: TokenPayload,
        context: &str,
    ) -> Result<Token, ParseError> {
        match self.pop_significant(reader)? {
            Some(tok) if tok.payload == want => Ok(tok),
            Some(tok) => Err(ParseError::syntax(
                format!("expected '{}' {}, got '{}'", want, context, tok.payload),
                tok.span,
            )),
            None => Err(ParseError::unexpected_eof(
                &format!("expected '{}' {}", want, context),
                self.scanner.pos,
            )),
        }
    }

    /// Pops the next token, reporting and skipping any comments before it.
    fn pop_significant<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
    ) -> Result<Option<Token>, ParseError> {
        loop {
            match self.scanner.popt()? {
                Some(Token {
                    payload: TokenPayload::Comment(text),
                    ..
                }) => {
                    log::trace!("comment: {:?}", text);
                    reader.on_comment(&text);
                }
                other => return Ok(other),
            }
        }
    }

    /// Whether the next non-comment token is `want`. Comments in front of it
    /// are reported and consumed; the token itself is left in place.
    fn peek_is<V: VerilogReader + ?Sized>(
        &mut self,
        reader: &mut V,
        want: &TokenPayload,
    ) -> Result<bool, ParseError> {
        loop {
            match self.scanner.peekt()? {
                Some(Token {
                    payload: TokenPayload::Comment(_),
                    ..
                }) => {}
                Some(tok) => return Ok(&tok.payload == want),
                None => return Ok(false),
            }
            if let Some(Token {
                payload: TokenPayload::Comment(text),
                ..
            }) = self.scanner.popt()?
            {
                log::trace!("comment: {:?}", text);
                reader.on_comment(&text);
            }
        }
    }
}
