// SPDX-License-Identifier: Apache-2.0

//! Decomposition of `assign` right-hand sides into canonical gate shapes.
//!
//! The right-hand side is first parsed into a small expression tree that keeps
//! operator chains flat and remembers explicit parentheses, then the tree is
//! matched against the accepted shapes:
//!
//! - `a`, `~a`, `(a)`: alias
//! - `a & b`, `a | b`, `a ^ b`, either operand optionally wrapped as `(a)`
//! - `(a & b) | (a & c) | (b & c)`: majority of three, with the terms and
//!   the operands within each term in any order
//!
//! There is no operator precedence: a chain mixing operators is parsed and
//! then rejected, since no accepted shape contains one.

use crate::reader::{Signal, VerilogReader};
use crate::reader_error::ParseError;
use crate::scanner::{constant_name, Span, Token, TokenPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    And,
    Or,
    Xor,
}

impl BinOp {
    fn from_payload(payload: &TokenPayload) -> Option<Self> {
        match payload {
            TokenPayload::Amp => Some(BinOp::And),
            TokenPayload::Pipe => Some(BinOp::Or),
            TokenPayload::Caret => Some(BinOp::Xor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Signal),
    /// An explicitly parenthesized subexpression.
    Group(Box<Expr>),
    /// `operands[0] ops[0] operands[1] ops[1] ...`; always at least two
    /// operands and exactly one fewer operator.
    Chain { operands: Vec<Expr>, ops: Vec<BinOp> },
}

impl Expr {
    /// The literal this operand denotes if it is a literal or a literal in
    /// a single pair of parentheses.
    fn as_wrapped_literal(&self) -> Option<&Signal> {
        match self {
            Expr::Literal(s) => Some(s),
            Expr::Group(inner) => match inner.as_ref() {
                Expr::Literal(s) => Some(s),
                _ => None,
            },
            Expr::Chain { .. } => None,
        }
    }

    /// For `(l & l)` returns the two literals.
    fn as_and_pair(&self) -> Option<(&Signal, &Signal)> {
        let Expr::Group(inner) = self else {
            return None;
        };
        match inner.as_ref() {
            Expr::Chain { operands, ops } if ops.as_slice() == [BinOp::And] => {
                match (&operands[0], &operands[1]) {
                    (Expr::Literal(a), Expr::Literal(b)) => Some((a, b)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// The single gate an `assign` statement reduces to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateShape {
    Alias(Signal),
    And(Signal, Signal),
    Or(Signal, Signal),
    Xor(Signal, Signal),
    Maj3(Signal, Signal, Signal),
}

impl GateShape {
    /// Reports this gate, driving `lhs`, through exactly one reader hook.
    pub fn dispatch<V: VerilogReader + ?Sized>(&self, lhs: &str, reader: &mut V) {
        match self {
            GateShape::Alias(rhs) => reader.on_assign(lhs, rhs),
            GateShape::And(a, b) => reader.on_and(lhs, a, b),
            GateShape::Or(a, b) => reader.on_or(lhs, a, b),
            GateShape::Xor(a, b) => reader.on_xor(lhs, a, b),
            GateShape::Maj3(a, b, c) => reader.on_maj3(lhs, a, b, c),
        }
    }
}

/// Deepest parenthesis nesting any accepted shape uses.
pub const MAX_GROUP_DEPTH: usize = 1;

/// Pattern error for a `(` that opens a group deeper than `MAX_GROUP_DEPTH`.
pub fn nesting_error(span: Span) -> ParseError {
    ParseError::pattern(
        format!(
            "parentheses nested more than {} level deep match no supported gate",
            MAX_GROUP_DEPTH
        ),
        span,
    )
}

struct ExprParser {
    /// Position reported when the tokens run out.
    end: Span,
}

type ParseStep<'a> = Result<(Expr, &'a [Token]), ParseError>;

impl ExprParser {
    fn parse_chain<'a>(&self, tokens: &'a [Token], depth: usize) -> ParseStep<'a> {
        let (first, mut rest) = self.parse_operand(tokens, depth)?;
        let mut operands = vec![first];
        let mut ops = Vec::new();
        while let Some(op) = rest.first().and_then(|t| BinOp::from_payload(&t.payload)) {
            let (rhs, rest2) = self.parse_operand(&rest[1..], depth)?;
            ops.push(op);
            operands.push(rhs);
            rest = rest2;
        }
        if ops.is_empty() {
            Ok((operands.remove(0), rest))
        } else {
            Ok((Expr::Chain { operands, ops }, rest))
        }
    }

    fn parse_operand<'a>(&self, tokens: &'a [Token], depth: usize) -> ParseStep<'a> {
        let Some(tok) = tokens.first() else {
            return Err(ParseError::syntax(
                "expected signal, '~' or '(' in expression",
                self.end,
            ));
        };
        match &tok.payload {
            TokenPayload::Tilde => match tokens.get(1).and_then(|t| signal_name(&t.payload)) {
                Some(name) => Ok((Expr::Literal(Signal::new(name, true)), &tokens[2..])),
                None => Err(ParseError::syntax(
                    "'~' must be followed by a signal name",
                    tok.span,
                )),
            },
            TokenPayload::OParen if depth >= MAX_GROUP_DEPTH => Err(nesting_error(tok.span)),
            TokenPayload::OParen => {
                let (inner, rest) = self.parse_chain(&tokens[1..], depth + 1)?;
                match rest.first() {
                    Some(t) if t.payload == TokenPayload::CParen => {
                        Ok((Expr::Group(Box::new(inner)), &rest[1..]))
                    }
                    Some(t) => Err(ParseError::syntax(
                        format!("expected ')' in expression, got '{}'", t.payload),
                        t.span,
                    )),
                    None => Err(ParseError::syntax("expected ')' in expression", self.end)),
                }
            }
            payload => match signal_name(payload) {
                Some(name) => Ok((Expr::Literal(Signal::new(name, false)), &tokens[1..])),
                None => Err(ParseError::syntax(
                    format!(
                        "expected signal, '~' or '(' in expression, got '{}'",
                        payload
                    ),
                    tok.span,
                )),
            },
        }
    }
}

fn signal_name(payload: &TokenPayload) -> Option<String> {
    match payload {
        TokenPayload::Identifier(s) | TokenPayload::EscapedIdentifier(s) => Some(s.clone()),
        TokenPayload::Constant(value) => Some(constant_name(*value).to_string()),
        _ => None,
    }
}

/// Parses the expression tokens of one `assign` without classifying them.
/// `end` is the position just past the expression, used when it is
/// truncated.
pub fn parse_expr(tokens: &[Token], end: Span) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::syntax("expected expression after '='", end));
    }
    let parser = ExprParser { end };
    let (expr, rest) = parser.parse_chain(tokens, 0)?;
    if let Some(extra) = rest.first() {
        return Err(ParseError::syntax(
            format!("unexpected '{}' in expression", extra.payload),
            extra.span,
        ));
    }
    Ok(expr)
}

/// Parses and classifies the tokens between `=` and `;`.
pub fn decompose(tokens: &[Token], end: Span) -> Result<GateShape, ParseError> {
    let expr = parse_expr(tokens, end)?;
    let span = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => Span {
            start: first.span.start,
            limit: last.span.limit,
        },
        _ => end,
    };
    classify(&expr, span)
}

/// Matches an expression tree against the accepted gate shapes.
pub fn classify(expr: &Expr, span: Span) -> Result<GateShape, ParseError> {
    if let Some(s) = expr.as_wrapped_literal() {
        return Ok(GateShape::Alias(s.clone()));
    }
    let (operands, ops) = match expr {
        Expr::Chain { operands, ops } => (operands, ops),
        _ => {
            return Err(ParseError::pattern(
                "parentheses may only wrap a single literal or a majority AND term",
                span,
            ));
        }
    };
    match operands.len() {
        2 => {
            let (a, b) = match (
                operands[0].as_wrapped_literal(),
                operands[1].as_wrapped_literal(),
            ) {
                (Some(a), Some(b)) => (a.clone(), b.clone()),
                _ => {
                    return Err(ParseError::pattern(
                        "two-operand gates must combine single literals",
                        span,
                    ));
                }
            };
            Ok(match ops[0] {
                BinOp::And => GateShape::And(a, b),
                BinOp::Or => GateShape::Or(a, b),
                BinOp::Xor => GateShape::Xor(a, b),
            })
        }
        3 if ops.iter().all(|op| *op == BinOp::Or) => classify_maj3(operands, span),
        3 => Err(ParseError::pattern(
            "three-operand expressions are only accepted as an OR of three AND pairs",
            span,
        )),
        n => Err(ParseError::pattern(
            format!("expression with {} operands matches no supported gate", n),
            span,
        )),
    }
}

fn classify_maj3(terms: &[Expr], span: Span) -> Result<GateShape, ParseError> {
    // Distinct signals in first-seen order with their occurrence counts.
    let mut seen: Vec<(&Signal, usize)> = Vec::new();
    for term in terms {
        let (a, b) = term.as_and_pair().ok_or_else(|| {
            ParseError::pattern(
                "majority terms must each be a parenthesized AND of two literals",
                span,
            )
        })?;
        if a.name == b.name {
            return Err(ParseError::pattern(
                format!("majority term pairs signal '{}' with itself", a.name),
                span,
            ));
        }
        for s in [a, b] {
            match seen.iter_mut().find(|(prev, _)| prev.name == s.name) {
                Some((prev, count)) => {
                    if prev.negated != s.negated {
                        return Err(ParseError::pattern(
                            format!(
                                "signal '{}' appears with inconsistent polarity in majority terms",
                                s.name
                            ),
                            span,
                        ));
                    }
                    *count += 1;
                }
                None => seen.push((s, 1)),
            }
        }
    }
    if seen.len() != 3 || seen.iter().any(|(_, count)| *count != 2) {
        return Err(ParseError::pattern(
            "majority terms must be the three pairwise combinations of three signals",
            span,
        ));
    }
    Ok(GateShape::Maj3(
        seen[0].0.clone(),
        seen[1].0.clone(),
        seen[2].0.clone(),
    ))
}
