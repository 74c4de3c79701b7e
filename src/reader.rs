// SPDX-License-Identifier: Apache-2.0

//! Callback interface through which recognized constructs are reported.

use std::fmt;

/// A signal used as a gate operand, possibly inverted with `~`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signal {
    pub name: String,
    pub negated: bool,
}

impl Signal {
    pub fn new(name: impl Into<String>, negated: bool) -> Self {
        Self {
            name: name.into(),
            negated,
        }
    }

    pub fn positive(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Receives the constructs of one module in source order.
///
/// Every method has an empty default body so implementations only override
/// the hooks they care about. The parser never inspects anything a hook does;
/// hooks are pure observers.
///
/// Ordering guarantees for a successful read:
/// - `on_module_header` fires once, before any declaration or assign hook.
/// - Each `assign` statement produces exactly one of `on_assign`, `on_and`,
///   `on_or`, `on_xor`, `on_maj3`.
/// - `on_endmodule` fires once and is the last hook called.
/// - `on_comment` fires at the point the comment is encountered, which may be
///   before the header or in the middle of a statement.
///
/// When reading fails, hooks already called are not undone.
pub trait VerilogReader {
    /// Module name and the port names exactly as written in the header.
    fn on_module_header(&mut self, _module_name: &str, _ports: &[String]) {}

    /// Names of one `input` statement.
    fn on_inputs(&mut self, _inputs: &[String]) {}

    /// Names of one `output` statement.
    fn on_outputs(&mut self, _outputs: &[String]) {}

    /// Names of one `wire` statement.
    fn on_wires(&mut self, _wires: &[String]) {}

    /// `assign lhs = rhs;` where `rhs` is a single, possibly inverted, signal.
    fn on_assign(&mut self, _lhs: &str, _rhs: &Signal) {}

    fn on_and(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal) {}

    fn on_or(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal) {}

    fn on_xor(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal) {}

    /// Majority of three signals, in the order each signal first appears in
    /// the source expression.
    fn on_maj3(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal, _op3: &Signal) {}

    fn on_endmodule(&mut self) {}

    /// Text of a `//` comment, without the leading slashes.
    fn on_comment(&mut self, _comment: &str) {}
}

impl<T: VerilogReader + ?Sized> VerilogReader for &mut T {
    fn on_module_header(&mut self, module_name: &str, ports: &[String]) {
        (**self).on_module_header(module_name, ports)
    }
    fn on_inputs(&mut self, inputs: &[String]) {
        (**self).on_inputs(inputs)
    }
    fn on_outputs(&mut self, outputs: &[String]) {
        (**self).on_outputs(outputs)
    }
    fn on_wires(&mut self, wires: &[String]) {
        (**self).on_wires(wires)
    }
    fn on_assign(&mut self, lhs: &str, rhs: &Signal) {
        (**self).on_assign(lhs, rhs)
    }
    fn on_and(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        (**self).on_and(lhs, op1, op2)
    }
    fn on_or(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        (**self).on_or(lhs, op1, op2)
    }
    fn on_xor(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        (**self).on_xor(lhs, op1, op2)
    }
    fn on_maj3(&mut self, lhs: &str, op1: &Signal, op2: &Signal, op3: &Signal) {
        (**self).on_maj3(lhs, op1, op2, op3)
    }
    fn on_endmodule(&mut self) {
        (**self).on_endmodule()
    }
    fn on_comment(&mut self, comment: &str) {
        (**self).on_comment(comment)
    }
}

impl<T: VerilogReader + ?Sized> VerilogReader for Box<T> {
    fn on_module_header(&mut self, module_name: &str, ports: &[String]) {
        (**self).on_module_header(module_name, ports)
    }
    fn on_inputs(&mut self, inputs: &[String]) {
        (**self).on_inputs(inputs)
    }
    fn on_outputs(&mut self, outputs: &[String]) {
        (**self).on_outputs(outputs)
    }
    fn on_wires(&mut self, wires: &[String]) {
        (**self).on_wires(wires)
    }
    fn on_assign(&mut self, lhs: &str, rhs: &Signal) {
        (**self).on_assign(lhs, rhs)
    }
    fn on_and(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        (**self).on_and(lhs, op1, op2)
    }
    fn on_or(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        (**self).on_or(lhs, op1, op2)
    }
    fn on_xor(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        (**self).on_xor(lhs, op1, op2)
    }
    fn on_maj3(&mut self, lhs: &str, op1: &Signal, op2: &Signal, op3: &Signal) {
        (**self).on_maj3(lhs, op1, op2, op3)
    }
    fn on_endmodule(&mut self) {
        (**self).on_endmodule()
    }
    fn on_comment(&mut self, comment: &str) {
        (**self).on_comment(comment)
    }
}
