// SPDX-License-Identifier: Apache-2.0

//! Writes reader events back out as structural Verilog text.

use std::io::{self, Write};

use crate::reader::{Signal, VerilogReader};
use crate::scanner::{constant_name, is_simple_identifier, Keyword};

/// A `VerilogReader` that prints each construct as it arrives.
///
/// Hooks cannot fail, so the first write error is held and handed back by
/// `finish`; nothing further is written after it.
pub struct VerilogPrettyPrinter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> VerilogPrettyPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flushes and returns the writer, or the first error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::debug!("VerilogPrettyPrinter: write failed: {}", e);
            self.error = Some(e);
        }
    }

    fn emit_declaration(&mut self, keyword: Keyword, names: &[String]) {
        let line = format!("  {} {} ;", keyword.as_str(), name_list(names));
        self.emit(&line);
    }

    fn emit_binary(&mut self, lhs: &str, op: char, op1: &Signal, op2: &Signal) {
        let line = format!(
            "  assign {} = {} {} {} ;",
            format_name(lhs),
            format_signal(op1),
            op,
            format_signal(op2)
        );
        self.emit(&line);
    }
}

/// Spelling of `name` that scans back to the same name.
///
/// The trailing space of an escaped name is its terminator, so callers always
/// follow a name with whitespace before any other token.
pub fn format_name(name: &str) -> String {
    if is_simple_identifier(name) && Keyword::from_str(name).is_none() {
        name.to_string()
    } else {
        format!("\\{}", name)
    }
}

/// Operands may be constants, which are reported under their constant
/// spelling and written back the same way.
fn format_signal(signal: &Signal) -> String {
    let name = if signal.name == constant_name(false) || signal.name == constant_name(true) {
        signal.name.clone()
    } else {
        format_name(&signal.name)
    };
    if signal.negated {
        format!("~{}", name)
    } else {
        name
    }
}

fn name_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format_name(n))
        .collect::<Vec<_>>()
        .join(" , ")
}

impl<W: Write> VerilogReader for VerilogPrettyPrinter<W> {
    fn on_module_header(&mut self, module_name: &str, ports: &[String]) {
        let line = format!("module {} ( {} ) ;", format_name(module_name), name_list(ports));
        self.emit(&line);
    }

    fn on_inputs(&mut self, inputs: &[String]) {
        self.emit_declaration(Keyword::Input, inputs);
    }

    fn on_outputs(&mut self, outputs: &[String]) {
        self.emit_declaration(Keyword::Output, outputs);
    }

    fn on_wires(&mut self, wires: &[String]) {
        self.emit_declaration(Keyword::Wire, wires);
    }

    fn on_assign(&mut self, lhs: &str, rhs: &Signal) {
        let line = format!("  assign {} = {} ;", format_name(lhs), format_signal(rhs));
        self.emit(&line);
    }

    fn on_and(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        self.emit_binary(lhs, '&', op1, op2);
    }

    fn on_or(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        self.emit_binary(lhs, '|', op1, op2);
    }

    fn on_xor(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        self.emit_binary(lhs, '^', op1, op2);
    }

    fn on_maj3(&mut self, lhs: &str, op1: &Signal, op2: &Signal, op3: &Signal) {
        let (a, b, c) = (format_signal(op1), format_signal(op2), format_signal(op3));
        let line = format!(
            "  assign {} = ( {} & {} ) | ( {} & {} ) | ( {} & {} ) ;",
            format_name(lhs),
            a,
            b,
            a,
            c,
            b,
            c
        );
        self.emit(&line);
    }

    fn on_endmodule(&mut self) {
        self.emit("endmodule");
    }

    fn on_comment(&mut self, comment: &str) {
        let line = format!("//{}", comment);
        self.emit(&line);
    }
}
