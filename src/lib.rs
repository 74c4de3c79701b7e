// SPDX-License-Identifier: Apache-2.0

//! Streaming reader for structural, gate-level Verilog.
//!
//! A netlist is read in one pass and each construct is reported to a
//! caller-supplied [`VerilogReader`] as soon as it has been recognized: the
//! module header, `input`/`output`/`wire` declarations, and `assign`
//! statements already decomposed into aliases, two-input AND/OR/XOR gates, or
//! three-input majority gates. Nothing is accumulated in memory.
//!
//! ```
//! use xlsynth_verilog_reader::{read_verilog_str, EventCounts};
//!
//! let mut counts = EventCounts::default();
//! read_verilog_str(
//!     "module top(a, b, y); input a, b; output y; assign y = a ^ ~b; endmodule",
//!     &mut counts,
//! )
//! .unwrap();
//! assert_eq!(counts.xors, 1);
//! ```

pub mod decompose;
pub mod parser;
pub mod pretty_printer;
pub mod reader;
pub mod reader_error;
pub mod recorder;
pub mod scanner;

use std::io::Read;

pub use crate::parser::{Parser, ParserState};
pub use crate::pretty_printer::VerilogPrettyPrinter;
pub use crate::reader::{Signal, VerilogReader};
pub use crate::reader_error::{ParseError, ParseErrorKind};
pub use crate::recorder::{EventCounts, EventRecorder, ReaderEvent};
pub use crate::scanner::{Pos, ScanOptions, Span};

/// Reads one module from `input`, reporting constructs to `reader` as they
/// are recognized.
///
/// On error, the hooks already invoked stay invoked; use
/// [`read_verilog_buffered`] when the reader must only observe complete
/// modules.
pub fn read_verilog<R: Read, V: VerilogReader + ?Sized>(
    input: R,
    reader: &mut V,
) -> Result<(), ParseError> {
    read_verilog_with_options(input, reader, ScanOptions::default())
}

pub fn read_verilog_with_options<R: Read, V: VerilogReader + ?Sized>(
    input: R,
    reader: &mut V,
    options: ScanOptions,
) -> Result<(), ParseError> {
    log::debug!("read_verilog: options {:?}", options);
    let mut parser = Parser::from_reader_with_options(input, options);
    parser.parse_module(reader)
}

pub fn read_verilog_str<V: VerilogReader + ?Sized>(
    text: &str,
    reader: &mut V,
) -> Result<(), ParseError> {
    read_verilog(text.as_bytes(), reader)
}

/// Like [`read_verilog`], but `reader` sees no events at all unless the whole
/// module was read successfully.
pub fn read_verilog_buffered<R: Read, V: VerilogReader + ?Sized>(
    input: R,
    reader: &mut V,
) -> Result<(), ParseError> {
    let mut recorder = EventRecorder::new();
    read_verilog(input, &mut recorder)?;
    recorder.replay(reader);
    Ok(())
}
