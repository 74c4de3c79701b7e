// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use test_case::test_case;
use xlsynth_verilog_reader::{
    read_verilog, read_verilog_str, read_verilog_with_options, EventCounts, EventRecorder,
    ParseErrorKind, ReaderEvent, ScanOptions, Signal, VerilogReader,
};

const SIMPLE: &str = "module top( y1, y2, a, b, c ) ;
  input a , b , c ;
  output y1 , y2 ;
  wire zero, g0, g1 , g2 , g3 , g4, g5 ;
  assign zero = 0 ;
  assign g0 = a ;
  assign g1 = ~c ;
  assign g2 = g0 & g1 ;
  assign g3 = a | g2 ;
  assign g4 = g2 ^ g3 ;
  assign g5 = ( ~a & b ) | ( ~a & c ) | ( b & c ) ;
  assign y1 = g4 ;
  assign y2 = g5 ;
endmodule
";

const ESCAPED: &str = "module top( \\y[0], \\y[1], \\x[0], \\x[1], \\x[2] ) ;
  input \\x[0] , \\x[1] , \\x[2] ;
  output \\y[0] , \\y[1] ;
  wire zero, _g0, _g1 , _g2 , _g3 , _g4, _g5 ;
  assign zero = 0 ;
  assign _g0 = \\x[0] ;
  assign _g1 = ~\\x[3] ;
  assign _g2 = _g0 & _g1 ;
  assign _g3 = \\x[0] | _g2 ;
  assign _g4 = _g2 ^ _g3 ;
  assign _g5 = ( ~\\x[0] & \\x[1] ) | ( ~\\x[0] & \\x[2] ) | ( \\x[1] & \\x[2] ) ;
  assign \\y[0] = _g4 ;
  assign \\y[1] = _g5 ;
endmodule
";

const COMMENTED: &str = "// comment at the beginning
module top( \\y1, \\y2, \\a, \\b, \\c ) ;
  input \\a , \\b , \\c ;
  output \\y1 , \\y2 ;
  wire zero, g0, g1 , g2 , g3 , g4, g5 ;
  assign zero = 0 ; // the zero constant
  assign g0 = \\a ;
  assign g1 = ~\\c ;
  assign g2 = g0 & g1 ;
  // comment in the middle
  assign g3 = \\a | g2 ;
  assign g4 = g2 ^ g3 ;
  assign g5 = ( ~\\a & \\b ) | ( ~\\a & \\c ) | ( \\b & \\c ) ;
  assign \\y1 = g4 ;
  assign \\y2 = g5 ;
endmodule
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn expected_counts(comments: usize) -> EventCounts {
    EventCounts {
        modules: 1,
        inputs: 3,
        outputs: 2,
        wires: 7,
        aliases: 5,
        ands: 1,
        ors: 1,
        xors: 1,
        maj3s: 1,
        endmodules: 1,
        comments,
    }
}

#[test_case(SIMPLE, 0; "plain names")]
#[test_case(ESCAPED, 0; "escaped names")]
#[test_case(COMMENTED, 3; "comments")]
fn test_counts_for_reference_netlists(src: &str, comments: usize) {
    init_logger();
    let mut counts = EventCounts::default();
    read_verilog(src.as_bytes(), &mut counts).expect("reference netlist should parse");
    assert_eq!(counts, expected_counts(comments));
}

#[test]
fn test_header_first_and_endmodule_last() {
    init_logger();
    let mut recorder = EventRecorder::new();
    read_verilog_str(SIMPLE, &mut recorder).expect("parse ok");
    let events = recorder.events();
    assert!(matches!(events.first(), Some(ReaderEvent::ModuleHeader { .. })));
    assert_eq!(events.last(), Some(&ReaderEvent::Endmodule));
    let headers = events
        .iter()
        .filter(|e| matches!(e, ReaderEvent::ModuleHeader { .. }))
        .count();
    assert_eq!(headers, 1);
}

#[test]
fn test_escaped_names_are_reported_without_backslash() {
    init_logger();
    let mut recorder = EventRecorder::new();
    read_verilog_str(ESCAPED, &mut recorder).expect("parse ok");
    let events = recorder.events();
    assert_eq!(
        events[0],
        ReaderEvent::ModuleHeader {
            name: "top".to_string(),
            ports: ["y[0]", "y[1]", "x[0]", "x[1]", "x[2]"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    );
    assert!(events.contains(&ReaderEvent::Assign {
        lhs: "_g1".to_string(),
        rhs: Signal::new("x[3]", true),
    }));
}

#[test]
fn test_majority_operands_and_constant_alias() {
    init_logger();
    let mut recorder = EventRecorder::new();
    read_verilog_str(SIMPLE, &mut recorder).expect("parse ok");
    let events = recorder.events();
    assert!(events.contains(&ReaderEvent::Assign {
        lhs: "zero".to_string(),
        rhs: Signal::positive("1'b0"),
    }));
    assert!(events.contains(&ReaderEvent::Maj3 {
        lhs: "g5".to_string(),
        op1: Signal::new("a", true),
        op2: Signal::positive("b"),
        op3: Signal::positive("c"),
    }));
}

#[test]
fn test_comment_events_keep_source_order() {
    init_logger();
    let mut recorder = EventRecorder::new();
    read_verilog_str(COMMENTED, &mut recorder).expect("parse ok");
    let comments: Vec<&str> = recorder
        .events()
        .iter()
        .filter_map(|e| match e {
            ReaderEvent::Comment(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        comments,
        vec![
            " comment at the beginning",
            " the zero constant",
            " comment in the middle"
        ]
    );
}

#[test_case("assign y = a & b & c & d ;"; "four way and")]
#[test_case("assign y = ( a & b ) | ( c & d ) ;"; "or of two ands")]
#[test_case("assign y = a & b | c ;"; "mixed operators")]
#[test_case("assign y = ( a & b ) | ( a & c ) | ( a & d ) ;"; "majority over four signals")]
fn test_unsupported_shapes_are_pattern_errors(statement: &str) {
    init_logger();
    let src = format!(
        "module m(a, b, c, d, y); input a, b, c, d; output y; {} endmodule",
        statement
    );
    let mut recorder = EventRecorder::new();
    let e = read_verilog_str(&src, &mut recorder).unwrap_err();
    assert_eq!(e.kind, ParseErrorKind::Pattern, "error: {}", e);
    assert!(!recorder.events().contains(&ReaderEvent::Endmodule));
}

#[test_case("module m(a) ; input a endmodule", ParseErrorKind::Syntax; "missing semicolon")]
#[test_case("module m(a) ; assign a = ( a ; endmodule", ParseErrorKind::Syntax; "unbalanced paren")]
#[test_case("module m(a) ; input a ; ", ParseErrorKind::Syntax; "missing endmodule")]
#[test_case("module m(a) ; input \\a", ParseErrorKind::Lexical; "unterminated escaped name")]
#[test_case("module m(a) ; input a # ; endmodule", ParseErrorKind::Lexical; "bad character")]
#[test_case(
    "module m(a) ; wire w = a ; endmodule",
    ParseErrorKind::Syntax;
    "wire with initializer"
)]
fn test_malformed_input(src: &str, kind: ParseErrorKind) {
    init_logger();
    let e = read_verilog_str(src, &mut EventCounts::default()).unwrap_err();
    assert_eq!(e.kind, kind, "error: {}", e);
}

#[test]
fn test_error_display_has_position() {
    let e = read_verilog_str("module m(a);\n  input a\nendmodule", &mut EventCounts::default())
        .unwrap_err();
    assert_eq!(
        e.to_string(),
        "syntax error: expected ';' after declaration, got 'endmodule' @ 3:1..3:10"
    );
}

#[test]
fn test_permissive_options_skip_tool_noise() {
    init_logger();
    let src = "`timescale 1ns / 1ps\n/* synthesized */\nmodule m(a, y);\n input a;\n output y;\n \
               assign y = ~a; /* inverter */\nendmodule\n";
    let mut strict = EventCounts::default();
    assert_eq!(
        read_verilog_str(src, &mut strict).unwrap_err().kind,
        ParseErrorKind::Lexical
    );

    let mut counts = EventCounts::default();
    read_verilog_with_options(src.as_bytes(), &mut counts, ScanOptions::permissive())
        .expect("permissive parse ok");
    assert_eq!(counts.aliases, 1);
    assert_eq!(counts.comments, 0);
}

/// Readers can keep whatever state they like; here, a fanout map keyed by
/// signal name.
#[derive(Default)]
struct FanoutCounter {
    fanout: std::collections::BTreeMap<String, usize>,
}

impl FanoutCounter {
    fn bump(&mut self, s: &Signal) {
        *self.fanout.entry(s.name.clone()).or_default() += 1;
    }
}

impl VerilogReader for FanoutCounter {
    fn on_and(&mut self, _lhs: &str, op1: &Signal, op2: &Signal) {
        self.bump(op1);
        self.bump(op2);
    }
    fn on_maj3(&mut self, _lhs: &str, op1: &Signal, op2: &Signal, op3: &Signal) {
        self.bump(op1);
        self.bump(op2);
        self.bump(op3);
    }
}

#[test]
fn test_custom_reader_through_trait_object() {
    init_logger();
    let mut fanout = FanoutCounter::default();
    {
        let reader: &mut dyn VerilogReader = &mut fanout;
        read_verilog_str(SIMPLE, reader).expect("parse ok");
    }
    assert_eq!(fanout.fanout.get("a"), Some(&1));
    assert_eq!(fanout.fanout.get("g0"), Some(&1));
    assert_eq!(fanout.fanout.get("b"), Some(&1));
}
