// SPDX-License-Identifier: Apache-2.0

//! Printing a read netlist and reading it back yields the same events.

use pretty_assertions::assert_eq;
use xlsynth_verilog_reader::{
    read_verilog_buffered, read_verilog_str, EventRecorder, ParseErrorKind, ReaderEvent,
    VerilogPrettyPrinter,
};

const NETLIST: &str = r"// full adder, mapped
module \fa$1 ( a, b, \cin , \s[0] , cout ) ;
  input a , b , \cin ;
  output \s[0] , cout ;
  wire t , \wire , one ;
  assign one = 1'b1 ;
  assign t = a ^ b ; // half sum
  assign \s[0] = t ^ \cin ;
  assign \wire = ~t ;
  assign cout = ( a & b ) | ( a & \cin ) | ( b & \cin ) ;
endmodule
";

fn record(src: &str) -> Vec<ReaderEvent> {
    let mut recorder = EventRecorder::new();
    read_verilog_str(src, &mut recorder).expect("parse ok");
    recorder.into_events()
}

fn print(events: &[ReaderEvent]) -> String {
    let mut printer = VerilogPrettyPrinter::new(Vec::new());
    for event in events {
        event.dispatch(&mut printer);
    }
    let bytes = printer.finish().expect("write to Vec cannot fail");
    String::from_utf8(bytes).expect("printer writes UTF-8")
}

#[test]
fn test_printed_netlist_reparses_to_same_events() {
    let _ = env_logger::builder().is_test(true).try_init();
    let events = record(NETLIST);
    let printed = print(&events);
    log::info!("printed netlist:\n{}", printed);
    assert_eq!(record(&printed), events);
}

#[test]
fn test_printing_is_a_fixed_point() {
    let once = print(&record(NETLIST));
    let twice = print(&record(&once));
    assert_eq!(twice, once);
}

#[test]
fn test_printed_text() {
    let printed = print(&record(NETLIST));
    let want = r"// full adder, mapped
module \fa$1 ( a , b , cin , \s[0] , cout ) ;
  input a , b , cin ;
  output \s[0] , cout ;
  wire t , \wire , one ;
  assign one = 1'b1 ;
  assign t = a ^ b ;
// half sum
  assign \s[0] = t ^ cin ;
  assign \wire = ~t ;
  assign cout = ( a & b ) | ( a & cin ) | ( b & cin ) ;
endmodule
";
    assert_eq!(printed, want);
}

#[test]
fn test_net_named_like_a_constant_round_trips() {
    let src = r"module m( \1'b0 , a ) ;
  input a ;
  wire \1'b0 ;
  assign \1'b0 = a ;
endmodule
";
    let events = record(src);
    let printed = print(&events);
    let want = r"module m ( \1'b0 , a ) ;
  input a ;
  wire \1'b0 ;
  assign \1'b0 = a ;
endmodule
";
    assert_eq!(printed, want);
    assert_eq!(record(&printed), events);
}

#[test]
fn test_buffered_read_delivers_nothing_on_failure() {
    let src = "// leading comment\n\
               module m(a, y); input a; output y; assign y = a & a & a; endmodule";
    let mut recorder = EventRecorder::new();
    let e = read_verilog_buffered(src.as_bytes(), &mut recorder).unwrap_err();
    assert_eq!(e.kind, ParseErrorKind::Pattern);
    assert!(recorder.events().is_empty());
}

#[test]
fn test_buffered_read_matches_streaming_read_on_success() {
    let mut buffered = EventRecorder::new();
    read_verilog_buffered(NETLIST.as_bytes(), &mut buffered).expect("parse ok");
    assert_eq!(buffered.into_events(), record(NETLIST));
}
