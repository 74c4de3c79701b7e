// SPDX-License-Identifier: Apache-2.0

//! Ready-made `VerilogReader` implementations: an event log that can be
//! replayed into another reader, and a tally of constructs by kind.

use crate::reader::{Signal, VerilogReader};

/// One reader hook invocation with owned copies of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    ModuleHeader { name: String, ports: Vec<String> },
    Inputs(Vec<String>),
    Outputs(Vec<String>),
    Wires(Vec<String>),
    Assign { lhs: String, rhs: Signal },
    And { lhs: String, op1: Signal, op2: Signal },
    Or { lhs: String, op1: Signal, op2: Signal },
    Xor { lhs: String, op1: Signal, op2: Signal },
    Maj3 {
        lhs: String,
        op1: Signal,
        op2: Signal,
        op3: Signal,
    },
    Endmodule,
    Comment(String),
}

impl ReaderEvent {
    /// Invokes the hook on `reader` that produced this event.
    pub fn dispatch<V: VerilogReader + ?Sized>(&self, reader: &mut V) {
        match self {
            ReaderEvent::ModuleHeader { name, ports } => reader.on_module_header(name, ports),
            ReaderEvent::Inputs(names) => reader.on_inputs(names),
            ReaderEvent::Outputs(names) => reader.on_outputs(names),
            ReaderEvent::Wires(names) => reader.on_wires(names),
            ReaderEvent::Assign { lhs, rhs } => reader.on_assign(lhs, rhs),
            ReaderEvent::And { lhs, op1, op2 } => reader.on_and(lhs, op1, op2),
            ReaderEvent::Or { lhs, op1, op2 } => reader.on_or(lhs, op1, op2),
            ReaderEvent::Xor { lhs, op1, op2 } => reader.on_xor(lhs, op1, op2),
            ReaderEvent::Maj3 { lhs, op1, op2, op3 } => reader.on_maj3(lhs, op1, op2, op3),
            ReaderEvent::Endmodule => reader.on_endmodule(),
            ReaderEvent::Comment(text) => reader.on_comment(text),
        }
    }
}

/// Records every hook invocation in order.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Vec<ReaderEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ReaderEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ReaderEvent> {
        self.events
    }

    /// Delivers the recorded events to `reader` in their original order.
    pub fn replay<V: VerilogReader + ?Sized>(&self, reader: &mut V) {
        log::trace!("replaying {} recorded events", self.events.len());
        for event in &self.events {
            event.dispatch(reader);
        }
    }

    pub fn counts(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        self.replay(&mut counts);
        counts
    }
}

impl VerilogReader for EventRecorder {
    fn on_module_header(&mut self, module_name: &str, ports: &[String]) {
        self.events.push(ReaderEvent::ModuleHeader {
            name: module_name.to_string(),
            ports: ports.to_vec(),
        });
    }
    fn on_inputs(&mut self, inputs: &[String]) {
        self.events.push(ReaderEvent::Inputs(inputs.to_vec()));
    }
    fn on_outputs(&mut self, outputs: &[String]) {
        self.events.push(ReaderEvent::Outputs(outputs.to_vec()));
    }
    fn on_wires(&mut self, wires: &[String]) {
        self.events.push(ReaderEvent::Wires(wires.to_vec()));
    }
    fn on_assign(&mut self, lhs: &str, rhs: &Signal) {
        self.events.push(ReaderEvent::Assign {
            lhs: lhs.to_string(),
            rhs: rhs.clone(),
        });
    }
    fn on_and(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        self.events.push(ReaderEvent::And {
            lhs: lhs.to_string(),
            op1: op1.clone(),
            op2: op2.clone(),
        });
    }
    fn on_or(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        self.events.push(ReaderEvent::Or {
            lhs: lhs.to_string(),
            op1: op1.clone(),
            op2: op2.clone(),
        });
    }
    fn on_xor(&mut self, lhs: &str, op1: &Signal, op2: &Signal) {
        self.events.push(ReaderEvent::Xor {
            lhs: lhs.to_string(),
            op1: op1.clone(),
            op2: op2.clone(),
        });
    }
    fn on_maj3(&mut self, lhs: &str, op1: &Signal, op2: &Signal, op3: &Signal) {
        self.events.push(ReaderEvent::Maj3 {
            lhs: lhs.to_string(),
            op1: op1.clone(),
            op2: op2.clone(),
            op3: op3.clone(),
        });
    }
    fn on_endmodule(&mut self) {
        self.events.push(ReaderEvent::Endmodule);
    }
    fn on_comment(&mut self, comment: &str) {
        self.events.push(ReaderEvent::Comment(comment.to_string()));
    }
}

/// Tally of constructs seen. Declaration counts are numbers of names, not
/// numbers of statements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventCounts {
    pub modules: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub wires: usize,
    pub aliases: usize,
    pub ands: usize,
    pub ors: usize,
    pub xors: usize,
    pub maj3s: usize,
    pub endmodules: usize,
    pub comments: usize,
}

impl EventCounts {
    /// Number of gate-producing assigns, aliases included.
    pub fn assigns(&self) -> usize {
        self.aliases + self.ands + self.ors + self.xors + self.maj3s
    }
}

impl VerilogReader for EventCounts {
    fn on_module_header(&mut self, _module_name: &str, _ports: &[String]) {
        self.modules += 1;
    }
    fn on_inputs(&mut self, inputs: &[String]) {
        self.inputs += inputs.len();
    }
    fn on_outputs(&mut self, outputs: &[String]) {
        self.outputs += outputs.len();
    }
    fn on_wires(&mut self, wires: &[String]) {
        self.wires += wires.len();
    }
    fn on_assign(&mut self, _lhs: &str, _rhs: &Signal) {
        self.aliases += 1;
    }
    fn on_and(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal) {
        self.ands += 1;
    }
    fn on_or(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal) {
        self.ors += 1;
    }
    fn on_xor(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal) {
        self.xors += 1;
    }
    fn on_maj3(&mut self, _lhs: &str, _op1: &Signal, _op2: &Signal, _op3: &Signal) {
        self.maj3s += 1;
    }
    fn on_endmodule(&mut self) {
        self.endmodules += 1;
    }
    fn on_comment(&mut self, _comment: &str) {
        self.comments += 1;
    }
}
