//! In-memory sub-protocols and message channel for tests
//!
//! The fakes record every call they receive and answer with configurable
//! results, so tests can assert exactly which delegate the zone router
//! picked and what it was handed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use zrp_core::testing::{FakeProactive, FakeReactive};
//!
//! let mut proactive = FakeProactive::new();
//! proactive.add_topology_entry(TopologyEntry { destination, distance: 1 });
//! let router = ZoneRouter::new(proactive, FakeReactive::new());
//! ```

use crate::context::NetworkContext;
use crate::error::RoutingError;
use crate::net::{InterfaceIndex, Ipv4Header, Packet, Route};
use crate::protocol::{
    ForwardHandler, MessageChannel, ProactiveProtocol, ReactiveProtocol, RoutingProtocol,
    TopologyEntry,
};
use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

// ============================================================================
// CALL RECORDS
// ============================================================================

/// One `route_output` call as seen by a fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCall {
    pub packet: Packet,
    pub header: Ipv4Header,
    pub output_interface: Option<InterfaceIndex>,
}

/// One `route_input` call as seen by a fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCall {
    pub packet: Packet,
    pub header: Ipv4Header,
    pub input_interface: Option<InterfaceIndex>,
}

/// What a fake does when asked to route an inbound packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Return false without touching the handler
    Decline,
    /// Local-deliver on the input interface (0 if none)
    Deliver,
    /// Unicast-forward along this route
    Forward(Route),
    /// Report this error through the handler and return false
    Fail(RoutingError),
}

/// Shared recording state behind both fakes
struct DelegateRecorder {
    context: Option<Arc<dyn NetworkContext>>,
    output_result: Option<Result<Route, RoutingError>>,
    input_action: InputAction,
    output_calls: Vec<OutputCall>,
    input_calls: Vec<InputCall>,
}

impl DelegateRecorder {
    fn new() -> Self {
        Self {
            context: None,
            output_result: None,
            input_action: InputAction::Decline,
            output_calls: Vec::new(),
            input_calls: Vec::new(),
        }
    }

    fn route_output(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        output_interface: Option<InterfaceIndex>,
    ) -> Result<Route, RoutingError> {
        self.output_calls.push(OutputCall {
            packet: packet.clone(),
            header: *header,
            output_interface,
        });
        match &self.output_result {
            Some(result) => result.clone(),
            None => Ok(Route::new(
                header.destination,
                Ipv4Addr::UNSPECIFIED,
                output_interface.unwrap_or(1),
            )),
        }
    }

    fn route_input(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        input_interface: Option<InterfaceIndex>,
        handler: &mut dyn ForwardHandler,
    ) -> bool {
        self.input_calls.push(InputCall {
            packet: packet.clone(),
            header: *header,
            input_interface,
        });
        match &self.input_action {
            InputAction::Decline => false,
            InputAction::Deliver => {
                handler.local_deliver(packet, header, input_interface.unwrap_or(0));
                true
            }
            InputAction::Forward(route) => {
                handler.unicast_forward(*route, packet, header);
                true
            }
            InputAction::Fail(err) => {
                handler.error(packet, header, err.clone());
                false
            }
        }
    }
}

// ============================================================================
// FAKE PROACTIVE
// ============================================================================

/// Proactive protocol with a hand-written topology table
pub struct FakeProactive {
    recorder: DelegateRecorder,
    topology: Vec<TopologyEntry>,
    hello_count: usize,
    tc_count: usize,
    received: Vec<(Packet, SocketAddrV4)>,
}

impl Default for FakeProactive {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProactive {
    pub fn new() -> Self {
        Self {
            recorder: DelegateRecorder::new(),
            topology: Vec::new(),
            hello_count: 0,
            tc_count: 0,
            received: Vec::new(),
        }
    }

    pub fn add_topology_entry(&mut self, entry: TopologyEntry) {
        self.topology.push(entry);
    }

    pub fn clear_topology(&mut self) {
        self.topology.clear();
    }

    /// Answer every `route_output` with `result`
    pub fn set_output_result(&mut self, result: Result<Route, RoutingError>) {
        self.recorder.output_result = Some(result);
    }

    pub fn fail_output(&mut self, err: RoutingError) {
        self.set_output_result(Err(err));
    }

    pub fn set_input_action(&mut self, action: InputAction) {
        self.recorder.input_action = action;
    }

    /// Shorthand: deliver locally when true, decline when false
    pub fn handle_input(&mut self, handled: bool) {
        self.set_input_action(if handled { InputAction::Deliver } else { InputAction::Decline });
    }

    pub fn has_context(&self) -> bool {
        self.recorder.context.is_some()
    }

    pub fn output_calls(&self) -> &[OutputCall] {
        &self.recorder.output_calls
    }

    pub fn input_calls(&self) -> &[InputCall] {
        &self.recorder.input_calls
    }

    pub fn hello_count(&self) -> usize {
        self.hello_count
    }

    pub fn tc_count(&self) -> usize {
        self.tc_count
    }

    pub fn received(&self) -> &[(Packet, SocketAddrV4)] {
        &self.received
    }
}

impl RoutingProtocol for FakeProactive {
    fn set_network_context(&mut self, context: Arc<dyn NetworkContext>) {
        self.recorder.context = Some(context);
    }

    fn route_output(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        output_interface: Option<InterfaceIndex>,
    ) -> Result<Route, RoutingError> {
        self.recorder.route_output(packet, header, output_interface)
    }

    fn route_input(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        input_interface: Option<InterfaceIndex>,
        handler: &mut dyn ForwardHandler,
    ) -> bool {
        self.recorder.route_input(packet, header, input_interface, handler)
    }
}

impl ProactiveProtocol for FakeProactive {
    fn hello_timer_expire(&mut self) {
        self.hello_count += 1;
    }

    fn tc_timer_expire(&mut self) {
        self.tc_count += 1;
    }

    fn receive(&mut self, packet: Packet, sender: SocketAddrV4) {
        self.received.push((packet, sender));
    }

    fn topology_entries(&self) -> Vec<TopologyEntry> {
        self.topology.clone()
    }
}

// ============================================================================
// FAKE REACTIVE
// ============================================================================

/// Reactive protocol that records calls
pub struct FakeReactive {
    recorder: DelegateRecorder,
}

impl Default for FakeReactive {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeReactive {
    pub fn new() -> Self {
        Self {
            recorder: DelegateRecorder::new(),
        }
    }

    pub fn set_output_result(&mut self, result: Result<Route, RoutingError>) {
        self.recorder.output_result = Some(result);
    }

    pub fn fail_output(&mut self, err: RoutingError) {
        self.set_output_result(Err(err));
    }

    pub fn set_input_action(&mut self, action: InputAction) {
        self.recorder.input_action = action;
    }

    pub fn handle_input(&mut self, handled: bool) {
        self.set_input_action(if handled { InputAction::Deliver } else { InputAction::Decline });
    }

    pub fn has_context(&self) -> bool {
        self.recorder.context.is_some()
    }

    pub fn output_calls(&self) -> &[OutputCall] {
        &self.recorder.output_calls
    }

    pub fn input_calls(&self) -> &[InputCall] {
        &self.recorder.input_calls
    }
}

impl RoutingProtocol for FakeReactive {
    fn set_network_context(&mut self, context: Arc<dyn NetworkContext>) {
        self.recorder.context = Some(context);
    }

    fn route_output(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        output_interface: Option<InterfaceIndex>,
    ) -> Result<Route, RoutingError> {
        self.recorder.route_output(packet, header, output_interface)
    }

    fn route_input(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        input_interface: Option<InterfaceIndex>,
        handler: &mut dyn ForwardHandler,
    ) -> bool {
        self.recorder.route_input(packet, header, input_interface, handler)
    }
}

impl ReactiveProtocol for FakeReactive {}

// ============================================================================
// CHANNEL
// ============================================================================

/// FIFO message channel
#[derive(Debug, Default)]
pub struct QueueChannel {
    queue: VecDeque<(Packet, SocketAddrV4)>,
    bound: Option<InterfaceIndex>,
}

impl QueueChannel {
    pub fn new(bound: Option<InterfaceIndex>) -> Self {
        Self {
            queue: VecDeque::new(),
            bound,
        }
    }

    pub fn push(&mut self, packet: Packet, sender: SocketAddrV4) {
        self.queue.push_back((packet, sender));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl MessageChannel for QueueChannel {
    fn recv_from(&mut self) -> Option<(Packet, SocketAddrV4)> {
        self.queue.pop_front()
    }

    fn bound_interface(&self) -> Option<InterfaceIndex> {
        self.bound
    }
}
