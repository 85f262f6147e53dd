// Message module: control headers carried on behalf of the sub-protocols

pub mod rreq;

pub use rreq::{RouteRequestHeader, RREQ_TYPE, RREQ_WIRE_SIZE};
