// Route request header: the reactive protocol's RREQ wire layout
//
// Layout (big endian, 24 bytes):
//   type(1) = 1 | flags(1) J R G D U | reserved(1) | hop count(1)
//   request id(4) | destination(4) | destination seqno(4)
//   origin(4) | origin seqno(4)

use crate::error::WireError;
use std::net::Ipv4Addr;

/// Message type byte preceding every RREQ
pub const RREQ_TYPE: u8 = 1;

/// Encoded size including the type byte
pub const RREQ_WIRE_SIZE: usize = 24;

const FLAG_JOIN: u8 = 1 << 7;
const FLAG_REPAIR: u8 = 1 << 6;
const FLAG_GRATUITOUS: u8 = 1 << 5;
const FLAG_DESTINATION_ONLY: u8 = 1 << 4;
const FLAG_UNKNOWN_SEQNO: u8 = 1 << 3;

/// Route discovery request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequestHeader {
    pub join: bool,
    pub repair: bool,
    pub gratuitous: bool,
    pub destination_only: bool,
    pub unknown_seqno: bool,
    pub hop_count: u8,
    pub request_id: u32,
    pub destination: Ipv4Addr,
    pub destination_seqno: u32,
    pub origin: Ipv4Addr,
    pub origin_seqno: u32,
}

impl Default for RouteRequestHeader {
    fn default() -> Self {
        Self {
            join: false,
            repair: false,
            gratuitous: false,
            destination_only: false,
            unknown_seqno: false,
            hop_count: 0,
            request_id: 0,
            destination: Ipv4Addr::UNSPECIFIED,
            destination_seqno: 0,
            origin: Ipv4Addr::UNSPECIFIED,
            origin_seqno: 0,
        }
    }
}

impl RouteRequestHeader {
    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.join {
            flags |= FLAG_JOIN;
        }
        if self.repair {
            flags |= FLAG_REPAIR;
        }
        if self.gratuitous {
            flags |= FLAG_GRATUITOUS;
        }
        if self.destination_only {
            flags |= FLAG_DESTINATION_ONLY;
        }
        if self.unknown_seqno {
            flags |= FLAG_UNKNOWN_SEQNO;
        }
        flags
    }

    /// Serialize with the leading type byte
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RREQ_WIRE_SIZE);
        buf.push(RREQ_TYPE);
        buf.push(self.flags());
        buf.push(0); // reserved
        buf.push(self.hop_count);
        buf.extend_from_slice(&self.request_id.to_be_bytes());
        buf.extend_from_slice(&self.destination.octets());
        buf.extend_from_slice(&self.destination_seqno.to_be_bytes());
        buf.extend_from_slice(&self.origin.octets());
        buf.extend_from_slice(&self.origin_seqno.to_be_bytes());
        buf
    }

    /// Parse from the start of `bytes`, type byte included
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < RREQ_WIRE_SIZE {
            return Err(WireError::Truncated {
                expected: RREQ_WIRE_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != RREQ_TYPE {
            return Err(WireError::UnexpectedType(bytes[0]));
        }

        let flags = bytes[1];
        Ok(Self {
            join: flags & FLAG_JOIN != 0,
            repair: flags & FLAG_REPAIR != 0,
            gratuitous: flags & FLAG_GRATUITOUS != 0,
            destination_only: flags & FLAG_DESTINATION_ONLY != 0,
            unknown_seqno: flags & FLAG_UNKNOWN_SEQNO != 0,
            hop_count: bytes[3],
            request_id: read_u32(&bytes[4..8]),
            destination: read_addr(&bytes[8..12]),
            destination_seqno: read_u32(&bytes[12..16]),
            origin: read_addr(&bytes[16..20]),
            origin_seqno: read_u32(&bytes[20..24]),
        })
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn read_addr(bytes: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}
