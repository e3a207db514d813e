//! Flow record types and protocol tagging.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport protocol of an observed flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    #[serde(untagged)]
    Other(String),
}

impl Protocol {
    /// Whether this flow carries TCP. Several feature heuristics key off this.
    #[inline]
    pub fn is_tcp(&self) -> bool {
        matches!(self, Protocol::Tcp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::Icmp => write!(f, "icmp"),
            Protocol::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Normalized description of one observed network flow, as reported by the
/// upstream collector. Immutable after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub source_ip: IpAddr,
    pub dest_ip: IpAddr,
    pub source_port: u16,
    pub dest_port: u16,
    pub protocol: Protocol,
    /// Total bytes carried by the flow.
    pub byte_count: u64,
    /// Total packets carried by the flow.
    pub packet_count: u64,
    /// Flow duration in milliseconds. Zero-duration flows clamp rate
    /// features to zero rather than erroring.
    pub flow_duration_ms: u64,
    pub observed_at: DateTime<Utc>,
    /// Identifier of the router/device that reported the flow.
    pub device_id: i64,
}

impl FlowRecord {
    /// `"src:sport -> dst:dport"`, the endpoint notation used in alert
    /// messages and logs.
    pub fn endpoints(&self) -> String {
        format!(
            "{}:{} -> {}:{}",
            self.source_ip, self.source_port, self.dest_ip, self.dest_port
        )
    }
}
