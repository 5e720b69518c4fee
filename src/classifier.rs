use std::fmt;

use crate::models::domain::{PacketRecord, Protocol};

pub const UNKNOWN_SCOPE: &str = "UNKNOWN";

/// Header badge shown on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayType {
    Arp,
    Tcp,
    Udp,
    Icmp,
    Other,
}

impl DisplayType {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayType::Arp => "ARP",
            DisplayType::Tcp => "TCP",
            DisplayType::Udp => "UDP",
            DisplayType::Icmp => "ICMP",
            DisplayType::Other => "OTHER",
        }
    }

    /// Style class for the badge.
    pub fn css_class(self) -> &'static str {
        match self {
            DisplayType::Arp => "arp",
            DisplayType::Tcp => "tcp",
            DisplayType::Udp => "udp",
            DisplayType::Icmp => "icmp",
            DisplayType::Other => "other",
        }
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub display_type: DisplayType,
    pub scope_label: String,
}

impl Classification {
    pub fn scope_class(&self) -> String {
        self.scope_label.to_lowercase()
    }
}

pub fn classify(record: &PacketRecord) -> Classification {
    Classification {
        display_type: display_type(&record.protocol),
        scope_label: scope_label(record).to_string(),
    }
}

pub fn display_type(protocol: &Protocol) -> DisplayType {
    match protocol {
        Protocol::Arp(_) => DisplayType::Arp,
        Protocol::Tcp(_) => DisplayType::Tcp,
        Protocol::Udp(_) => DisplayType::Udp,
        Protocol::Icmp(_) => DisplayType::Icmp,
        Protocol::Unknown => DisplayType::Other,
    }
}

/// Scope is opaque: passed through verbatim, empty or missing reads as UNKNOWN.
pub fn scope_label(record: &PacketRecord) -> &str {
    match record.scope.as_deref() {
        Some(scope) if !scope.is_empty() => scope,
        _ => UNKNOWN_SCOPE,
    }
}
