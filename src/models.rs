pub mod domain {
    use serde::{Deserialize, Serialize};

    /// One captured packet, decoded once at ingestion.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PacketRecord {
        /// Epoch seconds.
        pub timestamp: Option<f64>,
        pub scope: Option<String>,
        pub ip: Option<IpEnvelope>,
        pub protocol: Protocol,
    }

    /// Primary protocol of a record. Only one survives decoding.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Protocol {
        Arp(ArpInfo),
        Tcp(TcpInfo),
        Udp(UdpInfo),
        Icmp(IcmpInfo),
        Unknown,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct IpEnvelope {
        pub src_ip: String,
        pub dst_ip: String,
        /// IANA protocol number.
        pub protocol: u32,
        pub ttl: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TcpInfo {
        pub src_port: u16,
        pub dst_port: u16,
        pub service: String,
        /// Comma separated flag names, `"NONE"` when no flag is set.
        pub flags: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct UdpInfo {
        pub src_port: u16,
        pub dst_port: u16,
        pub service: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct IcmpInfo {
        pub type_name: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub icmp_type: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub code: Option<u8>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ArpInfo {
        pub opcode: u32,
        pub src_ip: String,
        pub src_mac: String,
        pub target_ip: String,
        pub target_mac: String,
    }
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use super::domain::IpEnvelope;

    /// Snapshot entry as written by the capture process. Protocol
    /// sub-objects are keyed by presence and kept raw here: only the one that
    /// wins the priority order is decoded. Unknown keys (`eth`) are ignored.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct PacketRecordDTO {
        #[serde(default)]
        pub timestamp: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub scope: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub ip: Option<IpEnvelope>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub arp: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tcp: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub udp: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub icmp: Option<Value>,
    }
}
