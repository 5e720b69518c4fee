//! Human readable card lines for a packet record.
//!
//! The IP envelope block always comes first, followed by the block of the
//! record's primary protocol.

use std::borrow::Cow;
use std::fmt;

use chrono::TimeZone;

use crate::models::domain::{ArpInfo, IcmpInfo, IpEnvelope, PacketRecord, Protocol, TcpInfo, UdpInfo};

pub const NO_FLAGS: &str = "NONE";
pub const EMPTY_PLACEHOLDER: &str = "En attente de paquets...";
const MISSING_TIME: &str = "--:--:--";

pub fn protocol_name(number: u32) -> Cow<'static, str> {
    match number {
        1 => Cow::Borrowed("ICMP"),
        6 => Cow::Borrowed("TCP"),
        17 => Cow::Borrowed("UDP"),
        n => Cow::Owned(format!("Proto {}", n)),
    }
}

pub fn tcp_info(service: &str, flags: &str) -> String {
    if flags == NO_FLAGS {
        service.to_string()
    } else {
        format!("{} ({})", service, flags)
    }
}

pub fn arp_opcode_label(opcode: u32) -> &'static str {
    if opcode == 1 {
        "Request"
    } else {
        "Reply"
    }
}

pub fn ip_lines(ip: &IpEnvelope) -> Vec<String> {
    vec![
        format!("Source: {}", ip.src_ip),
        format!("Destinataire: {}", ip.dst_ip),
        format!("Protocole: {} | TTL: {}", protocol_name(ip.protocol), ip.ttl),
    ]
}

fn tcp_lines(tcp: &TcpInfo) -> Vec<String> {
    vec![
        format!("Port: {} → {}", tcp.src_port, tcp.dst_port),
        format!("Info: {}", tcp_info(&tcp.service, &tcp.flags)),
    ]
}

fn udp_lines(udp: &UdpInfo) -> Vec<String> {
    vec![
        format!("Port: {} → {}", udp.src_port, udp.dst_port),
        format!("Info: {}", udp.service),
    ]
}

fn icmp_lines(icmp: &IcmpInfo) -> Vec<String> {
    vec![format!("Info: {}", icmp.type_name)]
}

fn arp_lines(arp: &ArpInfo) -> Vec<String> {
    vec![
        format!("Opcode: {}", arp_opcode_label(arp.opcode)),
        format!("Source: {} ({})", arp.src_ip, arp.src_mac),
        format!("Destinataire: {} ({})", arp.target_ip, arp.target_mac),
    ]
}

pub fn protocol_lines(protocol: &Protocol) -> Vec<String> {
    match protocol {
        Protocol::Arp(arp) => arp_lines(arp),
        Protocol::Tcp(tcp) => tcp_lines(tcp),
        Protocol::Udp(udp) => udp_lines(udp),
        Protocol::Icmp(icmp) => icmp_lines(icmp),
        Protocol::Unknown => Vec::new(),
    }
}

pub fn summarize(record: &PacketRecord) -> Vec<String> {
    let mut lines = record.ip.as_ref().map(ip_lines).unwrap_or_default();
    lines.extend(protocol_lines(&record.protocol));
    lines
}

/// Wall-clock `HH:MM:SS` of an epoch-seconds timestamp in `tz`.
pub fn format_time<Tz>(timestamp: Option<f64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(ts) = timestamp.filter(|ts| ts.is_finite()) else {
        return MISSING_TIME.to_string();
    };

    let secs = ts.floor();
    let nanos = (((ts - secs) * 1e9) as u32).min(999_999_999);

    match tz.timestamp_opt(secs as i64, nanos).single() {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => MISSING_TIME.to_string(),
    }
}

pub fn count_label(count: usize) -> String {
    if count > 1 {
        format!("{} paquets", count)
    } else {
        format!("{} paquet", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode_record;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    #[test]
    fn protocol_lookup() {
        assert_eq!(protocol_name(1), "ICMP");
        assert_eq!(protocol_name(6), "TCP");
        assert_eq!(protocol_name(17), "UDP");
        assert_eq!(protocol_name(253), "Proto 253");
        assert_eq!(protocol_name(0), "Proto 0");
    }

    #[test]
    fn tcp_info_line() {
        assert_eq!(tcp_info("HTTP", "NONE"), "HTTP");
        assert_eq!(tcp_info("HTTP", "SYN,ACK"), "HTTP (SYN,ACK)");
    }

    #[test]
    fn arp_opcode() {
        assert_eq!(arp_opcode_label(1), "Request");
        assert_eq!(arp_opcode_label(2), "Reply");
        assert_eq!(arp_opcode_label(0), "Reply");
        assert_eq!(arp_opcode_label(7), "Reply");
    }

    #[test]
    fn ip_block_precedes_protocol_block() {
        let record = decode_record(json!({
            "ip": {"src_ip": "192.168.1.10", "dst_ip": "1.1.1.1", "protocol": 17, "ttl": 63},
            "udp": {"src_port": 40000, "dst_port": 53, "service": "DNS"}
        }))
        .unwrap();

        assert_eq!(
            summarize(&record),
            vec![
                "Source: 192.168.1.10",
                "Destinataire: 1.1.1.1",
                "Protocole: UDP | TTL: 63",
                "Port: 40000 → 53",
                "Info: DNS",
            ]
        );
    }

    #[test]
    fn arp_block() {
        let record = decode_record(json!({
            "arp": {"opcode": 1, "src_ip": "192.168.1.1", "src_mac": "aa:bb:cc:dd:ee:ff",
                    "target_ip": "192.168.1.42", "target_mac": "00:00:00:00:00:00"}
        }))
        .unwrap();

        assert_eq!(
            summarize(&record),
            vec![
                "Opcode: Request",
                "Source: 192.168.1.1 (aa:bb:cc:dd:ee:ff)",
                "Destinataire: 192.168.1.42 (00:00:00:00:00:00)",
            ]
        );
    }

    #[test]
    fn icmp_and_unknown_blocks() {
        let icmp = decode_record(json!({"icmp": {"type_name": "Echo Reply"}})).unwrap();
        assert_eq!(summarize(&icmp), vec!["Info: Echo Reply"]);

        let bare = decode_record(json!({"timestamp": 1})).unwrap();
        assert!(summarize(&bare).is_empty());
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(Some(1_700_000_000.0), &Utc), "22:13:20");
        assert_eq!(format_time(Some(1_700_000_000.75), &Utc), "22:13:20");

        let paris = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_time(Some(1_700_000_000.0), &paris), "23:13:20");

        assert_eq!(format_time(None, &Utc), "--:--:--");
        assert_eq!(format_time(Some(f64::NAN), &Utc), "--:--:--");
    }

    #[test]
    fn count_labels() {
        assert_eq!(count_label(0), "0 paquet");
        assert_eq!(count_label(1), "1 paquet");
        assert_eq!(count_label(50), "50 paquets");
    }
}
