// Snapshot ingestion: raw JSON body -> typed packet records.

use serde_json::Value;
use tracing::warn;

use crate::models::domain::{PacketRecord, Protocol};
use crate::models::dto::PacketRecordDTO;

/// Decodes a whole snapshot body. The body must be a JSON array; entries
/// that do not decode are skipped so one bad record does not blank the board.
pub fn decode_snapshot(body: &[u8]) -> Result<Vec<PacketRecord>, serde_json::Error> {
    let entries: Vec<Value> = serde_json::from_slice(body)?;

    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match decode_record(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "skipping undecodable packet record");
                None
            }
        })
        .collect();

    Ok(records)
}

pub fn decode_record(entry: Value) -> Result<PacketRecord, serde_json::Error> {
    let raw: PacketRecordDTO = serde_json::from_value(entry)?;
    PacketRecord::try_from(raw)
}

impl TryFrom<PacketRecordDTO> for PacketRecord {
    type Error = serde_json::Error;

    fn try_from(raw: PacketRecordDTO) -> Result<Self, Self::Error> {
        // ARP > TCP > UDP > ICMP, first present sub-object wins. The losers are
        // never looked at, so a broken one cannot sink the record.
        let protocol = if let Some(arp) = raw.arp {
            Protocol::Arp(serde_json::from_value(arp)?)
        } else if let Some(tcp) = raw.tcp {
            Protocol::Tcp(serde_json::from_value(tcp)?)
        } else if let Some(udp) = raw.udp {
            Protocol::Udp(serde_json::from_value(udp)?)
        } else if let Some(icmp) = raw.icmp {
            Protocol::Icmp(serde_json::from_value(icmp)?)
        } else {
            Protocol::Unknown
        };

        Ok(PacketRecord {
            timestamp: raw.timestamp,
            scope: raw.scope,
            ip: raw.ip,
            protocol,
        })
    }
}
