//! # mDNS Service Browsing
//!
//! Wire-level support for one-shot service discovery: building the PTR
//! browse query for a service type, and extracting fully-resolved
//! advertisements from response packets.
//!
//! Only self-contained answers are usable: a responder that advertises
//! SRV and address records in the same packet (the common mDNS behavior)
//! yields a [`ServiceHit`]; anything partial is skipped by the caller's
//! collection loop.

use std::collections::HashMap;
use std::net::IpAddr;

use anyhow::{Context, Result};
use dns_parser::{Builder, Packet, QueryClass, QueryType, RData};
use tracing::debug;

/// One fully-resolved service advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHit {
    /// Advertised hostname with the `.local` suffix stripped.
    pub hostname: String,
    pub address: IpAddr,
    pub port: u16,
}

/// Builds a one-question PTR browse query for `service_type`.
///
/// The unicast-response bit is set so responders answer the querying
/// socket directly instead of the multicast group.
pub fn build_browse_query(service_type: &str, id: u16) -> Result<Vec<u8>> {
    let mut builder = Builder::new_query(id, false);
    builder.add_question(service_type, true, QueryType::PTR, QueryClass::IN);
    builder
        .build()
        .map_err(|_| anyhow::anyhow!("browse query for '{service_type}' exceeds the packet size"))
}

/// Extracts every advertisement of `service_type` from a response packet.
///
/// SRV records carry the port and target hostname; A/AAAA records carry
/// the addresses. An SRV whose target has no address record in the same
/// packet cannot be resolved and is dropped with a debug line. Records
/// for other service types are ignored.
pub fn extract_services(data: &[u8], service_type: &str) -> Result<Vec<ServiceHit>> {
    let packet = Packet::parse(data).context("failed to parse mDNS packet")?;

    let mut services: Vec<(String, u16)> = Vec::new();
    let mut addresses: HashMap<String, IpAddr> = HashMap::new();

    for record in packet.answers.iter().chain(packet.additional.iter()) {
        let name: String = record.name.to_string();
        match &record.data {
            RData::SRV(srv) => {
                if name.ends_with(service_type) {
                    services.push((srv.target.to_string(), srv.port));
                }
            }

            // IPv4 takes precedence; within a family the first record wins.
            RData::A(a) => {
                let addr = IpAddr::V4(a.0);
                addresses
                    .entry(name)
                    .and_modify(|existing| {
                        if existing.is_ipv6() {
                            *existing = addr;
                        }
                    })
                    .or_insert(addr);
            }

            RData::AAAA(aaaa) => {
                addresses.entry(name).or_insert(IpAddr::V6(aaaa.0));
            }

            _ => {}
        }
    }

    let mut hits: Vec<ServiceHit> = Vec::new();
    for (target, port) in services {
        match addresses.get(&target) {
            Some(address) => hits.push(ServiceHit {
                hostname: strip_local_suffix(&target),
                address: *address,
                port,
            }),
            None => debug!("no address record for {target}, skipping"),
        }
    }

    Ok(hits)
}

fn strip_local_suffix(name: &str) -> String {
    let name = name.trim_end_matches('.');
    name.strip_suffix(".local").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const SERVICE: &str = "_bioreactor_api._tcp.local";

    const TYPE_A: u16 = 1;
    const TYPE_SRV: u16 = 33;

    fn encode_name(name: &str) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        for label in name.split('.') {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.push(0);
        out
    }

    fn record(name: &str, rtype: u16, rdata: &[u8]) -> Vec<u8> {
        let mut out = encode_name(name);
        out.extend_from_slice(&rtype.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&120u32.to_be_bytes());
        out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        out.extend_from_slice(rdata);
        out
    }

    fn srv_rdata(port: u16, target: &str) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&port.to_be_bytes());
        out.extend(encode_name(target));
        out
    }

    fn response_packet(records: &[Vec<u8>]) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(&0x2a2au16.to_be_bytes());
        out.extend_from_slice(&0x8400u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&(records.len() as u16).to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        for record in records {
            out.extend_from_slice(record);
        }
        out
    }

    #[test]
    fn browse_query_round_trips() {
        let bytes = build_browse_query(SERVICE, 7).unwrap();
        let packet = Packet::parse(&bytes).unwrap();

        assert_eq!(packet.header.id, 7);
        assert_eq!(packet.questions.len(), 1);
        let question = &packet.questions[0];
        assert_eq!(question.qname.to_string(), SERVICE);
        assert_eq!(question.qtype, QueryType::PTR);
        assert!(question.prefer_unicast);
    }

    #[test]
    fn extracts_complete_answer() {
        let bytes = response_packet(&[
            record(
                &format!("vat-1.{SERVICE}"),
                TYPE_SRV,
                &srv_rdata(9000, "bioreactor-01.local"),
            ),
            record("bioreactor-01.local", TYPE_A, &[192, 168, 7, 31]),
        ]);

        let hits = extract_services(&bytes, SERVICE).unwrap();
        assert_eq!(
            hits,
            vec![ServiceHit {
                hostname: "bioreactor-01".to_string(),
                address: IpAddr::V4(Ipv4Addr::new(192, 168, 7, 31)),
                port: 9000,
            }]
        );
    }

    #[test]
    fn skips_srv_without_address() {
        let bytes = response_packet(&[record(
            &format!("vat-2.{SERVICE}"),
            TYPE_SRV,
            &srv_rdata(9000, "bioreactor-02.local"),
        )]);

        assert!(extract_services(&bytes, SERVICE).unwrap().is_empty());
    }

    #[test]
    fn ignores_foreign_services() {
        let bytes = response_packet(&[
            record(
                "printer._ipp._tcp.local",
                TYPE_SRV,
                &srv_rdata(631, "printer.local"),
            ),
            record("printer.local", TYPE_A, &[10, 0, 0, 9]),
        ]);

        assert!(extract_services(&bytes, SERVICE).unwrap().is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(extract_services(&[0xff, 0x01, 0x02], SERVICE).is_err());
    }
}
