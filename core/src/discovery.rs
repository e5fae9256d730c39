//! # Fleet Discovery Service
//!
//! Finds the appliances advertising the fleet service type on the local
//! network. One call opens its own multicast listener, broadcasts a
//! single browse query, collects answers until the caller's window
//! closes, and returns a deduplicated, hostname-sorted device list.
//!
//! The listener is a local of the call, created and dropped inside one
//! invocation on every path. There is no shared discovery state.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::sleep;
use tracing::debug;

use reactorctl_common::device::Device;
use reactorctl_common::range;
use reactorctl_common::{success, warn};
use reactorctl_protocols::mdns;

/// Service type advertised by every fleet appliance.
pub const SERVICE_TYPE: &str = "_bioreactor_api._tcp.local";

const MDNS_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
const MDNS_PORT: u16 = 5353;
const RECV_BUF_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to open the discovery listener")]
    Listener(#[source] std::io::Error),
    #[error("failed to send the browse query")]
    Query(#[source] anyhow::Error),
}

/// Browses the network for fleet appliances for `timeout`, then returns
/// the sorted device list.
///
/// `selected` restricts the result to devices whose hostname ordinal is
/// in the set; `None` keeps every device. An empty network yields an
/// empty list, not an error. Advertisements that cannot be parsed or
/// resolved are logged and skipped without aborting the pass.
pub async fn discover(
    timeout: Duration,
    selected: Option<&BTreeSet<u32>>,
) -> Result<Vec<Device>, DiscoveryError> {
    let socket = open_listener().await?;

    let query = mdns::build_browse_query(SERVICE_TYPE, rand::random())
        .map_err(DiscoveryError::Query)?;
    socket
        .send_to(&query, (MDNS_GROUP, MDNS_PORT))
        .await
        .map_err(|e| DiscoveryError::Query(e.into()))?;

    let mut seen: HashMap<String, Device> = HashMap::new();
    let mut buf = vec![0u8; RECV_BUF_LEN];

    let window = sleep(timeout);
    tokio::pin!(window);

    loop {
        tokio::select! {
            res = socket.recv_from(&mut buf) => {
                match res {
                    Ok((len, src)) => collect_answers(&buf[..len], src, &mut seen),
                    Err(e) => warn!("discovery receive error: {e}"),
                }
            }

            _ = &mut window => {
                break;
            }
        }
    }
    drop(socket);

    let devices = finish(seen, selected);
    success!("{} device/s discovered", devices.len());
    Ok(devices)
}

async fn open_listener() -> Result<UdpSocket, DiscoveryError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .map_err(DiscoveryError::Listener)?;
    socket
        .join_multicast_v4(MDNS_GROUP, Ipv4Addr::UNSPECIFIED)
        .map_err(DiscoveryError::Listener)?;
    Ok(socket)
}

fn collect_answers(data: &[u8], src: SocketAddr, seen: &mut HashMap<String, Device>) {
    let hits = match mdns::extract_services(data, SERVICE_TYPE) {
        Ok(hits) => hits,
        Err(e) => {
            debug!("ignoring packet from {src}: {e}");
            return;
        }
    };

    for hit in hits {
        register(seen, Device::new(hit.hostname, hit.address, hit.port));
    }
}

/// First advertisement wins: responders re-announce the same data, and
/// keeping the first answer makes the pass independent of re-announcement
/// timing.
fn register(seen: &mut HashMap<String, Device>, device: Device) {
    match seen.entry(device.hostname.clone()) {
        Entry::Occupied(_) => {}
        Entry::Vacant(slot) => {
            debug!("found {device}");
            slot.insert(device);
        }
    }
}

fn finish(seen: HashMap<String, Device>, selected: Option<&BTreeSet<u32>>) -> Vec<Device> {
    let mut devices: Vec<Device> = seen.into_values().collect();
    devices.sort();
    match selected {
        Some(ordinals) => range::filter_by_ordinal(devices, ordinals),
        None => devices,
    }
}
