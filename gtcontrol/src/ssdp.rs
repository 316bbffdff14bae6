//! SSDP search for UPnP media renderers.
//!
//! This is a *control point* socket: it binds an ephemeral port, sends
//! M-SEARCH to the SSDP multicast group and collects the unicast
//! HTTP/200 replies. It must not bind UDP port 1900, which belongs to
//! devices answering searches.

use socket2::{Domain, Protocol, SockRef, Socket, Type};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250";
pub const SSDP_PORT: u16 = 1900;

/// Search target for UPnP AV media renderers
pub const MEDIA_RENDERER_TARGET: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

// MX caps at 5 per the UPnP architecture document.
const MAX_MX: u64 = 5;

/// One M-SEARCH reply from a device.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub location: String,
    pub usn: String,
    pub st: String,
    pub server: String,
    pub from: SocketAddr,
}

/// A bounded SSDP search over all non-loopback IPv4 interfaces.
pub struct SsdpSearch {
    socket: UdpSocket,
    interfaces: Vec<Ipv4Addr>,
}

impl SsdpSearch {
    /// Bind an ephemeral UDP port and join the SSDP group on every
    /// usable interface. Join failures are logged and non-fatal: search
    /// replies arrive unicast, the group is only needed for NOTIFY.
    pub fn open() -> std::io::Result<Self> {
        let socket2 = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket2.set_reuse_address(true)?;

        let bind_addr: SocketAddr = "0.0.0.0:0".parse().unwrap();
        socket2.bind(&bind_addr.into())?;

        let socket: UdpSocket = socket2.into();
        socket.set_read_timeout(Some(Duration::from_secs(1)))?;
        socket.set_multicast_loop_v4(true)?; // lets a locally running renderer answer

        let multicast_addr: Ipv4Addr = SSDP_MULTICAST_ADDR.parse().unwrap();
        let mut interfaces = Vec::new();
        for iface in get_if_addrs::get_if_addrs()? {
            if let std::net::IpAddr::V4(ipv4) = iface.ip() {
                if !ipv4.is_loopback() {
                    match socket.join_multicast_v4(&multicast_addr, &ipv4) {
                        Ok(()) => {
                            debug!("SSDP: joined {} on {}", SSDP_MULTICAST_ADDR, ipv4);
                        }
                        Err(e) => {
                            warn!(
                                "SSDP: failed to join {} on {}: {}",
                                SSDP_MULTICAST_ADDR, ipv4, e
                            );
                        }
                    }
                    interfaces.push(ipv4);
                }
            }
        }

        Ok(Self { socket, interfaces })
    }

    /// Send an M-SEARCH for `target` and collect replies for the whole
    /// `window`, deduplicated by location in arrival order.
    pub fn search(&self, target: &str, window: Duration) -> std::io::Result<Vec<SearchResponse>> {
        let mx = window.as_secs().min(MAX_MX) as u32;
        self.send_msearch(target, mx)?;

        let deadline = Instant::now() + window;
        let mut buf = [0u8; 8192];
        let mut responses: Vec<SearchResponse> = Vec::new();

        while Instant::now() < deadline {
            match self.socket.recv_from(&mut buf) {
                Ok((n, from)) => {
                    let data = String::from_utf8_lossy(&buf[..n]);
                    if let Some(response) = parse_search_response(&data, from) {
                        if responses.iter().any(|r| r.location == response.location) {
                            trace!("SSDP: duplicate response for {}", response.location);
                        } else {
                            debug!("📥 SSDP response: {} at {}", response.st, response.location);
                            responses.push(response);
                        }
                    }
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(responses)
    }

    /// Send one M-SEARCH per interface so multi-homed hosts reach every
    /// segment. When no interface took the datagram, fall back to the
    /// kernel's default route.
    fn send_msearch(&self, st: &str, mx: u32) -> std::io::Result<()> {
        let mx = mx.max(1); // MX must be >= 1
        let msg = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}:{}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: {}\r\n\
             ST: {}\r\n\
             USER-AGENT: GeoTune SSDP Client\r\n\
             \r\n",
            SSDP_MULTICAST_ADDR, SSDP_PORT, mx, st
        );

        let addr: SocketAddr = format!("{}:{}", SSDP_MULTICAST_ADDR, SSDP_PORT)
            .parse()
            .unwrap();

        let mut sent = 0usize;
        for iface in &self.interfaces {
            let sock_ref = SockRef::from(&self.socket);
            if let Err(e) = sock_ref.set_multicast_if_v4(iface) {
                warn!("SSDP: cannot route M-SEARCH via {}: {}", iface, e);
                continue;
            }
            match self.socket.send_to(msg.as_bytes(), addr) {
                Ok(_) => sent += 1,
                Err(e) => warn!("SSDP: failed to send M-SEARCH via {}: {}", iface, e),
            }
        }

        if sent == 0 {
            self.socket.send_to(msg.as_bytes(), addr)?;
        }

        info!("📤 M-SEARCH sent (ST={}, MX={})", st, mx);
        Ok(())
    }
}

fn parse_search_response(data: &str, from: SocketAddr) -> Option<SearchResponse> {
    let mut lines = data.lines();
    let first_line = lines.next()?.trim();
    let upper = first_line.to_ascii_uppercase();

    if !upper.starts_with("HTTP/") || !upper.contains(" 200 ") {
        trace!("SSDP: not a search response from {}: {}", from, first_line);
        return None;
    }

    let headers = parse_headers(lines);

    // ST, USN and LOCATION are required by the UPnP spec.
    let st = headers.get("ST")?.to_string();
    let usn = headers.get("USN")?.to_string();
    let location = match headers.get("LOCATION") {
        Some(loc) => loc.to_string(),
        None => {
            trace!("SSDP: response from {} missing LOCATION header, ignoring", from);
            return None;
        }
    };
    let server = headers
        .get("SERVER")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    Some(SearchResponse {
        location,
        usn,
        st,
        server,
        from,
    })
}

fn parse_headers<'a, I>(lines: I) -> HashMap<String, String>
where
    I: Iterator<Item = &'a str>,
{
    let mut headers = HashMap::new();
    for line in lines {
        let line = line.trim();

        // Empty line marks end of headers
        if line.is_empty() {
            break;
        }

        // Split on first ':' only (values may contain ':')
        if let Some(colon_pos) = line.find(':') {
            let (name, value_with_colon) = line.split_at(colon_pos);
            let value = &value_with_colon[1..];

            let name = name.trim().to_ascii_uppercase();
            let value = value.trim().to_string();

            if !name.is_empty() && !value.is_empty() {
                headers.insert(name, value);
            } else {
                trace!("SSDP: skipping malformed header: '{}'", line);
            }
        } else {
            trace!("SSDP: skipping line without colon: '{}'", line);
        }
    }
    headers
}
