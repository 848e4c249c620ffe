//! Listener statistics sources.
//!
//! [`StatSource`] is the seam between the collector and the OS.
//! [`ProcfsStatSource`] is the Linux default: it scans the kernel's
//! `/proc/net/{tcp,tcp6,unix}` tables for the sampled endpoint. The
//! table scanners are pure functions over file contents so they can be
//! tested against fixture lines.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::StatQueryError;

/// Point-in-time statistics for one listening endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Connections currently being serviced.
    pub active: u64,
    /// Connections waiting in the accept queue.
    pub queued: u64,
}

/// A listening endpoint to sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// TCP listener, `host:port`.
    Tcp(String),
    /// Unix domain socket listener, filesystem path.
    Unix(PathBuf),
}

impl Endpoint {
    /// Classify an address string: `host:port` with an all-digit port is
    /// a TCP endpoint, anything else a filesystem socket path.
    pub fn parse(address: &str) -> Self {
        if is_tcp_address(address) {
            Self::Tcp(address.to_string())
        } else {
            Self::Unix(PathBuf::from(address))
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(address) => write!(f, "{address}"),
            Self::Unix(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_tcp_address(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Queries point-in-time statistics for a listening endpoint.
pub trait StatSource: Send + Sync {
    /// Current stats for `endpoint`, or `UnknownEndpoint` if no such
    /// listener exists.
    fn listener_stats(&self, endpoint: &Endpoint) -> Result<ListenerStats, StatQueryError>;
}

/// Linux stat source backed by the `/proc/net` socket tables.
pub struct ProcfsStatSource {
    net_root: PathBuf,
}

impl Default for ProcfsStatSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcfsStatSource {
    /// Source reading the live kernel tables under `/proc/net`.
    pub fn new() -> Self {
        Self {
            net_root: PathBuf::from("/proc/net"),
        }
    }

    /// Source reading tables from an alternate directory (tests).
    pub fn with_net_root(root: impl Into<PathBuf>) -> Self {
        Self {
            net_root: root.into(),
        }
    }

    fn tcp_stats(&self, address: &str) -> Result<ListenerStats, StatQueryError> {
        let port = tcp_port(address)?;
        let mut found = false;
        let mut stats = ListenerStats::default();

        // A listener may be bound on v4, v6, or both; sum across tables.
        for table in ["tcp", "tcp6"] {
            let path = self.net_root.join(table);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if let Some(table_stats) = scan_tcp_table(&content, port) {
                found = true;
                stats.active += table_stats.active;
                stats.queued += table_stats.queued;
            }
        }

        if found {
            Ok(stats)
        } else {
            Err(StatQueryError::UnknownEndpoint(address.to_string()))
        }
    }

    fn unix_stats(&self, socket_path: &Path) -> Result<ListenerStats, StatQueryError> {
        let content = std::fs::read_to_string(self.net_root.join("unix"))?;
        scan_unix_table(&content, &socket_path.to_string_lossy())
            .ok_or_else(|| StatQueryError::UnknownEndpoint(socket_path.display().to_string()))
    }
}

impl StatSource for ProcfsStatSource {
    fn listener_stats(&self, endpoint: &Endpoint) -> Result<ListenerStats, StatQueryError> {
        match endpoint {
            Endpoint::Tcp(address) => self.tcp_stats(address),
            Endpoint::Unix(path) => self.unix_stats(path),
        }
    }
}

fn tcp_port(address: &str) -> Result<u16, StatQueryError> {
    let Some((_, port)) = address.rsplit_once(':') else {
        return Err(StatQueryError::Malformed {
            address: address.to_string(),
            reason: "missing port".to_string(),
        });
    };
    port.parse::<u16>().map_err(|_| StatQueryError::Malformed {
        address: address.to_string(),
        reason: "port out of range".to_string(),
    })
}

// Socket states from include/net/tcp_states.h.
const TCP_ESTABLISHED: &str = "01";
const TCP_LISTEN: &str = "0A";

/// Scan one `/proc/net/tcp`-format table for the given listening port.
///
/// Returns `None` if no listener on that port appears in the table.
/// The listener row's rx_queue column is the current accept-queue depth;
/// established rows on the same local port are in-flight connections.
fn scan_tcp_table(content: &str, port: u16) -> Option<ListenerStats> {
    let mut found = false;
    let mut stats = ListenerStats::default();

    for line in content.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 {
            continue;
        }
        let Some((_, local_port_hex)) = parts[1].rsplit_once(':') else {
            continue;
        };
        let Ok(local_port) = u16::from_str_radix(local_port_hex, 16) else {
            continue;
        };
        if local_port != port {
            continue;
        }

        match parts[3] {
            TCP_LISTEN => {
                found = true;
                if let Some((_, rx_hex)) = parts[4].split_once(':') {
                    stats.queued += u64::from_str_radix(rx_hex, 16).unwrap_or(0);
                }
            }
            TCP_ESTABLISHED => stats.active += 1,
            _ => {}
        }
    }

    found.then_some(stats)
}

// Unix socket states from include/uapi/linux/net.h.
const UNIX_LISTENING: &str = "01";
const UNIX_CONNECTED: &str = "03";

// __SO_ACCEPTCON: the socket has had listen() called on it.
const UNIX_ACCEPTOR_FLAGS: &str = "00010000";

/// Scan a `/proc/net/unix`-format table for the given socket path.
///
/// Returns `None` if no listening socket is bound to that path.
/// Connected entries bearing the path are counted as active; the kernel
/// does not expose the accept-queue depth here, so `queued` is 0.
fn scan_unix_table(content: &str, socket_path: &str) -> Option<ListenerStats> {
    let mut found = false;
    let mut stats = ListenerStats::default();

    for line in content.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 8 || parts[7] != socket_path {
            continue;
        }

        if parts[5] == UNIX_LISTENING && parts[3] == UNIX_ACCEPTOR_FLAGS {
            found = true;
        } else if parts[5] == UNIX_CONNECTED {
            stats.active += 1;
        }
    }

    found.then_some(stats)
}
