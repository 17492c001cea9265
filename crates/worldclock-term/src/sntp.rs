//! Blocking SNTP client built on `sntpc`.
//!
//! Sends one request per resolved address until a server answers. The
//! whole exchange shares a single timeout budget.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use sntpc::{NtpContext, StdTimestampGen};
use worldclock_core::config::SyncConfig;
use worldclock_core::sync::NTP_PORT;
use worldclock_core::{NtpSample, SyncError, TimeSyncResult, log_debug};

/// One-shot SNTP query settings.
#[derive(Debug, Clone)]
pub struct SntpClient {
    server: String,
    port: u16,
    timeout: Duration,
}

impl SntpClient {
    pub fn new(server: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            server: server.into(),
            port,
            timeout,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.server.clone(),
            config.port,
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// The server as shown in logs: `host`, or `host:port` off the default port.
    pub fn target(&self) -> String {
        if self.port == NTP_PORT {
            self.server.clone()
        } else {
            format!("{}:{}", self.server, self.port)
        }
    }

    /// Queries the server once. Never panics; every failure becomes a
    /// failed [`TimeSyncResult`].
    ///
    /// The timeout bounds the network exchange only. Hostname lookup
    /// goes through the system resolver and is not covered by it.
    pub fn sync(&self) -> TimeSyncResult {
        match self.query() {
            Ok(sample) => TimeSyncResult::success(self.target(), sample),
            Err(e) => TimeSyncResult::failure(self.target(), e),
        }
    }

    /// Tries each resolved address in turn, IPv4 first.
    ///
    /// Network failures move on to the next address; a reply that was
    /// received but rejected ends the query.
    pub fn query(&self) -> Result<NtpSample, SyncError> {
        let addrs = self.resolve()?;
        let deadline = Instant::now() + self.timeout;
        let mut last_error = None;

        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.query_addr(addr, remaining) {
                Ok(sample) => return Ok(sample),
                Err(e @ (SyncError::Io(_) | SyncError::Timeout { .. })) => {
                    log_debug!("Time sync: {addr} failed: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or_else(|| self.timeout_error()))
    }

    fn query_addr(&self, addr: SocketAddr, budget: Duration) -> Result<NtpSample, SyncError> {
        let socket = open_socket(addr, budget)?;
        let context = NtpContext::new(StdTimestampGen::default());
        let started = Instant::now();

        let reply = sntpc::get_time(addr, &socket, context).map_err(|e| match e {
            sntpc::Error::Network if started.elapsed() >= budget => self.timeout_error(),
            sntpc::Error::Network => SyncError::Io(format!("exchange with {addr} failed")),
            sntpc::Error::AddressResolve => SyncError::Resolve(addr.to_string()),
            sntpc::Error::IncorrectStratumHeaders => {
                SyncError::KissOfDeath("stratum 0 reply".into())
            }
            other => SyncError::Malformed(format!("{other:?}")),
        })?;

        Ok(NtpSample::from_micros(
            reply.offset(),
            reply.roundtrip(),
            reply.stratum(),
        ))
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>, SyncError> {
        let addrs: Vec<SocketAddr> = (self.server.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| SyncError::Resolve(format!("{}: {e}", self.server)))?
            .collect();
        if addrs.is_empty() {
            return Err(SyncError::Resolve(format!("{}: no addresses", self.server)));
        }
        Ok(ipv4_first(addrs))
    }

    fn timeout_error(&self) -> SyncError {
        SyncError::Timeout {
            millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Orders addresses so IPv4 is tried before IPv6, keeping resolver order
/// within each family.
fn ipv4_first(mut addrs: Vec<SocketAddr>) -> Vec<SocketAddr> {
    addrs.sort_by_key(SocketAddr::is_ipv6);
    addrs
}

/// Binds a socket of the same family as `addr` with read and write timeouts.
fn open_socket(addr: SocketAddr, timeout: Duration) -> Result<UdpSocket, SyncError> {
    let local: SocketAddr = if addr.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };
    let io = |e: std::io::Error| SyncError::Io(e.to_string());
    let socket = UdpSocket::bind(local).map_err(io)?;
    socket.set_read_timeout(Some(timeout)).map_err(io)?;
    socket.set_write_timeout(Some(timeout)).map_err(io)?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::thread;

    use super::*;

    /// Answers a single request with whatever `reply` builds.
    fn spawn_server(reply: impl FnOnce(&[u8]) -> Vec<u8> + Send + 'static) -> u16 {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = socket.local_addr().unwrap().port();
        thread::spawn(move || {
            let mut buf = [0u8; 128];
            let (len, peer) = socket.recv_from(&mut buf).unwrap();
            let response = reply(&buf[..len]);
            socket.send_to(&response, peer).unwrap();
        });
        port
    }

    /// A valid server reply from a clock `skew_secs` ahead of the client.
    fn skewed_reply(request: &[u8], skew_secs: u32, stratum: u8) -> Vec<u8> {
        let mut out = vec![0u8; 48];
        out[0] = 0x24; // LI 0, version 4, mode 4 (server)
        out[1] = stratum;
        out[12..16].copy_from_slice(b"LOCL");
        // Echo the client's transmit timestamp as originate.
        out[24..32].copy_from_slice(&request[40..48]);
        let secs = u32::from_be_bytes([request[40], request[41], request[42], request[43]])
            .wrapping_add(skew_secs);
        for range in [16..20, 32..36, 40..44] {
            out[range].copy_from_slice(&secs.to_be_bytes());
        }
        out[36..40].copy_from_slice(&request[44..48]);
        out[44..48].copy_from_slice(&request[44..48]);
        out
    }

    fn client(port: u16, timeout_ms: u64) -> SntpClient {
        SntpClient::new("127.0.0.1", port, Duration::from_millis(timeout_ms))
    }

    #[test]
    fn measures_offset_from_fake_server() {
        // Arrange
        let port = spawn_server(|req| skewed_reply(req, 10, 2));

        // Act
        let result = client(port, 2000).sync();

        // Assert
        assert!(result.succeeded, "{result}");
        assert!(
            (9.5..=10.01).contains(&result.offset_seconds),
            "offset {}",
            result.offset_seconds
        );
        assert!(result.round_trip_seconds < 1.0);
    }

    #[test]
    fn silent_server_times_out_within_bound() {
        // Bound but never answered.
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = silent.local_addr().unwrap().port();
        let started = Instant::now();

        let result = client(port, 300).sync();

        assert!(!result.succeeded);
        assert_eq!(result.error, Some(SyncError::Timeout { millis: 300 }));
        assert!(started.elapsed() < Duration::from_secs(6));
        drop(silent);
    }

    #[test]
    fn stratum_zero_reply_is_refused_service() {
        let port = spawn_server(|req| {
            let mut out = skewed_reply(req, 0, 0);
            out[12..16].copy_from_slice(b"DENY");
            out
        });

        let result = client(port, 2000).sync();

        assert!(
            matches!(result.error, Some(SyncError::KissOfDeath(_))),
            "{:?}",
            result.error
        );
    }

    #[test]
    fn client_mode_reply_is_malformed() {
        let port = spawn_server(|req| {
            let mut out = skewed_reply(req, 0, 2);
            out[0] = 0x23; // mode 3 (client)
            out
        });

        let result = client(port, 2000).sync();

        assert!(
            matches!(result.error, Some(SyncError::Malformed(_))),
            "{:?}",
            result.error
        );
    }

    #[test]
    fn unresolvable_host_is_a_resolve_error() {
        let client = SntpClient::new("host.invalid", NTP_PORT, Duration::from_millis(300));

        let result = client.sync();

        assert!(!result.succeeded);
        assert!(
            matches!(result.error, Some(SyncError::Resolve(_))),
            "{:?}",
            result.error
        );
    }

    #[test]
    fn ipv4_addresses_are_tried_first() {
        let v6 = SocketAddr::from((Ipv6Addr::LOCALHOST, 123));
        let v4a = SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 123));
        let v4b = SocketAddr::from((Ipv4Addr::LOCALHOST, 123));

        let ordered = ipv4_first(vec![v6, v4a, v4b]);

        assert_eq!(ordered, [v4a, v4b, v6]);
    }

    #[test]
    fn falls_through_to_ipv4_on_dual_stack_name() {
        // "localhost" usually resolves to both ::1 and 127.0.0.1; only
        // the IPv4 side answers here.
        let port = spawn_server(|req| skewed_reply(req, 5, 2));
        let client = SntpClient::new("localhost", port, Duration::from_millis(2000));

        let result = client.sync();

        assert!(result.succeeded, "{result}");
    }

    #[test]
    fn target_hides_default_port() {
        let default_port = SntpClient::new("pool.ntp.org", NTP_PORT, Duration::from_secs(5));
        let custom_port = SntpClient::new("localhost", 1123, Duration::from_secs(5));

        assert_eq!(default_port.target(), "pool.ntp.org");
        assert_eq!(custom_port.target(), "localhost:1123");
    }

    #[test]
    fn from_config_uses_timeout() {
        let config = SyncConfig {
            timeout_ms: 1234,
            ..Default::default()
        };

        let client = SntpClient::from_config(&config);

        assert_eq!(client.timeout, Duration::from_millis(1234));
        assert_eq!(client.target(), "pool.ntp.org");
    }
}
