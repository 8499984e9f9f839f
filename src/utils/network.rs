// Network utilities - DNS resolution and bounded TCP connects

use crate::error::{ConnectionFailure, TlsError};
use crate::Result;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default HTTPS port
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Target information
#[derive(Debug, Clone)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
    pub ip_addresses: Vec<IpAddr>,
}

impl Target {
    /// Resolve `hostname` and build a target on `port`
    pub async fn resolve(hostname: &str, port: u16, dns_timeout: Duration) -> Result<Self> {
        let ip_addresses = resolve_hostname(hostname, dns_timeout).await?;

        Ok(Self {
            hostname: hostname.to_string(),
            port,
            ip_addresses,
        })
    }

    /// Get all socket addresses
    pub fn socket_addrs(&self) -> Vec<SocketAddr> {
        self.ip_addresses
            .iter()
            .map(|ip| SocketAddr::new(*ip, self.port))
            .collect()
    }

    /// `hostname:port` identifier used in logs and errors
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// Normalize a user-supplied domain name: trim, lower-case, drop a trailing dot
pub fn normalize_hostname(input: &str) -> Result<String> {
    let hostname = input.trim().trim_end_matches('.').to_ascii_lowercase();

    if hostname.is_empty() {
        return Err(TlsError::InvalidInput {
            message: "domain name is empty".to_string(),
        });
    }

    if hostname.contains(char::is_whitespace) || hostname.contains('/') {
        return Err(TlsError::InvalidInput {
            message: format!("invalid domain name: {}", input.trim()),
        });
    }

    // Only IPv6 literals may contain ':'; anything else is a host:port typo
    if hostname.contains(':') && hostname.parse::<IpAddr>().is_err() {
        return Err(TlsError::InvalidInput {
            message: format!(
                "invalid domain name: {} (set the port with --port)",
                input.trim()
            ),
        });
    }

    Ok(hostname)
}

/// Resolve hostname to IP addresses, bounded by `dns_timeout`
pub async fn resolve_hostname(hostname: &str, dns_timeout: Duration) -> Result<Vec<IpAddr>> {
    // Check if it's already an IP address
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
        tracing::debug!("System resolver config unavailable ({}), using defaults", e);
        TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
    });

    let response = match timeout(dns_timeout, resolver.lookup_ip(hostname)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            return Err(TlsError::Resolution {
                hostname: hostname.to_string(),
                details: e.to_string(),
            });
        }
        Err(_) => {
            return Err(TlsError::Resolution {
                hostname: hostname.to_string(),
                details: format!("lookup timed out after {:?}", dns_timeout),
            });
        }
    };

    let ips: Vec<IpAddr> = response.iter().collect();

    if ips.is_empty() {
        return Err(TlsError::Resolution {
            hostname: hostname.to_string(),
            details: "no IP addresses found".to_string(),
        });
    }

    Ok(ips)
}

/// Connect to a single address with timeout
pub async fn connect_with_timeout(
    addr: SocketAddr,
    connect_timeout: Duration,
) -> Result<TcpStream> {
    match timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(TlsError::Connection {
            target: addr.to_string(),
            reason: ConnectionFailure::from_io(&e),
            details: e.to_string(),
        }),
        Err(_) => Err(TlsError::Connection {
            target: addr.to_string(),
            reason: ConnectionFailure::TimedOut,
            details: format!("no response after {:?}", connect_timeout),
        }),
    }
}

/// Try every resolved address of `target` in order; the last failure wins
pub async fn connect_target(target: &Target, connect_timeout: Duration) -> Result<TcpStream> {
    let mut last_error = None;

    for addr in target.socket_addrs() {
        match connect_with_timeout(addr, connect_timeout).await {
            Ok(stream) => {
                tracing::debug!("Connected to {} ({})", target.identifier(), addr);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| TlsError::Resolution {
        hostname: target.hostname.clone(),
        details: "no addresses to connect to".to_string(),
    }))
}
