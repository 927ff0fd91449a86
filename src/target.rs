use anyhow::{bail, Context, Result};
use std::str::FromStr;

use crate::types::ProbeTarget;

/// Host probed when no target is given on the command line.
pub const DEFAULT_HOST: &str = "47.120.71.251";
pub const DEFAULT_PORT: u16 = 5000;

impl ProbeTarget {
    /// Build a target, rejecting an empty host or port 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        let host = host.trim();
        if host.is_empty() {
            bail!("empty host");
        }
        if port == 0 {
            bail!("port out of range: 0");
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl FromStr for ProbeTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_target(s)
    }
}

/// Parse `host:port` or `[ipv6]:port` into a `ProbeTarget`.
///
/// Bare IPv6 literals must be bracketed; `::1:80` is ambiguous and rejected.
pub fn parse_target(s: &str) -> Result<ProbeTarget> {
    let s = s.trim();
    let (host, port) = if let Some(rest) = s.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .with_context(|| format!("missing closing ']' in target: {s}"))?;
        let port = tail
            .strip_prefix(':')
            .with_context(|| format!("missing port after ']' in target: {s}"))?;
        (host, port)
    } else {
        let (host, port) = s
            .rsplit_once(':')
            .with_context(|| format!("missing port in target: {s}"))?;
        if host.contains(':') {
            bail!("IPv6 targets must be written as [addr]:port: {s}");
        }
        (host, port)
    };

    let port = parse_port_str(port.trim()).with_context(|| format!("invalid port in target: {s}"))?;
    ProbeTarget::new(host, port).with_context(|| format!("invalid target: {s}"))
}

fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s.parse::<u32>().map_err(|e| anyhow::anyhow!(e))?;
    if val == 0 || val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}
