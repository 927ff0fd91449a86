use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Payload written after a successful connect.
pub const DEFAULT_PAYLOAD: &[u8] = b"test";

/// Default connect timeout and inter-attempt interval.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Host/port pair being probed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(v6)) => write!(f, "[{}]:{}", v6, self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

/// Classified result of one connection attempt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Connected {
        latency_ms: f64,
        /// `None` when the payload write is disabled.
        send_ok: Option<bool>,
    },
    TimedOut,
    Refused {
        code: i32,
    },
    OtherError {
        message: String,
    },
}

impl ProbeOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ProbeOutcome::Connected { .. })
    }
}

/// One attempt's result, timestamped for reporting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub target: String,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    pub timestamp: String,
}

/// Per-attempt settings.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub timeout: Duration,
    pub payload: Option<Vec<u8>>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            payload: Some(DEFAULT_PAYLOAD.to_vec()),
        }
    }
}

/// Outcome counters for a finished run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempts: u64,
    pub connected: u64,
    pub timed_out: u64,
    pub refused: u64,
    pub errors: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ProbeOutcome) {
        self.attempts += 1;
        match outcome {
            ProbeOutcome::Connected { .. } => self.connected += 1,
            ProbeOutcome::TimedOut => self.timed_out += 1,
            ProbeOutcome::Refused { .. } => self.refused += 1,
            ProbeOutcome::OtherError { .. } => self.errors += 1,
        }
    }
}
