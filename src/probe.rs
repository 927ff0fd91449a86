use crate::types::{ProbeConfig, ProbeOutcome, ProbeResult, ProbeTarget};
use ::time::{format_description::well_known, OffsetDateTime};
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};

/// Code reported for a refused connect that carried no OS error number.
pub const UNKNOWN_ERROR_CODE: i32 = -1;

/// Opens the connection for one attempt.
///
/// The stream is owned by the attempt and dropped before `probe_once_with` returns.
pub trait Connector {
    type Stream: AsyncWrite + Unpin + Send;

    fn connect(&self, addr: SocketAddr) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Plain TCP connects via tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, addr: SocketAddr) -> impl Future<Output = io::Result<TcpStream>> + Send {
        TcpStream::connect(addr)
    }
}

/// Probe `target` once over TCP.
pub async fn probe_once(target: &ProbeTarget, config: &ProbeConfig) -> ProbeResult {
    probe_once_with(&TcpConnector, target, config).await
}

/// Perform exactly one connection attempt against `target` and classify it.
///
/// - Resolution and connect share one deadline of `config.timeout`, so the call
///   returns within the timeout plus the (bounded) payload write.
/// - On connect, writes `config.payload` if set; a failed write only clears `send_ok`.
/// - Never returns an error: every failure is folded into `ProbeOutcome`.
pub async fn probe_once_with<C: Connector>(
    connector: &C,
    target: &ProbeTarget,
    config: &ProbeConfig,
) -> ProbeResult {
    let outcome = attempt(connector, target, config).await;
    ProbeResult {
        target: target.to_string(),
        outcome,
        timestamp: now_iso_like(),
    }
}

async fn attempt<C: Connector>(
    connector: &C,
    target: &ProbeTarget,
    config: &ProbeConfig,
) -> ProbeOutcome {
    let deadline = Instant::now() + config.timeout;

    let addr = match time::timeout_at(deadline, resolve(target)).await {
        Ok(Ok(addr)) => addr,
        Ok(Err(e)) => {
            return ProbeOutcome::OtherError {
                message: format!("failed to resolve {target}: {e}"),
            }
        }
        Err(_) => return ProbeOutcome::TimedOut,
    };

    let start = Instant::now();
    let connect_res = time::timeout_at(deadline, connector.connect(addr)).await;
    match connect_res {
        Ok(Ok(mut stream)) => {
            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
            let send_ok = match config.payload.as_deref() {
                Some(payload) => Some(send_payload(&mut stream, payload, config).await),
                None => None,
            };
            drop(stream);
            ProbeOutcome::Connected {
                latency_ms,
                send_ok,
            }
        }
        Ok(Err(e)) => classify_connect_error(&e),
        Err(_) => ProbeOutcome::TimedOut,
    }
}

async fn resolve(target: &ProbeTarget) -> io::Result<SocketAddr> {
    if let Ok(ip) = target.host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, target.port));
    }
    tokio::net::lookup_host((target.host.as_str(), target.port))
        .await?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses found"))
}

async fn send_payload<S: AsyncWrite + Unpin>(
    stream: &mut S,
    payload: &[u8],
    config: &ProbeConfig,
) -> bool {
    let write = async {
        stream.write_all(payload).await?;
        stream.flush().await
    };
    matches!(time::timeout(config.timeout, write).await, Ok(Ok(())))
}

/// Map a failed connect to an outcome.
///
/// OS-level failures (refused, unreachable, reset) become `Refused` with their
/// error number; a timeout reported by the OS is `TimedOut`.
pub fn classify_connect_error(err: &io::Error) -> ProbeOutcome {
    if err.kind() == io::ErrorKind::TimedOut {
        return ProbeOutcome::TimedOut;
    }
    match err.raw_os_error() {
        Some(code) if code != 0 => ProbeOutcome::Refused { code },
        _ if err.kind() == io::ErrorKind::ConnectionRefused => ProbeOutcome::Refused {
            code: UNKNOWN_ERROR_CODE,
        },
        _ => ProbeOutcome::OtherError {
            message: err.to_string(),
        },
    }
}

fn now_iso_like() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
