use std::time::Duration;

use anyhow::Result;

use crate::types::{ProbeOutcome, ProbeResult, ProbeTarget, RunSummary};

/// Line printed before each attempt.
pub fn render_connecting(target: &ProbeTarget) -> String {
    format!("Connecting to {target} ...")
}

/// Human-readable status lines for one attempt.
pub fn render_result(result: &ProbeResult) -> Vec<String> {
    match &result.outcome {
        ProbeOutcome::Connected {
            latency_ms,
            send_ok,
        } => {
            let mut lines = vec![format!("Connected (latency: {latency_ms:.2} ms)")];
            match send_ok {
                Some(true) => lines.push("Payload sent".to_string()),
                Some(false) => lines.push("Payload send failed".to_string()),
                None => {}
            }
            lines
        }
        ProbeOutcome::Refused { code } => vec![format!("Connection failed (error code: {code})")],
        ProbeOutcome::TimedOut => vec!["Connection timed out".to_string()],
        ProbeOutcome::OtherError { message } => vec![format!("Error: {message}")],
    }
}

/// Notice printed between attempts.
pub fn render_wait(interval: Duration) -> String {
    let secs = interval.as_secs_f64();
    if interval.subsec_nanos() == 0 {
        format!("Waiting {secs:.0} s before retrying...")
    } else {
        format!("Waiting {secs:.1} s before retrying...")
    }
}

/// Single-line JSON rendering of a result for `--json`.
pub fn render_json(result: &ProbeResult) -> Result<String> {
    Ok(serde_json::to_string(result)?)
}

pub fn render_summary(summary: &RunSummary) -> String {
    format!(
        "Attempts: {} (connected: {}, timed out: {}, refused: {}, errors: {})",
        summary.attempts, summary.connected, summary.timed_out, summary.refused, summary.errors
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: ProbeOutcome) -> ProbeResult {
        ProbeResult {
            target: "127.0.0.1:5000".into(),
            outcome,
            timestamp: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn connected_with_payload() {
        let lines = render_result(&result(ProbeOutcome::Connected {
            latency_ms: 12.345,
            send_ok: Some(true),
        }));
        assert_eq!(lines, vec!["Connected (latency: 12.35 ms)", "Payload sent"]);
    }

    #[test]
    fn connected_without_payload_has_one_line() {
        let lines = render_result(&result(ProbeOutcome::Connected {
            latency_ms: 1.0,
            send_ok: None,
        }));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn failures() {
        assert_eq!(
            render_result(&result(ProbeOutcome::Refused { code: 111 })),
            vec!["Connection failed (error code: 111)"]
        );
        assert_eq!(
            render_result(&result(ProbeOutcome::TimedOut)),
            vec!["Connection timed out"]
        );
        assert_eq!(
            render_result(&result(ProbeOutcome::OtherError {
                message: "no route".into()
            })),
            vec!["Error: no route"]
        );
    }

    #[test]
    fn wait_notice() {
        assert_eq!(
            render_wait(Duration::from_secs(5)),
            "Waiting 5 s before retrying..."
        );
        assert_eq!(
            render_wait(Duration::from_millis(1500)),
            "Waiting 1.5 s before retrying..."
        );
    }

    #[test]
    fn json_is_flat_and_tagged() {
        let json = render_json(&result(ProbeOutcome::Refused { code: 111 })).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["outcome"], "refused");
        assert_eq!(v["code"], 111);
        assert_eq!(v["target"], "127.0.0.1:5000");
        assert!(!json.contains('\n'));
    }
}
