use tcp_probe_rs::target::parse_target;
use tcp_probe_rs::types::ProbeTarget;

#[test]
fn parse_hostname_ipv4_and_ipv6_targets() {
    let t = parse_target("  localhost:22 ").expect("parse ok");
    assert_eq!(t, ProbeTarget::new("localhost", 22).unwrap());

    let t: ProbeTarget = "10.0.0.7:65535".parse().expect("parse ok");
    assert_eq!(t.host, "10.0.0.7");
    assert_eq!(t.port, 65535);
    assert_eq!(t.to_string(), "10.0.0.7:65535");

    let t = parse_target("[fe80::1]:443").expect("parse ok");
    assert_eq!(t.host, "fe80::1");
    assert_eq!(t.to_string(), "[fe80::1]:443");
}

#[test]
fn malformed_targets_rejected() {
    for bad in ["", "localhost", "localhost:", "[::1]", "[::1:80", "host:-1", "host:99999"] {
        assert!(parse_target(bad).is_err(), "accepted {bad:?}");
    }
}
