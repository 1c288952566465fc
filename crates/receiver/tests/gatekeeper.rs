//! Admission decisions end to end.

use acl::Protocol;
use hostname::{NamingOptions, ResolveError, ResolveOutcome};
use logging::MemorySink;
use receiver::{Admission, Gatekeeper, ReceiverConfig};
use socket2::SockAddr;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use test_support::StubResolver;

const TRUSTED: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 10);
const STRANGER: Ipv4Addr = Ipv4Addr::new(198, 51, 100, 7);
const FORGER: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 66);

fn peer(ip: Ipv4Addr) -> SockAddr {
    SockAddr::from(SocketAddr::from((ip, 514)))
}

fn stub() -> Arc<StubResolver> {
    Arc::new(
        StubResolver::new()
            .with_ptr(IpAddr::V4(TRUSTED), "collector.example.com.")
            .with_ptr(IpAddr::V4(STRANGER), "mail.example.com")
            .with_ptr(IpAddr::V4(FORGER), "192.0.2.10"),
    )
}

fn config(text: &str, dns: &StubResolver) -> ReceiverConfig {
    let naming = NamingOptions {
        local_domain: "example.com".to_owned(),
        ..NamingOptions::default()
    };
    ReceiverConfig::with_naming(naming)
        .apply(text, Path::new("gatekeeper.conf"), dns, &MemorySink::new())
        .expect("valid config")
}

fn gatekeeper(text: &str) -> (Gatekeeper, Arc<MemorySink>) {
    let dns = stub();
    let config = config(text, &dns);
    let sink = Arc::new(MemorySink::new());
    let gatekeeper = Gatekeeper::new(config, dns, Arc::clone(&sink) as Arc<dyn logging::DiagnosticSink>);
    (gatekeeper, sink)
}

#[test]
fn network_rule_admits_by_address() {
    let (gatekeeper, sink) = gatekeeper("$AllowedSender UDP, 192.0.2.0/24\n");

    match gatekeeper.admit(Protocol::Udp, &peer(TRUSTED)) {
        Admission::Accepted(host) => {
            assert_eq!(host.host(), "collector");
            assert_eq!(host.fqdn(), "collector.example.com");
        }
        other => panic!("expected acceptance, got {other:?}"),
    }

    let denied = gatekeeper.admit(Protocol::Udp, &peer(STRANGER));
    assert!(matches!(&denied, Admission::Denied(host) if host.host() == "mail"));
    assert!(sink.contains("UDP message from disallowed sender mail discarded"));
}

#[test]
fn pattern_rule_uses_the_verified_name() {
    let (gatekeeper, _sink) = gatekeeper("$AllowedSender TCP, mail.example.*\n");
    assert!(gatekeeper.admit(Protocol::Tcp, &peer(STRANGER)).is_accepted());
    assert!(!gatekeeper.admit(Protocol::Tcp, &peer(TRUSTED)).is_accepted());
}

#[test]
fn forged_name_never_matches_a_pattern() {
    let (gatekeeper, sink) = gatekeeper("$AllowedSender UDP, 192.0.2.10\n$AllowedSender TCP, *\n");

    let udp = gatekeeper.admit(Protocol::Udp, &peer(FORGER));
    let Admission::Denied(host) = udp else {
        panic!("forged PTR must not satisfy an address rule: {udp:?}");
    };
    assert_eq!(host.host(), "203.0.113.66");
    assert_eq!(host.outcome(), ResolveOutcome::Ok);
    assert!(host.verified_name().is_none());

    assert!(!gatekeeper.admit(Protocol::Tcp, &peer(FORGER)).is_accepted());
    assert!(sink.contains("Malicious PTR record (message accepted"));
}

#[test]
fn forged_name_is_dropped_when_configured() {
    let (gatekeeper, _sink) = gatekeeper("$DropMsgsWithMaliciousDnsPTRRecords on\n");
    let admission = gatekeeper.admit(Protocol::Udp, &peer(FORGER));
    assert_eq!(
        admission,
        Admission::Dropped(ResolveError::MaliciousEntity {
            ip: IpAddr::V4(FORGER),
            ptr_name: "192.0.2.10".to_owned(),
        })
    );
    assert!(admission.peer().is_none());
}

#[test]
fn unrestricted_protocol_accepts_everyone() {
    let (gatekeeper, _sink) = gatekeeper("$AllowedSender UDP, 192.0.2.0/24\n");
    for ip in [TRUSTED, STRANGER, FORGER] {
        assert!(gatekeeper.admit(Protocol::Gss, &peer(ip)).is_accepted());
    }
}

#[test]
fn reload_replaces_the_snapshot() {
    let (gatekeeper, sink) = gatekeeper("$AllowedSender UDP, 192.0.2.0/24\n");
    let before = gatekeeper.snapshot();
    assert!(!gatekeeper.admit(Protocol::Udp, &peer(STRANGER)).is_accepted());

    let dns = stub();
    gatekeeper.reload(config("$AllowedSender UDP, 198.51.100.0/24\n", &dns));
    assert!(gatekeeper.admit(Protocol::Udp, &peer(STRANGER)).is_accepted());
    assert!(!gatekeeper.admit(Protocol::Udp, &peer(TRUSTED)).is_accepted());

    assert_eq!(before.senders().listing(Protocol::Udp), "Allowed UDP Senders:\n\t192.0.2.0/24\n");
    assert!(sink.contains("configuration reloaded"));
}

#[test]
fn admissions_run_concurrently_with_reloads() {
    let (gatekeeper, _sink) = gatekeeper("$AllowedSender UDP, 192.0.2.0/24\n");
    let gatekeeper = Arc::new(gatekeeper);

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let gatekeeper = Arc::clone(&gatekeeper);
            thread::spawn(move || {
                for _ in 0..200 {
                    let admission = gatekeeper.admit(Protocol::Udp, &peer(TRUSTED));
                    assert!(matches!(admission, Admission::Accepted(_) | Admission::Denied(_)));
                }
            })
        })
        .collect();

    let dns = stub();
    for round in 0..20 {
        let text = if round % 2 == 0 {
            "$AllowedSender UDP, 198.51.100.0/24\n"
        } else {
            "$AllowedSender UDP, 192.0.2.0/24\n"
        };
        gatekeeper.reload(config(text, &dns));
    }

    for worker in workers {
        worker.join().expect("worker thread");
    }
    assert!(gatekeeper.admit(Protocol::Udp, &peer(TRUSTED)).is_accepted());
}
