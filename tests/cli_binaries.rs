use std::process::Command;

use test_support::config_file;

fn binary_output(path: &str, args: &[&str]) -> std::process::Output {
    Command::new(path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|error| panic!("failed to run {}: {}", path, error))
}

fn combined_utf8(output: &std::process::Output) -> String {
    let mut data = output.stdout.clone();
    data.extend_from_slice(&output.stderr);
    String::from_utf8(data).expect("binary output should be valid UTF-8")
}

#[test]
fn help_lists_usage() {
    let output = binary_output(env!("CARGO_BIN_EXE_allowed-senders"), &["--help"]);
    assert!(output.status.success(), "--help should succeed");
    assert!(
        output.stderr.is_empty(),
        "help output should not write to stderr"
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("allowed-senders"));
}

#[test]
fn rejects_unknown_flag() {
    let output = binary_output(
        env!("CARGO_BIN_EXE_allowed-senders"),
        &["--definitely-not-a-flag"],
    );
    assert!(
        !output.status.success(),
        "unknown flags should return a failure exit status"
    );
    let combined = combined_utf8(&output);
    assert!(combined.contains("--definitely-not-a-flag"));
}

#[test]
fn lists_configured_senders() {
    let config = config_file(
        "# relay hosts\n\
         $AllowedSender UDP, 192.0.2.0/24, [2001:db8::]/32\n\
         $AllowedSender tcp 127.0.0.1, *.example.net\n",
    );
    let path = config.path().to_str().expect("utf-8 path");
    let output = binary_output(
        env!("CARGO_BIN_EXE_allowed-senders"),
        &["--config", path, "--list"],
    );
    assert!(output.status.success(), "{}", combined_utf8(&output));
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert_eq!(
        stdout,
        "Allowed UDP Senders:\n\t192.0.2.0/24\n\t2001:db8::/32\n\
         Allowed TCP Senders:\n\t127.0.0.1/32\n\t*.example.net\n\
         Allowed GSS Senders:\n\tNo restrictions set.\n"
    );
}

#[test]
fn check_exit_status_follows_decision() {
    let config = config_file("$AllowedSender UDP, 192.0.2.0/24\n");
    let path = config.path().to_str().expect("utf-8 path");

    let accepted = binary_output(
        env!("CARGO_BIN_EXE_allowed-senders"),
        &["--disable-dns", "--config", path, "--check", "udp", "192.0.2.9:514"],
    );
    assert_eq!(accepted.status.code(), Some(0));
    assert!(combined_utf8(&accepted).contains("192.0.2.9:514: accepted over UDP"));

    let denied = binary_output(
        env!("CARGO_BIN_EXE_allowed-senders"),
        &["--disable-dns", "--config", path, "--check", "udp", "::ffff:198.51.100.3"],
    );
    assert_eq!(denied.status.code(), Some(1));
    assert!(combined_utf8(&denied).contains("denied over UDP"));

    let unrestricted = binary_output(
        env!("CARGO_BIN_EXE_allowed-senders"),
        &["--disable-dns", "--config", path, "--check", "gss", "198.51.100.3"],
    );
    assert_eq!(unrestricted.status.code(), Some(0));
}

#[test]
fn invalid_configuration_is_reported() {
    let config = config_file("$DisableDNS on\n$ACLAddHostnameOnFail maybe\n");
    let path = config.path().to_str().expect("utf-8 path");
    let output = binary_output(
        env!("CARGO_BIN_EXE_allowed-senders"),
        &["--config", path],
    );
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("line 2"));
    assert!(stderr.contains("invalid boolean value 'maybe'"));
}
