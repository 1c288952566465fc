use std::ffi::OsString;
use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use acl::{AclOptions, Protocol};
use clap::{Arg, ArgAction, Command, value_parser};
use dns::{Resolver, SystemResolver};
use hostname::NamingOptions;
use logging::{DiagnosticSink, TracingSink, init_tracing};
use receiver::{Admission, Gatekeeper, ReceiverConfig};
use socket2::SockAddr;

const PROGRAM_NAME: &str = "allowed-senders";

const EXIT_OK: u8 = 0;
/// Exit status when the checked peer is denied or dropped.
const EXIT_DENIED: u8 = 1;
/// Exit status for usage and configuration errors.
const EXIT_CONFIG: u8 = 2;

#[derive(Debug)]
struct ParsedArgs {
    config: Option<PathBuf>,
    disable_dns: bool,
    list: bool,
    check: Option<(String, String)>,
    verbosity: u8,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Show allowed-sender lists and check peers against them.")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Read directives from FILE.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("disable-dns")
                .long("disable-dns")
                .help("Start with DNS lookups disabled, as if by $DisableDNS on.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .short('l')
                .help("Print the allowed-sender list of every protocol.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .num_args(2)
                .value_names(["PROTO", "ADDRESS"])
                .help("Decide whether ADDRESS may send over PROTO (udp, tcp or gss)."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more detail; repeat for debug output.")
                .action(ArgAction::Count),
        )
}

fn parse_args<I>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;
    let check = matches
        .remove_many::<String>("check")
        .and_then(|mut values| Some((values.next()?, values.next()?)));

    Ok(ParsedArgs {
        config: matches.remove_one::<PathBuf>("config"),
        disable_dns: matches.get_flag("disable-dns"),
        list: matches.get_flag("list"),
        check,
        verbosity: matches.get_count("verbose"),
    })
}

/// Runs the tool with `args`, writing results to `stdout` and errors to
/// `stderr`.
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    ExitCode::from(run(args, stdout, stderr))
}

fn run<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> u8
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render();
            let written = if error.use_stderr() {
                write!(stderr, "{rendered}")
            } else {
                write!(stdout, "{rendered}")
            };
            if written.is_err() {
                return EXIT_CONFIG;
            }
            return u8::try_from(error.exit_code()).unwrap_or(EXIT_CONFIG);
        }
    };

    init_tracing(match parsed.verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    });

    let dns: Arc<dyn Resolver> = Arc::new(SystemResolver::new());
    let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);

    let config = match load_config(&parsed, dns.as_ref(), sink.as_ref()) {
        Ok(config) => config,
        Err(message) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {message}");
            return EXIT_CONFIG;
        }
    };

    if parsed.list || parsed.check.is_none() {
        for protocol in Protocol::ALL {
            if write!(stdout, "{}", config.senders().listing(protocol)).is_err() {
                return EXIT_CONFIG;
            }
        }
    }

    let Some((protocol, address)) = parsed.check else {
        return EXIT_OK;
    };
    let (protocol, peer) = match parse_check(&protocol, &address) {
        Ok(check) => check,
        Err(message) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {message}");
            return EXIT_CONFIG;
        }
    };

    let gatekeeper = Gatekeeper::new(config, dns, sink);
    let (line, status) = match gatekeeper.admit(protocol, &peer) {
        Admission::Accepted(host) => (
            format!("{address}: accepted over {protocol} as {}", host.host()),
            EXIT_OK,
        ),
        Admission::Denied(host) => (
            format!("{address}: denied over {protocol} as {}", host.host()),
            EXIT_DENIED,
        ),
        Admission::Dropped(error) => (
            format!("{address}: dropped, {error}"),
            EXIT_DENIED,
        ),
    };
    if writeln!(stdout, "{line}").is_err() {
        return EXIT_CONFIG;
    }
    status
}

fn load_config(
    parsed: &ParsedArgs,
    dns: &dyn Resolver,
    sink: &dyn DiagnosticSink,
) -> Result<ReceiverConfig, String> {
    let mut naming = NamingOptions::from_system();
    let mut acl = AclOptions::default();
    if parsed.disable_dns {
        naming.dns_enabled = false;
        acl.dns_enabled = false;
    }

    let initial = ReceiverConfig::with_options(acl, naming);
    match &parsed.config {
        Some(path) => initial
            .apply_file(path, dns, sink)
            .map_err(|error| error.to_string()),
        None => Ok(initial),
    }
}

fn parse_check(protocol: &str, address: &str) -> Result<(Protocol, SockAddr), String> {
    let protocol = protocol
        .parse::<Protocol>()
        .map_err(|error| error.to_string())?;
    let socket = address
        .parse::<SocketAddr>()
        .or_else(|_| address.parse::<IpAddr>().map(|ip| SocketAddr::new(ip, 0)))
        .map_err(|_| format!("invalid peer address '{address}'"))?;
    Ok((protocol, SockAddr::from(socket)))
}
