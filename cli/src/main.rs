//! CLI for discovering live hosts on every local subnet using ARP
//!
//! # Examples
//!
//! ```bash
//! # help menu
//! sudo hostsweep --help
//!
//! # scan every local subnet for 5 seconds
//! sudo hostsweep
//!
//! # scan for 30 seconds and print json including vendors
//! sudo hostsweep --timeout 30 --vendor --json
//! ```
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use hostsweep::{
    cancel::CancelToken,
    error::{Result as LibResult, ScanError},
    host::Host,
    scanners::{SWEEP_INTERVAL, ScanMessage, Scanner, host_scanner::HostScanner},
};
use itertools::Itertools;
use log::*;
use serde::Serialize;
use std::{
    net::Ipv4Addr,
    sync::mpsc::{self, Receiver},
    thread::{self, JoinHandle},
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// CLI for discovering live hosts on local area networks
struct Args {
    /// Stop scanning after this many seconds
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Output final report in json instead of table text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Perform vendor lookups
    #[arg(long, default_value_t = false)]
    vendor: bool,

    /// Only print final output nothing else
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Prints debug logs including those from hostsweep
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Pause in milliseconds between two sweeps of the same subnet
    #[arg(long, default_value_t = SWEEP_INTERVAL.as_millis() as u64)]
    sweep_interval_ms: u64,
}

/// A discovered host as printed in the final report
#[derive(Debug, Serialize, PartialEq, Eq)]
struct HostReport {
    ip: Ipv4Addr,
    mac: String,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor: Option<String>,
}

#[doc(hidden)]
fn initialize_logger(args: &Args) -> Result<()> {
    let filter = if args.quiet {
        simplelog::LevelFilter::Error
    } else if args.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    simplelog::TermLogger::init(
        filter,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[doc(hidden)]
fn print_args(args: &Args) {
    info!("configuration:");
    info!("timeout:           {}s", args.timeout);
    info!("json:              {}", args.json);
    info!("vendor:            {}", args.vendor);
    info!("quiet:             {}", args.quiet);
    info!("sweep_interval_ms: {}", args.sweep_interval_ms);
}

/// Stops the scanner once `timeout` elapses unless `done` is cancelled first
#[doc(hidden)]
fn start_timer(
    scanner: impl Scanner + 'static,
    timeout: Duration,
    done: CancelToken,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if !done.wait_timeout(timeout) {
            info!("timeout reached, stopping scan...");
            scanner.stop();
        }
    })
}

/// Drains the scan stream. Hosts are returned even when the scan failed, the
/// failure is handed back separately so it can be reported after them
#[doc(hidden)]
fn process_hosts(scanner: &dyn Scanner, rx: Receiver<ScanMessage>) -> (Vec<Host>, LibResult<()>) {
    let mut hosts: Vec<Host> = Vec::new();

    info!("starting host scan...");

    let handle = scanner.scan();

    for msg in rx {
        match msg {
            ScanMessage::HostFound(host) => {
                info!("found host {}", host);
                hosts.push(host);
            }
            ScanMessage::Done => {
                debug!("scanning complete");
                break;
            }
        }
    }

    let result = handle.join().map_err(ScanError::from).and_then(|r| r);

    (hosts, result)
}

#[doc(hidden)]
fn lookup_vendor(host: &Host) -> String {
    oui_data::lookup(&host.mac().to_string())
        .map(|v| v.organization().to_owned())
        .unwrap_or_default()
}

#[doc(hidden)]
fn build_reports(hosts: &[Host], include_vendor: bool) -> Vec<HostReport> {
    hosts
        .iter()
        .sorted()
        .dedup()
        .map(|host| HostReport {
            ip: host.ip(),
            mac: host.mac().to_string(),
            id: host.id().to_string(),
            vendor: include_vendor.then(|| lookup_vendor(host)),
        })
        .collect()
}

#[doc(hidden)]
fn print_hosts(args: &Args, reports: &[HostReport]) -> Result<()> {
    info!("scan results:");

    if args.json {
        let j: String = serde_json::to_string(reports)?;
        println!("{}", j);
        return Ok(());
    }

    let mut table = prettytable::Table::new();

    if args.vendor {
        table.add_row(prettytable::row!["IP", "MAC", "VENDOR", "ID"]);
    } else {
        table.add_row(prettytable::row!["IP", "MAC", "ID"]);
    }

    for r in reports {
        match &r.vendor {
            Some(vendor) => table.add_row(prettytable::row![r.ip, r.mac, vendor, r.id]),
            None => table.add_row(prettytable::row![r.ip, r.mac, r.id]),
        };
    }

    table.printstd();

    Ok(())
}

#[doc(hidden)]
#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[doc(hidden)]
#[cfg(windows)]
fn is_root() -> bool {
    // raw socket operations require admin privileges
    use std::process::Command;
    Command::new("net")
        .args(["session"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[doc(hidden)]
fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(&args)?;

    if !is_root() {
        return Err(eyre!("permission denied: must run with root privileges"));
    }

    print_args(&args);

    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = HostScanner::builder()
        .notifier(tx)
        .sweep_interval(Duration::from_millis(args.sweep_interval_ms))
        .build()?;

    let interrupted = scanner.clone();

    ctrlc::set_handler(move || {
        info!("captured ctrl-c, stopping scan...");
        interrupted.stop();
    })
    .map_err(|err| eyre!("failed to set ctrl-c handler: {}", err))?;

    let done = CancelToken::new();
    let timer = start_timer(
        scanner.clone(),
        Duration::from_secs(args.timeout),
        done.clone(),
    );

    let (hosts, result) = process_hosts(&scanner, rx);

    done.cancel();

    timer
        .join()
        .map_err(|e| eyre!("timer thread panicked: {:?}", e))?;

    print_hosts(&args, &build_reports(&hosts, args.vendor))?;

    result?;

    Ok(())
}

#[cfg(test)]
#[path = "./main_tests.rs"]
mod tests;
