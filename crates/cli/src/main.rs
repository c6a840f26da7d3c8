use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use sap::collector::{DEFAULT_SAP_GROUP, DEFAULT_SAP_PORT};
use sap::{Collector, ListenerConfig, WriteOutcome, playlist};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "sap-to-m3u",
    about = "Collect SAP announcements and generate an M3U playlist"
)]
struct Args {
    /// Duration to listen for announcements (seconds)
    #[arg(long, short, default_value_t = 15)]
    duration: u64,

    /// Output M3U file name
    #[arg(long, short, default_value = "sap_streams.m3u")]
    output: PathBuf,

    /// Multicast group address
    #[arg(long, short, default_value_t = DEFAULT_SAP_GROUP)]
    group: Ipv4Addr,

    /// SAP port number
    #[arg(long, short, default_value_t = DEFAULT_SAP_PORT)]
    port: u16,

    /// Network interface to use for multicast (e.g. eth0, wlan0)
    #[arg(long, short)]
    interface: Option<String>,

    /// Enable verbose debug output
    #[arg(long, short)]
    verbose: bool,
}

/// Running flag of the active collector, cleared from the SIGINT handler.
static RUNNING: OnceLock<Arc<AtomicBool>> = OnceLock::new();

#[cfg(unix)]
extern "C" fn on_sigint(_: nix::libc::c_int) {
    if let Some(running) = RUNNING.get() {
        running.store(false, Ordering::SeqCst);
    }
}

/// Ctrl+C ends collection early; the playlist is still written.
#[cfg(unix)]
fn install_interrupt_handler() {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    // No SA_RESTART: a blocked recv returns EINTR, so Ctrl+C is acted on at
    // once instead of after the next read timeout.
    let action = SigAction::new(
        SigHandler::Handler(on_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // SAFETY: the handler only reads a OnceLock and stores an AtomicBool,
    // both async-signal-safe, and replaces no other handler we rely on.
    if let Err(e) = unsafe { sigaction(Signal::SIGINT, &action) } {
        tracing::warn!(error = %e, "failed to install SIGINT handler");
    }
}

#[cfg(not(unix))]
fn install_interrupt_handler() {}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let collector = Collector::new(ListenerConfig {
        group: args.group,
        port: args.port,
        interface: args.interface,
        duration: Duration::from_secs(args.duration),
        ..ListenerConfig::default()
    });
    let _ = RUNNING.set(collector.running_flag());
    install_interrupt_handler();

    let registry = match collector.run() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !collector.is_running() {
        println!("\nInterrupted by user");
    }

    match playlist::write(&registry, &args.output) {
        Ok(WriteOutcome::Written(count)) => {
            println!("M3U playlist generated: {}", args.output.display());
            println!("Total streams: {}", count);
        }
        Ok(WriteOutcome::NothingToWrite) => println!("No streams found to generate playlist"),
        Err(e) => {
            eprintln!("Error: failed to write {}: {}", args.output.display(), e);
            return ExitCode::FAILURE;
        }
    }

    if registry.is_empty() {
        println!("No SAP announcements found");
    } else {
        println!("\nFound streams:");
        for session in registry.all() {
            println!(
                "  {} - {}",
                session.display_name(),
                session.stream_uri.as_deref().unwrap_or_default()
            );
        }
    }

    ExitCode::SUCCESS
}
