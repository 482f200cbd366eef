//! USB Device Enumeration and Monitoring Tool - CLI entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use usbinfo::classes::ClassRegistry;
use usbinfo::config::{Config, example_config};
use usbinfo::monitor::{LineInput, PresenceMonitor};
use usbinfo::{DescriptorReporter, DeviceSource, MonitorEvent, UsbBackend};

#[derive(Parser)]
#[command(name = "usbinfo")]
#[command(about = "USB device enumeration and monitoring tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: auto-detect)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report all connected devices
    List,

    /// Report devices as they are connected and disconnected
    Monitor,

    /// Print blank example config file
    InitConfig,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions early (doesn't need config or USB access)
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "usbinfo", &mut std::io::stdout());
        return Ok(());
    }

    init_logging();

    // Load config
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::List) | None => list_devices(&config),
        Some(Commands::Monitor) => monitor_devices(&config),
        Some(Commands::InitConfig) => {
            print!("{}", example_config());
            Ok(())
        }
        Some(Commands::Completions { .. }) => {
            // Handled above before loading config
            unreachable!()
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Enumerate once and report every device to stdout.
fn list_devices(config: &Config) -> Result<()> {
    let backend = UsbBackend::new()?;
    let registry = ClassRegistry::new();
    let reporter =
        DescriptorReporter::new(&registry).with_raw_descriptors(config.settings.show_descriptors);

    let devices: Vec<_> = backend
        .devices()?
        .into_iter()
        .filter(|device| !config.is_ignored(device.vendor_id, device.product_id))
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    reporter.write_devices(&mut out, &devices)?;
    out.flush()?;
    Ok(())
}

/// Monitor presence events until a line is read from stdin.
fn monitor_devices(config: &Config) -> Result<()> {
    let backend = UsbBackend::new()?;
    let mut monitor = PresenceMonitor::new(backend);

    let filter = config.clone();
    monitor.start(
        move |event: MonitorEvent| {
            let device = event.device();
            if filter.is_ignored(device.vendor_id, device.product_id) {
                return;
            }
            println!("{:<14}{}", format!("{}:", event.label()), device);
        },
        LineInput::with_prompt("Monitoring... Press ENTER to quit."),
    )?;
    Ok(())
}
