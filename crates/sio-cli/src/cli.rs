use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// sio-dump 命令行参数。
#[derive(Parser, Debug)]
#[command(name = "sio-dump")]
#[command(version, about = "Dump raw bytes received from a serial device")]
pub struct Cli {
    /// Baud rate (default 115200)
    #[arg(short = 's', long = "speed")]
    pub speed: Option<u32>,

    /// Receive buffer capacity in bytes (default 512)
    #[arg(short = 'B', long = "buflen")]
    pub buflen: Option<usize>,

    /// Open the device in blocking mode
    #[arg(short = 'b', long)]
    pub blocking: bool,

    /// Discard unconsumed bytes after every read
    #[arg(short = 'F', long)]
    pub flush: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'd', long, action = ArgAction::Count)]
    pub debug: u8,

    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serial device path, e.g. /dev/ttyUSB0
    pub device: Option<PathBuf>,
}
