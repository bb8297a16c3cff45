use std::error::Error;

use clap::{Parser, Subcommand, ValueEnum};
use data_encoding::HEXLOWER;
use multiaddr::{ip, Multiaddr, Protocol, Size};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(name = "maddr", about = "Encode, decode and inspect multiaddrs.")]
struct Opts {
    /// How addresses are printed.
    #[clap(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Hex,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the binary form of a textual address as hex.
    Encode { address: Multiaddr },
    /// Print the textual form of a hex encoded address.
    Decode { hex: String },
    /// List the protocols of an address, or the whole registry if none is given.
    Protocols { address: Option<Multiaddr> },
    /// Append `inner` to `address`.
    Encapsulate { address: Multiaddr, inner: Multiaddr },
    /// Strip the last occurrence of `outer` and everything after it.
    Decapsulate { address: Multiaddr, outer: Multiaddr },
    /// Parse an IPv4 or IPv6 address and print its 16 byte form.
    ParseIp {
        text: String,
        /// Accept an IPv6 zone (`fe80::1%eth0`).
        #[clap(long)]
        zone: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let opts = Opts::parse();
    tracing::debug!(?opts, "Running command");

    for line in run(opts.command, opts.format)? {
        println!("{line}");
    }
    Ok(())
}

fn run(command: Command, format: Format) -> Result<Vec<String>, Box<dyn Error>> {
    let lines = match command {
        Command::Encode { address } => vec![HEXLOWER.encode(address.as_ref())],
        Command::Decode { hex } => {
            let bytes = HEXLOWER.decode(hex.to_ascii_lowercase().as_bytes())?;
            vec![Multiaddr::try_from(bytes)?.to_string()]
        }
        Command::Protocols { address: Some(address) } => address
            .protocols()?
            .into_iter()
            .map(describe)
            .collect(),
        Command::Protocols { address: None } => Protocol::iter().map(describe).collect(),
        Command::Encapsulate { address, inner } => {
            vec![render(&address.encapsulate(&inner), format)]
        }
        Command::Decapsulate { address, outer } => match address.try_decapsulate(&outer)? {
            Some(prefix) => vec![render(&prefix, format)],
            None => return Err(format!("{outer} does not occur in {address}").into()),
        },
        Command::ParseIp { text, zone } => parse_ip(&text, zone)?,
    };
    Ok(lines)
}

fn render(address: &Multiaddr, format: Format) -> String {
    match format {
        Format::Text => address.to_string(),
        Format::Hex => HEXLOWER.encode(address.as_ref()),
    }
}

fn describe(protocol: &Protocol) -> String {
    let size = match protocol.size() {
        Size::Fixed(bits) => format!("{bits} bits"),
        Size::None => "no address".to_owned(),
        Size::LengthPrefixed => "length prefixed".to_owned(),
    };
    format!(
        "{:<6} {:>4} 0x{:<6} {size}",
        protocol.name(),
        protocol.code(),
        HEXLOWER.encode(protocol.encoded_code()),
    )
}

fn parse_ip(text: &str, zone_allowed: bool) -> Result<Vec<String>, Box<dyn Error>> {
    let mut lines = Vec::new();
    if zone_allowed && text.contains(':') {
        let (bytes, zone) = ip::parse_ipv6(text, true)?;
        lines.push(HEXLOWER.encode(&bytes));
        lines.push(ip::Ip::V6(bytes).to_string());
        if let Some(zone) = zone {
            lines.push(format!("zone {zone}"));
        }
    } else {
        let ip = ip::parse(text)?;
        lines.push(HEXLOWER.encode(&ip.to_ipv6()));
        lines.push(ip.to_string());
    }
    Ok(lines)
}
