//! CSR bitfield decoder CLI.
//!
//! This binary wraps the `csrdec-core` library with a command-line surface. It performs:
//! 1. **Decode:** Break one register value into per-field values.
//! 2. **Diff:** Given an XOR mask (before ^ after), list the fields that changed.
//! 3. **Compare:** Given two register values, list the fields whose values differ.
//!
//! All subcommands build the catalog from `--spec`, optionally enrich it from
//! `--access`, and render either a human-readable table or `--json` output.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use csrdec_core::access::ConflictPolicy;
use csrdec_core::engine::{Compare, Decode, Diff};
use csrdec_core::{Catalog, Error, build_catalog, compare, decode, diff, enrich_catalog};

#[derive(Parser, Debug)]
#[command(
    name = "csrdec",
    version,
    about = "Decode RISC-V CSR values against unified-db register definitions",
    long_about = "Decode, diff, or compare CSR values using a directory of per-register\n\
                  YAML/JSON definition files (riscv-unified-db style).\n\n\
                  Examples:\n  \
                  csrdec decode --spec spec/csrs --csr mstatus --value 0x1888\n  \
                  csrdec diff --spec spec/csrs --csr mstatus --xor 0x8000000000004000\n  \
                  csrdec compare --spec spec/csrs --csr mstatus --value1 0xa00002000 --value2 0x8000000a00006000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
struct CommonOpts {
    /// Directory of register definition files (*.yml / *.yaml / *.json).
    #[arg(long, value_name = "DIR")]
    spec: PathBuf,

    /// Access-configuration file (YAML/JSON) to enrich fields with access classes.
    #[arg(long, value_name = "FILE")]
    access: Option<PathBuf>,

    /// On repeated access declarations for one field, keep the first instead of the last.
    #[arg(long, requires = "access")]
    first_wins: bool,

    /// Output machine-readable JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a CSR value into its bitfields.
    Decode {
        #[command(flatten)]
        common: CommonOpts,

        /// CSR name (e.g. mstatus), matched exactly.
        #[arg(long)]
        csr: String,

        /// Value to decode (hex 0x..., binary 0b..., or decimal).
        #[arg(long, value_parser = parse_int)]
        value: u64,

        /// One-line output: name[hi:lo]=binary pairs.
        #[arg(long)]
        compact: bool,
    },

    /// Given an XOR mask (before ^ after), list which fields changed.
    Diff {
        #[command(flatten)]
        common: CommonOpts,

        /// CSR name, matched exactly.
        #[arg(long)]
        csr: String,

        /// XOR mask value (hex/bin/dec).
        #[arg(long, value_parser = parse_int)]
        xor: u64,
    },

    /// Compare two CSR values and show the differing fields.
    Compare {
        #[command(flatten)]
        common: CommonOpts,

        /// CSR name, matched exactly.
        #[arg(long)]
        csr: String,

        /// First value (hex/bin/dec).
        #[arg(long, value_parser = parse_int)]
        value1: u64,

        /// Second value (hex/bin/dec).
        #[arg(long, value_parser = parse_int)]
        value2: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => {}
        Err(e @ Error::UnknownRegister { .. }) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Dispatches one subcommand against a freshly built catalog.
fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Decode {
            common,
            csr,
            value,
            compact,
        } => {
            let catalog = load_catalog(&common)?;
            let decoded = decode(&catalog, &csr, value)?;
            if common.json {
                print_json(&decoded);
            } else {
                print_decode(&decoded, compact);
            }
        }
        Commands::Diff { common, csr, xor } => {
            let catalog = load_catalog(&common)?;
            let changes = diff(&catalog, &csr, xor)?;
            if common.json {
                print_json(&changes);
            } else {
                print_diff(&changes);
            }
        }
        Commands::Compare {
            common,
            csr,
            value1,
            value2,
        } => {
            let catalog = load_catalog(&common)?;
            let differences = compare(&catalog, &csr, value1, value2)?;
            if common.json {
                print_json(&differences);
            } else {
                print_compare(&differences);
            }
        }
    }
    Ok(())
}

/// Builds the catalog from the spec directory and applies optional enrichment.
///
/// Scan warnings and enrichment metrics go to stderr so stdout stays clean for
/// `--json` consumers.
fn load_catalog(common: &CommonOpts) -> Result<Catalog, Error> {
    let (mut catalog, warnings) = build_catalog(&common.spec)?;
    eprintln!(
        "loaded {} register definitions from '{}' ({} warnings)",
        catalog.len(),
        common.spec.display(),
        warnings.len()
    );

    if let Some(access_path) = &common.access {
        let policy = if common.first_wins {
            ConflictPolicy::FirstWins
        } else {
            ConflictPolicy::LastWins
        };
        let report = enrich_catalog(&mut catalog, access_path, policy)?;
        eprintln!(
            "access enrichment: {} of {} entries applied, {} unmatched",
            report.enriched,
            report.loaded,
            report.unmatched.len()
        );
    }
    Ok(catalog)
}

/// Parses a numeric literal: `0x...` hex, `0b...` binary, or decimal.
/// Underscore separators are tolerated.
fn parse_int(s: &str) -> Result<u64, String> {
    let cleaned = s.trim().replace('_', "");
    let (radix, digits) = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(bin) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        (2, bin)
    } else {
        (10, cleaned.as_str())
    };
    u64::from_str_radix(digits, radix).map_err(|e| format!("invalid numeric literal '{s}': {e}"))
}

/// Serializes any result record to pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("error: failed to serialize output: {e}"),
    }
}

/// Renders `[hi:lo]` for multi-bit fields, `[hi]` for single bits.
fn bit_span(bit_high: u32, bit_low: u32) -> String {
    if bit_high == bit_low {
        format!("[{bit_high}]")
    } else {
        format!("[{bit_high}:{bit_low}]")
    }
}

fn warn_overlaps(register: &str, overlaps: &[(String, String)]) {
    for (first, second) in overlaps {
        eprintln!("warning: {register}: fields '{first}' and '{second}' overlap; values are ambiguous");
    }
}

fn print_decode(decoded: &Decode, compact: bool) {
    warn_overlaps(&decoded.register, &decoded.overlaps);
    println!(
        "CSR: {}  value={:#x}  width={}",
        decoded.register, decoded.value, decoded.width
    );
    if compact {
        let line: Vec<String> = decoded
            .fields
            .iter()
            .map(|f| {
                format!(
                    "{}{}={:#b}",
                    f.name,
                    bit_span(f.bit_high, f.bit_low),
                    f.raw_value
                )
            })
            .collect();
        println!("{}", line.join(", "));
        return;
    }
    for f in &decoded.fields {
        let span = bit_span(f.bit_high, f.bit_low);
        let hex = format!("{:#x}", f.raw_value);
        let bin = format!("{:#b}", f.raw_value);
        print!(
            " {:<20} {:>9} = {:>8} / {:>4} / {:>12}",
            f.name, span, hex, f.raw_value, bin
        );
        if !f.access_class.is_unspecified() {
            print!("  [{}]", f.access_class.label());
        }
        if !f.description.is_empty() {
            print!("  {}", f.description);
        }
        println!();
    }
}

fn print_diff(changes: &Diff) {
    warn_overlaps(&changes.register, &changes.overlaps);
    println!(
        "CSR: {}  xor={:#x} (fields with changes)",
        changes.register, changes.xor_mask
    );
    for c in &changes.changes {
        let span = bit_span(c.bit_high, c.bit_low);
        let changed = format!("{:#x}", c.changed_mask);
        let rel = format!("{:#x}", c.rel);
        print!(
            " {:<20} {:>9} changed_mask={:>18} rel={:>8} bits_changed={:>2}",
            c.name, span, changed, rel, c.bits_changed
        );
        if !c.access_class.is_unspecified() {
            print!("  [{}]", c.access_class.label());
        }
        println!();
    }
    if changes.changes.is_empty() {
        println!(" (no fields changed)");
    }
}

fn print_compare(differences: &Compare) {
    warn_overlaps(&differences.register, &differences.overlaps);
    println!(
        "CSR: {}  {:#x} vs {:#x} (field differences)",
        differences.register, differences.value1, differences.value2
    );
    for d in &differences.differences {
        let span = bit_span(d.bit_high, d.bit_low);
        print!(
            " {:<20} {:>9} = {:#x} / {} / {:#b}  vs  {:#x} / {} / {:#b}",
            d.name, span, d.value1, d.value1, d.value1, d.value2, d.value2, d.value2
        );
        if !d.access_class.is_unspecified() {
            print!("  [{}]", d.access_class.label());
        }
        println!();
    }
    if differences.differences.is_empty() {
        println!(" (no field differences)");
    }
}
