//! structtape CLI - Inspect Tape Files
//!
//! Membaca tape (memory-mapped) dan mencetak isinya sebagai tree,
//! atau menulis tape demo untuk dicoba dengan viewer.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin structtape -- demo point.tape
//! cargo run --release --bin structtape -- dump point.tape
//! cargo run --release --bin structtape -- dump point.tape --flat
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use structtape::protocol::{Decoder, Record, Region, Slot};
use structtape::{Describe, MmapTape, Writer};

#[derive(Parser)]
#[command(name = "structtape", about = "Write and inspect struct inspection tapes")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the records stored in a tape file
    Dump {
        /// Tape file path
        path: PathBuf,

        /// Print raw records instead of the region tree
        #[arg(long)]
        flat: bool,
    },
    /// Write a sample tape describing a few structs
    Demo {
        /// Tape file path (overwritten)
        path: PathBuf,

        /// Tape capacity in bytes
        #[arg(long, default_value_t = 4096)]
        capacity: usize,
    },
}

/// Initialize the tracing subscriber for logging
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[repr(C)]
struct Point {
    x: i32,
    y: i32,
}

impl Describe for Point {
    const KIND: &'static str = "Point";

    fn describe_fields(&self, w: &mut Writer<'_>) {
        let _ = w.struct_field("x", "int", &self.x);
        let _ = w.struct_field("y", "int", &self.y);
    }
}

#[repr(C)]
struct Rect {
    origin: Point,
    width: u32,
    height: u32,
}

impl Describe for Rect {
    const KIND: &'static str = "Rect";

    fn describe_fields(&self, w: &mut Writer<'_>) {
        let _ = w.struct_field("origin", "struct Point", &self.origin);
        let _ = w.describe(&self.origin);
        let _ = w.struct_field("width", "unsigned int", &self.width);
        let _ = w.struct_field("height", "unsigned int", &self.height);
    }
}

fn run_demo(path: PathBuf, capacity: usize) -> structtape::Result<()> {
    let rect = Rect {
        origin: Point { x: 10, y: 20 },
        width: 640,
        height: 480,
    };
    let label = c_label();

    let mut tape = MmapTape::create(&path, capacity)?;
    let mut w = tape.writer();
    w.describe(&rect).ok();
    w.cstring(&label).ok();
    w.close().ok();

    // Cek sekali di akhir urutan write
    if let Err(e) = w.status() {
        warn!("tape too small, retry with a larger --capacity");
        return Err(e.into());
    }

    let written = w.len();
    tape.flush()?;
    info!(path = %path.display(), written, capacity, "demo tape written");
    println!("✅ Wrote {} / {} bytes to {}", written, capacity, path.display());
    Ok(())
}

fn c_label() -> std::ffi::CString {
    // Literal tanpa NUL di tengah, CString::new tidak akan gagal
    std::ffi::CString::new("structtape demo").unwrap_or_default()
}

fn print_region(region: &Region<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}📦 {} @ 0x{:x} ({} bytes)",
        indent, region.kind, region.address, region.size
    );
    for slot in region.layout() {
        match slot {
            Slot::Field(field) => println!(
                "{}   ├─ {}: {} @ 0x{:x} ({} bytes)",
                indent, field.name, field.type_name, field.address, field.size
            ),
            Slot::Padding { address, size } => {
                println!("{}   ├─ (padding) @ 0x{:x} ({} bytes)", indent, address, size)
            }
        }
    }
    for child in &region.children {
        print_region(child, depth + 1);
    }
}

fn run_dump(path: PathBuf, flat: bool) -> structtape::Result<()> {
    let tape = MmapTape::open(&path)?;
    debug!(capacity = tape.capacity(), "dumping tape");

    if flat {
        let mut decoder = Decoder::new(tape.as_bytes());
        loop {
            let offset = decoder.position();
            match decoder.next_record()? {
                Some(Record::Start {
                    kind,
                    address,
                    size,
                }) => println!("{:>8}  START  {} @ 0x{:x} ({} bytes)", offset, kind, address, size),
                Some(Record::Field {
                    name,
                    type_name,
                    address,
                    size,
                }) => println!(
                    "{:>8}  FIELD  {}: {} @ 0x{:x} ({} bytes)",
                    offset, name, type_name, address, size
                ),
                Some(Record::End) => println!("{:>8}  END", offset),
                Some(Record::Eof) => println!("{:>8}  EOF", offset),
                None => break,
            }
        }
        return Ok(());
    }

    let regions = tape.regions()?;
    println!("🧾 {} ({} regions)", path.display(), regions.len());
    for region in &regions {
        print_region(region, 0);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Dump { path, flat } => run_dump(path, flat),
        Command::Demo { path, capacity } => run_demo(path, capacity),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}
