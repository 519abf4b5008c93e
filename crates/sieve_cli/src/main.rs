use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use sieve_core::{BloomFilter, FilterConfig};

#[derive(Parser)]
#[command(name = "sieve", about = "Bloom filter files in the portable JSON format")]
struct Cli {
    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct SizingArgs {
    /// Expected number of distinct items (with --fpp)
    #[arg(long, requires = "fpp", conflicts_with_all = ["bits", "config"])]
    entries: Option<u64>,
    /// Target false-positive probability, in (0, 1)
    #[arg(long, requires = "entries")]
    fpp: Option<f64>,
    /// Total bits in the filter (with --hashes)
    #[arg(long, requires = "hashes", conflicts_with = "config")]
    bits: Option<u64>,
    /// Bits set per item
    #[arg(long, requires = "bits")]
    hashes: Option<u32>,
    /// JSON file holding either sizing form
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SizingArgs {
    fn resolve(self) -> Result<FilterConfig> {
        match (self.entries, self.fpp, self.bits, self.hashes, self.config) {
            (Some(n), Some(p), None, None, None) => Ok(FilterConfig::accuracy(n, p)),
            (None, None, Some(m), Some(k), None) => Ok(FilterConfig::explicit(m, k)),
            (None, None, None, None, Some(path)) => {
                FilterConfig::load(&path).with_context(|| format!("reading config {}", path.display()))
            }
            (None, None, None, None, None) => Ok(FilterConfig::default()),
            _ => Err(anyhow!("give one of --entries/--fpp, --bits/--hashes or --config")),
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Create an empty filter file
    New {
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        sizing: SizingArgs,
    },
    /// Add items to a filter file in place
    Add {
        #[arg(long)]
        filter: PathBuf,
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Test items against a filter file
    Check {
        #[arg(long)]
        filter: PathBuf,
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Print sizing and load of a filter file
    Info {
        #[arg(long)]
        filter: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<BloomFilter> {
    BloomFilter::load(path).with_context(|| format!("loading filter {}", path.display()))
}

fn save(bf: &BloomFilter, path: &Path) -> Result<()> {
    bf.save(path).with_context(|| format!("writing filter {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::New { out, sizing } => {
            let bf = sizing.resolve()?.build()?;
            save(&bf, &out)?;
            info!(path = %out.display(), "created filter");
            println!(
                "new: {} total_bits={} bits_per_entry={}",
                out.display(),
                bf.total_bits(),
                bf.bits_per_entry()
            );
        }
        Cmd::Add { filter, items } => {
            let mut bf = load(&filter)?;
            for it in &items {
                bf.add(it);
            }
            save(&bf, &filter)?;
            info!(count = items.len(), "added items");
            println!("added: {}", items.len());
        }
        Cmd::Check { filter, items } => {
            let bf = load(&filter)?;
            for it in &items {
                let verdict = if bf.check(it) { "maybe" } else { "no" };
                println!("{it}: {verdict}");
            }
        }
        Cmd::Info { filter } => {
            let bf = load(&filter)?;
            println!("total_bits     : {}", bf.total_bits());
            println!("bits_per_entry : {}", bf.bits_per_entry());
            println!("bitmap_bytes   : {}", bf.bitmap().len());
            println!("bits_set       : {}", bf.bits_set());
            println!("fill_ratio     : {:.4}", bf.fill_ratio());
            println!("est_fp_prob    : {:.6}", bf.estimated_fp_probability());
        }
    }
    Ok(())
}
