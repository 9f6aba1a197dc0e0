//! cardmeta CLI - Command-line tool for character card PNG metadata.
//!
//! This is the main entry point for the cardmeta command-line application.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use rayon::prelude::*;

use cardmeta::png::{has_signature, DEFAULT_MAX_INPUT_LEN, PNG_SIGNATURE};
use cardmeta::prelude::*;

/// cardmeta - character card metadata tool
#[derive(Parser)]
#[command(name = "cardmeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Largest input file accepted, in bytes
    #[arg(long, global = true, env = "CARDMETA_MAX_SIZE", default_value_t = DEFAULT_MAX_INPUT_LEN)]
    max_size: usize,

    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the card metadata of a PNG as JSON
    Extract {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Print only the decoded card of this key
        #[arg(short, long)]
        key: Option<String>,

        /// Reject IEND chunks that carry a payload
        #[arg(long)]
        strict: bool,

        /// Compact single-line output
        #[arg(long)]
        compact: bool,
    },

    /// List the chunks of a PNG
    Chunks {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Embed a card JSON file into a PNG
    Embed {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Card JSON file
        #[arg(short, long)]
        card: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Keyword to store the card under (chara or ccv3)
        #[arg(short, long, default_value = "chara")]
        keyword: CardKeyword,
    },

    /// Scan a directory for PNG cards and report their formats
    Scan {
        /// Directory to walk
        #[arg(short, long)]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let options = ExtractOptions::new().max_input_len(Some(cli.max_size));

    match cli.command {
        Commands::Extract {
            input,
            key,
            strict,
            compact,
        } => {
            let options = options.strict_terminator(strict);
            cmd_extract(&input, key.as_deref(), compact, &options)?;
        }
        Commands::Chunks { input } => {
            cmd_chunks(&input, &options)?;
        }
        Commands::Embed {
            input,
            card,
            output,
            keyword,
        } => {
            cmd_embed(&input, &card, &output, keyword, &options)?;
        }
        Commands::Scan { dir } => {
            cmd_scan(&dir, &options)?;
        }
    }

    Ok(())
}

fn cmd_extract(
    input: &Path,
    key: Option<&str>,
    compact: bool,
    options: &ExtractOptions,
) -> Result<()> {
    let metadata = read_metadata_from_path(input, options)
        .with_context(|| format!("Failed to read card metadata from {}", input.display()))?;

    let value = match key {
        Some(key) => {
            let entry = metadata
                .get(key)
                .with_context(|| format!("No card stored under '{}'", key))?;
            serde_json::to_value(&entry.data)?
        }
        None => serde_json::to_value(&metadata)?,
    };

    let text = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", text);

    Ok(())
}

fn cmd_chunks(input: &Path, options: &ExtractOptions) -> Result<()> {
    let data = read_input(input, options)?;

    println!("{:>10} {:>10} {:<6} {:>10}", "offset", "length", "type", "crc");
    for chunk in Chunks::new(&data).context("Not a PNG file")? {
        let chunk = chunk.context("Failed to read chunk")?;
        println!(
            "{:>10} {:>10} {:<6} {:#010x}",
            chunk.offset,
            chunk.length(),
            chunk.chunk_type.to_string(),
            chunk.crc
        );
    }

    Ok(())
}

fn cmd_embed(
    input: &Path,
    card: &Path,
    output: &Path,
    keyword: CardKeyword,
    options: &ExtractOptions,
) -> Result<()> {
    println!("Embedding {} into {} as '{}'", card.display(), input.display(), keyword);

    let png = read_input(input, options)?;
    let card_text = fs::read_to_string(card)
        .with_context(|| format!("Failed to read card file {}", card.display()))?;
    let card: serde_json::Value =
        serde_json::from_str(&card_text).context("Card file is not valid JSON")?;

    let format = CardFormat::classify(&card);
    if format == CardFormat::Unknown {
        warn!("card does not look like a v1, v2 or v3 character card");
    }

    let out = embed_card(&png, keyword, &card).context("Failed to embed card")?;
    fs::write(output, &out).context("Failed to write output file")?;

    println!("Wrote {} ({} card, {} bytes)", output.display(), format, out.len());

    Ok(())
}

fn cmd_scan(dir: &Path, options: &ExtractOptions) -> Result<()> {
    let paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect();

    println!("Scanning {} PNG files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(PathBuf, Option<std::result::Result<MetadataMap, cardmeta::png::Error>>)> =
        paths
            .into_par_iter()
            .map(|path| {
                let result = match sniff_png(&path) {
                    Ok(true) => Some(read_metadata_from_path(&path, options)),
                    Ok(false) => None,
                    Err(e) => Some(Err(e.into())),
                };
                pb.inc(1);
                (path, result)
            })
            .collect();
    pb.finish_and_clear();

    let mut cards = 0;
    let mut failed = 0;
    let mut skipped = 0;
    for (path, result) in &results {
        let Some(result) = result else {
            skipped += 1;
            debug!("{}: not a PNG, skipping", path.display());
            continue;
        };
        match result {
            Ok(metadata) if metadata.is_empty() => {
                debug!("{}: no card", path.display());
            }
            Ok(metadata) => {
                cards += 1;
                let summary: Vec<String> = metadata
                    .iter()
                    .map(|(key, entry)| format!("{}={}", key, entry.format))
                    .collect();
                println!("{}: {}", path.display(), summary.join(", "));
            }
            Err(e) => {
                failed += 1;
                println!("{}: error: {}", path.display(), e);
            }
        }
    }

    println!(
        "Found {} cards in {} files ({} unreadable, {} not PNG) in {:?}",
        cards,
        results.len(),
        failed,
        skipped,
        start.elapsed()
    );

    Ok(())
}

/// Check the first bytes of a file for the PNG signature.
fn sniff_png(path: &Path) -> std::io::Result<bool> {
    let mut head = Vec::with_capacity(PNG_SIGNATURE.len());
    fs::File::open(path)?
        .take(PNG_SIGNATURE.len() as u64)
        .read_to_end(&mut head)?;
    Ok(has_signature(&head))
}

fn read_input(path: &Path, options: &ExtractOptions) -> Result<Vec<u8>> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    cardmeta::png::read_capped(file, options)
        .with_context(|| format!("Failed to read {}", path.display()))
}
