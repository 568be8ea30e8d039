use anyhow::{bail, Context};
use cipher_core::config::PolyConfig;
use cipher_core::core::key::PolyKey;
use cipher_core::core::types::OffsetConvention;
use cipher_core::core::{crib, frequency, periodicity, shift};
use cipher_core::logging::{self, LogTarget};
use cipher_core::{tui, PolySession, SubstitutionSession};
use clap::{Parser, Subcommand};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

/// Interactive helper for breaking classical ciphers
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file (interactive modes log nowhere otherwise)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a monoalphabetic substitution cipher interactively
    Mono {
        /// Ciphertext (prompted for when omitted)
        #[arg(long)]
        text: Option<String>,
    },

    /// Solve a Vigenere-family cipher interactively
    Poly {
        /// Ciphertext (prompted for when omitted)
        #[arg(long)]
        text: Option<String>,

        /// Key length (prompted for when omitted)
        #[arg(short, long)]
        key_length: Option<usize>,

        /// 0 for A+A = A, 1 for A+A = B (prompted for when omitted)
        #[arg(short, long)]
        offset: Option<i64>,
    },

    /// Print letter counts and percentages
    Freq {
        text: String,

        /// Output in JSON
        #[arg(long)]
        json: bool,
    },

    /// Print repeated n-grams for a candidate key length
    Patterns {
        text: String,

        #[arg(short, long)]
        key_length: usize,

        /// Output in JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive the key that turns a plaintext word into its ciphertext
    Crib { plain: String, cipher: String },

    /// Decrypt with a repeating key ('_' leaves a position unshifted)
    Decrypt {
        text: String,

        #[arg(short, long)]
        key: String,

        #[arg(short, long, default_value = "0")]
        offset: i64,
    },

    /// Encrypt with a repeating key
    Encrypt {
        text: String,

        #[arg(short, long)]
        key: String,

        #[arg(short, long, default_value = "0")]
        offset: i64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, Commands::Mono { .. } | Commands::Poly { .. });
    let target = match (&cli.log_file, interactive) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Off,
        (None, false) => LogTarget::Stderr,
    };
    logging::init(target, cli.verbose)?;

    match cli.command {
        Commands::Mono { text } => {
            let text = text.map_or_else(|| prompt("Enter the cipher text: "), Ok)?;
            let mut session = SubstitutionSession::new(text);
            tui::mono::run(&mut session)?;
        }
        Commands::Poly {
            text,
            key_length,
            offset,
        } => {
            let text = text.map_or_else(|| prompt("Enter the ciphertext: "), Ok)?;
            let key_length = match key_length {
                Some(n) => n,
                None => prompt("Enter the key length: ")?
                    .parse()
                    .context("key length must be a positive integer")?,
            };
            let offset = match offset {
                Some(o) => o,
                None => prompt("Enter offset (0 for A+A = A, or 1 for A+A = B): ")?
                    .parse()
                    .context("offset must be 0 or 1")?,
            };
            let config = PolyConfig::new(key_length, offset)?;
            let mut session = PolySession::new(text, config);
            tui::poly::run(&mut session)?;
        }
        Commands::Freq { text, json } => {
            let table = frequency::analyze(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else if table.is_empty() {
                println!("(no letters)");
            } else {
                for (letter, freq) in table.iter() {
                    println!("{}: {} ({:.2}%)", letter, freq.count, freq.percentage);
                }
            }
        }
        Commands::Patterns {
            text,
            key_length,
            json,
        } => {
            let config = PolyConfig::default().with_key_length(key_length)?;
            let evidence = periodicity::find_patterns(&text, config.key_length);
            if json {
                println!("{}", serde_json::to_string_pretty(&evidence)?);
            } else {
                for group in &evidence {
                    println!(
                        "{}-letter patterns (position {}):",
                        group.length,
                        group.position + 1
                    );
                    for repeat in &group.repeats {
                        println!("  {}: {}", repeat.pattern, repeat.count);
                    }
                }
            }
        }
        Commands::Crib { plain, cipher } => {
            if !plain.chars().chain(cipher.chars()).all(|c| c.is_ascii_alphabetic()) {
                bail!("crib words must contain only letters A-Z");
            }
            println!("{}", crib::solve(&plain, &cipher)?);
        }
        Commands::Decrypt { text, key, offset } => {
            let (key, offset) = parse_key(&key, offset)?;
            println!("{}", shift::decrypt(&text, &key, offset));
        }
        Commands::Encrypt { text, key, offset } => {
            let (key, offset) = parse_key(&key, offset)?;
            println!("{}", shift::encrypt(&text, &key, offset));
        }
    }

    Ok(())
}

fn parse_key(key: &str, offset: i64) -> anyhow::Result<(PolyKey, OffsetConvention)> {
    Ok((PolyKey::from_letters(key)?, OffsetConvention::try_from(offset)?))
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
