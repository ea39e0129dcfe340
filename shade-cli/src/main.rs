//! Shade CLI
//!
//! Command-line interface for the Shade dual-key stealth payment protocol.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shade_core::traits::{AnnouncementLog, MetaAddressRegistry};
use shade_core::types::{Announcement, SecretScalar, StealthKeySet, StealthMetaAddress};
use shade_core::KeyPair;
use shade_registry::{MemoryLog, MemoryRegistry};
use shade_stealth::{ShadeWallet, StealthPaymentBuilder};

/// Shade - dual-key stealth addresses over secp256k1
#[derive(Parser)]
#[command(name = "shade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive stealth keys from signature entropy
    Generate {
        /// Entropy as hex (typically a 65-byte wallet signature)
        #[arg(short, long)]
        entropy: String,
        /// Output file for keys (JSON); printed to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the registry record for a key file's meta-address
    Record {
        /// Path to keys file (from `shade generate`)
        #[arg(short, long)]
        keys: PathBuf,
    },

    /// Create a stealth payment to a recipient meta-address
    Send {
        /// Recipient's meta-address (hex, 66 bytes)
        recipient: String,
        /// Declared payment value in wei
        #[arg(long, default_value = "0")]
        value: u128,
        /// Optional note, encrypted under the payment's shared secret
        #[arg(short, long)]
        note: Option<String>,
        /// Output file for the payment (JSON); printed to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan an announcement file for payments addressed to our keys
    Scan {
        /// Path to keys file
        #[arg(short, long)]
        keys: PathBuf,
        /// Path to announcements file (JSON array)
        #[arg(short, long)]
        announcements: PathBuf,
    },

    /// Run a local end-to-end demo against in-memory storage
    Demo {
        /// Number of decoy payments to other recipients
        #[arg(short, long, default_value = "10")]
        decoys: usize,
    },
}

/// On-disk key file format.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    viewing_sk: String,
    viewing_pk: String,
    spending_sk: String,
    spending_pk: String,
    meta_address: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "shade=debug,info"
    } else {
        "shade=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate { entropy, output } => cmd_generate(&entropy, output),
        Commands::Record { keys } => cmd_record(&keys),
        Commands::Send {
            recipient,
            value,
            note,
            output,
        } => cmd_send(&recipient, value, note.as_deref(), output),
        Commands::Scan {
            keys,
            announcements,
        } => cmd_scan(&keys, &announcements),
        Commands::Demo { decoys } => cmd_demo(decoys).await,
    }
}

/// Derive stealth keys from entropy.
fn cmd_generate(entropy_hex: &str, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "Deriving stealth keys from entropy...".cyan().bold());

    let entropy = decode_hex(entropy_hex).context("invalid entropy hex")?;
    let wallet = ShadeWallet::from_entropy(&entropy).context("key derivation failed")?;
    let keys = shade_crypto::derive_key_set(&entropy)?;

    let file = KeyFile {
        viewing_sk: keys.viewing.secret.to_hex(),
        viewing_pk: keys.viewing.public.to_hex(),
        spending_sk: keys.spending.secret.to_hex(),
        spending_pk: keys.spending.public.to_hex(),
        meta_address: wallet.meta_address().to_hex(),
    };

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&file)?)?;
        println!("{} {}", "Keys saved to:".green(), path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&file)?);
    }

    println!(
        "\n{}",
        "IMPORTANT: keep viewing_sk and spending_sk private.".red().bold()
    );
    println!("   The meta_address is what you publish to receive payments.");

    Ok(())
}

/// Show the registry record for a key file.
fn cmd_record(keys_path: &Path) -> Result<()> {
    let wallet = load_wallet(keys_path)?;
    let record = wallet.registry_record();

    println!("{}", "Registry record:".cyan().bold());
    println!("{}", serde_json::to_string_pretty(&record)?);
    println!(
        "\n   {} {}",
        "Meta-address:".dimmed(),
        wallet.meta_address().to_hex()
    );

    Ok(())
}

/// Create a stealth payment.
fn cmd_send(recipient: &str, value: u128, note: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    println!(
        "{} {}...",
        "Creating stealth payment to".cyan().bold(),
        &recipient[..recipient.len().min(20)]
    );

    let meta = StealthMetaAddress::from_hex(recipient).context("invalid meta-address hex")?;

    let mut builder = StealthPaymentBuilder::new().recipient(meta).value_wei(value);
    if let Some(note) = note {
        builder = builder.note(note);
    }
    let payment = builder.build().context("failed to create stealth payment")?;

    println!("\n{}", "Stealth payment created:".green().bold());
    println!(
        "   {} {}",
        "Address:".yellow(),
        payment.stealth_address.to_hex_string()
    );
    println!(
        "   {} {}",
        "Ephemeral key:".dimmed(),
        payment.announcement.ephemeral_pubkey.to_hex()
    );

    let json = serde_json::to_string_pretty(&payment)?;
    if let Some(path) = output {
        std::fs::write(&path, json)?;
        println!("   {} {}", "Payment saved to:".green(), path.display());
    } else {
        println!("\n{}", "Payment (JSON):".yellow().bold());
        println!("{}", json);
    }

    println!("\n{}", "Next steps:".cyan());
    println!("   1. Send funds to the stealth address above");
    println!("   2. Publish the announcement to the log");

    Ok(())
}

/// Scan a JSON announcement file.
fn cmd_scan(keys_path: &Path, announcements_path: &Path) -> Result<()> {
    let wallet = load_wallet(keys_path)?;

    let data = std::fs::read_to_string(announcements_path)
        .with_context(|| format!("cannot read {}", announcements_path.display()))?;
    let announcements: Vec<Announcement> =
        serde_json::from_str(&data).context("invalid announcements JSON")?;

    println!(
        "{} {} announcements...",
        "Scanning".cyan().bold(),
        announcements.len()
    );

    let mut found = 0u64;
    for announcement in &announcements {
        let outcome = wallet.try_discover(announcement);
        if let Some(payment) = outcome.into_payment() {
            found += 1;
            println!("\n{}", "Payment discovered:".green().bold());
            println!(
                "   {} {}",
                "Address:".yellow(),
                payment.stealth_address.to_hex_string()
            );
            println!("   {} {} wei", "Value:".dimmed(), payment.value_wei);
            if let Some(note) = &payment.note {
                println!("   {} {}", "Note:".dimmed(), note);
            }
            println!(
                "   {} {}",
                "Private key:".red(),
                payment.stealth_private_key.to_hex()
            );
        }
    }

    if found == 0 {
        println!("{}", "No payments found for these keys.".yellow());
    } else {
        println!(
            "\n{} {} payment(s) discovered.",
            "Done:".green().bold(),
            found
        );
    }

    Ok(())
}

/// Full local flow: register, pay, scan, all in memory.
async fn cmd_demo(decoys: usize) -> Result<()> {
    println!("{}", "Running local demo...".cyan().bold());

    let registry = MemoryRegistry::new();
    let log = MemoryLog::new();

    // Recipient sets up
    let recipient = ShadeWallet::from_entropy(b"demo recipient signature entropy")
        .context("recipient setup failed")?;
    let owner = shade_core::types::EthAddress::from_array([0x1D; 20]);
    registry.set_record(owner, recipient.registry_record()).await?;
    println!(
        "   {} {}",
        "Recipient registered:".dimmed(),
        recipient.meta_address().to_hex()
    );

    // Sender looks the recipient up and pays them, among decoy traffic
    let record = registry
        .get_record(&owner)
        .await?
        .context("recipient not registered")?;
    let meta = record.to_meta()?;

    for i in 0..decoys {
        let decoy = ShadeWallet::from_entropy(format!("decoy {i}").as_bytes())?;
        let payment = shade_stealth::create_stealth_payment(decoy.meta_address())?;
        log.publish(payment.announcement).await?;
    }

    let payment = StealthPaymentBuilder::new()
        .recipient(meta)
        .value_wei(1_000_000_000_000_000_000)
        .note("demo payment")
        .build()?;
    log.publish(payment.announcement.clone()).await?;
    println!(
        "   {} {} (1 real among {} decoys)",
        "Announcements published:".dimmed(),
        log.count().await?,
        decoys
    );

    // Recipient scans the log
    let (discoveries, stats) = recipient.scan_log(&log, 0).await?;

    println!("\n{}", "Scan results:".green().bold());
    println!("   {} {}", "Scanned:".dimmed(), stats.total_scanned);
    println!("   {} {}", "Discovered:".dimmed(), stats.discoveries);

    for payment in &discoveries {
        println!(
            "   {} {} ({} wei, note: {})",
            "Found:".yellow(),
            payment.stealth_address.to_hex_string(),
            payment.value_wei,
            payment.note.as_deref().unwrap_or("-")
        );
    }

    anyhow::ensure!(discoveries.len() == 1, "expected exactly one discovery");
    anyhow::ensure!(
        discoveries[0].stealth_address == payment.stealth_address,
        "discovered address does not match payment"
    );

    println!("\n{}", "Demo complete.".green().bold());
    Ok(())
}

/// Reads a key file and rebuilds the wallet.
fn load_wallet(path: &Path) -> Result<ShadeWallet> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file: KeyFile = serde_json::from_str(&data).context("invalid keys JSON")?;

    let viewing = KeyPair::new(
        SecretScalar::from_hex(&file.viewing_sk)?,
        shade_core::types::PublicPoint::from_hex(&file.viewing_pk)?,
    );
    let spending = KeyPair::new(
        SecretScalar::from_hex(&file.spending_sk)?,
        shade_core::types::PublicPoint::from_hex(&file.spending_pk)?,
    );

    Ok(ShadeWallet::from_keys(StealthKeySet::new(viewing, spending)))
}

/// Decodes hex with or without a 0x prefix.
fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_stealth::create_stealth_payment_with_note;

    #[test]
    fn test_key_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");

        let keys = shade_crypto::derive_key_set(b"cli test entropy").unwrap();
        let wallet = ShadeWallet::from_keys(keys.clone());
        let file = KeyFile {
            viewing_sk: keys.viewing.secret.to_hex(),
            viewing_pk: keys.viewing.public.to_hex(),
            spending_sk: keys.spending.secret.to_hex(),
            spending_pk: keys.spending.public.to_hex(),
            meta_address: wallet.meta_address().to_hex(),
        };
        std::fs::write(&path, serde_json::to_string_pretty(&file).unwrap()).unwrap();

        let loaded = load_wallet(&path).unwrap();
        assert_eq!(loaded.meta_address(), wallet.meta_address());
    }

    #[test]
    fn test_loaded_wallet_discovers_payment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");

        let keys = shade_crypto::derive_key_set(b"cli discover entropy").unwrap();
        let wallet = ShadeWallet::from_keys(keys.clone());
        let file = KeyFile {
            viewing_sk: keys.viewing.secret.to_hex(),
            viewing_pk: keys.viewing.public.to_hex(),
            spending_sk: keys.spending.secret.to_hex(),
            spending_pk: keys.spending.public.to_hex(),
            meta_address: wallet.meta_address().to_hex(),
        };
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let payment = create_stealth_payment_with_note(wallet.meta_address(), "hi").unwrap();

        let loaded = load_wallet(&path).unwrap();
        let claimed = loaded.try_discover(&payment.announcement).into_payment().unwrap();
        assert_eq!(claimed.note.as_deref(), Some("hi"));
    }

    #[test]
    fn test_decode_hex_prefix_optional() {
        assert_eq!(decode_hex("0xdeadbeef").unwrap(), decode_hex("deadbeef").unwrap());
        assert!(decode_hex("zz").is_err());
    }
}
