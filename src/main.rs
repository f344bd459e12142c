use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
use std::io::{self, IsTerminal, Read, Write};
use std::str;
use tracing_subscriber::EnvFilter;
use zkv::{ValueInfo, ZkCipher, ZkError};

#[derive(Debug, Parser)]
#[command(name = "zkv")]
#[command(
    version,
    about = "Zero-knowledge encryption for key-value configuration values."
)]
struct Cli {
    /// Log filter directives, e.g. `debug` or `zkv=trace`
    #[arg(long, global = true, value_name = "FILTER", env = "ZKV_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct ValueArg {
    /// Value to process; read from stdin when omitted
    value: Option<String>,
}

impl ValueArg {
    fn resolve(self) -> Result<Vec<u8>> {
        if let Some(v) = self.value {
            return Ok(v.into_bytes());
        }

        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read value from stdin")?;
        trim_newline(&mut buf);
        Ok(buf)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a value into a $ZK$ envelope
    Encrypt {
        #[command(flatten)]
        input: ValueArg,
    },

    /// Decrypts a $ZK$ envelope
    Decrypt {
        #[command(flatten)]
        input: ValueArg,
    },

    /// Decrypts envelopes and passes plaintext values through unchanged
    Read {
        #[command(flatten)]
        input: ValueArg,
    },

    /// Prints whether a value is a $ZK$ envelope
    Detect {
        #[command(flatten)]
        input: ValueArg,
    },

    /// Shows metadata about a stored value
    Inspect {
        #[command(flatten)]
        input: ValueArg,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_logging(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries values, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cipher(confirm: bool) -> Result<ZkCipher> {
    let passphrase = auth::read_passphrase(confirm)?;
    ZkCipher::new(passphrase).context("invalid passphrase")
}

fn write_bytes(bytes: &[u8]) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(bytes)?;
    if out.is_terminal() {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn trim_newline(buf: &mut Vec<u8>) {
    while buf.ends_with(b"\n") || buf.ends_with(b"\r") {
        buf.pop();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    init_logging(&args.log);

    match args.command {
        Commands::Encrypt { input } => {
            let value = input.resolve()?;
            let zk = cipher(true)?;
            let envelope = zk
                .encrypt(&value)
                .context("failed to encrypt value")?;
            println!("{envelope}");
        }
        Commands::Decrypt { input } => {
            let value = input.resolve()?;
            let zk = cipher(false)?;
            let text = str::from_utf8(&value)
                .map_err(|_| ZkError::Format)
                .context("failed to decrypt value")?;
            let plaintext = zk.decrypt(text).context("failed to decrypt value")?;
            write_bytes(&plaintext)?;
        }
        Commands::Read { input } => {
            let value = input.resolve()?;
            if !ZkCipher::is_envelope(&value) {
                write_bytes(&value)?;
                return Ok(());
            }
            let zk = cipher(false)?;
            let stored = zk
                .open_value(&value)
                .context("failed to read value")?;
            write_bytes(stored.as_bytes())?;
        }
        Commands::Detect { input } => {
            let value = input.resolve()?;
            println!("{}", ZkCipher::is_envelope(&value));
        }
        Commands::Inspect { input, json } => {
            let value = input.resolve()?;
            let info = ValueInfo::inspect(&value);
            if json {
                println!("{}", serde_json::to_string(&info)?);
            } else {
                println!("zk_encrypted: {}", info.zk_encrypted);
                println!("size: {}", info.size);
            }
        }
    }

    Ok(())
}
