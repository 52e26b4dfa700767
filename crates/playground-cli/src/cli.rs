//! Command-line arguments.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use playground_client::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_SERVER_URL, SERVER_URL_ENV};
use playground_snapshot::TraceTarget;
use playground_trace::DeepLink;

#[derive(Parser, Debug)]
#[command(name = "script-trace")]
#[command(about = "Step through the script interpretation of a transaction input")]
#[command(version)]
pub struct Cli {
    /// Interpretation link, e.g. `#/transaction/<txid>/input/0/interpret?step=3`
    #[arg(conflicts_with_all = ["tx", "input", "step", "automatic"])]
    pub link: Option<String>,

    /// Transaction id
    #[arg(long, required_unless_present = "link")]
    pub tx: Option<String>,

    /// Input index within the transaction
    #[arg(long, default_value_t = 0)]
    pub input: u32,

    /// Operations to execute before showing the snapshot
    #[arg(long, default_value_t = 0, conflicts_with = "automatic")]
    pub step: u64,

    /// Stream the whole interpretation instead of requesting one step
    #[arg(long)]
    pub automatic: bool,

    /// Keep requesting the next step until the interpreter reaches a verdict
    #[arg(long)]
    pub to_end: bool,

    /// Interpreter service URL
    #[arg(long, env = SERVER_URL_ENV, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Path prefix of the interpreter's API routes
    #[arg(long, default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The view to open.
    pub fn link(&self) -> Result<DeepLink> {
        if let Some(raw) = &self.link {
            return raw
                .parse()
                .with_context(|| format!("cannot open link {raw:?}"));
        }

        let tx = self
            .tx
            .clone()
            .context("either a link or --tx is required")?;
        let target = TraceTarget::new(tx, self.input);
        Ok(if self.automatic {
            DeepLink::automatic(target)
        } else {
            DeepLink::step(target, self.step)
        })
    }

    /// Client configuration for the selected server and API prefix.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            server_url: self.server.clone(),
            api_prefix: self.api_prefix.clone(),
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
