use crate::{
    ingest::{self, Sheets},
    write,
};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(
    name = "zone-policy",
    version,
    about = "Generates zone isolation NetworkPolicies from a zone table"
)]
pub struct Args {
    #[clap(long, default_value = "zone_policy=info,warn", env = "ZONE_POLICY_LOG")]
    log_level: String,

    #[clap(long, value_enum, default_value = "plain", env = "ZONE_POLICY_LOG_FORMAT")]
    log_format: LogFormat,

    /// Zone table: a workbook (.xlsx, .xlsm, .xls, .ods) or a YAML/JSON manifest.
    input: PathBuf,

    /// Where to write the policy stream. `-` writes to stdout.
    #[clap(long, short, default_value = "-")]
    output: PathBuf,

    /// Workbook sheet listing each zone and its CIDRs.
    #[clap(long, default_value = "Zones")]
    zones_sheet: String,

    /// Workbook sheet holding the zone-to-zone allow matrix.
    #[clap(long, default_value = "ZoneToZone")]
    rules_sheet: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

// === impl Args ===

impl Args {
    pub fn parse_and_run() -> Result<()> {
        let args = Self::parse();
        args.log_format.try_init(&args.log_level)?;
        args.run()
    }

    /// Reads the zone table, builds every policy, and writes the policy stream.
    pub fn run(self) -> Result<()> {
        let Self {
            input,
            output,
            zones_sheet,
            rules_sheet,
            ..
        } = self;

        let sheets = Sheets {
            zones: zones_sheet,
            rules: rules_sheet,
        };
        let tables = ingest::read(&input, &sheets)
            .with_context(|| format!("failed to read zone table {}", input.display()))?;
        info!(
            input = %input.display(),
            zones = tables.zones.len(),
            rules = tables.rules.len(),
            "Read zone table"
        );

        let registry = tables.into_registry()?;
        let docs = registry.emit_documents();
        write::write_to_path(&output, &docs)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(output = %output.display(), policies = docs.len(), "Wrote policies");
        Ok(())
    }
}

// === impl LogFormat ===

impl LogFormat {
    /// Installs the global subscriber. Logs go to stderr so the policy stream can be piped from
    /// stdout.
    pub fn try_init(self, filter: &str) -> Result<()> {
        let filter = EnvFilter::try_new(filter).context("invalid log level")?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        match self {
            Self::Plain => builder.try_init(),
            Self::Json => builder.json().try_init(),
        }
        .map_err(|error| anyhow!(error))
    }
}
