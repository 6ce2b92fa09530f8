//! Reads the zone table and the zone-to-zone allow matrix.
//!
//! A zone table lists each zone's name and a comma-separated list of its CIDRs:
//!
//! ```text
//! | Zone           | CIDRs                      |
//! | Front End      | 10.10.1.0/24, 10.10.2.0/24 |
//! | Back End       | 10.11.0.0/24               |
//! ```
//!
//! The allow matrix names destination zones across its first row and source zones down its first
//! column. A `Y` cell permits the row's zone to send traffic to the column's zone:
//!
//! ```text
//! |           | Front End | Back End |
//! | Front End |           | Y        |
//! | Back End  | Y         |          |
//! ```

pub mod manifest;
pub mod xlsx;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use zone_policy_core::ZoneRegistry;

/// Zones and allow rules, in the order they were declared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tables {
    pub zones: Vec<ZoneRow>,
    pub rules: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneRow {
    pub name: String,
    #[serde(default)]
    pub cidrs: Vec<String>,
}

/// Permits traffic from the `from` zone to the `to` zone.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub from: String,
    pub to: String,
}

/// Names of the workbook sheets holding the zone table and the allow matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sheets {
    pub zones: String,
    pub rules: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("workbook has no {0:?} sheet")]
    MissingSheet(String),

    #[error("{table} row {row} has no zone name")]
    MissingZoneName { table: &'static str, row: usize },

    #[error("allow matrix column {column} has a Y cell but no zone name")]
    MissingColumnZone { column: usize },

    #[error(
        "unsupported input {path}: expected .xlsx, .xlsm, .xls, .ods, .yaml, .yml or .json",
        path = .0.display()
    )]
    UnsupportedInput(PathBuf),
}

const ZONE_HEADER: [&str; 2] = ["Zone", "CIDRs"];
const ALLOWED: &str = "Y";

/// Reads tables from a workbook or a manifest, chosen by the file extension.
pub fn read(path: &Path, sheets: &Sheets) -> Result<Tables, Error> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("xlsx" | "xlsm" | "xls" | "ods") => xlsx::read(path, sheets),
        Some("yaml" | "yml" | "json") => manifest::read(path),
        _ => Err(Error::UnsupportedInput(path.to_path_buf())),
    }
}

// === impl Tables ===

impl Tables {
    /// Registers every zone, then applies every rule.
    ///
    /// All rules are checked against the declared zones before any of them is applied.
    pub fn into_registry(self) -> zone_policy_core::Result<ZoneRegistry> {
        let mut registry = ZoneRegistry::new();
        for ZoneRow { name, cidrs } in self.zones {
            registry.add_zone(name, cidrs)?;
        }

        for Rule { from, to } in &self.rules {
            for name in [from, to] {
                if registry.zone(name).is_none() {
                    return Err(zone_policy_core::Error::UnknownZone(name.clone()));
                }
            }
        }
        for Rule { from, to } in &self.rules {
            registry.allow(from, to)?;
        }

        debug!(
            zones = registry.len(),
            rules = self.rules.len(),
            "Built zone registry"
        );
        Ok(registry)
    }
}

// === impl Sheets ===

impl Default for Sheets {
    fn default() -> Self {
        Self {
            zones: "Zones".to_string(),
            rules: "ZoneToZone".to_string(),
        }
    }
}

/// Parses a zone table. Rows are numbered from 1 in errors.
///
/// A leading `Zone | CIDRs` header row and blank rows are skipped.
pub fn zones_from_rows(rows: &[Vec<String>]) -> Result<Vec<ZoneRow>, Error> {
    let mut zones = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let name = cell(row, 0);
        let cidrs = cell(row, 1);
        if name.is_empty() && cidrs.is_empty() {
            continue;
        }
        if zones.is_empty() && [name, cidrs] == ZONE_HEADER {
            continue;
        }
        if name.is_empty() {
            return Err(Error::MissingZoneName {
                table: "zone table",
                row: i + 1,
            });
        }

        zones.push(ZoneRow {
            name: name.to_string(),
            cidrs: split_cidrs(cidrs),
        });
    }
    Ok(zones)
}

/// Parses an allow matrix. Rows and columns are numbered from 1 in errors.
pub fn rules_from_rows(rows: &[Vec<String>]) -> Result<Vec<Rule>, Error> {
    let mut rows = rows.iter().enumerate();
    let columns = match rows.next() {
        Some((_, header)) => header.iter().skip(1).map(|c| c.trim()).collect::<Vec<_>>(),
        None => return Ok(Vec::new()),
    };

    let mut rules = Vec::new();
    for (i, row) in rows {
        let from = cell(row, 0);
        if from.is_empty() {
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            return Err(Error::MissingZoneName {
                table: "allow matrix",
                row: i + 1,
            });
        }

        for (j, value) in row.iter().enumerate().skip(1) {
            if !value.trim().eq_ignore_ascii_case(ALLOWED) {
                continue;
            }
            let to = columns.get(j - 1).copied().unwrap_or_default();
            if to.is_empty() {
                return Err(Error::MissingColumnZone { column: j + 1 });
            }
            rules.push(Rule {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }
    Ok(rules)
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|c| c.trim()).unwrap_or_default()
}

fn split_cidrs(cidrs: &str) -> Vec<String> {
    cidrs
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
