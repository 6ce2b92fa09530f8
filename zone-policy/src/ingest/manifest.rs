use super::{Error, Rule, Tables, ZoneRow};
use serde::Deserialize;
use std::path::Path;

/// A zone table in YAML (or JSON):
///
/// ```yaml
/// zones:
///   - name: Front End
///     cidrs: [10.10.1.0/24, 10.10.2.0/24]
///   - name: Back End
///     cidrs: [10.11.0.0/24]
/// allow:
///   - from: Front End
///     to: Back End
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    zones: Vec<ZoneRow>,
    #[serde(default)]
    allow: Vec<Rule>,
}

pub fn read(path: &Path) -> Result<Tables, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<Tables, Error> {
    let Manifest { zones, allow } = serde_yaml::from_str(content)?;
    Ok(Tables {
        zones,
        rules: allow,
    })
}
