//! Writes policies as a multi-document YAML stream.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use zone_policy_k8s_api::NetworkPolicy;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write policies: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode policy: {0}")]
    Encode(#[from] serde_yaml::Error),
}

/// Writes each document, in order, preceded by a `---` marker.
pub fn write_stream<W: Write>(mut writer: W, docs: &[NetworkPolicy]) -> Result<(), Error> {
    for doc in docs {
        writer.write_all(b"---\n")?;
        serde_yaml::to_writer(&mut writer, doc)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the stream to `path`, or to stdout if `path` is `-`.
///
/// Every document is encoded before the file is opened, so an encoding failure leaves an existing
/// file untouched.
pub fn write_to_path(path: &Path, docs: &[NetworkPolicy]) -> Result<(), Error> {
    let mut buf = Vec::new();
    write_stream(&mut buf, docs)?;
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&buf)?;
        stdout.flush()?;
        return Ok(());
    }
    fs::write(path, buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use zone_policy_core::ZoneRegistry;

    #[test]
    fn writes_one_document_per_policy() {
        let mut registry = ZoneRegistry::new();
        registry.add_zone("Front End", ["10.10.1.0/24"]).unwrap();
        registry.add_zone("Back End", ["10.11.0.0/24"]).unwrap();
        registry.allow("Front End", "Back End").unwrap();
        let docs = registry.emit_documents();

        let mut buf = Vec::new();
        write_stream(&mut buf, &docs).unwrap();
        let yaml = String::from_utf8(buf).unwrap();
        assert!(yaml.starts_with("---\napiVersion: networking.k8s.io/v1\n"));

        let parsed = serde_yaml::Deserializer::from_str(&yaml)
            .map(NetworkPolicy::deserialize)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, docs);
    }

    #[test]
    fn replaces_existing_files() {
        let mut registry = ZoneRegistry::new();
        registry.add_zone("Front End", ["10.10.1.0/24"]).unwrap();
        let docs = registry.emit_documents();

        let path = std::env::temp_dir().join(format!(
            "zone-policy-write-{}.yml",
            std::process::id()
        ));
        fs::write(&path, "stale content that is longer than nothing\n".repeat(200)).unwrap();
        write_to_path(&path, &docs).unwrap();

        let mut expected = Vec::new();
        write_stream(&mut expected, &docs).unwrap();
        let written = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(written, expected);
    }

    #[test]
    fn empty_stream() {
        let mut buf = Vec::new();
        write_stream(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
    }
}
