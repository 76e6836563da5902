//! Persisting the finished lookup tables.
//!
//! Writes happen only after every region has been processed and stop at the
//! first failure.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clinicmap_core::{Location, LookupTables};
use serde::Serialize;

pub(crate) const LOCATIONS_FILE: &str = "clinics-with-ids.json";
pub(crate) const LOOKUP_DIR: &str = "clinics-zip-code-lookup";
pub(crate) const COMBINED_FILE: &str = "all.json";
pub(crate) const AUDIT_FILE: &str = "clinics-address-check.json";

/// Writes, in order: the id-augmented locations, one lookup per region, the
/// combined lookup, and the address audit. Returns the paths written.
pub(crate) fn write_outputs(
    dir: &Path,
    locations: &[Location],
    tables: &LookupTables,
) -> anyhow::Result<Vec<PathBuf>> {
    let lookup_dir = dir.join(LOOKUP_DIR);
    std::fs::create_dir_all(&lookup_dir)
        .with_context(|| format!("failed creating output directory {}", lookup_dir.display()))?;

    let mut written = Vec::with_capacity(tables.regions.len() + 3);

    let locations_path = dir.join(LOCATIONS_FILE);
    write_pretty_json(&locations_path, locations)?;
    written.push(locations_path);

    for (code, entries) in &tables.regions {
        anyhow::ensure!(
            is_safe_file_stem(code),
            "region code {code:?} cannot be used as a file name"
        );
        let path = lookup_dir.join(format!("{code}.json"));
        write_pretty_json(&path, entries)?;
        written.push(path);
    }

    let combined_path = lookup_dir.join(COMBINED_FILE);
    write_pretty_json(&combined_path, &tables.regions)?;
    written.push(combined_path);

    let audit_path = dir.join(AUDIT_FILE);
    write_pretty_json(&audit_path, &tables.audit)?;
    written.push(audit_path);

    tracing::info!(
        files = written.len(),
        dir = %dir.display(),
        "wrote lookup outputs"
    );
    Ok(written)
}

/// Serializes `value` as JSON with four-space indentation.
fn write_pretty_json<T>(path: &Path, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .with_context(|| format!("failed serializing {}", path.display()))?;
    std::fs::write(path, buf).with_context(|| format!("failed writing {}", path.display()))
}

fn is_safe_file_stem(code: &str) -> bool {
    !code.is_empty()
        && code != "all"
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
