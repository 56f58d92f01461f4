//! Link file export
//!
//! Writes one file per result set into the output directory, one entry per
//! line, named after the seed host.

use crate::output::LinkExport;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the link files for `host` into `dir`
///
/// Always writes `{host}_internal_links.txt`, `{host}_external_links.txt`
/// and `{host}_email_addresses.txt`; `{host}_image_links.txt` only when
/// `include_assets` is set. Existing files are overwritten. Returns the
/// paths written.
pub fn write_link_files(
    dir: &Path,
    host: &str,
    export: &LinkExport,
    include_assets: bool,
) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut files = vec![
        ("internal_links", &export.internal),
        ("external_links", &export.external),
        ("email_addresses", &export.emails),
    ];
    if include_assets {
        files.push(("image_links", &export.assets));
    }

    let mut written = Vec::with_capacity(files.len());
    for (suffix, lines) in files {
        let path = dir.join(format!("{}_{}.txt", host, suffix));
        write_lines(&path, lines)?;
        tracing::debug!("Wrote {} entries to {}", lines.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}
