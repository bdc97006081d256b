use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Listing of one source folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Matching regular files, sorted by name
    pub puzzles: Vec<Utf8PathBuf>,
    /// Matching entries that are not regular files
    pub skipped: Vec<Utf8PathBuf>,
}

/// Check a file name against the `*.<extension>` pattern
pub fn matches_extension(file_name: &str, extension: &str) -> bool {
    file_name
        .strip_suffix(extension)
        .is_some_and(|stem| stem.ends_with('.'))
}

/// List the puzzle files directly inside `source_dir`.
///
/// Only one level is read. Names must end in `.<extension>` (case-sensitive).
/// Matching entries that are not regular files after following symlinks, such
/// as a directory called `foo.txt`, are left out of `puzzles`. Results are
/// sorted so the solve order does not depend on the filesystem.
pub fn discover_puzzles(source_dir: &Utf8Path, extension: &str) -> io::Result<Discovery> {
    let mut discovery = Discovery::default();

    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        let path = match Utf8PathBuf::try_from(entry.path()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping non UTF-8 file name: {}", e.as_path().display());
                continue;
            }
        };

        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !matches_extension(file_name, extension) {
            continue;
        }

        if path.is_file() {
            discovery.puzzles.push(path);
        } else {
            tracing::debug!("Skipping non-file entry: {}", path);
            discovery.skipped.push(path);
        }
    }

    discovery.puzzles.sort();
    discovery.skipped.sort();

    tracing::debug!(
        "Discovered {} puzzles in {} ({} skipped)",
        discovery.puzzles.len(),
        source_dir,
        discovery.skipped.len()
    );

    Ok(discovery)
}
