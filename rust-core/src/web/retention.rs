//! Pruning of stored uploads and rendered figures

use super::config::{ArtifactNaming, ServerConfig};
use std::path::Path;
use std::time::SystemTime;

/// Apply `keep_recent` to the upload and static directories
///
/// The just-written upload and figure, when given, always survive.
pub fn enforce(
    config: &ServerConfig,
    upload: Option<&Path>,
    artifact: Option<&Path>,
) -> std::io::Result<()> {
    let keep = config.keep_recent.max(1);
    prune(&config.upload_dir, keep, upload, |name| name.ends_with(".wav"))?;

    // A fixed artifact is overwritten in place
    if config.artifact_naming == ArtifactNaming::Unique {
        prune(&config.static_dir, keep, artifact, |name| config.is_unique_artifact(name))?;
    }
    Ok(())
}

/// Delete all but the `keep` most recently modified files in `dir` whose
/// names satisfy `matches`. `protect` is never deleted and counts toward
/// `keep`. Returns the number of files removed.
pub fn prune<F>(
    dir: &Path,
    keep: usize,
    protect: Option<&Path>,
    matches: F,
) -> std::io::Result<usize>
where
    F: Fn(&str) -> bool,
{
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if protect == Some(path.as_path()) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let meta = entry.metadata()?;
        if !meta.is_file() || !matches(name) {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((modified, path));
    }

    let keep = keep.saturating_sub(usize::from(protect.is_some()));
    if candidates.len() <= keep {
        return Ok(0);
    }

    // Newest first
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in candidates.into_iter().skip(keep) {
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            // Already gone, e.g. pruned by a concurrent request
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(dir = %dir.display(), removed, "pruned old files");
    Ok(removed)
}
