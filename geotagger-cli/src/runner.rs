//! Batch processing of photos.
//!
//! Expands the glob patterns given on the command line and runs every
//! matching file through a [`PhotoAnnotator`]. A failing photo is logged
//! and counted; it never stops the batch.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use geotagger::photo::{PhotoAnnotator, PhotoError};
use geotagger::provider::TileFetcher;
use tracing::{info, warn};

/// Outcome counts of one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Photos saved with a map
    pub annotated: usize,
    /// Files that are not images or carry no coordinates
    pub skipped: usize,
    /// Photos whose map or output could not be produced
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} annotated, {} skipped, {} failed",
            self.annotated, self.skipped, self.failed
        )
    }
}

/// Expands glob patterns into a sorted, de-duplicated list of files.
///
/// Malformed patterns and unreadable entries are logged and ignored.
pub fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();

    for pattern in patterns {
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid file pattern");
                continue;
            }
        };
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Cannot read path"),
            }
        }
    }

    files.into_iter().collect()
}

/// Annotates every file in turn.
pub fn run_batch<F: TileFetcher>(
    annotator: &PhotoAnnotator<F>,
    files: &[PathBuf],
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for path in files {
        match annotator.annotate(path) {
            Ok(output) => {
                info!(output = %output.display(), "Saved {}", output.display());
                summary.annotated += 1;
            }
            Err(e @ (PhotoError::UnreadableImage { .. } | PhotoError::MetadataAbsent(_))) => {
                warn!("{}", e);
                summary.skipped += 1;
            }
            Err(e) => {
                warn!("{}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotagger::cache::TileCache;
    use geotagger::compose::MapComposer;
    use geotagger::coord::TileId;
    use geotagger::photo::MapSettings;
    use geotagger::provider::{ProviderError, TileRaster};
    use std::fs;
    use tempfile::TempDir;

    struct NoTiles;

    impl TileFetcher for NoTiles {
        fn fetch(&self, _tile: TileId) -> Result<TileRaster, ProviderError> {
            Err(ProviderError::HttpError("offline".to_string()))
        }

        fn name(&self) -> &str {
            "offline"
        }
    }

    fn pattern(dir: &TempDir, glob: &str) -> String {
        dir.path().join(glob).to_string_lossy().into_owned()
    }

    #[test]
    fn test_expand_patterns() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.jpg"), b"").unwrap();
        fs::write(dir.path().join("a.jpg"), b"").unwrap();
        fs::write(dir.path().join("c.png"), b"").unwrap();
        fs::create_dir(dir.path().join("d.jpg")).unwrap();

        let files = expand_patterns(&[pattern(&dir, "*.jpg"), pattern(&dir, "a.*")]);

        assert_eq!(
            files,
            vec![dir.path().join("a.jpg"), dir.path().join("b.jpg")]
        );
    }

    #[test]
    fn test_expand_no_matches() {
        let dir = TempDir::new().unwrap();
        assert!(expand_patterns(&[pattern(&dir, "*.jpg")]).is_empty());
        assert!(expand_patterns(&["[".to_string()]).is_empty());
    }

    #[test]
    fn test_batch_continues_past_bad_files() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.jpg");
        fs::write(&text, "not a photo").unwrap();
        let plain = dir.path().join("plain.png");
        image::RgbImage::new(16, 16).save(&plain).unwrap();
        let bitmap = dir.path().join("plain.bmp");
        image::RgbImage::new(16, 16).save(&bitmap).unwrap();

        let composer = MapComposer::new(TileCache::new(NoTiles), 1).unwrap();
        let annotator = PhotoAnnotator::new(composer, MapSettings::default());

        let summary = run_batch(&annotator, &[text, plain, bitmap]);

        assert_eq!(
            summary,
            BatchSummary {
                annotated: 0,
                skipped: 3,
                failed: 0
            }
        );
        assert_eq!(summary.to_string(), "0 annotated, 3 skipped, 0 failed");
    }
}
