//! Filesystem side of image matching.

use quickgenda_core::images::{ImageProbe, SUPPORTED_EXTENSIONS};
use std::path::Path;
use walkdir::WalkDir;

/// [`ImageProbe`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl ImageProbe for FsProbe {
    fn folder_exists(&self, folder: &str) -> bool {
        Path::new(folder).is_dir()
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }
}

/// Number of files directly inside `folder` with a supported image
/// extension, compared case-insensitively. A missing folder counts zero.
pub fn count_images(folder: &Path) -> usize {
    WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported(e.path()))
        .count()
}

fn is_supported(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = format!(".{}", ext.to_lowercase());
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_checks_files_and_folders() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Jane_Doe.jpg");
        fs::write(&file, b"jpg").unwrap();

        let probe = FsProbe;
        assert!(probe.folder_exists(tmp.path().to_str().unwrap()));
        assert!(!probe.folder_exists(file.to_str().unwrap()));
        assert!(probe.file_exists(file.to_str().unwrap()));
        assert!(!probe.file_exists(tmp.path().join("missing.png").to_str().unwrap()));
    }

    #[test]
    fn test_count_images_top_level_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.JPG"), b"").unwrap();
        fs::write(tmp.path().join("b.png"), b"").unwrap();
        fs::write(tmp.path().join("c_flag.tiff"), b"").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();
        fs::write(tmp.path().join("noext"), b"").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/d.jpg"), b"").unwrap();

        assert_eq!(count_images(tmp.path()), 3);
    }

    #[test]
    fn test_count_images_missing_folder() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(count_images(&tmp.path().join("absent")), 0);
    }
}
