/// Batch folder listing
///
/// Only the folder itself is scanned (no recursion). Results are sorted by
/// file name so a batch always walks the photos in the same order.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ExtensionMatch;
use crate::error::Result;

/// Extensions accepted for batch analysis
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Check whether a file name has one of the accepted extensions
pub fn has_image_extension(file_name: &str, policy: ExtensionMatch) -> bool {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };

    match policy {
        ExtensionMatch::CaseSensitive => IMAGE_EXTENSIONS.contains(&ext),
        ExtensionMatch::CaseInsensitive => IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext)),
    }
}

/// List the photos directly inside `folder`
pub fn list_images(folder: &Path, policy: ExtensionMatch) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if has_image_extension(&name, policy) {
            images.push(entry.into_path());
        }
    }

    log::info!("Found {} images in {}", images.len(), folder.display());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("doc-analyzer-listing-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_extension_policies() {
        assert!(has_image_extension("a.jpg", ExtensionMatch::CaseSensitive));
        assert!(has_image_extension("a.jpeg", ExtensionMatch::CaseSensitive));
        assert!(has_image_extension("a.png", ExtensionMatch::CaseSensitive));
        assert!(!has_image_extension("a.JPG", ExtensionMatch::CaseSensitive));
        assert!(has_image_extension("a.JPG", ExtensionMatch::CaseInsensitive));
        assert!(has_image_extension("a.Png", ExtensionMatch::CaseInsensitive));
        assert!(!has_image_extension("a.tiff", ExtensionMatch::CaseInsensitive));
        assert!(!has_image_extension("jpg", ExtensionMatch::CaseInsensitive));
        assert!(!has_image_extension("a.jpg.txt", ExtensionMatch::CaseInsensitive));
    }

    #[test]
    fn test_lists_sorted_non_recursive() {
        let dir = scratch_dir("sorted");
        touch(&dir, "c.png");
        touch(&dir, "a.jpg");
        touch(&dir, "b.JPEG");
        touch(&dir, "notes.txt");
        std::fs::create_dir_all(dir.join("nested.jpg")).unwrap();
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        touch(&dir.join("sub"), "deep.jpg");

        let insensitive = list_images(&dir, ExtensionMatch::CaseInsensitive).unwrap();
        let sensitive = list_images(&dir, ExtensionMatch::CaseSensitive).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        let names = |paths: &[PathBuf]| -> Vec<String> {
            paths
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        assert_eq!(names(&insensitive), ["a.jpg", "b.JPEG", "c.png"]);
        assert_eq!(names(&sensitive), ["a.jpg", "c.png"]);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let result = list_images(Path::new("/nonexistent/folder"), ExtensionMatch::CaseInsensitive);
        assert!(result.is_err());
    }
}
