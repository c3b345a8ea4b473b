//! File category classification.
//!
//! Maps a path to a semantic category name for the reporting UI. The table
//! is fixed at compile time; lookup priority is extension first, then MIME
//! type prefix, then `"other"`. Paths that do not exist classify as
//! `"unknown"`, directories as `"directories"`. Pure and deterministic
//! given the table.

use std::fs;
use std::path::Path;

/// One category with its extension set and MIME-prefix fallback set.
struct CategoryRule {
    name: &'static str,
    extensions: &'static [&'static str],
    mime_prefixes: &'static [&'static str],
}

static CATEGORIES: &[CategoryRule] = &[
    CategoryRule {
        name: "images",
        extensions: &[
            "jpg", "jpeg", "png", "gif", "bmp", "ico", "webp", "svg", "tiff", "tif", "heic",
        ],
        mime_prefixes: &["image/"],
    },
    CategoryRule {
        name: "videos",
        extensions: &[
            "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg",
        ],
        mime_prefixes: &["video/"],
    },
    CategoryRule {
        name: "audio",
        extensions: &["mp3", "wav", "flac", "ogg", "m4a", "aac", "wma", "opus"],
        mime_prefixes: &["audio/"],
    },
    CategoryRule {
        name: "documents",
        extensions: &[
            "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "txt", "md",
            "rtf", "csv",
        ],
        mime_prefixes: &["text/"],
    },
    CategoryRule {
        name: "archives",
        extensions: &["zip", "tar", "gz", "bz2", "xz", "7z", "rar", "tgz", "zst"],
        mime_prefixes: &[
            "application/zip",
            "application/x-tar",
            "application/gzip",
            "application/x-7z",
            "application/x-rar",
        ],
    },
    CategoryRule {
        name: "applications",
        extensions: &["exe", "msi", "deb", "rpm", "appimage", "dmg", "apk"],
        mime_prefixes: &["application/x-executable", "application/x-msdownload"],
    },
];

/// Classify `path` into a category name.
///
/// Returns `"unknown"` for paths that do not exist and `"directories"` for
/// directories. Everything else is matched by extension against the static
/// table, then by MIME-type prefix, then lands in `"other"`.
#[must_use]
pub fn classify(path: &Path) -> &'static str {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return "unknown",
    };
    if metadata.is_dir() {
        return "directories";
    }

    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        let extension = extension.to_lowercase();
        for rule in CATEGORIES {
            if rule.extensions.contains(&extension.as_str()) {
                return rule.name;
            }
        }
    }

    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        for rule in CATEGORIES {
            if rule.mime_prefixes.iter().any(|p| mime.starts_with(p)) {
                return rule.name;
            }
        }
    }

    "other"
}

/// The category names the classifier can produce, fallbacks included.
#[must_use]
pub fn category_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CATEGORIES.iter().map(|rule| rule.name).collect();
    names.extend(["other", "unknown", "directories"]);
    names
}
