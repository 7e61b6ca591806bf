use std::path::Path;

use log::{debug, error, trace};

use crate::{Result, VibeError};

/// Reads an import document.
///
/// The read is the one asynchronous step of an import; the future resolves
/// once, to the content or to the error.
pub async fn read_import_file(path: &Path) -> Result<String> {
    debug!("Reading import document: {}", path.display());
    if !path.is_file() {
        return Err(VibeError::FileNotFound {
            file_path: path.display().to_string(),
        });
    }

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!("Failed to read import file {}: {}", path.display(), e);
        VibeError::Io(e)
    })?;

    trace!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Writes an export document, creating the parent directory if needed.
pub async fn write_export_file(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating export directory: {}", parent.display());
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                error!("Failed to create directory {}: {}", parent.display(), e);
                VibeError::DirectoryError {
                    path: parent.to_path_buf(),
                }
            })?;
        }
    }

    tokio::fs::write(path, document).await.map_err(|e| {
        error!("Failed to write export file {}: {}", path.display(), e);
        VibeError::Io(e)
    })
}

/// First line of a note, cut to `max_chars` characters.
pub fn note_preview(notes: &str, max_chars: usize) -> String {
    let first_line = notes
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Drops `<!-- ... -->` blocks left over from the editor template, including
/// ones spanning several lines. An unclosed block runs to the end.
pub fn strip_comments(content: &str) -> String {
    let mut kept = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("<!--") {
        kept.push_str(&rest[..start]);
        let body = &rest[start + 4..];
        rest = match body.find("-->") {
            Some(end) => &body[end + 3..],
            None => "",
        };
    }
    kept.push_str(rest);
    kept.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_characters() {
        assert_eq!(note_preview("\n  привет мир  \nsecond", 6), "привет...");
        assert_eq!(note_preview("short", 10), "short");
        assert_eq!(note_preview("", 10), "");
    }

    #[test]
    fn editor_comments_are_removed() {
        let raw = "<!-- How was today? -->\nwent running\n\n<!--\nnote\n-->\n";
        assert_eq!(strip_comments(raw), "went running");
        assert_eq!(strip_comments("legs <!-- sore -->fine\nok"), "legs fine\nok");
        assert_eq!(strip_comments("kept\n<!-- never closed"), "kept");
    }

    #[tokio::test]
    async fn export_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("backup.json");
        write_export_file(&path, "{\"vibes\":[]}").await.unwrap();
        assert_eq!(read_import_file(&path).await.unwrap(), "{\"vibes\":[]}");

        let missing = read_import_file(&dir.path().join("missing.json")).await;
        assert!(matches!(missing, Err(VibeError::FileNotFound { .. })));
    }
}
