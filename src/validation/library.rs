use std::path::Path;

use crate::db::enums::LibraryItemType;
use crate::db::models::library::SaveSuggestedRequest;
use crate::error::AppError;

use super::is_blank;

pub const MAX_PDF_BYTES: usize = 25 * 1024 * 1024;

/// Comma-separated tags, trimmed, empties dropped.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Upload forms only carry PDFs; a missing type means `pdf`.
pub fn parse_upload_item_type(raw: Option<&str>) -> Result<LibraryItemType, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(LibraryItemType::Pdf),
        Some(value) => match value.parse::<LibraryItemType>() {
            Ok(LibraryItemType::Pdf) => Ok(LibraryItemType::Pdf),
            _ => Err(AppError::validation("Invalid item type or data")),
        },
    }
}

/// Title to use for an uploaded file: the given one, else the file name without extension.
pub fn title_or_file_stem(title: Option<&str>, file_name: &str) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("document")
            .to_string(),
    }
}

/// Safe object name: path separators and control characters are replaced.
pub fn storage_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.');
    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn validate_save_suggested(req: &SaveSuggestedRequest) -> Result<(), AppError> {
    if is_blank(&req.title) || is_blank(&req.link) || is_blank(&req.result_id) {
        return Err(AppError::validation("Missing article data"));
    }
    Ok(())
}
