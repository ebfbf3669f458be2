use serde::Deserialize;
use thiserror::Error;

use crate::config::UploadConfig;

/// Metadata of an uploaded file as seen by the validator.
#[derive(Debug, Clone, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File size too large")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("File type not allowed")]
    UnsupportedFileType(String),
}

/// Checks size first, then extension.
///
/// The extension is the last `.`-separated segment of the lowercased name, so
/// a name without any dot is compared as a whole ("png" passes, "readme"
/// does not).
pub fn validate_upload(file: &FileMeta, config: &UploadConfig) -> Result<(), UploadError> {
    if file.size_bytes > config.max_file_size_bytes {
        return Err(UploadError::FileTooLarge {
            size_bytes: file.size_bytes,
            max_bytes: config.max_file_size_bytes,
        });
    }

    let extension = file_extension(&file.name);
    if !config.allowed_extensions.iter().any(|allowed| *allowed == extension) {
        return Err(UploadError::UnsupportedFileType(extension));
    }

    Ok(())
}

fn file_extension(name: &str) -> String {
    let lowered = name.to_lowercase();
    // rsplit always yields at least one segment
    lowered.rsplit('.').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size_bytes: u64) -> FileMeta {
        FileMeta {
            name: name.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn rejects_oversized_file() {
        let err = validate_upload(&file("a.png", 6_000_000), &UploadConfig::default()).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { size_bytes: 6_000_000, .. }));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_upload(&file("a.pdf", 5_242_880), &UploadConfig::default()).is_ok());
        assert!(validate_upload(&file("a.pdf", 5_242_881), &UploadConfig::default()).is_err());
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = validate_upload(&file("a.exe", 1000), &UploadConfig::default()).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedFileType("exe".to_string()));
    }

    #[test]
    fn accepts_allowed_extension_case_insensitively() {
        assert!(validate_upload(&file("a.png", 1000), &UploadConfig::default()).is_ok());
        assert!(validate_upload(&file("Report.DOCX", 1000), &UploadConfig::default()).is_ok());
    }

    #[test]
    fn size_is_checked_before_extension() {
        let err = validate_upload(&file("a.exe", 6_000_000), &UploadConfig::default()).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { .. }));
    }

    #[test]
    fn dotless_name_is_its_own_extension() {
        assert!(validate_upload(&file("png", 10), &UploadConfig::default()).is_ok());
        assert_eq!(
            validate_upload(&file("readme", 10), &UploadConfig::default()),
            Err(UploadError::UnsupportedFileType("readme".to_string()))
        );
    }

    #[test]
    fn only_last_segment_counts() {
        assert!(validate_upload(&file("archive.png.exe", 10), &UploadConfig::default()).is_err());
        assert!(validate_upload(&file("photo.exe.jpg", 10), &UploadConfig::default()).is_ok());
    }
}
