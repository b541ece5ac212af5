//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{unix_millis}-{uuid}.{ext}`.

use chrono::Utc;
use uuid::Uuid;

/// Attachments of request analytics records (input and output files)
pub const REQUEST_FILES: &str = "request_files";
/// Profile images of businesses and sub-users
pub const USER_IMAGES: &str = "user_images";
/// Files sent through the generic upload endpoint
pub const UPLOADS: &str = "uploads";

/// Generate a unique storage key in `folder` with the given file extension.
pub fn generate_key(folder: &str, extension: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        folder.trim_matches('/'),
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        extension.trim_start_matches('.')
    )
}

/// Keys must stay relative and inside their folder.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/') && !key.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let key = generate_key(REQUEST_FILES, "png");
        let rest = key.strip_prefix("request_files/").unwrap();
        let (millis, tail) = rest.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        let (uuid, ext) = tail.rsplit_once('.').unwrap();
        assert!(Uuid::parse_str(uuid).is_ok());
        assert_eq!(ext, "png");
        assert!(is_valid_key(&key));
    }

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(generate_key(UPLOADS, "jpg"), generate_key(UPLOADS, "jpg"));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("/abs/path"));
        assert!(!is_valid_key(""));
    }
}
