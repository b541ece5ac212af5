/// API version prefix for all REST resources
pub const API_PREFIX: &str = "/api/v1";

/// Mount point of locally stored files when the local backend is active
pub const LOCAL_FILES_PATH: &str = "/uploads";
