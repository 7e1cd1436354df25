/// Bucket prefix under which file payloads are stored
pub const UPLOAD_PREFIX: &str = "uploads";

/// Extension used when the original filename carries none
pub const DEFAULT_EXTENSION: &str = "bin";
