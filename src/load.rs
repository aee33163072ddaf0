use memmap2::Mmap;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::normalizer::normalize_all;
use crate::record::JobRecord;

/// Decode a listing export: a JSON array whose elements are normalized in
/// order. Nothing is produced unless the whole document parses.
pub fn decode(bytes: &[u8]) -> Result<Vec<JobRecord>, LoadError> {
    let doc: Value = serde_json::from_slice(bytes)?;
    let items = match doc {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::NotAnArray {
                found: json_kind(&other),
            });
        }
    };

    let records = normalize_all(&items);
    debug!(records = records.len(), "decoded listings");
    Ok(records)
}

/// Read and decode a listing file.
pub fn read_file(path: &Path) -> Result<Vec<JobRecord>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();

    // zero-length mappings are rejected on some platforms
    let records = if len == 0 {
        decode(&[])?
    } else {
        // SAFETY: the map is read-only and dropped before returning; a
        // concurrent truncation by another process is outside our control.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
        decode(&mmap)?
    };

    info!(path = %path.display(), bytes = len, records = records.len(), "read listing file");
    Ok(records)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn decodes_array_in_order() {
        let raw = br#"[{"Title":"Dev","Posted":"10 minutes ago","Level":"Expert"},{}]"#;
        let records = decode(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Dev");
        assert_eq!(records[0].posted_minutes, 10);
        assert_eq!(records[1], JobRecord::default());
    }

    #[test]
    fn empty_array_is_fine() {
        assert!(decode(b"[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(decode(b"[{"), Err(LoadError::InvalidJson(_))));
        assert!(matches!(decode(b""), Err(LoadError::InvalidJson(_))));
    }

    #[test]
    fn rejects_non_array() {
        match decode(br#"{"Title":"Dev"}"#) {
            Err(LoadError::NotAnArray { found }) => assert_eq!(found, "an object"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"[{{"Title":"Dev","Skill":"Rust"}}]"#).unwrap();
        let records = read_file(f.path()).unwrap();
        assert_eq!(records[0].skill_tag, "Rust");
    }

    #[test]
    fn empty_file_is_invalid_json() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(read_file(f.path()), Err(LoadError::InvalidJson(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_file(Path::new("/nonexistent/jobs.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.user_message().starts_with("Could not read file"));
    }
}
