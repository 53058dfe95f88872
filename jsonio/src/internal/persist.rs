//! Files holding one encoded value. The text goes in the file itself, optionally as a
//! zstd frame, and a non-empty blob store goes next to it in `<path>.blobs`.

use crate::prelude::*;
use log::debug;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];
const COMPRESSION_LEVEL: i32 = 3;

/// Where the blobs of the value stored at `path` live.
pub fn blobs_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".blobs");
    PathBuf::from(name)
}

impl EncodedValue {
    pub fn write_to_file(&self, path: impl AsRef<Path>, enable_compression: bool) -> PersistResult<()> {
        let path = path.as_ref();
        if let Some(store) = self.blobs().filter(|store| !store.is_empty()) {
            let sidecar = blobs_path(path);
            if store.path() == Some(sidecar.as_path()) {
                store.flush()?;
            } else {
                store.save_as(&sidecar)?;
            }
        }

        let text = self.as_str().as_bytes();
        let written = if enable_compression {
            let compressed = zstd::encode_all(text, COMPRESSION_LEVEL).map_err(|e| PersistError::io(path, e))?;
            debug!("writing {} ({} bytes, {} compressed)", path.display(), text.len(), compressed.len());
            fs::write(path, compressed)
        } else {
            debug!("writing {} ({} bytes)", path.display(), text.len());
            fs::write(path, text)
        };
        written.map_err(|e| PersistError::io(path, e))
    }

    /// Reads a value written by [`write_to_file`](Self::write_to_file), compressed or not.
    ///
    /// A missing file is [`PersistError::NotFound`]. Every other error means the file is
    /// unusable.
    pub fn read_from_file(path: impl AsRef<Path>) -> PersistResult<Self> {
        let path = path.as_ref();
        let mut bytes = fs::read(path).map_err(|e| PersistError::read(path, e))?;
        if bytes.starts_with(&ZSTD_MAGIC) {
            bytes = zstd::decode_all(bytes.as_slice()).map_err(|e| PersistError::io(path, e))?;
        }
        let text = String::from_utf8(bytes).map_err(|_| PersistError::Utf8 { path: path.to_path_buf() })?;
        debug!("read {} ({} bytes)", path.display(), text.len());

        let mut value = EncodedValue::from_text(text);
        let sidecar = blobs_path(path);
        if sidecar.is_file() {
            value.set_blobs(Some(BlobStore::open(&sidecar)?));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_is_named_after_the_file() {
        assert_eq!(blobs_path(Path::new("/tmp/params.json")), Path::new("/tmp/params.json.blobs"));
    }

    #[test]
    fn missing_directories_on_write_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("value.json");
        match as_json(&1u8).write_to_file(&path, false) {
            Err(PersistError::Io { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected an I/O error, got {:?}", other),
        }

        let mut encoded = EncodedValue::new().with_blobs(BlobStore::in_memory());
        to_json(&mut encoded, &vec![1.0f64; 64]);
        let err = encoded.write_to_file(&path, true).unwrap_err();
        assert!(!err.is_not_found(), "{}", err);
    }

    #[test]
    fn missing_files_are_distinguished() {
        let dir = tempfile::tempdir().unwrap();
        let err = EncodedValue::read_from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_not_found(), "{}", err);
    }
}
