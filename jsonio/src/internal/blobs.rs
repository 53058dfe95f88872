//! The append-only side store that holds numeric payloads too large to print as text.
//!
//! Payloads are addressed by a [`BlobHandle`] (byte offset and length). Stores are shared
//! through `Arc` by every [`EncodedValue`](crate::EncodedValue) of a session. A store opened
//! by path is registered process-wide, so opening the same path twice while the first
//! store is alive yields the same store.

use crate::error::{PersistError, PersistResult};
use log::{debug, trace};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlobHandle {
    pub offset: u64,
    pub len: u64,
}

impl BlobHandle {
    /// Both fields are printed as 16 hex digits, so the token is the same length wherever
    /// the payload lands.
    pub const TEXT_LEN: usize = 16 + 1 + 16;

    pub fn parse(text: &str) -> Option<Self> {
        let (offset, len) = text.split_once(':')?;
        if offset.len() != 16 || len.len() != 16 {
            return None;
        }
        Some(Self {
            offset: u64::from_str_radix(offset, 16).ok()?,
            len: u64::from_str_radix(len, 16).ok()?,
        })
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}:{:016x}", self.offset, self.len)
    }
}

#[derive(Default)]
struct Arena {
    bytes: Vec<u8>,
    // Bytes before this offset are already in the backing file.
    flushed: usize,
}

#[derive(Default)]
pub struct BlobStore {
    path: Option<PathBuf>,
    arena: RwLock<Arena>,
}

static OPEN_STORES: Lazy<Mutex<HashMap<PathBuf, Weak<BlobStore>>>> = Lazy::new(Default::default);

impl BlobStore {
    /// An anonymous store that lives only in memory.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Opens the store backed by `path`, loading whatever the file already holds. A file
    /// that does not exist yet is an empty store.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Arc<Self>> {
        let path = path.as_ref().to_path_buf();
        let mut open_stores = OPEN_STORES.lock();
        if let Some(store) = open_stores.get(&path).and_then(Weak::upgrade) {
            return Ok(store);
        }
        open_stores.retain(|_, store| store.strong_count() > 0);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(PersistError::io(&path, e)),
        };
        debug!("opened blob store {} ({} bytes)", path.display(), bytes.len());
        let flushed = bytes.len();
        let store = Arc::new(Self {
            path: Some(path.clone()),
            arena: RwLock::new(Arena { bytes, flushed }),
        });
        open_stores.insert(path, Arc::downgrade(&store));
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> u64 {
        self.arena.read().bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn append(&self, bytes: &[u8]) -> BlobHandle {
        self.append_with(bytes.len(), |arena| arena.extend_from_slice(bytes))
    }

    /// Appends `len` bytes produced by `fill` directly into the store, without an
    /// intermediate buffer. `fill` must push exactly `len` bytes.
    pub(crate) fn append_with(&self, len: usize, fill: impl FnOnce(&mut Vec<u8>)) -> BlobHandle {
        let mut arena = self.arena.write();
        let offset = arena.bytes.len();
        arena.bytes.reserve(len);
        fill(&mut arena.bytes);
        assert_eq!(arena.bytes.len() - offset, len, "blob writer produced the wrong number of bytes");
        let handle = BlobHandle {
            offset: offset as u64,
            len: len as u64,
        };
        trace!("appended blob {}", handle);
        handle
    }

    pub fn read(&self, handle: BlobHandle) -> Option<Vec<u8>> {
        self.with_bytes(handle, <[u8]>::to_vec)
    }

    /// Runs `f` on the payload in place, under the read lock.
    pub fn with_bytes<R>(&self, handle: BlobHandle, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        let arena = self.arena.read();
        let start = usize::try_from(handle.offset).ok()?;
        let end = start.checked_add(usize::try_from(handle.len).ok()?)?;
        arena.bytes.get(start..end).map(f)
    }

    /// Appends to the backing file everything written since the last flush. A store
    /// without a backing file has nothing to flush.
    pub fn flush(&self) -> PersistResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut arena = self.arena.write();
        if arena.flushed == arena.bytes.len() {
            return Ok(());
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PersistError::io(path, e))?;
        file.write_all(&arena.bytes[arena.flushed..]).map_err(|e| PersistError::io(path, e))?;
        debug!("flushed {} blob bytes to {}", arena.bytes.len() - arena.flushed, path.display());
        arena.flushed = arena.bytes.len();
        Ok(())
    }

    /// Writes the whole store to `path`, replacing the file.
    pub fn save_as(&self, path: impl AsRef<Path>) -> PersistResult<()> {
        let path = path.as_ref();
        let arena = self.arena.read();
        fs::write(path, &arena.bytes).map_err(|e| PersistError::io(path, e))?;
        debug!("saved {} blob bytes to {}", arena.bytes.len(), path.display());
        Ok(())
    }
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore").field("path", &self.path).field("len", &self.len()).finish()
    }
}
