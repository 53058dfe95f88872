use crate::prelude::*;
use std::fmt;
use std::sync::Arc;

/// A buffer of a fixed, pre-computed size with a write cursor.
///
/// Handed out by [`EncodedValue::start_write`] and given back to
/// [`EncodedValue::end_write`], which checks the cursor reached the end. Writing past the
/// end panics: either way a mismatch between a type's `json_size` and its `json_write` is
/// a bug in that type, never something to recover from.
#[derive(Default)]
pub struct WriteBuffer {
    bytes: Vec<u8>,
    pos: usize,
}

impl WriteBuffer {
    pub(crate) fn with_len(len: usize) -> Self {
        Self { bytes: vec![0; len], pos: 0 }
    }

    #[inline]
    pub fn put(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        assert!(
            end <= self.bytes.len(),
            "write overran the sized buffer: {} bytes past {}",
            end - self.bytes.len(),
            self.bytes.len()
        );
        self.bytes[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, usize) {
        (self.bytes, self.pos)
    }
}

impl fmt::Write for WriteBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put(s.as_bytes());
        Ok(())
    }
}

/// State threaded through one top-level encode: where payloads go, when they go there,
/// and the output being filled.
pub struct WriteContext<'a> {
    blobs: Option<&'a BlobStore>,
    blob_threshold: usize,
    size: usize,
    out: WriteBuffer,
}

impl<'a> WriteContext<'a> {
    pub fn new(blobs: Option<&'a BlobStore>, options: &impl EncodeOptions) -> Self {
        Self {
            blobs,
            blob_threshold: options.blob_threshold(),
            size: 0,
            out: WriteBuffer::default(),
        }
    }

    pub fn blobs(&self) -> Option<&'a BlobStore> {
        self.blobs
    }

    /// Whether a numeric payload of `byte_len` bytes is written to the blob store. Both
    /// passes ask this same question, which is what keeps a blob token's size predictable.
    #[inline]
    pub fn offloads(&self, byte_len: usize) -> bool {
        self.blobs.is_some() && byte_len >= self.blob_threshold
    }

    /// The total computed by the sizing pass. Zero until [`begin`](Self::begin).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cursor(&self) -> usize {
        self.out.cursor()
    }

    /// Starts the writing pass into `out`, which must be exactly the sized length.
    pub(crate) fn begin(&mut self, out: WriteBuffer) {
        self.size = out.len();
        self.out = out;
    }

    pub(crate) fn finish(self) -> WriteBuffer {
        self.out
    }

    #[inline]
    pub fn put(&mut self, bytes: &[u8]) {
        self.out.put(bytes)
    }

    #[inline]
    pub fn put_byte(&mut self, byte: u8) {
        self.out.put(&[byte])
    }

    pub(crate) fn out(&mut self) -> &mut WriteBuffer {
        &mut self.out
    }

    /// Writes a constituent of a composite value. Debug builds re-run the sizing pass for
    /// the constituent and check it against the actual cursor advance, which pins a
    /// divergence to the innermost type that caused it.
    #[inline]
    pub fn emit<T: Encode + ?Sized>(&mut self, value: &T) {
        #[cfg(debug_assertions)]
        let start = self.cursor();
        value.json_write(self);
        #[cfg(debug_assertions)]
        {
            let expected = value.json_size(self);
            debug_assert_eq!(
                self.cursor() - start,
                expected,
                "json_write and json_size disagree for {}",
                std::any::type_name::<T>()
            );
        }
    }
}

/// State threaded through one top-level decode.
pub struct ReadContext<'a> {
    pub(crate) text: &'a [u8],
    pub(crate) pos: usize,
    pub(crate) depth: usize,
    blobs: Option<&'a Arc<BlobStore>>,
    pub no_type_check: bool,
}

impl<'a> ReadContext<'a> {
    pub fn new(text: &'a str, blobs: Option<&'a Arc<BlobStore>>, options: &impl DecodeOptions) -> Self {
        Self {
            text: text.as_bytes(),
            pos: 0,
            depth: 0,
            blobs,
            no_type_check: options.no_type_check(),
        }
    }

    pub fn blobs(&self) -> Option<&'a Arc<BlobStore>> {
        self.blobs
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Resolves a payload handle against the attached store.
    pub fn blob<R>(&self, handle: BlobHandle, f: impl FnOnce(&[u8]) -> R) -> DecodeResult<R> {
        let blobs = self.blobs.ok_or(DecodeError::MissingBlobStore)?;
        blobs.with_bytes(handle, f).ok_or(DecodeError::DanglingBlob(handle))
    }
}
