use crate::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Finished JSON text, together with the blob store its blob tokens refer to.
///
/// The text is replaced as a whole by [`end_write`](Self::end_write), so it is never seen
/// half written. Clones share the store.
#[derive(Clone, Debug)]
pub struct EncodedValue {
    text: String,
    blobs: Option<Arc<BlobStore>>,
}

impl Default for EncodedValue {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodedValue {
    /// A `null` with no store.
    pub fn new() -> Self {
        Self {
            text: String::from("null"),
            blobs: None,
        }
    }

    /// Wraps text produced elsewhere. The text is taken as is; decoding is what validates
    /// it.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blobs: None,
        }
    }

    pub fn with_blobs(mut self, blobs: Arc<BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    pub fn set_blobs(&mut self, blobs: Option<Arc<BlobStore>>) {
        self.blobs = blobs;
    }

    pub fn blobs(&self) -> Option<&Arc<BlobStore>> {
        self.blobs.as_ref()
    }

    /// Attaches the store at `path`, shared with every other value using the same path.
    pub fn use_blobs(&mut self, path: impl AsRef<Path>) -> PersistResult<()> {
        self.blobs = Some(BlobStore::open(path)?);
        Ok(())
    }

    /// Starts building new text of exactly `len` bytes.
    pub fn start_write(&self, len: usize) -> WriteBuffer {
        WriteBuffer::with_len(len)
    }

    /// Installs the text written into `buffer`.
    ///
    /// # Panics
    /// If fewer bytes were written than the buffer was sized for, or the bytes are not
    /// UTF-8. Both mean an `Encode` implementation is broken.
    pub fn end_write(&mut self, buffer: WriteBuffer) {
        let (bytes, pos) = buffer.into_parts();
        assert_eq!(pos, bytes.len(), "wrote {} bytes into a buffer sized for {}", pos, bytes.len());
        match String::from_utf8(bytes) {
            Ok(text) => self.text = text,
            Err(err) => panic!("encoding produced invalid UTF-8 at byte {}", err.utf8_error().valid_up_to()),
        }
    }

    pub fn set_null(&mut self) {
        self.text.clear();
        self.text.push_str("null");
    }

    pub fn is_null(&self) -> bool {
        let trimmed = self.text.trim();
        trimmed.is_empty() || trimmed == "null"
    }

    /// True if the text is exactly `token` written as a JSON string.
    pub fn is_string(&self, token: &str) -> bool {
        self.text.len() == print::string_size(token) && self.text == as_json(token).text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

/// Equal when the texts are equal. The stores are not compared.
impl PartialEq for EncodedValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl PartialEq<str> for EncodedValue {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<String> for EncodedValue {
    fn eq(&self, other: &String) -> bool {
        &self.text == other
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
