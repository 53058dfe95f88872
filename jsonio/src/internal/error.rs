use crate::internal::BlobHandle;
use thiserror::Error;

// These are mainly useful for debugging when producing text by hand
// and probably aren't interesting to match on in application code.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum InvalidFormat {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected {found:?} at offset {at}")]
    UnexpectedByte { at: usize, found: char },
    #[error("invalid escape sequence at offset {at}")]
    BadEscape { at: usize },
    #[error("malformed number `{0}`")]
    BadNumber(String),
    #[error("malformed blob token")]
    BadBlobToken,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("trailing characters at offset {at}")]
    TrailingCharacters { at: usize },
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DecodeError {
    #[error("the expected shape did not match that in the document")]
    SchemaMismatch,
    #[error("type tag `{found}` does not match `{expected}`")]
    TypeTag { expected: &'static str, found: String },
    #[error("the document references a blob but no blob store is attached")]
    MissingBlobStore,
    #[error("blob {0} lies outside the attached blob store")]
    DanglingBlob(BlobHandle),
    #[error("invalid format: {0}")]
    InvalidFormat(#[from] InvalidFormat),
}

impl DecodeError {
    /// True for the errors that mean "valid text, wrong type", as opposed to broken text
    /// or a missing store.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, DecodeError::SchemaMismatch | DecodeError::TypeTag { .. })
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
