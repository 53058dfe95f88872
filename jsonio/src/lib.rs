//! Typed JSON encoding with side storage for large numeric arrays.
//!
//! Values are written in two passes: [`Encode::json_size`] computes the exact length of
//! the text, then [`Encode::json_write`] fills a buffer of exactly that length. Numeric
//! arrays of at least [`EncodeOptions::blob_threshold`] bytes are appended to the
//! [`BlobStore`] attached to the output and replaced in the text by a fixed-width token.

// Lets the derive output name `::jsonio` from inside this crate too.
extern crate self as jsonio;

pub mod combine;
pub mod error;
pub mod internal;

pub mod prelude {
    // Likely the minimum API that should go here. It's easier to add later than to remove.
    pub use {
        crate::{as_json, decode, from_json, from_str, to_json},
        crate::internal::{Decode, Encode, EncodedValue},
        jsonio_macros::{Decode, Encode},
    };

    // This section makes everything interesting available to the rest of the crate
    // without bothering to manage imports.
    pub(crate) use crate::{error::*, internal::*};
}

/// The option sets and their overrides, for use with [`encode_options!`],
/// [`decode_options!`] and [`combine_options!`].
pub mod options {
    pub use crate::internal::options::*;
}

pub use combine::{add_gradient, add_gradient_with_options, interpolate, interpolate_with_options};
pub use error::{CombineError, CombineResult, PersistError, PersistResult};
pub use internal::{BlobHandle, BlobStore, DType, DecodeError, DecodeResult, Ignore, InvalidFormat, NumVec, Value, WriteBuffer};
pub use prelude::*;

use internal::{DecodeOptions, DecodeOptionsDefault, EncodeOptions, EncodeOptionsDefault, ReadContext, WriteContext};
use std::sync::Arc;

/// Encodes `value` into `out`, sending large numeric arrays to the blob store `out` uses,
/// if any.
pub fn to_json<T: Encode + ?Sized>(out: &mut EncodedValue, value: &T) {
    to_json_with_options(out, value, &EncodeOptionsDefault)
}

pub fn to_json_with_options<T: Encode + ?Sized>(out: &mut EncodedValue, value: &T, options: &impl EncodeOptions) {
    let blobs = out.blobs().cloned();
    let mut ctx = WriteContext::new(blobs.as_deref(), options);
    let size = value.json_size(&ctx);
    ctx.begin(out.start_write(size));
    ctx.emit(value);
    out.end_write(ctx.finish());
    log::debug!("encoded {} in {} bytes", std::any::type_name::<T>(), size);
}

/// Encodes `value` with no blob store, so every array is inline.
pub fn as_json<T: Encode + ?Sized>(value: &T) -> EncodedValue {
    let mut out = EncodedValue::new();
    to_json(&mut out, value);
    out
}

/// Decodes `encoded` into `value` in place, resolving blob tokens against the store
/// `encoded` carries.
pub fn from_json<T: Decode + ?Sized>(encoded: &EncodedValue, value: &mut T) -> DecodeResult<()> {
    from_json_with_options(encoded, &DecodeOptionsDefault, value)
}

pub fn from_json_with_options<T: Decode + ?Sized>(encoded: &EncodedValue, options: &impl DecodeOptions, value: &mut T) -> DecodeResult<()> {
    read_text(encoded.as_str(), encoded.blobs(), options, value)
}

/// Decodes raw text, resolving blob tokens against `blobs`.
pub fn from_str_with_blobs<T: Decode + ?Sized>(text: &str, blobs: Option<&Arc<BlobStore>>, value: &mut T) -> DecodeResult<()> {
    read_text(text, blobs, &DecodeOptionsDefault, value)
}

/// Decodes raw text. Blob tokens fail with [`DecodeError::MissingBlobStore`].
pub fn from_str<T: Decode + ?Sized>(text: &str, value: &mut T) -> DecodeResult<()> {
    read_text(text, None, &DecodeOptionsDefault, value)
}

pub fn decode<T: Decode + Default>(encoded: &EncodedValue) -> DecodeResult<T> {
    let mut value = T::default();
    from_json(encoded, &mut value)?;
    Ok(value)
}

fn read_text<T: Decode + ?Sized>(text: &str, blobs: Option<&Arc<BlobStore>>, options: &impl DecodeOptions, value: &mut T) -> DecodeResult<()> {
    let mut ctx = ReadContext::new(text, blobs, options);
    value.json_read(&mut ctx)?;
    ctx.finish()
}

#[cfg(test)]
mod tests;
