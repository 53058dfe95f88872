//! Numeric arrays that are written to the blob store instead of inline.
//!
//! In the text, an off-loaded array is the token
//! `{"__blob":"<offset>:<len>","dtype":"<dtype>"}` with offset and length as fixed-width
//! hex, so the sizing pass knows the token's length before anything is appended.

use crate::prelude::*;
use num_traits::AsPrimitive;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Float64,
    Float32,
    Int64,
    Int32,
    Int16,
    Int8,
    UInt64,
    UInt32,
    UInt16,
    UInt8,
}

impl DType {
    pub const ALL: [DType; 10] = [
        DType::Float64,
        DType::Float32,
        DType::Int64,
        DType::Int32,
        DType::Int16,
        DType::Int8,
        DType::UInt64,
        DType::UInt32,
        DType::UInt16,
        DType::UInt8,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DType::Float64 => "float64",
            DType::Float32 => "float32",
            DType::Int64 => "int64",
            DType::Int32 => "int32",
            DType::Int16 => "int16",
            DType::Int8 => "int8",
            DType::UInt64 => "uint64",
            DType::UInt32 => "uint32",
            DType::UInt16 => "uint16",
            DType::UInt8 => "uint8",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dtype| dtype.name() == name)
    }

    /// Bytes per element.
    pub fn width(self) -> usize {
        match self {
            DType::Float64 | DType::Int64 | DType::UInt64 => 8,
            DType::Float32 | DType::Int32 | DType::UInt32 => 4,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int8 | DType::UInt8 => 1,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::Float64 | DType::Float32)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs `$body` with `$E` bound to the element type of `$dtype`.
macro_rules! with_dtype {
    ($dtype:expr, $E:ident => $body:expr) => {
        match $dtype {
            DType::Float64 => { type $E = f64; $body }
            DType::Float32 => { type $E = f32; $body }
            DType::Int64 => { type $E = i64; $body }
            DType::Int32 => { type $E = i32; $body }
            DType::Int16 => { type $E = i16; $body }
            DType::Int8 => { type $E = i8; $body }
            DType::UInt64 => { type $E = u64; $body }
            DType::UInt32 => { type $E = u32; $body }
            DType::UInt16 => { type $E = u16; $body }
            DType::UInt8 => { type $E = u8; $body }
        }
    };
}
pub(crate) use with_dtype;

/// An element type that can live in the blob store, as little-endian bytes.
pub trait BlobElement: Encode + Decode + Copy + Default + Send + Sync + AsPrimitive<f64> + 'static {
    const DTYPE: DType;
    fn put_le(self, out: &mut Vec<u8>);
    fn from_le(bytes: &[u8]) -> Self;
    /// Converts back from the `f64` that numeric combination happens in. Integer types
    /// round to nearest and saturate.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_blob_element {
    ($($T:ty => $dtype:ident, $round:expr;)*) => {
        $(
            impl BlobElement for $T {
                const DTYPE: DType = DType::$dtype;
                #[inline]
                fn put_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
                #[inline]
                fn from_le(bytes: &[u8]) -> Self {
                    let mut le = [0u8; std::mem::size_of::<$T>()];
                    le.copy_from_slice(bytes);
                    <$T>::from_le_bytes(le)
                }
                #[inline]
                fn from_f64(value: f64) -> Self {
                    let value = if $round { value.round() } else { value };
                    value.as_()
                }
            }
        )*
    };
}

impl_blob_element! {
    f64 => Float64, false;
    f32 => Float32, false;
    i64 => Int64, true;
    i32 => Int32, true;
    i16 => Int16, true;
    i8 => Int8, true;
    u64 => UInt64, true;
    u32 => UInt32, true;
    u16 => UInt16, true;
    u8 => UInt8, true;
}

const TOKEN_HEAD: &[u8] = b"{\"__blob\":\"";
const TOKEN_MID: &[u8] = b"\",\"dtype\":\"";
const TOKEN_TAIL: &[u8] = b"\"}";

pub fn token_size(dtype: DType) -> usize {
    TOKEN_HEAD.len() + BlobHandle::TEXT_LEN + TOKEN_MID.len() + dtype.name().len() + TOKEN_TAIL.len()
}

pub fn write_token(ctx: &mut WriteContext<'_>, handle: BlobHandle, dtype: DType) {
    ctx.put(TOKEN_HEAD);
    print::write_display(ctx, handle);
    ctx.put(TOKEN_MID);
    ctx.put(dtype.name().as_bytes());
    ctx.put(TOKEN_TAIL);
}

/// Appends `items` to the store as `dtype` little-endian bytes.
pub(crate) fn append_elements<T: BlobElement>(store: &BlobStore, items: &[T]) -> BlobHandle {
    store.append_with(items.len() * T::DTYPE.width(), |out| {
        for item in items {
            item.put_le(out);
        }
    })
}

pub fn slice_size<T: BlobElement>(items: &[T], ctx: &WriteContext<'_>) -> usize {
    if ctx.offloads(std::mem::size_of_val(items)) {
        token_size(T::DTYPE)
    } else {
        print::array_size(items, |item| item.json_size(ctx))
    }
}

pub fn write_slice<T: BlobElement>(items: &[T], ctx: &mut WriteContext<'_>) {
    match ctx.blobs() {
        Some(store) if ctx.offloads(std::mem::size_of_val(items)) => {
            let handle = append_elements(store, items);
            log::debug!("off-loaded {} x {} to blob {}", items.len(), T::DTYPE, handle);
            write_token(ctx, handle, T::DTYPE);
        }
        _ => print::write_array(ctx, items, |ctx, item| ctx.emit(item)),
    }
}

/// Reads the members of a blob token. Anything other than a well-formed token is a
/// `SchemaMismatch` if it lacks `__blob`, or `BadBlobToken` if it has one.
pub fn read_token(ctx: &mut ReadContext<'_>) -> DecodeResult<(BlobHandle, DType)> {
    let mut seq = ctx.begin_object()?;
    let mut handle = None;
    let mut dtype = None;
    while let Some(key) = ctx.next_key(&mut seq)? {
        match &*key {
            "__blob" => handle = Some(BlobHandle::parse(&ctx.string()?).ok_or(InvalidFormat::BadBlobToken)?),
            "dtype" => dtype = Some(DType::from_name(&ctx.string()?).ok_or(InvalidFormat::BadBlobToken)?),
            _ if handle.is_none() => return Err(DecodeError::SchemaMismatch),
            _ => return Err(InvalidFormat::BadBlobToken.into()),
        }
    }
    match (handle, dtype) {
        (Some(handle), Some(dtype)) => Ok((handle, dtype)),
        (None, _) => Err(DecodeError::SchemaMismatch),
        (Some(_), None) => Err(InvalidFormat::BadBlobToken.into()),
    }
}

/// Fills `out` from a payload of `dtype` elements, converting numerically when the types
/// differ.
pub(crate) fn decode_elements<T: BlobElement>(bytes: &[u8], dtype: DType, out: &mut Vec<T>) -> DecodeResult<()> {
    let width = dtype.width();
    if bytes.len() % width != 0 {
        return Err(InvalidFormat::BadBlobToken.into());
    }
    out.clear();
    out.reserve(bytes.len() / width);
    if dtype == T::DTYPE {
        out.extend(bytes.chunks_exact(width).map(T::from_le));
    } else {
        with_dtype!(dtype, E => out.extend(bytes.chunks_exact(width).map(|chunk| T::from_f64(<E as BlobElement>::from_le(chunk).as_()))));
    }
    Ok(())
}

pub fn read_vec<T: BlobElement>(out: &mut Vec<T>, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
    if ctx.peek() != Some(b'{') {
        return read_array_in_place(out, ctx);
    }
    let (handle, dtype) = read_token(ctx)?;
    if dtype != T::DTYPE && !ctx.no_type_check {
        return Err(DecodeError::SchemaMismatch);
    }
    ctx.blob(handle, |bytes| decode_elements(bytes, dtype, out))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_names_round_trip() {
        for dtype in DType::ALL {
            assert_eq!(DType::from_name(dtype.name()), Some(dtype));
        }
        assert_eq!(DType::from_name("float16"), None);
    }

    #[test]
    fn converts_between_dtypes() {
        let mut bytes = Vec::new();
        for v in [1.4f32, -2.6, 300.0] {
            v.put_le(&mut bytes);
        }
        let mut out: Vec<i16> = Vec::new();
        decode_elements(&bytes, DType::Float32, &mut out).unwrap();
        assert_eq!(out, vec![1, -3, 300]);

        let mut saturated: Vec<u8> = Vec::new();
        decode_elements(&bytes, DType::Float32, &mut saturated).unwrap();
        assert_eq!(saturated, vec![1, 0, 255]);
    }

    #[test]
    fn converts_from_integer_payloads() {
        let mut bytes = Vec::new();
        for v in [-3i16, 0, 700] {
            v.put_le(&mut bytes);
        }
        let mut floats: Vec<f64> = Vec::new();
        decode_elements(&bytes, DType::Int16, &mut floats).unwrap();
        assert_eq!(floats, vec![-3.0, 0.0, 700.0]);

        let mut bytes = Vec::new();
        u64::MAX.put_le(&mut bytes);
        let mut narrow: Vec<u8> = Vec::new();
        decode_elements(&bytes, DType::UInt64, &mut narrow).unwrap();
        assert_eq!(narrow, vec![255]);
    }

    #[test]
    fn ragged_payloads_are_rejected() {
        let mut out: Vec<f64> = Vec::new();
        assert_eq!(decode_elements(&[0; 12], DType::Float64, &mut out), Err(InvalidFormat::BadBlobToken.into()));
    }
}
