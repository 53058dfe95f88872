//! A dynamically typed JSON tree, used where the shape is only known from the text.

use crate::internal::types::blob::{append_elements, decode_elements, token_size, with_dtype, write_token};
use crate::prelude::*;
use num_traits::AsPrimitive;

/// Any JSON value, with blob tokens resolved into typed numeric arrays.
///
/// Object members keep the order of the text. Numbers without a fraction or exponent
/// are `Int` if they fit an `i64`, else `UInt` if they fit a `u64`. All others are
/// `Float`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
    Blob(NumVec),
}

/// The payload of a blob, in its stored element type.
#[derive(Clone, Debug, PartialEq)]
pub enum NumVec {
    Float64(Vec<f64>),
    Float32(Vec<f32>),
    Int64(Vec<i64>),
    Int32(Vec<i32>),
    Int16(Vec<i16>),
    Int8(Vec<i8>),
    UInt64(Vec<u64>),
    UInt32(Vec<u32>),
    UInt16(Vec<u16>),
    UInt8(Vec<u8>),
}

macro_rules! on_items {
    ($nums:expr, $items:ident => $body:expr) => {
        match $nums {
            NumVec::Float64($items) => $body,
            NumVec::Float32($items) => $body,
            NumVec::Int64($items) => $body,
            NumVec::Int32($items) => $body,
            NumVec::Int16($items) => $body,
            NumVec::Int8($items) => $body,
            NumVec::UInt64($items) => $body,
            NumVec::UInt32($items) => $body,
            NumVec::UInt16($items) => $body,
            NumVec::UInt8($items) => $body,
        }
    };
}

macro_rules! impl_from_vec {
    ($($T:ty => $V:ident),*) => {
        $(
            impl From<Vec<$T>> for NumVec {
                fn from(items: Vec<$T>) -> Self {
                    NumVec::$V(items)
                }
            }
        )*
    };
}

impl_from_vec!(f64 => Float64, f32 => Float32, i64 => Int64, i32 => Int32, i16 => Int16, i8 => Int8,
    u64 => UInt64, u32 => UInt32, u16 => UInt16, u8 => UInt8);

impl NumVec {
    pub fn dtype(&self) -> DType {
        on_items!(self, items => element_dtype(items))
    }

    pub fn len(&self) -> usize {
        on_items!(self, items => items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_f64(&self) -> Vec<f64> {
        on_items!(self, items => items.iter().map(|&item| AsPrimitive::<f64>::as_(item)).collect())
    }

    /// Converts `values` to `dtype`, rounding and saturating for integer types.
    pub fn from_f64(dtype: DType, values: &[f64]) -> Self {
        with_dtype!(dtype, E => NumVec::from(values.iter().map(|&value| E::from_f64(value)).collect::<Vec<E>>()))
    }

    /// Each element as a scalar `Value`.
    pub fn to_values(&self) -> Vec<Value> {
        match self {
            NumVec::UInt64(items) => items.iter().map(|&item| Value::from_u64(item)).collect(),
            _ if self.dtype().is_float() => self.to_f64().into_iter().map(Value::Float).collect(),
            _ => on_items!(self, items => items.iter().map(|&item| Value::Int(AsPrimitive::<i64>::as_(item))).collect()),
        }
    }

    pub(crate) fn from_le_bytes(dtype: DType, bytes: &[u8]) -> DecodeResult<Self> {
        with_dtype!(dtype, E => {
            let mut items: Vec<E> = Vec::new();
            decode_elements(bytes, dtype, &mut items)?;
            Ok(NumVec::from(items))
        })
    }
}

fn element_dtype<T: BlobElement>(_items: &[T]) -> DType {
    T::DTYPE
}

impl Value {
    /// `Int` when `value` fits, else `UInt`.
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Value::Int(value),
            Err(_) => Value::UInt(value),
        }
    }

    /// The numeric value of an `Int`, `UInt` or `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::UInt(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// The member `key` of an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// A short name for the kind of node, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Blob(_) => "blob",
        }
    }
}

// A blob is always written to the store when there is one, whatever its size, so that a
// tree read from a blob token writes one back.
impl Encode for NumVec {
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        if ctx.blobs().is_some() {
            token_size(self.dtype())
        } else {
            on_items!(self, items => print::array_size(items, |item| item.json_size(ctx)))
        }
    }

    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        match ctx.blobs() {
            Some(store) => {
                let handle = on_items!(self, items => append_elements(store, items));
                write_token(ctx, handle, self.dtype());
            }
            None => on_items!(self, items => print::write_array(ctx, items, |ctx, item| ctx.emit(item))),
        }
    }
}

fn member_size(key: &str, value: &Value, ctx: &WriteContext<'_>) -> usize {
    print::string_size(key) + 1 + value.json_size(ctx)
}

impl Encode for Value {
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        match self {
            Value::Null => 4,
            Value::Bool(value) => value.json_size(ctx),
            Value::Int(value) => value.json_size(ctx),
            Value::UInt(value) => value.json_size(ctx),
            Value::Float(value) => value.json_size(ctx),
            Value::String(value) => value.json_size(ctx),
            Value::Array(items) => print::array_size(items, |item| item.json_size(ctx)),
            Value::Object(members) => {
                let separators = members.len().saturating_sub(1);
                2 + separators + members.iter().map(|(key, value)| member_size(key, value, ctx)).sum::<usize>()
            }
            Value::Blob(nums) => nums.json_size(ctx),
        }
    }

    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        match self {
            Value::Null => ctx.put(b"null"),
            Value::Bool(value) => value.json_write(ctx),
            Value::Int(value) => value.json_write(ctx),
            Value::UInt(value) => value.json_write(ctx),
            Value::Float(value) => value.json_write(ctx),
            Value::String(value) => value.json_write(ctx),
            Value::Array(items) => print::write_array(ctx, items, |ctx, item| ctx.emit(item)),
            Value::Object(members) => {
                ctx.put_byte(b'{');
                for (i, (key, value)) in members.iter().enumerate() {
                    if i != 0 {
                        ctx.put_byte(b',');
                    }
                    print::write_string(ctx, key);
                    ctx.put_byte(b':');
                    ctx.emit(value);
                }
                ctx.put_byte(b'}');
            }
            Value::Blob(nums) => ctx.emit(nums),
        }
    }
}

fn parse_number(token: &str) -> DecodeResult<Value> {
    let bad = || DecodeError::from(InvalidFormat::BadNumber(token.to_owned()));
    if !token.contains(['.', 'e', 'E']) {
        if let Ok(value) = token.parse::<i64>() {
            return Ok(Value::Int(value));
        }
        if let Ok(value) = token.parse::<u64>() {
            return Ok(Value::UInt(value));
        }
    }
    token.parse::<f64>().map(Value::Float).map_err(|_| bad())
}

// The members of a blob token, if `members` is one.
fn blob_token(members: &[(String, Value)]) -> DecodeResult<Option<(BlobHandle, DType)>> {
    let Some(Value::String(handle)) = members.iter().find(|(key, _)| key == "__blob").map(|(_, v)| v) else {
        return Ok(None);
    };
    let dtype = match members {
        [_, _] => match members.iter().find(|(key, _)| key == "dtype") {
            Some((_, Value::String(dtype))) => DType::from_name(dtype),
            _ => None,
        },
        _ => None,
    };
    match (BlobHandle::parse(handle), dtype) {
        (Some(handle), Some(dtype)) => Ok(Some((handle, dtype))),
        _ => Err(InvalidFormat::BadBlobToken.into()),
    }
}

fn read_value(ctx: &mut ReadContext<'_>) -> DecodeResult<Value> {
    match ctx.peek() {
        Some(b'{') => {
            ctx.enter()?;
            let mut seq = ctx.begin_object()?;
            let mut members = Vec::new();
            while let Some(key) = ctx.next_key(&mut seq)? {
                let value = read_value(ctx)?;
                members.push((key.into_owned(), value));
            }
            ctx.leave();
            match blob_token(&members)? {
                Some((handle, dtype)) => Ok(Value::Blob(ctx.blob(handle, |bytes| NumVec::from_le_bytes(dtype, bytes))??)),
                None => Ok(Value::Object(members)),
            }
        }
        Some(b'[') => {
            ctx.enter()?;
            let mut seq = ctx.begin_array()?;
            let mut items = Vec::new();
            while ctx.next_element(&mut seq)? {
                items.push(read_value(ctx)?);
            }
            ctx.leave();
            Ok(Value::Array(items))
        }
        Some(b'"') => Ok(Value::String(ctx.string()?.into_owned())),
        Some(b'-' | b'0'..=b'9') => parse_number(ctx.number_token()?),
        _ => {
            if ctx.eat_literal("null") {
                Ok(Value::Null)
            } else if ctx.eat_literal("true") {
                Ok(Value::Bool(true))
            } else if ctx.eat_literal("false") {
                Ok(Value::Bool(false))
            } else {
                Err(ctx.unexpected())
            }
        }
    }
}

impl Decode for Value {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        *self = read_value(ctx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        let mut value = Value::Null;
        from_str(text, &mut value).unwrap();
        value
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(parse("12"), Value::Int(12));
        assert_eq!(parse("12.0"), Value::Float(12.0));
        assert_eq!(parse("1e2"), Value::Float(100.0));
        assert_eq!(parse("9223372036854775808"), Value::UInt(1 << 63));
        assert_eq!(parse("18446744073709551615"), Value::UInt(u64::MAX));
        assert_eq!(parse("18446744073709551616"), Value::Float(18446744073709551616.0));
    }

    #[test]
    fn rewrites_text_it_read() {
        let text = r#"{"__type":"Point","x":1.5,"tags":["a",null,true],"n":-3}"#;
        assert_eq!(as_json(&parse(text)).as_str(), text);
    }

    #[test]
    fn blob_tokens_need_a_store() {
        let store = BlobStore::in_memory();
        let mut encoded = EncodedValue::new().with_blobs(store.clone());
        to_json(&mut encoded, &vec![0.5f32; 100]);

        let value: Value = decode(&encoded).unwrap();
        assert_eq!(value, Value::Blob(NumVec::Float32(vec![0.5; 100])));

        let mut orphan = Value::Null;
        assert_eq!(from_str(encoded.as_str(), &mut orphan), Err(DecodeError::MissingBlobStore));
    }

    #[test]
    fn blobs_write_inline_without_a_store() {
        let value = Value::Blob(NumVec::Int16(vec![1, -2]));
        assert_eq!(as_json(&value).as_str(), "[1,-2]");
    }

    #[test]
    fn converts_between_dtypes() {
        let nums = NumVec::from_f64(DType::UInt8, &[-1.0, 2.6, 300.0]);
        assert_eq!(nums, NumVec::UInt8(vec![0, 3, 255]));
        assert_eq!(nums.to_values(), vec![Value::Int(0), Value::Int(3), Value::Int(255)]);
        assert_eq!(NumVec::UInt64(vec![1, u64::MAX]).to_values(), vec![Value::Int(1), Value::UInt(u64::MAX)]);
    }
}
