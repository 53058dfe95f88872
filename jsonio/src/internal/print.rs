//! Printing of JSON literals, in pairs: the size of a literal and the writer of it.
//! Every `*_size` here must agree with its writer byte for byte.

use crate::prelude::*;
use std::fmt::{self, Display, Write as _};

struct Counter(usize);

impl fmt::Write for Counter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

#[inline]
pub fn display_size(value: impl Display) -> usize {
    let mut counter = Counter(0);
    // Writing to a Counter never fails
    let _ = write!(counter, "{}", value);
    counter.0
}

#[inline]
pub fn write_display(ctx: &mut WriteContext<'_>, value: impl Display) {
    // Writing to a WriteBuffer only fails by panicking on overrun
    let _ = write!(ctx.out(), "{}", value);
}

// NaN has no JSON spelling, so it is written as null. Infinities are written as numbers
// that overflow to infinity when read back.
fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("null")
    } else if value == f64::INFINITY {
        Some("1e999")
    } else if value == f64::NEG_INFINITY {
        Some("-1e999")
    } else {
        None
    }
}

// `Debug` for floats is the shortest representation that reads back to the same value,
// switching to exponent form for very large and very small magnitudes.
pub fn float_size<F: fmt::Debug + Into<f64> + Copy>(value: F) -> usize {
    match non_finite(value.into()) {
        Some(s) => s.len(),
        None => {
            let mut counter = Counter(0);
            let _ = write!(counter, "{:?}", value);
            counter.0
        }
    }
}

pub fn write_float<F: fmt::Debug + Into<f64> + Copy>(ctx: &mut WriteContext<'_>, value: F) {
    match non_finite(value.into()) {
        Some(s) => ctx.put(s.as_bytes()),
        None => {
            let _ = write!(ctx.out(), "{:?}", value);
        }
    }
}

#[inline]
fn escape(byte: u8) -> Option<&'static [u8]> {
    match byte {
        b'"' => Some(b"\\\""),
        b'\\' => Some(b"\\\\"),
        b'\n' => Some(b"\\n"),
        b'\r' => Some(b"\\r"),
        b'\t' => Some(b"\\t"),
        0x08 => Some(b"\\b"),
        0x0c => Some(b"\\f"),
        _ => None,
    }
}

/// Size of `s` as a quoted JSON string.
pub fn string_size(s: &str) -> usize {
    let mut size = 2;
    for &byte in s.as_bytes() {
        size += match escape(byte) {
            Some(escaped) => escaped.len(),
            None if byte < 0x20 => 6,
            None => 1,
        };
    }
    size
}

pub fn write_string(ctx: &mut WriteContext<'_>, s: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    ctx.put_byte(b'"');
    let bytes = s.as_bytes();
    let mut plain_from = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let escaped = escape(byte);
        if escaped.is_none() && byte >= 0x20 {
            continue;
        }
        ctx.put(&bytes[plain_from..i]);
        plain_from = i + 1;
        match escaped {
            Some(escaped) => ctx.put(escaped),
            None => ctx.put(&[b'\\', b'u', b'0', b'0', HEX[(byte >> 4) as usize], HEX[(byte & 0xf) as usize]]),
        }
    }
    ctx.put(&bytes[plain_from..]);
    ctx.put_byte(b'"');
}

/// Size of a JSON array holding `items`, each sized by `size`.
pub fn array_size<T>(items: &[T], mut size: impl FnMut(&T) -> usize) -> usize {
    let separators = items.len().saturating_sub(1);
    2 + separators + items.iter().map(|item| size(item)).sum::<usize>()
}

pub fn write_array<T>(ctx: &mut WriteContext<'_>, items: &[T], mut write: impl FnMut(&mut WriteContext<'_>, &T)) {
    ctx.put_byte(b'[');
    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            ctx.put_byte(b',');
        }
        write(ctx, item);
    }
    ctx.put_byte(b']');
}
