use crate::prelude::*;
use num_traits::NumCast;
use std::str::FromStr;

fn parse_integer<T: FromStr + NumCast>(number: &NumberText<'_>, lenient: bool) -> DecodeResult<T> {
    if let Ok(value) = number.text.parse::<T>() {
        return Ok(value);
    }
    // Either out of range, fractional, or written in float syntax.
    match number.text.parse::<f64>() {
        Ok(float) if lenient && float.fract() == 0.0 => <T as NumCast>::from(float).ok_or(DecodeError::SchemaMismatch),
        Ok(_) => Err(DecodeError::SchemaMismatch),
        Err(_) => Err(number.unparsable()),
    }
}

macro_rules! impl_integer {
    ($($T:ty),* ; blob: $($B:ty),*) => {
        $(
            impl Encode for $T {
                #[inline]
                fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
                    print::display_size(*self)
                }
                #[inline]
                fn json_write(&self, ctx: &mut WriteContext<'_>) {
                    print::write_display(ctx, *self)
                }
            }

            impl Decode for $T {
                fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                    let number = number_text(ctx)?;
                    *self = parse_integer(&number, ctx.no_type_check)?;
                    Ok(())
                }
            }
        )*
        $(
            impl Encode for $B {
                #[inline]
                fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
                    print::display_size(*self)
                }
                #[inline]
                fn json_write(&self, ctx: &mut WriteContext<'_>) {
                    print::write_display(ctx, *self)
                }
                fn json_size_slice(items: &[Self], ctx: &WriteContext<'_>) -> usize {
                    blob::slice_size(items, ctx)
                }
                fn json_write_slice(items: &[Self], ctx: &mut WriteContext<'_>) {
                    blob::write_slice(items, ctx)
                }
            }

            impl Decode for $B {
                fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                    let number = number_text(ctx)?;
                    *self = parse_integer(&number, ctx.no_type_check)?;
                    Ok(())
                }
                fn json_read_vec(out: &mut Vec<Self>, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                    blob::read_vec(out, ctx)
                }
            }
        )*
    };
}

impl_integer!(usize, isize; blob: u8, u16, u32, u64, i8, i16, i32, i64);
