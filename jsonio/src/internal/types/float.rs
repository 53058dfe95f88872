use crate::prelude::*;

macro_rules! impl_float {
    ($($T:ty),*) => {
        $(
            impl Encode for $T {
                #[inline]
                fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
                    print::float_size(*self)
                }
                #[inline]
                fn json_write(&self, ctx: &mut WriteContext<'_>) {
                    print::write_float(ctx, *self)
                }
                fn json_size_slice(items: &[Self], ctx: &WriteContext<'_>) -> usize {
                    blob::slice_size(items, ctx)
                }
                fn json_write_slice(items: &[Self], ctx: &mut WriteContext<'_>) {
                    blob::write_slice(items, ctx)
                }
            }

            impl Decode for $T {
                fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                    // NaN is written as null
                    if ctx.eat_literal("null") {
                        *self = <$T>::NAN;
                        return Ok(());
                    }
                    let number = number_text(ctx)?;
                    *self = number.text.parse::<$T>().map_err(|_| number.unparsable())?;
                    Ok(())
                }
                fn json_read_vec(out: &mut Vec<Self>, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                    blob::read_vec(out, ctx)
                }
            }
        )*
    };
}

impl_float!(f32, f64);
