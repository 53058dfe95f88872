use crate::prelude::*;

/// A type that can be written as JSON in two passes.
///
/// `json_size` must return exactly the number of bytes `json_write` will emit for the same
/// value and context, blob tokens included, and must not touch the blob store. Composite
/// types implement both by visiting their constituents in the same fixed order, writing
/// each through [`WriteContext::emit`].
pub trait Encode {
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize;
    fn json_write(&self, ctx: &mut WriteContext<'_>);

    // Sequences of Self are written through these, so that element types with a better
    // representation for a whole run of values (numeric arrays going to the blob store)
    // can provide it without specialization.
    #[doc(hidden)]
    fn json_size_slice(items: &[Self], ctx: &WriteContext<'_>) -> usize
    where
        Self: Sized,
    {
        print::array_size(items, |item| item.json_size(ctx))
    }

    #[doc(hidden)]
    fn json_write_slice(items: &[Self], ctx: &mut WriteContext<'_>)
    where
        Self: Sized,
    {
        print::write_array(ctx, items, |ctx, item| ctx.emit(item))
    }
}

/// A type that can be read from JSON, in place.
///
/// `json_read` consumes exactly one value from the context. Parts of `self` that the text
/// does not mention keep their current value. A value of the wrong shape is an `Err`,
/// never a panic.
pub trait Decode {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()>;

    #[doc(hidden)]
    fn json_read_vec(out: &mut Vec<Self>, ctx: &mut ReadContext<'_>) -> DecodeResult<()>
    where
        Self: Sized + Default,
    {
        read_array_in_place(out, ctx)
    }
}

/// Reads a JSON array into `out`, re-using existing elements in place and growing or
/// truncating to the length of the array.
pub fn read_array_in_place<T: Decode + Default>(out: &mut Vec<T>, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
    ctx.enter()?;
    let mut seq = ctx.begin_array()?;
    let mut len = 0;
    while ctx.next_element(&mut seq)? {
        if len == out.len() {
            out.push(T::default());
        }
        out[len].json_read(ctx)?;
        len += 1;
    }
    out.truncate(len);
    ctx.leave();
    Ok(())
}
