use crate::prelude::*;

// `None` is `null` and `Some(v)` is just `v`, so the two only stay apart when `v` is never
// written as `null` itself. `Some(None)`, `Some(())` and `Some(f64::NAN)` all read back as
// `None`.

impl<T: Encode> Encode for Option<T> {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        match self {
            Some(value) => value.json_size(ctx),
            None => 4,
        }
    }
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        match self {
            Some(value) => ctx.emit(value),
            None => ctx.put(b"null"),
        }
    }
}

impl<T: Decode + Default> Decode for Option<T> {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        if ctx.eat_literal("null") {
            *self = None;
            Ok(())
        } else {
            self.get_or_insert_with(T::default).json_read(ctx)
        }
    }
}

impl Encode for () {
    fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
        4
    }
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        ctx.put(b"null")
    }
}

impl Decode for () {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        if ctx.eat_literal("null") {
            Ok(())
        } else {
            Err(ctx.mismatch())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn nested_nulls_collapse() {
        let nested: Option<Option<u8>> = Some(None);
        assert_eq!(as_json(&nested).as_str(), "null");
        assert_eq!(decode::<Option<Option<u8>>>(&as_json(&nested)), Ok(None));
        assert_eq!(decode::<Option<()>>(&as_json(&Some(()))), Ok(None));
        assert_eq!(decode::<Option<f64>>(&as_json(&Some(f64::NAN))), Ok(None));

        // Anything that is not null keeps its `Some`.
        assert_eq!(decode::<Option<Option<u8>>>(&as_json(&Some(Some(0u8)))), Ok(Some(Some(0))));
    }
}
