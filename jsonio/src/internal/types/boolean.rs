use crate::prelude::*;

impl Encode for bool {
    #[inline]
    fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
        if *self {
            4
        } else {
            5
        }
    }

    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        ctx.put(if *self { b"true" } else { b"false" })
    }
}

impl Decode for bool {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        if ctx.eat_literal("true") {
            *self = true;
        } else if ctx.eat_literal("false") {
            *self = false;
        } else if ctx.no_type_check && ctx.is_number_start() {
            *self = match ctx.number_token()? {
                "0" => false,
                "1" => true,
                _ => return Err(DecodeError::SchemaMismatch),
            };
        } else {
            return Err(ctx.mismatch());
        }
        Ok(())
    }
}
