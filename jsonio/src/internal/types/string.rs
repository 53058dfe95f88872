use crate::prelude::*;

impl Encode for str {
    #[inline]
    fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
        print::string_size(self)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        print::write_string(ctx, self)
    }
}

impl Encode for String {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        self.as_str().json_size(ctx)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        self.as_str().json_write(ctx)
    }
}

impl Decode for String {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        if ctx.no_type_check && ctx.is_number_start() {
            let text = ctx.number_token()?;
            self.clear();
            self.push_str(text);
        } else {
            let text = ctx.string()?;
            self.clear();
            self.push_str(&text);
        }
        Ok(())
    }
}
