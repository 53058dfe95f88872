use crate::prelude::*;

/// A placeholder field that writes `null` and reads past any value at all.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct Ignore;

impl Encode for Ignore {
    fn json_size(&self, _ctx: &WriteContext<'_>) -> usize {
        4
    }
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        ctx.put(b"null")
    }
}

impl Decode for Ignore {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        ctx.skip_value()
    }
}
