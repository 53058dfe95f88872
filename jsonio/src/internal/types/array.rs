use crate::prelude::*;

impl<T: Encode> Encode for [T] {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        T::json_size_slice(self, ctx)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        T::json_write_slice(self, ctx)
    }
}

impl<T: Encode> Encode for Vec<T> {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        T::json_size_slice(self, ctx)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        T::json_write_slice(self, ctx)
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        T::json_read_vec(self, ctx)
    }
}
