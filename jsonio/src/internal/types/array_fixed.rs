use crate::prelude::*;

impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        T::json_size_slice(self, ctx)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        T::json_write_slice(self, ctx)
    }
}

// Read through a Vec so numeric elements can come from the blob store, then require the
// exact length.
impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        let mut items: Vec<T> = Vec::with_capacity(N);
        T::json_read_vec(&mut items, ctx)?;
        if items.len() != N {
            return Err(DecodeError::SchemaMismatch);
        }
        for (slot, item) in self.iter_mut().zip(items) {
            *slot = item;
        }
        Ok(())
    }
}
