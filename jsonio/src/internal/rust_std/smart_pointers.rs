use crate::prelude::*;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

// Pointers are transparent in the text.

impl<T: Encode + ?Sized> Encode for Box<T> {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        self.deref().json_size(ctx)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        self.deref().json_write(ctx)
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    #[inline]
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        (**self).json_read(ctx)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        (**self).json_size(ctx)
    }
    #[inline]
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        (**self).json_write(ctx)
    }
}

macro_rules! impl_shared {
    ($($P:ident),*) => {
        $(
            impl<T: Encode + ?Sized> Encode for $P<T> {
                #[inline]
                fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
                    self.deref().json_size(ctx)
                }
                #[inline]
                fn json_write(&self, ctx: &mut WriteContext<'_>) {
                    self.deref().json_write(ctx)
                }
            }

            // Shared values are copied on write, so other holders never see a
            // half-decoded value.
            impl<T: Decode + Clone> Decode for $P<T> {
                fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                    $P::make_mut(self).json_read(ctx)
                }
            }
        )*
    };
}

impl_shared!(Rc, Arc);

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;

    #[test]
    fn shared_values_copy_on_decode() {
        let mut a = Arc::new(vec![1i64, 2]);
        let b = Arc::clone(&a);
        from_str("[3]", &mut a).unwrap();
        assert_eq!(*a, vec![3]);
        assert_eq!(*b, vec![1, 2]);
    }

    #[test]
    fn boxes_are_transparent() {
        let value: Box<Option<bool>> = Box::new(Some(true));
        assert_eq!(as_json(&value).as_str(), "true");
    }
}
