#![allow(non_snake_case)]

use crate::prelude::*;

// https://www.reddit.com/r/rust/comments/339yj3/tuple_indexing_in_a_macro/
macro_rules! expr { ($x:expr) => ($x) } // HACK
macro_rules! tuple_index {
    ($tuple:expr, $idx:tt) => { expr!($tuple.$idx) }
}

// Tuples are JSON arrays of exactly their arity.
macro_rules! impl_tuple {
    ($count:expr, $($ts:ident, $ti:tt,)+) => {
        impl <$($ts: Encode),+> Encode for ($($ts),+) {
            fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
                2 + ($count - 1) $(+ tuple_index!(self, $ti).json_size(ctx))+
            }
            fn json_write(&self, ctx: &mut WriteContext<'_>) {
                ctx.put_byte(b'[');
                $(
                    if $ti != 0 {
                        ctx.put_byte(b',');
                    }
                    ctx.emit(&tuple_index!(self, $ti));
                )+
                ctx.put_byte(b']');
            }
        }

        impl <$($ts: Decode),+> Decode for ($($ts),+) {
            fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
                ctx.enter()?;
                let mut seq = ctx.begin_array()?;
                $(
                    if !ctx.next_element(&mut seq)? {
                        return Err(DecodeError::SchemaMismatch);
                    }
                    tuple_index!(self, $ti).json_read(ctx)?;
                )+
                if ctx.next_element(&mut seq)? {
                    return Err(DecodeError::SchemaMismatch);
                }
                ctx.leave();
                Ok(())
            }
        }
    };
}

impl_tuple!(2, T0, 0, T1, 1,);
impl_tuple!(3, T0, 0, T1, 1, T2, 2,);
impl_tuple!(4, T0, 0, T1, 1, T2, 2, T3, 3,);
impl_tuple!(5, T0, 0, T1, 1, T2, 2, T3, 3, T4, 4,);
impl_tuple!(6, T0, 0, T1, 1, T2, 2, T3, 3, T4, 4, T5, 5,);

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn arity_is_checked() {
        let mut pair = (0u8, String::new());
        from_str("[4, \"four\"]", &mut pair).unwrap();
        assert_eq!(pair, (4, "four".to_owned()));
        assert_eq!(from_str("[4]", &mut pair), Err(DecodeError::SchemaMismatch));
        assert_eq!(from_str("[4, \"four\", 4]", &mut pair), Err(DecodeError::SchemaMismatch));
    }
}
