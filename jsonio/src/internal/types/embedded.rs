use crate::prelude::*;
use log::{debug, warn};
use std::sync::Arc;

// An encoded value nested in another is copied into the outer text verbatim, unless its
// blob tokens point into a store the outer value does not use. Then it is re-written
// through a `Value` tree, which puts its payloads in the outer store, or inline if there
// is none.

fn rehomed(value: &EncodedValue, ctx: &WriteContext<'_>) -> Option<Value> {
    let inner = value.blobs()?;
    if ctx.blobs().is_some_and(|outer| std::ptr::eq(outer, Arc::as_ptr(inner))) || !value.as_str().contains("\"__blob\"") {
        return None;
    }
    match decode::<Value>(value) {
        Ok(tree) => Some(tree),
        Err(err) => {
            warn!("embedding a value whose blob tokens do not resolve ({}), copying it as is", err);
            None
        }
    }
}

impl Encode for EncodedValue {
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        match rehomed(self, ctx) {
            Some(tree) => tree.json_size(ctx),
            None => self.len(),
        }
    }
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        match rehomed(self, ctx) {
            Some(tree) => {
                debug!("moving the blobs of an embedded value out of {:?}", self.blobs());
                tree.json_write(ctx)
            }
            None => ctx.put(self.as_str().as_bytes()),
        }
    }
}

impl Decode for EncodedValue {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        let raw = ctx.raw_value()?;
        self.set_text(raw.to_owned());
        self.set_blobs(ctx.blobs().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn embeds_verbatim() {
        let inner = as_json(&vec![Some(1u8), None]);
        let outer = as_json(&(inner.clone(), "x"));
        assert_eq!(outer.as_str(), r#"[[1,null],"x"]"#);

        let mut back = (EncodedValue::new(), String::new());
        from_json(&outer, &mut back).unwrap();
        assert_eq!(back.0, inner);
    }

    #[test]
    fn same_store_is_copied_as_is() {
        let store = BlobStore::in_memory();
        let mut inner = EncodedValue::new().with_blobs(store.clone());
        to_json(&mut inner, &vec![1.0f64; 64]);
        let mut outer = EncodedValue::new().with_blobs(store.clone());
        to_json(&mut outer, &(inner.clone(), 7u8));

        assert_eq!(outer.as_str(), format!("[{},7]", inner));
        assert_eq!(store.len(), 512);
    }

    #[test]
    fn foreign_blobs_move_into_the_outer_store() {
        let mut inner = EncodedValue::new().with_blobs(BlobStore::in_memory());
        to_json(&mut inner, &vec![1.0f64; 64]);

        // Something else already sits at the offset the inner token names.
        let outer_store = BlobStore::in_memory();
        outer_store.append(&[0; 512]);
        let mut outer = EncodedValue::new().with_blobs(outer_store.clone());
        to_json(&mut outer, &(inner.clone(), 7u8));

        assert_eq!(outer_store.len(), 1024);
        assert_eq!(decode::<(Vec<f64>, u8)>(&outer).unwrap(), (vec![1.0; 64], 7));
    }

    #[test]
    fn foreign_blobs_go_inline_without_an_outer_store() {
        let mut inner = EncodedValue::new().with_blobs(BlobStore::in_memory());
        to_json(&mut inner, &vec![2i32; 100]);

        let outer = as_json(&(inner, 7u8));
        assert!(outer.as_str().starts_with("[[2,2,2,"));
        assert_eq!(decode::<(Vec<i32>, u8)>(&outer).unwrap(), (vec![2; 100], 7));
    }
}
