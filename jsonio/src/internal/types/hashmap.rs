use crate::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

// Maps are objects keyed by the map's keys. Only string keys are supported, since those
// are the only keys JSON has.

fn object_size<'m, V: Encode + 'm>(entries: impl Iterator<Item = (&'m String, &'m V)>, ctx: &WriteContext<'_>) -> usize {
    let mut size = 2;
    let mut count = 0usize;
    for (key, value) in entries {
        size += print::string_size(key) + 1 + value.json_size(ctx);
        count += 1;
    }
    size + count.saturating_sub(1)
}

fn write_object<'m, V: Encode + 'm>(entries: impl Iterator<Item = (&'m String, &'m V)>, ctx: &mut WriteContext<'_>) {
    ctx.put_byte(b'{');
    for (i, (key, value)) in entries.enumerate() {
        if i != 0 {
            ctx.put_byte(b',');
        }
        print::write_string(ctx, key);
        ctx.put_byte(b':');
        ctx.emit(value);
    }
    ctx.put_byte(b'}');
}

// Members already present keep their value and are decoded into in place. Members the
// text does not mention are removed.
fn read_object<V: Decode + Default>(
    ctx: &mut ReadContext<'_>,
    mut take: impl FnMut(&str) -> Option<V>,
    mut put: impl FnMut(String, V),
) -> DecodeResult<()> {
    ctx.enter()?;
    let mut seq = ctx.begin_object()?;
    while let Some(key) = ctx.next_key(&mut seq)? {
        let mut value = take(&*key).unwrap_or_default();
        value.json_read(ctx)?;
        put(key.into_owned(), value);
    }
    ctx.leave();
    Ok(())
}

impl<V: Encode, S: BuildHasher> Encode for HashMap<String, V, S> {
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        object_size(self.iter(), ctx)
    }
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        // Sorted so that equal maps give equal text
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        write_object(entries.into_iter(), ctx)
    }
}

impl<V: Decode + Default, S: BuildHasher + Default> Decode for HashMap<String, V, S> {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        let mut old = std::mem::take(self);
        read_object(ctx, |key| old.remove(key), |key, value| {
            self.insert(key, value);
        })
    }
}

impl<V: Encode> Encode for BTreeMap<String, V> {
    fn json_size(&self, ctx: &WriteContext<'_>) -> usize {
        object_size(self.iter(), ctx)
    }
    fn json_write(&self, ctx: &mut WriteContext<'_>) {
        write_object(self.iter(), ctx)
    }
}

impl<V: Decode + Default> Decode for BTreeMap<String, V> {
    fn json_read(&mut self, ctx: &mut ReadContext<'_>) -> DecodeResult<()> {
        let mut old = std::mem::take(self);
        read_object(ctx, |key| old.remove(key), |key, value| {
            self.insert(key, value);
        })
    }
}
