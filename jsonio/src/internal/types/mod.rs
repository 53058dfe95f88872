use crate::prelude::*;
use std::borrow::Cow;

pub mod array;
pub mod array_fixed;
pub mod blob;
pub mod boolean;
pub mod embedded;
pub mod float;
pub mod hashmap;
pub mod ignore;
pub mod integer;
pub mod nullable;
pub mod string;
pub mod tuple;
pub mod value;

pub use {blob::*, ignore::*, value::*};

/// The text of the next number. Under `no_type_check` a number may also arrive as a JSON
/// string, in which case `quoted` is set.
pub(crate) struct NumberText<'a> {
    pub text: Cow<'a, str>,
    pub quoted: bool,
}

pub(crate) fn number_text<'a>(ctx: &mut ReadContext<'a>) -> DecodeResult<NumberText<'a>> {
    if ctx.no_type_check && ctx.peek() == Some(b'"') {
        let text = ctx.string()?;
        return Ok(NumberText { text, quoted: true });
    }
    Ok(NumberText {
        text: Cow::Borrowed(ctx.number_token()?),
        quoted: false,
    })
}

impl NumberText<'_> {
    /// The error for text that did not parse as the requested type. A quoted string is
    /// simply the wrong kind of value; a bare token is broken JSON.
    pub(crate) fn unparsable(&self) -> DecodeError {
        if self.quoted {
            DecodeError::SchemaMismatch
        } else {
            InvalidFormat::BadNumber(self.text.to_string()).into()
        }
    }
}
