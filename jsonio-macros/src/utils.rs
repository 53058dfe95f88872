use {
    inflector::cases::camelcase::to_camel_case,
    proc_macro2::{Ident, TokenStream},
    syn::{parse_quote, DataStruct, Fields, Generics, GenericParam},
};

// Raw identifiers lose their `r#`, so `r#type` is written as `type`.
pub fn ident_str(ident: &Ident) -> String {
    let ident_str = format!("{}", ident);
    ident_str.strip_prefix("r#").map(str::to_owned).unwrap_or(ident_str)
}

/// The object key a field is written under.
pub fn canonical_ident(ident: &Ident) -> String {
    to_camel_case(&ident_str(ident))
}

/// `s` as a JSON string literal. Rust identifiers never need escaping.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s)
}

pub struct NamedField<'a> {
    pub ident: &'a Ident,
    pub canon_str: String,
}
pub type NamedFields<'a> = Vec<NamedField<'a>>;

pub fn get_named_fields(data_struct: &DataStruct) -> NamedFields {
    let fields_named = match &data_struct.fields {
        Fields::Named(fields_named) => fields_named,
        Fields::Unit => return Vec::new(),
        Fields::Unnamed(_) => panic!("Tuple structs are not supported by jsonio"),
    };

    fields_named
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            Some(NamedField {
                ident,
                canon_str: canonical_ident(ident),
            })
        })
        .collect()
}

/// Adds `bounds` to every type parameter.
pub fn with_bounds(generics: &Generics, bounds: &[TokenStream]) -> Generics {
    let mut generics = generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(type_param) = param {
            for bound in bounds {
                type_param.bounds.push(parse_quote!(#bound));
            }
        }
    }
    generics
}
