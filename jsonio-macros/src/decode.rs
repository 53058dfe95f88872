use {
    crate::utils::{get_named_fields, ident_str, with_bounds, NamedField},
    proc_macro2::TokenStream,
    syn::{Data, DataEnum, DataStruct, DeriveInput, Fields, FieldsUnnamed},
};

pub fn impl_decode_macro(ast: &DeriveInput) -> TokenStream {
    match &ast.data {
        Data::Struct(data_struct) => impl_struct_decode(ast, data_struct),
        Data::Enum(data_enum) => impl_enum_decode(ast, data_enum),
        Data::Union(_) => panic!("Unions are not supported by jsonio"),
    }
}

// Members may come in any order. Unknown members are skipped and fields without a member
// keep their value.
fn impl_struct_decode(ast: &DeriveInput, data_struct: &DataStruct) -> TokenStream {
    let fields = get_named_fields(data_struct);
    let type_name = ident_str(&ast.ident);

    let reads = fields.iter().map(|NamedField { ident, canon_str, .. }| {
        quote! {
            #canon_str => ::jsonio::internal::Decode::json_read(&mut self.#ident, ctx)?,
        }
    });

    let json_read = quote! {
        ctx.enter()?;
        let mut seq = ctx.begin_object()?;
        while let Some(key) = ctx.next_key(&mut seq)? {
            match &*key {
                "__type" => ctx.check_type_tag(#type_name)?,
                #(#reads)*
                _ => ctx.skip_value()?,
            }
        }
        ctx.leave();
        Ok(())
    };

    fill_decode_skeleton(ast, json_read)
}

fn fill_decode_skeleton(ast: &DeriveInput, json_read: TokenStream) -> TokenStream {
    let name = &ast.ident;
    let generics = with_bounds(
        &ast.generics,
        &[quote! { ::jsonio::internal::Decode }, quote! { ::core::default::Default }],
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::jsonio::internal::Decode for #name #ty_generics #where_clause {
            fn json_read(&mut self, ctx: &mut ::jsonio::internal::ReadContext<'_>) -> ::jsonio::internal::DecodeResult<()> {
                #json_read
            }
        }
    }
}

// A variant that matches the one already held is decoded in place. Otherwise the inner
// value starts from its default.
fn impl_enum_decode(ast: &DeriveInput, data_enum: &DataEnum) -> TokenStream {
    let ident = &ast.ident;
    let mut unit_matches = Vec::new();
    let mut newtype_matches = Vec::new();

    for variant in data_enum.variants.iter() {
        let variant_ident = &variant.ident;
        let tag = ident_str(variant_ident);

        match &variant.fields {
            Fields::Unit => {
                unit_matches.push(quote! {
                    #tag => #ident::#variant_ident
                });
            }
            Fields::Unnamed(FieldsUnnamed { unnamed, .. }) if unnamed.len() == 1 => {
                newtype_matches.push(quote! {
                    #tag => {
                        if !matches!(self, #ident::#variant_ident(_)) {
                            *self = #ident::#variant_ident(::core::default::Default::default());
                        }
                        if let #ident::#variant_ident(_0) = self {
                            ::jsonio::internal::Decode::json_read(_0, ctx)?;
                        }
                    }
                });
            }
            _ => panic!("Enum variants with named or multiple fields are not supported by jsonio"),
        }
    }

    let from_string = if unit_matches.is_empty() {
        quote! {}
    } else {
        quote! {
            if ctx.peek() == Some(b'"') {
                let tag = ctx.string()?;
                *self = match &*tag {
                    #(#unit_matches,)*
                    _ => return Err(::jsonio::internal::DecodeError::SchemaMismatch),
                };
                return Ok(());
            }
        }
    };

    let from_object = if newtype_matches.is_empty() {
        quote! {
            Err(::jsonio::internal::DecodeError::SchemaMismatch)
        }
    } else {
        quote! {
            ctx.enter()?;
            let mut seq = ctx.begin_object()?;
            let tag = match ctx.next_key(&mut seq)? {
                Some(tag) => tag,
                None => return Err(::jsonio::internal::DecodeError::SchemaMismatch),
            };
            match &*tag {
                #(#newtype_matches)*
                _ => return Err(::jsonio::internal::DecodeError::SchemaMismatch),
            }
            if ctx.next_key(&mut seq)?.is_some() {
                return Err(::jsonio::internal::DecodeError::SchemaMismatch);
            }
            ctx.leave();
            Ok(())
        }
    };

    let json_read = quote! {
        #from_string
        #from_object
    };

    fill_decode_skeleton(ast, json_read)
}
