use {
    crate::utils::{get_named_fields, ident_str, quoted, with_bounds, NamedField},
    proc_macro2::TokenStream,
    syn::{Data, DataEnum, DataStruct, DeriveInput, Fields, FieldsUnnamed},
};

pub fn impl_encode_macro(ast: &DeriveInput) -> TokenStream {
    match &ast.data {
        Data::Struct(data_struct) => impl_struct_encode(ast, data_struct),
        Data::Enum(data_enum) => impl_enum_encode(ast, data_enum),
        Data::Union(_) => panic!("Unions are not supported by jsonio"),
    }
}

// {"__type":"Name","fieldOne":...,"fieldTwo":...}
//
// Everything but the field values is known here, so it is emitted as literals and their
// total length is a constant of the sizing pass.
fn impl_struct_encode(ast: &DeriveInput, data_struct: &DataStruct) -> TokenStream {
    let fields = get_named_fields(data_struct);
    let head = format!("{{\"__type\":{}", quoted(&ident_str(&ast.ident)));
    let mut fixed_len = head.len() + 1;

    let keys: Vec<String> = fields
        .iter()
        .map(|NamedField { canon_str, .. }| format!(",{}:", quoted(canon_str)))
        .collect();
    fixed_len += keys.iter().map(String::len).sum::<usize>();

    let sizes = fields.iter().map(|NamedField { ident, .. }| {
        quote! {
            + ::jsonio::internal::Encode::json_size(&self.#ident, ctx)
        }
    });

    let writers = fields.iter().zip(keys.iter()).map(|(NamedField { ident, .. }, key)| {
        quote! {
            ctx.put(#key.as_bytes());
            ctx.emit(&self.#ident);
        }
    });

    let json_size = quote! {
        #fixed_len #(#sizes)*
    };
    let json_write = quote! {
        ctx.put(#head.as_bytes());
        #(#writers)*
        ctx.put_byte(b'}');
    };

    fill_encode_skeleton(ast, json_size, json_write)
}

fn fill_encode_skeleton(ast: &DeriveInput, json_size: TokenStream, json_write: TokenStream) -> TokenStream {
    let name = &ast.ident;
    let generics = with_bounds(&ast.generics, &[quote! { ::jsonio::internal::Encode }]);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::jsonio::internal::Encode for #name #ty_generics #where_clause {
            fn json_size(&self, ctx: &::jsonio::internal::WriteContext<'_>) -> usize {
                #json_size
            }
            fn json_write(&self, ctx: &mut ::jsonio::internal::WriteContext<'_>) {
                #json_write
            }
        }
    }
}

// Unit variants are strings, "Variant". Single-field tuple variants are objects with one
// member, {"Variant":inner}.
fn impl_enum_encode(ast: &DeriveInput, data_enum: &DataEnum) -> TokenStream {
    let ident = &ast.ident;
    let mut size_matches = Vec::new();
    let mut write_matches = Vec::new();

    for variant in data_enum.variants.iter() {
        let variant_ident = &variant.ident;
        let tag = quoted(&ident_str(variant_ident));

        match &variant.fields {
            Fields::Unit => {
                let len = tag.len();
                size_matches.push(quote! {
                    #ident::#variant_ident => #len
                });
                write_matches.push(quote! {
                    #ident::#variant_ident => ctx.put(#tag.as_bytes())
                });
            }
            Fields::Unnamed(FieldsUnnamed { unnamed, .. }) if unnamed.len() == 1 => {
                let head = format!("{{{}:", tag);
                let len = head.len() + 1;
                size_matches.push(quote! {
                    #ident::#variant_ident(_0) => #len + ::jsonio::internal::Encode::json_size(_0, ctx)
                });
                write_matches.push(quote! {
                    #ident::#variant_ident(_0) => {
                        ctx.put(#head.as_bytes());
                        ctx.emit(_0);
                        ctx.put_byte(b'}');
                    }
                });
            }
            _ => panic!("Enum variants with named or multiple fields are not supported by jsonio"),
        }
    }

    let json_size = quote! {
        match self {
            #(#size_matches,)*
        }
    };
    let json_write = quote! {
        match self {
            #(#write_matches,)*
        }
    };

    fill_encode_skeleton(ast, json_size, json_write)
}
