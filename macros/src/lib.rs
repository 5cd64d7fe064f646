use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Field, Fields, GenericParam,
    Generics, Lit, Meta, NestedMeta,
};

/// Derives `rbind_core::binder::FromParams` for a struct with named fields.
///
/// Every field becomes one entry of the generated `FIELDS` table, the field
/// type decides parameter's type and whether it is required
/// (`Option<T>` is optional). Field attributes:
///
/// * `#[param(rename = "name")]` - parameter name, defaults to field's name.
/// * `#[param(default = "value")]` - raw default, used when absent or blank.
/// * `#[param(optional)]` - absence gives field type's empty value.
#[proc_macro_derive(BindParams, attributes(param))]
pub fn bind_params(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = input.ident;

    // Add a bound `T: BindField` to every type parameter T.
    let generics = add_trait_bounds(input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = named_fields(&input.data, name.span())?;

    let mut specs = Vec::with_capacity(fields.len());
    let mut inits = Vec::with_capacity(fields.len());
    for field in fields {
        let (spec, init) = expand_field(field)?;
        specs.push(spec);
        inits.push(init);
    }

    Ok(quote! {
        impl #impl_generics ::rbind_core::binder::FromParams for #name #ty_generics #where_clause {
            const FIELDS: &'static [::rbind_core::field::FieldSpec] = &[#(#specs),*];

            #[allow(unused_mut, unused_variables)]
            fn from_bound(
                mut object: ::rbind_core::binder::BoundObject,
            ) -> ::std::result::Result<Self, ::rbind_core::error::BindingError> {
                ::std::result::Result::Ok(Self {
                    #(#inits,)*
                })
            }
        }
    })
}

// Add a bound `T: BindField` to every type parameter T.
fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param
                .bounds
                .push(parse_quote!(::rbind_core::binder::BindField));
        }
    }
    generics
}

fn named_fields(data: &Data, span: Span) -> syn::Result<Vec<&Field>> {
    match *data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => Ok(fields.named.iter().collect()),
            Fields::Unnamed(_) | Fields::Unit => Err(syn::Error::new(
                span,
                "BindParams can only be derived for structs with named fields",
            )),
        },
        Data::Enum(_) | Data::Union(_) => Err(syn::Error::new(
            span,
            "BindParams can only be derived for structs",
        )),
    }
}

/// Returns field's `FieldSpec` expression and its initializer.
fn expand_field(field: &Field) -> syn::Result<(TokenStream, TokenStream)> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "expected named field"))?;
    let ty = &field.ty;
    let attrs = ParamAttrs::parse(&field.attrs)?;

    let param = attrs
        .rename
        .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());

    let base = quote_spanned!(field.span() =>
        ::rbind_core::field::FieldSpec::new(
            #param,
            <#ty as ::rbind_core::binder::BindField>::KIND,
        )
    );

    let spec = match (attrs.default, attrs.optional) {
        (Some(default), _) => quote!(#base.with_default(#default)),
        (None, true) => quote!(#base.optional()),
        (None, false) => {
            quote!(#base.required(<#ty as ::rbind_core::binder::BindField>::REQUIRED))
        }
    };

    let init = quote_spanned!(field.span() =>
        #ident: <#ty as ::rbind_core::binder::BindField>::from_value(#param, object.take(#param))?
    );

    Ok((spec, init))
}

#[derive(Default)]
struct ParamAttrs {
    rename: Option<String>,
    default: Option<String>,
    optional: bool,
}

impl ParamAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path.is_ident("param")) {
            let list = match attr.parse_meta()? {
                Meta::List(list) => list,
                meta => return Err(syn::Error::new_spanned(meta, "expected #[param(...)]")),
            };

            for nested in list.nested {
                match nested {
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident("optional") => {
                        parsed.optional = true
                    }
                    NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("rename") => {
                        parsed.rename = Some(lit_str(&nv.lit)?)
                    }
                    NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("default") => {
                        parsed.default = Some(lit_str(&nv.lit)?)
                    }
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "unknown param attribute, expected `rename`, `default` or `optional`",
                        ))
                    }
                }
            }
        }
        Ok(parsed)
    }
}

fn lit_str(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected string literal")),
    }
}
