use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{
    parse_macro_input, Expr, Fields, GenericArgument, Ident, ItemStruct, LitStr, PathArguments,
    Token, Type,
};

// ============================================================================
// #[resource] attribute macro
// ============================================================================

/// Attribute macro that turns a field-annotated schema struct into a typed
/// resource definition.
///
/// The struct body is a declaration, not storage: the macro replaces it with
/// a wrapper around the dynamic `Resource` handle and generates accessors
/// backed by the dirty-tracked attribute/relationship stores, plus a `Model`
/// implementation.
///
/// # Usage
///
/// ```ignore
/// use jsonapi_mapper::resource;
///
/// #[resource(resource_type = "books", endpoint = "Books")]
/// pub struct Book {
///     #[attr] title: String,               // strict: panics when missing
///     #[attr] published: Option<String>,   // nullable: None when missing
///     #[attr(default)] stock: i64,         // falls back to Default::default()
///     #[attr(default = 5)] rating: i64,    // falls back to the expression
///     #[attr(name = "page_count")] pages: i64,
///     #[has_one] publisher: Option<Publisher>,
///     #[has_many] reviews: Vec<Review>,
/// }
/// ```
///
/// `resource_type` and `endpoint` are optional; a missing type string is
/// derived from the struct name (snake-cased, pluralized), and a missing
/// endpoint falls back to the type string.
#[proc_macro_attribute]
pub fn resource(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ResourceArgs);
    let input = parse_macro_input!(item as ItemStruct);

    match expand(args, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct ResourceArgs {
    resource_type: Option<LitStr>,
    endpoint: Option<LitStr>,
}

impl Parse for ResourceArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ResourceArgs {
            resource_type: None,
            endpoint: None,
        };
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            match key.to_string().as_str() {
                "resource_type" => args.resource_type = Some(value),
                "endpoint" => args.endpoint = Some(value),
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown `resource` argument `{}`", other),
                    ))
                }
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(args)
    }
}

enum FieldKind {
    Attr { default: Option<Option<Expr>> },
    HasOne,
    HasMany,
}

struct FieldSpec {
    kind: FieldKind,
    ident: Ident,
    ty: Type,
    key: String,
}

fn expand(args: ResourceArgs, input: ItemStruct) -> syn::Result<TokenStream2> {
    let ident = input.ident.clone();
    let vis = input.vis.clone();
    let attrs = &input.attrs;

    let Fields::Named(fields) = &input.fields else {
        return Err(syn::Error::new_spanned(
            &input,
            "#[resource] requires a struct with named fields",
        ));
    };

    let mut specs = Vec::new();
    for field in &fields.named {
        specs.push(parse_field(field)?);
    }

    let resource_type_body = match &args.resource_type {
        Some(lit) => quote! { ::std::string::String::from(#lit) },
        None => {
            let derived = snake_case(&ident.to_string());
            quote! { ::jsonapi_mapper::inflect::pluralize(#derived) }
        }
    };
    let endpoint_body = match &args.endpoint {
        Some(lit) => quote! { ::std::option::Option::Some(::std::string::String::from(#lit)) },
        None => quote! { ::std::option::Option::None },
    };

    let accessors: Vec<TokenStream2> = specs.iter().map(accessor_methods).collect::<syn::Result<_>>()?;

    Ok(quote! {
        #(#attrs)*
        #vis struct #ident {
            record: ::jsonapi_mapper::Resource,
        }

        impl #ident {
            #vis fn new() -> Self {
                <Self as ::jsonapi_mapper::Model>::create()
            }

            /// The underlying dynamic record.
            #vis fn record(&self) -> &::jsonapi_mapper::Resource {
                &self.record
            }

            #(#accessors)*
        }

        impl ::jsonapi_mapper::Model for #ident {
            fn resource_type() -> ::std::string::String {
                #resource_type_body
            }

            fn endpoint() -> ::std::option::Option<::std::string::String> {
                #endpoint_body
            }

            fn from_record(record: ::jsonapi_mapper::Resource) -> Self {
                Self { record }
            }

            fn record(&self) -> &::jsonapi_mapper::Resource {
                &self.record
            }
        }

        impl ::std::clone::Clone for #ident {
            fn clone(&self) -> Self {
                Self {
                    record: self.record.clone(),
                }
            }
        }

        impl ::std::fmt::Debug for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&self.record, f)
            }
        }
    })
}

fn parse_field(field: &syn::Field) -> syn::Result<FieldSpec> {
    let ident = field
        .ident
        .clone()
        .expect("named fields checked by caller");
    let mut kind = None;
    let mut key = ident.to_string();

    for attribute in &field.attrs {
        let path = attribute.path();
        let is_attr = path.is_ident("attr");
        let is_has_one = path.is_ident("has_one");
        let is_has_many = path.is_ident("has_many");
        if !(is_attr || is_has_one || is_has_many) {
            continue;
        }
        if kind.is_some() {
            return Err(syn::Error::new_spanned(
                attribute,
                "field has more than one resource marker",
            ));
        }

        let mut default: Option<Option<Expr>> = None;
        if matches!(attribute.meta, syn::Meta::List(_)) {
            attribute.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let lit: LitStr = value.parse()?;
                    key = lit.value();
                    Ok(())
                } else if is_attr && meta.path.is_ident("default") {
                    if meta.input.peek(Token![=]) {
                        let value = meta.value()?;
                        default = Some(Some(value.parse()?));
                    } else {
                        default = Some(None);
                    }
                    Ok(())
                } else {
                    Err(meta.error("unknown marker argument"))
                }
            })?;
        }

        kind = Some(if is_attr {
            FieldKind::Attr { default }
        } else if is_has_one {
            FieldKind::HasOne
        } else {
            FieldKind::HasMany
        });
    }

    let Some(kind) = kind else {
        return Err(syn::Error::new_spanned(
            field,
            "field needs #[attr], #[has_one], or #[has_many]",
        ));
    };

    Ok(FieldSpec {
        kind,
        ident,
        ty: field.ty.clone(),
        key,
    })
}

fn accessor_methods(spec: &FieldSpec) -> syn::Result<TokenStream2> {
    let getter = &spec.ident;
    let setter = format_ident!("set_{}", spec.ident);
    let key = &spec.key;

    match &spec.kind {
        FieldKind::Attr { default } => {
            if let Some(inner) = generic_inner(&spec.ty, "Option") {
                if default.is_some() {
                    return Err(syn::Error::new_spanned(
                        &spec.ty,
                        "`default` does not combine with an Option attribute",
                    ));
                }
                return Ok(quote! {
                    pub fn #getter(&self) -> ::std::option::Option<#inner> {
                        self.record.attr_as::<#inner>(#key)
                    }

                    pub fn #setter(&self, value: ::std::option::Option<#inner>) {
                        self.record.set_attr_from(#key, &value);
                    }
                });
            }

            let ty = &spec.ty;
            let fallback = match default {
                Some(Some(expr)) => quote! { .unwrap_or_else(|| #expr) },
                Some(None) => quote! { .unwrap_or_default() },
                None => quote! {
                    .unwrap_or_else(|| ::std::panic!(
                        "missing attribute `{}` on `{}`",
                        #key,
                        <Self as ::jsonapi_mapper::Model>::resource_type()
                    ))
                },
            };
            Ok(quote! {
                pub fn #getter(&self) -> #ty {
                    self.record.attr_as::<#ty>(#key) #fallback
                }

                pub fn #setter(&self, value: #ty) {
                    self.record.set_attr_from(#key, &value);
                }
            })
        }
        FieldKind::HasOne => {
            if let Some(inner) = generic_inner(&spec.ty, "Option") {
                return Ok(quote! {
                    pub fn #getter(&self) -> ::std::option::Option<#inner> {
                        self.record
                            .related_one(#key)
                            .map(<#inner as ::jsonapi_mapper::Model>::from_record)
                    }

                    pub fn #setter(&self, value: ::std::option::Option<&#inner>) {
                        self.record.set_related_one(
                            #key,
                            value.map(|v| ::jsonapi_mapper::Model::record(v).clone()),
                        );
                    }
                });
            }

            let ty = &spec.ty;
            Ok(quote! {
                pub fn #getter(&self) -> #ty {
                    match self.record.related_one(#key) {
                        ::std::option::Option::Some(record) => {
                            <#ty as ::jsonapi_mapper::Model>::from_record(record)
                        }
                        ::std::option::Option::None => ::std::panic!(
                            "missing relationship `{}` on `{}`",
                            #key,
                            <Self as ::jsonapi_mapper::Model>::resource_type()
                        ),
                    }
                }

                pub fn #setter(&self, value: &#ty) {
                    self.record.set_related_one(
                        #key,
                        ::std::option::Option::Some(::jsonapi_mapper::Model::record(value).clone()),
                    );
                }
            })
        }
        FieldKind::HasMany => {
            let Some(inner) = generic_inner(&spec.ty, "Vec") else {
                return Err(syn::Error::new_spanned(
                    &spec.ty,
                    "#[has_many] fields must be Vec<Model>",
                ));
            };
            Ok(quote! {
                pub fn #getter(&self) -> ::std::vec::Vec<#inner> {
                    self.record
                        .related_many(#key)
                        .into_iter()
                        .map(<#inner as ::jsonapi_mapper::Model>::from_record)
                        .collect()
                }

                pub fn #setter(&self, values: &[#inner]) {
                    self.record.set_related_many(
                        #key,
                        values
                            .iter()
                            .map(|v| ::jsonapi_mapper::Model::record(v).clone())
                            .collect(),
                    );
                }
            })
        }
    }
}

/// `Option<T>` / `Vec<T>` → `T`.
fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    arguments.args.iter().find_map(|argument| match argument {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn snake_case(name: &str) -> String {
    let mut out = String::new();
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
