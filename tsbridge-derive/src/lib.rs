//! # tsbridge Derive
//!
//! Procedural macro implementing `tsbridge_core::Describe`.
//!
//! The derive inspects the type at compile time and honors both
//! `#[ts(...)]` and `#[serde(...)]` attributes, so a type already shaped
//! for JSON serialization describes itself without extra annotations.

use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    Attribute, Data, DataEnum, DeriveInput, Expr, Fields, FieldsNamed, LitStr, parse_macro_input,
};

/// Derives `Describe` for a struct with named fields or a fieldless enum.
///
/// # Example
/// ```ignore
/// #[derive(Describe)]
/// #[serde(rename_all = "camelCase")]
/// struct Person {
///     #[serde(flatten)]
///     base: HasName,
///     pet_name: String,
///     #[ts(skip)]
///     secret: String,
/// }
///
/// #[derive(Describe)]
/// enum Status {
///     #[ts(rename = "active")]
///     Active = 1,
///     Blocked = 2,
/// }
/// ```
///
/// Field attributes: `rename = ".."`, `skip`, `skip_serializing`,
/// `flatten`. Container attributes: `rename = ".."`, `rename_all = ".."`,
/// and `#[ts(crate = "..")]` to name the path of the core crate when it is
/// re-exported somewhere the derive cannot find on its own.
#[proc_macro_derive(Describe, attributes(ts, serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Describe cannot be derived for generic types",
        ));
    }

    let container = Options::from_attrs(&input.attrs)?;
    let core = core_path(container.krate.as_ref());
    let ident = &input.ident;
    let name = container
        .rename
        .clone()
        .unwrap_or_else(|| ident.to_string());

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_struct(&core, &name, fields, &container)?,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "Describe requires a struct with named fields",
                ));
            }
        },
        Data::Enum(data) => expand_enum(&core, ident, &name, data, &input.attrs, &container)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Describe cannot be derived for unions",
            ));
        }
    };

    Ok(quote! {
        impl #core::Describe for #ident {
            #[allow(unused_variables)]
            fn describe(types: &mut #core::TypeSet) -> #core::TypeExpr {
                let key = #core::TypeKey::of::<Self>();
                types.define_with(key.clone(), |types| { #body })
            }
        }
    })
}

fn expand_struct(
    core: &TokenStream2,
    name: &str,
    fields: &FieldsNamed,
    container: &Options,
) -> syn::Result<TokenStream2> {
    let mut entries = Vec::with_capacity(fields.named.len());

    for field in &fields.named {
        let options = Options::from_attrs(&field.attrs)?;
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.to_string();
        let field_name = field_name.trim_start_matches("r#").to_string();
        let ty = &field.ty;

        let entry = if options.flatten {
            quote! {
                #core::FieldDef::embedded(
                    #field_name,
                    <#ty as #core::Describe>::describe(types),
                )
            }
        } else {
            let wire_name = options.rename.clone().unwrap_or_else(|| {
                container
                    .rename_all
                    .map_or_else(|| field_name.clone(), |rule| rule.apply(&field_name))
            });
            let skip = if options.skip {
                quote! { .skipped() }
            } else {
                quote! {}
            };
            quote! {
                #core::FieldDef::new(
                    #field_name,
                    ::core::option::Option::Some(#wire_name),
                    <#ty as #core::Describe>::describe(types),
                ) #skip
            }
        };
        entries.push(entry);
    }

    Ok(quote! {
        #core::TypeDef::structure(key, #name, ::std::vec![#(#entries),*])
    })
}

fn expand_enum(
    core: &TokenStream2,
    ident: &syn::Ident,
    name: &str,
    data: &DataEnum,
    attrs: &[Attribute],
    container: &Options,
) -> syn::Result<TokenStream2> {
    let mut arms = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Describe only supports enums without variant data",
            ));
        }
        let options = Options::from_attrs(&variant.attrs)?;
        let variant_ident = &variant.ident;
        let rendered = options.rename.clone().unwrap_or_else(|| {
            let raw = variant_ident.to_string();
            container.rename_all.map_or_else(|| raw.clone(), |rule| rule.apply(&raw))
        });
        arms.push(quote! {
            if value == (#ident::#variant_ident as i64) {
                return ::std::string::String::from(#rendered);
            }
        });
    }

    let kind = repr_kind(attrs);
    Ok(quote! {
        #core::TypeDef::enumeration(
            key,
            #name,
            #core::PrimitiveKind::#kind,
            #core::EnumRenderer::new(|value: i64| -> ::std::string::String {
                #(#arms)*
                ::std::format!("{}({})", #name, value)
            }),
        )
    })
}

/// Path of the crate defining `Describe`, as seen from the deriving crate.
///
/// A direct `tsbridge-core` dependency wins, then the `core` module of the
/// `tsbridge` facade. Without either, `::tsbridge_core` is assumed.
fn core_path(explicit: Option<&syn::Path>) -> TokenStream2 {
    if let Some(path) = explicit {
        return quote!(#path);
    }
    match crate_name("tsbridge-core") {
        Ok(FoundCrate::Itself) => return quote!(crate),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name, Span::call_site());
            return quote!(::#ident);
        }
        Err(_) => {}
    }
    match crate_name("tsbridge") {
        Ok(FoundCrate::Itself) => quote!(crate::core),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name, Span::call_site());
            quote!(::#ident::core)
        }
        Err(_) => quote!(::tsbridge_core),
    }
}

/// Reads the integer width of a `#[repr(..)]` attribute; defaults to `I32`.
fn repr_kind(attrs: &[Attribute]) -> syn::Ident {
    let mut kind = "I32";
    for attr in attrs.iter().filter(|a| a.path().is_ident("repr")) {
        let _ = attr.parse_nested_meta(|meta| {
            let found = match meta.path.get_ident().map(ToString::to_string).as_deref() {
                Some("i8") => "I8",
                Some("i16") => "I16",
                Some("i32") => "I32",
                Some("i64") => "I64",
                Some("isize") => "Isize",
                Some("u8") => "U8",
                Some("u16") => "U16",
                Some("u32") => "U32",
                Some("u64") => "U64",
                Some("usize") => "Usize",
                _ => return Ok(()),
            };
            kind = found;
            Ok(())
        });
    }
    syn::Ident::new(kind, Span::call_site())
}

/// Attribute options shared by containers, fields and variants.
#[derive(Default)]
struct Options {
    rename: Option<String>,
    rename_all: Option<RenameRule>,
    skip: bool,
    flatten: bool,
    krate: Option<syn::Path>,
}

impl Options {
    /// Collects options from `#[ts(..)]` and `#[serde(..)]`.
    ///
    /// `#[ts(..)]` wins over `#[serde(..)]`; unknown serde keys are ignored
    /// since they belong to serde.
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut ts = Self::default();
        let mut serde = Self::default();

        for attr in attrs {
            if attr.path().is_ident("ts") {
                ts.parse(attr, true)?;
            } else if attr.path().is_ident("serde") {
                serde.parse(attr, false)?;
            }
        }

        Ok(Self {
            rename: ts.rename.or(serde.rename),
            rename_all: ts.rename_all.or(serde.rename_all),
            skip: ts.skip || serde.skip,
            flatten: ts.flatten || serde.flatten,
            krate: ts.krate,
        })
    }

    fn parse(&mut self, attr: &Attribute, strict: bool) -> syn::Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                // serde also allows `rename(serialize = "..")`
                if meta.input.peek(syn::Token![=]) {
                    self.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            self.rename = Some(inner.value()?.parse::<LitStr>()?.value());
                        } else if inner.input.peek(syn::Token![=]) {
                            inner.value()?.parse::<Expr>()?;
                        }
                        Ok(())
                    })?;
                }
            } else if meta.path.is_ident("rename_all") {
                let lit = meta.value()?.parse::<LitStr>()?;
                let rule = RenameRule::parse(&lit.value())
                    .ok_or_else(|| syn::Error::new_spanned(&lit, "unknown rename_all rule"))?;
                self.rename_all = Some(rule);
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                self.skip = true;
            } else if meta.path.is_ident("flatten") {
                self.flatten = true;
            } else if strict && meta.path.is_ident("crate") {
                self.krate = Some(meta.value()?.parse::<LitStr>()?.parse()?);
            } else if strict {
                return Err(meta.error("unsupported ts attribute"));
            } else if meta.input.peek(syn::Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _: proc_macro2::TokenTree = meta.input.parse()?;
            }
            Ok(())
        })
    }
}

/// Case conversion applied by `rename_all`.
#[derive(Clone, Copy)]
enum RenameRule {
    Lower,
    Upper,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<Self> {
        match rule {
            "lowercase" => Some(Self::Lower),
            "UPPERCASE" => Some(Self::Upper),
            "camelCase" => Some(Self::Camel),
            "PascalCase" => Some(Self::Pascal),
            "snake_case" => Some(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "kebab-case" => Some(Self::Kebab),
            _ => None,
        }
    }

    /// Applies the rule to a snake_case field or PascalCase variant name.
    fn apply(self, name: &str) -> String {
        let words = split_words(name);
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Snake => words.join("_"),
            Self::ScreamingSnake => words.join("_").to_uppercase(),
            Self::Kebab => words.join("-"),
            Self::Pascal => words.iter().map(|w| capitalize(w)).collect(),
            Self::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
        }
    }
}

/// Splits `snake_case` or `PascalCase` into lowercase words.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.extend(c.to_lowercase());
        } else {
            current.extend(c.to_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
