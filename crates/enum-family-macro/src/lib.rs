use heck::ToSnakeCase;
use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{braced, token, Attribute, Error, Expr, Ident, LitStr, Result, Token, Type, Visibility};

use proc_macro_crate::{crate_name, FoundCrate};

/// Associated functions of `EnumFamily`. An inherent accessor with one of
/// these names would shadow the trait function on `Family::name()` calls.
const RESERVED_ACCESSORS: &[&str] = &[
    "registry",
    "values",
    "size",
    "value_of",
    "value_of_ignore_case",
    "resolve",
    "by_ordinal",
    "get_many",
    "is_valid",
    "as_map",
    "names_of",
    "enum_set",
];

/// Identifiers that cannot be written as raw identifiers either.
const UNRAWABLE: &[&str] = &["self", "super", "crate", "_"];

/// Domain field: `#[attrs] vis name: Type (= default)?`
struct FieldDef {
    attrs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    ty: Type,
    default: Option<Expr>,
}

impl Parse for FieldDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;
        let default = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Some(input.parse()?)
        } else {
            None
        };
        Ok(Self {
            attrs,
            vis,
            name,
            ty,
            default,
        })
    }
}

/// `field: value` inside a constant's braces.
struct FieldInit {
    name: Ident,
    value: Expr,
}

impl Parse for FieldInit {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let value: Expr = input.parse()?;
        Ok(Self { name, value })
    }
}

/// One constant: `#[attrs] Name` or `#[attrs] Name { field: value, ... }`
struct ConstantDef {
    attrs: Vec<Attribute>,
    name: Ident,
    inits: Vec<FieldInit>,
}

impl Parse for ConstantDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let name: Ident = input.parse()?;
        let inits = if input.peek(token::Brace) {
            let content;
            braced!(content in input);
            let inits: Punctuated<FieldInit, Token![,]> =
                content.parse_terminated(FieldInit::parse, Token![,])?;
            inits.into_iter().collect()
        } else {
            Vec::new()
        };
        Ok(Self { attrs, name, inits })
    }
}

struct EnumerationInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    fields: Vec<FieldDef>,
    constants: Vec<ConstantDef>,
}

impl Parse for EnumerationInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;

        let fields = if input.peek(token::Brace) {
            let content;
            braced!(content in input);
            let fields: Punctuated<FieldDef, Token![,]> =
                content.parse_terminated(FieldDef::parse, Token![,])?;
            fields.into_iter().collect()
        } else {
            input.parse::<Token![;]>()?;
            Vec::new()
        };

        let constants: Punctuated<ConstantDef, Token![,]> =
            input.parse_terminated(ConstantDef::parse, Token![,])?;

        Ok(Self {
            attrs,
            vis,
            name,
            fields,
            constants: constants.into_iter().collect(),
        })
    }
}

// =============================================================================
// Validation (runs at macro expansion time)
// =============================================================================

fn validate(input: &EnumerationInput) -> Result<()> {
    let mut field_names = Vec::new();
    for field in &input.fields {
        if field.name == "identity" {
            return Err(Error::new_spanned(
                &field.name,
                "`identity` is reserved for the embedded enum identity",
            ));
        }
        if field_names.contains(&&field.name) {
            return Err(Error::new_spanned(&field.name, "duplicate field"));
        }
        field_names.push(&field.name);
    }

    let mut constant_names: Vec<&Ident> = Vec::new();
    let mut accessors: Vec<(Ident, &Ident)> = Vec::new();
    for constant in &input.constants {
        if constant_names.contains(&&constant.name) {
            return Err(Error::new_spanned(
                &constant.name,
                format!("duplicate enum constant `{}` in `{}`", constant.name, input.name),
            ));
        }
        constant_names.push(&constant.name);
        validate_inits(input, constant)?;

        let accessor = accessor_ident(&constant.name)?;
        if let Some((_, earlier)) = accessors.iter().find(|(a, _)| *a == accessor) {
            return Err(Error::new_spanned(
                &constant.name,
                format!(
                    "constant `{earlier}` and `{}` both generate accessor `{}()`",
                    constant.name,
                    accessor.unraw()
                ),
            ));
        }
        accessors.push((accessor, &constant.name));
    }
    Ok(())
}

fn validate_inits(input: &EnumerationInput, constant: &ConstantDef) -> Result<()> {
    let mut seen: Vec<&Ident> = Vec::new();
    for init in &constant.inits {
        if !input.fields.iter().any(|f| f.name == init.name) {
            return Err(Error::new_spanned(
                &init.name,
                format!("`{}` has no field `{}`", input.name, init.name),
            ));
        }
        if seen.contains(&&init.name) {
            return Err(Error::new_spanned(&init.name, "field set twice"));
        }
        seen.push(&init.name);
    }
    for field in &input.fields {
        if field.default.is_none() && !seen.contains(&&field.name) {
            return Err(Error::new_spanned(
                &constant.name,
                format!(
                    "field `{}` has no default and must be set on `{}`",
                    field.name, constant.name
                ),
            ));
        }
    }
    Ok(())
}

/// `NetworkError` → `network_error`, `If` → `r#if`.
fn accessor_ident(constant: &Ident) -> Result<Ident> {
    let snake = constant.to_string().to_snake_case();
    if RESERVED_ACCESSORS.contains(&snake.as_str()) || UNRAWABLE.contains(&snake.as_str()) {
        return Err(Error::new_spanned(
            constant,
            format!("constant `{constant}` would generate the reserved accessor `{snake}()`"),
        ));
    }
    if syn::parse_str::<Ident>(&snake).is_ok() {
        Ok(Ident::new(&snake, constant.span()))
    } else {
        Ok(Ident::new_raw(&snake, constant.span()))
    }
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn family_crate_path() -> TokenStream2 {
    match crate_name("enum-family") {
        Ok(FoundCrate::Itself) => {
            quote!(::enum_family)
        }
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::enum_family),
    }
}

// =============================================================================
// Code generation
// =============================================================================

/// Generate the family struct, its accessors and every trait impl.
///
/// ```ignore
/// enumeration! {
///     pub struct ErrorCode {
///         code: i32,
///         desc: &'static str = "",
///     }
///     Success { code: 0 },
///     NetworkError { code: 500, desc: "network error" },
/// }
///
/// // Generates (abridged):
/// #[derive(Clone, Debug)]
/// pub struct ErrorCode {
///     identity: Identity,
///     code: i32,
///     desc: &'static str,
/// }
///
/// impl ErrorCode {
///     pub const COUNT: usize = 2;
///     pub fn success() -> &'static Self { &Self::values()[0] }
///     pub fn network_error() -> &'static Self { &Self::values()[1] }
/// }
///
/// impl EnumFamily for ErrorCode {
///     const TYPE_TAG: &'static str = concat!(module_path!(), "::", "ErrorCode");
///     fn registry() -> &'static Registry<Self> { /* OnceLock, filled in order */ }
/// }
///
/// // + EnumValue, PartialEq/Eq/Hash (type tag + name), PartialOrd/Ord
/// //   (ordinal), Display, FromStr, Serialize, Deserialize
/// ```
fn expand(input: &EnumerationInput, krate: &TokenStream2) -> Result<TokenStream2> {
    validate(input)?;

    let EnumerationInput {
        attrs,
        vis,
        name,
        fields,
        constants,
    } = input;
    let name_lit = LitStr::new(&name.to_string(), name.span());
    let count = Literal::usize_unsuffixed(constants.len());

    let field_decls = fields.iter().map(|f| {
        let FieldDef {
            attrs, vis, name, ty, ..
        } = f;
        quote! { #(#attrs)* #vis #name: #ty }
    });

    let mut accessors = Vec::with_capacity(constants.len());
    let mut declarations = Vec::with_capacity(constants.len());
    for (ordinal, constant) in constants.iter().enumerate() {
        let accessor = accessor_ident(&constant.name)?;
        let constant_attrs = &constant.attrs;
        let constant_lit = LitStr::new(&constant.name.to_string(), constant.name.span());
        let ordinal_lit = Literal::usize_unsuffixed(ordinal);

        let generated_doc = if constant_attrs.iter().any(|a| a.path().is_ident("doc")) {
            quote! {}
        } else {
            let doc = format!("The `{}` constant (ordinal {}).", constant.name, ordinal);
            quote! { #[doc = #doc] }
        };
        accessors.push(quote! {
            #generated_doc
            #(#constant_attrs)*
            #[inline]
            #vis fn #accessor() -> &'static Self {
                &<Self as #krate::EnumFamily>::values()[#ordinal_lit]
            }
        });

        let inits = fields.iter().map(|f| {
            let field = &f.name;
            let value = constant
                .inits
                .iter()
                .find(|i| i.name == *field)
                .map(|i| &i.value)
                .or(f.default.as_ref());
            quote! { #field: #value }
        });
        declarations.push(quote! {
            registry.create(#constant_lit, |identity| #name {
                identity,
                #(#inits,)*
            });
        });
    }

    Ok(quote! {
        #(#attrs)*
        #[derive(::core::clone::Clone, ::core::fmt::Debug)]
        #vis struct #name {
            identity: #krate::Identity,
            #(#field_decls,)*
        }

        #[allow(dead_code)]
        impl #name {
            /// Number of declared constants.
            #vis const COUNT: usize = #count;

            #(#accessors)*
        }

        impl #krate::EnumValue for #name {
            #[inline]
            fn identity(&self) -> &#krate::Identity {
                &self.identity
            }
        }

        impl #krate::EnumFamily for #name {
            const TYPE_TAG: &'static str = concat!(module_path!(), "::", #name_lit);

            fn registry() -> &'static #krate::Registry<Self> {
                static REGISTRY: ::std::sync::OnceLock<#krate::Registry<#name>> =
                    ::std::sync::OnceLock::new();
                REGISTRY.get_or_init(|| {
                    #[allow(unused_mut)]
                    let mut registry =
                        #krate::Registry::new(<#name as #krate::EnumFamily>::TYPE_TAG);
                    #(#declarations)*
                    registry
                })
            }
        }

        impl ::core::cmp::PartialEq for #name {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.identity == other.identity
            }
        }

        impl ::core::cmp::Eq for #name {}

        impl ::core::hash::Hash for #name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&self.identity, state);
            }
        }

        impl ::core::cmp::PartialOrd for #name {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::option::Option::Some(::core::cmp::Ord::cmp(self, other))
            }
        }

        impl ::core::cmp::Ord for #name {
            #[inline]
            fn cmp(&self, other: &Self) -> ::core::cmp::Ordering {
                ::core::cmp::Ord::cmp(&self.identity.ordinal(), &other.identity.ordinal())
            }
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.identity.name())
            }
        }

        impl ::core::str::FromStr for #name {
            type Err = #krate::LookupError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                <Self as #krate::EnumFamily>::resolve(s).cloned()
            }
        }

        impl #krate::__private::serde::Serialize for #name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: #krate::__private::serde::Serializer,
            {
                #krate::serde_support::serialize(self, serializer)
            }
        }

        impl<'de> #krate::__private::serde::Deserialize<'de> for #name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: #krate::__private::serde::Deserializer<'de>,
            {
                #krate::serde_support::deserialize(deserializer)
            }
        }
    })
}

// =============================================================================
// Entry point
// =============================================================================

/// Declare an enum family.
///
/// The first item is the family struct, either unit-like (`struct Suit;`) or
/// with domain fields. A field may carry a default (`final_state: bool = false`)
/// used by constants that do not set it. Constants follow, comma-separated, in
/// declaration order; their ordinals are assigned in that order.
///
/// ```ignore
/// enumeration! {
///     /// Lifecycle of a trade.
///     pub struct TradeState {
///         pub final_state: bool = false,
///     }
///     Created,
///     Failed { final_state: true },
///     Paid,
///     Delivered { final_state: true },
/// }
///
/// assert!(TradeState::failed().final_state);
/// assert_eq!(TradeState::paid().ordinal(), 2);
/// ```
///
/// Each constant gets a `snake_case` accessor returning `&'static Self`.
/// Attributes on a constant (docs, `#[deprecated]`) are placed on its accessor.
///
/// The registry is built on first use. Field values that refer to constants
/// of another family initialize that family first; a family whose field values
/// refer back to itself never finishes initializing.
///
/// Field types must be `Clone + Debug + Send + Sync`.
#[proc_macro]
pub fn enumeration(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as EnumerationInput);
    let krate = family_crate_path();

    expand(&input, &krate)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
