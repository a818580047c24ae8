//! Emission of a synthesized mock as Rust items.
//!
//! For a trait `A` the emitter produces a struct `RtMockA` holding one public, optional slot
//! per mockable member, an inherent `new`, `Default` and `Debug` impls and `impl A for RtMockA`
//! whose members call into the slots. Calling a member whose slot is unset panics.

use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use rtmock_primitives::{MethodMock, MockDeclaration, MockItem, PropertyMock};
use syn::{
    Attribute, FnArg, GenericParam, Generics, Ident, ItemTrait, Pat, PatIdent, ReturnType,
    TraitItem, TraitItemFn, Type,
};

use crate::lower::typed_inputs;
use crate::types::erase_lifetimes;

/// Emits the mock items for `item`.
///
/// Every item of `mock` must have been derived from the trait item at its source index.
pub fn emit_mock(item: &ItemTrait, mock: &MockDeclaration) -> syn::Result<TokenStream> {
    let vis = &item.vis;
    let trait_ident = &item.ident;
    let mock_ident = ident(&mock.name, item.ident.span())?;
    let mock_name = &mock.name;
    let generics = &item.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut slots = Vec::with_capacity(mock.items.len());
    let mut slot_types = Vec::with_capacity(mock.items.len());
    let mut members = Vec::with_capacity(mock.items.len());

    for mock_item in &mock.items {
        let Some(TraitItem::Fn(method)) = item.items.get(mock_item.source_index()) else {
            return Err(syn::Error::new_spanned(
                trait_ident,
                format!("mock slot `{}` has no matching trait method", mock_item.slot().name),
            ));
        };

        slots.push(ident(&mock_item.slot().name, method.sig.ident.span())?);
        match mock_item {
            MockItem::Method(mock) => {
                slot_types.push(method_slot_type(method));
                members.push(forwarding_method(method, mock)?);
            }
            MockItem::Property(mock) => {
                slot_types.push(property_slot_type(method));
                members.push(property_accessor(method, mock)?);
            }
        }
    }

    let slot_names = slots.iter().map(Ident::to_string);
    let (marker_field, marker_init) = match phantom_marker(generics) {
        Some(marker) => (
            quote! { _marker: #marker, },
            quote! { _marker: ::std::marker::PhantomData, },
        ),
        None => (TokenStream::new(), TokenStream::new()),
    };
    let async_trait = async_trait_attribute(&item.attrs);

    Ok(quote! {
        #[allow(dead_code, non_snake_case)]
        #vis struct #mock_ident #generics #where_clause {
            #(pub #slots: #slot_types,)*
            #marker_field
        }

        #[allow(dead_code)]
        impl #impl_generics #mock_ident #ty_generics #where_clause {
            /// Creates the mock with every slot unset.
            #vis fn new() -> Self {
                Self {
                    #(#slots: ::std::option::Option::None,)*
                    #marker_init
                }
            }
        }

        impl #impl_generics ::std::default::Default for #mock_ident #ty_generics #where_clause {
            fn default() -> Self {
                Self::new()
            }
        }

        impl #impl_generics ::std::fmt::Debug for #mock_ident #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(#mock_name)
                    #(.field(#slot_names, &self.#slots.is_some()))*
                    .finish()
            }
        }

        #async_trait
        impl #impl_generics #trait_ident #ty_generics for #mock_ident #ty_generics #where_clause {
            #(#members)*
        }
    })
}

/// `Option<Box<dyn Fn(Args..) -> Output + Send + Sync>>`, with the output boxed into a future
/// for async methods.
fn method_slot_type(method: &TraitItemFn) -> TokenStream {
    let sig = &method.sig;
    let inputs = typed_inputs(sig).map(|arg| erase_lifetimes(&arg.ty, "'_"));
    let output = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => erase_lifetimes(ty, "'static").into_token_stream(),
    };
    let output = if sig.asyncness.is_some() {
        quote! {
            ::std::pin::Pin<::std::boxed::Box<
                dyn ::std::future::Future<Output = #output> + ::std::marker::Send
            >>
        }
    } else {
        output
    };

    quote! {
        ::std::option::Option<::std::boxed::Box<
            dyn ::std::ops::Fn(#(#inputs),*) -> #output + ::std::marker::Send + ::std::marker::Sync
        >>
    }
}

/// Borrowed properties store the owned form of their target.
fn property_slot_type(method: &TraitItemFn) -> TokenStream {
    match &method.sig.output {
        ReturnType::Type(_, ty) => match &**ty {
            Type::Reference(reference) => {
                let target = erase_lifetimes(&reference.elem, "'static");
                quote! { ::std::option::Option<<#target as ::std::borrow::ToOwned>::Owned> }
            }
            ty => {
                let ty = erase_lifetimes(ty, "'static");
                quote! { ::std::option::Option<#ty> }
            }
        },
        ReturnType::Default => quote! { ::std::option::Option<()> },
    }
}

fn forwarding_method(method: &TraitItemFn, mock: &MethodMock) -> syn::Result<TokenStream> {
    let mut sig = method.sig.clone();
    let body = &mock.method.body;
    let span = method.sig.ident.span();
    let arguments =
        body.arguments.iter().map(|name| ident(name, span)).collect::<syn::Result<Vec<_>>>()?;

    let mut bindings = arguments.iter();
    for input in sig.inputs.iter_mut() {
        if let FnArg::Typed(arg) = input {
            if let Some(name) = bindings.next() {
                *arg.pat = Pat::Ident(PatIdent {
                    attrs: Vec::new(),
                    by_ref: None,
                    mutability: None,
                    ident: name.clone(),
                    subpat: None,
                });
            }
        }
    }

    let slot = ident(&body.slot, span)?;
    let message = unset_message(&body.slot);

    let mut call = quote! { (self.#slot.as_ref().expect(#message))(#(#arguments),*) };
    if body.awaits {
        call = quote! { #call.await };
    }
    if body.propagates {
        call = quote! { ::std::result::Result::Ok(#call?) };
    }

    Ok(quote! {
        #sig {
            #call
        }
    })
}

fn property_accessor(method: &TraitItemFn, mock: &PropertyMock) -> syn::Result<TokenStream> {
    let sig = &method.sig;
    let slot = ident(&mock.accessor.slot, sig.ident.span())?;
    let message = unset_message(&mock.accessor.slot);

    let value = quote! { self.#slot.as_ref().expect(#message) };
    let body = match &sig.output {
        ReturnType::Type(_, ty) if matches!(**ty, Type::Reference(_)) => {
            quote! { ::std::borrow::Borrow::borrow(#value) }
        }
        _ => quote! { ::std::clone::Clone::clone(#value) },
    };

    Ok(quote! {
        #sig {
            #body
        }
    })
}

fn unset_message(slot: &str) -> String {
    format!("`{slot}` is not set")
}

/// A `PhantomData` over the trait's type and lifetime parameters, some of which no slot uses.
fn phantom_marker(generics: &Generics) -> Option<TokenStream> {
    let mut params = Vec::new();
    for param in &generics.params {
        match param {
            GenericParam::Type(param) => {
                let ident = &param.ident;
                params.push(quote! { #ident });
            }
            GenericParam::Lifetime(param) => {
                let lifetime = &param.lifetime;
                params.push(quote! { &#lifetime () });
            }
            GenericParam::Const(_) => {}
        }
    }

    if params.is_empty() {
        None
    } else {
        Some(quote! { ::std::marker::PhantomData<fn() -> (#(#params,)*)> })
    }
}

fn async_trait_attribute(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs.iter().find(|attr| {
        attr.path().segments.last().is_some_and(|segment| segment.ident == "async_trait")
    })
}

/// Keywords become raw identifiers. Names that cannot be spelled as an identifier at all, eg.
/// from a prefix with a `-` in it, are reported at `span`.
fn ident(name: &str, span: Span) -> syn::Result<Ident> {
    let is_word = name.chars().next().is_some_and(|c| c == '_' || c.is_alphabetic())
        && name.chars().all(|c| c == '_' || c.is_alphanumeric());

    if is_word && syn::parse_str::<Ident>(name).is_ok() {
        Ok(Ident::new(name, span))
    } else if is_word
        && !matches!(name, "_" | "crate" | "self" | "Self" | "super")
        && syn::parse_str::<Ident>(&format!("r#{name}")).is_ok()
    {
        Ok(Ident::new_raw(name, span))
    } else {
        Err(syn::Error::new(span, format!("`{name}` is not a valid identifier")))
    }
}
