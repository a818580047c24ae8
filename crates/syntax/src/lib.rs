#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! Rust front and back end of mock synthesis.
//!
//! [`lower`] turns `syn` items into [`Declaration`](rtmock_primitives::Declaration)s, any
//! [`Expander`] turns those into mocks, and [`emit`] writes the mocks back out as Rust items.

pub mod emit;
pub mod lower;
pub mod types;

use proc_macro2::TokenStream;
use quote::quote;
use rtmock_core::Expander;
use syn::Item;

pub use lower::HELPER_ATTRIBUTE;

/// Expands `item` into itself followed by its mock.
///
/// Helper attributes are stripped from the re-emitted item. Synthesis failures are reported
/// at the item's name.
pub fn expand(item: &Item, expander: &dyn Expander) -> syn::Result<TokenStream> {
    let mock = expand_mock(item, expander)?;

    let mut item = item.clone();
    strip_helper_attributes(&mut item);
    Ok(quote! {
        #item
        #mock
    })
}

/// Expands `item` into its mock only.
pub fn expand_mock(item: &Item, expander: &dyn Expander) -> syn::Result<TokenStream> {
    let decl = lower::lower_item(item)?;
    let mock = expander
        .expand(&decl)
        .map_err(|err| syn::Error::new(lower::name_span(item), err))?;

    match item {
        Item::Trait(item) => emit::emit_mock(item, &mock),
        item => Err(syn::Error::new(
            lower::name_span(item),
            format!("mocks can only be emitted for traits, found {}", decl.kind),
        )),
    }
}

/// Removes helper attributes from `item` if it is a trait.
pub fn strip_helper_attributes(item: &mut Item) {
    if let Item::Trait(item) = item {
        lower::strip_helper_attributes(item);
    }
}

#[cfg(test)]
mod tests {
    use rtmock_core::{SynthesisConfig, Synthesizer};
    use syn::{parse_quote, File};

    use super::*;

    #[test]
    fn trait_is_followed_by_its_mock() {
        let item: Item = parse_quote! {
            trait Greeter {
                #[rt_mock(property)]
                fn name(&self) -> String;
                fn greet(&self, who: &str) -> String;
            }
        };

        let file: File = syn::parse2(expand(&item, &Synthesizer::default()).unwrap()).unwrap();
        assert_eq!(file.items.len(), 6);

        let Item::Trait(item) = &file.items[0] else { panic!("expected the trait first") };
        assert!(item.items.iter().all(|item| match item {
            syn::TraitItem::Fn(method) => method.attrs.is_empty(),
            _ => true,
        }));

        let Item::Struct(mock) = &file.items[1] else { panic!("expected the mock struct") };
        assert_eq!(mock.ident, "RtMockGreeter");
    }

    #[test]
    fn configured_prefixes() {
        let item: Item = parse_quote! {
            trait Greeter {
                fn greet(&self);
            }
        };
        let config = SynthesisConfig::default().with_mock_prefix("Fake").with_slot_prefix("on_");

        let file: File =
            syn::parse2(expand(&item, &Synthesizer::new(config)).unwrap()).unwrap();
        let Item::Struct(mock) = &file.items[1] else { panic!("expected the mock struct") };
        assert_eq!(mock.ident, "FakeGreeter");
        let field = mock.fields.iter().next().and_then(|field| field.ident.as_ref());
        assert_eq!(field.map(|i| i.to_string()).as_deref(), Some("on_greet_Void"));
    }

    #[test]
    fn mock_only() {
        let item: Item = parse_quote! {
            trait Greeter {
                fn greet(&self);
            }
        };

        let file: File =
            syn::parse2(expand_mock(&item, &Synthesizer::default()).unwrap()).unwrap();
        assert!(file.items.iter().all(|item| !matches!(item, Item::Trait(_))));
        assert_eq!(file.items.len(), 5);
    }

    #[test]
    fn non_traits_are_rejected_at_their_name() {
        let item: Item = parse_quote! {
            struct Greeter;
        };

        let err = expand(&item, &Synthesizer::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "RtMock can only be applied to a protocol, found struct `Greeter`"
        );
    }
}
