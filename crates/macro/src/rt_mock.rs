use proc_macro2::TokenStream;
use quote::quote;
use rtmock_core::Synthesizer;
use syn::Item;

/// rt_mock macro entry
pub fn rt_mock_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let err = syn::Error::new_spanned(attr, "`#[rt_mock]` does not take arguments")
            .to_compile_error();
        return quote! {
            #item
            #err
        };
    }

    let mut item = match syn::parse2::<Item>(item) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error(),
    };

    match rtmock_syntax::expand(&item, &Synthesizer::default()) {
        Ok(tokens) => tokens,
        Err(err) => {
            // Keep the item around so its uses don't fail on top of the actual error.
            rtmock_syntax::strip_helper_attributes(&mut item);
            let err = err.to_compile_error();
            quote! {
                #item
                #err
            }
        }
    }
}
