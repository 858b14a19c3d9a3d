use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject a
/// [`rocket::local::asynchronous::Client`] for a server backed by fresh
/// in-memory voting state.
///
/// Arguments:
/// - `admin`: log the client in as admin before the test body runs.
/// - `demo_lookup`: enable placeholder records for unknown voter lookups.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the injected arguments and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    let arg = parse_macro_input!(args as Option<Ident>);
    let (config, maybe_login) = match arg {
        None => (quote! { crate::config::Config::example() }, None),
        Some(arg) if arg == "admin" => (
            quote! { crate::config::Config::example() },
            Some(quote! {
                // The response borrows the client, so keep it in its own scope.
                {
                    let response = rocket_client
                        .post(uri!(crate::api::auth::authenticate))
                        .header(rocket::http::ContentType::JSON)
                        .body(rocket::serde::json::json!(crate::model::api::admin::AdminCredentials::example()).to_string())
                        .dispatch()
                        .await;
                    assert_eq!(rocket::http::Status::Ok, response.status(), "admin login failed");
                }
            }),
        ),
        Some(arg) if arg == "demo_lookup" => (
            quote! { crate::config::Config::example_with_demo_lookup() },
            None,
        ),
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `admin` or `demo_lookup`")
                .into_compile_error()
                .into();
        }
    };

    quote! {
        #[test]
        fn #name() {
            async fn setup() -> rocket::local::asynchronous::Client {
                // Route tests enter the whole backend, so enable logging.
                log4rs_test_utils::test_logging::init_logging_once_for(
                    ["votebox_backend"],
                    None,
                    None,
                );

                let config = #config;
                let store = crate::store::SharedStore::load(
                    crate::store::MemoryRepository::default(),
                    config.store_settings(),
                )
                .await
                .unwrap();
                let rocket = crate::rocket_for_store(store, config);
                let rocket_client = rocket::local::asynchronous::Client::tracked(rocket)
                    .await
                    .unwrap();

                #maybe_login

                rocket_client
            }

            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let rocket_client = setup().await;
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut args = vec![];
    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                if let Some(segment) = type_path.path.segments.last() {
                    if segment.ident == "Client" {
                        if !args.is_empty() {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `rocket::local::asynchronous::Client`",
                            ));
                        }
                        args.push(quote! { rocket_client });
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected `client_ident: Client`",
        ));
    }

    Ok(args)
}
