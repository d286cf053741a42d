//! Cloneable handles for talking to the service tasks.

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
/// Channel failures become the error type's "service gone" variant via `ActorGone`.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> std::result::Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| <$error_type>::from($crate::messages::ActorGone("Actor closed")))?;

                response
                    .await
                    .map_err(|_| <$error_type>::from($crate::messages::ActorGone("Actor dropped")))?
            }
        }
    };
}

mod order_client;
mod order_store_client;
mod product_client;

pub use order_client::OrderClient;
pub use order_store_client::OrderStoreClient;
pub use product_client::ProductClient;
