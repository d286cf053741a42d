use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{OversellPolicy, Product, ProductCreate};
use crate::error::StoreError;
use crate::messages::ProductRequest;
use crate::repository::{ProductRepository, StockAdjustment};

/// Client for the product store.
#[derive(Clone)]
pub struct ProductClient {
    sender: mpsc::Sender<ProductRequest>,
}

impl ProductClient {
    pub fn new(sender: mpsc::Sender<ProductRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(ProductRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(ProductClient => fn get_product(id: String) -> Option<Product> as ProductRequest::GetProduct, Error = StoreError);
client_method!(ProductClient => fn create_product(product: ProductCreate) -> String as ProductRequest::CreateProduct, Error = StoreError);
client_method!(ProductClient => fn update_stock(id: String, stock: u32) -> Product as ProductRequest::UpdateStock, Error = StoreError);
client_method!(ProductClient => fn reserve_stock(lines: Vec<StockAdjustment>, policy: OversellPolicy) -> Vec<StockAdjustment> as ProductRequest::ReserveStock, Error = StoreError);
client_method!(ProductClient => fn restore_stock(lines: Vec<StockAdjustment>) -> () as ProductRequest::RestoreStock, Error = StoreError);

#[async_trait]
impl ProductRepository for ProductClient {
    async fn reserve(
        &self,
        lines: Vec<StockAdjustment>,
        policy: OversellPolicy,
    ) -> Result<Vec<StockAdjustment>, StoreError> {
        self.reserve_stock(lines, policy).await
    }

    async fn restore(&self, lines: Vec<StockAdjustment>) -> Result<(), StoreError> {
        self.restore_stock(lines).await
    }
}
