use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::ProductClient;
use crate::domain::{OversellPolicy, Product, ProductCreate};
use crate::error::StoreError;
use crate::messages::{ProductRequest, ServiceResponse};
use crate::repository::StockAdjustment;

/// Owns product records and is the only writer of `stock`.
///
/// Every request is handled to completion before the next one is read, so a
/// reservation's check and its decrements can never interleave with another
/// reservation.
pub struct ProductService {
    receiver: mpsc::Receiver<ProductRequest>,
    products: HashMap<String, Product>,
}

impl ProductService {
    pub fn new(buffer_size: usize) -> (Self, ProductClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            products: HashMap::new(),
        };
        let client = ProductClient::new(sender);
        (service, client)
    }

    #[instrument(name = "product_service", skip(self))]
    pub async fn run(mut self) {
        info!("ProductService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ProductRequest::GetProduct { id, respond_to } => {
                    self.handle_get_product(id, respond_to);
                }
                ProductRequest::CreateProduct {
                    product,
                    respond_to,
                } => {
                    self.handle_create_product(product, respond_to);
                }
                ProductRequest::UpdateStock {
                    id,
                    stock,
                    respond_to,
                } => {
                    self.handle_update_stock(id, stock, respond_to);
                }
                ProductRequest::ReserveStock {
                    lines,
                    policy,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_reserve_stock(lines, policy));
                }
                ProductRequest::RestoreStock { lines, respond_to } => {
                    self.handle_restore_stock(lines);
                    let _ = respond_to.send(Ok(()));
                }
                ProductRequest::Shutdown => {
                    info!("ProductService shutting down");
                    break;
                }
            }
        }

        info!("ProductService stopped");
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_product(&self, id: String, respond_to: ServiceResponse<Option<Product>, StoreError>) {
        debug!("Processing get_product request");

        let product = self.products.get(&id).cloned();

        match &product {
            Some(product) => debug!(product_name = %product.name, stock = product.stock, "Product found"),
            None => debug!("Product not found"),
        }

        let _ = respond_to.send(Ok(product));
    }

    #[instrument(fields(product_id = %product.id, product_name = %product.name), skip(self, product, respond_to))]
    fn handle_create_product(&mut self, product: ProductCreate, respond_to: ServiceResponse<String, StoreError>) {
        debug!("Processing create_product request");

        let id = product.id.clone();
        if self.products.insert(id.clone(), Product::from(product)).is_some() {
            warn!("Replaced existing product record");
        }
        info!("Product registered");

        let _ = respond_to.send(Ok(id));
    }

    #[instrument(fields(product_id = %id, stock = stock), skip(self, respond_to))]
    fn handle_update_stock(&mut self, id: String, stock: u32, respond_to: ServiceResponse<Product, StoreError>) {
        debug!("Processing update_stock request");

        let result = match self.products.get_mut(&id) {
            Some(product) => {
                product.stock = stock;
                info!("Stock level set");
                Ok(product.clone())
            }
            None => {
                error!("Product not found");
                Err(StoreError::ProductNotFound(id))
            }
        };

        let _ = respond_to.send(result);
    }

    /// Check every line first, then apply every line.
    #[instrument(fields(line_count = lines.len(), policy = ?policy), skip(self, lines))]
    fn handle_reserve_stock(
        &mut self,
        lines: Vec<StockAdjustment>,
        policy: OversellPolicy,
    ) -> Result<Vec<StockAdjustment>, StoreError> {
        debug!("Processing reserve_stock request");

        let mut requested: HashMap<&str, u32> = HashMap::new();
        for line in &lines {
            let product = self.products.get(&line.product_id).ok_or_else(|| {
                error!(product_id = %line.product_id, "Product not found");
                StoreError::ProductNotFound(line.product_id.clone())
            })?;
            let total = requested.entry(line.product_id.as_str()).or_insert(0);
            *total = total.saturating_add(line.quantity);

            if policy == OversellPolicy::Reject && *total > product.stock {
                error!(
                    product_id = %line.product_id,
                    available = product.stock,
                    requested = *total,
                    "Insufficient stock"
                );
                return Err(StoreError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: *total,
                    available: product.stock,
                });
            }
        }

        let mut applied = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(product) = self.products.get_mut(&line.product_id) {
                let taken = line.quantity.min(product.stock);
                if taken < line.quantity {
                    warn!(
                        product_id = %line.product_id,
                        requested = line.quantity,
                        taken,
                        "Oversold, stock clamped at zero"
                    );
                }
                product.stock -= taken;
                debug!(product_id = %line.product_id, remaining_stock = product.stock, "Stock reserved");
                applied.push(StockAdjustment::new(line.product_id, taken));
            }
        }

        info!("Stock reserved successfully");
        Ok(applied)
    }

    #[instrument(fields(line_count = lines.len()), skip(self, lines))]
    fn handle_restore_stock(&mut self, lines: Vec<StockAdjustment>) {
        debug!("Processing restore_stock request");

        for line in lines {
            match self.products.get_mut(&line.product_id) {
                Some(product) => {
                    product.stock = product.stock.saturating_add(line.quantity);
                    debug!(product_id = %line.product_id, stock = product.stock, "Stock restored");
                }
                None => warn!(product_id = %line.product_id, "Skipping restore for missing product"),
            }
        }

        info!("Stock restored successfully");
    }
}
