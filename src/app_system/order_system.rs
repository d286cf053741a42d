use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use crate::app_system::AppConfig;
use crate::clients::{OrderClient, OrderStoreClient, ProductClient};
use crate::domain::{Category, ProductCreate};
use crate::error::StoreError;
use crate::services::{OrderService, OrderStore, ProductService};

/// The main application system that wires the services together.
///
/// Stores start first; the order service gets their clients as its
/// repositories. Shutdown runs in the opposite order.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    pub order_store_client: OrderStoreClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    #[instrument(name = "order_system", skip(config), fields(oversell_policy = ?config.oversell_policy))]
    pub fn new(config: &AppConfig) -> Self {
        let mut handles = Vec::new();

        info!("Starting order system");

        let (product_service, product_client) = ProductService::new(config.channel_buffer);
        handles.push(tokio::spawn(product_service.run()));

        let (order_store, order_store_client) = OrderStore::new(config.channel_buffer);
        handles.push(tokio::spawn(order_store.run()));

        let (order_service, order_client) = OrderService::new(
            config.channel_buffer,
            Arc::new(product_client.clone()),
            Arc::new(order_store_client.clone()),
            config.oversell_policy,
        );
        handles.push(tokio::spawn(order_service.run()));

        info!("Order system started successfully");

        Self {
            order_client,
            product_client,
            order_store_client,
            handles,
        }
    }

    /// Loads a handful of products so a fresh instance has something to sell.
    #[instrument(skip(self))]
    pub async fn seed_demo_catalog(&self) -> Result<usize, StoreError> {
        let catalog = [
            ("prod_headphones", "Wireless Bluetooth Headphones", Decimal::new(19999, 2), 50, Category::Electronics),
            ("prod_smartwatch", "Smart Watch Pro", Decimal::new(29999, 2), 35, Category::Electronics),
            ("prod_jacket", "Men's Classic Leather Jacket", Decimal::new(24999, 2), 25, Category::Clothing),
            ("prod_yoga_mat", "Premium Yoga Mat", Decimal::new(4999, 2), 100, Category::Sports),
            ("prod_novel", "The Midnight Library", Decimal::new(1699, 2), 200, Category::Books),
        ];

        for (id, name, price, stock, category) in catalog {
            self.product_client
                .create_product(ProductCreate::new(id, name, price, stock, category))
                .await?;
        }

        info!(product_count = catalog.len(), "Demo catalog seeded");
        Ok(catalog.len())
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order system");

        // The order service depends on both stores, so it goes first.
        let _ = self.order_client.shutdown().await;
        let _ = self.order_store_client.shutdown().await;
        let _ = self.product_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Order system shutdown complete");
        Ok(())
    }
}
