use std::sync::Arc;

use anyhow::Context;

use crate::core::Config;
use crate::history::SalesHistory;
use crate::orders::{CheckoutCoordinator, RedbKvStore, TableOrderStore};
use crate::services::{CatalogProvider, SalesGateway};

/// 应用状态 - 持有所有服务的共享引用
///
/// Built once at startup and handed to every consumer; cloning is cheap.
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | table_orders | Arc<TableOrderStore> | 桌台订单 |
/// | catalog | Arc<dyn CatalogProvider> | 商品目录 |
/// | sales | Arc<dyn SalesGateway> | 销售接口 |
/// | checkout | Arc<CheckoutCoordinator> | 结账 |
/// | history | Arc<SalesHistory> | 销售历史 |
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub table_orders: Arc<TableOrderStore>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub sales: Arc<dyn SalesGateway>,
    pub checkout: Arc<CheckoutCoordinator>,
    pub history: Arc<SalesHistory>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("table_orders", &self.table_orders)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Open storage under `work_dir` and connect to the backend
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("creating work dir {}", config.work_dir))?;

        let db_path = config.table_orders_db_path();
        let kv = RedbKvStore::open(&db_path)
            .with_context(|| format!("opening {}", db_path.display()))?;
        let client = Arc::new(config.client_config().build_http_client()?);

        Ok(Self::with_services(
            config.clone(),
            Arc::new(TableOrderStore::load(Arc::new(kv))),
            client.clone(),
            client,
        ))
    }

    pub fn with_services(
        config: Config,
        table_orders: Arc<TableOrderStore>,
        catalog: Arc<dyn CatalogProvider>,
        sales: Arc<dyn SalesGateway>,
    ) -> Self {
        let checkout = Arc::new(CheckoutCoordinator::new(
            table_orders.clone(),
            sales.clone(),
            catalog.clone(),
        ));
        let history = Arc::new(SalesHistory::new(sales.clone()));
        Self {
            config,
            table_orders,
            catalog,
            sales,
            checkout,
            history,
        }
    }
}
