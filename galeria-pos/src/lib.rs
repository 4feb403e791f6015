//! Galería POS - table-tab core for a café/ceramics shop
//!
//! # 架构概述
//!
//! - **桌台订单** (`orders`): per-table tabs, persisted in redb, settled at checkout
//! - **销售历史** (`history`): daily activity and week/month totals
//! - **服务** (`services`): catalog and sales backends (HTTP)
//! - **核心** (`core`): configuration and application state
//!
//! # 模块结构
//!
//! ```text
//! galeria-pos/src/
//! ├── core/          # 配置、状态
//! ├── history/       # 销售历史、日/周/月汇总
//! ├── orders/        # 桌台订单、存储、结账
//! ├── services/      # 后端协作接口
//! └── utils/         # 日志
//! ```

pub mod core;
pub mod history;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{AppState, Config};
pub use history::{PeriodView, SalesHistory};
pub use orders::{CheckoutCoordinator, SelectionSheet, TableOrderStore};
pub use services::{CatalogProvider, GatewayError, SalesGateway};

// Re-export logger functions
pub use utils::logger::{LogGuard, init_logger, init_logger_with_file};

/// Load `.env` and start logging
///
/// The returned guard must outlive the process's last log line.
pub fn setup_environment() -> (Config, LogGuard) {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    let guard = init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    (config, guard)
}

pub fn print_banner() {
    println!(
        r#"
   ______      __          __
  / ____/___ _/ /__  _____(_)___ _
 / / __/ __ `/ / _ \/ ___/ / __ `/
/ /_/ / /_/ / /  __/ /  / / /_/ /
\____/\__,_/_/\___/_/  /_/\__,_/
    "#
    );
}
