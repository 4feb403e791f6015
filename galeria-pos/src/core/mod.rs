//! 核心模块 - 配置和应用状态
//!
//! - [`Config`] - 配置
//! - [`AppState`] - 应用状态

pub mod config;
pub mod state;

pub use config::Config;
pub use state::AppState;
