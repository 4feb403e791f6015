use std::path::PathBuf;

/// POS configuration
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (redb 文件) |
/// | API_BASE_URL | https://backgaleriacafe.onrender.com/api | 后端地址 |
/// | REQUEST_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (未设置时输出到 stdout) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/galeria API_BASE_URL=http://localhost:4000/api cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储 redb 数据库
    pub work_dir: String,
    /// Backend API root
    pub api_base_url: String,
    /// 请求超时时间 (秒)
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| galeria_client::config::DEFAULT_BASE_URL.into()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义工作目录覆盖配置 (测试用)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Path of the table-order database
    pub fn table_orders_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("table_orders.redb")
    }

    pub fn client_config(&self) -> galeria_client::ClientConfig {
        galeria_client::ClientConfig::new(&self.api_base_url)
            .with_timeout(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
