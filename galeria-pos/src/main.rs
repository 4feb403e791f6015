use galeria_pos::{AppState, print_banner, setup_environment};

fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志) 并加载配置
    let (config, log_guard) = setup_environment();

    print_banner();

    tracing::info!(
        environment = %config.environment,
        api = %config.api_base_url,
        file_logging = log_guard.writes_to_file(),
        "Galería POS starting..."
    );

    // 2. 初始化应用状态 (redb 恢复桌台订单)
    let state = AppState::initialize(&config)?;

    // 3. 打印未结桌台
    let open = state.table_orders.list_active();
    if open.is_empty() {
        tracing::info!("No open tables");
    }
    for order in &open {
        tracing::info!(
            table = order.table_number,
            lines = order.items.len(),
            units = order.unit_count(),
            total = order.total,
            last_updated = %order.last_updated,
            "Open table"
        );
    }

    Ok(())
}
