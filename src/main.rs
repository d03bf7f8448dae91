use anyhow::{Context, Result};
use report_extract::config::DEFAULT_CONFIG_PATH;
use report_extract::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("加载配置失败: {}", config_path))?;

    // 初始化日志
    logger::init(config.log_level, &config.log_file)?;

    // 初始化并运行应用
    let app = App::initialize(config).context("初始化失败")?;
    let _summary = app.run().await.context("写出结果失败")?;

    Ok(())
}
