use anyhow::Result;
use global_mass_rollback::orchestrator::App;
use global_mass_rollback::utils::logging;
use global_mass_rollback::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 目标用户名：命令行参数优先，其次环境变量
    let username = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TARGET_USERNAME").ok())
        .unwrap_or_default();

    // 初始化并运行应用
    App::initialize(config)?.run(&username).await?;

    Ok(())
}
