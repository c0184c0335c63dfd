use anyhow::{Context, Result};
use mock_test_quiz::utils::logging;
use mock_test_quiz::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（第一个参数可覆盖题目文档路径）
    let mut config = Config::load().context("加载配置失败")?;
    if let Some(path) = std::env::args().nth(1) {
        config.document_path = path.into();
    }

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::init_log_file(&config.output_log_file)?;

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let quiz = app
        .run()
        .await
        .context("没有可用的测验：题目文档无法读取")?;

    println!("{}", serde_json::to_string_pretty(&quiz)?);

    Ok(())
}
