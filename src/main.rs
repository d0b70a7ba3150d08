use anyhow::Result;
use error_tk::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 就近加载 .env，找不到也不报错
    let _ = dotenv::dotenv();

    // 初始化日志
    error_tk::logger::init();

    // 加载配置
    let config = Config::from_env();

    // 运行交互式界面
    App::new(config).run().await?;

    Ok(())
}
