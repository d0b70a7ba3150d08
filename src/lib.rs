//! # ErrorTK
//!
//! 个人错题学习工具：从上游题库 API 抓取做错的题目，归一化后存入
//! 本地 JSON 文件，并提供文本菜单浏览、过滤、复习与掌握度标记。
//!
//! ## 模块结构
//!
//! - `api` - 上游 HTTP 客户端与分批抓取
//! - `scraper` - 三个来源的遍历器、归一化与同步编排
//! - `store` - 本地数据文件读写与状态点更新
//! - `app` - 交互式菜单界面
//! - `config` - 环境变量配置，部分项可在运行期修改
//!
//! 数据流：app -> scraper -> (api, normalize) -> 合并数据集 -> store

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod scraper;
pub mod store;

// 重新导出常用类型
pub use api::{ApiClient, ApiVersion};
pub use app::App;
pub use config::Config;
pub use error::StoreError;
pub use models::{AnswerOption, Dataset, Meta, Question, Source, UserStatus};
pub use scraper::fetch_all_sources;
pub use store::Store;
