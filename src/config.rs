/// 程序配置
///
/// 启动时从环境变量（含 .env）读取；token、批大小与评论开关
/// 可在运行期通过设置菜单修改
use crate::models::Source;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// 上游 API 的 Bearer Token
    pub token: String,
    /// 每批请求的题目数量，避免单次 qids 过长导致失败或过慢
    pub batch_size: usize,
    /// 是否抓取评论，默认关闭以加快同步
    pub include_comments: bool,
    /// 是否增量同步，仅抓取本地不存在的新题
    pub incremental: bool,
    /// 本次同步选择的来源集合
    pub sources: HashSet<Source>,
    /// 数据文件路径
    pub data_file: String,
    /// v1 接口基础地址
    pub base_url: String,
    /// v2 接口基础地址
    pub base_url_v2: String,
    /// 每次下游调用后的固定延迟（毫秒）
    pub request_delay_ms: u64,
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            batch_size: 50,
            include_comments: false,
            incremental: false,
            sources: all_sources(),
            data_file: "data/errors.json".to_string(),
            base_url: "https://52kaoyan.top/api/v1".to_string(),
            base_url_v2: "https://52kaoyan.top/api/v2".to_string(),
            request_delay_ms: 200,
            timeout_secs: 15,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            token: std::env::var("TOKEN").unwrap_or(default.token),
            batch_size: std::env::var("BATCH_SIZE").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(default.batch_size),
            include_comments: std::env::var("INCLUDE_COMMENTS").map(|v| v == "1").unwrap_or(default.include_comments),
            incremental: std::env::var("INCREMENTAL").map(|v| v == "1").unwrap_or(default.incremental),
            sources: parse_sources(&std::env::var("SOURCES").unwrap_or_default()),
            data_file: std::env::var("DATA_FILE").unwrap_or(default.data_file),
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            base_url_v2: std::env::var("BASE_URL_V2").unwrap_or(default.base_url_v2),
            request_delay_ms: std::env::var("REQUEST_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_delay_ms),
            timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.timeout_secs),
        }
    }

    /// 下游调用之间的固定延迟
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

fn all_sources() -> HashSet<Source> {
    [Source::Simulation, Source::Real, Source::Famous]
        .into_iter()
        .collect()
}

/// 解析 SOURCES 环境变量，返回选择的来源集合
///
/// 支持别名：sim -> simulation, exam -> real, teacher -> famous。
/// 无法识别的项忽略；为空或全部无效时回落为全部来源。
pub fn parse_sources(val: &str) -> HashSet<Source> {
    let mut out = HashSet::new();
    for piece in val.split(',') {
        let source = match piece.trim().to_lowercase().as_str() {
            "simulation" | "sim" => Some(Source::Simulation),
            "real" | "exam" => Some(Source::Real),
            "famous" | "teacher" => Some(Source::Famous),
            _ => None,
        };
        if let Some(s) = source {
            out.insert(s);
        }
    }
    if out.is_empty() {
        all_sources()
    } else {
        out
    }
}
