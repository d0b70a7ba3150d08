//! 同步编排
//!
//! 依次运行选中的来源遍历器，合并为完整数据集。增量模式下以本地
//! 数据为底，只抓取并追加本地没有的新题。

pub mod normalize;
pub mod sources;

pub use normalize::{decode_answer, normalize};

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{Dataset, Source};
use crate::store::Store;
use chrono::Utc;
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::info;

/// 各桶已有题目 ID，用于增量同步过滤
#[derive(Debug, Default)]
pub struct BucketIds {
    pub simulation: HashSet<i64>,
    pub real: HashSet<i64>,
    pub famous: HashSet<i64>,
}

impl BucketIds {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            simulation: dataset.simulation.iter().map(|q| q.id).collect(),
            real: dataset.real.iter().map(|q| q.id).collect(),
            famous: dataset.famous.iter().map(|q| q.id).collect(),
        }
    }

    fn bucket(&self, source: Source) -> &HashSet<i64> {
        match source {
            Source::Simulation => &self.simulation,
            Source::Real => &self.real,
            Source::Famous => &self.famous,
        }
    }
}

/// 运行一次完整同步，返回合并后的数据集
///
/// 全量模式下从空数据集开始；增量模式下先读本地数据集，已有 ID 不再
/// 抓取，新题追加到对应桶尾部。meta.last_sync 记为当前 UTC 时间。
pub async fn fetch_all_sources(client: &ApiClient, config: &Config, store: &Store) -> Dataset {
    let mut dataset = if config.incremental {
        store.load()
    } else {
        Dataset::default()
    };
    let existing = if config.incremental {
        BucketIds::of(&dataset)
    } else {
        BucketIds::default()
    };

    dataset.meta.last_sync = Some(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());
    dataset.meta.version = "1.0".to_string();

    let mut selected: Vec<String> = config.sources.iter().map(|s| s.to_string()).collect();
    selected.sort();
    info!(
        "Selected sources: {:?} | INCLUDE_COMMENTS={} | INCREMENTAL={}",
        selected, config.include_comments, config.incremental
    );

    if config.sources.contains(&Source::Simulation) {
        let questions =
            sources::fetch_simulation(client, config, existing.bucket(Source::Simulation)).await;
        info!("Collected simulation: {}", questions.len());
        dataset.simulation.extend(questions);
        sleep(config.request_delay()).await;
    }

    if config.sources.contains(&Source::Real) {
        let questions = sources::fetch_real(client, config, existing.bucket(Source::Real)).await;
        info!("Collected real: {}", questions.len());
        dataset.real.extend(questions);
        sleep(config.request_delay()).await;
    }

    if config.sources.contains(&Source::Famous) {
        let questions =
            sources::fetch_famous(client, config, existing.bucket(Source::Famous)).await;
        info!("Collected famous: {}", questions.len());
        dataset.famous.extend(questions);
    }

    dataset
}
