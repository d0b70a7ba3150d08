//! 分批抓取题目详情
//!
//! 把较长的 qid 列表切成固定大小的批次逐批请求，并在每次下游调用后
//! 固定延迟，给上游留出喘息时间。失败的批次不重试，直接丢弃。

use crate::api::client::ApiClient;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// 按批次获取题目详情
///
/// # 参数
/// - `qids`: 待抓取的题目 ID，保持输入顺序
/// - `batch_size`: 每批最多多少个 ID（至少为 1）
/// - `delay`: 每次下游调用后的固定延迟
///
/// # 返回
/// 成功批次的结果按输入顺序拼接；失败批次贡献为空
pub async fn get_question_details_batched(
    client: &ApiClient,
    qids: &[i64],
    batch_size: usize,
    delay: Duration,
) -> Vec<Value> {
    let batch_size = batch_size.max(1);
    let mut all_details = Vec::with_capacity(qids.len());

    for chunk in qids.chunks(batch_size) {
        let details = client.get_questions(chunk).await;
        if details.is_empty() && !chunk.is_empty() {
            warn!("本批 {} 个题目未取到详情，跳过", chunk.len());
        }
        all_details.extend(details);
        sleep(delay).await;
    }

    all_details
}
