//! 三个来源的错题遍历器
//!
//! 模拟卷（type 5）按 试卷 -> 分卷 展开；真题（type 4）只有试卷一层；
//! 名师（type 3）按 班级 -> 书目 -> 章节 展开。三者共享同一条
//! 解析 qid -> 增量过滤 -> 分批抓详情 -> 归一化 的流水线。

use crate::api::{get_question_details_batched, ApiClient};
use crate::config::Config;
use crate::models::{Question, Source};
use crate::scraper::normalize::normalize;
use serde_json::Value;
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::info;

/// 抓取模拟卷错题（type 5）
pub async fn fetch_simulation(
    client: &ApiClient,
    config: &Config,
    existing: &HashSet<i64>,
) -> Vec<Question> {
    info!("Fetching Simulation Errors (Type 5)...");
    let mut all_questions = Vec::new();

    for paper in client.get_error_list(5).await {
        let origin_name = str_field(&paper, "name", "Unknown Paper");
        let rolls = paper
            .get("list")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        for roll in rolls {
            let sub_name = str_field(&roll, "name", "Unknown Roll");
            let qids = parse_qids(roll.get("qids").and_then(|v| v.as_str()).unwrap_or(""));
            let batch = collect_questions(
                client,
                config,
                qids,
                existing,
                Source::Simulation,
                &origin_name,
                &sub_name,
            )
            .await;
            all_questions.extend(batch);
        }
    }
    all_questions
}

/// 抓取真题错题（type 4），没有分卷，sub_name 为空
pub async fn fetch_real(
    client: &ApiClient,
    config: &Config,
    existing: &HashSet<i64>,
) -> Vec<Question> {
    info!("Fetching Real Exam Errors (Type 4)...");
    let mut all_questions = Vec::new();

    for paper in client.get_error_list(4).await {
        let origin_name = str_field(&paper, "name", "Unknown Real Exam");
        let qids = parse_qids(paper.get("qids").and_then(|v| v.as_str()).unwrap_or(""));
        let batch = collect_questions(
            client,
            config,
            qids,
            existing,
            Source::Real,
            &origin_name,
            "",
        )
        .await;
        all_questions.extend(batch);
    }
    all_questions
}

/// 抓取名师错题（type 3）：班级 -> 书目 -> 章节
pub async fn fetch_famous(
    client: &ApiClient,
    config: &Config,
    existing: &HashSet<i64>,
) -> Vec<Question> {
    info!("Fetching Famous Teacher Errors (Type 3)...");
    let mut all_questions = Vec::new();

    for class_item in client.get_error_list(3).await {
        let origin_name = str_field(&class_item, "name", "Unknown Famous Teacher Class");
        let class_id = match class_item.get("id").and_then(|v| v.as_i64()) {
            Some(id) => id,
            None => continue,
        };

        let mut books = client.get_books(class_id).await;
        if books.is_empty() {
            // 没有书目时上游仍可按默认书查询
            books = vec![serde_json::json!({"id": 1, "name": "Default Book"})];
        }

        for book in books {
            let book_id = match book.get("id").and_then(|v| v.as_i64()) {
                Some(id) => id,
                None => continue,
            };

            for chapter in client.get_famous_by_error(class_id, book_id).await {
                let sub_name = str_field(&chapter, "name", "Unknown Chapter");
                let qids: Vec<i64> = chapter
                    .get("questions")
                    .and_then(|v| v.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|item| item.get("qId").and_then(|v| v.as_i64()))
                            .collect()
                    })
                    .unwrap_or_default();
                let batch = collect_questions(
                    client,
                    config,
                    qids,
                    existing,
                    Source::Famous,
                    &origin_name,
                    &sub_name,
                )
                .await;
                all_questions.extend(batch);
            }
        }
    }
    all_questions
}

/// 过滤已有 ID，分批抓详情并归一化，必要时附加评论
async fn collect_questions(
    client: &ApiClient,
    config: &Config,
    mut qids: Vec<i64>,
    existing: &HashSet<i64>,
    source: Source,
    origin_name: &str,
    sub_name: &str,
) -> Vec<Question> {
    qids.retain(|qid| !existing.contains(qid));
    if qids.is_empty() {
        return Vec::new();
    }

    let details =
        get_question_details_batched(client, &qids, config.batch_size, config.request_delay())
            .await;

    let mut questions = Vec::new();
    for raw in &details {
        if let Some(mut question) = normalize(raw, source, origin_name, sub_name) {
            if config.include_comments {
                sleep(config.request_delay()).await;
                question.comments = client.get_comments(question.id).await;
            }
            questions.push(question);
        }
    }
    questions
}

/// 解析逗号拼接的 qid 串，非数字片段跳过
fn parse_qids(qids_str: &str) -> Vec<i64> {
    qids_str
        .split(',')
        .filter_map(|piece| piece.trim().parse::<i64>().ok())
        .collect()
}

fn str_field(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_qids_skips_garbage() {
        assert_eq!(parse_qids("1, 2,abc, 3"), vec![1, 2, 3]);
        assert_eq!(parse_qids(""), Vec::<i64>::new());
    }
}
