//! 上游题目归一化
//!
//! 三个来源（模拟卷、真题、名师）返回的题目详情字段一致，
//! 统一映射为本地 Question 结构。

use crate::models::{AnswerOption, Question, Source, UserStatus};
use serde_json::Value;

const OPTION_KEYS: [(&str, &str); 4] = [("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")];

/// 把一条原始题目详情归一化为 Question
///
/// 原始数据为空或缺少 id 时返回 None。title -> content，explain -> analysis，
/// a/b/c/d 中存在的项按固定顺序映射为 A-D 选项。
pub fn normalize(raw: &Value, source: Source, origin_name: &str, sub_name: &str) -> Option<Question> {
    let obj = raw.as_object()?;
    if obj.is_empty() {
        return None;
    }
    let id = obj.get("id").and_then(|v| v.as_i64())?;

    let mut options = Vec::new();
    for (key, label) in OPTION_KEYS {
        if let Some(content) = obj.get(key).and_then(|v| v.as_str()) {
            if !content.is_empty() {
                options.push(AnswerOption {
                    label: label.to_string(),
                    content: content.to_string(),
                });
            }
        }
    }

    let correct_raw = match obj.get("correct") {
        Some(Value::String(s)) => s.clone(),
        // 上游偶尔把纯数字答案编码成 JSON number
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Some(Question {
        id,
        origin_name: origin_name.to_string(),
        sub_name: sub_name.to_string(),
        content: obj.get("title").and_then(|v| v.as_str()).unwrap_or("").to_string(),
        options,
        answer: decode_answer(&correct_raw),
        analysis: obj.get("explain").and_then(|v| v.as_str()).unwrap_or("").to_string(),
        comments: Vec::new(),
        question_type: obj.get("type").and_then(|v| v.as_i64()).unwrap_or(0),
        user_status: UserStatus::New,
        last_reviewed: None,
        source: Some(source),
    })
}

/// 解码上游的 correct 字段
///
/// 上游对多选答案的编码并不一致，存在两种互斥的形式，必须原样保留：
/// - 纯数字串：每个数字是 1 起始的选项下标，映射到 A-D；越界数字静默丢弃
/// - 其他：按逗号切分，每段去空白后大写直接作为选项字母
pub fn decode_answer(correct_raw: &str) -> Vec<String> {
    let trimmed = correct_raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let labels = ["A", "B", "C", "D"];
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        trimmed
            .chars()
            .filter_map(|digit| {
                let idx = digit.to_digit(10)? as usize;
                (1..=labels.len())
                    .contains(&idx)
                    .then(|| labels[idx - 1].to_string())
            })
            .collect()
    } else {
        trimmed
            .split(',')
            .map(|piece| piece.trim().to_uppercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_answer_maps_digits_to_labels() {
        assert_eq!(decode_answer("13"), vec!["A", "C"]);
        assert_eq!(decode_answer("2"), vec!["B"]);
    }

    #[test]
    fn letter_answer_splits_on_commas() {
        assert_eq!(decode_answer("b,d"), vec!["B", "D"]);
        assert_eq!(decode_answer(" a , c "), vec!["A", "C"]);
    }

    #[test]
    fn out_of_range_digits_are_dropped() {
        assert_eq!(decode_answer("5"), Vec::<String>::new());
        assert_eq!(decode_answer("105"), vec!["A"]);
    }

    #[test]
    fn empty_answer_decodes_to_empty() {
        assert_eq!(decode_answer(""), Vec::<String>::new());
        assert_eq!(decode_answer("  "), Vec::<String>::new());
    }

    #[test]
    fn normalize_maps_all_fields() {
        let raw = json!({
            "id": 101,
            "title": "下列说法正确的是？",
            "a": "甲",
            "b": "乙",
            "d": "丁",
            "correct": "b,d",
            "explain": "见教材第三章",
            "type": 2
        });
        let q = normalize(&raw, Source::Simulation, "模拟卷一", "第一套").unwrap();
        assert_eq!(q.id, 101);
        assert_eq!(q.content, "下列说法正确的是？");
        assert_eq!(q.analysis, "见教材第三章");
        assert_eq!(q.question_type, 2);
        assert_eq!(q.user_status, UserStatus::New);
        assert_eq!(q.source, Some(Source::Simulation));
        // c 缺失，但 a/b/d 保持固定顺序
        let labels: Vec<&str> = q.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "D"]);
        assert_eq!(q.answer, vec!["B", "D"]);
    }

    #[test]
    fn missing_title_yields_empty_content() {
        let raw = json!({"id": 1, "correct": "1"});
        let q = normalize(&raw, Source::Real, "真题", "").unwrap();
        assert_eq!(q.content, "");
        assert_eq!(q.answer, vec!["A"]);
    }

    #[test]
    fn empty_raw_is_rejected() {
        assert!(normalize(&json!({}), Source::Real, "x", "").is_none());
        assert!(normalize(&json!(null), Source::Real, "x", "").is_none());
        // 没有 id 的详情无法入库
        assert!(normalize(&json!({"title": "t"}), Source::Real, "x", "").is_none());
    }
}
