//! 错题数据模型
//!
//! 定义本地数据文件（errors.json）的完整结构

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 单个选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// 选项字母（A/B/C/D）
    pub label: String,
    /// 选项内容
    pub content: String,
}

/// 复习状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    New,
    Reviewing,
    Mastered,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::New => write!(f, "New"),
            UserStatus::Reviewing => write!(f, "Reviewing"),
            UserStatus::Mastered => write!(f, "Mastered"),
        }
    }
}

impl FromStr for UserStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(UserStatus::New),
            "reviewing" => Ok(UserStatus::Reviewing),
            "mastered" => Ok(UserStatus::Mastered),
            _ => Err(()),
        }
    }
}

/// 题目来源类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Simulation,
    Real,
    Famous,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Simulation => write!(f, "simulation"),
            Source::Real => write!(f, "real"),
            Source::Famous => write!(f, "famous"),
        }
    }
}

impl FromStr for Source {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulation" => Ok(Source::Simulation),
            "real" => Ok(Source::Real),
            "famous" => Ok(Source::Famous),
            _ => Err(()),
        }
    }
}

/// 归一化后的单个题目
///
/// 各字段均带默认值，兼容缺少 `source`/`comments` 等字段的旧数据文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    /// 来源文档/班级标题
    #[serde(default)]
    pub origin_name: String,
    /// 子章节标题（可能为空）
    #[serde(default)]
    pub sub_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub answer: Vec<String>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub comments: Vec<String>,
    /// 上游题型编码
    #[serde(rename = "type", default)]
    pub question_type: i64,
    #[serde(default)]
    pub user_status: UserStatus,
    #[serde(default)]
    pub last_reviewed: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
}

/// 数据文件元信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub last_sync: Option<String>,
    pub version: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            last_sync: None,
            version: "1.0".to_string(),
        }
    }
}

/// 完整数据集：三个来源桶各一个有序列表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub simulation: Vec<Question>,
    #[serde(default)]
    pub real: Vec<Question>,
    #[serde(default)]
    pub famous: Vec<Question>,
}

impl Dataset {
    /// 题目总数
    pub fn total(&self) -> usize {
        self.simulation.len() + self.real.len() + self.famous.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Mastered).unwrap(),
            "\"mastered\""
        );
        let s: UserStatus = serde_json::from_str("\"reviewing\"").unwrap();
        assert_eq!(s, UserStatus::Reviewing);
    }

    #[test]
    fn legacy_question_without_source_parses() {
        // 旧数据文件没有 source / comments 字段
        let raw = serde_json::json!({
            "id": 42,
            "origin_name": "某试卷",
            "sub_name": "",
            "content": "题干",
            "options": [{"label": "A", "content": "选项A"}],
            "answer": ["A"],
            "analysis": "解析",
            "type": 1,
            "user_status": "new",
            "last_reviewed": null
        });
        let q: Question = serde_json::from_value(raw).unwrap();
        assert_eq!(q.id, 42);
        assert!(q.source.is_none());
        assert!(q.comments.is_empty());
        assert_eq!(q.user_status, UserStatus::New);
    }

    #[test]
    fn empty_dataset_has_default_meta() {
        let d = Dataset::default();
        assert_eq!(d.meta.version, "1.0");
        assert!(d.meta.last_sync.is_none());
        assert_eq!(d.total(), 0);
    }
}
