//! 本地数据文件读写
//!
//! 数据集整体存放在一个 JSON 文件里。读失败一律回落为空数据集并记日志，
//! 写入为整文件重写（非原子，工具不支持并发运行）。

use crate::error::StoreError;
use crate::models::{Dataset, UserStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取数据集
    ///
    /// 文件不存在返回空数据集；解析失败记日志后同样返回空数据集，
    /// 绝不向调用方传播
    pub fn load(&self) -> Dataset {
        if !self.path.exists() {
            return Dataset::default();
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Error loading data from {}: {}", self.path.display(), e);
                return Dataset::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Error loading data from {}: {}", self.path.display(), e);
                Dataset::default()
            }
        }
    }

    /// 保存数据集：必要时建父目录，pretty 打印，非 ASCII 字符按字面写出
    pub fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(dataset)?;
        fs::write(&self.path, json).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// 更新某一道题的复习状态
    ///
    /// 按 simulation -> real -> famous 顺序线性扫描，命中第一个 id 即止；
    /// 命中后同时刷新 last_reviewed 并落盘。未命中返回 false 且不写文件。
    pub fn update_status(&self, question_id: i64, new_status: UserStatus) -> Result<bool, StoreError> {
        let mut dataset = self.load();
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();

        let mut found = false;
        'outer: for bucket in [
            &mut dataset.simulation,
            &mut dataset.real,
            &mut dataset.famous,
        ] {
            for question in bucket.iter_mut() {
                if question.id == question_id {
                    question.user_status = new_status;
                    question.last_reviewed = Some(timestamp);
                    found = true;
                    break 'outer;
                }
            }
        }

        if found {
            self.save(&dataset)?;
        }
        Ok(found)
    }
}
