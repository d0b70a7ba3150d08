use std::path::PathBuf;
use thiserror::Error;

/// 数据文件读写错误
///
/// 读取路径上的错误不会向上传播（load 回落为空数据集），
/// 写入失败则由调用方决定如何汇报
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("写入数据文件失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("创建数据目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("序列化数据失败: {0}")]
    Serialize(#[from] serde_json::Error),
}
