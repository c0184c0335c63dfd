use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档加载错误
    #[error("文档加载错误: {0}")]
    Load(#[from] LoadError),
    /// 存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 成绩记录错误
    #[error("成绩错误: {0}")]
    Score(#[from] ScoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 后台任务错误（spawn_blocking / spawn 失败）
    #[error("任务执行失败: {0}")]
    Task(String),
}

/// 文档加载错误
///
/// 对当前抽取调用是致命的：调用方应视为"没有可用的测验"，而不是空测验。
#[derive(Debug, Error)]
pub enum LoadError {
    /// 文件不存在
    #[error("文档不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文档失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 文档结构损坏（无法解析 PDF 或文本不是 UTF-8）
    #[error("文档结构损坏 ({}): {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
    /// 不支持的文档格式
    #[error("不支持的文档格式: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// 键值存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读取存储文件失败
    #[error("读取存储失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入存储文件失败
    #[error("写入存储失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 存储文件内容无法解析
    #[error("存储文件解析失败 ({}): {message}", path.display())]
    Malformed { path: PathBuf, message: String },
    /// 值序列化/反序列化失败
    #[error("存储值编码失败 (key: {key}): {source}")]
    Encoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// 锁被毒化
    #[error("存储锁已失效")]
    Poisoned,
}

/// 成绩记录错误
#[derive(Debug, Error)]
pub enum ScoreError {
    /// 得分大于总分
    #[error("得分 {score} 超过总分 {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },
    /// 底层存储失败
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 配置项取值不合法
    #[error("配置项 {name} 取值不合法: {reason}")]
    InvalidValue { name: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl LoadError {
    /// 根据 io::Error 的类型构造加载错误（NotFound 单独区分）
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path }
        } else {
            LoadError::ReadFailed { path, source }
        }
    }

    /// 创建文档损坏错误
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LoadError::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
