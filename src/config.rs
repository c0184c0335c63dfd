use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认每次测验抽取的题目数量
pub const DEFAULT_QUIZ_SIZE: usize = 10;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题目来源文档
    pub document_path: PathBuf,
    /// 每次测验抽取的题目数量
    pub quiz_size: usize,
    /// 批量抽取的文档目录（可选）
    pub documents_folder: Option<PathBuf>,
    /// 同时抽取的文档数量
    pub max_concurrent_extractions: usize,
    /// 成绩存储文件（TOML 平面文件）
    pub score_store_path: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("questions.pdf"),
            quiz_size: DEFAULT_QUIZ_SIZE,
            documents_folder: None,
            max_concurrent_extractions: 4,
            score_store_path: PathBuf::from("scores.toml"),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置或无法解析的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取配置，文件中缺失的项使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 完整加载流程：`QUIZ_CONFIG` 指向的文件（如果有）→ 环境变量覆盖 → 校验
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("QUIZ_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            document_path: std::env::var("QUIZ_DOCUMENT_PATH").map(PathBuf::from).unwrap_or(self.document_path),
            quiz_size: std::env::var("QUIZ_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.quiz_size),
            documents_folder: std::env::var("QUIZ_DOCUMENTS_FOLDER").ok().map(PathBuf::from).or(self.documents_folder),
            max_concurrent_extractions: std::env::var("MAX_CONCURRENT_EXTRACTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_extractions),
            score_store_path: std::env::var("QUIZ_SCORE_STORE").map(PathBuf::from).unwrap_or(self.score_store_path),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_extractions == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_concurrent_extractions".to_string(),
                reason: "并发数必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}
