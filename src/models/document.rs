//! 文档句柄与原始题块

use std::fmt;
use std::path::{Path, PathBuf};

/// 文档句柄
///
/// 显式传入每次抽取调用，不存在隐式的默认文档路径。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
    path: PathBuf,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 小写的扩展名（无扩展名时返回 None）
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// 用于日志显示的文件名
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// 原始题块：属于同一道候选题目的文本行，由分段器产生、解析器消费，不做保留
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    lines: Vec<String>,
}

impl RawBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// 从一段文本构建：先去掉首尾空白，再按行切分（块内的空行保留）
    pub fn from_segment(segment: &str) -> Self {
        let lines = segment.trim().lines().map(str::to_string).collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
