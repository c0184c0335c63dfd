//! 题块分段服务 - 业务能力层
//!
//! 只负责把整篇文本切成候选题块，不判断题块是否合法

use crate::models::RawBlock;
use regex::Regex;
use std::sync::LazyLock;

/// 行首的题号标记：数字 + "." + 至少一个空白
///
/// 模式是常量，不会在运行时编译失败
static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+").unwrap());

/// 题块分段器
///
/// 职责：
/// - 在每个题号标记处切分全文
/// - 丢弃第一个标记之前的内容（标题/页眉）
/// - 每段去掉首尾空白后按行拆分
#[derive(Debug, Default, Clone, Copy)]
pub struct QuestionSegmenter;

impl QuestionSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// 切分全文；没有任何题号标记时返回空列表
    pub fn segment(&self, text: &str) -> Vec<RawBlock> {
        QUESTION_MARKER
            .split(text)
            .skip(1)
            .map(RawBlock::from_segment)
            .collect()
    }
}
