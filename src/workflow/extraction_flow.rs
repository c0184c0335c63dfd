//! 题目集合抽取流程 - 流程层
//!
//! 流程顺序：
//! 1. 读取文档全文（Loader）
//! 2. 切分题块（Segmenter）
//! 3. 逐块解析（Parser），丢弃被拒绝的题块
//!
//! 每次调用都重新构建，不做跨请求缓存；相同文档内容得到相同结果。

use crate::error::LoadError;
use crate::infrastructure::DocumentLoader;
use crate::models::{DocumentHandle, QuestionSet};
use crate::services::{
    DuplicateOption, MalformedOption, ParseRejection, QuestionRecordParser, QuestionSegmenter,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单个题块的拒绝记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBlock {
    /// 题块在文档中的序号（从 1 开始）
    pub block_index: usize,
    pub reason: ParseRejection,
}

/// 单个题块的选项异常提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionWarning {
    pub block_index: usize,
    pub option: MalformedOption,
}

/// 单个题块的重复选项提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateWarning {
    pub block_index: usize,
    pub option: DuplicateOption,
}

/// 抽取报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub questions: QuestionSet,
    pub blocks_seen: usize,
    pub rejected: Vec<RejectedBlock>,
    pub option_warnings: Vec<OptionWarning>,
    pub duplicate_warnings: Vec<DuplicateWarning>,
}

/// 题目集合抽取器
///
/// - 只持有读取能力（Loader），不持有可变状态
/// - 可以在多个线程上同时对同一文档调用
#[derive(Clone)]
pub struct QuestionSetExtractor {
    loader: Arc<dyn DocumentLoader>,
    segmenter: QuestionSegmenter,
    parser: QuestionRecordParser,
}

impl QuestionSetExtractor {
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self {
            loader,
            segmenter: QuestionSegmenter::new(),
            parser: QuestionRecordParser::new(),
        }
    }

    /// 抽取文档中的全部合法题目
    ///
    /// 文档无法读取时返回 [`LoadError`]，不会返回部分结果。
    pub fn extract(&self, handle: &DocumentHandle) -> Result<QuestionSet, LoadError> {
        self.extract_with_report(handle).map(|report| report.questions)
    }

    /// 抽取并返回题块级别的统计
    pub fn extract_with_report(&self, handle: &DocumentHandle) -> Result<ExtractionReport, LoadError> {
        let text = self.loader.load_text(handle)?;
        let report = self.extract_from_text(&text);

        info!(
            "📄 {}: 题块 {} 个，有效题目 {} 道，丢弃 {} 个",
            handle.display_name(),
            report.blocks_seen,
            report.questions.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// 对已经读出的全文执行分段 + 解析
    pub fn extract_from_text(&self, text: &str) -> ExtractionReport {
        let blocks = self.segmenter.segment(text);
        let mut report = ExtractionReport {
            blocks_seen: blocks.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(blocks.len());

        for (idx, block) in blocks.iter().enumerate() {
            let block_index = idx + 1;
            match self.parser.parse_with_diagnostics(block) {
                Ok(parsed) => {
                    for option in parsed.malformed_options {
                        warn!(
                            "⚠️ 题块 {} 选项 {} 内容为空: '{}'",
                            block_index,
                            option.label(),
                            option.line
                        );
                        report.option_warnings.push(OptionWarning {
                            block_index,
                            option,
                        });
                    }
                    for option in parsed.duplicate_options {
                        warn!(
                            "⚠️ 题块 {} 选项 {} 与选项 {} 相同: '{}'",
                            block_index,
                            option.label(),
                            option.first_label(),
                            option.text
                        );
                        report.duplicate_warnings.push(DuplicateWarning {
                            block_index,
                            option,
                        });
                    }
                    records.push(parsed.record);
                }
                Err(reason) => {
                    debug!("丢弃题块 {}: {}", block_index, reason);
                    report.rejected.push(RejectedBlock {
                        block_index,
                        reason,
                    });
                }
            }
        }

        report.questions = QuestionSet::new(records);
        report
    }
}
