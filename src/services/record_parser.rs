//! 题目解析服务 - 业务能力层
//!
//! 把单个原始题块转换为校验过的题目记录，或者拒绝它。
//! 拒绝不是错误：题块直接丢弃，只体现为题目集合变小。

use crate::models::{QuestionRecord, RawBlock, OPTION_COUNT};
use std::fmt;

/// 一个题块最少的行数：1 行题干 + 4 行选项
pub const MIN_BLOCK_LINES: usize = 1 + OPTION_COUNT;

/// 选项行开头按位置去掉的标签长度（如 "A." / "B)"）
const LABEL_WIDTH: usize = 2;

/// 答案行的标记（区分大小写）
const ANSWER_MARKER: &str = "Answer";

/// 题块被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRejection {
    /// 行数不足
    TooFewLines { found: usize },
    /// 题干为空
    EmptyPrompt,
    /// 没有包含 "Answer" 的行
    MissingAnswerLine,
    /// 答案字母不在 A-D 之内
    UnknownAnswerLetter { letter: String },
}

impl fmt::Display for ParseRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseRejection::TooFewLines { found } => {
                write!(f, "行数不足: {} < {}", found, MIN_BLOCK_LINES)
            }
            ParseRejection::EmptyPrompt => write!(f, "题干为空"),
            ParseRejection::MissingAnswerLine => write!(f, "缺少答案行"),
            ParseRejection::UnknownAnswerLetter { letter } => {
                write!(f, "无法识别的答案字母: '{}'", letter)
            }
        }
    }
}

/// 选项文本异常（只做提示，不拒绝题块）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedOption {
    /// 选项位置（0-3）
    pub position: usize,
    /// 原始选项行
    pub line: String,
}

impl MalformedOption {
    /// 选项的位置标签（A-D）
    pub fn label(&self) -> char {
        position_label(self.position)
    }
}

/// 与前面某个选项文本相同（只做提示，不拒绝题块）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOption {
    /// 重复选项的位置（0-3）
    pub position: usize,
    /// 第一次出现相同文本的位置
    pub first_position: usize,
    pub text: String,
}

impl DuplicateOption {
    pub fn label(&self) -> char {
        position_label(self.position)
    }

    pub fn first_label(&self) -> char {
        position_label(self.first_position)
    }
}

/// 解析成功的题块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBlock {
    pub record: QuestionRecord,
    pub malformed_options: Vec<MalformedOption>,
    pub duplicate_options: Vec<DuplicateOption>,
}

/// 题目解析器
///
/// 依次检查（任意一步失败即拒绝）：
/// 1. 题块至少 5 行
/// 2. 第 1 行去空白后作为题干
/// 3. 第 2-5 行作为选项，按位置去掉开头 2 个字符（不校验标签字符本身）
/// 4. 第一个包含 "Answer" 的行（可以是题块中任意一行）
/// 5. 取该行最后一个 ":" 之后的内容，去空白并转大写
/// 6. 字母映射 A→0, B→1, C→2, D→3
#[derive(Debug, Default, Clone, Copy)]
pub struct QuestionRecordParser;

impl QuestionRecordParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析题块，只返回记录
    pub fn parse(&self, block: &RawBlock) -> Result<QuestionRecord, ParseRejection> {
        self.parse_with_diagnostics(block).map(|parsed| parsed.record)
    }

    /// 解析题块，同时返回选项异常提示
    pub fn parse_with_diagnostics(&self, block: &RawBlock) -> Result<ParsedBlock, ParseRejection> {
        let lines = block.lines();
        if lines.len() < MIN_BLOCK_LINES {
            return Err(ParseRejection::TooFewLines { found: lines.len() });
        }

        let prompt = lines[0].trim();
        if prompt.is_empty() {
            return Err(ParseRejection::EmptyPrompt);
        }

        let mut malformed_options = Vec::new();
        let options: [String; OPTION_COUNT] = std::array::from_fn(|position| {
            let line = &lines[position + 1];
            let text = strip_label(line);
            if text.is_empty() {
                malformed_options.push(MalformedOption {
                    position,
                    line: line.clone(),
                });
            }
            text
        });
        let duplicate_options = find_duplicates(&options);

        let answer_line = lines
            .iter()
            .find(|line| line.contains(ANSWER_MARKER))
            .ok_or(ParseRejection::MissingAnswerLine)?;

        let letter = answer_line
            .rsplit(':')
            .next()
            .unwrap_or_default()
            .trim()
            .to_uppercase();

        let index = letter_index(&letter).ok_or_else(|| ParseRejection::UnknownAnswerLetter {
            letter: letter.clone(),
        })?;

        let record =
            QuestionRecord::new(prompt, options, index).ok_or(ParseRejection::EmptyPrompt)?;

        Ok(ParsedBlock {
            record,
            malformed_options,
            duplicate_options,
        })
    }
}

/// 文本相同的选项只保留提示；正确答案按文本比较，重复项同样算对
fn find_duplicates(options: &[String; OPTION_COUNT]) -> Vec<DuplicateOption> {
    (1..OPTION_COUNT)
        .filter_map(|position| {
            let text = &options[position];
            options[..position]
                .iter()
                .position(|earlier| earlier == text)
                .map(|first_position| DuplicateOption {
                    position,
                    first_position,
                    text: text.clone(),
                })
        })
        .collect()
}

fn position_label(position: usize) -> char {
    (b'A' + position as u8) as char
}

/// 去掉行首空白后按字符位置删掉标签，再去掉两端空白
fn strip_label(line: &str) -> String {
    line.trim_start()
        .chars()
        .skip(LABEL_WIDTH)
        .collect::<String>()
        .trim()
        .to_string()
}

fn letter_index(letter: &str) -> Option<usize> {
    match letter {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        _ => None,
    }
}
