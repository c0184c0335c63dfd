use crate::utils::logging::truncate_text;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 每道题固定的选项数量（标签 A-D 按位置隐含）
pub const OPTION_COUNT: usize = 4;

/// 经过校验的选择题
///
/// `correct_option` 按值保存（不是下标），且总是等于 `options` 中的某一项；
/// 不满足该约束的记录不会被构造出来。
///
/// 序列化为客户端使用的结构：`{"question": .., "options": [..], "answer": ..}`。
/// 注意正确答案会随抽样结果一起发给客户端（客户端依赖它评分），这不是安全特性。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireQuestion")]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    prompt: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "answer")]
    correct_option: String,
}

impl QuestionRecord {
    /// 由题干、四个选项和正确选项下标构造
    ///
    /// 题干为空或下标越界时返回 None。
    pub fn new(
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
    ) -> Option<Self> {
        let prompt = prompt.into();
        if prompt.is_empty() {
            return None;
        }
        let correct_option = options.get(correct_index)?.clone();
        Some(Self {
            prompt,
            options,
            correct_option,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    /// 判断提交的选项文本是否正确
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_option == answer
    }
}

impl fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [答案: {}]",
            truncate_text(&self.prompt, 80),
            self.correct_option
        )
    }
}

/// 客户端传回的原始结构，反序列化时先落到这里再校验
#[derive(Deserialize)]
struct WireQuestion {
    question: String,
    options: [String; OPTION_COUNT],
    answer: String,
}

impl TryFrom<WireQuestion> for QuestionRecord {
    type Error = String;

    fn try_from(wire: WireQuestion) -> Result<Self, Self::Error> {
        let index = wire
            .options
            .iter()
            .position(|o| *o == wire.answer)
            .ok_or_else(|| format!("答案 '{}' 不在选项中", wire.answer))?;
        QuestionRecord::new(wire.question, wire.options, index)
            .ok_or_else(|| "题干不能为空".to_string())
    }
}

/// 从一份文档中成功解析出的全部题目，保持文档顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet {
    records: Vec<QuestionRecord>,
}

impl QuestionSet {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }
}

impl FromIterator<QuestionRecord> for QuestionSet {
    fn from_iter<I: IntoIterator<Item = QuestionRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a QuestionRecord;
    type IntoIter = std::slice::Iter<'a, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> [String; OPTION_COUNT] {
        ["3", "4", "5", "6"].map(String::from)
    }

    #[test]
    fn test_new_copies_answer_by_value() {
        let record = QuestionRecord::new("What is 2+2?", options(), 1).unwrap();
        assert_eq!(record.correct_option(), "4");
        assert!(record.is_correct("4"));
        assert!(!record.is_correct("B"));
    }

    #[test]
    fn test_new_rejects_out_of_range_index_and_empty_prompt() {
        assert!(QuestionRecord::new("Q", options(), 4).is_none());
        assert!(QuestionRecord::new("", options(), 0).is_none());
    }

    #[test]
    fn test_wire_shape() {
        let record = QuestionRecord::new("What is 2+2?", options(), 1).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "question": "What is 2+2?",
                "options": ["3", "4", "5", "6"],
                "answer": "4"
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_answer_outside_options() {
        let value = json!({
            "question": "What is 2+2?",
            "options": ["3", "4", "5", "6"],
            "answer": "7"
        });
        assert!(serde_json::from_value::<QuestionRecord>(value).is_err());
    }

    #[test]
    fn test_question_set_serializes_as_array() {
        let set: QuestionSet = vec![QuestionRecord::new("Q", options(), 0).unwrap()]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&set).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["answer"], "3");
    }
}
