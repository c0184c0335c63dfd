//! 测验会话
//!
//! 会话由外部应用持有：创建于用户请求测验时，成绩记录后即丢弃，核心不做持久化。

use crate::models::question::QuestionRecord;
use crate::models::score::UserIdentity;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 一次测验会话
#[derive(Debug, Clone, Serialize)]
pub struct QuizSession {
    pub id: u64,
    pub user: UserIdentity,
    pub questions: Vec<QuestionRecord>,
    pub created_at: DateTime<Utc>,
}

/// 评分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub score: u32,
    pub total: u32,
}

impl QuizSession {
    pub fn new(id: u64, user: UserIdentity, questions: Vec<QuestionRecord>) -> Self {
        Self {
            id,
            user,
            questions,
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 按位置比对提交的选项文本
    ///
    /// 缺少的答案计为错误，多出的答案忽略。
    pub fn grade<S: AsRef<str>>(&self, answers: &[S]) -> QuizOutcome {
        let score = self
            .questions
            .iter()
            .zip(answers)
            .filter(|&(question, answer)| question.is_correct(answer.as_ref()))
            .count();
        QuizOutcome {
            score: score as u32,
            total: self.questions.len() as u32,
        }
    }
}
