//! 测验流程 - 流程层
//!
//! 一次测验的完整生命周期：
//! 1. 抽取题目集合 → 抽样 → 创建会话
//! 2. 用户提交答案 → 评分 → 记录成绩
//!
//! 会话本身由调用方持有，本流程不保存任何会话状态。

use crate::error::{AppResult, ScoreError};
use crate::models::{DocumentHandle, QuizOutcome, QuizSession, UserIdentity};
use crate::services::{QuizSampler, ScoreRecorder};
use crate::workflow::extraction_flow::QuestionSetExtractor;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 测验流程
pub struct QuizFlow {
    extractor: QuestionSetExtractor,
    sampler: QuizSampler,
    recorder: Arc<ScoreRecorder>,
    next_session_id: AtomicU64,
}

impl QuizFlow {
    pub fn new(
        extractor: QuestionSetExtractor,
        sampler: QuizSampler,
        recorder: Arc<ScoreRecorder>,
    ) -> Self {
        Self {
            extractor,
            sampler,
            recorder,
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn extractor(&self) -> &QuestionSetExtractor {
        &self.extractor
    }

    /// 为用户创建一次测验
    ///
    /// 文档无法读取时返回错误（"没有可用的测验"）；文档中没有合法题目时返回空会话。
    pub fn start_quiz<R: Rng + ?Sized>(
        &self,
        user: UserIdentity,
        document: &DocumentHandle,
        rng: &mut R,
    ) -> AppResult<QuizSession> {
        let set = self.extractor.extract(document)?;
        let questions = self.sampler.draw(&set, rng);

        if questions.is_empty() {
            warn!("⚠️ {} 中没有可用题目", document.display_name());
        }

        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        info!(
            "🎯 会话 #{} 已创建: {} 抽取 {}/{} 道题",
            id,
            user.email,
            questions.len(),
            set.len()
        );
        Ok(QuizSession::new(id, user, questions))
    }

    /// 评分并记录成绩，会话随之结束
    pub fn finish_quiz<S: AsRef<str>>(
        &self,
        session: QuizSession,
        answers: &[S],
    ) -> Result<QuizOutcome, ScoreError> {
        let outcome = session.grade(answers);
        self.recorder
            .record(&session.user, outcome.score, outcome.total)?;
        info!(
            "✓ 会话 #{} 完成: {}/{}",
            session.id, outcome.score, outcome.total
        );
        Ok(outcome)
    }

    /// 记录外部已算好的成绩（客户端自行评分的情形）
    pub fn record_score(
        &self,
        user: &UserIdentity,
        score: u32,
        total: u32,
    ) -> Result<(), ScoreError> {
        self.recorder.record(user, score, total).map(|_| ())
    }
}
