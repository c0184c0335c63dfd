//! 测验抽样服务 - 业务能力层
//!
//! 从题目集合中不放回地随机抽取 `min(k, |集合|)` 道题，顺序随机。
//! 随机源由调用方显式传入，不使用全局随机数发生器。

use crate::models::{QuestionRecord, QuestionSet};
use rand::seq::SliceRandom;
use rand::Rng;

/// 测验抽样器
#[derive(Debug, Clone, Copy)]
pub struct QuizSampler {
    quiz_size: usize,
}

impl QuizSampler {
    pub fn new(quiz_size: usize) -> Self {
        Self { quiz_size }
    }

    pub fn quiz_size(&self) -> usize {
        self.quiz_size
    }

    /// 按配置的题量抽样
    pub fn draw<R: Rng + ?Sized>(&self, set: &QuestionSet, rng: &mut R) -> Vec<QuestionRecord> {
        sample_quiz(set, self.quiz_size, rng)
    }
}

impl Default for QuizSampler {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_QUIZ_SIZE)
    }
}

/// 不放回抽样；集合为空或 k 为 0 时返回空列表
pub fn sample_quiz<R: Rng + ?Sized>(
    set: &QuestionSet,
    k: usize,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    let amount = k.min(set.len());
    let mut picked: Vec<QuestionRecord> = set
        .records()
        .choose_multiple(rng, amount)
        .cloned()
        .collect();
    // choose_multiple 不保证结果顺序是随机的
    picked.shuffle(rng);
    picked
}
