//! # Mock Test Quiz
//!
//! 从半结构化文档中抽取选择题、为用户随机组卷并记录成绩
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `DocumentLoader` - 读出文档全文（PDF / 纯文本）
//! - `KeyValueStore` - 按键读写（内存 / TOML 平面文件）
//!
//! ### ② 业务能力层（Services）
//! - `QuestionSegmenter` - 按题号切分题块
//! - `QuestionRecordParser` - 题块 → 题目记录，或拒绝
//! - `QuizSampler` - 不放回随机抽样
//! - `ScoreRecorder` - 记录成绩
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionSetExtractor` - 读取 → 分段 → 解析
//! - `QuizFlow` - 抽取 → 抽样 → 会话 → 评分 → 记录
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 异步入口、批量抽取、并发控制

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, DEFAULT_QUIZ_SIZE};
pub use error::{AppError, AppResult, LoadError};
pub use infrastructure::{DocumentLoader, FileDocumentLoader, KeyValueStore};
pub use models::{DocumentHandle, QuestionRecord, QuestionSet, QuizSession, UserIdentity};
pub use orchestrator::App;
pub use services::{sample_quiz, ParseRejection};
pub use workflow::{ExtractionReport, QuestionSetExtractor, QuizFlow};
