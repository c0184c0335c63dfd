//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor::App (异步入口 / 批量抽取)
//!     ↓
//! workflow::{QuestionSetExtractor, QuizFlow} (单次请求的流程)
//!     ↓
//! services (能力层：segment / parse / sample / record)
//!     ↓
//! infrastructure (基础设施：DocumentLoader / KeyValueStore)
//! ```
//!
//! 只有编排层决定在哪个线程上运行抽取；下层全部是同步、无共享可变状态的。

pub mod batch_processor;

pub use batch_processor::{scan_documents, summarize, App, BatchStats, DocumentSummary};
