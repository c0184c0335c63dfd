//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：写日志文件头、创建读取器和成绩存储
//! 2. **异步入口**：抽取会阻塞线程（本地文件 I/O），统一放到 `spawn_blocking` 上执行
//! 3. **批量抽取**：扫描目录下所有支持的文档，用 Semaphore 限制并发数量
//! 4. **全局统计**：汇总每份文档的抽取结果

use crate::config::Config;
use crate::error::{AppError, AppResult, LoadError};
use crate::infrastructure::{DocumentLoader, FileDocumentLoader, KeyValueStore, TomlFileStore};
use crate::models::{DocumentHandle, QuestionRecord, QuestionSet, QuizOutcome, QuizSession, UserIdentity};
use crate::services::{sample_quiz, QuizSampler, ScoreRecorder};
use crate::utils::logging::{log_batch_complete, log_startup, print_final_stats};
use crate::workflow::{ExtractionReport, QuestionSetExtractor, QuizFlow};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<QuizFlow>,
}

/// 单份文档的批量抽取结果
#[derive(Debug)]
pub struct DocumentSummary {
    pub document: DocumentHandle,
    pub result: Result<ExtractionReport, LoadError>,
}

/// 批量抽取统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub documents: usize,
    pub loaded: usize,
    pub failed: usize,
    pub questions: usize,
}

impl App {
    /// 使用文件读取器和 TOML 成绩文件初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        let store = Arc::new(TomlFileStore::new(&config.score_store_path));
        Ok(Self::with_parts(config, Arc::new(FileDocumentLoader::new()), store))
    }

    /// 注入自定义读取器和存储
    pub fn with_parts(
        config: Config,
        loader: Arc<dyn DocumentLoader>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let extractor = QuestionSetExtractor::new(loader);
        let recorder = Arc::new(ScoreRecorder::new(store));
        let flow = QuizFlow::new(extractor, QuizSampler::new(config.quiz_size), recorder);
        Self {
            config,
            flow: Arc::new(flow),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 在阻塞线程池上抽取题目集合
    pub async fn extract(&self, document: DocumentHandle) -> AppResult<QuestionSet> {
        let flow = self.flow.clone();
        let set = tokio::task::spawn_blocking(move || flow.extractor().extract(&document)).await??;
        Ok(set)
    }

    /// 为用户创建测验会话（每次调用使用独立的线程本地随机源）
    pub async fn request_quiz(
        &self,
        user: UserIdentity,
        document: DocumentHandle,
    ) -> AppResult<QuizSession> {
        let flow = self.flow.clone();
        tokio::task::spawn_blocking(move || {
            flow.start_quiz(user, &document, &mut rand::thread_rng())
        })
        .await?
    }

    /// 提交答案：评分并记录成绩
    pub async fn submit_quiz(
        &self,
        session: QuizSession,
        answers: Vec<String>,
    ) -> AppResult<QuizOutcome> {
        let flow = self.flow.clone();
        let outcome =
            tokio::task::spawn_blocking(move || flow.finish_quiz(session, &answers)).await??;
        Ok(outcome)
    }

    /// 记录外部评分的成绩
    pub async fn record_score(&self, user: UserIdentity, score: u32, total: u32) -> AppResult<()> {
        let flow = self.flow.clone();
        tokio::task::spawn_blocking(move || flow.record_score(&user, score, total)).await??;
        Ok(())
    }

    /// 运行命令行主逻辑：抽取配置的文档并输出一份测验（JSON）
    pub async fn run(&self) -> AppResult<Vec<QuestionRecord>> {
        log_startup(&self.config);

        if let Some(folder) = self.config.documents_folder.clone() {
            let documents = scan_documents(&folder)?;
            if documents.is_empty() {
                warn!("⚠️ 目录 {} 中没有可抽取的文档", folder.display());
            } else {
                let summaries = self.extract_batch(documents).await?;
                let stats = summarize(&summaries);
                print_final_stats(&stats, &self.config.output_log_file);
            }
        }

        let document = DocumentHandle::new(&self.config.document_path);
        let set = self.extract(document).await?;
        let quiz = sample_quiz(&set, self.config.quiz_size, &mut rand::thread_rng());
        info!("🎯 抽取测验: {}/{} 道题", quiz.len(), set.len());
        Ok(quiz)
    }

    /// 并发抽取多份文档（并发数由配置限制），结果顺序与输入一致
    pub async fn extract_batch(&self, documents: Vec<DocumentHandle>) -> AppResult<Vec<DocumentSummary>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_extractions));
        let mut handles = Vec::with_capacity(documents.len());

        for (idx, document) in documents.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Task(e.to_string()))?;
            let flow = self.flow.clone();
            let doc = document.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                flow.extractor().extract_with_report(&doc)
            });
            handles.push((idx + 1, document, handle));
        }

        let mut summaries = Vec::with_capacity(handles.len());
        for (doc_index, document, handle) in handles {
            let result = match handle.await {
                Ok(result) => {
                    if let Err(e) = &result {
                        error!("[文档 {}] ❌ 抽取失败: {}", doc_index, e);
                    }
                    result
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", doc_index, e);
                    return Err(e.into());
                }
            };
            log_batch_complete(doc_index, &document, &result);
            summaries.push(DocumentSummary { document, result });
        }

        Ok(summaries)
    }
}

/// 扫描目录下所有支持的文档（按文件名排序）
pub fn scan_documents(folder: &Path) -> Result<Vec<DocumentHandle>, LoadError> {
    let entries = std::fs::read_dir(folder).map_err(|e| LoadError::from_io(folder, e))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::from_io(folder, e))?;
        let handle = DocumentHandle::new(entry.path());
        if entry.path().is_file() && FileDocumentLoader::supports(&handle) {
            documents.push(handle);
        }
    }
    documents.sort_by(|a, b| a.path().cmp(b.path()));
    Ok(documents)
}

/// 汇总批量抽取结果
pub fn summarize(summaries: &[DocumentSummary]) -> BatchStats {
    summaries.iter().fold(
        BatchStats {
            documents: summaries.len(),
            ..Default::default()
        },
        |mut stats, summary| {
            match &summary.result {
                Ok(report) => {
                    stats.loaded += 1;
                    stats.questions += report.questions.len();
                }
                Err(_) => stats.failed += 1,
            }
            stats
        },
    )
}
