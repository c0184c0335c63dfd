//! 基础设施层
//!
//! 持有外部资源（文档文件、持久化存储），只暴露能力，不认识测验流程。

pub mod document_loader;
pub mod store;

pub use document_loader::{DocumentLoader, FileDocumentLoader, PdfTextLoader, PlainTextLoader};
pub use store::{KeyValueStore, MemoryStore, TomlFileStore};
