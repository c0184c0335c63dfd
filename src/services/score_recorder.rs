//! 成绩记录服务 - 业务能力层
//!
//! 只负责"记成绩"能力：把 (用户, 得分, 总分, 时间) 追加到该用户的历史中

use crate::error::{ScoreError, StoreError};
use crate::infrastructure::KeyValueStore;
use crate::models::{ScoreEntry, UserIdentity};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 成绩记录器
pub struct ScoreRecorder {
    store: Arc<dyn KeyValueStore>,
    // 同一进程内对历史的读-改-写串行化
    append_lock: Mutex<()>,
}

impl ScoreRecorder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    fn key_for(email: &str) -> String {
        format!("scores/{}", email)
    }

    /// 记录一次成绩
    pub fn record(
        &self,
        user: &UserIdentity,
        score: u32,
        total: u32,
    ) -> Result<ScoreEntry, ScoreError> {
        if score > total {
            return Err(ScoreError::ScoreExceedsTotal { score, total });
        }

        let entry = ScoreEntry::new(user, score, total).with_timestamp(Utc::now());
        let key = Self::key_for(&user.email);

        let _guard = self.append_lock.lock().map_err(StoreError::from)?;
        let mut history = self.read_history(&key)?;
        history.push(entry.clone());
        let encoded = serde_json::to_string(&history).map_err(|source| StoreError::Encoding {
            key: key.clone(),
            source,
        })?;
        self.store.put(&key, encoded)?;

        info!(
            "✓ 成绩已保存: {} <{}> {}/{}",
            user.name, user.email, score, total
        );
        Ok(entry)
    }

    /// 读取用户的成绩历史（按记录顺序）
    pub fn history(&self, email: &str) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.read_history(&Self::key_for(email))?)
    }

    fn read_history(&self, key: &str) -> Result<Vec<ScoreEntry>, StoreError> {
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Encoding {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }
}
