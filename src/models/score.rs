use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 外部应用会话中的用户身份
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// 一次测验的成绩记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub email: String,
    pub score: u32,
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ScoreEntry {
    pub fn new(user: &UserIdentity, score: u32, total: u32) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            score,
            total,
            recorded_at: None,
        }
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }
}
