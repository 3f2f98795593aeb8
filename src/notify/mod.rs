// src/notify/mod.rs
//! Host-facing notifications for non-fatal pipeline failures.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the host shell exposes to surface messages without halting.
pub trait HostNotifier: Send + Sync {
    fn notify_error(&self, message: &str);
    fn notify_info(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub ts: DateTime<Utc>,
}

/// Logs through `tracing` and keeps the most recent notices in memory.
#[derive(Debug)]
pub struct NoticeLog {
    inner: Mutex<VecDeque<Notice>>,
    cap: usize,
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::with_capacity(200)
    }
}

impl NoticeLog {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, 10_000);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }

    fn push(&self, level: NoticeLevel, message: &str) {
        let notice = Notice {
            level,
            message: message.to_string(),
            ts: Utc::now(),
        };
        let mut q = match self.inner.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        q.push_back(notice);
        while q.len() > self.cap {
            q.pop_front();
        }
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<Notice> {
        match self.inner.lock() {
            Ok(g) => g.iter().cloned().collect(),
            Err(poison) => poison.into_inner().iter().cloned().collect(),
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NoticeLevel::Error)
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(NoticeLevel::Info)
    }

    fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl HostNotifier for NoticeLog {
    fn notify_error(&self, message: &str) {
        tracing::warn!(target: "notify", %message, "host error notice");
        self.push(NoticeLevel::Error, message);
    }

    fn notify_info(&self, message: &str) {
        tracing::info!(target: "notify", %message, "host info notice");
        self.push(NoticeLevel::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_levels_apart_and_caps_history() {
        let log = NoticeLog::with_capacity(2);
        log.notify_info("a");
        log.notify_error("b");
        log.notify_error("c");
        assert_eq!(log.snapshot().len(), 2);
        assert_eq!(log.errors(), vec!["b".to_string(), "c".to_string()]);
        assert!(log.infos().is_empty());
    }
}
