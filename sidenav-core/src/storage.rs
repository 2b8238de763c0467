use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::WidgetConfig;
use crate::NavError;

/// Kho khóa-giá trị bền vững (localStorage trên trình duyệt).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), NavError>;
}

/// Kho trong bộ nhớ, dùng cho kiểm thử và môi trường không có trình duyệt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), NavError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Hai cờ được lưu giữa các lần tải trang.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PersistedUiState {
    pub is_collapsed: bool,
    pub is_locked: bool,
}

impl PersistedUiState {
    /// Đọc trạng thái đã lưu. Thiếu khóa `collapsed` nghĩa là đang thu gọn.
    ///
    /// Cặp `locked=true, collapsed=false` không hợp lệ được đưa về mở khóa.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, config: &WidgetConfig) -> Self {
        let is_collapsed = match store.get_item(&config.collapsed_key) {
            Some(value) => value == "true",
            None => true,
        };
        let is_locked = store.get_item(&config.locked_key).as_deref() == Some("true");

        if is_locked && !is_collapsed {
            log::debug!("stored navigation state was locked while expanded, unlocking");
        }

        Self {
            is_collapsed,
            is_locked: is_locked && is_collapsed,
        }
    }

    /// Ghi cả hai cờ, luôn cùng nhau.
    pub fn save<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        config: &WidgetConfig,
    ) -> Result<(), NavError> {
        store.set_item(&config.collapsed_key, bool_str(self.is_collapsed))?;
        store.set_item(&config.locked_key, bool_str(self.is_locked))
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
