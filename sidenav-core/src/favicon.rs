//! Theo dõi favicon/logo do máy chủ cấu hình chỉ định.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::NavError;

/// Phần cấu hình máy chủ mà widget quan tâm; các trường khác bị bỏ qua.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RemoteConfig {
    #[serde(default)]
    pub site_favicon: Option<String>,
}

pub fn parse_remote_config(body: &str) -> Result<RemoteConfig, NavError> {
    serde_json::from_str(body).map_err(|err| NavError::ConfigParse(err.to_string()))
}

/// Định danh một chu kỳ kiểm tra, gắn với thế hệ instance đã khởi động nó.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FaviconTicket {
    pub generation: u64,
    pub cycle: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaviconOutcome {
    Unchanged,
    Applied(String),
    Failed(String),
    /// Instance bị hủy trước khi chu kỳ kết thúc.
    Cancelled,
}

impl FaviconOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FaviconOutcome::Unchanged | FaviconOutcome::Applied(_))
    }
}

#[derive(Debug, Default)]
pub struct FaviconState {
    current: Option<String>,
    next_cycle: u32,
    in_flight: BTreeSet<u32>,
    last_checked_at: Option<DateTime<Utc>>,
    last_applied_at: Option<DateTime<Utc>>,
}

impl FaviconState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.last_checked_at
    }

    pub fn last_applied_at(&self) -> Option<DateTime<Utc>> {
        self.last_applied_at
    }

    pub fn begin(&mut self, generation: u64) -> FaviconTicket {
        self.next_cycle = self.next_cycle.wrapping_add(1);
        self.in_flight.insert(self.next_cycle);
        FaviconTicket {
            generation,
            cycle: self.next_cycle,
        }
    }

    pub fn is_in_flight(&self, ticket: FaviconTicket) -> bool {
        self.in_flight.contains(&ticket.cycle)
    }

    pub fn finish(&mut self, ticket: FaviconTicket) -> bool {
        self.in_flight.remove(&ticket.cycle)
    }

    /// Lấy hết các chu kỳ còn dở (khi hủy instance).
    pub fn drain_in_flight(&mut self, generation: u64) -> Vec<FaviconTicket> {
        std::mem::take(&mut self.in_flight)
            .into_iter()
            .map(|cycle| FaviconTicket { generation, cycle })
            .collect()
    }

    /// Chọn favicon ứng viên: cấu hình máy chủ trước, gợi ý trên trang sau.
    ///
    /// `Ok(None)` nghĩa là không cần cập nhật, `Err` khi không có nguồn nào dùng được.
    pub fn choose(
        &mut self,
        fetched: Result<RemoteConfig, NavError>,
        hint: Option<String>,
    ) -> Result<Option<String>, NavError> {
        self.last_checked_at = Some(Utc::now());

        let (from_server, fetch_error) = match fetched {
            Ok(config) => (config.site_favicon.filter(|url| !url.is_empty()), None),
            Err(err) => {
                log::info!("could not fetch server config, falling back to page hints: {err}");
                (None, Some(err))
            }
        };

        let candidate = from_server.or_else(|| hint.filter(|url| !url.is_empty()));
        match candidate {
            Some(url) if self.current.as_deref() == Some(url.as_str()) => Ok(None),
            Some(url) => Ok(Some(url)),
            None => match fetch_error {
                Some(err) => Err(err),
                None => Ok(None),
            },
        }
    }

    pub fn commit(&mut self, url: &str) {
        self.current = Some(url.to_string());
        self.last_applied_at = Some(Utc::now());
    }
}
