use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::schedule::Task;

pub const DEFAULT_REPO_FOLDER: &str = "team";
pub const DEFAULT_CONFIG_ENDPOINT: &str = "http://localhost:8081/api/config/current";
pub const COLLAPSED_KEY: &str = "standaloneNavCollapsed";
pub const LOCKED_KEY: &str = "standaloneNavLocked";

/// Trang hiện tại mà widget đánh dấu `active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    #[default]
    Home,
    Admin,
}

impl PageKind {
    /// Trang quản trị khi đường dẫn chứa `/admin/`.
    pub fn detect(pathname: &str) -> Self {
        if pathname.contains("/admin/") {
            PageKind::Admin
        } else {
            PageKind::Home
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Admin => "admin",
        }
    }
}

/// Tham số dựng widget, cố định trong suốt vòng đời một instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WidgetOptions {
    /// Tiền tố tương đối (hoặc tuyệt đối) tới gốc repo.
    pub base_path: String,
    pub current_page: PageKind,
    pub is_webroot_container: bool,
    pub repo_folder_name: Option<String>,
    pub is_external_site: bool,
}

impl WidgetOptions {
    /// Tên thư mục repo, mặc định `team`.
    pub fn repo_folder(&self) -> &str {
        self.repo_folder_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_REPO_FOLDER)
    }
}

/// Cấu hình các ngưỡng và độ trễ của widget.
///
/// Mọi trường đều có mặc định nên phía JavaScript chỉ cần truyền phần muốn đổi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    pub repo_folder: String,
    pub config_endpoint: String,
    pub poll_interval_ms: u32,
    /// Chiều rộng viewport (px) từ đó trở xuống coi là di động.
    pub mobile_breakpoint: f64,
    pub resize_debounce_ms: u32,
    pub icon_debounce_ms: u32,
    pub icon_refresh_ms: u32,
    pub tooltip_grace_ms: u32,
    pub restore_delay_ms: u32,
    pub reinit_delay_ms: u32,
    pub collapsed_key: String,
    pub locked_key: String,
    pub inject_styles: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            repo_folder: DEFAULT_REPO_FOLDER.to_string(),
            config_endpoint: DEFAULT_CONFIG_ENDPOINT.to_string(),
            poll_interval_ms: 30_000,
            mobile_breakpoint: 768.0,
            resize_debounce_ms: 100,
            icon_debounce_ms: 50,
            icon_refresh_ms: 100,
            tooltip_grace_ms: 100,
            restore_delay_ms: 100,
            reinit_delay_ms: 100,
            collapsed_key: COLLAPSED_KEY.to_string(),
            locked_key: LOCKED_KEY.to_string(),
            inject_styles: true,
        }
    }
}

impl WidgetConfig {
    pub fn is_mobile_width(&self, width: f64) -> bool {
        width <= self.mobile_breakpoint
    }

    /// Độ trễ ứng với từng loại tác vụ hẹn giờ.
    pub fn delay(&self, task: Task) -> Duration {
        let millis = match task {
            Task::ResizeSettled => self.resize_debounce_ms,
            Task::Indicators => self.icon_debounce_ms,
            Task::IconRefresh => self.icon_refresh_ms,
            Task::TooltipDismiss => self.tooltip_grace_ms,
            Task::RestoreState => self.restore_delay_ms,
            Task::FaviconPoll => self.poll_interval_ms,
            Task::Reinitialize => self.reinit_delay_ms,
        };
        Duration::from_millis(u64::from(millis))
    }
}
