//! Logic lõi của thanh điều hướng nhúng: giải quyết đường dẫn theo vị trí trang,
//! trạng thái thu gọn/khóa, dựng DOM qua các trait năng lực và vòng đời widget.
//!
//! Crate này không phụ thuộc trình duyệt. Mọi thao tác DOM, hẹn giờ, lưu trữ và
//! mạng đi qua trait [`Host`], nên toàn bộ hành vi có thể kiểm thử bằng host giả.

use serde::{Deserialize, Serialize};

mod app;
mod favicon;
mod host;
mod listeners;
mod menu;
mod mount;
mod options;
mod paths;
mod schedule;
mod state;
mod storage;
mod tooltip;
mod widget;

pub use app::{App, LifecycleEvent};
pub use favicon::{parse_remote_config, FaviconOutcome, FaviconState, FaviconTicket, RemoteConfig};
pub use host::{BrandingSource, Host, Surface};
pub use listeners::{
    tooltip_bindings, widget_bindings, Binding, DomEvent, ListenerHost, ListenerId,
    ListenerRegistry, Target,
};
pub use menu::{build_menu, find_section, ids, render_sidebar, NavSection, SubnavLink, ADMIN_SECTION};
pub use mount::{mount, unmount, DocumentTree, MountHandle};
pub use options::{PageKind, WidgetConfig, WidgetOptions, DEFAULT_REPO_FOLDER};
pub use paths::{
    describe_location, path_segments, resolve_location, Deployment, LocationReport, NavPaths,
    ResolvedLocation,
};
pub use schedule::{Scheduler, Task, TaskHandle, Timers};
pub use state::{ModeChange, NavState, Transition};
pub use storage::{KeyValueStore, MemoryStore, PersistedUiState};
pub use tooltip::{position_tooltip, render_tooltip, TooltipContent, TooltipPosition};
pub use widget::{ClickContext, Propagation, UiEvent, Widget};

/// Hình chữ nhật bao của một phần tử trên màn hình (đơn vị px).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Lỗi chung của widget điều hướng.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Không tìm thấy phần tử: {0}")]
    MissingElement(String),
    #[error("Không thao tác được DOM: {0}")]
    Dom(String),
    #[error("Không ghi được bộ nhớ cục bộ: {0}")]
    Storage(String),
    #[error("Không tải được cấu hình: {0}")]
    ConfigFetch(String),
    #[error("Cấu hình không hợp lệ: {0}")]
    ConfigParse(String),
    #[error("Ảnh favicon không hợp lệ: {0}")]
    InvalidImage(String),
    #[error("Nền tảng không được hỗ trợ: {0}")]
    Unsupported(String),
}
