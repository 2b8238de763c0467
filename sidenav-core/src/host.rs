use crate::favicon::{FaviconOutcome, FaviconTicket};
use crate::listeners::{ListenerHost, Target};
use crate::mount::DocumentTree;
use crate::schedule::Scheduler;
use crate::storage::KeyValueStore;
use crate::tooltip::TooltipPosition;
use crate::Rect;

/// Thao tác hiển thị trên các phần tử mà widget sở hữu.
///
/// Phần tử vắng mặt không phải lỗi: cài đặt chỉ cần bỏ qua thao tác.
pub trait Surface {
    fn viewport_width(&self) -> f64;
    fn location_pathname(&self) -> String;
    /// Hash hiện tại, không kèm `#`.
    fn location_hash(&self) -> String;
    fn navigate(&mut self, href: &str);

    fn set_class(&mut self, target: &Target, class: &str, on: bool);
    fn set_title(&mut self, target: &Target, title: &str);
    fn set_toggle_icon(&mut self, icon: &str);
    /// Đảo trạng thái `expanded` của subnav; `false` nếu không tìm thấy.
    fn toggle_subnav(&mut self, section: &str) -> bool;
    /// Gọi hook vẽ lại icon của trang nếu có.
    fn refresh_icons(&mut self);
    fn bounding_rect(&self, target: &Target) -> Option<Rect>;

    /// Thay tooltip hiện có bằng tooltip mới, trả về khung của nó sau khi chèn.
    fn show_tooltip(&mut self, markup: &str) -> Option<Rect>;
    fn place_tooltip(&mut self, position: TooltipPosition);
    fn hide_tooltip(&mut self) -> bool;
    fn tooltip_hovered(&self) -> bool;

    fn set_logo_src(&mut self, url: &str) -> bool;
    /// Xóa mọi `link[rel=icon]` cũ và thêm liên kết mới.
    fn replace_icon_links(&mut self, url: &str);
}

/// Cộng tác viên bên ngoài cho chu kỳ favicon; kết quả quay lại qua [`crate::App`].
pub trait BrandingSource {
    fn fetch_config(&mut self, endpoint: &str, ticket: FaviconTicket);
    fn probe_image(&mut self, url: &str, ticket: FaviconTicket);
    /// Favicon do trang khai báo sẵn (biến toàn cục), nếu có.
    fn favicon_hint(&self) -> Option<String>;
    fn cycle_finished(&mut self, ticket: FaviconTicket, outcome: &FaviconOutcome);
}

/// Tập năng lực đầy đủ mà widget cần từ môi trường.
pub trait Host: DocumentTree + Surface + Scheduler + ListenerHost + KeyValueStore + BrandingSource {}

impl<T> Host for T where
    T: DocumentTree + Surface + Scheduler + ListenerHost + KeyValueStore + BrandingSource
{
}
