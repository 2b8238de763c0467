//! Thanh điều hướng sống trên trình duyệt: gắn `sidenav-core` vào DOM thật.

#[cfg(target_arch = "wasm32")]
mod boot;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
pub use boot::{install_navigation, NavigationHandle};
#[cfg(target_arch = "wasm32")]
pub use styles::{ensure_styles, DEFAULT_STYLES};

/// Cài backend `log` ghi ra console trình duyệt, chỉ lần đầu có hiệu lực.
#[cfg(target_arch = "wasm32")]
pub(crate) fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if console_log::init_with_level(level).is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn install_navigation(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), sidenav_core::NavError> {
    Err(sidenav_core::NavError::Unsupported(
        "sidenav-ui chỉ hỗ trợ biên dịch target wasm32".to_string(),
    ))
}
