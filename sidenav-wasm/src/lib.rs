//! Bridge WASM <-> JavaScript trung lập framework cho thanh điều hướng.
//!
//! Dành cho trang tự dựng DOM: chỉ giải quyết đường dẫn và sinh markup,
//! không gắn listener hay hẹn giờ.

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use sidenav_core::{
    build_menu, describe_location, render_sidebar, NavError, NavState, PersistedUiState,
    WidgetConfig,
};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsWidgetConfig {
    #[serde(default)]
    repo_folder: Option<String>,
    #[serde(default)]
    config_endpoint: Option<String>,
    #[serde(default)]
    poll_interval_ms: Option<u32>,
    #[serde(default)]
    mobile_breakpoint: Option<f64>,
    #[serde(default)]
    resize_debounce_ms: Option<u32>,
    #[serde(default)]
    icon_debounce_ms: Option<u32>,
    #[serde(default)]
    icon_refresh_ms: Option<u32>,
    #[serde(default)]
    tooltip_grace_ms: Option<u32>,
    #[serde(default)]
    restore_delay_ms: Option<u32>,
    #[serde(default)]
    reinit_delay_ms: Option<u32>,
    #[serde(default)]
    collapsed_key: Option<String>,
    #[serde(default)]
    locked_key: Option<String>,
    #[serde(default)]
    inject_styles: Option<bool>,
}

impl From<JsWidgetConfig> for WidgetConfig {
    fn from(cfg: JsWidgetConfig) -> Self {
        let mut base = WidgetConfig::default();
        if let Some(repo) = cfg.repo_folder {
            let repo = repo.trim().trim_matches('/');
            if !repo.is_empty() {
                base.repo_folder = repo.to_string();
            }
        }
        if let Some(endpoint) = cfg.config_endpoint {
            base.config_endpoint = endpoint;
        }
        if let Some(ms) = cfg.poll_interval_ms.filter(|ms| *ms > 0) {
            base.poll_interval_ms = ms;
        }
        if let Some(width) = cfg.mobile_breakpoint.filter(|width| width.is_finite()) {
            base.mobile_breakpoint = width;
        }
        if let Some(ms) = cfg.resize_debounce_ms {
            base.resize_debounce_ms = ms;
        }
        if let Some(ms) = cfg.icon_debounce_ms {
            base.icon_debounce_ms = ms;
        }
        if let Some(ms) = cfg.icon_refresh_ms {
            base.icon_refresh_ms = ms;
        }
        if let Some(ms) = cfg.tooltip_grace_ms {
            base.tooltip_grace_ms = ms;
        }
        if let Some(ms) = cfg.restore_delay_ms {
            base.restore_delay_ms = ms;
        }
        if let Some(ms) = cfg.reinit_delay_ms {
            base.reinit_delay_ms = ms;
        }
        if let Some(key) = cfg.collapsed_key.filter(|key| !key.trim().is_empty()) {
            base.collapsed_key = key;
        }
        if let Some(key) = cfg.locked_key.filter(|key| !key.trim().is_empty()) {
            base.locked_key = key;
        }
        if let Some(inject) = cfg.inject_styles {
            base.inject_styles = inject;
        }
        base
    }
}

#[derive(Deserialize, Default)]
struct JsUiState {
    #[serde(default)]
    is_collapsed: Option<bool>,
    #[serde(default)]
    is_locked: Option<bool>,
    #[serde(default)]
    is_mobile: Option<bool>,
}

impl From<JsUiState> for NavState {
    fn from(state: JsUiState) -> Self {
        let persisted = PersistedUiState {
            is_collapsed: state.is_collapsed.unwrap_or(true),
            is_locked: state.is_locked.unwrap_or(false),
        };
        NavState::new(persisted, state.is_mobile.unwrap_or(false))
    }
}

/// Đọc cấu hình tùy chọn từ JS; trường nào thiếu giữ giá trị mặc định.
pub fn parse_config(config: Option<JsValue>) -> Result<WidgetConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsWidgetConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(WidgetConfig::from(cfg))
        }
        _ => Ok(WidgetConfig::default()),
    }
}

fn nav_error_message(err: &NavError) -> String {
    format!("Navigation error: {err}")
}

/// Chuyển lỗi lõi thành giá trị ném sang JS.
pub fn format_nav_error(err: NavError) -> JsValue {
    JsValue::from_str(&nav_error_message(&err))
}

#[wasm_bindgen(js_name = resolveLocation)]
pub fn resolve_location(pathname: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = parse_config(config)?;
    let report = describe_location(pathname, &cfg.repo_folder);
    to_value(&report).map_err(|err| JsValue::from_str(&format!("Không serialize báo cáo: {err}")))
}

#[wasm_bindgen(js_name = renderSidebar)]
pub fn render_sidebar_markup(
    pathname: &str,
    state: Option<JsValue>,
    config: Option<JsValue>,
) -> Result<String, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = parse_config(config)?;
    let state = match state {
        Some(js_state) if !js_state.is_undefined() && !js_state.is_null() => {
            let state: JsUiState = from_value(js_state)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được trạng thái: {err}")))?;
            NavState::from(state)
        }
        _ => NavState::from(JsUiState::default()),
    };

    let report = describe_location(pathname, &cfg.repo_folder);
    let menu = build_menu(&report.paths, report.options.current_page);
    Ok(render_sidebar(&menu, &report.paths, &report.options, &state))
}
