#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-sidenav-ui]";

/// Default CSS for the sidebar along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --sidenav-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --sidenav-width: 260px;
  --sidenav-collapsed-width: 64px;
  --sidenav-bg: #ffffff;
  --sidenav-border: rgba(148, 163, 184, 0.28);
  --sidenav-text: #1f2933;
  --sidenav-muted: #52606d;
  --sidenav-hover-bg: #f1f5f9;
  --sidenav-active-bg: rgba(37, 99, 235, 0.1);
  --sidenav-active-text: #1d4ed8;
  --sidenav-overlay: rgba(15, 23, 42, 0.45);
  --sidenav-tooltip-bg: #11181c;
  --sidenav-tooltip-text: #ffffff;
  --sidenav-radius: 10px;
  --sidenav-transition: 0.2s ease;
}

.app-container {
  display: flex;
  min-height: 100vh;
}

.main-content {
  flex: 1;
  min-width: 0;
  margin-left: var(--sidenav-width);
  transition: margin-left var(--sidenav-transition);
}

.sidebar {
  font-family: var(--sidenav-font-family);
  position: fixed;
  top: 0;
  left: 0;
  bottom: 0;
  z-index: 1000;
  width: var(--sidenav-width);
  display: flex;
  flex-direction: column;
  background: var(--sidenav-bg);
  color: var(--sidenav-text);
  border-right: 1px solid var(--sidenav-border);
  transition: width var(--sidenav-transition), transform var(--sidenav-transition);
}

.sidebar.collapsed {
  width: var(--sidenav-collapsed-width);
}

.sidebar.collapsed ~ .main-content {
  margin-left: var(--sidenav-collapsed-width);
}

.sidebar.collapsed.hovered {
  width: var(--sidenav-width);
  box-shadow: 0 24px 48px rgba(15, 23, 42, 0.16);
}

.sidebar-header {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 16px;
  border-bottom: 1px solid var(--sidenav-border);
}

.sidebar-header .logo img {
  width: 32px;
  height: 32px;
  border-radius: 8px;
}

.logo-text {
  font-weight: 600;
  white-space: nowrap;
}

.nav-menu {
  flex: 1;
  overflow-y: auto;
  padding: 12px 8px;
}

.nav-link {
  display: flex;
  align-items: center;
  gap: 12px;
  width: 100%;
  padding: 10px 12px;
  border: none;
  border-radius: var(--sidenav-radius);
  background: transparent;
  color: inherit;
  font: inherit;
  text-align: left;
  cursor: pointer;
}

.nav-link:hover {
  background: var(--sidenav-hover-bg);
}

.nav-link.active {
  background: var(--sidenav-active-bg);
  color: var(--sidenav-active-text);
}

.nav-icon,
.nav-arrow {
  flex-shrink: 0;
  width: 18px;
  height: 18px;
}

.nav-text {
  flex: 1;
  white-space: nowrap;
}

.nav-arrow {
  transition: transform var(--sidenav-transition);
}

.nav-arrow.expanded {
  transform: rotate(90deg);
}

.subnav {
  display: none;
  padding: 4px 0 8px 42px;
}

.subnav.expanded {
  display: block;
}

.subnav-link {
  display: flex;
  align-items: center;
  gap: 8px;
  padding: 6px 8px;
  border-radius: 8px;
  color: var(--sidenav-muted);
  text-decoration: none;
  font-size: 0.9em;
}

.subnav-link:hover {
  background: var(--sidenav-hover-bg);
  color: var(--sidenav-text);
}

.subnav-icon {
  width: 14px;
  height: 14px;
}

.sidebar.collapsed:not(.hovered) .nav-text,
.sidebar.collapsed:not(.hovered) .nav-arrow,
.sidebar.collapsed:not(.hovered) .logo-text,
.sidebar.collapsed:not(.hovered) .subnav {
  display: none;
}

.sidebar-footer {
  padding: 12px;
  border-top: 1px solid var(--sidenav-border);
}

.sidebar-toggle {
  display: flex;
  align-items: center;
  justify-content: center;
  width: 40px;
  height: 40px;
  border: none;
  border-radius: var(--sidenav-radius);
  background: transparent;
  color: inherit;
  cursor: pointer;
}

.sidebar-toggle:hover {
  background: var(--sidenav-hover-bg);
}

.sidebar-expander {
  position: absolute;
  top: 0;
  right: -6px;
  bottom: 0;
  width: 12px;
  cursor: pointer;
}

.sidebar:not(.collapsed) .sidebar-expander {
  display: none;
}

.sidebar.external-site .nav-menu {
  padding-top: 16px;
}

.nav-tooltip {
  position: fixed;
  z-index: 1100;
  display: none;
  pointer-events: auto;
}

.nav-tooltip.show {
  display: block;
}

.tooltip-link {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 10px 14px;
  border: none;
  border-radius: var(--sidenav-radius);
  background: var(--sidenav-tooltip-bg);
  color: var(--sidenav-tooltip-text);
  font: inherit;
  cursor: pointer;
  white-space: nowrap;
}

.tooltip-icon {
  width: 18px;
  height: 18px;
}

.mobile-overlay {
  display: none;
  position: fixed;
  inset: 0;
  z-index: 999;
  background: var(--sidenav-overlay);
}

@media (max-width: 768px) {
  .sidebar {
    width: var(--sidenav-width);
    transform: translateX(-100%);
  }

  .sidebar.mobile-open {
    transform: translateX(0);
  }

  .main-content,
  .sidebar.collapsed ~ .main-content {
    margin-left: 0;
  }

  .mobile-overlay.active {
    display: block;
  }

  .sidebar-expander,
  .sidebar-toggle {
    display: none;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-sidenav-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
