use serde::Serialize;

use crate::menu::{escape_html, find_section, NavSection};
use crate::Rect;

/// Nội dung tooltip cho một mục menu khi sidebar đang thu gọn và khóa.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TooltipContent {
    pub section: String,
    pub label: String,
    pub icon: String,
    pub href: String,
}

impl TooltipContent {
    pub fn for_section(menu: &[NavSection], id: &str) -> Option<Self> {
        let section = find_section(menu, id)?;
        let label = section.label.trim();
        if label.is_empty() || section.icon.is_empty() {
            return None;
        }
        Some(Self {
            section: section.id.to_string(),
            label: label.to_string(),
            icon: section.icon.to_string(),
            href: section.href.clone(),
        })
    }
}

/// Markup bên trong `#nav-tooltip`.
pub fn render_tooltip(content: &TooltipContent) -> String {
    format!(
        r#"<button class="tooltip-link" data-href="{}"><i class="tooltip-icon" data-feather="{}"></i><span class="tooltip-text">{}</span></button>"#,
        escape_html(&content.href),
        escape_html(&content.icon),
        escape_html(&content.label),
    )
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TooltipPosition {
    pub left: f64,
    pub top: f64,
}

/// Canh trái theo mục menu, canh giữa theo chiều dọc.
pub fn position_tooltip(anchor: Rect, tooltip_height: f64) -> TooltipPosition {
    TooltipPosition {
        left: anchor.left,
        top: anchor.top + anchor.height / 2.0 - tooltip_height / 2.0,
    }
}
