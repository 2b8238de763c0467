//! Mô hình menu và markup HTML của sidebar.

use serde::Serialize;

use crate::options::{PageKind, WidgetOptions};
use crate::paths::NavPaths;
use crate::state::NavState;

pub const ADMIN_SECTION: &str = "admin";

/// Định danh và lớp CSS mà widget sở hữu trong DOM.
pub mod ids {
    pub const SIDEBAR: &str = "standalone-sidebar";
    pub const TOGGLE: &str = "sidebar-toggle";
    pub const EXPANDER: &str = "sidebar-expander";
    pub const OVERLAY: &str = "mobile-overlay";
    pub const LOGO: &str = "sidebar-logo";
    pub const TOOLTIP: &str = "nav-tooltip";
    pub const MOBILE_TOGGLE: &str = "mobile-menu-toggle";
    pub const CONTAINER_CLASS: &str = "app-container";
    pub const CONTENT_CLASS: &str = "main-content";
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubnavLink {
    pub label: &'static str,
    pub icon: &'static str,
    pub href: String,
}

/// Một mục cấp một của menu cùng danh sách liên kết con.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavSection {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub href: String,
    pub active: bool,
    pub links: Vec<SubnavLink>,
}

fn link(label: &'static str, icon: &'static str, href: impl Into<String>) -> SubnavLink {
    SubnavLink {
        label,
        icon,
        href: href.into(),
    }
}

/// Dựng menu từ các đường dẫn đã giải quyết.
pub fn build_menu(paths: &NavPaths, current_page: PageKind) -> Vec<NavSection> {
    let root = paths.root.as_str();
    let admin = paths.admin.as_str();

    vec![
        NavSection {
            id: "home",
            label: "Home",
            icon: "home",
            href: format!("{root}#home/welcome"),
            active: false,
            links: vec![
                link("Welcome", "smile", format!("{root}#home/welcome")),
                link("Getting Started", "book", format!("{root}#home/documentation")),
                link("Active Projects", "bar-chart-2", "/projects"),
            ],
        },
        NavSection {
            id: "projects",
            label: "Projects",
            icon: "folder",
            href: format!("{root}#projects/opportunities"),
            active: false,
            links: vec![
                link("Model.Earth Projects", "globe", "/projects"),
                link(
                    "Democracy Lab Projects",
                    "code",
                    format!("{root}projects/#list=democracylab"),
                ),
                link("Opportunities", "target", format!("{root}#projects/opportunities")),
                link("Assigned Tasks", "check-square", format!("{root}#projects/assigned-tasks")),
                link("UN Timelines", "calendar", "/data-commons/docs/data/"),
            ],
        },
        NavSection {
            id: "people",
            label: "People & Teams",
            icon: "users",
            href: format!("{root}projects/#list=modelteam"),
            active: false,
            links: vec![
                link("Model Team", "map", format!("{root}projects/#list=modelteam")),
                link("People", "user", format!("{root}#people/people")),
                link("Teams", "users", format!("{root}#people/teams")),
                link("Organizations", "grid", format!("{root}#people/organizations")),
            ],
        },
        NavSection {
            id: "account",
            label: "My Account",
            icon: "settings",
            href: format!("{root}#account/preferences"),
            active: false,
            links: vec![
                link("Preferences", "sliders", format!("{root}#account/preferences")),
                link("Skills", "award", format!("{root}#account/skills")),
                link("Interests", "heart", format!("{root}#account/interests")),
            ],
        },
        NavSection {
            id: "realitystream",
            label: "RealityStream",
            icon: "activity",
            href: "/realitystream/".to_string(),
            active: false,
            links: vec![link(
                "Forecasting Models",
                "trending-up",
                "/realitystream/models/",
            )],
        },
        NavSection {
            id: ADMIN_SECTION,
            label: "Admin Dashboard",
            icon: "tool",
            href: admin.to_string(),
            active: current_page == PageKind::Admin,
            links: vec![
                link("Meetup Integration", "users", format!("{admin}../projects/")),
                link("Configure Server", "zap", format!("{admin}server/")),
                link("Database Admin", "database", format!("{admin}sql/panel/")),
                link("Data Import", "upload", format!("{admin}import-data.html")),
                link("Log Monitor", "monitor", format!("{admin}log-output/")),
            ],
        },
    ]
}

pub fn find_section<'a>(menu: &'a [NavSection], id: &str) -> Option<&'a NavSection> {
    menu.iter().find(|section| section.id == id)
}

/// Thoát ký tự đặc biệt cho nội dung và giá trị thuộc tính HTML.
pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Markup của sidebar và lớp phủ di động, chèn vào container bằng `innerHTML`.
pub fn render_sidebar(
    menu: &[NavSection],
    paths: &NavPaths,
    options: &WidgetOptions,
    state: &NavState,
) -> String {
    let mut classes = vec!["sidebar"];
    if options.is_external_site {
        classes.push("external-site");
    }
    classes.extend(state.desktop_classes());

    let header_style = if options.is_external_site {
        r#" style="display: none;""#
    } else {
        ""
    };

    let mut html = String::new();
    html.push_str(&format!(
        r#"<div class="{}" id="{}">"#,
        classes.join(" "),
        ids::SIDEBAR
    ));
    html.push_str(&format!(
        r#"<div class="sidebar-header"{header_style}><div class="logo"><a href="{}"><img id="{}" src="{}" alt="Up" /></a></div><span class="logo-text">MemberCommons</span></div>"#,
        escape_html(&paths.root),
        ids::LOGO,
        escape_html(&paths.logo),
    ));

    html.push_str(r#"<div class="nav-menu">"#);
    for section in menu {
        html.push_str(&render_section(section));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<div class="sidebar-footer"><button class="sidebar-toggle" id="{}"><i data-feather="{}"></i></button></div>"#,
        ids::TOGGLE,
        state.toggle_icon(),
    ));
    html.push_str(&format!(
        r#"<div class="sidebar-expander" id="{}" title="{}"></div>"#,
        ids::EXPANDER,
        state.expander_title(),
    ));
    html.push_str("</div>");
    html.push_str(&format!(r#"<div class="mobile-overlay" id="{}"></div>"#, ids::OVERLAY));
    html
}

fn render_section(section: &NavSection) -> String {
    let active = if section.active { " active" } else { "" };
    let mut html = format!(
        r#"<div class="nav-section"><div class="nav-item"><button class="nav-link{active}" data-section="{}" data-href="{}"><i class="nav-icon" data-feather="{}"></i><span class="nav-text">{}</span><i class="nav-arrow" data-feather="chevron-right"></i></button><div class="subnav">"#,
        section.id,
        escape_html(&section.href),
        section.icon,
        escape_html(section.label),
    );
    for link in &section.links {
        html.push_str(&format!(
            r#"<a href="{}" class="subnav-link"><i class="subnav-icon" data-feather="{}"></i><span>{}</span></a>"#,
            escape_html(&link.href),
            link.icon,
            escape_html(link.label),
        ));
    }
    html.push_str("</div></div></div>");
    html
}
