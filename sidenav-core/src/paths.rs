//! Suy ra đường dẫn gốc/quản trị/logo từ vị trí trang đang nhúng widget.

use serde::{Deserialize, Serialize};

use crate::options::{PageKind, WidgetOptions};

pub const LOGO_FILE: &str = "img/logo/neighborhood/favicon.png";

/// Ba kiểu triển khai widget có thể gặp (cộng với trường hợp phục vụ trực tiếp cũ).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Deployment {
    /// Repo nằm trong một thư mục có tên bên cạnh các site khác.
    RepoFolder,
    /// Nhúng vào site khác, phải trỏ về repo bằng đường dẫn tuyệt đối.
    ExternalSite,
    /// Trang ở gốc domain, xử lý như site ngoài.
    RootEmbedded,
    /// Repo được phục vụ trực tiếp ở gốc.
    DirectServing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub deployment: Deployment,
    pub options: WidgetOptions,
}

/// Tách đường dẫn thành các đoạn, bỏ đoạn rỗng và tên file `.html`.
pub fn path_segments(pathname: &str) -> Vec<&str> {
    pathname
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.ends_with(".html"))
        .collect()
}

fn parent_traversal(depth: usize) -> String {
    let traversal = "../".repeat(depth);
    match traversal.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => traversal,
    }
}

/// Xác định kiểu triển khai và `WidgetOptions` cho một `pathname`.
///
/// Thứ tự ưu tiên: thư mục repo, site ngoài, nhúng ở gốc, phục vụ trực tiếp.
pub fn resolve_location(pathname: &str, repo_folder: &str) -> ResolvedLocation {
    let segments = path_segments(pathname);
    let current_page = PageKind::detect(pathname);
    let absolute_root = format!("/{repo_folder}");

    if let Some(repo_index) = segments.iter().position(|segment| *segment == repo_folder) {
        let depth = segments.len() - repo_index - 1;
        return ResolvedLocation {
            deployment: Deployment::RepoFolder,
            options: WidgetOptions {
                base_path: parent_traversal(depth),
                current_page,
                is_webroot_container: true,
                repo_folder_name: Some(repo_folder.to_string()),
                is_external_site: false,
            },
        };
    }

    let external = |deployment| ResolvedLocation {
        deployment,
        options: WidgetOptions {
            base_path: absolute_root.clone(),
            current_page,
            is_webroot_container: false,
            repo_folder_name: Some(repo_folder.to_string()),
            is_external_site: true,
        },
    };

    if !segments.is_empty() && !pathname.starts_with(&format!("{absolute_root}/")) {
        return external(Deployment::ExternalSite);
    }
    if segments.is_empty() {
        return external(Deployment::RootEmbedded);
    }

    ResolvedLocation {
        deployment: Deployment::DirectServing,
        options: WidgetOptions {
            base_path: parent_traversal(segments.len().saturating_sub(1)),
            current_page,
            is_webroot_container: false,
            repo_folder_name: None,
            is_external_site: false,
        },
    }
}

/// Các liên kết gốc mà menu dùng để dựng mọi `href`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavPaths {
    pub root: String,
    pub admin: String,
    pub logo: String,
}

impl NavPaths {
    pub fn from_options(options: &WidgetOptions) -> Self {
        let base = options.base_path.as_str();

        if options.is_external_site {
            let root = format!("/{}/", options.repo_folder());
            return Self {
                admin: format!("{root}admin/"),
                logo: format!("{root}{LOGO_FILE}"),
                root,
            };
        }

        if options.is_webroot_container {
            if let Some(repo) = options.repo_folder_name.as_deref() {
                let root = format!("/{repo}/");
                return Self {
                    admin: format!("{root}admin/"),
                    logo: join_base(base, LOGO_FILE),
                    root,
                };
            }
        }

        if base.is_empty() {
            Self {
                root: "./".to_string(),
                admin: "./admin/".to_string(),
                logo: LOGO_FILE.to_string(),
            }
        } else {
            Self {
                root: format!("{base}/"),
                admin: format!("{base}/admin/"),
                logo: join_base(base, LOGO_FILE),
            }
        }
    }
}

fn join_base(base: &str, file: &str) -> String {
    if base.is_empty() {
        file.to_string()
    } else if base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}

/// Báo cáo đầy đủ cho một vị trí, dùng bởi bridge JS và CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationReport {
    pub pathname: String,
    pub segments: Vec<String>,
    pub deployment: Deployment,
    pub options: WidgetOptions,
    pub paths: NavPaths,
}

pub fn describe_location(pathname: &str, repo_folder: &str) -> LocationReport {
    let resolved = resolve_location(pathname, repo_folder);
    let paths = NavPaths::from_options(&resolved.options);
    LocationReport {
        pathname: pathname.to_string(),
        segments: path_segments(pathname).into_iter().map(str::to_string).collect(),
        deployment: resolved.deployment,
        options: resolved.options,
        paths,
    }
}
