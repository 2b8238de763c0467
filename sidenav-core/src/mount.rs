//! Gói nội dung sẵn có của trang vào container và chèn sidebar.

use crate::menu::ids;
use crate::NavError;

/// Năng lực thao tác cây tài liệu tối thiểu mà bộ dựng cần.
pub trait DocumentTree {
    type Node: Clone;

    fn body(&self) -> Option<Self::Node>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Phần tử đầu tiên có lớp `class` trong `scope` (hoặc toàn tài liệu).
    fn find_class(&self, scope: Option<&Self::Node>, class: &str) -> Option<Self::Node>;
    fn child_nodes(&self, parent: &Self::Node) -> Vec<Self::Node>;
    /// Chuyển `child` về cuối `parent` (tách khỏi cha cũ nếu có).
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), NavError>;
    fn remove_node(&mut self, node: &Self::Node);
    fn create_container(&mut self, class: &str) -> Result<Self::Node, NavError>;
    fn set_inner_html(&mut self, node: &Self::Node, html: &str) -> Result<(), NavError>;
}

/// Kết quả dựng: container bọc ngoài và vùng nội dung chứa các node của trang.
#[derive(Debug, Clone)]
pub struct MountHandle<N> {
    pub container: N,
    pub content: N,
    /// Số node của trang đã được chuyển vào vùng nội dung.
    pub adopted: usize,
}

/// Gỡ container cũ, trả nội dung về `<body>` theo thứ tự ban đầu.
pub fn unmount<T: DocumentTree + ?Sized>(tree: &mut T) -> Result<usize, NavError> {
    let body = tree
        .body()
        .ok_or_else(|| NavError::MissingElement("body".to_string()))?;

    for id in [ids::SIDEBAR, ids::OVERLAY] {
        if let Some(node) = tree.element_by_id(id) {
            tree.remove_node(&node);
        }
    }

    let Some(container) = tree.find_class(None, ids::CONTAINER_CLASS) else {
        return Ok(0);
    };

    let mut restored = 0;
    if let Some(content) = tree.find_class(Some(&container), ids::CONTENT_CLASS) {
        for child in tree.child_nodes(&content) {
            tree.append_child(&body, &child)?;
            restored += 1;
        }
    }
    tree.remove_node(&container);
    Ok(restored)
}

/// Dựng lại sidebar. Gọi nhiều lần liên tiếp không nhân đôi hay làm mất nội dung.
pub fn mount<T: DocumentTree + ?Sized>(
    tree: &mut T,
    sidebar_html: &str,
) -> Result<MountHandle<T::Node>, NavError> {
    unmount(tree)?;
    let body = tree
        .body()
        .ok_or_else(|| NavError::MissingElement("body".to_string()))?;

    let captured = tree.child_nodes(&body);

    let container = tree.create_container(ids::CONTAINER_CLASS)?;
    tree.append_child(&body, &container)?;
    tree.set_inner_html(&container, sidebar_html)?;

    let content = tree.create_container(ids::CONTENT_CLASS)?;
    tree.append_child(&container, &content)?;
    for node in &captured {
        tree.append_child(&content, node)?;
    }

    Ok(MountHandle {
        container,
        content,
        adopted: captured.len(),
    })
}
