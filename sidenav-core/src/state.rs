use crate::storage::PersistedUiState;

/// Kết quả của thao tác bấm nút thu gọn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// Cờ bền vững đã đổi và phải được ghi lại ngay.
    Desktop(PersistedUiState),
    MobileMenu { open: bool },
}

/// Chuyển đổi giữa chế độ di động và máy tính.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnteredMobile,
    LeftMobile,
}

/// Trạng thái giao diện: hai cờ bền vững cộng hai cờ tạm thời.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    persisted: PersistedUiState,
    is_mobile: bool,
    mobile_open: bool,
}

impl NavState {
    pub fn new(persisted: PersistedUiState, is_mobile: bool) -> Self {
        Self {
            persisted: PersistedUiState {
                is_collapsed: persisted.is_collapsed,
                is_locked: persisted.is_locked && persisted.is_collapsed,
            },
            is_mobile,
            mobile_open: false,
        }
    }

    pub fn persisted(&self) -> PersistedUiState {
        self.persisted
    }

    pub fn is_collapsed(&self) -> bool {
        self.persisted.is_collapsed
    }

    pub fn is_locked(&self) -> bool {
        self.persisted.is_locked
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn mobile_open(&self) -> bool {
        self.mobile_open
    }

    /// Thu gọn luôn khóa, mở rộng luôn mở khóa. Trên di động thì mở/đóng menu.
    pub fn toggle(&mut self) -> Transition {
        if self.is_mobile {
            return Transition::MobileMenu {
                open: self.toggle_mobile_menu(),
            };
        }

        let collapse = !self.persisted.is_collapsed;
        self.persisted = PersistedUiState {
            is_collapsed: collapse,
            is_locked: collapse,
        };
        Transition::Desktop(self.persisted)
    }

    /// Bấm vùng mở rộng khi đang thu gọn và khóa: vẫn thu gọn nhưng mở khóa.
    pub fn unlock(&mut self) -> Transition {
        if !self.persisted.is_collapsed || !self.persisted.is_locked || self.is_mobile {
            return Transition::Unchanged;
        }
        self.persisted.is_locked = false;
        Transition::Desktop(self.persisted)
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_open = !self.mobile_open;
        self.mobile_open
    }

    /// Trả về `true` nếu menu đang mở trước đó.
    pub fn close_mobile_menu(&mut self) -> bool {
        std::mem::replace(&mut self.mobile_open, false)
    }

    /// Hiệu ứng "hé" khi rê chuột chỉ áp dụng lúc thu gọn, không khóa, không di động.
    pub fn can_peek(&self) -> bool {
        self.persisted.is_collapsed && !self.persisted.is_locked && !self.is_mobile
    }

    pub fn shows_tooltips(&self) -> bool {
        self.persisted.is_collapsed && self.persisted.is_locked
    }

    /// Cập nhật chế độ theo chiều rộng mới; `None` nếu không vượt ngưỡng.
    pub fn set_mobile(&mut self, is_mobile: bool) -> Option<ModeChange> {
        if self.is_mobile == is_mobile {
            return None;
        }
        self.is_mobile = is_mobile;
        if is_mobile {
            self.persisted.is_locked = false;
            Some(ModeChange::EnteredMobile)
        } else {
            self.mobile_open = false;
            Some(ModeChange::LeftMobile)
        }
    }

    /// Lớp CSS trạng thái cho sidebar ở chế độ máy tính.
    pub fn desktop_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.is_mobile {
            return classes;
        }
        if self.persisted.is_collapsed {
            classes.push("collapsed");
        }
        if self.persisted.is_locked {
            classes.push("locked");
        }
        classes
    }

    pub fn toggle_icon(&self) -> &'static str {
        if self.persisted.is_collapsed {
            "chevrons-right"
        } else {
            "chevrons-left"
        }
    }

    pub fn expander_title(&self) -> &'static str {
        match (self.persisted.is_collapsed, self.persisted.is_locked) {
            (true, true) => "Click to unlock navigation",
            (true, false) => "Hover to expand navigation",
            _ => "Click arrow to collapse navigation",
        }
    }
}
