use serde::Serialize;

use crate::menu::NavSection;

/// Phần tử (hoặc đối tượng toàn cục) nhận sự kiện.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Window,
    Document,
    Sidebar,
    Toggle,
    Expander,
    MobileToggle,
    Overlay,
    NavLink(String),
    Tooltip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DomEvent {
    Click,
    MouseEnter,
    MouseLeave,
    Resize,
}

impl DomEvent {
    pub fn name(self) -> &'static str {
        match self {
            DomEvent::Click => "click",
            DomEvent::MouseEnter => "mouseenter",
            DomEvent::MouseLeave => "mouseleave",
            DomEvent::Resize => "resize",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    pub target: Target,
    pub event: DomEvent,
}

impl Binding {
    pub fn new(target: Target, event: DomEvent) -> Self {
        Self { target, event }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

/// Năng lực gắn/gỡ listener của host.
pub trait ListenerHost {
    /// `None` khi phần tử đích không tồn tại; widget bỏ qua binding đó.
    fn add_listener(&mut self, binding: &Binding) -> Option<ListenerId>;
    fn remove_listener(&mut self, id: ListenerId);
}

/// Danh sách listener theo đúng thứ tự đăng ký, để gỡ đối xứng khi hủy.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: Vec<(Binding, ListenerId)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach<H: ListenerHost + ?Sized>(&mut self, host: &mut H, binding: Binding) -> bool {
        match host.add_listener(&binding) {
            Some(id) => {
                self.entries.push((binding, id));
                true
            }
            None => {
                log::debug!("skipping {:?} listener, target missing", binding.target);
                false
            }
        }
    }

    /// Gỡ các listener thỏa điều kiện, theo thứ tự ngược lúc đăng ký.
    pub fn detach_where<H, F>(&mut self, host: &mut H, mut predicate: F) -> usize
    where
        H: ListenerHost + ?Sized,
        F: FnMut(&Binding) -> bool,
    {
        let mut removed = 0;
        let mut kept = Vec::with_capacity(self.entries.len());
        for (binding, id) in std::mem::take(&mut self.entries).into_iter().rev() {
            if predicate(&binding) {
                host.remove_listener(id);
                removed += 1;
            } else {
                kept.push((binding, id));
            }
        }
        kept.reverse();
        self.entries = kept;
        removed
    }

    pub fn detach_all<H: ListenerHost + ?Sized>(&mut self, host: &mut H) -> usize {
        self.detach_where(host, |_| true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter().map(|(binding, _)| binding)
    }
}

/// Toàn bộ listener mà một instance đăng ký khi dựng xong.
pub fn widget_bindings(menu: &[NavSection]) -> Vec<Binding> {
    let mut bindings = vec![
        Binding::new(Target::Toggle, DomEvent::Click),
        Binding::new(Target::Window, DomEvent::Resize),
        Binding::new(Target::Sidebar, DomEvent::MouseEnter),
        Binding::new(Target::Sidebar, DomEvent::MouseLeave),
        Binding::new(Target::Expander, DomEvent::Click),
    ];
    for section in menu {
        let target = Target::NavLink(section.id.to_string());
        bindings.push(Binding::new(target.clone(), DomEvent::Click));
        bindings.push(Binding::new(target.clone(), DomEvent::MouseEnter));
        bindings.push(Binding::new(target, DomEvent::MouseLeave));
    }
    bindings.push(Binding::new(Target::Document, DomEvent::Click));
    bindings.push(Binding::new(Target::MobileToggle, DomEvent::Click));
    bindings.push(Binding::new(Target::Overlay, DomEvent::Click));
    bindings
}

pub fn tooltip_bindings() -> [Binding; 3] {
    [
        Binding::new(Target::Tooltip, DomEvent::MouseEnter),
        Binding::new(Target::Tooltip, DomEvent::MouseLeave),
        Binding::new(Target::Tooltip, DomEvent::Click),
    ]
}
