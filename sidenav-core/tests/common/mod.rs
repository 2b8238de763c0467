#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use sidenav_core::{
    ids, App, Binding, BrandingSource, DocumentTree, FaviconOutcome, FaviconTicket,
    KeyValueStore, LifecycleEvent, ListenerHost, ListenerId, MemoryStore, NavError, Rect,
    Scheduler, Surface, Target, Task, TaskHandle, TooltipPosition, WidgetConfig,
};

pub const DESKTOP: f64 = 1280.0;
pub const PHONE: f64 = 480.0;

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub label: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Host trong bộ nhớ: cây DOM phẳng, hẹn giờ, listener và kho lưu trữ.
#[derive(Debug)]
pub struct FakeHost {
    pub nodes: Vec<FakeNode>,
    pub width: f64,
    pub pathname: String,
    pub hash: String,
    pub store: MemoryStore,
    pub classes: BTreeMap<String, BTreeSet<String>>,
    pub sections: Vec<String>,
    pub titles: BTreeMap<String, String>,
    pub toggle_icon: Option<String>,
    pub expanded_subnavs: BTreeSet<String>,
    pub icon_refreshes: usize,
    pub navigations: Vec<String>,
    pub tooltip: Option<String>,
    pub tooltip_position: Option<TooltipPosition>,
    pub tooltip_hovered: bool,
    pub logo_src: Option<String>,
    pub icon_links: Vec<String>,
    pub hint: Option<String>,
    pub has_mobile_toggle: bool,
    pub next_timer: i32,
    pub timers: BTreeMap<i32, (Task, Duration, bool)>,
    pub next_listener: u32,
    pub listeners: BTreeMap<u32, Binding>,
    pub config_requests: Vec<(String, FaviconTicket)>,
    pub probes: Vec<(String, FaviconTicket)>,
    pub finished: Vec<(FaviconTicket, FaviconOutcome)>,
}

impl FakeHost {
    pub fn new(pathname: &str, width: f64) -> Self {
        let mut host = Self {
            nodes: vec![FakeNode {
                label: "body".to_string(),
                parent: None,
                children: Vec::new(),
            }],
            width,
            pathname: pathname.to_string(),
            hash: String::new(),
            store: MemoryStore::new(),
            classes: BTreeMap::new(),
            sections: Vec::new(),
            titles: BTreeMap::new(),
            toggle_icon: None,
            expanded_subnavs: BTreeSet::new(),
            icon_refreshes: 0,
            navigations: Vec::new(),
            tooltip: None,
            tooltip_position: None,
            tooltip_hovered: false,
            logo_src: None,
            icon_links: vec!["icon:/favicon.ico".to_string()],
            hint: None,
            has_mobile_toggle: true,
            next_timer: 0,
            timers: BTreeMap::new(),
            next_listener: 0,
            listeners: BTreeMap::new(),
            config_requests: Vec::new(),
            probes: Vec::new(),
            finished: Vec::new(),
        };
        for label in ["header", "main", "footer"] {
            let node = host.push(label);
            host.attach(0, node);
        }
        host
    }

    fn push(&mut self, label: &str) -> usize {
        self.nodes.push(FakeNode {
            label: label.to_string(),
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: usize, child: usize) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn detach(&mut self, child: usize) {
        if let Some(old) = self.nodes[child].parent.take() {
            self.nodes[old].children.retain(|node| *node != child);
        }
    }

    fn is_attached(&self, mut node: usize) -> bool {
        while let Some(parent) = self.nodes[node].parent {
            node = parent;
        }
        node == 0
    }

    fn find(&self, label: &str) -> Option<usize> {
        (0..self.nodes.len()).find(|id| self.nodes[*id].label == label && self.is_attached(*id))
    }

    pub fn labels(&self, parent: usize) -> Vec<String> {
        self.nodes[parent]
            .children
            .iter()
            .map(|id| self.nodes[*id].label.clone())
            .collect()
    }

    pub fn body_labels(&self) -> Vec<String> {
        self.labels(0)
    }

    pub fn content_labels(&self) -> Vec<String> {
        self.find(".main-content")
            .map(|content| self.labels(content))
            .unwrap_or_default()
    }

    pub fn count_attached(&self, label: &str) -> usize {
        (0..self.nodes.len())
            .filter(|id| self.nodes[*id].label == label && self.is_attached(*id))
            .count()
    }

    fn has_id(&self, id: &str) -> bool {
        self.find(&format!("#{id}")).is_some()
    }

    fn element_id(target: &Target) -> Option<&'static str> {
        match target {
            Target::Sidebar => Some(ids::SIDEBAR),
            Target::Toggle => Some(ids::TOGGLE),
            Target::Expander => Some(ids::EXPANDER),
            Target::Overlay => Some(ids::OVERLAY),
            _ => None,
        }
    }

    fn target_exists(&self, target: &Target) -> bool {
        match target {
            Target::Window | Target::Document => true,
            Target::MobileToggle => self.has_mobile_toggle,
            Target::Tooltip => self.tooltip.is_some(),
            Target::NavLink(section) => {
                self.has_id(ids::SIDEBAR) && self.sections.iter().any(|known| known == section)
            }
            other => Self::element_id(other).is_some_and(|id| self.has_id(id)),
        }
    }

    pub fn sidebar_classes(&self) -> BTreeSet<String> {
        self.classes.get(ids::SIDEBAR).cloned().unwrap_or_default()
    }

    pub fn overlay_classes(&self) -> BTreeSet<String> {
        self.classes.get(ids::OVERLAY).cloned().unwrap_or_default()
    }

    pub fn has_timer(&self, task: Task) -> bool {
        self.timers.values().any(|(pending, _, _)| *pending == task)
    }

    pub fn timer_count(&self, task: Task) -> usize {
        self.timers.values().filter(|(pending, _, _)| *pending == task).count()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get_item(key)
    }
}

fn attr(tag: &str, name: &str) -> Option<String> {
    let needle = format!(" {name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(tag[start..start + len].to_string())
}

impl DocumentTree for FakeHost {
    type Node = usize;

    fn body(&self) -> Option<usize> {
        Some(0)
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.find(&format!("#{id}"))
    }

    fn find_class(&self, scope: Option<&usize>, class: &str) -> Option<usize> {
        let found = self.find(&format!(".{class}"))?;
        match scope {
            Some(scope) if self.nodes[found].parent != Some(*scope) => None,
            _ => Some(found),
        }
    }

    fn child_nodes(&self, parent: &usize) -> Vec<usize> {
        self.nodes[*parent].children.clone()
    }

    fn append_child(&mut self, parent: &usize, child: &usize) -> Result<(), NavError> {
        self.attach(*parent, *child);
        Ok(())
    }

    fn remove_node(&mut self, node: &usize) {
        self.detach(*node);
    }

    fn create_container(&mut self, class: &str) -> Result<usize, NavError> {
        Ok(self.push(&format!(".{class}")))
    }

    fn set_inner_html(&mut self, node: &usize, html: &str) -> Result<(), NavError> {
        self.sections.clear();
        let mut rest = html;
        while let Some(start) = rest.find('<') {
            let tail = &rest[start..];
            let end = tail.find('>').unwrap_or(tail.len());
            let tag = &tail[..end];
            if let Some(section) = attr(tag, "data-section") {
                self.sections.push(section);
            }
            if let Some(id) = attr(tag, "id") {
                let classes = attr(tag, "class")
                    .map(|value| value.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
                self.classes.insert(id.clone(), classes);
                let element = self.push(&format!("#{id}"));
                self.attach(*node, element);
            }
            rest = &tail[end..];
        }
        Ok(())
    }
}

impl Surface for FakeHost {
    fn viewport_width(&self) -> f64 {
        self.width
    }

    fn location_pathname(&self) -> String {
        self.pathname.clone()
    }

    fn location_hash(&self) -> String {
        self.hash.clone()
    }

    fn navigate(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }

    fn set_class(&mut self, target: &Target, class: &str, on: bool) {
        let Some(id) = Self::element_id(target) else {
            return;
        };
        if !self.has_id(id) {
            return;
        }
        let classes = self.classes.entry(id.to_string()).or_default();
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn set_title(&mut self, target: &Target, title: &str) {
        if let Some(id) = Self::element_id(target) {
            if self.has_id(id) {
                self.titles.insert(id.to_string(), title.to_string());
            }
        }
    }

    fn set_toggle_icon(&mut self, icon: &str) {
        if self.has_id(ids::TOGGLE) {
            self.toggle_icon = Some(icon.to_string());
        }
    }

    fn toggle_subnav(&mut self, section: &str) -> bool {
        if !self.sections.iter().any(|known| known == section) {
            return false;
        }
        if !self.expanded_subnavs.remove(section) {
            self.expanded_subnavs.insert(section.to_string());
        }
        true
    }

    fn refresh_icons(&mut self) {
        self.icon_refreshes += 1;
    }

    fn bounding_rect(&self, target: &Target) -> Option<Rect> {
        let Target::NavLink(section) = target else {
            return None;
        };
        let index = self.sections.iter().position(|known| known == section)?;
        Some(Rect {
            left: 8.0,
            top: 100.0 + index as f64 * 48.0,
            width: 48.0,
            height: 40.0,
        })
    }

    fn show_tooltip(&mut self, markup: &str) -> Option<Rect> {
        self.tooltip = Some(markup.to_string());
        self.tooltip_position = None;
        Some(Rect {
            left: 0.0,
            top: 0.0,
            width: 160.0,
            height: 32.0,
        })
    }

    fn place_tooltip(&mut self, position: TooltipPosition) {
        self.tooltip_position = Some(position);
    }

    fn hide_tooltip(&mut self) -> bool {
        self.tooltip_hovered = false;
        self.tooltip.take().is_some()
    }

    fn tooltip_hovered(&self) -> bool {
        self.tooltip_hovered
    }

    fn set_logo_src(&mut self, url: &str) -> bool {
        if !self.has_id(ids::LOGO) {
            return false;
        }
        self.logo_src = Some(url.to_string());
        true
    }

    fn replace_icon_links(&mut self, url: &str) {
        self.icon_links = vec![format!("icon:{url}"), format!("shortcut icon:{url}")];
    }
}

impl Scheduler for FakeHost {
    fn schedule(&mut self, task: Task, delay: Duration, repeat: bool) -> Option<TaskHandle> {
        self.next_timer += 1;
        self.timers.insert(self.next_timer, (task, delay, repeat));
        Some(TaskHandle(self.next_timer))
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.timers.remove(&handle.0);
    }
}

impl ListenerHost for FakeHost {
    fn add_listener(&mut self, binding: &Binding) -> Option<ListenerId> {
        if !self.target_exists(&binding.target) {
            return None;
        }
        self.next_listener += 1;
        self.listeners.insert(self.next_listener, binding.clone());
        Some(ListenerId(self.next_listener))
    }

    fn remove_listener(&mut self, id: ListenerId) {
        let removed = self.listeners.remove(&id.0);
        assert!(removed.is_some(), "listener {id:?} removed twice");
    }
}

impl KeyValueStore for FakeHost {
    fn get_item(&self, key: &str) -> Option<String> {
        self.store.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), NavError> {
        self.store.set_item(key, value)
    }
}

impl BrandingSource for FakeHost {
    fn fetch_config(&mut self, endpoint: &str, ticket: FaviconTicket) {
        self.config_requests.push((endpoint.to_string(), ticket));
    }

    fn probe_image(&mut self, url: &str, ticket: FaviconTicket) {
        self.probes.push((url.to_string(), ticket));
    }

    fn favicon_hint(&self) -> Option<String> {
        self.hint.clone()
    }

    fn cycle_finished(&mut self, ticket: FaviconTicket, outcome: &FaviconOutcome) {
        self.finished.push((ticket, outcome.clone()));
    }
}

pub fn app_with(host: FakeHost) -> App<FakeHost> {
    let mut app = App::new(host, WidgetConfig::default());
    app.lifecycle(LifecycleEvent::Ready);
    app
}

pub fn app_at(pathname: &str, width: f64) -> App<FakeHost> {
    app_with(FakeHost::new(pathname, width))
}

/// Chạy một hẹn giờ đang chờ, như trình duyệt làm khi hết hạn.
pub fn fire(app: &mut App<FakeHost>, task: Task) {
    assert!(app.host().has_timer(task), "{task:?} is not scheduled");
    app.on_timer(task);
}

/// Chạy mọi hẹn giờ một lần (không lặp) cho tới khi không còn.
pub fn settle(app: &mut App<FakeHost>) {
    for _ in 0..10 {
        let due: Vec<Task> = app
            .host()
            .timers
            .values()
            .filter(|(_, _, repeat)| !repeat)
            .map(|(task, _, _)| *task)
            .collect();
        if due.is_empty() {
            return;
        }
        for task in due {
            if app.host().has_timer(task) {
                app.on_timer(task);
            }
        }
    }
}
