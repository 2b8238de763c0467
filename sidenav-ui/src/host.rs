#![cfg(target_arch = "wasm32")]

//! `Host` trên trình duyệt: DOM, hẹn giờ, listener, localStorage và mạng qua web-sys.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::{Function, Promise, Reflect};
use sidenav_core::{
    ids, parse_remote_config, App, Binding, BrandingSource, ClickContext, DocumentTree,
    FaviconOutcome, FaviconTicket, KeyValueStore, ListenerHost, ListenerId, NavError,
    Propagation, Rect, RemoteConfig, Scheduler, Surface, Target, Task, TaskHandle,
    TooltipPosition,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, Node, Response, Window,
};

pub(crate) type SharedApp = Rc<RefCell<App<WebHost>>>;
pub(crate) type WeakApp = Weak<RefCell<App<WebHost>>>;

/// Chạy `f` trên app nếu app còn sống và không đang bị mượn (gọi lồng nhau).
///
/// Closure bị gỡ ở lượt trước được giải phóng ở đây, sau khi nhả `RefCell`.
pub(crate) fn with_app<R>(app: &WeakApp, f: impl FnOnce(&mut App<WebHost>) -> R) -> Option<R> {
    let app = app.upgrade()?;
    let (result, retired) = {
        let Ok(mut guard) = app.try_borrow_mut() else {
            log::debug!("navigation busy, dropping nested callback");
            return None;
        };
        let retired = guard.host_mut().take_retired();
        (f(&mut guard), retired)
    };
    drop(retired);
    Some(result)
}

fn dom_error(err: JsValue) -> NavError {
    NavError::Dom(format!("{err:?}"))
}

struct ListenerEntry {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct TimerEntry {
    repeat: bool,
    callback: Closure<dyn FnMut()>,
}

/// Closure đã gỡ khỏi DOM nhưng có thể vẫn đang chạy trong lượt hiện tại.
#[derive(Default)]
pub(crate) struct Retired {
    listeners: Vec<Closure<dyn FnMut(Event)>>,
    timers: Vec<Closure<dyn FnMut()>>,
}

pub struct WebHost {
    window: Window,
    document: Document,
    app: WeakApp,
    next_listener: u32,
    listeners: BTreeMap<u32, ListenerEntry>,
    timers: BTreeMap<i32, TimerEntry>,
    retired: Retired,
    favicon_waiters: Vec<(FaviconTicket, Function)>,
}

impl WebHost {
    pub(crate) fn new(window: Window, document: Document, app: WeakApp) -> Self {
        Self {
            window,
            document,
            app,
            next_listener: 0,
            listeners: BTreeMap::new(),
            timers: BTreeMap::new(),
            retired: Retired::default(),
            favicon_waiters: Vec::new(),
        }
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    fn take_retired(&mut self) -> Retired {
        std::mem::take(&mut self.retired)
    }

    /// Hẹn trả kết quả chu kỳ `ticket` cho một Promise của `refreshFavicon()`.
    pub(crate) fn await_cycle(&mut self, ticket: FaviconTicket, resolve: Function) {
        self.favicon_waiters.push((ticket, resolve));
    }

    fn element(&self, target: &Target) -> Option<Element> {
        let id = match target {
            Target::Window | Target::Document => return None,
            Target::NavLink(section) => return self.nav_link(section),
            Target::Sidebar => ids::SIDEBAR,
            Target::Toggle => ids::TOGGLE,
            Target::Expander => ids::EXPANDER,
            Target::MobileToggle => ids::MOBILE_TOGGLE,
            Target::Overlay => ids::OVERLAY,
            Target::Tooltip => ids::TOOLTIP,
        };
        self.document.get_element_by_id(id)
    }

    fn event_target(&self, target: &Target) -> Option<EventTarget> {
        match target {
            Target::Window => Some(self.window.clone().into()),
            Target::Document => Some(self.document.clone().into()),
            other => self.element(other).map(Into::into),
        }
    }

    fn nav_link(&self, section: &str) -> Option<Element> {
        let selector = format!("#{} .nav-link[data-section=\"{section}\"]", ids::SIDEBAR);
        self.document.query_selector(&selector).ok().flatten()
    }
}

fn click_context(document: &Document, event: &Event) -> ClickContext {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
        return ClickContext::default();
    };
    let element = match target.dyn_ref::<Element>() {
        Some(element) => Some(element.clone()),
        None => target.parent_element(),
    };
    let on_arrow = element
        .and_then(|element| element.closest(".nav-arrow").ok().flatten())
        .is_some();
    let inside = |id: &str| {
        document
            .get_element_by_id(id)
            .is_some_and(|container| container.contains(Some(&target)))
    };
    ClickContext {
        on_arrow,
        inside_sidebar: inside(ids::SIDEBAR),
        on_mobile_toggle: inside(ids::MOBILE_TOGGLE),
    }
}

fn rect_of(element: &Element) -> Rect {
    let bounds = element.get_bounding_client_rect();
    Rect {
        left: bounds.left(),
        top: bounds.top(),
        width: bounds.width(),
        height: bounds.height(),
    }
}

impl DocumentTree for WebHost {
    type Node = Node;

    fn body(&self) -> Option<Node> {
        self.document.body().map(Into::into)
    }

    fn element_by_id(&self, id: &str) -> Option<Node> {
        self.document.get_element_by_id(id).map(Into::into)
    }

    fn find_class(&self, scope: Option<&Node>, class: &str) -> Option<Node> {
        let selector = format!(".{class}");
        let found = match scope.and_then(|node| node.dyn_ref::<Element>()) {
            Some(scope) => scope.query_selector(&selector),
            None => self.document.query_selector(&selector),
        };
        found.ok().flatten().map(Into::into)
    }

    fn child_nodes(&self, parent: &Node) -> Vec<Node> {
        let list = parent.child_nodes();
        (0..list.length()).filter_map(|index| list.item(index)).collect()
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), NavError> {
        parent.append_child(child).map(|_| ()).map_err(dom_error)
    }

    fn remove_node(&mut self, node: &Node) {
        if let Some(parent) = node.parent_node() {
            if let Err(err) = parent.remove_child(node) {
                log::debug!("could not detach node: {err:?}");
            }
        }
    }

    fn create_container(&mut self, class: &str) -> Result<Node, NavError> {
        let element = self.document.create_element("div").map_err(dom_error)?;
        element.set_class_name(class);
        Ok(element.into())
    }

    fn set_inner_html(&mut self, node: &Node, html: &str) -> Result<(), NavError> {
        let element = node
            .dyn_ref::<Element>()
            .ok_or_else(|| NavError::Dom("container is not an element".to_string()))?;
        element.set_inner_html(html);
        Ok(())
    }
}

impl Surface for WebHost {
    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }

    fn location_pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn location_hash(&self) -> String {
        let hash = self.window.location().hash().unwrap_or_default();
        hash.strip_prefix('#').unwrap_or(&hash).to_string()
    }

    fn navigate(&mut self, href: &str) {
        if let Err(err) = self.window.location().set_href(href) {
            log::warn!("navigation to {href} failed: {err:?}");
        }
    }

    fn set_class(&mut self, target: &Target, class: &str, on: bool) {
        match self.element(target) {
            Some(element) => {
                if let Err(err) = element.class_list().toggle_with_force(class, on) {
                    log::debug!("class {class} not updated: {err:?}");
                }
            }
            None => log::debug!("no element for {target:?}"),
        }
    }

    fn set_title(&mut self, target: &Target, title: &str) {
        if let Some(element) = self.element(target) {
            if let Err(err) = element.set_attribute("title", title) {
                log::debug!("title not updated: {err:?}");
            }
        }
    }

    fn set_toggle_icon(&mut self, icon: &str) {
        if let Some(toggle) = self.element(&Target::Toggle) {
            toggle.set_inner_html(&format!(r#"<i data-feather="{icon}"></i>"#));
        }
    }

    fn toggle_subnav(&mut self, section: &str) -> bool {
        let Some(link) = self.nav_link(section) else {
            return false;
        };
        let subnav = link
            .parent_element()
            .and_then(|item| item.query_selector(".subnav").ok().flatten());
        let arrow = link.query_selector(".nav-arrow").ok().flatten();
        let (Some(subnav), Some(arrow)) = (subnav, arrow) else {
            return false;
        };
        let expand = !subnav.class_list().contains("expanded");
        for element in [subnav, arrow] {
            if let Err(err) = element.class_list().toggle_with_force("expanded", expand) {
                log::debug!("subnav class not updated: {err:?}");
            }
        }
        true
    }

    fn refresh_icons(&mut self) {
        let Ok(feather) = Reflect::get(&self.window, &JsValue::from_str("feather")) else {
            return;
        };
        if feather.is_undefined() || feather.is_null() {
            return;
        }
        let replace = Reflect::get(&feather, &JsValue::from_str("replace"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok());
        if let Some(replace) = replace {
            if let Err(err) = replace.call0(&feather) {
                log::debug!("feather.replace failed: {err:?}");
            }
        }
    }

    fn bounding_rect(&self, target: &Target) -> Option<Rect> {
        self.element(target).map(|element| rect_of(&element))
    }

    fn show_tooltip(&mut self, markup: &str) -> Option<Rect> {
        let body = self.document.body()?;
        let tooltip = self.document.create_element("div").ok()?;
        tooltip.set_id(ids::TOOLTIP);
        tooltip.set_class_name("nav-tooltip show");
        tooltip.set_inner_html(markup);
        body.append_child(&tooltip).ok()?;
        Some(rect_of(&tooltip))
    }

    fn place_tooltip(&mut self, position: TooltipPosition) {
        let Some(tooltip) = self
            .element(&Target::Tooltip)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let style = tooltip.style();
        let placed = style
            .set_property("left", &format!("{}px", position.left))
            .and_then(|_| style.set_property("top", &format!("{}px", position.top)));
        if let Err(err) = placed {
            log::debug!("tooltip not positioned: {err:?}");
        }
    }

    fn hide_tooltip(&mut self) -> bool {
        match self.element(&Target::Tooltip) {
            Some(tooltip) => {
                tooltip.remove();
                true
            }
            None => false,
        }
    }

    fn tooltip_hovered(&self) -> bool {
        self.element(&Target::Tooltip)
            .is_some_and(|tooltip| tooltip.matches(":hover").unwrap_or(false))
    }

    fn set_logo_src(&mut self, url: &str) -> bool {
        match self.document.get_element_by_id(ids::LOGO) {
            Some(logo) => logo.set_attribute("src", url).is_ok(),
            None => false,
        }
    }

    fn replace_icon_links(&mut self, url: &str) {
        if let Ok(existing) = self
            .document
            .query_selector_all(r#"link[rel="icon"], link[rel="shortcut icon"]"#)
        {
            for index in 0..existing.length() {
                if let Some(link) = existing.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
                    link.remove();
                }
            }
        }

        let Some(head) = self.document.head() else {
            log::warn!("document has no <head>, icon links not replaced");
            return;
        };
        for rel in ["icon", "shortcut icon"] {
            let link = match self.document.create_element("link") {
                Ok(link) => link,
                Err(err) => {
                    log::warn!("could not create icon link: {err:?}");
                    return;
                }
            };
            let added = link
                .set_attribute("rel", rel)
                .and_then(|_| link.set_attribute("type", "image/png"))
                .and_then(|_| link.set_attribute("href", url))
                .and_then(|_| head.append_child(&link).map(|_| ()));
            if let Err(err) = added {
                log::warn!("icon link {rel} not added: {err:?}");
            }
        }
    }
}

impl Scheduler for WebHost {
    fn schedule(&mut self, task: Task, delay: Duration, repeat: bool) -> Option<TaskHandle> {
        let app = self.app.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            with_app(&app, |app| app.on_timer(task));
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let function: &Function = callback.as_ref().unchecked_ref();
        let handle = if repeat {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(function, millis)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(function, millis)
        };
        match handle {
            Ok(handle) => {
                self.timers.insert(handle, TimerEntry { repeat, callback });
                Some(TaskHandle(handle))
            }
            Err(err) => {
                log::warn!("could not schedule {task:?}: {err:?}");
                None
            }
        }
    }

    fn cancel(&mut self, handle: TaskHandle) {
        let Some(entry) = self.timers.remove(&handle.0) else {
            return;
        };
        if entry.repeat {
            self.window.clear_interval_with_handle(handle.0);
        } else {
            self.window.clear_timeout_with_handle(handle.0);
        }
        self.retired.timers.push(entry.callback);
    }
}

impl ListenerHost for WebHost {
    fn add_listener(&mut self, binding: &Binding) -> Option<ListenerId> {
        let target = self.event_target(&binding.target)?;
        let app = self.app.clone();
        let document = self.document.clone();
        let fired = binding.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let click = click_context(&document, &event);
            let outcome = with_app(&app, |app| app.dispatch_binding(&fired, click));
            if outcome == Some(Propagation::Stop) {
                event.prevent_default();
                event.stop_propagation();
            }
        });

        let event = binding.event.name();
        if let Err(err) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            log::debug!("could not listen for {event} on {:?}: {err:?}", binding.target);
            return None;
        }

        self.next_listener += 1;
        let id = self.next_listener;
        self.listeners.insert(
            id,
            ListenerEntry {
                target,
                event,
                callback,
            },
        );
        Some(ListenerId(id))
    }

    fn remove_listener(&mut self, id: ListenerId) {
        let Some(entry) = self.listeners.remove(&id.0) else {
            return;
        };
        if let Err(err) = entry
            .target
            .remove_event_listener_with_callback(entry.event, entry.callback.as_ref().unchecked_ref())
        {
            log::debug!("could not remove {} listener: {err:?}", entry.event);
        }
        self.retired.listeners.push(entry.callback);
    }
}

impl KeyValueStore for WebHost {
    fn get_item(&self, key: &str) -> Option<String> {
        let storage = self.window.local_storage().ok().flatten()?;
        storage.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), NavError> {
        let storage = self
            .window
            .local_storage()
            .map_err(|err| NavError::Storage(format!("{err:?}")))?
            .ok_or_else(|| NavError::Storage("localStorage unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|err| NavError::Storage(format!("{err:?}")))
    }
}

async fn fetch_remote_config(window: Window, endpoint: String) -> Result<RemoteConfig, NavError> {
    let fetch_error = |err: JsValue| NavError::ConfigFetch(format!("{err:?}"));

    let response = JsFuture::from(window.fetch_with_str(&endpoint))
        .await
        .map_err(fetch_error)?;
    let response: Response = response.dyn_into().map_err(fetch_error)?;
    if !response.ok() {
        return Err(NavError::ConfigFetch(format!(
            "{endpoint} answered {}",
            response.status()
        )));
    }
    let body = JsFuture::from(response.text().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?;
    let body = body
        .as_string()
        .ok_or_else(|| NavError::ConfigParse("response body is not text".to_string()))?;
    parse_remote_config(&body)
}

fn page_hint(window: &Window) -> Option<String> {
    let read = |source: &JsValue| {
        Reflect::get(source, &JsValue::from_str("SITE_FAVICON"))
            .ok()
            .and_then(|value| value.as_string())
            .filter(|value| !value.is_empty())
    };
    read(window).or_else(|| {
        let config = Reflect::get(window, &JsValue::from_str("config")).ok()?;
        if config.is_object() {
            read(&config)
        } else {
            None
        }
    })
}

impl BrandingSource for WebHost {
    fn fetch_config(&mut self, endpoint: &str, ticket: FaviconTicket) {
        let app = self.app.clone();
        let window = self.window.clone();
        let endpoint = endpoint.to_string();
        spawn_local(async move {
            let fetched = fetch_remote_config(window, endpoint).await;
            with_app(&app, |app| app.on_config_loaded(ticket, fetched));
        });
    }

    fn probe_image(&mut self, url: &str, ticket: FaviconTicket) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                log::warn!("could not create probe image: {err:?}");
                let app = self.app.clone();
                let url = url.to_string();
                spawn_local(async move {
                    with_app(&app, |app| app.on_image_probed(ticket, &url, false));
                });
                return;
            }
        };

        let loaded = Promise::new(&mut |resolve, reject| {
            image.set_onload(Some(&resolve));
            image.set_onerror(Some(&reject));
        });
        image.set_src(url);

        let app = self.app.clone();
        let url = url.to_string();
        spawn_local(async move {
            let loaded = JsFuture::from(loaded).await.is_ok();
            image.set_onload(None);
            image.set_onerror(None);
            with_app(&app, |app| app.on_image_probed(ticket, &url, loaded));
        });
    }

    fn favicon_hint(&self) -> Option<String> {
        page_hint(&self.window)
    }

    fn cycle_finished(&mut self, ticket: FaviconTicket, outcome: &FaviconOutcome) {
        let result = JsValue::from_bool(outcome.is_success());
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.favicon_waiters)
            .into_iter()
            .partition(|(waiting, _)| *waiting == ticket);
        self.favicon_waiters = pending;
        for (_, resolve) in done {
            if let Err(err) = resolve.call1(&JsValue::NULL, &result) {
                log::debug!("refreshFavicon promise not resolved: {err:?}");
            }
        }
    }
}
