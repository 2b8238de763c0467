use crate::favicon::{FaviconTicket, RemoteConfig};
use crate::host::Host;
use crate::listeners::Binding;
use crate::options::{WidgetConfig, WidgetOptions};
use crate::paths::resolve_location;
use crate::schedule::{Task, Timers};
use crate::widget::{ClickContext, Propagation, UiEvent, Widget};
use crate::NavError;

/// Sự kiện vòng đời trang mà bootstrap chuyển vào.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Tài liệu đã sẵn sàng (`DOMContentLoaded`).
    Ready,
    VisibilityRestored,
    FocusRestored,
    BeforeUnload,
}

/// Handle cấp ứng dụng: giữ host và tối đa một widget sống.
///
/// Thay cho singleton tĩnh; bootstrap tạo và sở hữu nó.
pub struct App<H: Host> {
    host: H,
    config: WidgetConfig,
    widget: Option<Widget>,
    generation: u64,
    timers: Timers,
}

impl<H: Host> App<H> {
    pub fn new(host: H, config: WidgetConfig) -> Self {
        Self {
            host,
            config,
            widget: None,
            generation: 0,
            timers: Timers::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.widget.as_ref()
    }

    /// Thế hệ của instance dựng gần nhất.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dựng widget nếu chưa có; nếu đã có thì trả lại instance hiện tại.
    pub fn construct(&mut self, options: WidgetOptions) -> &Widget {
        if self.widget.is_some() {
            log::debug!("navigation already running, keeping instance {}", self.generation);
        }
        let Self {
            host,
            config,
            widget,
            generation,
            ..
        } = self;
        widget.get_or_insert_with(|| {
            *generation += 1;
            Widget::build(host, options, config.clone(), *generation)
        })
    }

    /// Hủy instance cũ rồi dựng lại theo vị trí trang hiện tại.
    pub fn initialize(&mut self) -> &Widget {
        self.destroy();
        let pathname = self.host.location_pathname();
        let resolved = resolve_location(&pathname, &self.config.repo_folder);
        log::info!(
            "initialising navigation for {pathname} ({:?})",
            resolved.deployment
        );
        self.construct(resolved.options)
    }

    /// Trả về `true` nếu có instance bị hủy.
    pub fn destroy(&mut self) -> bool {
        self.timers.cancel(&mut self.host, Task::Reinitialize);
        match self.widget.take() {
            Some(widget) => {
                widget.destroy(&mut self.host);
                true
            }
            None => false,
        }
    }

    pub fn lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Ready => {
                self.initialize();
            }
            LifecycleEvent::VisibilityRestored | LifecycleEvent::FocusRestored => {
                let delay = self.config.delay(Task::Reinitialize);
                self.timers.defer(&mut self.host, Task::Reinitialize, delay);
            }
            LifecycleEvent::BeforeUnload => {
                self.destroy();
            }
        }
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Propagation {
        match self.widget.as_mut() {
            Some(widget) => widget.handle(&mut self.host, event),
            None => Propagation::Continue,
        }
    }

    pub fn dispatch_binding(&mut self, binding: &Binding, click: ClickContext) -> Propagation {
        match UiEvent::from_binding(binding, click) {
            Some(event) => self.dispatch(event),
            None => Propagation::Continue,
        }
    }

    pub fn on_timer(&mut self, task: Task) {
        if task == Task::Reinitialize {
            if self.timers.fired(&mut self.host, task) {
                self.initialize();
            }
            return;
        }
        if let Some(widget) = self.widget.as_mut() {
            widget.on_timer(&mut self.host, task);
        }
    }

    pub fn on_config_loaded(
        &mut self,
        ticket: FaviconTicket,
        fetched: Result<RemoteConfig, NavError>,
    ) {
        match self.widget.as_mut() {
            Some(widget) if widget.generation() == ticket.generation => {
                widget.on_config_loaded(&mut self.host, ticket, fetched)
            }
            _ => log::debug!("dropping config result for retired instance {}", ticket.generation),
        }
    }

    pub fn on_image_probed(&mut self, ticket: FaviconTicket, url: &str, loaded: bool) {
        match self.widget.as_mut() {
            Some(widget) if widget.generation() == ticket.generation => {
                widget.on_image_probed(&mut self.host, ticket, url, loaded)
            }
            _ => log::debug!("dropping image probe for retired instance {}", ticket.generation),
        }
    }

    /// Chạy một chu kỳ favicon thủ công; `None` khi chưa có widget.
    pub fn refresh_favicon(&mut self) -> Option<FaviconTicket> {
        log::info!("manual favicon refresh requested");
        match self.widget.as_mut() {
            Some(widget) => Some(widget.start_favicon_cycle(&mut self.host)),
            None => {
                log::warn!("navigation not initialised yet");
                None
            }
        }
    }
}
