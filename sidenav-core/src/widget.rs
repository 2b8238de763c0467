use crate::favicon::{FaviconOutcome, FaviconState, FaviconTicket, RemoteConfig};
use crate::host::Host;
use crate::listeners::{tooltip_bindings, widget_bindings, Binding, DomEvent, ListenerRegistry, Target};
use crate::menu::{build_menu, find_section, render_sidebar, NavSection};
use crate::options::{WidgetConfig, WidgetOptions};
use crate::paths::NavPaths;
use crate::schedule::{Task, Timers};
use crate::state::{ModeChange, NavState, Transition};
use crate::storage::PersistedUiState;
use crate::tooltip::{position_tooltip, render_tooltip, TooltipContent};
use crate::NavError;

/// Thông tin bổ sung host đọc từ sự kiện click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickContext {
    /// Click rơi vào mũi tên mở subnav.
    pub on_arrow: bool,
    pub inside_sidebar: bool,
    pub on_mobile_toggle: bool,
}

/// Sự kiện người dùng đã được quy về ngữ nghĩa của widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ToggleClicked,
    ViewportResized,
    SidebarEntered,
    SidebarLeft,
    ExpanderClicked,
    NavLinkClicked { section: String, on_arrow: bool },
    NavLinkEntered { section: String },
    NavLinkLeft { section: String },
    DocumentClicked { inside_sidebar: bool, on_mobile_toggle: bool },
    MobileToggleClicked,
    OverlayClicked,
    TooltipEntered,
    TooltipLeft,
    TooltipClicked,
}

impl UiEvent {
    pub fn from_binding(binding: &Binding, click: ClickContext) -> Option<Self> {
        use DomEvent::{Click, MouseEnter, MouseLeave, Resize};

        let event = match (&binding.target, binding.event) {
            (Target::Toggle, Click) => UiEvent::ToggleClicked,
            (Target::Window, Resize) => UiEvent::ViewportResized,
            (Target::Sidebar, MouseEnter) => UiEvent::SidebarEntered,
            (Target::Sidebar, MouseLeave) => UiEvent::SidebarLeft,
            (Target::Expander, Click) => UiEvent::ExpanderClicked,
            (Target::NavLink(section), Click) => UiEvent::NavLinkClicked {
                section: section.clone(),
                on_arrow: click.on_arrow,
            },
            (Target::NavLink(section), MouseEnter) => UiEvent::NavLinkEntered {
                section: section.clone(),
            },
            (Target::NavLink(section), MouseLeave) => UiEvent::NavLinkLeft {
                section: section.clone(),
            },
            (Target::Document, Click) => UiEvent::DocumentClicked {
                inside_sidebar: click.inside_sidebar,
                on_mobile_toggle: click.on_mobile_toggle,
            },
            (Target::MobileToggle, Click) => UiEvent::MobileToggleClicked,
            (Target::Overlay, Click) => UiEvent::OverlayClicked,
            (Target::Tooltip, MouseEnter) => UiEvent::TooltipEntered,
            (Target::Tooltip, MouseLeave) => UiEvent::TooltipLeft,
            (Target::Tooltip, Click) => UiEvent::TooltipClicked,
            _ => return None,
        };
        Some(event)
    }
}

/// Host có nên chặn hành vi mặc định và lan truyền của sự kiện hay không.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Một instance sống của thanh điều hướng.
///
/// Không giữ host: mọi thao tác nhận `&mut H` để [`crate::App`] giữ quyền sở hữu
/// host qua nhiều lần dựng lại.
#[derive(Debug)]
pub struct Widget {
    generation: u64,
    options: WidgetOptions,
    config: WidgetConfig,
    paths: NavPaths,
    menu: Vec<NavSection>,
    state: NavState,
    listeners: ListenerRegistry,
    timers: Timers,
    favicon: FaviconState,
    tooltip: Option<String>,
    mounted: bool,
}

impl Widget {
    pub fn build<H: Host + ?Sized>(
        host: &mut H,
        options: WidgetOptions,
        config: WidgetConfig,
        generation: u64,
    ) -> Self {
        let persisted = PersistedUiState::load(&*host, &config);
        let is_mobile = config.is_mobile_width(host.viewport_width());
        let paths = NavPaths::from_options(&options);
        let menu = build_menu(&paths, options.current_page);
        log::debug!("navigation paths {paths:?} for {options:?}");

        let mut widget = Self {
            generation,
            options,
            config,
            paths,
            menu,
            state: NavState::new(persisted, is_mobile),
            listeners: ListenerRegistry::new(),
            timers: Timers::new(),
            favicon: FaviconState::new(),
            tooltip: None,
            mounted: false,
        };

        widget.schedule(host, Task::ResizeSettled);
        widget.render(host);
        for binding in widget_bindings(&widget.menu) {
            widget.listeners.attach(host, binding);
        }
        widget.schedule(host, Task::IconRefresh);
        widget.schedule(host, Task::RestoreState);
        widget.start_favicon_cycle(host);
        let period = widget.config.delay(Task::FaviconPoll);
        widget.timers.every(host, Task::FaviconPoll, period);
        widget
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn paths(&self) -> &NavPaths {
        &self.paths
    }

    pub fn menu(&self) -> &[NavSection] {
        &self.menu
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn favicon(&self) -> &FaviconState {
        &self.favicon
    }

    /// Mục menu đang hiện tooltip.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn schedule<H: Host + ?Sized>(&mut self, host: &mut H, task: Task) {
        let delay = self.config.delay(task);
        self.timers.defer(host, task, delay);
    }

    fn render<H: Host + ?Sized>(&mut self, host: &mut H) {
        let markup = render_sidebar(&self.menu, &self.paths, &self.options, &self.state);
        match crate::mount::mount(host, &markup) {
            Ok(handle) => {
                self.mounted = true;
                log::debug!("sidebar mounted, adopted {} host nodes", handle.adopted);
            }
            Err(err) => log::debug!("sidebar not mounted: {err}"),
        }
    }

    fn persist<H: Host + ?Sized>(&self, host: &mut H) {
        if let Err(err) = self.state.persisted().save(host, &self.config) {
            log::warn!("navigation state not saved: {err}");
        }
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: UiEvent) -> Propagation {
        match event {
            UiEvent::ToggleClicked => self.toggle(host),
            UiEvent::ViewportResized => self.schedule(host, Task::ResizeSettled),
            UiEvent::SidebarEntered => self.peek(host, true),
            UiEvent::SidebarLeft => self.peek(host, false),
            UiEvent::ExpanderClicked => self.unlock(host),
            UiEvent::NavLinkClicked { section, on_arrow } => {
                if on_arrow {
                    if !host.toggle_subnav(&section) {
                        log::debug!("no subnav for {section}");
                    }
                    return Propagation::Stop;
                }
                return self.follow(host, &section);
            }
            UiEvent::NavLinkEntered { section } => {
                if self.state.shows_tooltips() {
                    self.show_tooltip(host, &section);
                }
            }
            UiEvent::NavLinkLeft { .. } => {
                if self.state.shows_tooltips() && self.tooltip.is_some() {
                    self.schedule(host, Task::TooltipDismiss);
                }
            }
            UiEvent::DocumentClicked {
                inside_sidebar,
                on_mobile_toggle,
            } => {
                if self.state.is_mobile()
                    && self.state.mobile_open()
                    && !inside_sidebar
                    && !on_mobile_toggle
                {
                    self.close_mobile_menu(host);
                }
            }
            UiEvent::MobileToggleClicked => {
                let open = self.state.toggle_mobile_menu();
                sync_mobile_menu(host, open);
            }
            UiEvent::OverlayClicked => self.close_mobile_menu(host),
            UiEvent::TooltipEntered => {
                self.timers.cancel(host, Task::TooltipDismiss);
            }
            UiEvent::TooltipLeft => self.hide_tooltip(host),
            UiEvent::TooltipClicked => {
                if let Some(section) = self.tooltip.clone() {
                    return self.follow(host, &section);
                }
            }
        }
        Propagation::Continue
    }

    fn toggle<H: Host + ?Sized>(&mut self, host: &mut H) {
        match self.state.toggle() {
            Transition::MobileMenu { open } => sync_mobile_menu(host, open),
            Transition::Desktop(flags) => {
                host.set_class(&Target::Sidebar, "collapsed", flags.is_collapsed);
                host.set_class(&Target::Sidebar, "locked", flags.is_locked);
                host.set_class(&Target::Sidebar, "hovered", false);
                self.persist(host);
                if !self.state.shows_tooltips() {
                    self.hide_tooltip(host);
                }
                self.schedule(host, Task::Indicators);
            }
            Transition::Unchanged => {}
        }
    }

    fn unlock<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Transition::Desktop(_) = self.state.unlock() {
            host.set_class(&Target::Sidebar, "locked", false);
            self.persist(host);
            self.hide_tooltip(host);
            self.schedule(host, Task::Indicators);
        }
    }

    fn peek<H: Host + ?Sized>(&mut self, host: &mut H, hovered: bool) {
        if self.state.can_peek() {
            host.set_class(&Target::Sidebar, "hovered", hovered);
        }
    }

    fn close_mobile_menu<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.state.close_mobile_menu();
        sync_mobile_menu(host, false);
    }

    fn follow<H: Host + ?Sized>(&self, host: &mut H, section: &str) -> Propagation {
        let Some(target) = find_section(&self.menu, section) else {
            return Propagation::Continue;
        };
        let current = host.location_hash();
        if target.href.split_once('#').map(|(_, hash)| hash) == Some(current.as_str()) {
            log::debug!("already on #{current}, navigating again");
        }
        host.navigate(&target.href);
        Propagation::Stop
    }

    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, task: Task) {
        if !self.timers.fired(host, task) {
            log::debug!("ignoring stale {task:?} timer");
            return;
        }
        match task {
            Task::ResizeSettled => self.apply_viewport(host),
            Task::Indicators => {
                host.set_toggle_icon(self.state.toggle_icon());
                host.set_title(&Target::Expander, self.state.expander_title());
                self.schedule(host, Task::IconRefresh);
            }
            Task::IconRefresh => host.refresh_icons(),
            Task::TooltipDismiss => {
                if !host.tooltip_hovered() {
                    self.hide_tooltip(host);
                }
            }
            Task::RestoreState => {
                host.set_title(&Target::Expander, self.state.expander_title());
                self.schedule(host, Task::Indicators);
            }
            Task::FaviconPoll => {
                self.start_favicon_cycle(host);
            }
            Task::Reinitialize => {}
        }
    }

    fn apply_viewport<H: Host + ?Sized>(&mut self, host: &mut H) {
        let is_mobile = self.config.is_mobile_width(host.viewport_width());
        match self.state.set_mobile(is_mobile) {
            Some(ModeChange::EnteredMobile) => {
                for class in ["collapsed", "hovered", "locked"] {
                    host.set_class(&Target::Sidebar, class, false);
                }
                host.set_class(&Target::Overlay, "active", false);
                self.hide_tooltip(host);
                self.persist(host);
            }
            Some(ModeChange::LeftMobile) => {
                host.set_class(&Target::Sidebar, "mobile-open", false);
                host.set_class(&Target::Overlay, "active", false);
                let classes = self.state.desktop_classes();
                for class in ["collapsed", "locked"] {
                    host.set_class(&Target::Sidebar, class, classes.contains(&class));
                }
                self.schedule(host, Task::Indicators);
            }
            None => {}
        }
    }

    fn show_tooltip<H: Host + ?Sized>(&mut self, host: &mut H, section: &str) {
        self.hide_tooltip(host);
        let Some(content) = TooltipContent::for_section(&self.menu, section) else {
            return;
        };
        let Some(frame) = host.show_tooltip(&render_tooltip(&content)) else {
            log::debug!("tooltip for {section} could not be inserted");
            return;
        };
        self.tooltip = Some(content.section);
        for binding in tooltip_bindings() {
            self.listeners.attach(host, binding);
        }
        host.refresh_icons();
        if let Some(anchor) = host.bounding_rect(&Target::NavLink(section.to_string())) {
            host.place_tooltip(position_tooltip(anchor, frame.height));
        }
    }

    fn hide_tooltip<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.timers.cancel(host, Task::TooltipDismiss);
        self.listeners
            .detach_where(host, |binding| binding.target == Target::Tooltip);
        self.tooltip = None;
        host.hide_tooltip();
    }

    pub fn start_favicon_cycle<H: Host + ?Sized>(&mut self, host: &mut H) -> FaviconTicket {
        let ticket = self.favicon.begin(self.generation);
        log::debug!("favicon cycle {} started", ticket.cycle);
        host.fetch_config(&self.config.config_endpoint, ticket);
        ticket
    }

    pub fn on_config_loaded<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ticket: FaviconTicket,
        fetched: Result<RemoteConfig, NavError>,
    ) {
        if !self.favicon.is_in_flight(ticket) {
            return;
        }
        let hint = host.favicon_hint();
        match self.favicon.choose(fetched, hint) {
            Ok(Some(url)) => {
                log::info!("validating favicon {url}");
                host.probe_image(&url, ticket);
            }
            Ok(None) => {
                log::debug!("no favicon update needed");
                self.finish_favicon(host, ticket, FaviconOutcome::Unchanged);
            }
            Err(err) => {
                log::warn!("favicon update skipped: {err}");
                self.finish_favicon(host, ticket, FaviconOutcome::Failed(err.to_string()));
            }
        }
    }

    pub fn on_image_probed<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ticket: FaviconTicket,
        url: &str,
        loaded: bool,
    ) {
        if !self.favicon.is_in_flight(ticket) {
            return;
        }
        let outcome = if !loaded {
            let err = NavError::InvalidImage(url.to_string());
            log::warn!("{err}");
            FaviconOutcome::Failed(err.to_string())
        } else if self.favicon.current() == Some(url) {
            FaviconOutcome::Unchanged
        } else {
            if !host.set_logo_src(url) {
                log::debug!("no sidebar logo to update");
            }
            host.replace_icon_links(url);
            self.favicon.commit(url);
            log::info!("favicon updated to {url}");
            FaviconOutcome::Applied(url.to_string())
        };
        self.finish_favicon(host, ticket, outcome);
    }

    fn finish_favicon<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ticket: FaviconTicket,
        outcome: FaviconOutcome,
    ) {
        self.favicon.finish(ticket);
        host.cycle_finished(ticket, &outcome);
    }

    /// Hủy mọi hẹn giờ, tooltip, listener và chu kỳ favicon còn dở.
    pub fn destroy<H: Host + ?Sized>(mut self, host: &mut H) {
        let timers = self.timers.cancel_all(host);
        self.hide_tooltip(host);
        let listeners = self.listeners.detach_all(host);
        for ticket in self.favicon.drain_in_flight(self.generation) {
            host.cycle_finished(ticket, &FaviconOutcome::Cancelled);
        }
        log::debug!(
            "navigation instance {} destroyed ({timers} timers, {listeners} listeners)",
            self.generation
        );
    }
}

fn sync_mobile_menu<H: Host + ?Sized>(host: &mut H, open: bool) {
    host.set_class(&Target::Sidebar, "mobile-open", open);
    host.set_class(&Target::Overlay, "active", open);
}
