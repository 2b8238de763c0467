#![cfg(target_arch = "wasm32")]

//! Khởi động widget trên trang: sự kiện vòng đời và hàm `window.refreshFavicon()`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use sidenav_core::{App, LifecycleEvent, NavError, WidgetConfig};
use sidenav_wasm::format_nav_error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, Window};

use crate::host::{with_app, SharedApp, WeakApp, WebHost};
use crate::styles;

const REFRESH_GLOBAL: &str = "refreshFavicon";

struct LifecycleListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Handle JS giữ widget sống; `free()` hoặc `destroy()` gỡ toàn bộ.
#[wasm_bindgen]
pub struct NavigationHandle {
    app: SharedApp,
    lifecycle: Vec<LifecycleListener>,
    refresh: Option<Closure<dyn FnMut() -> Promise>>,
}

fn listen(
    target: EventTarget,
    event: &'static str,
    callback: impl FnMut(Event) + 'static,
) -> Result<LifecycleListener, JsValue> {
    let callback = Closure::<dyn FnMut(Event)>::new(callback);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    Ok(LifecycleListener {
        target,
        event,
        callback,
    })
}

fn lifecycle(app: &WeakApp, event: LifecycleEvent) {
    with_app(app, |app| app.lifecycle(event));
}

fn refresh_promise(app: &WeakApp) -> Promise {
    let app = app.clone();
    Promise::new(&mut |resolve: Function, _reject: Function| {
        let started = with_app(&app, |app| match app.refresh_favicon() {
            Some(ticket) => {
                app.host_mut().await_cycle(ticket, resolve.clone());
                true
            }
            None => false,
        });
        if started != Some(true) {
            if let Err(err) = resolve.call1(&JsValue::NULL, &JsValue::FALSE) {
                log::debug!("refreshFavicon promise not resolved: {err:?}");
            }
        }
    })
}

fn install(
    window: Window,
    document: Document,
    config: WidgetConfig,
) -> Result<NavigationHandle, JsValue> {
    if config.inject_styles {
        styles::ensure_styles(&document)?;
    }

    let app: SharedApp = Rc::new_cyclic(|weak: &WeakApp| {
        RefCell::new(App::new(
            WebHost::new(window.clone(), document.clone(), weak.clone()),
            config,
        ))
    });
    let weak = Rc::downgrade(&app);

    let mut listeners = Vec::new();
    if document.ready_state() == "loading" {
        let ready = weak.clone();
        listeners.push(listen(
            document.clone().into(),
            "DOMContentLoaded",
            move |_| lifecycle(&ready, LifecycleEvent::Ready),
        )?);
    } else {
        lifecycle(&weak, LifecycleEvent::Ready);
    }

    let visible = weak.clone();
    let watched = document.clone();
    listeners.push(listen(document.clone().into(), "visibilitychange", move |_| {
        if !watched.hidden() {
            lifecycle(&visible, LifecycleEvent::VisibilityRestored);
        }
    })?);

    let focused = weak.clone();
    listeners.push(listen(window.clone().into(), "focus", move |_| {
        lifecycle(&focused, LifecycleEvent::FocusRestored)
    })?);

    let unloading = weak.clone();
    listeners.push(listen(window.clone().into(), "beforeunload", move |_| {
        lifecycle(&unloading, LifecycleEvent::BeforeUnload)
    })?);

    let refresh_app = weak.clone();
    let refresh = Closure::<dyn FnMut() -> Promise>::new(move || refresh_promise(&refresh_app));
    Reflect::set(&window, &JsValue::from_str(REFRESH_GLOBAL), refresh.as_ref())?;

    log::info!("navigation installed");
    Ok(NavigationHandle {
        app,
        lifecycle: listeners,
        refresh: Some(refresh),
    })
}

/// Gắn thanh điều hướng vào trang hiện tại.
///
/// `config` là object tùy chọn, mọi trường đều có mặc định.
#[wasm_bindgen(js_name = installNavigation)]
pub fn install_navigation(config: Option<JsValue>) -> Result<NavigationHandle, JsValue> {
    console_error_panic_hook::set_once();
    crate::init_logging();

    let config = sidenav_wasm::parse_config(config)?;
    let window = web_sys::window()
        .ok_or_else(|| format_nav_error(NavError::Unsupported("không có window".to_string())))?;
    let document = window.document().ok_or_else(|| {
        format_nav_error(NavError::Unsupported("không truy cập được document".to_string()))
    })?;
    install(window, document, config)
}

#[wasm_bindgen]
impl NavigationHandle {
    /// Hủy rồi dựng lại ngay theo vị trí trang hiện tại.
    pub fn reinitialize(&self) {
        with_app(&Rc::downgrade(&self.app), |app| {
            app.initialize();
        });
    }

    #[wasm_bindgen(js_name = refreshFavicon)]
    pub fn refresh_favicon(&self) -> Promise {
        refresh_promise(&Rc::downgrade(&self.app))
    }

    #[wasm_bindgen(js_name = isCollapsed)]
    pub fn is_collapsed(&self) -> bool {
        self.app
            .try_borrow()
            .ok()
            .and_then(|app| app.widget().map(|widget| widget.state().is_collapsed()))
            .unwrap_or(false)
    }

    /// Gỡ widget và mọi listener vòng đời; gọi nhiều lần là vô hại.
    pub fn destroy(&mut self) {
        for listener in self.lifecycle.drain(..).rev() {
            if let Err(err) = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            ) {
                log::debug!("could not remove {} listener: {err:?}", listener.event);
            }
        }

        let refresh = self.refresh.take();
        match self.app.try_borrow_mut() {
            Ok(mut app) => teardown(&mut app, refresh),
            Err(_) => defer_teardown(Rc::clone(&self.app), refresh),
        }
    }
}

fn teardown(app: &mut App<WebHost>, refresh: Option<Closure<dyn FnMut() -> Promise>>) {
    if let Some(refresh) = refresh {
        let window = app.host().window().clone();
        let key = JsValue::from_str(REFRESH_GLOBAL);
        let ours: &JsValue = refresh.as_ref();
        if Reflect::get(&window, &key).ok().as_ref() == Some(ours) {
            if let Err(err) = Reflect::delete_property(&window, &key) {
                log::debug!("refreshFavicon not removed: {err:?}");
            }
        }
    }
    app.destroy();
}

/// App đang bị mượn (destroy gọi từ bên trong một callback): gỡ ở lượt sau.
fn defer_teardown(app: SharedApp, refresh: Option<Closure<dyn FnMut() -> Promise>>) {
    log::debug!("navigation busy, deferring teardown");
    let Some(window) = web_sys::window() else {
        log::warn!("no window, teardown skipped");
        return;
    };
    let deferred = Closure::once_into_js(move || {
        match app.try_borrow_mut() {
            Ok(mut app) => teardown(&mut app, refresh),
            Err(_) => log::warn!("navigation still busy, teardown skipped"),
        };
    });
    if let Err(err) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(deferred.unchecked_ref(), 0)
    {
        log::warn!("could not schedule teardown: {err:?}");
    }
}

impl Drop for NavigationHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}
