mod common;

use common::{app_at, app_with, fire, settle, FakeHost, DESKTOP, PHONE};
use sidenav_core::{
    ids, Binding, ClickContext, DomEvent, KeyValueStore, Propagation, Target, Task,
    TooltipPosition, UiEvent,
};

fn state(app: &sidenav_core::App<FakeHost>) -> sidenav_core::NavState {
    *app.widget().expect("widget").state()
}

#[test]
fn first_visit_starts_collapsed_and_unlocked() {
    let app = app_at("/team/", DESKTOP);
    let state = state(&app);
    assert!(state.is_collapsed());
    assert!(!state.is_locked());
    assert!(!state.is_mobile());

    let classes = app.host().sidebar_classes();
    assert!(classes.contains("sidebar"));
    assert!(classes.contains("collapsed"));
    assert!(!classes.contains("locked"));
}

#[test]
fn toggle_couples_collapse_with_lock_and_persists() {
    let mut app = app_at("/team/", DESKTOP);

    app.dispatch(UiEvent::ToggleClicked);
    let expanded = state(&app);
    assert!(!expanded.is_collapsed());
    assert!(!expanded.is_locked());
    assert!(!app.host().sidebar_classes().contains("collapsed"));
    assert_eq!(app.host().stored("standaloneNavCollapsed").as_deref(), Some("false"));
    assert_eq!(app.host().stored("standaloneNavLocked").as_deref(), Some("false"));

    app.dispatch(UiEvent::ToggleClicked);
    let collapsed = state(&app);
    assert!(collapsed.is_collapsed());
    assert!(collapsed.is_locked());
    let classes = app.host().sidebar_classes();
    assert!(classes.contains("collapsed"));
    assert!(classes.contains("locked"));
    assert_eq!(app.host().stored("standaloneNavLocked").as_deref(), Some("true"));
}

#[test]
fn toggle_indicators_follow_after_debounce() {
    let mut app = app_at("/team/", DESKTOP);
    settle(&mut app);
    assert_eq!(app.host().toggle_icon.as_deref(), Some("chevrons-right"));

    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    assert_eq!(app.host().timer_count(Task::Indicators), 1);

    let refreshes = app.host().icon_refreshes;
    fire(&mut app, Task::Indicators);
    assert_eq!(app.host().toggle_icon.as_deref(), Some("chevrons-left"));
    assert_eq!(
        app.host().titles.get(ids::EXPANDER).map(String::as_str),
        Some(state(&app).expander_title())
    );
    fire(&mut app, Task::IconRefresh);
    assert_eq!(app.host().icon_refreshes, refreshes + 1);
}

#[test]
fn hover_peek_only_when_collapsed_and_unlocked() {
    let mut app = app_at("/team/", DESKTOP);

    app.dispatch(UiEvent::SidebarEntered);
    assert!(app.host().sidebar_classes().contains("hovered"));
    app.dispatch(UiEvent::SidebarLeft);
    assert!(!app.host().sidebar_classes().contains("hovered"));

    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    assert!(state(&app).is_locked());
    app.dispatch(UiEvent::SidebarEntered);
    assert!(!app.host().sidebar_classes().contains("hovered"));
}

#[test]
fn expander_unlocks_but_stays_collapsed() {
    let mut host = FakeHost::new("/team/", DESKTOP);
    host.store.set_item("standaloneNavCollapsed", "true").unwrap();
    host.store.set_item("standaloneNavLocked", "true").unwrap();
    let mut app = app_with(host);
    assert!(state(&app).is_locked());

    app.dispatch(UiEvent::ExpanderClicked);
    let state = state(&app);
    assert!(state.is_collapsed());
    assert!(!state.is_locked());
    assert!(!app.host().sidebar_classes().contains("locked"));
    assert_eq!(app.host().stored("standaloneNavLocked").as_deref(), Some("false"));

    app.dispatch(UiEvent::SidebarEntered);
    assert!(app.host().sidebar_classes().contains("hovered"));
}

#[test]
fn expander_is_ignored_when_expanded() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    let before = state(&app);
    app.dispatch(UiEvent::ExpanderClicked);
    assert_eq!(state(&app), before);
}

#[test]
fn stored_state_survives_rebuild() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    let saved = state(&app).persisted();

    app.initialize();
    assert_eq!(state(&app).persisted(), saved);
    assert!(app.host().sidebar_classes().contains("locked"));
}

#[test]
fn resize_is_debounced_and_enters_mobile() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    settle(&mut app);

    app.host_mut().width = PHONE;
    for _ in 0..5 {
        app.dispatch(UiEvent::ViewportResized);
    }
    assert_eq!(app.host().timer_count(Task::ResizeSettled), 1);
    assert!(!state(&app).is_mobile());

    fire(&mut app, Task::ResizeSettled);
    let state = state(&app);
    assert!(state.is_mobile());
    assert!(!state.is_locked());
    let classes = app.host().sidebar_classes();
    assert!(!classes.contains("collapsed"));
    assert!(!classes.contains("locked"));
    assert!(!classes.contains("hovered"));
    assert_eq!(app.host().stored("standaloneNavLocked").as_deref(), Some("false"));
}

#[test]
fn breakpoint_width_counts_as_mobile() {
    let app = app_at("/team/", 768.0);
    assert!(state(&app).is_mobile());
    assert!(!app.host().sidebar_classes().contains("collapsed"));

    let app = app_at("/team/", 769.0);
    assert!(!state(&app).is_mobile());
}

#[test]
fn mobile_menu_opens_and_closes() {
    let mut app = app_at("/team/", PHONE);

    app.dispatch(UiEvent::MobileToggleClicked);
    assert!(state(&app).mobile_open());
    assert!(app.host().sidebar_classes().contains("mobile-open"));
    assert!(app.host().overlay_classes().contains("active"));

    app.dispatch(UiEvent::OverlayClicked);
    assert!(!state(&app).mobile_open());
    assert!(!app.host().sidebar_classes().contains("mobile-open"));
    assert!(!app.host().overlay_classes().contains("active"));

    app.dispatch(UiEvent::ToggleClicked);
    assert!(state(&app).mobile_open());
    app.dispatch(UiEvent::DocumentClicked {
        inside_sidebar: true,
        on_mobile_toggle: false,
    });
    assert!(state(&app).mobile_open());
    app.dispatch(UiEvent::DocumentClicked {
        inside_sidebar: false,
        on_mobile_toggle: true,
    });
    assert!(state(&app).mobile_open());
    app.dispatch(UiEvent::DocumentClicked {
        inside_sidebar: false,
        on_mobile_toggle: false,
    });
    assert!(!state(&app).mobile_open());
}

#[test]
fn mobile_toggle_leaves_persisted_flags_alone() {
    let mut app = app_at("/team/", PHONE);
    let before = app.host().stored("standaloneNavCollapsed");
    app.dispatch(UiEvent::ToggleClicked);
    assert_eq!(app.host().stored("standaloneNavCollapsed"), before);
}

#[test]
fn leaving_mobile_closes_menu_and_restores_desktop_classes() {
    let mut app = app_at("/team/", PHONE);
    app.dispatch(UiEvent::MobileToggleClicked);

    app.host_mut().width = DESKTOP;
    app.dispatch(UiEvent::ViewportResized);
    fire(&mut app, Task::ResizeSettled);

    let state = state(&app);
    assert!(!state.is_mobile());
    assert!(!state.mobile_open());
    let classes = app.host().sidebar_classes();
    assert!(!classes.contains("mobile-open"));
    assert!(classes.contains("collapsed"));
    assert!(!app.host().overlay_classes().contains("active"));
    assert!(app.host().has_timer(Task::Indicators));
}

#[test]
fn arrow_click_toggles_subnav_without_navigation() {
    let mut app = app_at("/team/", DESKTOP);
    let outcome = app.dispatch(UiEvent::NavLinkClicked {
        section: "projects".to_string(),
        on_arrow: true,
    });
    assert_eq!(outcome, Propagation::Stop);
    assert!(app.host().expanded_subnavs.contains("projects"));
    assert!(app.host().navigations.is_empty());

    app.dispatch(UiEvent::NavLinkClicked {
        section: "projects".to_string(),
        on_arrow: true,
    });
    assert!(app.host().expanded_subnavs.is_empty());
}

#[test]
fn link_click_navigates_to_section_href() {
    let mut app = app_at("/team/admin/sql/", DESKTOP);
    let binding = Binding::new(Target::NavLink("home".to_string()), DomEvent::Click);
    let outcome = app.dispatch_binding(&binding, ClickContext::default());
    assert_eq!(outcome, Propagation::Stop);
    assert_eq!(app.host().navigations, vec!["/team/#home/welcome".to_string()]);

    app.host_mut().hash = "home/welcome".to_string();
    app.dispatch(UiEvent::NavLinkClicked {
        section: "home".to_string(),
        on_arrow: false,
    });
    assert_eq!(app.host().navigations.len(), 2);

    let outcome = app.dispatch(UiEvent::NavLinkClicked {
        section: "missing".to_string(),
        on_arrow: false,
    });
    assert_eq!(outcome, Propagation::Continue);
}

#[test]
fn tooltips_only_in_collapsed_locked_mode() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::NavLinkEntered {
        section: "people".to_string(),
    });
    assert!(app.host().tooltip.is_none());

    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    let listeners = app.host().live_listeners();
    app.dispatch(UiEvent::NavLinkEntered {
        section: "people".to_string(),
    });

    let markup = app.host().tooltip.clone().expect("tooltip shown");
    assert!(markup.contains("People &amp; Teams"));
    assert_eq!(
        app.host().tooltip_position,
        Some(TooltipPosition {
            left: 8.0,
            top: 200.0,
        })
    );
    assert_eq!(app.widget().and_then(|w| w.tooltip()), Some("people"));
    assert_eq!(app.host().live_listeners(), listeners + 3);
}

#[test]
fn tooltip_grace_period_survives_hover() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    let listeners = app.host().live_listeners();

    app.dispatch(UiEvent::NavLinkEntered {
        section: "account".to_string(),
    });
    app.dispatch(UiEvent::NavLinkLeft {
        section: "account".to_string(),
    });
    assert!(app.host().has_timer(Task::TooltipDismiss));

    app.dispatch(UiEvent::TooltipEntered);
    assert!(!app.host().has_timer(Task::TooltipDismiss));
    assert!(app.host().tooltip.is_some());

    app.dispatch(UiEvent::TooltipLeft);
    assert!(app.host().tooltip.is_none());
    assert_eq!(app.host().live_listeners(), listeners);
}

#[test]
fn tooltip_dismiss_respects_hovered_tooltip() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::NavLinkEntered {
        section: "home".to_string(),
    });
    app.dispatch(UiEvent::NavLinkLeft {
        section: "home".to_string(),
    });

    app.host_mut().tooltip_hovered = true;
    fire(&mut app, Task::TooltipDismiss);
    assert!(app.host().tooltip.is_some());

    app.host_mut().tooltip_hovered = false;
    app.dispatch(UiEvent::NavLinkLeft {
        section: "home".to_string(),
    });
    fire(&mut app, Task::TooltipDismiss);
    assert!(app.host().tooltip.is_none());
}

#[test]
fn tooltip_click_follows_section_and_expanding_hides_it() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::NavLinkEntered {
        section: "realitystream".to_string(),
    });

    assert_eq!(app.dispatch(UiEvent::TooltipClicked), Propagation::Stop);
    assert_eq!(app.host().navigations, vec!["/realitystream/".to_string()]);

    app.dispatch(UiEvent::ToggleClicked);
    assert!(app.host().tooltip.is_none());
    assert!(app.widget().and_then(|w| w.tooltip()).is_none());
}

#[test]
fn moving_between_links_replaces_the_tooltip() {
    let mut app = app_at("/team/", DESKTOP);
    app.dispatch(UiEvent::ToggleClicked);
    app.dispatch(UiEvent::ToggleClicked);
    let listeners = app.host().live_listeners();

    app.dispatch(UiEvent::NavLinkEntered {
        section: "home".to_string(),
    });
    app.dispatch(UiEvent::NavLinkEntered {
        section: "admin".to_string(),
    });
    assert_eq!(app.widget().and_then(|w| w.tooltip()), Some("admin"));
    assert_eq!(app.host().live_listeners(), listeners + 3);
}
