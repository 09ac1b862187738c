use std::cell::RefCell;

use gloo_storage::Storage;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;

use crate::canvas::MeadowCanvas;
use crate::config::{FieldConfig, SETTINGS_KEY};
use crate::deep_link::{DeepLinks, Resolution};
use crate::effects::WakeTimer;
use crate::field::{Field, FieldError, PlantForm};
use crate::mode::Mode;
use crate::navigation::{BrowserHistory, NavigationPort};
use crate::render_loop::FrameLoop;
use crate::store::{FlowerStore, HttpStore};
use crate::viewport::Viewport;
use crate::views::{DetailPanel, ErrorBanner, PlantPanel};

pub(crate) type BrowserField = Field<BrowserHistory>;

#[derive(Clone, Copy)]
pub(crate) struct FieldState(pub RwSignal<BrowserField>);

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

type EventHandler = Closure<dyn Fn(web_sys::Event)>;

/// Window-level listeners owned by the mounted app; removed on drop.
struct WindowBindings {
    window: web_sys::Window,
    listeners: Vec<(&'static str, EventHandler)>,
}

impl Drop for WindowBindings {
    fn drop(&mut self) {
        for (event, handler) in &self.listeners {
            let _ = self
                .window
                .remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref());
        }
    }
}

thread_local! {
    static WINDOW_BINDINGS: RefCell<Option<WindowBindings>> = const { RefCell::new(None) };
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
    static WAKE_TIMER: RefCell<Option<WakeTimer>> = const { RefCell::new(None) };
}

fn bind_window(listeners: Vec<(&'static str, EventHandler)>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let listeners = listeners
        .into_iter()
        .filter(|(event, handler)| {
            window
                .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
                .is_ok()
        })
        .collect();
    WINDOW_BINDINGS.with(|slot| {
        // Dropping any previous binding detaches its listeners first.
        let _old = slot.borrow_mut().take();
        *slot.borrow_mut() = Some(WindowBindings { window, listeners });
    });
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    show_labels: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { show_labels: true }
    }
}

/// Key events aimed at form fields belong to the form.
fn is_typing_target(e: &web_sys::KeyboardEvent) -> bool {
    let tag = e
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
        .map(|el| el.tag_name())
        .unwrap_or_default();
    matches!(tag.as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

fn spawn_resolution(
    field: RwSignal<BrowserField>,
    links: StoredValue<DeepLinks>,
    store: StoredValue<HttpStore>,
    ticket: Resolution,
) {
    spawn_local(async move {
        let result = store.get_value().get_by_slug(&ticket.slug).await;
        let now = js_sys::Date::now();
        field.update(|f| {
            f.advance(now);
            links.update_value(|l| {
                l.complete(ticket, result, f);
            });
        });
    });
}

/// Root component: owns the field, wires window events, history and timers
/// into it, and renders the meadow with its panels.
#[component]
pub fn App() -> impl IntoView {
    let (width, height) = canvas_dimensions();
    let field: RwSignal<BrowserField> = RwSignal::new(Field::new(
        FieldConfig::default(),
        Viewport::new(width, height),
        BrowserHistory,
    ));
    let links: StoredValue<DeepLinks> = StoredValue::new(DeepLinks::new());
    let store: StoredValue<HttpStore> = StoredValue::new(HttpStore::default());

    let saved: Settings = gloo_storage::LocalStorage::get(SETTINGS_KEY).unwrap_or_default();
    let show_labels: RwSignal<bool> = RwSignal::new(saved.show_labels);

    provide_context(FieldState(field));

    Effect::new(move || {
        let settings = Settings {
            show_labels: show_labels.get(),
        };
        let _ = gloo_storage::LocalStorage::set(SETTINGS_KEY, &settings);
    });

    // Initial load; the path the page was opened at resolves once it settles.
    field.update(|f| f.start_bulk_load());
    field.with_untracked(|f| links.update_value(|l| l.on_initial_path(f)));
    spawn_local(async move {
        let result = store.get_value().list(None).await;
        let now = js_sys::Date::now();
        let ticket = field
            .try_update(|f| {
                f.finish_bulk_load(result);
                f.advance(now);
                links
                    .try_update_value(|l| l.on_bulk_load_settled(f))
                    .flatten()
            })
            .flatten();
        if let Some(ticket) = ticket {
            spawn_resolution(field, links, store, ticket);
        }
    });

    // Camera frames only run while it is moving.
    FRAME_LOOP.with(|slot| {
        *slot.borrow_mut() = Some(FrameLoop::new(move || {
            field.try_update(|f| f.tick()).unwrap_or(false)
        }));
    });
    let moving = Memo::new(move |_| field.with(|f| f.camera().is_moving()));
    Effect::new(move || {
        if moving.get() {
            FRAME_LOOP.with(|slot| {
                if let Some(frame_loop) = slot.borrow().as_ref() {
                    frame_loop.start();
                }
            });
        }
    });

    // Effect timers wake the field at their earliest deadline.
    WAKE_TIMER.with(|slot| *slot.borrow_mut() = Some(WakeTimer::default()));
    let next_wake = Memo::new(move |_| field.with(|f| f.next_wake()));
    Effect::new(move || {
        let deadline = next_wake.get();
        WAKE_TIMER.with(|slot| {
            let mut slot = slot.borrow_mut();
            let Some(timer) = slot.as_mut() else {
                return;
            };
            match deadline {
                Some(deadline) => timer.schedule(deadline - js_sys::Date::now(), move || {
                    field.update(|f| {
                        f.advance(js_sys::Date::now());
                    });
                }),
                None => timer.cancel(),
            }
        });
    });

    let on_keydown: EventHandler = Closure::new(move |e: web_sys::Event| {
        let Some(e) = e.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        if is_typing_target(e) {
            return;
        }
        let key = e.key();
        if key == "n" {
            show_labels.update(|v| *v = !*v);
            return;
        }
        if field.try_update(|f| f.key_down(&key)).unwrap_or(false) {
            e.prevent_default();
        }
    });
    let on_keyup: EventHandler = Closure::new(move |e: web_sys::Event| {
        let Some(e) = e.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        field.update(|f| {
            f.key_up(&e.key());
        });
    });
    let on_popstate: EventHandler = Closure::new(move |_: web_sys::Event| {
        let path = BrowserHistory.current_path();
        let ticket = field
            .try_update(|f| links.try_update_value(|l| l.on_location_change(&path, f)))
            .flatten()
            .flatten();
        if let Some(ticket) = ticket {
            spawn_resolution(field, links, store, ticket);
        }
    });
    let on_resize: EventHandler = Closure::new(move |_: web_sys::Event| {
        let (w, h) = canvas_dimensions();
        field.update(|f| f.set_viewport(Viewport::new(w, h)));
    });
    bind_window(vec![
        ("keydown", on_keydown),
        ("keyup", on_keyup),
        ("popstate", on_popstate),
        ("resize", on_resize),
    ]);

    on_cleanup(move || {
        WINDOW_BINDINGS.with(|slot| slot.borrow_mut().take());
        FRAME_LOOP.with(|slot| slot.borrow_mut().take());
        WAKE_TIMER.with(|slot| slot.borrow_mut().take());
        field.try_update(|f| f.teardown());
    });

    let mode = Memo::new(move |_| field.with(|f| f.mode().clone()));
    let banner = Memo::new(move |_| {
        field.with(|f| {
            f.error()
                .filter(|e| !e.is_placement())
                .map(ToString::to_string)
        })
    });
    let form_error = Signal::derive(move || {
        field.with(|f| {
            f.error()
                .filter(|e| e.is_placement())
                .map(FieldError::to_string)
        })
    });
    let submitting = Signal::derive(move || field.with(|f| f.is_submitting()));

    let on_close = Callback::new(move |_: ()| {
        field.update(|f| {
            f.close();
        })
    });
    let on_cancel = Callback::new(move |_: ()| {
        field.update(|f| {
            f.cancel();
        })
    });
    let on_dismiss = Callback::new(move |_: ()| {
        field.update(|f| {
            f.dismiss_error();
        })
    });
    let on_submit = Callback::new(move |form: PlantForm| {
        let Some(Ok(submission)) = field.try_update(|f| f.begin_placement_submit(form)) else {
            return;
        };
        spawn_local(async move {
            let result = store.get_value().create(submission.input.clone()).await;
            let now = js_sys::Date::now();
            field.update(|f| {
                if let Ok(slug) = f.finish_placement_submit(&submission, result, now) {
                    log::info!("planted {slug}");
                }
            });
        });
    });

    view! {
        <div class="app">
            <MeadowCanvas show_labels=show_labels />
            {move || {
                banner.get().map(|message| view! { <ErrorBanner message on_dismiss /> })
            }}
            {move || match mode.get() {
                Mode::Inspecting { flower } => view! { <DetailPanel flower on_close /> }.into_any(),
                Mode::Placing { point } => {
                    view! {
                        <PlantPanel
                            point
                            submitting
                            error=form_error
                            on_submit
                            on_cancel
                        />
                    }
                        .into_any()
                }
                Mode::Browsing => ().into_any(),
            }}
            <div class="hint">
                {move || {
                    if mode.get().is_browsing() {
                        "Click the meadow to plant a flower. Hover the edges to wander."
                    } else {
                        "Press Esc to return to the meadow."
                    }
                }}
            </div>
        </div>
    }
}
