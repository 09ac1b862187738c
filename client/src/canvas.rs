use leptos::prelude::*;
use meadow_shared::colors::{lighten, petal_color, rgba_css};

use crate::app::FieldState;
use crate::field::PlacedFlower;

/// Position of a pointer event relative to the meadow element.
fn local_point(target: Option<web_sys::HtmlDivElement>, ev: &web_sys::MouseEvent) -> (f64, f64) {
    let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
    match target {
        Some(el) => {
            let rect = el.get_bounding_client_rect();
            (cx - rect.left(), cy - rect.top())
        }
        None => (cx, cy),
    }
}

/// The scrolling meadow: flower sprites plus the pointer plumbing for edge
/// scroll, planting and selection.
#[component]
pub fn MeadowCanvas(#[prop(into)] show_labels: Signal<bool>) -> impl IntoView {
    let FieldState(field) = expect_context();
    let meadow_ref = NodeRef::<leptos::html::Div>::new();

    view! {
        <div
            node_ref=meadow_ref
            class="meadow"
            class:meadow--zoomed=move || field.with(|f| f.mode().is_zoomed())
            on:pointermove=move |ev| {
                let (px, _) = local_point(meadow_ref.get_untracked(), &ev);
                field.update(|f| {
                    f.pointer_moved(px);
                });
            }
            on:pointerleave=move |_| field.update(|f| f.pointer_left())
            on:click=move |ev| {
                let (px, py) = local_point(meadow_ref.get_untracked(), &ev);
                field.update(|f| {
                    f.click_canvas(px, py);
                });
            }
        >
            {move || {
                let labels = show_labels.get();
                field
                    .with(|f| {
                        f.render_list()
                            .into_iter()
                            .map(|placed| flower_sprite(placed, labels, FieldState(field)))
                            .collect::<Vec<_>>()
                    })
                    .collect_view()
            }}
        </div>
    }
}

fn flower_sprite(placed: PlacedFlower<'_>, show_label: bool, state: FieldState) -> impl IntoView + use<> {
    let FieldState(field) = state;
    let PlacedFlower {
        flower,
        placement,
        highlighted,
        twinkling,
        tooltip,
    } = placed;

    let petal = petal_color(&flower.slug, flower.category);
    let style = format!(
        "transform: translate({:.1}px, {:.1}px) translate(-50%, -100%) scale({:.3}); \
         opacity: {}; z-index: {}; --petal: {}; --petal-light: {};",
        placement.screen_x,
        placement.screen_y,
        placement.scale,
        placement.opacity,
        placement.stack_order,
        rgba_css(petal, 1.0),
        rgba_css(lighten(petal, 0.25), 1.0),
    );
    let interactive = placement.treatment.takes_pointer();
    let title = flower.title.clone();
    let byline = flower.byline().to_owned();
    let select_slug = flower.slug.clone();
    let enter_slug = flower.slug.clone();
    let leave_slug = flower.slug.clone();

    view! {
        <div
            class=placement.treatment.css_class()
            class:flower--highlight=highlighted
            class:flower--twinkle=twinkling
            data-category=flower.category.as_str()
            style=style
            on:click=move |ev| {
                if !interactive {
                    return;
                }
                ev.stop_propagation();
                field.update(|f| {
                    f.select_flower(&select_slug);
                });
            }
            on:pointerenter=move |_| {
                field.update(|f| f.hover_enter(&enter_slug, js_sys::Date::now()))
            }
            on:pointerleave=move |_| field.update(|f| f.hover_leave(&leave_slug))
        >
            <div class="flower-head"></div>
            <div class="flower-stem"></div>
            {show_label.then(|| view! { <span class="flower-label">{title.clone()}</span> })}
            {tooltip
                .then(|| {
                    view! {
                        <div class="flower-tooltip">
                            <strong>{title}</strong>
                            <span>{byline}</span>
                        </div>
                    }
                })}
        </div>
    }
}
