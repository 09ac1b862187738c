use leptos::prelude::*;
use meadow_shared::{
    Category, Flower, MAX_AUTHOR_CHARS, MAX_MESSAGE_CHARS, MAX_TITLE_CHARS, WorldPoint,
    flower_path,
};

use crate::field::PlantForm;

#[component]
pub fn DetailPanel(flower: Flower, on_close: Callback<()>) -> impl IntoView {
    let planted = flower.created_at.format("%B %-d, %Y").to_string();
    let byline = flower.byline().to_owned();
    let share = flower_path(&flower.slug);
    let share_href = share.clone();
    let kind = flower.category.label();

    view! {
        <aside class="panel panel--detail">
            <header class="panel-header">
                <h2>{flower.title}</h2>
                <button class="panel-close" title="Close" on:click=move |_| on_close.run(())>
                    "×"
                </button>
            </header>
            <p class="panel-message">{flower.message}</p>
            <footer class="panel-footer">
                <span>{kind} " planted by " {byline} " on " {planted}</span>
                <a class="panel-share" href=share_href>{share}</a>
            </footer>
        </aside>
    }
}

#[component]
pub fn PlantPanel(
    point: WorldPoint,
    #[prop(into)] submitting: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
    on_submit: Callback<PlantForm>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let message = RwSignal::new(String::new());
    let author = RwSignal::new(String::new());
    let category = RwSignal::new(Category::default());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(PlantForm {
            title: title.get_untracked(),
            message: message.get_untracked(),
            author: author.get_untracked(),
            category: category.get_untracked(),
        });
    };

    view! {
        <form class="panel panel--plant" on:submit=submit>
            <h2>"Plant a flower"</h2>
            <p class="panel-coords">{format!("at ({}, {})", point.x, point.y)}</p>
            <input
                type="text"
                placeholder="Title"
                maxlength=MAX_TITLE_CHARS.to_string()
                prop:value=move || title.get()
                on:input=move |ev| title.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Leave a message"
                maxlength=MAX_MESSAGE_CHARS.to_string()
                prop:value=move || message.get()
                on:input=move |ev| message.set(event_target_value(&ev))
            ></textarea>
            <input
                type="text"
                placeholder="Your name (optional)"
                maxlength=MAX_AUTHOR_CHARS.to_string()
                prop:value=move || author.get()
                on:input=move |ev| author.set(event_target_value(&ev))
            />
            <select on:change=move |ev| {
                if let Ok(picked) = event_target_value(&ev).parse::<Category>() {
                    category.set(picked);
                }
            }>
                {Category::ALL
                    .into_iter()
                    .map(|c| {
                        view! {
                            <option value=c.as_str() selected=move || category.get() == c>
                                {c.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            {move || error.get().map(|msg| view! { <p class="panel-error">{msg}</p> })}
            <div class="panel-actions">
                <button type="button" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
                <button type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Planting…" } else { "Plant" }}
                </button>
            </div>
        </form>
    }
}

#[component]
pub fn ErrorBanner(message: String, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <div class="banner" role="alert">
            <span>{message}</span>
            <button on:click=move |_| on_dismiss.run(())>"Dismiss"</button>
        </div>
    }
}
