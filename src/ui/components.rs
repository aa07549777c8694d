/// Reusable UI components

use yew::prelude::*;

use crate::gallery::GalleryCell;
use crate::record::{Record, format_saved_date};

#[derive(Properties, PartialEq)]
pub struct AuthorLineProps {
    pub record: Record,
    #[prop_or(false)]
    pub avatar: bool,
}

#[function_component(AuthorLine)]
pub fn author_line(props: &AuthorLineProps) -> Html {
    let record = &props.record;

    html! {
        <div class="author">
            if props.avatar {
                <div class="author-avatar">{record.author_initial()}</div>
            }
            <a href={record.author_url.clone()} target="_blank">{format!("@{}", record.author)}</a>
        </div>
    }
}

/// One image of a post, with links to the post and the full-size file
#[derive(Properties, PartialEq)]
pub struct ImageTileProps {
    pub cell: GalleryCell,
    #[prop_or(false)]
    pub saved_badge: bool,
    #[prop_or(false)]
    pub show_text: bool,
    #[prop_or(false)]
    pub avatar: bool,
    pub on_open: Callback<(String, Record)>,
}

#[function_component(ImageTile)]
pub fn image_tile(props: &ImageTileProps) -> Html {
    let cell = &props.cell;
    let record = &cell.record;

    let onclick = {
        let image_url = cell.image_url.clone();
        let record = record.clone();
        props.on_open.reform(move |_: MouseEvent| (image_url.clone(), record.clone()))
    };

    html! {
        <div class="gallery-item">
            <div class="gallery-image" {onclick}>
                <img
                    src={cell.image_url.clone()}
                    alt={format!("Tweet image {}", cell.position + 1)}
                    loading="lazy"
                />
                if props.saved_badge {
                    <div class="saved-badge">{"SAVED"}</div>
                }
            </div>
            <div class="gallery-info">
                <AuthorLine record={record.clone()} avatar={props.avatar} />
                if props.show_text && !record.text.is_empty() {
                    <div class="tweet-text">{&record.text}</div>
                }
                <div class="links">
                    <a href={record.source_url.clone()} target="_blank">{"Tweet"}</a>
                    <a href={cell.image_url.clone()} target="_blank">{"Full Image"}</a>
                </div>
            </div>
        </div>
    }
}

/// A whole post: first image, "+N more" badge and save date
#[derive(Properties, PartialEq)]
pub struct RecordCardProps {
    pub cell: GalleryCell,
    pub on_open: Callback<(String, Record)>,
    pub on_view_all: Callback<Record>,
}

#[function_component(RecordCard)]
pub fn record_card(props: &RecordCardProps) -> Html {
    let cell = &props.cell;
    let record = &cell.record;
    let image_count = record.images.len();

    let on_image_click = {
        let image_url = cell.image_url.clone();
        let record = record.clone();
        props.on_open.reform(move |_: MouseEvent| (image_url.clone(), record.clone()))
    };

    let on_view_all = {
        let record = record.clone();
        props.on_view_all.reform(move |e: MouseEvent| {
            e.prevent_default();
            record.clone()
        })
    };

    html! {
        <div class="gallery-item">
            <div class="gallery-image" onclick={on_image_click}>
                <img src={cell.image_url.clone()} alt="Tweet image" loading="lazy" />
                if cell.hidden_images > 0 {
                    <div class="image-count-badge">{format!("+{} more", cell.hidden_images)}</div>
                }
            </div>
            <div class="gallery-info">
                <AuthorLine record={record.clone()} avatar={true} />
                if !record.text.is_empty() {
                    <div class="tweet-text">{&record.text}</div>
                }
                <div class="saved-date">{format!("Saved {}", format_saved_date(&record.saved_at))}</div>
                <div class="links">
                    <a href={record.source_url.clone()} target="_blank">{"View Tweet"}</a>
                    if image_count > 1 {
                        <a href="#" class="view-all-images" onclick={on_view_all}>
                            {format!("View All {} Images", image_count)}
                        </a>
                    }
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LightboxProps {
    pub image_url: String,
    pub record: Record,
    pub on_close: Callback<()>,
}

/// Full-size view of one image. Closes from the button or the backdrop.
#[function_component(Lightbox)]
pub fn lightbox(props: &LightboxProps) -> Html {
    let on_backdrop = props.on_close.reform(|_: MouseEvent| ());
    let on_close = props.on_close.reform(|_: MouseEvent| ());
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="lightbox active" onclick={on_backdrop}>
            <div class="lightbox-content" onclick={keep_open}>
                <button class="lightbox-close" onclick={on_close}>{"×"}</button>
                <img class="lightbox-img" src={props.image_url.clone()} alt="Full size image" />
                <div class="lightbox-links">
                    <a href={props.record.source_url.clone()} target="_blank">{"View Tweet"}</a>
                    <a href={props.image_url.clone()} target="_blank">{"Open Image"}</a>
                    <a href={props.record.author_url.clone()} target="_blank">
                        {format!("@{}", props.record.author)}
                    </a>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class="empty-state">
            <h2>{props.title.clone()}</h2>
            if let Some(hint) = &props.hint {
                <p class="empty-state-hint">{hint.clone()}</p>
            }
        </div>
    }
}
