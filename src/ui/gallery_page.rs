/// Standalone gallery page

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use patternfly_yew::prelude::*;

use crate::error::ImportError;
use crate::gallery::{GalleryState, SortKey, image_cells, record_cells};
use crate::record::Record;
use crate::storage::{
    BookmarkStore, LocalStorage, MAX_GRID_SIZE, MIN_GRID_SIZE, Preferences, Theme,
    clamp_grid_size, local_store,
};
use crate::transfer::{export_filename, export_json, import_into_store};
use crate::ui::components::{EmptyState, ImageTile, Lightbox, RecordCard};

// Import JS bridge functions
#[wasm_bindgen(module = "/gallery.js")]
extern "C" {
    fn exportToFile(data: &str, filename: &str);
}

#[derive(Clone, PartialEq)]
enum PageState {
    Idle,
    Importing,
    Error(String),
}

/// What the grid is currently showing
#[derive(Clone, PartialEq)]
enum GridView {
    Records,
    AllImagesOf(Record),
}

#[function_component(GalleryPage)]
pub fn gallery_page() -> Html {
    let state = use_state(|| PageState::Idle);
    let gallery = use_state(GalleryState::default);
    let grid_view = use_state(|| GridView::Records);
    let lightbox = use_state(|| None::<(String, Record)>);
    let prefs = use_state(|| Preferences::load(&LocalStorage));
    let import_input = use_node_ref();

    // Load storage on mount
    {
        let state = state.clone();
        let gallery = gallery.clone();

        use_effect_with((), move |_| {
            match local_store().load() {
                Ok(bookmarks) => gallery.set(GalleryState::new(&bookmarks, SortKey::default())),
                Err(e) => state.set(PageState::Error(format!("Failed to load: {}", e))),
            }
            || ()
        });
    }

    // Search handler
    let on_search_input = {
        let gallery = gallery.clone();
        let grid_view = grid_view.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*gallery).clone();
                next.set_query(&input.value());
                gallery.set(next);
                grid_view.set(GridView::Records);
            }
        })
    };

    let on_sort_change = {
        let gallery = gallery.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                if let Some(sort) = SortKey::from_value(&select.value()) {
                    let mut next = (*gallery).clone();
                    next.set_sort(sort);
                    gallery.set(next);
                }
            }
        })
    };

    let on_theme_toggle = {
        let prefs = prefs.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = *prefs;
            next.theme = next.theme.toggled();
            if let Err(e) = Preferences::save_theme(&LocalStorage, next.theme) {
                log::warn!("Could not save theme: {}", e);
            }
            prefs.set(next);
        })
    };

    let on_grid_size = {
        let prefs = prefs.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Ok(size) = input.value().parse::<u32>() {
                    let mut next = *prefs;
                    next.grid_size = clamp_grid_size(size);
                    if let Err(e) = Preferences::save_grid_size(&LocalStorage, next.grid_size) {
                        log::warn!("Could not save grid size: {}", e);
                    }
                    prefs.set(next);
                }
            }
        })
    };

    let on_open_lightbox = {
        let lightbox = lightbox.clone();
        Callback::from(move |(image_url, record): (String, Record)| {
            lightbox.set(Some((image_url, record)));
        })
    };

    let on_close_lightbox = {
        let lightbox = lightbox.clone();
        Callback::from(move |_: ()| lightbox.set(None))
    };

    let on_view_all = {
        let grid_view = grid_view.clone();
        Callback::from(move |record: Record| grid_view.set(GridView::AllImagesOf(record)))
    };

    let on_back = {
        let grid_view = grid_view.clone();
        Callback::from(move |_: MouseEvent| grid_view.set(GridView::Records))
    };

    // Export all bookmarks
    let on_export = {
        let state = state.clone();
        Callback::from(move |_| {
            let result = local_store()
                .load()
                .and_then(|bookmarks| export_json(&bookmarks));
            match result {
                Ok(json) => {
                    let filename = export_filename(chrono::Utc::now().date_naive());
                    exportToFile(&json, &filename);
                }
                Err(e) => {
                    log::error!("Export failed: {}", e);
                    state.set(PageState::Error(format!("Export failed: {}", e)));
                }
            }
        })
    };

    let on_import_click = {
        let import_input = import_input.clone();
        Callback::from(move |_| {
            if let Some(input) = import_input.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_import_file = {
        let state = state.clone();
        let gallery = gallery.clone();
        let grid_view = grid_view.clone();

        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };

            let state = state.clone();
            let gallery = gallery.clone();
            let grid_view = grid_view.clone();
            state.set(PageState::Importing);

            spawn_local(async move {
                let result = match read_file(&file).await {
                    Ok(payload) => import_into_store(&local_store(), &payload),
                    Err(e) => Err(e),
                };

                match result {
                    Ok(outcome) => {
                        let mut next = (*gallery).clone();
                        next.replace_records(&outcome.merge.bookmarks);
                        gallery.set(next);
                        grid_view.set(GridView::Records);
                        state.set(PageState::Idle);
                        alert(&outcome.summary());
                    }
                    Err(e) => {
                        log::error!("Import failed: {}", e);
                        state.set(PageState::Idle);
                        alert(&format!("Import failed: {}", e));
                    }
                }

                // Allow the same file to be picked again
                input.set_value("");
            });
        })
    };

    let on_clear = {
        let gallery = gallery.clone();
        let grid_view = grid_view.clone();
        let state = state.clone();
        Callback::from(move |_| {
            if !confirm("Are you sure you want to clear all saved bookmarks? This cannot be undone.") {
                return;
            }
            match local_store().clear() {
                Ok(()) => {
                    let mut next = (*gallery).clone();
                    next.replace_records(&Default::default());
                    gallery.set(next);
                    grid_view.set(GridView::Records);
                }
                Err(e) => state.set(PageState::Error(e.to_string())),
            }
        })
    };

    let is_busy = *state == PageState::Importing;
    let stats = gallery.stats();
    let visible = gallery.visible();
    let is_light = prefs.theme == Theme::Light;

    let grid = match &*grid_view {
        GridView::AllImagesOf(record) => html! {
            <>
                <div>
                    <Button onclick={on_back} variant={ButtonVariant::Secondary}>
                        {"← Back to Gallery"}
                    </Button>
                </div>
                {for image_cells(std::slice::from_ref(record)).into_iter().map(|cell| {
                    let key = format!("{}-{}", cell.record.id, cell.position);
                    html! {
                        <ImageTile
                            key={key}
                            cell={cell}
                            avatar={true}
                            on_open={on_open_lightbox.clone()}
                        />
                    }
                })}
            </>
        },
        GridView::Records if visible.is_empty() => html! {
            <EmptyState
                title="No bookmarks saved yet"
                hint={AttrValue::from("Use the extension popup to extract images from your Twitter bookmarks")}
            />
        },
        GridView::Records => html! {
            <>
                {for record_cells(&visible).into_iter().map(|cell| {
                    let key = cell.record.id.clone();
                    html! {
                        <RecordCard
                            key={key}
                            cell={cell}
                            on_open={on_open_lightbox.clone()}
                            on_view_all={on_view_all.clone()}
                        />
                    }
                })}
            </>
        },
    };

    html! {
        <div class={classes!("container", is_light.then_some("light-mode"))}>
            <div class="header">
                <h1 class="main-title">{"Bookmark Gallery"}</h1>
                <div class="stats">
                    <span>{format!("{} tweets", stats.tweets)}</span>
                    {" • "}
                    <span>{format!("{} images", stats.images)}</span>
                    if let Some(showing) = stats.showing {
                        <span class="filtered-count">{format!(" (showing {})", showing)}</span>
                    }
                </div>
                <button class="theme-toggle" onclick={on_theme_toggle}>
                    <span class="theme-icon">{if is_light { "☀️" } else { "🌙" }}</span>
                </button>
            </div>

            if let PageState::Error(err) = &*state {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err.clone()}
                </Alert>
            }

            <div class="controls">
                <input
                    type="text"
                    placeholder="Search by author or text..."
                    value={gallery.query().to_string()}
                    oninput={on_search_input}
                    class="search-input"
                />
                <select class="sort-select" onchange={on_sort_change}>
                    {for SortKey::ALL.iter().map(|key| html! {
                        <option value={key.as_str()} selected={*key == gallery.sort()}>
                            {key.label()}
                        </option>
                    })}
                </select>
                <label class="grid-size-control">
                    {"Size "}
                    <input
                        type="range"
                        min={MIN_GRID_SIZE.to_string()}
                        max={MAX_GRID_SIZE.to_string()}
                        value={prefs.grid_size.to_string()}
                        oninput={on_grid_size}
                    />
                    <span>{format!("{}px", prefs.grid_size)}</span>
                </label>
                <Button onclick={on_export} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"📥 Export"}
                </Button>
                <Button onclick={on_import_click} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {if is_busy { "Importing..." } else { "📤 Import" }}
                </Button>
                <input
                    ref={import_input}
                    type="file"
                    accept=".json,application/json"
                    class="hidden"
                    disabled={is_busy}
                    onchange={on_import_file}
                />
                <Button onclick={on_clear} disabled={is_busy} variant={ButtonVariant::Danger}>
                    {"🗑️ Clear All"}
                </Button>
            </div>

            <div class="gallery" style={format!("--grid-size: {}px", prefs.grid_size)}>
                {grid}
            </div>

            if let Some((image_url, record)) = (*lightbox).clone() {
                <Lightbox image_url={image_url} record={record} on_close={on_close_lightbox} />
            }
        </div>
    }
}

// Helper functions

async fn read_file(file: &web_sys::File) -> Result<String, ImportError> {
    let text = JsFuture::from(file.text())
        .await
        .map_err(|e| ImportError::FileRead(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| ImportError::FileRead("file is not text".to_string()))
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            log::error!("Failed to show alert: {:?}", e);
        }
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
