/// Popup UI for Bookmark Hoarder extension

use serde::Deserialize;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use patternfly_yew::prelude::*;

use crate::error::ExtractError;
use crate::extract::{extract_candidates, is_bookmarks_page, parse_markup};
use crate::gallery::{image_cells, total_images};
use crate::merge::save_extraction;
use crate::record::{Bookmarks, Record, now_timestamp};
use crate::storage::{BookmarkStore, local_store};
use crate::transfer::{export_filename, export_json};
use crate::ui::components::{EmptyState, ImageTile};

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn captureTabMarkup(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openGalleryPage() -> Result<(), JsValue>;

    fn exportToFile(data: &str, filename: &str);
}

const WRONG_PAGE: &str = "Please navigate to your Twitter/X bookmarks page first!";
const NOTHING_FOUND: &str = "No bookmarks found. Try scrolling to load more.";

#[derive(Debug, Clone, Deserialize)]
struct ActiveTab {
    id: i32,
    url: String,
}

#[derive(Clone, PartialEq)]
enum PopupStatus {
    Idle,
    Loading(String),
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PopupView {
    Current,
    All,
}

/// Result of the latest extraction, shown in the "Current" view
#[derive(Debug, Clone, PartialEq, Default)]
struct LastExtraction {
    records: Vec<Record>,
    had_collisions: bool,
}

impl LastExtraction {
    /// The same records without the `SAVED` badge, shown when the user
    /// switches back to "Current"
    fn revisited(&self) -> Self {
        LastExtraction {
            records: self.records.clone(),
            had_collisions: false,
        }
    }
}

/// Records to tile for `view` and whether they carry the `SAVED` badge
fn shown_records(view: PopupView, last: &LastExtraction, saved: &Bookmarks) -> (Vec<Record>, bool) {
    match view {
        PopupView::Current => (last.records.clone(), last.had_collisions),
        PopupView::All => (saved.values().cloned().collect(), true),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let status = use_state(|| PopupStatus::Idle);
    let view = use_state(|| PopupView::Current);
    let last = use_state(LastExtraction::default);
    let saved = use_state(Bookmarks::new);

    // Load saved bookmarks on mount
    {
        let saved = saved.clone();
        let status = status.clone();
        use_effect_with((), move |_| {
            match local_store().load() {
                Ok(bookmarks) => saved.set(bookmarks),
                Err(e) => status.set(PopupStatus::Error(e.to_string())),
            }
            || ()
        });
    }

    // Extract handler
    let on_extract = {
        let status = status.clone();
        let view = view.clone();
        let last = last.clone();
        let saved = saved.clone();

        Callback::from(move |_| {
            let status = status.clone();
            let view = view.clone();
            let last = last.clone();
            let saved = saved.clone();

            status.set(PopupStatus::Loading("Extracting bookmarks...".to_string()));

            spawn_local(async move {
                match run_extraction().await {
                    Ok((message, extraction, bookmarks)) => {
                        status.set(PopupStatus::Success(message));
                        last.set(extraction);
                        saved.set(bookmarks);
                        view.set(PopupView::Current);
                    }
                    Err(e) => {
                        log::error!("Extraction failed: {}", e);
                        status.set(PopupStatus::Error(e));
                    }
                }
            });
        })
    };

    let on_open_gallery = Callback::from(move |_| {
        spawn_local(async move {
            if let Err(e) = openGalleryPage().await {
                log::error!("Failed to open gallery: {:?}", e);
            }
        });
    });

    let on_show_current = {
        let view = view.clone();
        let last = last.clone();
        Callback::from(move |_| {
            last.set(last.revisited());
            view.set(PopupView::Current);
        })
    };

    let on_show_all = {
        let view = view.clone();
        let saved = saved.clone();
        let status = status.clone();
        Callback::from(move |_| {
            match local_store().load() {
                Ok(bookmarks) => saved.set(bookmarks),
                Err(e) => status.set(PopupStatus::Error(e.to_string())),
            }
            view.set(PopupView::All);
        })
    };

    let on_export = {
        let status = status.clone();
        Callback::from(move |_| {
            let result = local_store()
                .load()
                .and_then(|bookmarks| export_json(&bookmarks));
            match result {
                Ok(json) => {
                    let filename = export_filename(chrono::Utc::now().date_naive());
                    exportToFile(&json, &filename);
                    status.set(PopupStatus::Success("Exported successfully!".to_string()));
                }
                Err(e) => status.set(PopupStatus::Error(format!("Export failed: {}", e))),
            }
        })
    };

    let on_clear = {
        let status = status.clone();
        let last = last.clone();
        let saved = saved.clone();
        Callback::from(move |_| {
            if !confirm("Are you sure you want to clear all saved bookmarks?") {
                return;
            }
            match local_store().clear() {
                Ok(()) => {
                    last.set(LastExtraction::default());
                    saved.set(Bookmarks::new());
                    status.set(PopupStatus::Success("All data cleared.".to_string()));
                }
                Err(e) => status.set(PopupStatus::Error(e.to_string())),
            }
        })
    };

    // Clicking a tile opens the full image in a new tab
    let on_open_image = Callback::from(|(image_url, _): (String, Record)| {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.open_with_url_and_target(&image_url, "_blank") {
                log::error!("Failed to open image: {:?}", e);
            }
        }
    });

    let is_busy = matches!(*status, PopupStatus::Loading(_));
    let saved_records: Vec<Record> = saved.values().cloned().collect();

    let (shown, saved_badge) = shown_records(*view, &last, &saved);
    let cells = image_cells(&shown);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Bookmark Hoarder"}</h1>

            <div class="flex-column-gap">
                <Button onclick={on_extract} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {"📥 Extract Bookmarks"}
                </Button>
                <Button onclick={on_open_gallery} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"🖼️ Open Gallery"}
                </Button>
            </div>

            // Status display
            {match &*status {
                PopupStatus::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                PopupStatus::Success(msg) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Success} title={msg.clone()} inline={true}>
                        </Alert>
                    </div>
                },
                PopupStatus::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                PopupStatus::Idle => html! {}
            }}

            if !saved_records.is_empty() {
                <div class="stats-box">
                    <strong>{"📚 Total saved: "}</strong>{format!("{} tweets", saved_records.len())}
                    <br />
                    <strong>{"🖼️ Total images: "}</strong>{total_images(&saved_records)}
                </div>
            }

            // View toggle
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={if *view == PopupView::Current { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                        <button class="pf-v5-c-tabs__link" onclick={on_show_current}>
                            <span class="pf-v5-c-tabs__item-text">{"Current"}</span>
                        </button>
                    </li>
                    <li class={if *view == PopupView::All { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                        <button class="pf-v5-c-tabs__link" onclick={on_show_all}>
                            <span class="pf-v5-c-tabs__item-text">{format!("All Saved ({})", saved_records.len())}</span>
                        </button>
                    </li>
                </ul>
            </div>

            if cells.is_empty() {
                <EmptyState title="No tweets to display" />
            } else {
                <div class="gallery">
                    {for cells.into_iter().map(|cell| {
                        let key = format!("{}-{}", cell.record.id, cell.position);
                        html! {
                            <ImageTile
                                key={key}
                                cell={cell}
                                saved_badge={saved_badge}
                                show_text={true}
                                on_open={on_open_image.clone()}
                            />
                        }
                    })}
                </div>
            }

            <div class="flex-row-gap">
                <Button onclick={on_export} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"💾 Export"}
                </Button>
                <Button onclick={on_clear} disabled={is_busy} variant={ButtonVariant::Danger}>
                    {"🗑️ Clear"}
                </Button>
            </div>

            <p class="footer-popup">
                {"Bookmark Hoarder v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

/// Scrape the active tab, merge into the store and report what changed
async fn run_extraction() -> Result<(String, LastExtraction, Bookmarks), String> {
    let tab = get_active_tab().await?;

    if !is_bookmarks_page(&tab.url) {
        return Err(WRONG_PAGE.to_string());
    }

    let page_url = Url::parse(&tab.url)
        .map_err(|e| ExtractError::PageUrl(e.to_string()).to_string())?;

    let markup = captureTabMarkup(tab.id)
        .await
        .map_err(|e| format!("Failed to read page: {:?}", e))?
        .as_string()
        .unwrap_or_default();

    let document = parse_markup(&markup).map_err(|e| e.to_string())?;
    let candidates = extract_candidates(&document, &page_url).map_err(|e| e.to_string())?;

    if candidates.is_empty() {
        return Err(NOTHING_FOUND.to_string());
    }

    let found = candidates.len();
    let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();

    let outcome = save_extraction(&local_store(), candidates, &now_timestamp())
        .map_err(|e| e.to_string())?;

    let records = ids
        .iter()
        .filter_map(|id| outcome.bookmarks.get(id).cloned())
        .collect();

    Ok((
        outcome.extraction_summary(found),
        LastExtraction {
            records,
            had_collisions: outcome.collision_count > 0,
        },
        outcome.bookmarks,
    ))
}

async fn get_active_tab() -> Result<ActiveTab, String> {
    let tab_js = getActiveTab()
        .await
        .map_err(|e| format!("Failed to get active tab: {:?}", e))?;

    let tab: Option<ActiveTab> = serde_wasm_bindgen::from_value(tab_js)
        .map_err(|e| format!("Failed to parse tab: {:?}", e))?;

    tab.ok_or_else(|| "No active tab".to_string())
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
