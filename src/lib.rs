/// Bookmark Hoarder - Chrome Extension that saves the images of bookmarked posts
/// Built with Rust + WASM + Yew

pub mod error;
pub mod extract;
pub mod gallery;
pub mod merge;
pub mod normalize;
pub mod record;
pub mod storage;
pub mod transfer;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the gallery page
#[wasm_bindgen]
pub fn start_gallery() {
    yew::Renderer::<ui::gallery_page::GalleryPage>::new().render();
}
