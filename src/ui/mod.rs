/// UI module exports
pub mod components;
pub mod gallery_page;
pub mod popup;
