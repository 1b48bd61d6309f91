// Corpus input: the tractate catalog, chapter models and chapter sources.

pub mod catalog;
pub mod loader;
pub mod models;
