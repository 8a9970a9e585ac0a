#![warn(clippy::all, rust_2018_idioms)]

pub mod downloader;
pub mod model;
pub mod overlay;
pub mod plot;
