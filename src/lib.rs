//! Terminal map client that keeps a live, server-pushed stream of geotagged
//! tweets in sync with the visible viewport.

pub mod app;
pub mod channel;
pub mod config;
pub mod form;
pub mod geo;
pub mod logging;
pub mod map;
pub mod session;
pub mod tweets;
pub mod ui;
