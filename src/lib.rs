//! Order lookup viewer.
//!
//! Fetches an order record from `GET {base_url}/order/{id}`, projects it into
//! display strings with [`view::render_order`], and shows it either as a
//! static HTML page ([`render::html`]) or an interactive terminal screen
//! ([`ui`]).

pub mod client;
pub mod config;
pub mod format;
pub mod logging;
pub mod order;
pub mod render;
pub mod ui;
pub mod view;
pub mod viewer;

pub use client::{HttpOrderSource, LookupError, OrderSource};
pub use config::Config;
pub use format::DisplayOptions;
pub use order::Order;
pub use view::{render_order, OrderView};
pub use viewer::{OrderViewer, Phase};
