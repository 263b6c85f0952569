//! pokeview - PokéAPI Catalog Browser
//!
//! This library provides the core of pokeview, a terminal UI for browsing the
//! public PokéAPI catalog: a paged list, an incrementally loaded list and a
//! per-record detail screen.
//!
//! ## Architecture
//!
//! - **Views** (`feed`, `detail`): sans-IO fetch state machines. They hand out
//!   requests tagged with a ticket and accept only the matching settlement.
//! - **Worker** (`worker`, `api`): a tokio task performing HTTP requests and
//!   aborting whatever a view abandons.
//! - **UI** (`app`, `ui`, `router`): state owned by the render thread, drawn
//!   with ratatui.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features native -- /pokemon/25
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod feed;
pub mod types;
pub mod util_text;
pub mod worker;

// Deep link router
pub mod router;

pub mod theme;

pub mod app;
pub mod ui;

// Key mapping and frame pacing (crossterm, native-only)
#[cfg(feature = "native")]
pub mod input;

pub use app::App;
pub use error::FetchError;
pub use types::{AppEvent, FetchCommand};
