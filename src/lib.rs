//! Search session controller for an episode archive.
//!
//! This crate owns everything between the search box and the backend: the
//! shareable URL, the request a query turns into, the accumulated result list
//! across "load more" pages, and the highlighted snippets shown per result.
//! The full-text index itself lives behind `GET /api/episodes`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ url_state.rs │   │  request.rs  │   │ accumulate.rs│   │ highlight.rs │
//! │ (decode,     │   │  (build)     │   │  (merge)     │   │  (project,   │
//! │  encode)     │   │              │   │              │   │   sanitize)  │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        │                  │                  │                  │
//!        ▼                  ▼                  ▼                  ▼
//! ┌─────────────────────────────────────────────────┐      ┌──────────────┐
//! │                   session/                      │─────▶│   view.rs    │
//! │  state.rs  (reducer: begin_* / apply, seq nos)  │      │ (ResultsView)│
//! │  mod.rs    (SearchSession: backend, URL, I/O)   │      └──────────────┘
//! └────────────────────────┬────────────────────────┘
//!                          ▼
//!                 ┌──────────────────┐
//!                 │    backend.rs    │
//!                 │ (SearchBackend,  │
//!                 │  HttpBackend)    │
//!                 └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use episode_search::{HttpBackend, SearchSession, SessionConfig};
//!
//! let config = SessionConfig::default();
//! let backend = HttpBackend::new(&config.base_url);
//! let mut session = SearchSession::mount(config, backend, "?query=jake");
//! session.restore().await;
//! session.load_more().await;
//! ```

// Module declarations
pub mod accumulate;
pub mod backend;
pub mod config;
pub mod contracts;
pub mod error;
pub mod highlight;
pub mod request;
pub mod session;
pub mod testing;
mod types;
pub mod url_state;
pub mod view;

// Re-exports for public API
pub use accumulate::{merge, Accumulated};
pub use backend::{HttpBackend, SearchBackend};
pub use config::SessionConfig;
pub use error::{ConfigError, ErrorKind, SearchError};
pub use highlight::{project, FieldHighlights, Fragment, SanitizePolicy};
pub use request::{build, RequestDescriptor, FIRST_PAGE_LIMIT, PAGE_SIZE};
pub use session::{fetch_page, Outcome, RequestKind, SearchSession, SessionState, Ticket};
pub use types::{Episode, HighlightMap, ResultEntry, ResultPage, SearchQuery, SessionStatus};
pub use url_state::{decode, encode, ParamValue, QueryParams};
pub use view::{format_air_date, EpisodeCard, LoadMoreButton, ResultsView};
