//! # Retake
//!
//! A voice-practice recording server, usable both as a standalone binary and
//! as a library.
//!
//! Users record audio takes, organize them into folders, and annotate
//! mistakes at specific timestamps for later review. Two folder names are
//! reserved per user: "Drafts" (the default destination for new takes) and
//! "Trash" (where deleted takes go before permanent removal).
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::Path;
//! use retake::media::AudioStore;
//! use retake::server::{AppState, create_router};
//! use retake::store::{SqliteStore, Store};
//!
//! let data_dir = Path::new("./data");
//! let store = SqliteStore::new(data_dir.join("retake.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     media: AudioStore::new(data_dir),
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod server;
pub mod store;
pub mod types;
