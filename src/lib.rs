//! document-portal - upload, list, download and delete PDF documents
//!
//! Document metadata lives in a SQLite `documents` table; the bytes live in a
//! local upload directory. A single-page browser UI is served at `/`.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod portal;
pub mod routes;
pub mod state;
pub mod storage;
pub mod utils;
