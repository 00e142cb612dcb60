// src/lib.rs

//! AFL news feed generator library.
//!
//! Crawls the AFL.com.au news listing, drops unwanted and already-published
//! articles, and writes the rest to an RSS feed plus a small state file.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
