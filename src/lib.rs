//! Browser chat client for a knowledge base question-answering API.

pub mod api;
pub mod config;
pub mod controller;
pub mod render;
pub mod session;
pub mod storage;
pub mod strings;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
