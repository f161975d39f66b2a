//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles commands and ingredient entries
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and callback payloads
//! - `results_view`: Shows lookup progress, notices and result panels in the chat

pub mod callback_handler;
pub mod message_handler;
pub mod results_view;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;
