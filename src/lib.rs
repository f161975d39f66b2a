//! # Recipe Finder Telegram Bot
//!
//! A Telegram bot that collects the ingredients a user has at hand, looks up
//! recipes using them (Spoonacular API, or a local demo list when no API key
//! is configured) and shows exact and partial matches as recipe cards.

pub mod bot;
pub mod circuit_breaker;
pub mod demo_source;
pub mod ingredient_set;
pub mod localization;
pub mod lookup;
pub mod lookup_config;
pub mod lookup_errors;
pub mod recipe_model;
pub mod recipe_source;
pub mod render;
pub mod session;
pub mod spoonacular;
