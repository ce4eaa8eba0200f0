//! Kanaplex - link newly downloaded episodes into a media library
//!
//! A download folder carries a `.kanaplex` settings file naming the series
//! and its library folder. Each run indexes both folders by episode
//! identity and symlinks whatever the library is missing.

pub mod cli;
pub mod config;
pub mod services;
