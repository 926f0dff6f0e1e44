pub mod config;
pub mod extractor;
pub mod mail;
pub mod newsletter;
