// src/services/mod.rs

pub mod account;
pub mod feed;

pub use account::AccountService;
pub use feed::FeedService;
