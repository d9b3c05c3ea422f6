//! Headless core of a movie/TV browsing app: an auto-rotating banner
//! carousel with interpolated pagination dots, and a typed gateway over
//! document-store collections for user data such as favorites and
//! watchlists.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod models;
pub mod store;
