//! Ludex Client - HTTP clients for the IGDB catalog API and its token
//! supplier.

pub mod auth;
pub mod igdb;

pub use auth::TwitchAuth;
pub use igdb::IgdbClient;
