//! flatmod - property-listing moderation service
//!
//! Moderators create houses and flats; flats move through
//! `created → on moderation → approved/declined` under a single-moderator
//! claim; clients only ever see approved flats.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod moderation;
pub mod store;
