//! Route handlers organized by resource

pub mod health;
pub mod auth;
pub mod payments;
pub mod users;
pub mod posts;
pub mod comments;
pub mod tags;
pub mod announcements;
pub mod votes;
pub mod stats;
