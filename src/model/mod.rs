//! Backend payload shapes.
//!
//! Several views return the same entity with different field names; the
//! accessors on [`post::PostRecord`] and [`comment::CommentRecord`] are the
//! only place those variants are reconciled.

pub mod admin;
pub mod auth;
pub mod comment;
pub mod metrics;
pub mod page;
pub mod post;
pub mod security;
pub mod tag;
pub mod user;
