//! # Babili
//!
//! `babili` is a small full-stack chatbot service: an HTTP backend that
//! proxies chat requests to an upstream completion API and manages user
//! accounts, plus a client-side session module for frontends built on it.
//!
//! ## Authentication
//!
//! Accounts are email-unique records with bcrypt password hashes. A
//! successful login issues a stateless HS256 JWT valid for one hour; there
//! is no server-side session table and no revocation, so logout is purely
//! client-side (the stored token is deleted and the server trusts the old
//! one until it expires).
//!
//! Protected routes (`/completions`, `/user/:id`) sit behind a bearer-token
//! gate that requires *some* valid token; it does not match the token
//! subject against the requested resource.
//!
//! ## Client session
//!
//! [`client::SessionManager`] tracks the auth lifecycle with pure reducer
//! transitions, restores a persisted token at startup after a local expiry
//! check, and drives login, registration and logout over the HTTP API.

pub mod auth;
pub mod babili;
pub mod cli;
pub mod client;
pub mod store;
