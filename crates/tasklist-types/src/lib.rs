//! Wire types shared by the task-list HTTP layer and its clients.
//!
//! `models` holds the resources as they appear in responses, `api` holds
//! request bodies, response envelopes and the JWT claims.

pub mod api;
pub mod models;
