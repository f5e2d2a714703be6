//! One action creator per server endpoint. Each issues a single request
//! through the matching factory and reports the outcome via `dispatch`.

pub mod auth;
pub mod county;
pub mod dos;
