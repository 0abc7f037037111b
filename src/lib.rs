//! salarydash - salary prediction dashboard service
//!
//! Loads a pre-trained regression model once, serves predictions for a
//! years-of-experience input, and keeps a per-session prediction history
//! that is mirrored to CSV and downloadable.

pub mod cli;
pub mod curve;
pub mod http_server;
pub mod ledger;
pub mod model;
pub mod observability;
pub mod session;
