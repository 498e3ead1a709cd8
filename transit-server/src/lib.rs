//! Transit route planner server.
//!
//! A web application that answers: "what is the best way from this
//! station to that one, right now, given the closures, maintenance and
//! congestion in effect?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod knowledge;
pub mod narrate;
pub mod planner;
pub mod web;
