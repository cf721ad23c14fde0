//! Core globedash library (config, session, country data, view pipeline).

pub mod config;
pub mod countries;
pub mod logging;
pub mod pipeline;
pub mod session;
