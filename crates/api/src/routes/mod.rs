//! Route Handlers

pub mod ads;
pub mod auth;
pub mod planner;
