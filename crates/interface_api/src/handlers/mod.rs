//! Request handlers

pub mod calculator;
pub mod health;
pub mod holding;
pub mod portfolio;
pub mod tip;
