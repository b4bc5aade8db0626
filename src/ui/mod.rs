//! UI module - contains UI rendering components

pub mod charts;
pub mod components;
