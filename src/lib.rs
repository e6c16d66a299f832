//! Chartify Plotter - Excel/CSV/TSV plotting with static and interactive export
//!
//! Load a table, pick X and Y columns, and overlay every selected series on one
//! chart. Charts can be saved as PNG or exported as a standalone plotly.js page.

pub mod charts;
pub mod data;
pub mod gui;
pub mod state;
pub mod stats;
