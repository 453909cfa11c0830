//! Weekly staff scheduling engine for restaurant rosters.
//!
//! This crate derives the weekly schedule grid from shift and leave records,
//! validates it against labor constraints, tracks local edits through an
//! undo/redo command stack, drives the draft/publish plan lifecycle, and
//! renders print, spreadsheet and PDF exports.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod grid;
pub mod lifecycle;
pub mod models;
pub mod validation;
