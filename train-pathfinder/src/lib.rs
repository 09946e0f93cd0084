//! Conflict-free train path planner.
//!
//! Answers: "a new train wants to run through this corridor; given the
//! trains already timetabled, when and how fast can it go without
//! crossing or crowding any of them?"

pub mod domain;
pub mod network;
pub mod planner;
pub mod predict;
pub mod web;
