// src/components/mod.rs
pub mod tour_viewer;
