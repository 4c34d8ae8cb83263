// src/ui/widgets/mod.rs

pub mod footer;   // Notice line and key hints.
pub mod input;    // Target field and scan options.
pub mod results;  // Tabbed findings view.
pub mod summary;  // Risk band, gauge and counts.
