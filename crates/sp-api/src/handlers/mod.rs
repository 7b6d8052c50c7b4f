//! API request handlers

pub mod boqs;
pub mod progress_entries;
pub mod projects;
pub mod work_packages;
