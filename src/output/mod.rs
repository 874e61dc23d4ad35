// Sat Aug 22 2026 - Alex

pub mod report;

pub use report::{render_json, render_text};
