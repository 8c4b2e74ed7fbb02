// Resume screening: text extraction, attribute detection, heuristic scoring
// and the submission pipeline that persists each evaluation.

pub mod attributes;
pub mod extract;
pub mod handlers;
pub mod keywords;
pub mod scoring;
pub mod store;
pub mod upload;
pub mod views;
