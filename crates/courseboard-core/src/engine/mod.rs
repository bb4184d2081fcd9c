//! The engine's public surface.
//!
//! [`CourseEngine`] wires the content and analytics sources, the cache and
//! the pure aggregation steps into the operations the view layer calls.
//! Each operation returns a [`Report`] carrying the newest statistic
//! timestamp alongside the view model.

mod course;
mod report;
mod settings;

pub use course::CourseEngine;
pub use report::{ContentKind, EnrollmentTrend, Hierarchy, Report};
pub use settings::EngineSettings;
