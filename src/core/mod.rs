pub mod engine;
pub mod fetcher;
pub mod gpa;
pub mod parser;
pub mod resolver;

pub use crate::domain::model::{Course, CourseKind, GradingScale, ResolvedGrade, SystemTag};
pub use crate::domain::ports::{Storage, TextFetcher};
pub use crate::utils::error::Result;
