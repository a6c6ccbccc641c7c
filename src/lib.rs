pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::curriculum::CurriculumConfig;
pub use core::{
    engine::GpaEngine,
    fetcher::{RemoteTextFetcher, RetrievalStrategy, StrategyKind},
    gpa::GpaAggregator,
    parser::GradeRecordParser,
    resolver::CourseGradeResolver,
};
pub use utils::error::{GpaError, Result};
