#[cfg(feature = "cli")]
pub mod cli;
pub mod curriculum;

#[cfg(feature = "cli")]
use crate::app::report::ReportFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "gpa-resolver")]
#[command(about = "Resolve a student's letter grades from remote sources and compute weighted GPA")]
pub struct CliConfig {
    /// Student identifier to resolve
    pub student_id: Option<String>,

    /// Path to curriculum TOML configuration
    #[arg(short, long, default_value = "curriculum.toml")]
    pub config: String,

    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Validate configuration and print the fetch plan without network access
    #[arg(long)]
    pub dry_run: bool,
}
