use clap::Parser;
use gpa_resolver::app::report::{self, ReportFormat};
use gpa_resolver::domain::ports::Storage;
use gpa_resolver::utils::error::{ErrorSeverity, GpaError};
use gpa_resolver::utils::{logger, validation::validate_path, validation::Validate};
use gpa_resolver::{CliConfig, CurriculumConfig, GpaEngine, LocalStorage, RemoteTextFetcher};
use std::path::Path;
use std::sync::Arc;

fn print_plan(config: &CurriculumConfig, fetcher: &RemoteTextFetcher) {
    println!("📋 Fetch plan ({} strategies):", fetcher.strategies().len());
    for semester in &config.semesters {
        println!("\n== {} ==", semester.name);
        for course in &semester.courses {
            println!("  {} ({} units)", course.name, course.units);
            for (system, location) in course.sources() {
                for (strategy, url) in fetcher.plan(location) {
                    println!("    [{}] {:<10} {}", system, strategy, url);
                }
            }
        }
    }
}

async fn emit(content: &str, output: Option<&str>) -> Result<(), GpaError> {
    match output {
        Some(path) => {
            validate_path("output", path)?;
            let path = Path::new(path);
            let base = path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            let file_name = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            LocalStorage::new(base)
                .write_file(&file_name, content.as_bytes())
                .await?;
            tracing::info!("📁 Report saved to: {}", path.display());
            Ok(())
        }
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

fn exit_code(error: &GpaError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 4, // 隱私保護
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loading curriculum from: {}", args.config);
    let config = match CurriculumConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let fetcher = RemoteTextFetcher::new(config.fetch.strategies.clone())
        .with_timeout(config.fetch.timeout_seconds);

    if args.dry_run {
        print_plan(&config, &fetcher);
        return Ok(());
    }

    let Some(student_id) = args.student_id.as_deref() else {
        eprintln!("❌ A student identifier is required (or use --dry-run)");
        std::process::exit(1);
    };

    let engine = GpaEngine::new(Arc::new(config), fetcher);

    match engine.run(student_id).await {
        Ok(result) => {
            let content = report::render(&result, args.format)?;
            emit(&content, args.output.as_deref()).await?;
        }
        Err(e) => {
            tracing::error!(
                "❌ Resolution failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            let format = match args.format {
                ReportFormat::Json => ReportFormat::Json,
                _ => ReportFormat::Text,
            };
            let content = report::render_failure(&e, format)?;
            if format == ReportFormat::Json {
                emit(&content, args.output.as_deref()).await?;
            } else {
                eprint!("{}", content);
                eprintln!("💡 {}", e.recovery_suggestion());
            }

            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}
