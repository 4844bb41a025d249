use argo_report::config::toml_config::TomlConfig;
use argo_report::config::{output_filename, ReportSettings};
use argo_report::core::filter::{ReportWindow, WorkflowMatcher};
use argo_report::core::report::ReportRequest;
use argo_report::domain::model::ReportOutcome;
use argo_report::utils::error::{ErrorSeverity, ReportError};
use argo_report::utils::{logger, validation, validation::Validate};
use argo_report::{CliConfig, HtmlTimeline, LocalStorage, ReportEngine, ReportPipeline};
use chrono::{Local, NaiveDate};
use clap::Parser;

fn config_failure(e: ReportError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting argo-report CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 設定來源：環境變數 -> 設定檔 -> CLI 參數
    let mut settings = ReportSettings::from_env();
    if let Some(path) = &cli.config {
        match TomlConfig::from_file(path) {
            Ok(file) => {
                if let Err(e) = file.validate() {
                    config_failure(e);
                }
                settings.apply_file(&file);
            }
            Err(e) => config_failure(e),
        }
    }
    settings.apply_cli(&cli);

    if let Err(e) = settings.validate() {
        config_failure(e);
    }
    if let Err(e) = validation::validate_phase("phase", &cli.phase) {
        config_failure(e);
    }
    if let Err(e) = validation::validate_positive_number("days", cli.days as usize, 1) {
        config_failure(e);
    }

    if settings.bearer_token.is_none() {
        tracing::warn!(
            "No bearer token provided. Set ARGO_BEARER_TOKEN environment variable \
             or use --token argument for authenticated requests."
        );
    }

    // 報表時間窗：--date 指定起始日，否則用今天；一律半開區間
    let window = match &cli.date {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(day) => ReportWindow::for_day(day, cli.days),
            Err(_) => config_failure(ReportError::DateFormatError {
                value: raw.clone(),
                expected: "YYYY-MM-DD",
            }),
        },
        None => ReportWindow::current_day(Local::now().naive_local(), cli.days),
    };

    let matcher = match cli.workflow.as_deref().map(WorkflowMatcher::new).transpose() {
        Ok(matcher) => matcher,
        Err(e) => config_failure(e),
    };
    if let Some(pattern) = &cli.workflow {
        tracing::info!("Filtering by workflow pattern: '{}'", pattern);
    }

    let output_file = output_filename(
        window.start.date(),
        &cli.phase,
        cli.days,
        cli.output.as_deref(),
    );

    let storage = LocalStorage::new(settings.output_path.clone());
    let request = ReportRequest {
        phase: cli.phase.clone(),
        window,
        matcher,
        output_file: output_file.clone(),
    };
    let pipeline = ReportPipeline::new(storage, settings.clone(), HtmlTimeline, request);
    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(ReportOutcome::Written { output_path, .. }) => {
            println!("✅ Report generation complete!");
            println!("📁 Report saved to: {}", output_path);

            #[cfg(feature = "s3")]
            if let Err(e) = argo_report::config::s3::upload_report(&settings, &output_file).await {
                tracing::error!("❌ S3 upload failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
        Ok(ReportOutcome::NothingToReport) => {
            println!("ℹ️  No workflows found for the specified filters; nothing to report.");
        }
        Err(e) => {
            tracing::error!(
                "❌ Report generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
