use clap::Parser;
use ghia::config::cli::LogFormat;
use ghia::core::report::{render_decision, render_failure};
use ghia::utils::error::ErrorSeverity;
use ghia::utils::{logger, validation::Validate};
use ghia::{
    load_rule_set, Assigner, AssignerError, AuthConfig, CliConfig, GitHubClient, OutcomeStatus,
    RunReport, RunSettings,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // Initialize logging
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }
    tracing::debug!("CLI config: {:?}", config);

    match run(config).await {
        Ok(report) if report.has_failures() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            if e.is_config_error() {
                tracing::error!("Aborted before contacting GitHub");
            }
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 1,
                ErrorSeverity::High => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

/// Loads both configuration files, runs the assigner and prints the per-issue report.
async fn run(config: CliConfig) -> Result<RunReport, AssignerError> {
    // Validate configuration
    config.validate()?;

    // Rules are loaded in full before anything touches GitHub.
    let auth = AuthConfig::from_file(&config.config_auth)?;
    auth.validate()?;
    let rules = load_rule_set(&config.config_rules)?;
    tracing::info!(
        "Loaded {} rules for {} users",
        rules.rule_count(),
        rules.users.len()
    );

    // Build the GitHub client
    let repo = config
        .repo
        .clone()
        .unwrap_or_else(|| auth.repo().to_string());
    let client = GitHubClient::new(auth.api_url(), auth.credentials()?)?;

    let settings = RunSettings {
        repo,
        strategy: config.strategy,
        dry_run: config.dry_run,
        concurrency: config.concurrency,
    };
    let report = Assigner::new(client, rules, settings).run().await?;

    // Report each issue in listing order
    for outcome in &report.outcomes {
        print!("{}", render_decision(&report.repo, &outcome.decision));
        if let OutcomeStatus::Failed(message) = &outcome.status {
            eprintln!("{}", render_failure(&report.repo, &outcome.decision));
            tracing::debug!("Failure detail: {}", message);
        }
    }

    Ok(report)
}
