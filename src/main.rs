use clap::Parser;
use scantron_report::domain::ports::{ConfigProvider, Storage};
use scantron_report::utils::{logger, validation::Validate};
use scantron_report::{
    Cli, Command, LocalStorage, ReportConfig, ReportEngine, ReportPipeline, Result, RunLog,
};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_cli_logger(cli.verbose) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::ProcReport => proc_report(&cli),
    };

    match result {
        Ok(written) => {
            tracing::info!("✅ Report generated successfully!");
            for path in written {
                tracing::debug!("📁 {}", path);
            }
        }
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}

fn proc_report(cli: &Cli) -> Result<Vec<String>> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let storage = LocalStorage::new(config.base_dir.clone());
    let mut log = RunLog::create(storage.full_path(&config.log_filename()))?;

    let pipeline = ReportPipeline::new(storage, config);
    let engine = ReportEngine::new(pipeline);
    let written = engine.run(&mut log)?;

    log.close()?;
    Ok(written)
}
