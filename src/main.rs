use chrono::Utc;
use clap::Parser;
use rp_calendar_sync::config::calendar::{validate_instant, CalendarConfig};
use rp_calendar_sync::config::preview_from_env;
use rp_calendar_sync::config::toml_config::TomlConfig;
use rp_calendar_sync::core::calendar::upcoming;
use rp_calendar_sync::core::engine::{describe_duration, describe_instant};
use rp_calendar_sync::utils::logger;
use rp_calendar_sync::{
    format_label, ChannelSynchronizer, CliArgs, DiscordClient, Result, SyncConfig, SyncEngine,
    SyncError, SyncOutcome,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting rp-calendar-sync");

    if let Some(at) = args.at {
        if let Err(e) = validate_instant("--at", at) {
            return fail(&e, false);
        }
    }

    if let Some(count) = args.preview {
        return match load_preview(&args) {
            Ok((calendar, icon)) => {
                print_preview(&calendar, &icon, args.at, usize::from(count));
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e, false),
        };
    }

    // 載入並驗證配置
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => return fail(&e, false),
    };
    tracing::debug!("Config: {:?}", config);
    tracing::debug!(
        "Calendar: {} days per year, anchor {} -> {} (year {}), fixed years {}",
        config.calendar.days_per_year(),
        describe_instant(config.calendar.anchor_real_ms()),
        describe_instant(config.calendar.anchor_in_universe_ms()),
        config.calendar.anchor_year(),
        config.calendar.fixed_years()
    );

    let client = match DiscordClient::new(&config.discord) {
        Ok(client) => client,
        Err(e) => return fail(&e, config.always_exit_zero),
    };
    let synchronizer = ChannelSynchronizer::new(client, config.retry.clone()).with_dry_run(args.dry_run);
    let engine = SyncEngine::new(config.calendar.clone(), config.icon.clone(), synchronizer);

    let result = match args.at {
        Some(at) => engine.run_at(at).await,
        None => engine.run().await,
    };

    match result {
        Ok(report) => {
            match &report.outcome {
                SyncOutcome::Unchanged => println!("✅ Channel already named {:?}", report.label),
                SyncOutcome::Renamed { from, to } => {
                    println!("✅ Renamed channel from {:?} to {:?}", from, to)
                }
                SyncOutcome::DryRun { from, to } => {
                    println!("🔍 Would rename channel from {:?} to {:?}", from, to)
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e, config.always_exit_zero),
    }
}

fn load_config(args: &CliArgs) -> Result<SyncConfig> {
    match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            SyncConfig::from_file(path)
        }
        None => SyncConfig::from_env(),
    }
}

fn load_preview(args: &CliArgs) -> Result<(CalendarConfig, String)> {
    match &args.config {
        Some(path) => TomlConfig::from_file(path)?.preview(),
        None => preview_from_env(),
    }
}

fn print_preview(calendar: &CalendarConfig, icon: &str, at: Option<i64>, count: usize) {
    let now = at.unwrap_or_else(|| Utc::now().timestamp_millis());

    println!("📋 Calendar Preview:");
    println!("  Month length: {}", describe_duration(calendar.month_duration_ms()));
    println!();
    for (i, snapshot) in upcoming(calendar, now, count).iter().enumerate() {
        let starts = snapshot.next_month_boundary_ms - snapshot.month_duration_ms;
        let marker = if i == 0 { "→" } else { " " };
        println!(
            "{} {}  starts {}",
            marker,
            format_label(snapshot, icon),
            describe_instant(starts)
        );
    }
}

fn fail(e: &SyncError, always_exit_zero: bool) -> ExitCode {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let code = e.run_exit_code(always_exit_zero);
    if code == 0 {
        tracing::warn!("Exiting 0 because always_exit_zero is set");
    }
    ExitCode::from(code)
}
