use clap::Parser;

/// 100 RP years of months
pub const MAX_PREVIEW_MONTHS: i64 = 1200;

#[derive(Debug, Clone, Parser)]
#[command(name = "rp-calendar-sync")]
#[command(about = "Keep a Discord channel name in step with the RP calendar")]
pub struct CliArgs {
    /// Path to a TOML configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Fetch the channel and report what would change without renaming it
    #[arg(long)]
    pub dry_run: bool,

    /// Translate at this instant (milliseconds since the Unix epoch) instead of now
    #[arg(long, allow_negative_numbers = true)]
    pub at: Option<i64>,

    /// Print the next N calendar months (1-1200) and exit without contacting Discord
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..=MAX_PREVIEW_MONTHS))]
    pub preview: Option<u16>,
}
