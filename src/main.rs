use clap::Parser;
use pocket_ledger::args::{Args, Command, SettingsAction};
use pocket_ledger::session::Session;
use pocket_ledger::{commands, Config, Mode, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            std::process::ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().pocket_home().path();

    // When POCKET_IN_TEST_MODE is set and non-empty, reports are recorded in memory instead of
    // being sent to Telegram.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Mcp(_mcp_args) => commands::mcp(Config::load(home).await?, mode)
            .await?
            .print(),

        command => {
            let config = Config::load(home).await?;
            let mut session = Session::open(config, mode).await?;
            match command {
                Command::Add(add_args) => commands::add(&mut session, add_args).await?.print(),
                Command::List(range) => commands::list(&mut session, range)?.print(),
                Command::Summary(range) => commands::summary(&mut session, range)?.print(),
                Command::Report(report_args) => commands::report(&session, report_args.days())
                    .await?
                    .print(),
                Command::ReportScheduled => commands::report_scheduled(&session).await?.print(),
                Command::Settings(settings_args) => match settings_args.action() {
                    SettingsAction::Save(save_args) => {
                        commands::save_settings(&session, save_args).await?.print()
                    }
                    SettingsAction::Show => commands::show_settings(&session).await?.print(),
                },
                Command::Reset(reset_args) => {
                    commands::reset(&mut session, reset_args).await?.print()
                }
                Command::Init | Command::Mcp(_) => {}
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
