mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_core::time_utils::TimezoneHandler;
use dashboard_runtime::DashboardSession;
use dashboard_ui::app::App;
use dashboard_ui::report::render_report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;

    // The TUI owns the terminal, so its logs always go to a file.
    let log_file = match settings.view.as_str() {
        "report" => settings.log_file.clone(),
        _ => Some(
            settings
                .log_file
                .clone()
                .unwrap_or_else(|| bootstrap::default_log_file(&app_dir)),
        ),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Viewing Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Timezone: {}",
        settings.view,
        settings.theme,
        settings.timezone
    );

    let countries = bootstrap::load_country_table(&settings)?;
    let tz = TimezoneHandler::new(&settings.timezone);
    let source = bootstrap::resolve_data_source(&settings);
    let description = source.describe();

    let session = DashboardSession::open(source, countries, tz)
        .with_context(|| format!("loading export from {description}"))?;

    match settings.view.as_str() {
        "report" => {
            print!("{}", render_report(&session.snapshot()));
        }
        _ => {
            App::new(&settings.theme, session).run()?;
        }
    }

    tracing::info!("Viewing Dashboard exiting");
    Ok(())
}
