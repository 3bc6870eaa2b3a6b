//! main.rs
//! Entry point for fm

use fm_tui::app::{Dispatcher, Session};
use fm_tui::config::Config;
use fm_tui::core::terminal;
use fm_tui::utils::cli::{CliAction, handle_args};
use fm_tui::utils::{init_locale, init_logging, resolve_initial_dir};

use tracing::{error, info, warn};

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[fm] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();

    match action {
        CliAction::Exit => return Ok(()),
        CliAction::Fail => std::process::exit(1),
        _ => {}
    }

    match init_logging() {
        Ok(Some(path)) => info!(path = %path.display(), "logging enabled"),
        Ok(None) => {}
        Err(e) => eprintln!("[fm] Logging disabled: {}", e),
    }

    match init_locale() {
        Some(locale) => info!(%locale, "locale set"),
        None => warn!("locale from the environment is unavailable, using C"),
    }

    let config = Config::load();

    let start_dir = match action {
        CliAction::RunAppAtPath(path_arg) => match resolve_initial_dir(&path_arg) {
            Ok(path) => path,
            Err(e) => {
                eprintln!("\n[fm] Error: Path '{}' cannot be opened: {}", path_arg, e);
                std::process::exit(1);
            }
        },
        _ => std::env::current_dir()?,
    };
    info!(path = %start_dir.display(), "starting");

    let mut session = Session::new(start_dir, config.general());
    let dispatcher = Dispatcher::new(&config);

    if let Err(e) = terminal::run_terminal(&mut session, &dispatcher, config.theme()) {
        error!("terminal failure: {e}");
        eprintln!("\n[fm] Terminal error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
