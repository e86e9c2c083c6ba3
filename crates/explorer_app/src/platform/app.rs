use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Local;
use explorer_core::{update, ListState, Msg};
use explorer_engine::{Catalog, CatalogItem, EngineHandle, HttpPageSource};
use explorer_logging::{explorer_info, LogDestination};
use log::LevelFilter;

use super::cli::Args;
use super::config::ExplorerConfig;
use super::effects::EffectRunner;
use super::render::render;

const HELP: &str = "Commands: start | more | less | page <offset> | reset | help | quit";

/// Everything the main loop reacts to: list messages plus app-level commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppInput {
    Msg(Msg<CatalogItem>),
    Help,
    Quit,
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let config = ExplorerConfig::resolve(&args).context("loading configuration")?;

    let (destination, level) = if args.verbose {
        (LogDestination::Both(config.log_file.clone()), LevelFilter::Debug)
    } else {
        (LogDestination::File(config.log_file.clone()), LevelFilter::Info)
    };
    explorer_logging::initialize(destination, level);
    config.log_summary();

    let catalog = config.catalog();
    let source = HttpPageSource::new(catalog, config.base_url(), config.fetch_settings())
        .context("building HTTP client")?;
    let engine = EngineHandle::new(Arc::new(source)).context("starting fetch engine")?;

    let (msg_tx, msg_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(engine, msg_tx.clone());
    spawn_stdin_reader(msg_tx);

    let title = catalog_title(catalog);
    let mut state: ListState<CatalogItem> =
        ListState::new(config.page_size()?).with_truncate_policy(config.truncate_policy());

    println!("{title} explorer. {HELP}");
    while let Ok(input) = msg_rx.recv() {
        let msg = match input {
            AppInput::Msg(msg) => msg,
            AppInput::Help => {
                println!("{HELP}");
                continue;
            }
            AppInput::Quit => break,
        };

        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        if state.consume_dirty() {
            let updated_at = Local::now().format("%H:%M:%S").to_string();
            print!("{}", render(title, &state.view(), &updated_at));
        }
    }

    explorer_info!("Explorer exiting with {} item(s)", state.items().len());
    Ok(())
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let input = match parse_command(&line) {
                Some(input) => input,
                None if line.trim().is_empty() => continue,
                None => AppInput::Help,
            };
            let quit = input == AppInput::Quit;
            if msg_tx.send(input).is_err() || quit {
                return;
            }
        }
        let _ = msg_tx.send(AppInput::Quit);
    });
}

/// Map one line of user input to an app input. `None` for blank input or a
/// `page` command without a valid offset.
fn parse_command(line: &str) -> Option<AppInput> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();
    let input = match command.as_str() {
        "start" | "s" => AppInput::Msg(Msg::StartClicked),
        "more" | "m" | "next" => AppInput::Msg(Msg::LoadMoreClicked),
        "less" | "l" | "prev" => AppInput::Msg(Msg::LoadLessClicked),
        "reset" | "clear" => AppInput::Msg(Msg::ResetClicked),
        "page" | "p" => {
            let offset = words.next()?.parse().ok()?;
            AppInput::Msg(Msg::LoadPageRequested { offset })
        }
        "quit" | "q" | "exit" => AppInput::Quit,
        _ => AppInput::Help,
    };
    Some(input)
}

fn catalog_title(catalog: Catalog) -> &'static str {
    match catalog {
        Catalog::Pokemon { .. } => "Pokémon",
        Catalog::Countries => "Countries",
        Catalog::Jokes => "Jokes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_list_messages() {
        assert_eq!(parse_command("start"), Some(AppInput::Msg(Msg::StartClicked)));
        assert_eq!(parse_command("  MORE "), Some(AppInput::Msg(Msg::LoadMoreClicked)));
        assert_eq!(parse_command("less"), Some(AppInput::Msg(Msg::LoadLessClicked)));
        assert_eq!(parse_command("reset"), Some(AppInput::Msg(Msg::ResetClicked)));
        assert_eq!(parse_command("q"), Some(AppInput::Quit));
    }

    #[test]
    fn page_command_takes_an_offset() {
        assert_eq!(
            parse_command("page 30"),
            Some(AppInput::Msg(Msg::LoadPageRequested { offset: 30 }))
        );
        assert_eq!(parse_command("page"), None);
        assert_eq!(parse_command("page -1"), None);
    }

    #[test]
    fn blank_and_unknown_input() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("weather"), Some(AppInput::Help));
    }
}
