mod aggregate;
mod ai;
mod categorize;
mod chat;
mod config;
mod import;
mod ledger;
mod logging;
mod models;
mod run;
mod sync;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    logging::init_tracing();
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;

    let completion = ai::from_config(config.ai.as_ref())?;
    let normalizer = import::Normalizer::new(completion.clone());
    let assistant = chat::Assistant::new(
        completion,
        chat::ChatHistory::new(config.chat_history_path()),
    );

    // The one ledger for this process
    let mut manager = sync::SyncManager::new();
    let mut app = run::App::new(&mut manager, normalizer, assistant);

    let stdout = std::io::stdout();
    match args.len() {
        1 => run::as_shell(&mut app, std::io::stdin().lock(), stdout.lock()),
        _ => run::as_cli(&args, &mut app, &mut stdout.lock()),
    }
}
