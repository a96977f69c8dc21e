use anyhow::Result;
use std::io::Write;
use std::path::Path;

use super::App;

pub(crate) fn as_cli(args: &[String], app: &mut App, out: &mut impl Write) -> Result<()> {
    match args[1].as_str() {
        "import" => cli_import(&args[2..], app, out),
        "chat" => cli_chat(&args[2..], app, out),
        "--help" | "-h" | "help" => {
            print_usage(out)?;
            Ok(())
        }
        "--version" | "-V" | "version" => {
            writeln!(out, "ledgersync {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(out, "LedgerSync: in-memory personal finance ledger")?;
    writeln!(out)?;
    writeln!(out, "Usage: ledgersync [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                        Launch the interactive shell")?;
    writeln!(out, "  import <file>                 Import date|description|amount|kind lines and print a summary")?;
    writeln!(out, "  chat <file> <question...>     Import a file, then ask the assistant about it")?;
    writeln!(out, "  --help, -h                    Show this help")?;
    writeln!(out, "  --version, -V                 Show version")?;
    writeln!(out)?;
    writeln!(out, "Environment:")?;
    writeln!(out, "  LEDGERSYNC_AI_KEY             API key; without it AI rewrites and chat are disabled")?;
    writeln!(out, "  LEDGERSYNC_AI_URL             Chat completions endpoint (OpenAI-compatible)")?;
    writeln!(out, "  LEDGERSYNC_AI_MODEL           Model name")?;
    writeln!(out, "  LEDGERSYNC_DATA_DIR           Where chat history is kept")?;
    Ok(())
}

fn cli_import(args: &[String], app: &mut App, out: &mut impl Write) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: ledgersync import <file>");
    };
    let path = shellexpand(file_path);
    let path = Path::new(&path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    app.import_blocking(path, out)?;
    writeln!(out)?;
    app.list(out)?;
    writeln!(out)?;
    app.summary(out)
}

fn cli_chat(args: &[String], app: &mut App, out: &mut impl Write) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: ledgersync chat <file> <question...>");
    }
    let path = shellexpand(&args[0]);
    app.import_blocking(Path::new(&path), out)?;
    app.chat(&args[1..].join(" "), out)
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
