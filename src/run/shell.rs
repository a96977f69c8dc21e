use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::Path;

use super::App;
use crate::models::Transaction;

const HELP: &str = "\
Commands:
  add <dd/MM/yyyy> <Income|Expense> <amount> <description...>
  edit <row> <dd/MM/yyyy> <Income|Expense> <amount> <description...>
  rm <row>                      Remove the transaction shown in <row>
  list                          Show transactions (and pending import lines)
  summary                       Totals, weekly spending, categories
  import <file>                 Import date|description|amount|kind lines
  wait                          Block until the running import finishes
  cancel                        Skip import lines not yet rewritten
  chat <question...>            Ask the assistant about your finances
  history                       Show the chat transcript
  help                          Show this help
  quit                          Exit
";

/// Interactive loop. This thread owns every view and the manager; the
/// only other thread is the import worker.
pub(crate) fn as_shell(app: &mut App, input: impl BufRead, mut out: impl Write) -> Result<()> {
    writeln!(out, "LedgerSync. Type `help` for commands.")?;
    let mut lines = input.lines();

    while app.running {
        if let Err(e) = app.poll_import(&mut out) {
            writeln!(out, "Error: {e:#}")?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if let Err(e) = handle_command(line.trim(), app, &mut out) {
            writeln!(out, "Error: {e:#}")?;
        }
    }

    // Don't leave background rewrites uncommitted on exit
    app.wait_import(&mut out)?;
    Ok(())
}

pub(crate) fn handle_command(input: &str, app: &mut App, out: &mut impl Write) -> Result<()> {
    let (cmd, rest) = input
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((input, ""));

    match cmd {
        "" => Ok(()),
        "add" => {
            let txn = parse_entry(rest)?;
            app.add(txn, out)
        }
        "edit" => {
            let (row, entry) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow::anyhow!("Usage: edit <row> <date> <kind> <amount> <description>"))?;
            let row = parse_row(row)?;
            let txn = parse_entry(entry.trim())?;
            app.edit(row, txn, out)
        }
        "rm" | "remove" => app.remove(parse_row(rest)?, out),
        "list" | "ls" => app.list(out),
        "summary" | "s" => app.summary(out),
        "import" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: import <file>");
            }
            app.import_background(Path::new(&super::cli::shellexpand(rest)), out)
        }
        "wait" => app.wait_import(out),
        "cancel" => app.cancel_import(out),
        "chat" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: chat <question>");
            }
            app.chat(rest, out)
        }
        "history" => app.history(out),
        "help" | "?" => {
            write!(out, "{HELP}")?;
            Ok(())
        }
        "quit" | "exit" | "q" => {
            app.running = false;
            Ok(())
        }
        other => anyhow::bail!("Unknown command: {other} (try `help`)"),
    }
}

/// `<date> <kind> <amount> <description...>`, validated before anything
/// reaches the ledger.
fn parse_entry(args: &str) -> Result<Transaction> {
    let mut parts = args.splitn(4, char::is_whitespace).map(str::trim);
    let (Some(date), Some(kind), Some(amount), Some(description)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!("Expected: <dd/MM/yyyy> <Income|Expense> <amount> <description>");
    };
    Ok(Transaction::parse(date, description, amount, kind)?)
}

fn parse_row(s: &str) -> Result<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| anyhow::anyhow!("Invalid row number: '{s}'"))
}
