#![allow(clippy::unwrap_used)]

use super::history::ChatMessage;
use super::*;
use crate::ai::testing::ScriptedCompletion;
use crate::models::Transaction;

fn manager_with_data() -> SyncManager {
    let mut mgr = SyncManager::new();
    for (date, desc, amount, kind) in [
        ("03/06/2024", "Salary", "3000", "Income"),
        ("03/06/2024", "Rent", "1200", "Expense"),
        ("08/06/2024", "Grocery", "85.50", "Expense"),
    ] {
        mgr.add_transaction(Transaction::parse(date, desc, amount, kind).unwrap());
    }
    mgr
}

#[test]
fn test_prompt_contains_ledger_snapshot() {
    let prompt = build_prompt("  Where does my money go? ", &manager_with_data());
    assert!(prompt.contains("Income: +$3,000.00"));
    assert!(prompt.contains("Expenses: -$1,285.50"));
    assert!(prompt.contains("Net balance: +$1,714.50"));
    assert!(prompt.contains("- Housing: 1200.00"));
    assert!(prompt.contains("- Food: 85.50"));
    assert!(prompt.contains("- Mon: 1200.00"));
    assert!(prompt.contains("- Sat: 85.50"));
    assert!(prompt.contains("08/06/2024|Grocery|85.50|Expense"));
    assert!(prompt.ends_with("Question: Where does my money go?"));
}

#[test]
fn test_prompt_limits_recent_transactions() {
    let mut mgr = SyncManager::new();
    for i in 0..25 {
        let desc = format!("Item {i}");
        mgr.add_transaction(Transaction::parse("01/06/2024", &desc, "1", "Expense").unwrap());
    }
    let prompt = build_prompt("?", &mgr);
    assert!(prompt.contains("Most recent transactions (20 of 25)"));
    assert!(!prompt.contains("|Item 4|"));
    assert!(prompt.contains("|Item 5|"));
    assert!(prompt.contains("|Item 24|"));
}

#[test]
fn test_prompt_on_empty_ledger() {
    let prompt = build_prompt("hi", &SyncManager::new());
    assert!(!prompt.contains("Most recent"));
    assert!(!prompt.contains("Spending by category"));
}

#[test]
fn test_ask_records_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let history = ChatHistory::new(dir.path().join("chat_history.log"));
    let service = Arc::new(ScriptedCompletion::new(["Rent is your biggest cost."]));
    let assistant = Assistant::new(service.clone(), history);

    let answer = assistant
        .ask("What is my biggest cost?", &manager_with_data())
        .unwrap();

    assert_eq!(answer, "Rent is your biggest cost.");
    assert!(service.prompts()[0].contains("Question: What is my biggest cost?"));
    let log = assistant.history().load();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].role, Role::User);
    assert_eq!(log[1].text, "Rent is your biggest cost.");
}

#[test]
fn test_ask_failure_keeps_question() {
    let dir = tempfile::tempdir().unwrap();
    let history = ChatHistory::new(dir.path().join("chat_history.log"));
    let assistant = Assistant::new(Arc::new(crate::ai::DisabledCompletion), history);

    assert!(assistant.ask("Anything?", &SyncManager::new()).is_err());
    let log = assistant.history().load();
    assert_eq!(
        log,
        vec![ChatMessage {
            role: Role::User,
            text: "Anything?".into(),
        }]
    );
}
