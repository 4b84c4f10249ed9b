use super::consult::consult_with;
use super::render::print_history_item;
use super::{open_session, StdinConfirm};
use crate::library::{AlwaysConfirm, Confirm};
use crate::types::HistoryItem;

/// Resolve a 1-based index or an exact (trimmed) query against the history
fn resolve<'a>(history: &'a [HistoryItem], target: &str) -> Result<&'a HistoryItem, String> {
    if let Ok(n) = target.parse::<usize>() {
        if let Some(item) = n.checked_sub(1).and_then(|i| history.get(i)) {
            return Ok(item);
        }
    }

    let target = target.trim();
    history
        .iter()
        .find(|h| h.query == target)
        .ok_or_else(|| format!("No search in history: {}", target))
}

/// Run the history list command
pub fn run_list(limit: usize) -> Result<(), String> {
    let session = open_session()?;
    let history = session.history();

    if history.is_empty() {
        println!("No searches yet.");
        return Ok(());
    }

    for (i, item) in history.iter().take(limit).enumerate() {
        print_history_item(i + 1, item);
    }

    Ok(())
}

/// Run the history rerun command: submit a past query again
pub fn run_rerun(target: &str, favorite: &[usize]) -> Result<(), String> {
    let mut session = open_session()?;
    let query = resolve(session.history(), target)?.query.clone();

    consult_with(&mut session, &query, favorite)
}

/// Run the history clear command
pub fn run_clear(force: bool) -> Result<(), String> {
    let mut session = open_session()?;

    if session.history().is_empty() {
        println!("History is already empty.");
        return Ok(());
    }

    let confirm: &dyn Confirm = if force { &AlwaysConfirm } else { &StdinConfirm };

    if session.clear_history(confirm) {
        println!("History cleared.");
    } else {
        println!("Cancelled.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<HistoryItem> {
        vec![
            HistoryItem { query: "头痛发热".into(), timestamp: 2 },
            HistoryItem { query: "咳嗽".into(), timestamp: 1 },
        ]
    }

    #[test]
    fn test_resolve_by_index_and_query() {
        let history = history();

        assert_eq!(resolve(&history, "2").unwrap().query, "咳嗽");
        assert_eq!(resolve(&history, " 头痛发热 ").unwrap().query, "头痛发热");
        assert!(resolve(&history, "0").is_err());
        assert!(resolve(&history, "3").is_err());
        assert!(resolve(&history, "腹痛").is_err());
    }
}
