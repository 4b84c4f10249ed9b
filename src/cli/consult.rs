use super::open_session;
use super::render::print_consultation;
use crate::query::GeminiClient;
use crate::session::{Phase, Session, QUERY_FAILED_MESSAGE};

/// Run the consult command
pub fn run_consult(query: &str, favorite: &[usize]) -> Result<(), String> {
    if query.trim().is_empty() {
        return Err("Describe your symptoms, e.g.: jingui consult \"头痛发热\"".to_string());
    }

    let mut session = open_session()?;
    consult_with(&mut session, query, favorite)
}

/// Submit `query` on an open session, apply favorite toggles, print the result
pub(super) fn consult_with(
    session: &mut Session<GeminiClient>,
    query: &str,
    favorite: &[usize],
) -> Result<(), String> {
    println!("Consulting the classics...\n");

    match session.submit(query) {
        Phase::Success => {}
        Phase::Error => {
            return Err(session.error().unwrap_or(QUERY_FAILED_MESSAGE).to_string());
        }
        Phase::Idle | Phase::Loading => return Ok(()),
    }

    let prescriptions = session
        .result()
        .map(|r| r.prescriptions.clone())
        .unwrap_or_default();

    for &n in favorite {
        let item = n
            .checked_sub(1)
            .and_then(|i| prescriptions.get(i))
            .ok_or_else(|| format!("No option {} (result has {})", n, prescriptions.len()))?;

        if session.toggle_favorite(item) {
            println!("Added to favorites: {}", item.prescription_name);
        } else {
            println!("Removed from favorites: {}", item.prescription_name);
        }
    }
    if !favorite.is_empty() {
        println!();
    }

    if let Some(result) = session.result() {
        print_consultation(result, |p| session.is_favorite(p));
    }

    Ok(())
}
