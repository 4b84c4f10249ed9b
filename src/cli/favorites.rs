use super::open_session;
use super::render::{favorite_markdown, print_consultation, print_favorite_line};
use crate::types::Prescription;

/// Resolve a 1-based index or an exact name against the favorites list
fn resolve<'a>(favorites: &'a [Prescription], target: &str) -> Result<&'a Prescription, String> {
    if let Ok(n) = target.parse::<usize>() {
        if let Some(item) = n.checked_sub(1).and_then(|i| favorites.get(i)) {
            return Ok(item);
        }
    }

    favorites
        .iter()
        .find(|p| p.prescription_name == target)
        .ok_or_else(|| format!("Favorite not found: {}", target))
}

/// Run the favorites list command
pub fn run_list() -> Result<(), String> {
    let session = open_session()?;
    let favorites = session.favorites();

    if favorites.is_empty() {
        println!("No favorites yet. Save one with: jingui consult \"...\" --favorite 1");
        return Ok(());
    }

    for (i, p) in favorites.iter().enumerate() {
        print_favorite_line(i + 1, p);
    }

    Ok(())
}

/// Run the favorites show command
pub fn run_show(target: &str) -> Result<(), String> {
    let mut session = open_session()?;
    let item = resolve(session.favorites(), target)?.clone();

    session.select_from_favorites(&item);

    if let Some(result) = session.result() {
        print_consultation(result, |p| session.is_favorite(p));
    }

    Ok(())
}

/// Run the favorites remove command
pub fn run_remove(target: &str) -> Result<(), String> {
    let mut session = open_session()?;
    let item = resolve(session.favorites(), target)?.clone();

    session.toggle_favorite(&item);
    println!("Removed from favorites: {}", item.prescription_name);

    Ok(())
}

/// Run the favorites export command
pub fn run_export(format: &str) -> Result<(), String> {
    let session = open_session()?;
    let favorites = session.favorites();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(favorites)
                .map_err(|e| format!("Failed to serialize: {}", e))?;
            println!("{}", json);
        }
        "md" => {
            for p in favorites {
                println!("{}", favorite_markdown(p));
            }
        }
        _ => {
            return Err(format!("Unknown format: {}", format));
        }
    }

    Ok(())
}
