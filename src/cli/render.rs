use chrono::{Local, TimeZone};

use crate::types::{ConsultationResult, HistoryItem, Prescription};

/// Print a full consultation, marking favorited prescriptions
pub fn print_consultation(result: &ConsultationResult, is_favorite: impl Fn(&Prescription) -> bool) {
    println!("Analysis");
    println!("========\n");
    println!("{}\n", result.symptom_analysis);

    let many = result.prescriptions.len() > 1;
    for (i, p) in result.prescriptions.iter().enumerate() {
        if many {
            println!("--- Option {} ---", i + 1);
        }
        print_prescription(p, is_favorite(p));
    }

    println!("Comparison");
    println!("==========\n");
    println!("{}\n", result.comparison);

    println!("Recommendation");
    println!("==============\n");
    println!("{}", result.recommendation);
}

pub fn print_prescription(p: &Prescription, favorite: bool) {
    let star = if favorite { " *" } else { "" };
    println!("{}{}", p.prescription_name, star);
    println!("  source: {}\n", p.source_chapter);

    if p.has_ingredients() {
        println!("  Ingredients:");
        for ingredient in &p.ingredients {
            if ingredient.dosage.is_empty() {
                println!("    {}", ingredient.name);
            } else {
                println!("    {} {}", ingredient.name, ingredient.dosage);
            }
            println!("      origin: {}", ingredient.origin_or_default());
            println!("      buying: {}", ingredient.buying_tips_or_default());
        }
        println!();
    }

    print_section("Original text", &p.original_text);
    print_section("Translation", &p.translation);
    print_section("Usage", &p.usage_method);
    print_section("Precautions", &p.precautions);
    print_section("Pharmacology", &p.pharmacology);
    print_section("Why it fits", &p.matched_symptoms);

    let related = p.related();
    if !related.is_empty() {
        println!("  Related:");
        for r in related {
            println!("    {}: {}", r.name, r.reason);
        }
        println!();
    }
}

fn print_section(title: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    println!("  {}:", title);
    for line in body.lines() {
        println!("    {}", line);
    }
    println!();
}

/// Compact listing entry for a favorite
pub fn print_favorite_line(index: usize, p: &Prescription) {
    println!("[{}] {}", index, p.prescription_name);
    if !p.source_chapter.is_empty() {
        println!("    {}", p.source_chapter);
    }
    if p.has_ingredients() {
        println!("    {}", ingredient_summary(p));
    }
    if !p.matched_symptoms.trim().is_empty() {
        println!("    {}", p.matched_symptoms);
    }
}

/// `name(dosage)` for each ingredient, joined with `、`
pub fn ingredient_summary(p: &Prescription) -> String {
    p.ingredients
        .iter()
        .map(|i| {
            if i.dosage.is_empty() {
                i.name.clone()
            } else {
                format!("{}({})", i.name, i.dosage)
            }
        })
        .collect::<Vec<_>>()
        .join("、")
}

pub fn print_history_item(index: usize, item: &HistoryItem) {
    println!("[{}] {}  {}", index, format_timestamp(item.timestamp), item.query);
}

/// Local time for an epoch-millis timestamp
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "????-??-?? ??:??".to_string(),
    }
}

/// Markdown export of a favorite
pub fn favorite_markdown(p: &Prescription) -> String {
    let mut out = format!("## {}\n\n*{}*\n\n", p.prescription_name, p.source_chapter);

    for ingredient in &p.ingredients {
        out.push_str(&format!(
            "- {} {} ({}; {})\n",
            ingredient.name,
            ingredient.dosage,
            ingredient.origin_or_default(),
            ingredient.buying_tips_or_default()
        ));
    }
    if p.has_ingredients() {
        out.push('\n');
    }

    for (title, body) in [
        ("Original text", &p.original_text),
        ("Translation", &p.translation),
        ("Usage", &p.usage_method),
        ("Precautions", &p.precautions),
    ] {
        if !body.is_empty() {
            out.push_str(&format!("**{}:** {}\n\n", title, body));
        }
    }

    out.push_str("---\n");
    out
}
