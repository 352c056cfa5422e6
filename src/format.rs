//! Plain-text rendering of search results and detail cards.

use crate::catalog::{Description, FilterOptions};
use crate::dataset::Emoji;
use crate::search::{FilterKind, Query, Suggestion};

/// One result line: glyph, description and category.
pub fn format_emoji_line(emoji: &Emoji) -> String {
    format!("{} {} ({})", emoji.emoji, emoji.description, emoji.category)
}

/// Human-readable summary of what a query asked for, e.g. `'face' [tag: pet]`.
pub fn describe_query(query: &Query) -> String {
    let mut parts = Vec::new();
    if let Some(text) = query.active_text() {
        parts.push(format!("'{}'", text));
    }
    for (kind, value) in query.filters() {
        parts.push(format!("[{}: {}]", kind.label(), value));
    }
    if parts.is_empty() {
        "all emojis".to_string()
    } else {
        parts.join(" ")
    }
}

/// Numbered result list with a header showing how many matched in total.
pub fn format_search_results(query: &Query, results: &[&Emoji], total: usize) -> String {
    let mut output = if results.len() < total {
        format!(
            "Found {} emojis for {} (showing {}):\n\n",
            total,
            describe_query(query),
            results.len()
        )
    } else {
        format!("Found {} emojis for {}:\n\n", total, describe_query(query))
    };

    for (idx, emoji) in results.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", idx + 1, format_emoji_line(emoji)));
    }

    output
}

/// Message for an empty result, with "did you mean" hints for unknown filter values.
pub fn format_no_results(query: &Query, hints: &[(FilterKind, String, Vec<Suggestion>)]) -> String {
    let mut msg = format!("No emojis found for {}.\n", describe_query(query));

    for (kind, value, suggestions) in hints {
        msg.push_str(&format!("\nUnknown {} '{}'.", kind.label(), value));
        if !suggestions.is_empty() {
            let keys: Vec<&str> = suggestions.iter().map(|s| s.key.as_str()).collect();
            msg.push_str(&format!(" Did you mean: {}?", keys.join(", ")));
        }
        msg.push('\n');
    }

    msg.push_str("\nSearch tips:\n");
    msg.push_str("• Text search matches whole description words: 'face', not 'fac'\n");
    msg.push_str("• Use substring mode to match partial words, tags and aliases\n");
    msg.push_str("• Filters combine: every active filter must match\n");
    msg
}

/// `Tags: #a, #b` or `Tags: None`.
fn format_tags(emoji: &Emoji) -> String {
    if emoji.tags().is_empty() {
        "None".to_string()
    } else {
        format!("#{}", emoji.tags().join(", #"))
    }
}

/// Ranked related list with scores.
pub fn format_related(selected: &Emoji, related: &[(&Emoji, f32)]) -> String {
    if related.is_empty() {
        return format!("No emojis related to {} {}.\n", selected.emoji, selected.description);
    }

    let mut output = format!(
        "Emojis related to {} {} ({}):\n\n",
        selected.emoji,
        selected.description,
        related.len()
    );
    for (idx, (emoji, score)) in related.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} - relevance: {}\n",
            idx + 1,
            format_emoji_line(emoji),
            score
        ));
    }
    output
}

/// Detail card: the emoji's metadata, then related and popular rows.
pub fn format_description(card: &Description<'_>) -> String {
    let emoji = card.emoji;
    let mut output = format!("{}  {}\n", emoji.emoji, emoji.description);
    output.push_str(&format!("Category: {}\n", emoji.category));
    output.push_str(&format!("Tags: {}\n", format_tags(emoji)));
    if !emoji.aliases().is_empty() {
        output.push_str(&format!("Aliases: {}\n", emoji.aliases().join(", ")));
    }

    output.push_str("\nRelated Emojis:\n");
    if card.related.is_empty() {
        output.push_str("  (none)\n");
    }
    for (related, score) in &card.related {
        output.push_str(&format!("  {} {} ({})\n", related.emoji, related.description, score));
    }

    output.push_str("\nPopular Emojis:\n");
    let glyphs: Vec<&str> = card.popular.iter().map(|e| e.emoji.as_str()).collect();
    output.push_str(&format!("  {}\n", glyphs.join(" ")));

    output
}

/// Picker values, one section per requested kind.
pub fn format_filter_options(options: &FilterOptions<'_>, kind: Option<FilterKind>) -> String {
    let sections = [
        (FilterKind::Category, "Categories", &options.categories),
        (FilterKind::Tag, "Tags", &options.tags),
        (FilterKind::Alias, "Aliases", &options.aliases),
    ];

    let mut output = String::new();
    for (section_kind, title, values) in sections {
        if kind.is_some_and(|k| k != section_kind) {
            continue;
        }
        output.push_str(&format!("{} ({}):\n", title, values.len()));
        for value in values.iter() {
            output.push_str(&format!("  • {}\n", value));
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use assert2::check;

    fn rocket() -> Emoji {
        Emoji {
            emoji: "🚀".to_string(),
            description: "rocket".to_string(),
            category: "Travel & Places".to_string(),
            tags: Some(vec!["ship".to_string(), "launch".to_string()]),
            aliases: None,
        }
    }

    #[test]
    fn test_describe_query() {
        check!(describe_query(&Query::default()) == "all emojis");
        check!(describe_query(&Query::text(" face ").with_tag("pet")) == "'face' [tag: pet]");
    }

    #[test]
    fn test_tags_line() {
        let mut emoji = rocket();
        check!(format_tags(&emoji) == "#ship, #launch");
        emoji.tags = None;
        check!(format_tags(&emoji) == "None");
    }

    #[test]
    fn test_search_results_header_mentions_truncation() {
        let emoji = rocket();
        let output = format_search_results(&Query::text("rocket"), &[&emoji], 3);
        check!(output.starts_with("Found 3 emojis for 'rocket' (showing 1):"));
        check!(output.contains("1. 🚀 rocket (Travel & Places)"));
    }

    #[test]
    fn test_no_results_lists_suggestions() {
        let query = Query::default().with_tag("hapy");
        let hints = vec![(
            FilterKind::Tag,
            "hapy".to_string(),
            vec![Suggestion {
                key: "happy".to_string(),
                score: 0.95,
            }],
        )];
        let msg = format_no_results(&query, &hints);
        check!(msg.contains("Unknown tag 'hapy'. Did you mean: happy?"));
    }

    #[test]
    fn test_description_card() {
        let catalog = Catalog::builtin();
        let card = catalog.describe("🐶", 3, 4).unwrap();
        let output = format_description(&card);
        check!(output.starts_with("🐶  dog face\n"));
        check!(output.contains("Tags: #pet\n"));
        check!(output.contains("Aliases: dog\n"));
        check!(output.contains("🐱 cat face (3.5)"));
    }

    #[test]
    fn test_filter_options_single_kind() {
        let catalog = Catalog::builtin();
        let output = format_filter_options(&catalog.filter_options(), Some(FilterKind::Category));
        check!(output.starts_with("Categories ("));
        check!(!output.contains("Tags ("));
    }
}
