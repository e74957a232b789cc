//! Briefing text formatting: greeting, articles grouped by category,
//! generation footer. Telegram-flavoured Markdown.

use morningbrief_pipeline::BriefingResult;

/// Summaries longer than this are cut at a character boundary.
const SUMMARY_MAX_CHARS: usize = 200;

pub fn format_briefing(greeting: &str, result: &BriefingResult) -> String {
    let mut out = String::new();
    out.push_str("🌅 *Your Morning Brief*\n\n");
    out.push_str(greeting);
    out.push_str("\n\n");

    // Group by category in first-seen order, preserving selection rank
    // within each category.
    let mut categories: Vec<&str> = Vec::new();
    for article in &result.articles {
        if !categories.contains(&article.category.as_str()) {
            categories.push(&article.category);
        }
    }

    for category in categories {
        out.push_str(&format!("*{}*\n", title_case(category)));
        for article in result.articles.iter().filter(|a| a.category == category) {
            out.push_str(&format!("• [{}]({})\n", article.title, article.source_url));
            out.push_str(&format!("  {}\n\n", truncate_summary(&article.summary)));
        }
    }

    out.push_str(&format!(
        "📅 Generated at {}",
        result.generated_at.format("%H:%M UTC")
    ));
    out
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_MAX_CHARS {
        return summary.to_string();
    }
    let cut: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{cut}...")
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use morningbrief_pipeline::BriefingArticle;

    fn article(category: &str, title: &str) -> BriefingArticle {
        BriefingArticle {
            category: category.to_string(),
            title: title.to_string(),
            summary: "Short summary.".to_string(),
            source_url: format!("https://example.com/{title}"),
        }
    }

    fn result(articles: Vec<BriefingArticle>) -> BriefingResult {
        BriefingResult {
            articles,
            generated_at: chrono::Utc.with_ymd_and_hms(2025, 3, 10, 7, 30, 0).unwrap(),
        }
    }

    #[test]
    fn groups_by_category_in_first_seen_order() {
        let text = format_briefing(
            "Good morning!",
            &result(vec![
                article("technology", "t1"),
                article("sports", "s1"),
                article("technology", "t2"),
            ]),
        );
        let tech = text.find("*Technology*").unwrap();
        let sports = text.find("*Sports*").unwrap();
        assert!(tech < sports);
        // Both technology articles sit under one heading.
        assert_eq!(text.matches("*Technology*").count(), 1);
    }

    #[test]
    fn includes_greeting_and_footer() {
        let text = format_briefing("Good evening, Bob! Hi.", &result(vec![article("world", "w1")]));
        assert!(text.contains("Good evening, Bob!"));
        assert!(text.ends_with("📅 Generated at 07:30 UTC"));
    }

    #[test]
    fn links_article_urls() {
        let text = format_briefing("Hi", &result(vec![article("world", "w1")]));
        assert!(text.contains("• [w1](https://example.com/w1)"));
    }

    #[test]
    fn long_summaries_are_truncated() {
        let mut long = article("world", "w1");
        long.summary = "x".repeat(500);
        let text = format_briefing("Hi", &result(vec![long]));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
        assert!(!text.contains(&"x".repeat(201)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let summary = "é".repeat(300);
        let cut = truncate_summary(&summary);
        assert_eq!(cut.chars().count(), 203); // 200 chars + "..."
    }
}
