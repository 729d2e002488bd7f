use super::prompts;
use super::App;
use chrono::Utc;
use cinemate_core::{date_heading, group_by_date, paginate, HistoryPage, HISTORY_PAGE_SIZE};
use cinemate_models::{HistoryAction, HistoryEntry};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_show(app: &App, filter: Option<HistoryAction>, page: usize) -> Result<()> {
    let entries = app.library.activity().list(filter)?;
    let page = paginate(&entries, page, HISTORY_PAGE_SIZE);

    if !app.output.is_human() {
        app.output.json(&json!({
            "filter": filter,
            "page": page.current,
            "totalPages": page.total_pages,
            "total": entries.len(),
            "entries": page.entries,
        }));
        return Ok(());
    }

    if page.entries.is_empty() {
        match filter {
            Some(action) => app.output.info(format!("No \"{}\" activity yet", action.label())),
            None => app.output.info("No activity yet. Search for a movie to get started"),
        }
        return Ok(());
    }

    let today = Utc::now().date_naive();
    for (date, items) in group_by_date(page.entries) {
        app.output.println("");
        app.output.println(format!("{}", date_heading(date, today).bright_cyan().bold()));
        for entry in items {
            app.output.println(format_entry(entry));
        }
    }

    app.output.println("");
    let footer = page_footer(&page, entries.len());
    app.output.println(footer.bright_black().to_string());
    Ok(())
}

fn page_footer(page: &HistoryPage<'_>, total: usize) -> String {
    let mut footer = format!("Page {} of {} ({} entries)", page.current, page.total_pages, total);
    if page.has_previous() {
        footer.push_str(&format!(" · prev: --page {}", page.current - 1));
    }
    if page.has_next() {
        footer.push_str(&format!(" · next: --page {}", page.current + 1));
    }
    footer
}

pub fn run_clear(app: &App, yes: bool) -> Result<()> {
    let count = app.library.activity().list(None)?.len();
    if count == 0 {
        app.output.info("History is already empty");
        return Ok(());
    }

    if !yes && !prompts::prompt_yes_no(&format!("Clear all {} history entries?", count), Some(false))? {
        app.output.info("Cancelled");
        return Ok(());
    }

    app.library.activity().clear()?;
    app.output.success(format!("Cleared {} history entries", count));
    Ok(())
}

fn format_entry(entry: &HistoryEntry) -> String {
    let time = entry.timestamp.format("%H:%M");
    let mut line = format!(
        "  {} {}  {} {}",
        time.to_string().bright_black(),
        entry.action.icon(),
        entry.action.label().bold(),
        entry.title
    );
    if let Some(details) = entry.details.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!("\n        {}", details.bright_black()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_entry_includes_label_and_details() {
        let entry = HistoryEntry {
            action: HistoryAction::WatchlistAdd,
            title: "Heat".to_string(),
            movie_id: Some(949),
            details: Some("Added \"Heat\" to watchlist".to_string()),
            timestamp: Utc.with_ymd_and_hms(2025, 4, 16, 9, 30, 0).unwrap(),
        };
        let line = format_entry(&entry);
        assert!(line.contains("09:30"));
        assert!(line.contains("Added to Watchlist"));
        assert!(line.contains("Heat"));
        assert!(line.contains("to watchlist"));
    }

    #[test]
    fn test_page_footer_links_neighbouring_pages() {
        let entries: Vec<HistoryEntry> = (0..25)
            .map(|i| HistoryEntry {
                action: HistoryAction::Search,
                title: format!("q{}", i),
                movie_id: None,
                details: None,
                timestamp: Utc.with_ymd_and_hms(2025, 4, 16, 9, 0, 0).unwrap(),
            })
            .collect();

        let first = page_footer(&paginate(&entries, 1, HISTORY_PAGE_SIZE), entries.len());
        assert_eq!(first, "Page 1 of 3 (25 entries) · next: --page 2");

        let middle = page_footer(&paginate(&entries, 2, HISTORY_PAGE_SIZE), entries.len());
        assert_eq!(middle, "Page 2 of 3 (25 entries) · prev: --page 1 · next: --page 3");

        let last = page_footer(&paginate(&entries, 3, HISTORY_PAGE_SIZE), entries.len());
        assert_eq!(last, "Page 3 of 3 (25 entries) · prev: --page 2");
    }
}
