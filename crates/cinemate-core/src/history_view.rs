use chrono::{Duration, NaiveDate};
use cinemate_models::HistoryEntry;

pub const HISTORY_PAGE_SIZE: usize = 10;

#[derive(Debug, PartialEq)]
pub struct HistoryPage<'a> {
    pub entries: &'a [HistoryEntry],
    /// 1-based; zero only when there is nothing to show
    pub current: usize,
    pub total_pages: usize,
}

impl HistoryPage<'_> {
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

/// Slice out one page, clamping out-of-range page numbers to the nearest valid page
pub fn paginate(entries: &[HistoryEntry], page: usize, per_page: usize) -> HistoryPage<'_> {
    let per_page = per_page.max(1);
    if entries.is_empty() {
        return HistoryPage { entries, current: 0, total_pages: 0 };
    }

    let total_pages = entries.len().div_ceil(per_page);
    let current = page.clamp(1, total_pages);
    let start = (current - 1) * per_page;
    let end = (start + per_page).min(entries.len());

    HistoryPage {
        entries: &entries[start..end],
        current,
        total_pages,
    }
}

/// Group entries by UTC calendar date, keeping first-seen order
pub fn group_by_date(entries: &[HistoryEntry]) -> Vec<(NaiveDate, Vec<&HistoryEntry>)> {
    let mut groups: Vec<(NaiveDate, Vec<&HistoryEntry>)> = Vec::new();

    for entry in entries {
        let date = entry.timestamp.date_naive();
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, items)) => items.push(entry),
            None => groups.push((date, vec![entry])),
        }
    }

    groups
}

pub fn date_heading(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today - Duration::days(1) {
        "Yesterday".to_string()
    } else {
        date.format("%B %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cinemate_models::{HistoryAction, NewHistoryEntry};

    fn entries(n: usize) -> Vec<HistoryEntry> {
        let start = Utc.with_ymd_and_hms(2025, 4, 16, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                NewHistoryEntry::new(HistoryAction::Search, format!("Search {}", i))
                    .into_entry(start - Duration::hours(i as i64 * 10))
            })
            .collect()
    }

    #[test]
    fn test_paginate_splits_and_clamps() {
        let all = entries(23);

        let first = paginate(&all, 1, HISTORY_PAGE_SIZE);
        assert_eq!(first.entries.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&all, 99, HISTORY_PAGE_SIZE);
        assert_eq!(last.current, 3);
        assert_eq!(last.entries.len(), 3);
        assert_eq!(last.entries[0].title, "Search 20");
        assert!(!last.has_next());

        assert_eq!(paginate(&all, 0, HISTORY_PAGE_SIZE).current, 1);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(&[], 3, HISTORY_PAGE_SIZE);
        assert_eq!(page.current, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.entries.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_group_by_date_keeps_order() {
        let all = entries(5);
        let groups = group_by_date(&all);

        // 12:00, 02:00 on the 16th; 16:00, 06:00 on the 15th; 20:00 on the 14th
        let dates: Vec<String> = groups.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, vec!["2025-04-16", "2025-04-15", "2025-04-14"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1[0].title, "Search 2");
    }

    #[test]
    fn test_date_heading() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 18).unwrap();
        assert_eq!(date_heading(today, today), "Today");
        assert_eq!(date_heading(NaiveDate::from_ymd_opt(2025, 4, 17).unwrap(), today), "Yesterday");
        assert_eq!(date_heading(NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(), today), "April 6, 2025");
    }
}
