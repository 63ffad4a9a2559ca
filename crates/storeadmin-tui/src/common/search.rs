//! Debounced search box with latest-only result gating.

use std::time::{Duration, Instant};

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use storeadmin_core::tasks::{Debouncer, LatestOnly, TaskId};

use super::layout::spinner;

#[derive(Debug)]
pub struct SearchBox {
    pub query: String,
    pub focused: bool,
    debouncer: Debouncer,
    gate: LatestOnly,
}

impl SearchBox {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            focused: false,
            debouncer: Debouncer::new(debounce),
            gate: LatestOnly::new(),
        }
    }

    pub fn push_char(&mut self, ch: char, now: Instant) {
        self.query.push(ch);
        self.debouncer.push(self.query.clone(), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.debouncer.push(self.query.clone(), now);
        }
    }

    pub fn clear(&mut self, now: Instant) {
        if !self.query.is_empty() {
            self.query.clear();
            self.debouncer.push(String::new(), now);
        }
    }

    /// Issues a ticket for the settled query, if the quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<(TaskId, Option<String>)> {
        let query = self.debouncer.poll(now)?;
        Some((self.gate.issue(), non_empty(query)))
    }

    /// Issues a ticket for the current query right away (screen mount).
    pub fn search_now(&mut self) -> (TaskId, Option<String>) {
        self.debouncer.cancel();
        (self.gate.issue(), non_empty(self.query.clone()))
    }

    /// True if `ticket` belongs to the latest issued search.
    pub fn accept(&mut self, ticket: TaskId) -> bool {
        self.gate.complete(ticket)
    }

    pub fn is_searching(&self) -> bool {
        self.gate.in_flight() || self.debouncer.is_pending()
    }

    pub fn invalidate(&mut self) {
        self.debouncer.cancel();
        self.gate.invalidate();
    }
}

/// `Search: query▏` line used by the searchable list screens.
pub fn search_spans(search: &SearchBox, spinner_frame: usize) -> Vec<Span<'static>> {
    let label_style = if search.focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled("Search: ", label_style)];
    if search.query.is_empty() && !search.focused {
        spans.push(Span::styled("/ to search", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::raw(search.query.clone()));
    }
    if search.focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }
    if search.is_searching() {
        spans.push(Span::styled(
            format!("  {}", spinner(spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans
}

fn non_empty(query: String) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_search_is_accepted() {
        let start = Instant::now();
        let mut search = SearchBox::new(Duration::from_millis(300));

        search.push_char('a', start);
        let (first, query) = search.poll(start + Duration::from_millis(300)).unwrap();
        assert_eq!(query.as_deref(), Some("a"));

        search.push_char('b', start + Duration::from_millis(310));
        assert!(search.poll(start + Duration::from_millis(400)).is_none());
        let (second, query) = search.poll(start + Duration::from_millis(610)).unwrap();
        assert_eq!(query.as_deref(), Some("ab"));

        // "a" resolves after "ab"
        assert!(search.accept(second));
        assert!(!search.accept(first));
        assert!(!search.is_searching());
    }

    #[test]
    fn test_blank_query_searches_everything() {
        let now = Instant::now();
        let mut search = SearchBox::new(Duration::ZERO);
        search.push_char(' ', now);
        let (_, query) = search.poll(now).unwrap();
        assert_eq!(query, None);
    }
}
