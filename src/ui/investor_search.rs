use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::Investment;
use crate::ui::centered_rect;

// Represents the state of the investor search screen. `results` stays
// None until a search has run; an empty Some is a searched-and-found-
// nothing state, which renders differently.
pub struct InvestorSearchState {
    pub query: String,
    pub results: Option<Vec<Investment>>,
    pub table_state: TableState,
    pub editing: bool,
    pub show_delete_confirmation: bool,
}

impl InvestorSearchState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            results: None,
            table_state: TableState::default(),
            editing: true,
            show_delete_confirmation: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_searched(&self) -> bool {
        self.results.is_some()
    }

    /// Replace the result set wholesale after a search settles.
    pub fn set_results(&mut self, results: Vec<Investment>) {
        if results.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
        self.results = Some(results);
        self.editing = false;
    }

    /// Prune one entry from the held results without re-querying.
    pub fn remove_result(&mut self, id: i64) {
        if let Some(results) = &mut self.results {
            results.retain(|inv| inv.id != id);
            if results.is_empty() {
                self.table_state.select(None);
            } else if let Some(i) = self.table_state.selected() {
                self.table_state.select(Some(i.min(results.len() - 1)));
            }
        }
    }

    pub fn next(&mut self) {
        let Some(results) = &self.results else { return };
        if results.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= results.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let Some(results) = &self.results else { return };
        if results.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    results.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_investment(&self) -> Option<&Investment> {
        let results = self.results.as_ref()?;
        self.table_state.selected().and_then(|i| results.get(i))
    }

    pub fn selected_investment_id(&self) -> Option<i64> {
        self.selected_investment().map(|inv| inv.id)
    }
}

pub enum SearchAction {
    Back,
    Search,
    EditInvestment(i64),   // Contains investment_id
    DeleteInvestment(i64), // Contains investment_id
}

pub fn render_investor_search<B: Backend>(frame: &mut Frame<B>, state: &mut InvestorSearchState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    // Query input box
    let input_text = if state.editing {
        format!("{}|", state.query)
    } else {
        state.query.clone()
    };
    let input_style = if state.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .title("Find Investments by Investor")
            .borders(Borders::ALL),
    );
    frame.render_widget(input, chunks[0]);

    render_results(frame, state, chunks[1]);

    // Create and render the buttons
    let buttons_text = if state.editing {
        "Type an investor name | <Enter> Search | <Esc> Stop typing | <Tab> Dashboard"
    } else if state.selected_investment().is_some() {
        "</> New Search | <E> Edit | <D> Delete | <Up/Down> Navigate | <Tab>/<Esc> Dashboard"
    } else {
        "</> New Search | <Tab>/<Esc> Dashboard"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);

    // Render delete confirmation popup if needed
    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

fn render_results<B: Backend>(frame: &mut Frame<B>, state: &mut InvestorSearchState, area: Rect) {
    let title = format!("Results for \"{}\"", state.query);

    let Some(results) = &state.results else {
        // No search has run yet. Distinct from an empty result set.
        let hint = Paragraph::new("Enter an investor name and press Enter to search.")
            .block(Block::default().title("Results").borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(hint, area);
        return;
    };

    if results.is_empty() {
        let empty = Paragraph::new("No investments found.")
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = ["Investor", "Project ID", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = results.iter().map(|inv| {
        let cells = vec![
            Cell::from(inv.investor_name.clone()),
            Cell::from(inv.project_id.to_string()),
            Cell::from(format!("${:.2}", inv.amount)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
        ]);

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this investment?"),
        Spans::from(""),
        Spans::from("The invested funds will be removed from the project."),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_input(state: &mut InvestorSearchState) -> Result<Option<SearchAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    state.show_delete_confirmation = false;
                    if let Some(id) = state.selected_investment_id() {
                        return Ok(Some(SearchAction::DeleteInvestment(id)));
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    state.show_delete_confirmation = false;
                }
                _ => {}
            }
            return Ok(None);
        }

        if state.editing {
            match key.code {
                KeyCode::Enter => {
                    // An empty term never issues a request
                    if !state.query.is_empty() {
                        state.editing = false;
                        return Ok(Some(SearchAction::Search));
                    }
                }
                KeyCode::Esc => {
                    state.editing = false;
                }
                KeyCode::Tab => return Ok(Some(SearchAction::Back)),
                KeyCode::Char(c) => state.query.push(c),
                KeyCode::Backspace => {
                    state.query.pop();
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Esc => return Ok(Some(SearchAction::Back)),
            KeyCode::Char('/') => {
                state.editing = true;
            }
            KeyCode::Char('e') => {
                if let Some(id) = state.selected_investment_id() {
                    return Ok(Some(SearchAction::EditInvestment(id)));
                }
            }
            KeyCode::Char('d') => {
                if state.selected_investment().is_some() {
                    state.show_delete_confirmation = true;
                }
            }
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn investment(id: i64) -> Investment {
        Investment {
            id,
            project_id: 1,
            investor_name: "John Doe".to_string(),
            amount: 100.0,
        }
    }

    #[test]
    fn unsearched_state_is_distinct_from_empty_results() {
        let mut state = InvestorSearchState::new();
        assert!(!state.has_searched());

        state.set_results(Vec::new());
        assert!(state.has_searched());
        assert!(state.results.as_ref().unwrap().is_empty());
    }

    #[test]
    fn remove_result_prunes_exactly_one_entry() {
        let mut state = InvestorSearchState::new();
        state.set_results(vec![investment(1), investment(2), investment(3)]);

        state.remove_result(2);

        let ids: Vec<i64> = state
            .results
            .as_ref()
            .unwrap()
            .iter()
            .map(|inv| inv.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn remove_result_keeps_selection_in_range() {
        let mut state = InvestorSearchState::new();
        state.set_results(vec![investment(1), investment(2)]);
        state.next();
        assert_eq!(state.table_state.selected(), Some(1));

        state.remove_result(2);
        assert_eq!(state.table_state.selected(), Some(0));

        state.remove_result(1);
        assert_eq!(state.table_state.selected(), None);
    }
}
