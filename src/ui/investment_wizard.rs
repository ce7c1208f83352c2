use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Investment;

pub enum InvestmentWizardAction {
    Cancel,
    Save(InvestmentForm),
}

#[derive(Debug, Clone)]
pub struct InvestmentForm {
    pub id: Option<i64>,
    pub project_id: i64,
    pub investor_name: String,
    pub amount: f64,
}

#[derive(Clone, PartialEq, Copy)]
pub enum InvestmentField {
    InvestorName,
    Amount,
}

/// Form state for both investing in a project and editing an existing
/// investment. A `None` id means a new investment.
pub struct InvestmentWizardState {
    pub id: Option<i64>,
    pub project_id: i64,
    pub project_name: Option<String>,
    pub investor_name: String,
    pub amount: String,
    pub current_field: InvestmentField,
    pub editing: bool,
}

impl InvestmentWizardState {
    pub fn new(project_id: i64, project_name: String) -> Self {
        Self {
            id: None,
            project_id,
            project_name: Some(project_name),
            investor_name: String::new(),
            amount: String::new(),
            current_field: InvestmentField::InvestorName,
            editing: false,
        }
    }

    pub fn from_existing(investment: Investment) -> Self {
        Self {
            id: Some(investment.id),
            project_id: investment.project_id,
            project_name: None,
            investor_name: investment.investor_name,
            amount: format_amount(investment.amount),
            current_field: InvestmentField::InvestorName,
            editing: false,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            InvestmentField::InvestorName => InvestmentField::Amount,
            InvestmentField::Amount => InvestmentField::InvestorName,
        };
    }

    pub fn previous_field(&mut self) {
        self.next_field();
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let numeric = self.current_field == InvestmentField::Amount;
        let field_value = match self.current_field {
            InvestmentField::InvestorName => &mut self.investor_name,
            InvestmentField::Amount => &mut self.amount,
        };

        match key {
            KeyCode::Char(c) => {
                if !numeric || c.is_ascii_digit() || c == '.' {
                    field_value.push(c);
                }
            }
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    /// Build the submittable form, or None while the investor name or
    /// amount is missing or the amount does not parse.
    pub fn form(&self) -> Option<InvestmentForm> {
        if self.investor_name.is_empty() || self.amount.is_empty() {
            return None;
        }
        let amount = self.amount.parse::<f64>().ok()?;

        Some(InvestmentForm {
            id: self.id,
            project_id: self.project_id,
            investor_name: self.investor_name.clone(),
            amount,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.form().is_some()
    }
}

fn format_amount(amount: f64) -> String {
    if amount == amount.trunc() {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

pub fn render_investment_wizard<B: Backend>(f: &mut Frame<B>, state: &mut InvestmentWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = match (&state.id, &state.project_name) {
        (None, Some(name)) => format!("Invest in {}", name),
        (None, None) => "New Investment".to_string(),
        (Some(_), _) => "Edit Investment".to_string(),
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let form_area = chunks[1];
    render_form(f, state, form_area);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.is_valid() {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save investment | Esc - Cancel"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | Esc - Cancel (name and amount required)"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut InvestmentWizardState, area: Rect) {
    let field_names = ["Investor Name", "Amount ($)"];

    let field_values = [&state.investor_name, &state.amount];

    let items: Vec<ListItem> = field_names
        .iter()
        .zip(field_values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == state.current_field as usize && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{}|", value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if i == state.current_field as usize {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.as_str()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Investment Details"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut InvestmentWizardState) -> Result<Option<InvestmentWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(InvestmentWizardAction::Cancel));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if let Some(form) = state.form() {
                    return Ok(Some(InvestmentWizardAction::Save(form)));
                }
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_never_produce_a_form() {
        let state = InvestmentWizardState::new(3, "Eco Bottle".to_string());
        assert!(state.form().is_none());

        let mut named = InvestmentWizardState::new(3, "Eco Bottle".to_string());
        named.investor_name = "John Doe".to_string();
        assert!(named.form().is_none());
    }

    #[test]
    fn amount_is_submitted_as_a_number() {
        let mut state = InvestmentWizardState::new(3, "Eco Bottle".to_string());
        state.investor_name = "John Doe".to_string();
        state.amount = "100".to_string();

        let form = state.form().expect("form should be valid");
        assert_eq!(form.project_id, 3);
        assert_eq!(form.amount, 100.0);
        assert!(form.id.is_none());
    }

    #[test]
    fn editing_an_existing_investment_keeps_its_ids() {
        let state = InvestmentWizardState::from_existing(Investment {
            id: 11,
            project_id: 3,
            investor_name: "John Doe".to_string(),
            amount: 250.5,
        });

        let form = state.form().expect("form should be valid");
        assert_eq!(form.id, Some(11));
        assert_eq!(form.project_id, 3);
        assert_eq!(state.amount, "250.5");
    }
}
