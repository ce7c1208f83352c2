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

use crate::models::Project;

pub enum ProjectWizardAction {
    Cancel,
    Save(ProjectForm),
}

/// Validated form contents, produced only when every required field holds
/// a usable value.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub target_amount: f64,
    pub raised_amount: f64,
}

#[derive(Clone, PartialEq, Copy)]
pub enum ProjectField {
    Name,
    TargetAmount,
    Description,
}

pub struct ProjectWizardState {
    pub id: Option<i64>,
    pub name: String,
    pub target_amount: String,
    pub description: String,
    pub raised_amount: f64,
    pub current_field: ProjectField,
    pub editing: bool,
}

impl ProjectWizardState {
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            target_amount: String::new(),
            description: String::new(),
            raised_amount: 0.0,
            current_field: ProjectField::Name,
            editing: false,
        }
    }

    pub fn from_existing(project: Project) -> Self {
        Self {
            id: Some(project.id),
            name: project.name,
            target_amount: format_amount(project.target_amount),
            description: project.description,
            raised_amount: project.raised_amount,
            current_field: ProjectField::Name,
            editing: false,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::TargetAmount,
            ProjectField::TargetAmount => ProjectField::Description,
            ProjectField::Description => ProjectField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::Description,
            ProjectField::TargetAmount => ProjectField::Name,
            ProjectField::Description => ProjectField::TargetAmount,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let numeric = self.current_field == ProjectField::TargetAmount;
        let field_value = match self.current_field {
            ProjectField::Name => &mut self.name,
            ProjectField::TargetAmount => &mut self.target_amount,
            ProjectField::Description => &mut self.description,
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

    /// Build the submittable form, or None while required fields are
    /// missing or the target amount does not parse. A None here means the
    /// save key does nothing and no request goes out.
    pub fn form(&self) -> Option<ProjectForm> {
        if self.name.is_empty() || self.target_amount.is_empty() {
            return None;
        }
        let target_amount = self.target_amount.parse::<f64>().ok()?;

        Some(ProjectForm {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            target_amount,
            raised_amount: self.raised_amount,
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

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    // Title with appropriate text based on whether we're editing or creating
    let title_text = if state.id.is_none() {
        "Create Project"
    } else {
        "Edit Project"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Form fields
    let form_area = chunks[1];
    render_form(f, state, form_area);

    // Help text
    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.is_valid() {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | Esc - Cancel (name and target required)"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState, area: Rect) {
    let field_names = ["Name", "Target Amount ($)", "Description"];

    let field_values = [&state.name, &state.target_amount, &state.description];

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
        .block(Block::default().borders(Borders::ALL).title("Project Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(ProjectWizardAction::Cancel));
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
                    return Ok(Some(ProjectWizardAction::Save(form)));
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
    fn empty_name_never_produces_a_form() {
        let mut state = ProjectWizardState::new();
        state.target_amount = "5000".to_string();
        assert!(state.form().is_none());
    }

    #[test]
    fn empty_target_never_produces_a_form() {
        let mut state = ProjectWizardState::new();
        state.name = "Eco Bottle".to_string();
        assert!(state.form().is_none());
    }

    #[test]
    fn unparseable_target_never_produces_a_form() {
        let mut state = ProjectWizardState::new();
        state.name = "Eco Bottle".to_string();
        state.target_amount = "5.0.0".to_string();
        assert!(state.form().is_none());
    }

    #[test]
    fn target_is_submitted_as_a_number() {
        let mut state = ProjectWizardState::new();
        state.name = "Eco Bottle".to_string();
        state.target_amount = "5000".to_string();

        let form = state.form().expect("form should be valid");
        assert_eq!(form.name, "Eco Bottle");
        assert_eq!(form.target_amount, 5000.0);
        assert_eq!(form.description, "");
        assert!(form.id.is_none());
    }

    #[test]
    fn numeric_field_rejects_letters() {
        let mut state = ProjectWizardState::new();
        state.current_field = ProjectField::TargetAmount;
        state.editing = true;
        for key in [
            KeyCode::Char('5'),
            KeyCode::Char('x'),
            KeyCode::Char('0'),
            KeyCode::Char('.'),
            KeyCode::Char('5'),
        ] {
            state.edit_current_field(key);
        }
        assert_eq!(state.target_amount, "50.5");
    }

    #[test]
    fn editing_keeps_the_raised_amount_for_resubmission() {
        let state = ProjectWizardState::from_existing(Project {
            id: 7,
            name: "Eco Bottle".to_string(),
            description: "Reusable bottle".to_string(),
            target_amount: 5000.0,
            raised_amount: 750.0,
        });

        let form = state.form().expect("form should be valid");
        assert_eq!(form.id, Some(7));
        assert_eq!(form.raised_amount, 750.0);
        assert_eq!(state.target_amount, "5000");
    }
}
