use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Investment, Project};
use crate::ui::centered_rect;

/// Which panel of the dashboard receives key input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Projects,
    Investments,
}

/// Inline view of one project's investments
pub struct DrillDown {
    pub project_id: i64,
    pub project_name: String,
    pub investments: Vec<Investment>,
    pub list_state: ListState,
}

// Represents the state of the projects dashboard screen
pub struct DashboardState {
    pub projects: Vec<Project>,
    pub list_state: ListState,
    pub loading: bool,
    pub focus: Focus,
    pub drill_down: Option<DrillDown>,
    pub show_delete_confirmation: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            list_state: ListState::default(),
            loading: true,
            focus: Focus::Projects,
            drill_down: None,
            show_delete_confirmation: false,
        }
    }

    /// Replace the project list wholesale, keeping the selection in range.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        if self.projects.is_empty() {
            self.list_state.select(None);
        } else {
            let i = self
                .list_state
                .selected()
                .unwrap_or(0)
                .min(self.projects.len() - 1);
            self.list_state.select(Some(i));
        }
    }

    pub fn open_drill_down(&mut self, project_id: i64, investments: Vec<Investment>) {
        let project_name = self
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        let mut list_state = ListState::default();
        if !investments.is_empty() {
            list_state.select(Some(0));
        }

        self.drill_down = Some(DrillDown {
            project_id,
            project_name,
            investments,
            list_state,
        });
        self.focus = Focus::Investments;
    }

    /// Replace the drill-down investment list wholesale.
    pub fn set_drill_down_investments(&mut self, investments: Vec<Investment>) {
        if let Some(drill) = &mut self.drill_down {
            drill.investments = investments;
            if drill.investments.is_empty() {
                drill.list_state.select(None);
            } else {
                let i = drill
                    .list_state
                    .selected()
                    .unwrap_or(0)
                    .min(drill.investments.len() - 1);
                drill.list_state.select(Some(i));
            }
        }
    }

    pub fn close_drill_down(&mut self) {
        self.drill_down = None;
        self.focus = Focus::Projects;
    }

    pub fn drilled_project_id(&self) -> Option<i64> {
        self.drill_down.as_ref().map(|d| d.project_id)
    }

    pub fn next(&mut self) {
        match self.focus {
            Focus::Projects => advance(&mut self.list_state, self.projects.len()),
            Focus::Investments => {
                if let Some(drill) = &mut self.drill_down {
                    advance(&mut drill.list_state, drill.investments.len());
                }
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::Projects => retreat(&mut self.list_state, self.projects.len()),
            Focus::Investments => {
                if let Some(drill) = &mut self.drill_down {
                    retreat(&mut drill.list_state, drill.investments.len());
                }
            }
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<i64> {
        self.selected_project().map(|p| p.id)
    }

    pub fn selected_investment(&self) -> Option<&Investment> {
        let drill = self.drill_down.as_ref()?;
        drill
            .list_state
            .selected()
            .and_then(|i| drill.investments.get(i))
    }

    pub fn selected_investment_id(&self) -> Option<i64> {
        self.selected_investment().map(|inv| inv.id)
    }
}

fn advance(list_state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }

    let i = match list_state.selected() {
        Some(i) => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        None => 0,
    };
    list_state.select(Some(i));
}

fn retreat(list_state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }

    let i = match list_state.selected() {
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    list_state.select(Some(i));
}

pub enum DashboardAction {
    Quit,
    SwitchView,
    NewProject,
    EditProject(i64),      // Contains project_id
    DeleteProject(i64),    // Contains project_id
    Invest(i64, String),   // Contains project_id and project name
    ViewInvestments(i64),  // Contains project_id
    CloseInvestments,
    EditInvestment(i64),   // Contains investment_id
    DeleteInvestment(i64), // Contains investment_id
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    if state.loading {
        let loading = Paragraph::new("Loading projects...")
            .block(Block::default().title("Projects").borders(Borders::ALL));
        frame.render_widget(loading, chunks[0]);
    } else if state.drill_down.is_some() {
        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
            .split(chunks[0]);
        render_project_list(frame, state, panels[0]);
        render_drill_down(frame, state, panels[1]);
    } else {
        render_project_list(frame, state, chunks[0]);
    }

    render_progress_gauge(frame, state, chunks[1]);

    // Create and render the buttons
    let buttons_text = match state.focus {
        Focus::Projects if state.selected_project().is_some() => {
            "<N> New Project | <E> Edit | <D> Delete | <I> Invest | <Enter> View Investments | <Tab> Investor Search | <Q> Quit"
        }
        Focus::Projects => "<N> New Project | <Tab> Investor Search | <Q> Quit",
        Focus::Investments => {
            "<E> Edit Investment | <D> Delete Investment | <Left> Projects | <Esc> Close | <Q> Quit"
        }
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);

    // Render delete confirmation popup if needed
    if state.show_delete_confirmation {
        render_delete_confirmation(frame, state.focus, size);
    }
}

fn render_project_list<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState, area: Rect) {
    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            let amounts = format!(
                "${:.2} raised of ${:.2} ({:.0}%)",
                project.raised_amount,
                project.target_amount,
                project.progress()
            );

            ListItem::new(Spans::from(vec![
                Span::styled(
                    project.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::raw(amounts),
            ]))
        })
        .collect();

    let highlight = if state.focus == Focus::Projects {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(highlight);

    frame.render_stateful_widget(projects_list, area, &mut state.list_state);
}

fn render_drill_down<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState, area: Rect) {
    let focused = state.focus == Focus::Investments;
    let Some(drill) = &mut state.drill_down else {
        return;
    };

    let title = format!("Investments for {}", drill.project_name);

    if drill.investments.is_empty() {
        let empty = Paragraph::new("No investments yet.")
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = drill
        .investments
        .iter()
        .map(|inv| {
            ListItem::new(Spans::from(vec![
                Span::styled(
                    inv.investor_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(": ${:.2}", inv.amount)),
            ]))
        })
        .collect();

    let highlight = if focused {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let investments_list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(highlight);

    frame.render_stateful_widget(investments_list, area, &mut drill.list_state);
}

fn render_progress_gauge<B: Backend>(frame: &mut Frame<B>, state: &DashboardState, area: Rect) {
    let (title, ratio, label) = match state.selected_project() {
        Some(project) => (
            format!("Funding progress: {}", project.name),
            project.progress() / 100.0,
            format!("{:.1}%", project.progress()),
        ),
        None => ("Funding progress".to_string(), 0.0, "0.0%".to_string()),
    };

    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(Span::raw(label));

    frame.render_widget(gauge, area);
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, focus: Focus, size: Rect) {
    let (subject, warning) = match focus {
        Focus::Projects => ("project", "All of its investments will also be deleted."),
        Focus::Investments => (
            "investment",
            "The invested funds will be removed from the project.",
        ),
    };

    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(format!("Are you sure you want to delete this {}?", subject)),
        Spans::from(""),
        Spans::from(warning),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    state.show_delete_confirmation = false;
                    match state.focus {
                        Focus::Projects => {
                            if let Some(id) = state.selected_project_id() {
                                return Ok(Some(DashboardAction::DeleteProject(id)));
                            }
                        }
                        Focus::Investments => {
                            if let Some(id) = state.selected_investment_id() {
                                return Ok(Some(DashboardAction::DeleteInvestment(id)));
                            }
                        }
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    state.show_delete_confirmation = false;
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Some(DashboardAction::Quit)),
            KeyCode::Tab => return Ok(Some(DashboardAction::SwitchView)),
            KeyCode::Char('n') => return Ok(Some(DashboardAction::NewProject)),
            KeyCode::Char('e') => match state.focus {
                Focus::Projects => {
                    if let Some(id) = state.selected_project_id() {
                        return Ok(Some(DashboardAction::EditProject(id)));
                    }
                }
                Focus::Investments => {
                    if let Some(id) = state.selected_investment_id() {
                        return Ok(Some(DashboardAction::EditInvestment(id)));
                    }
                }
            },
            KeyCode::Char('d') => {
                let has_selection = match state.focus {
                    Focus::Projects => state.selected_project().is_some(),
                    Focus::Investments => state.selected_investment().is_some(),
                };
                if has_selection {
                    state.show_delete_confirmation = true;
                }
            }
            KeyCode::Char('i') if state.focus == Focus::Projects => {
                if let Some(project) = state.selected_project() {
                    return Ok(Some(DashboardAction::Invest(
                        project.id,
                        project.name.clone(),
                    )));
                }
            }
            KeyCode::Enter if state.focus == Focus::Projects => {
                if let Some(id) = state.selected_project_id() {
                    return Ok(Some(DashboardAction::ViewInvestments(id)));
                }
            }
            KeyCode::Esc => {
                if state.drill_down.is_some() {
                    return Ok(Some(DashboardAction::CloseInvestments));
                }
            }
            KeyCode::Left if state.drill_down.is_some() => {
                state.focus = Focus::Projects;
            }
            KeyCode::Right if state.drill_down.is_some() => {
                state.focus = Focus::Investments;
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

    fn project(id: i64, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            description: String::new(),
            target_amount: 1000.0,
            raised_amount: 0.0,
        }
    }

    fn investment(id: i64, project_id: i64) -> Investment {
        Investment {
            id,
            project_id,
            investor_name: "John Doe".to_string(),
            amount: 100.0,
        }
    }

    #[test]
    fn set_projects_keeps_the_selection_in_range() {
        let mut state = DashboardState::new();
        state.set_projects(vec![project(1, "A"), project(2, "B"), project(3, "C")]);
        state.next();
        state.next();
        assert_eq!(state.selected_project_id(), Some(3));

        state.set_projects(vec![project(1, "A")]);
        assert_eq!(state.selected_project_id(), Some(1));

        state.set_projects(Vec::new());
        assert_eq!(state.selected_project_id(), None);
    }

    #[test]
    fn navigation_wraps_around() {
        let mut state = DashboardState::new();
        state.set_projects(vec![project(1, "A"), project(2, "B")]);
        assert_eq!(state.selected_project_id(), Some(1));

        state.previous();
        assert_eq!(state.selected_project_id(), Some(2));
        state.next();
        assert_eq!(state.selected_project_id(), Some(1));
    }

    #[test]
    fn drill_down_lifecycle_moves_focus() {
        let mut state = DashboardState::new();
        state.set_projects(vec![project(1, "A")]);

        state.open_drill_down(1, vec![investment(5, 1)]);
        assert_eq!(state.focus, Focus::Investments);
        assert_eq!(state.drilled_project_id(), Some(1));
        assert_eq!(state.selected_investment_id(), Some(5));

        state.close_drill_down();
        assert!(state.drill_down.is_none());
        assert_eq!(state.focus, Focus::Projects);
        assert_eq!(state.selected_investment_id(), None);
    }
}
