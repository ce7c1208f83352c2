use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crowdfundr::api::ApiClient;
use crowdfundr::app::{App, Screen};
use crowdfundr::config;
use crowdfundr::ui::{
    self,
    dashboard::{self, render_dashboard},
    investment_wizard::{self, render_investment_wizard},
    investor_search::{self, render_investor_search},
    project_wizard::{self, render_project_wizard},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::init()?;
    println!("Connecting to {}...", config.api_base_url());

    let api = ApiClient::new(&config);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state and load the initial project list
    let mut app = App::new(api);
    app.load_projects().await;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    println!("Thanks for using Crowdfundr!");

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app.screen {
                Screen::Dashboard => render_dashboard(f, &mut app.dashboard),
                Screen::ProjectWizard => {
                    if let Some(state) = &mut app.project_wizard {
                        render_project_wizard(f, state);
                    }
                }
                Screen::InvestmentWizard(_) => {
                    if let Some(state) = &mut app.investment_wizard {
                        render_investment_wizard(f, state);
                    }
                }
                Screen::InvestorSearch => render_investor_search(f, &mut app.search),
            }

            // A pending error blocks everything underneath it
            if let Some(message) = &app.error {
                ui::render_error_popup(f, message);
            }
        })?;

        // A shown error swallows the next key press
        if app.error.is_some() {
            if let Event::Key(_) = event::read()? {
                app.error = None;
            }
            continue;
        }

        // Handle input for current screen
        let should_quit = match app.screen {
            Screen::Dashboard => {
                match dashboard::handle_input(&mut app.dashboard)? {
                    Some(action) => app.handle_dashboard(action).await,
                    None => false,
                }
            }
            Screen::ProjectWizard => {
                if let Some(state) = &mut app.project_wizard {
                    if let Some(action) = project_wizard::handle_input(state)? {
                        app.handle_project_wizard(action).await;
                    }
                }
                false
            }
            Screen::InvestmentWizard(origin) => {
                if let Some(state) = &mut app.investment_wizard {
                    if let Some(action) = investment_wizard::handle_input(state)? {
                        app.handle_investment_wizard(origin, action).await;
                    }
                }
                false
            }
            Screen::InvestorSearch => {
                if let Some(action) = investor_search::handle_input(&mut app.search)? {
                    app.handle_search(action).await;
                }
                false
            }
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}
