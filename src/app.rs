use crate::api::ApiClient;
use crate::models::{InvestmentUpdate, NewInvestment, NewProject, ProjectUpdate};
use crate::ui::dashboard::{DashboardAction, DashboardState};
use crate::ui::investment_wizard::{InvestmentForm, InvestmentWizardAction, InvestmentWizardState};
use crate::ui::investor_search::{InvestorSearchState, SearchAction};
use crate::ui::project_wizard::{ProjectForm, ProjectWizardAction, ProjectWizardState};

// Represents the current screen in the app
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Dashboard,
    ProjectWizard,
    InvestmentWizard(WizardOrigin),
    InvestorSearch,
}

/// Where an investment wizard was opened from, so saving returns there
/// and triggers that view's refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WizardOrigin {
    Dashboard,
    Search,
}

impl WizardOrigin {
    fn screen(self) -> Screen {
        match self {
            WizardOrigin::Dashboard => Screen::Dashboard,
            WizardOrigin::Search => Screen::InvestorSearch,
        }
    }
}

/// The view-state controller. Owns every piece of client-side state; each
/// handler performs at most one mutating network call followed by the
/// refreshes that keep the server authoritative for aggregates.
pub struct App {
    api: ApiClient,
    pub screen: Screen,
    pub dashboard: DashboardState,
    pub search: InvestorSearchState,
    pub project_wizard: Option<ProjectWizardState>,
    pub investment_wizard: Option<InvestmentWizardState>,
    pub error: Option<String>,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            screen: Screen::Dashboard,
            dashboard: DashboardState::new(),
            search: InvestorSearchState::new(),
            project_wizard: None,
            investment_wizard: None,
            error: None,
        }
    }

    /// Replace the project list from the server. Failures are logged and
    /// leave the current list untouched (empty at startup), so a dead
    /// backend degrades to an empty dashboard instead of a notification.
    pub async fn load_projects(&mut self) {
        match self.api.get_projects().await {
            Ok(projects) => self.dashboard.set_projects(projects),
            Err(err) => log::error!("failed to load projects: {err}"),
        }
        self.dashboard.loading = false;
    }

    pub async fn handle_dashboard(&mut self, action: DashboardAction) -> bool {
        match action {
            DashboardAction::Quit => return true,
            DashboardAction::SwitchView => {
                self.screen = Screen::InvestorSearch;
            }
            DashboardAction::NewProject => {
                self.project_wizard = Some(ProjectWizardState::new());
                self.screen = Screen::ProjectWizard;
            }
            DashboardAction::EditProject(project_id) => {
                // Seed the edit buffer from a fresh read
                match self.api.get_project(project_id).await {
                    Ok(project) => {
                        self.project_wizard = Some(ProjectWizardState::from_existing(project));
                        self.screen = Screen::ProjectWizard;
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            DashboardAction::DeleteProject(project_id) => {
                self.delete_project(project_id).await;
            }
            DashboardAction::Invest(project_id, project_name) => {
                self.investment_wizard = Some(InvestmentWizardState::new(project_id, project_name));
                self.screen = Screen::InvestmentWizard(WizardOrigin::Dashboard);
            }
            DashboardAction::ViewInvestments(project_id) => {
                self.open_drill_down(project_id).await;
            }
            DashboardAction::CloseInvestments => {
                self.dashboard.close_drill_down();
            }
            DashboardAction::EditInvestment(investment_id) => {
                self.open_investment_editor(investment_id, WizardOrigin::Dashboard)
                    .await;
            }
            DashboardAction::DeleteInvestment(investment_id) => {
                self.delete_investment(investment_id, WizardOrigin::Dashboard)
                    .await;
            }
        }

        false
    }

    pub async fn handle_project_wizard(&mut self, action: ProjectWizardAction) {
        match action {
            ProjectWizardAction::Cancel => {
                self.project_wizard = None;
                self.screen = Screen::Dashboard;
            }
            ProjectWizardAction::Save(form) => self.save_project(form).await,
        }
    }

    pub async fn handle_investment_wizard(
        &mut self,
        origin: WizardOrigin,
        action: InvestmentWizardAction,
    ) {
        match action {
            InvestmentWizardAction::Cancel => {
                self.investment_wizard = None;
                self.screen = origin.screen();
            }
            InvestmentWizardAction::Save(form) => self.save_investment(origin, form).await,
        }
    }

    pub async fn handle_search(&mut self, action: SearchAction) {
        match action {
            SearchAction::Back => {
                self.screen = Screen::Dashboard;
            }
            SearchAction::Search => self.run_search().await,
            SearchAction::EditInvestment(investment_id) => {
                self.open_investment_editor(investment_id, WizardOrigin::Search)
                    .await;
            }
            SearchAction::DeleteInvestment(investment_id) => {
                self.delete_investment(investment_id, WizardOrigin::Search)
                    .await;
            }
        }
    }

    /// Fetch one project's investments and record it as the drill-down
    /// selection. On failure the previous selection stays as it was.
    async fn open_drill_down(&mut self, project_id: i64) {
        match self.api.get_investments_by_project(project_id).await {
            Ok(investments) => self.dashboard.open_drill_down(project_id, investments),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Re-fetch the drill-down list for whichever project is selected,
    /// if any. Used after mutations that change investment totals.
    async fn refresh_drill_down(&mut self) {
        let Some(project_id) = self.dashboard.drilled_project_id() else {
            return;
        };
        match self.api.get_investments_by_project(project_id).await {
            Ok(investments) => self.dashboard.set_drill_down_investments(investments),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    async fn save_project(&mut self, form: ProjectForm) {
        let result = match form.id {
            None => {
                let new = NewProject {
                    name: form.name,
                    description: form.description,
                    target_amount: form.target_amount,
                };
                self.api.create_project(&new).await.map(|_| ())
            }
            Some(id) => {
                // The raised amount rides along unchanged; the server's
                // aggregate wins again on the reload below.
                let update = ProjectUpdate {
                    name: form.name,
                    description: form.description,
                    target_amount: form.target_amount,
                    raised_amount: form.raised_amount,
                };
                self.api.update_project(id, &update).await.map(|_| ())
            }
        };

        match result {
            Ok(()) => {
                self.project_wizard = None;
                self.screen = Screen::Dashboard;
                self.load_projects().await;
            }
            // The wizard stays open so the input is not lost
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    async fn save_investment(&mut self, origin: WizardOrigin, form: InvestmentForm) {
        match form.id {
            None => {
                let new = NewInvestment {
                    project_id: form.project_id,
                    investor_name: form.investor_name,
                    amount: form.amount,
                };
                match self.api.create_investment(&new).await {
                    Ok(created) => {
                        self.investment_wizard = None;
                        self.screen = Screen::Dashboard;
                        self.load_projects().await;
                        if self.dashboard.drilled_project_id() == Some(created.project_id) {
                            self.refresh_drill_down().await;
                        }
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            Some(id) => {
                let update = InvestmentUpdate {
                    project_id: form.project_id,
                    investor_name: form.investor_name,
                    amount: form.amount,
                };
                match self.api.update_investment(id, &update).await {
                    Ok(_) => {
                        self.investment_wizard = None;
                        self.screen = origin.screen();
                        self.load_projects().await;
                        self.refresh_drill_down().await;
                        if origin == WizardOrigin::Search {
                            self.run_search().await;
                        }
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
        }
    }

    async fn delete_project(&mut self, project_id: i64) {
        match self.api.delete_project(project_id).await {
            Ok(()) => {
                // Clear the drill-down before the list refresh settles
                if self.dashboard.drilled_project_id() == Some(project_id) {
                    self.dashboard.close_drill_down();
                }
                self.load_projects().await;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    async fn delete_investment(&mut self, investment_id: i64, origin: WizardOrigin) {
        match self.api.delete_investment(investment_id).await {
            Ok(()) => {
                self.load_projects().await;
                self.refresh_drill_down().await;
                if origin == WizardOrigin::Search {
                    // The search view prunes its own copy instead of
                    // issuing another query
                    self.search.remove_result(investment_id);
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    async fn open_investment_editor(&mut self, investment_id: i64, origin: WizardOrigin) {
        match self.api.get_investment(investment_id).await {
            Ok(investment) => {
                self.investment_wizard = Some(InvestmentWizardState::from_existing(investment));
                self.screen = Screen::InvestmentWizard(origin);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Issue the investor query the search view currently holds. A failed
    /// search degrades to an empty, searched result set.
    async fn run_search(&mut self) {
        let term = self.search.query().to_string();
        if term.is_empty() {
            return;
        }
        match self.api.get_investments_by_investor(&term).await {
            Ok(results) => self.search.set_results(results),
            Err(err) => {
                log::error!("investor search for {term:?} failed: {err}");
                self.search.set_results(Vec::new());
            }
        }
    }
}
