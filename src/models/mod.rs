mod investment;
mod project;

pub use investment::{Investment, InvestmentUpdate, NewInvestment};
pub use project::{NewProject, Project, ProjectUpdate};
