use serde::{Deserialize, Serialize};

/// A single contribution by a named investor toward one project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub project_id: i64,
    pub investor_name: String,
    pub amount: f64,
}

/// Body for `POST /investments`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub project_id: i64,
    pub investor_name: String,
    pub amount: f64,
}

/// Body for `PUT /investments/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentUpdate {
    pub project_id: i64,
    pub investor_name: String,
    pub amount: f64,
}
