//! Wire-format and error-surfacing tests for the REST client.
//!
//! Tests cover:
//! - JSON field naming on both reads and writes (camelCase)
//! - Numeric submission of amounts
//! - Server error messages surfaced verbatim, with fallbacks

mod common;

use common::*;

use crowdfundr::models::{InvestmentUpdate, NewInvestment, NewProject, ProjectUpdate};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_projects_deserializes_the_collection() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project_json(1, "Eco Bottle", 5000.0, 750.0),
            project_json(2, "Solar Kit", 12000.0, 12500.0),
        ])))
        .mount(&server)
        .await;

    let api = api_client(&server);
    let projects = api.get_projects().await?;

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Eco Bottle");
    assert_eq!(projects[0].target_amount, 5000.0);
    assert_eq!(projects[0].raised_amount, 750.0);
    // Over-funded projects still cap at 100%
    assert_eq!(projects[1].progress(), 100.0);

    Ok(())
}

#[tokio::test]
async fn create_project_submits_numeric_target() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .and(body_json(json!({
            "name": "Eco Bottle",
            "description": "",
            "targetAmount": 5000.0,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(project_json(1, "Eco Bottle", 5000.0, 0.0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_client(&server);
    let created = api
        .create_project(&NewProject {
            name: "Eco Bottle".to_string(),
            description: String::new(),
            target_amount: 5000.0,
        })
        .await?;

    assert_eq!(created.id, 1);
    assert_eq!(created.raised_amount, 0.0);

    Ok(())
}

#[tokio::test]
async fn update_project_passes_the_held_raised_amount_through() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/projects/7"))
        .and(body_json(json!({
            "name": "Eco Bottle",
            "description": "Reusable bottle",
            "targetAmount": 6000.0,
            "raisedAmount": 750.0,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(project_json(7, "Eco Bottle", 6000.0, 750.0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_client(&server);
    api.update_project(
        7,
        &ProjectUpdate {
            name: "Eco Bottle".to_string(),
            description: "Reusable bottle".to_string(),
            target_amount: 6000.0,
            raised_amount: 750.0,
        },
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn investment_endpoints_use_the_nested_paths() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/investments/project/4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([investment_json(1, 4, "John Doe", 100.0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/investments/investor/Alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([
                investment_json(2, 4, "Alice", 50.0),
                investment_json(3, 9, "Alice", 75.0),
            ])),
        )
        .mount(&server)
        .await;

    let api = api_client(&server);

    let by_project = api.get_investments_by_project(4).await?;
    assert_eq!(by_project.len(), 1);
    assert_eq!(by_project[0].investor_name, "John Doe");

    let by_investor = api.get_investments_by_investor("Alice").await?;
    assert_eq!(by_investor.len(), 2);
    assert_eq!(by_investor[1].project_id, 9);

    Ok(())
}

#[tokio::test]
async fn create_investment_submits_numeric_amount() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/investments"))
        .and(body_json(json!({
            "projectId": 4,
            "investorName": "John Doe",
            "amount": 100.0,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(investment_json(10, 4, "John Doe", 100.0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_client(&server);
    let created = api
        .create_investment(&NewInvestment {
            project_id: 4,
            investor_name: "John Doe".to_string(),
            amount: 100.0,
        })
        .await?;

    assert_eq!(created.id, 10);
    assert_eq!(created.project_id, 4);

    Ok(())
}

#[tokio::test]
async fn update_investment_is_keyed_by_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/investments/10"))
        .and(body_json(json!({
            "projectId": 4,
            "investorName": "John Doe",
            "amount": 250.0,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(investment_json(10, 4, "John Doe", 250.0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_client(&server);
    let updated = api
        .update_investment(
            10,
            &InvestmentUpdate {
                project_id: 4,
                investor_name: "John Doe".to_string(),
                amount: 250.0,
            },
        )
        .await?;

    assert_eq!(updated.amount, 250.0);

    Ok(())
}

#[tokio::test]
async fn deletes_treat_empty_success_bodies_as_ok() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/investments/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_client(&server);
    api.delete_project(7).await?;
    api.delete_investment(3).await?;

    Ok(())
}

#[tokio::test]
async fn server_error_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(error_json(400, "Target amount must be positive")),
        )
        .mount(&server)
        .await;

    let api = api_client(&server);
    let err = api
        .create_project(&NewProject {
            name: "Eco Bottle".to_string(),
            description: String::new(),
            target_amount: -1.0,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Target amount must be positive");
}

#[tokio::test]
async fn error_without_message_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/99"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = api_client(&server);
    let err = api.get_project(99).await.unwrap_err();

    assert_eq!(err.to_string(), "Internal Server Error");
}
