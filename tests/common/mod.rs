#![allow(dead_code)]

use crowdfundr::api::ApiClient;
use crowdfundr::app::App;
use crowdfundr::config::Config;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Creates an ApiClient pointed at a wiremock server's /api root.
pub fn api_client(server: &MockServer) -> ApiClient {
    let config = Config {
        api_base_url: format!("{}/api", server.uri()),
    };
    ApiClient::new(&config)
}

/// Creates a fresh App (empty view state) backed by the mock server.
pub fn test_app(server: &MockServer) -> App {
    App::new(api_client(server))
}

/// Project body in the backend's wire format.
pub fn project_json(id: i64, name: &str, target: f64, raised: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "targetAmount": target,
        "raisedAmount": raised,
    })
}

/// Investment body in the backend's wire format.
pub fn investment_json(id: i64, project_id: i64, investor: &str, amount: f64) -> Value {
    json!({
        "id": id,
        "projectId": project_id,
        "investorName": investor,
        "amount": amount,
    })
}

/// Error body in the backend's wire format.
pub fn error_json(status: u16, message: &str) -> Value {
    json!({
        "message": message,
        "status": status,
        "timestamp": 1700000000000i64,
    })
}
