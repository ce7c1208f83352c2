use serde::{Deserialize, Serialize};

/// A fundraising campaign. `raised_amount` is the server-maintained
/// aggregate of the project's investments and is never computed locally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_amount: f64,
    #[serde(default)]
    pub raised_amount: f64,
}

impl Project {
    /// Funding progress as a percentage, clamped to 0..=100.
    /// A non-positive target reports 0% rather than dividing.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.raised_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }
}

/// Body for `POST /projects`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub target_amount: f64,
}

/// Body for `PUT /projects/{id}`. The raised amount is passed through
/// from whatever the edit buffer currently holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: String,
    pub description: String,
    pub target_amount: f64,
    pub raised_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(target_amount: f64, raised_amount: f64) -> Project {
        Project {
            id: 1,
            name: "Eco Bottle".to_string(),
            description: String::new(),
            target_amount,
            raised_amount,
        }
    }

    #[test]
    fn progress_is_zero_when_nothing_raised() {
        assert_eq!(project(5000.0, 0.0).progress(), 0.0);
    }

    #[test]
    fn progress_is_proportional_below_target() {
        assert_eq!(project(5000.0, 1250.0).progress(), 25.0);
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        assert_eq!(project(5000.0, 7500.0).progress(), 100.0);
    }

    #[test]
    fn zero_target_reports_zero_instead_of_nan() {
        let pct = project(0.0, 100.0).progress();
        assert_eq!(pct, 0.0);
        assert!(pct.is_finite());
    }

    #[test]
    fn negative_target_reports_zero() {
        assert_eq!(project(-10.0, 100.0).progress(), 0.0);
    }
}
