//! Survey input describing the role or team being evaluated.
//!
//! Only `organization_industry`, `company_size`, `department` and `human_count`
//! are required. Every other answer falls back to a documented default when it
//! is absent or `null`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SENIORITY_LEVEL: &str = "Mid-Level Specialist";
pub const DEFAULT_TURNOVER_RATE: &str = "Moderate";
pub const DEFAULT_TRAINING_TIME: &str = "1 - 4 weeks";
pub const DEFAULT_MONTHLY_TASK_VOLUME: u32 = 2000;
pub const DEFAULT_AVG_TASK_DURATION_MINUTES: u32 = 20;
pub const DEFAULT_COVERAGE_HOURS: &str = "Standard Business Hours";
pub const DEFAULT_CONTEXT_SWITCHING: &str = "Occasionally";
pub const DEFAULT_ERROR_RATE: &str = "Low (1-3%)";
pub const DEFAULT_DECISION_COMPLEXITY: &str = "Balanced";
pub const DEFAULT_GROWTH_PROJECTION: &str = "Steady (10-20%)";
pub const DEFAULT_PRIMARY_BOTTLENECK: &str = "Hiring Speed";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyInput {
    pub organization_industry: String,
    pub company_size: String,
    pub department: String,
    pub human_count: u32,
    #[serde(default)]
    pub current_tools: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seniority_level: Option<String>,
    #[serde(default)]
    pub turnover_rate: Option<String>,
    #[serde(default)]
    pub training_time: Option<String>,
    #[serde(default)]
    pub monthly_task_volume: Option<u32>,
    #[serde(default)]
    pub avg_task_duration_minutes: Option<u32>,
    #[serde(default)]
    pub coverage_hours: Option<String>,
    #[serde(default)]
    pub context_switching: Option<String>,
    #[serde(default)]
    pub error_rate: Option<String>,
    #[serde(default)]
    pub decision_complexity: Option<String>,
    #[serde(default)]
    pub growth_projection: Option<String>,
    #[serde(default)]
    pub primary_bottleneck: Option<String>,
}

impl SurveyInput {
    /// Checks the required subset. Returns a client-facing message on failure.
    pub fn check_required(&self) -> Result<(), String> {
        let required = [
            ("organization_industry", &self.organization_industry),
            ("company_size", &self.company_size),
            ("department", &self.department),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("{name} cannot be empty"));
        }
        if self.human_count == 0 {
            return Err("human_count must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn current_tools(&self) -> &[String] {
        self.current_tools.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn seniority_level(&self) -> &str {
        self.seniority_level
            .as_deref()
            .unwrap_or(DEFAULT_SENIORITY_LEVEL)
    }

    pub fn turnover_rate(&self) -> &str {
        self.turnover_rate.as_deref().unwrap_or(DEFAULT_TURNOVER_RATE)
    }

    pub fn training_time(&self) -> &str {
        self.training_time.as_deref().unwrap_or(DEFAULT_TRAINING_TIME)
    }

    pub fn monthly_task_volume(&self) -> u32 {
        self.monthly_task_volume
            .unwrap_or(DEFAULT_MONTHLY_TASK_VOLUME)
    }

    pub fn avg_task_duration_minutes(&self) -> u32 {
        self.avg_task_duration_minutes
            .unwrap_or(DEFAULT_AVG_TASK_DURATION_MINUTES)
    }

    pub fn coverage_hours(&self) -> &str {
        self.coverage_hours.as_deref().unwrap_or(DEFAULT_COVERAGE_HOURS)
    }

    pub fn context_switching(&self) -> &str {
        self.context_switching
            .as_deref()
            .unwrap_or(DEFAULT_CONTEXT_SWITCHING)
    }

    pub fn error_rate(&self) -> &str {
        self.error_rate.as_deref().unwrap_or(DEFAULT_ERROR_RATE)
    }

    pub fn decision_complexity(&self) -> &str {
        self.decision_complexity
            .as_deref()
            .unwrap_or(DEFAULT_DECISION_COMPLEXITY)
    }

    pub fn growth_projection(&self) -> &str {
        self.growth_projection
            .as_deref()
            .unwrap_or(DEFAULT_GROWTH_PROJECTION)
    }

    pub fn primary_bottleneck(&self) -> &str {
        self.primary_bottleneck
            .as_deref()
            .unwrap_or(DEFAULT_PRIMARY_BOTTLENECK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_survey_uses_defaults() {
        let json = serde_json::json!({
            "organization_industry": "Healthcare / MedTech",
            "company_size": "Mid-Market (51-200)",
            "department": "Medical Billing/Coding",
            "human_count": 6
        });
        let survey: SurveyInput = serde_json::from_value(json).unwrap();

        assert!(survey.check_required().is_ok());
        assert_eq!(survey.seniority_level(), DEFAULT_SENIORITY_LEVEL);
        assert_eq!(survey.monthly_task_volume(), 2000);
        assert_eq!(survey.avg_task_duration_minutes(), 20);
        assert_eq!(survey.primary_bottleneck(), "Hiring Speed");
        assert!(survey.current_tools().is_empty());
        assert_eq!(survey.description(), "");
    }

    #[test]
    fn test_null_optional_fields_fall_back_to_defaults() {
        let json = serde_json::json!({
            "organization_industry": "Legal Services",
            "company_size": "Startup (1-10)",
            "department": "Contract Review",
            "human_count": 2,
            "turnover_rate": null,
            "current_tools": null,
            "monthly_task_volume": null
        });
        let survey: SurveyInput = serde_json::from_value(json).unwrap();

        assert_eq!(survey.turnover_rate(), DEFAULT_TURNOVER_RATE);
        assert!(survey.current_tools().is_empty());
        assert_eq!(survey.monthly_task_volume(), DEFAULT_MONTHLY_TASK_VOLUME);
    }

    #[test]
    fn test_supplied_answers_override_defaults() {
        let json = serde_json::json!({
            "organization_industry": "Finance / Fintech",
            "company_size": "Corporate / MNC (1000+)",
            "department": "KYC / Compliance",
            "human_count": 40,
            "error_rate": "High (5-10%)",
            "current_tools": ["Plaid", "Tableau"]
        });
        let survey: SurveyInput = serde_json::from_value(json).unwrap();

        assert_eq!(survey.error_rate(), "High (5-10%)");
        assert_eq!(survey.current_tools(), ["Plaid", "Tableau"]);
    }

    #[test]
    fn test_missing_required_field_fails_deserialization() {
        let json = serde_json::json!({
            "organization_industry": "Retail",
            "company_size": "Small Business (11-50)",
            "human_count": 3
        });
        assert!(serde_json::from_value::<SurveyInput>(json).is_err());
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        let survey = SurveyInput {
            organization_industry: "Retail".to_string(),
            company_size: "  ".to_string(),
            department: "Order Management".to_string(),
            human_count: 3,
            ..Default::default()
        };
        assert_eq!(
            survey.check_required().unwrap_err(),
            "company_size cannot be empty"
        );
    }

    #[test]
    fn test_zero_headcount_is_rejected() {
        let survey = SurveyInput {
            organization_industry: "Retail".to_string(),
            company_size: "Startup (1-10)".to_string(),
            department: "Order Management".to_string(),
            human_count: 0,
            ..Default::default()
        };
        assert!(survey.check_required().is_err());
    }
}
