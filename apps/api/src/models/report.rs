use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Headline ROI figures for the evaluated team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    pub total_human_annual_cost: f64,
    pub total_ai_annual_cost: f64,
    pub net_annual_savings: f64,
    pub break_even_months: f64,
    pub productivity_multiplier: f64,
    pub department_equivalent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanCostBreakdown {
    pub salary_overhead: f64,
    pub benefits_insurance: f64,
    pub recruiting_training_waste: f64,
    pub error_rework_cost: f64,
    pub tool_licensing_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiCostBreakdown {
    pub llm_token_costs: f64,
    pub server_hosting_costs: f64,
    pub implementation_fee: f64,
    pub maintenance_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicAnalysis {
    pub executive_summary: String,
    pub bottleneck_solution: String,
    pub scalability_argument: String,
}

/// A validated analysis report.
///
/// Instances are only produced by `report::normalizer`, so every numeric field
/// is finite and every text field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metrics: RoiMetrics,
    pub human_cost_breakdown: HumanCostBreakdown,
    pub ai_cost_breakdown: AiCostBreakdown,
    pub strategic_analysis: StrategicAnalysis,
    pub confidence_score: String,
    pub market_data_found: BTreeMap<String, String>,
}

/// Candidate department names derived from an industry string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentList {
    pub departments: Vec<String>,
}
