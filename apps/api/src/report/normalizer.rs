//! Response Normalizer — the only place model text is parsed.
//!
//! Two strict stages:
//! 1. `unwrap_fenced` strips a code fence that wraps the *entire* reply.
//! 2. `normalize_report` / `normalize_departments` parse the unwrapped text and
//!    walk it against a fixed schema, failing on the first bad field.
//!
//! Numeric fields accept JSON numbers and strings holding a finite number
//! (`"1000"`, `" 2.5e3 "`). Anything non-finite is rejected at its field path,
//! including number literals too large for `f64`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::report::{
    AiCostBreakdown, AnalysisReport, DepartmentList, HumanCostBreakdown, RoiMetrics,
    StrategicAnalysis,
};

const FENCE: &str = "```";
const ROOT_PATH: &str = "$";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("model output is not valid JSON: {detail}")]
    MalformedOutput { detail: String },

    #[error("model output does not match schema at `{path}`: expected {expected}, found {found}")]
    SchemaMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },
}

impl NormalizeError {
    /// The offending field path, when the failure is a schema mismatch.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::SchemaMismatch { path, .. } => Some(path),
            Self::MalformedOutput { .. } => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 1: unwrap
// ────────────────────────────────────────────────────────────────────────────

/// Strips a leading fence (with any language tag) and one trailing fence.
///
/// Only a fence at the absolute start of the trimmed text is recognised; a
/// fence buried in prose is left alone.
pub fn unwrap_fenced(raw: &str) -> &str {
    let text = raw.trim();
    let Some(after_fence) = text.strip_prefix(FENCE) else {
        return text;
    };

    let tag_len = after_fence
        .find(|c: char| !is_language_tag_char(c))
        .unwrap_or(after_fence.len());
    let body = &after_fence[tag_len..];
    let body = body.strip_suffix(FENCE).unwrap_or(body);

    body.trim()
}

fn is_language_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 2: parse & validate
// ────────────────────────────────────────────────────────────────────────────

/// Converts raw model text into a validated [`AnalysisReport`].
pub fn normalize_report(raw: &str) -> Result<AnalysisReport, NormalizeError> {
    let value = parse_document(raw)?;
    let root = Fields::root(&value)?;

    let metrics = root.object("metrics")?;
    let human = root.object("human_cost_breakdown")?;
    let ai = root.object("ai_cost_breakdown")?;
    let strategy = root.object("strategic_analysis")?;

    Ok(AnalysisReport {
        metrics: RoiMetrics {
            total_human_annual_cost: metrics.number("total_human_annual_cost")?,
            total_ai_annual_cost: metrics.number("total_ai_annual_cost")?,
            net_annual_savings: metrics.number("net_annual_savings")?,
            break_even_months: metrics.number("break_even_months")?,
            productivity_multiplier: metrics.number("productivity_multiplier")?,
            department_equivalent: metrics.number("department_equivalent")?,
        },
        human_cost_breakdown: HumanCostBreakdown {
            salary_overhead: human.number("salary_overhead")?,
            benefits_insurance: human.number("benefits_insurance")?,
            recruiting_training_waste: human.number("recruiting_training_waste")?,
            error_rework_cost: human.number("error_rework_cost")?,
            tool_licensing_cost: human.number("tool_licensing_cost")?,
        },
        ai_cost_breakdown: AiCostBreakdown {
            llm_token_costs: ai.number("llm_token_costs")?,
            server_hosting_costs: ai.number("server_hosting_costs")?,
            implementation_fee: ai.number("implementation_fee")?,
            maintenance_cost: ai.number("maintenance_cost")?,
        },
        strategic_analysis: StrategicAnalysis {
            executive_summary: strategy.text("executive_summary")?,
            bottleneck_solution: strategy.text("bottleneck_solution")?,
            scalability_argument: strategy.text("scalability_argument")?,
        },
        confidence_score: root.text("confidence_score")?,
        market_data_found: root.text_map("market_data_found")?,
    })
}

/// Converts raw model text into a validated [`DepartmentList`].
/// The list length is not enforced.
pub fn normalize_departments(raw: &str) -> Result<DepartmentList, NormalizeError> {
    let value = parse_document(raw)?;
    let root = Fields::root(&value)?;
    Ok(DepartmentList {
        departments: root.text_list("departments")?,
    })
}

fn parse_document(raw: &str) -> Result<Value, NormalizeError> {
    serde_json::from_str(unwrap_fenced(raw)).map_err(|e| NormalizeError::MalformedOutput {
        detail: e.to_string(),
    })
}

/// A JSON object positioned at a dotted path, with typed field readers.
struct Fields<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn root(value: &'a Value) -> Result<Self, NormalizeError> {
        match value {
            Value::Object(map) => Ok(Self {
                path: ROOT_PATH.to_string(),
                map,
            }),
            other => Err(mismatch(ROOT_PATH.to_string(), "object", Some(other))),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path == ROOT_PATH {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn object(&self, key: &str) -> Result<Fields<'a>, NormalizeError> {
        let path = self.child_path(key);
        match self.map.get(key) {
            Some(Value::Object(map)) => Ok(Fields { path, map }),
            other => Err(mismatch(path, "object", other)),
        }
    }

    fn number(&self, key: &str) -> Result<f64, NormalizeError> {
        let path = self.child_path(key);
        let value = self.map.get(key);
        let parsed = match value {
            // Literals are kept verbatim, so an overflowing `1e400` reaches
            // here and parses to infinity instead of failing the whole document.
            Some(Value::Number(n)) => n.as_f64().or_else(|| n.to_string().parse::<f64>().ok()),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Ok(n),
            Some(_) => Err(NormalizeError::SchemaMismatch {
                path,
                expected: "finite number",
                found: "non-finite number".to_string(),
            }),
            None => Err(mismatch(path, "number", value)),
        }
    }

    fn text(&self, key: &str) -> Result<String, NormalizeError> {
        let path = self.child_path(key);
        match self.map.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            other => Err(mismatch(path, "string", other)),
        }
    }

    fn text_map(&self, key: &str) -> Result<BTreeMap<String, String>, NormalizeError> {
        let entries = self.object(key)?;
        entries
            .map
            .keys()
            .map(|k| entries.text(k).map(|v| (k.clone(), v)))
            .collect()
    }

    fn text_list(&self, key: &str) -> Result<Vec<String>, NormalizeError> {
        let path = self.child_path(key);
        let items = match self.map.get(key) {
            Some(Value::Array(items)) => items,
            other => return Err(mismatch(path, "array", other)),
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(mismatch(format!("{path}[{i}]"), "string", Some(other))),
            })
            .collect()
    }
}

fn mismatch(path: String, expected: &'static str, found: Option<&Value>) -> NormalizeError {
    NormalizeError::SchemaMismatch {
        path,
        expected,
        found: describe(found).to_string(),
    }
}

fn describe(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
