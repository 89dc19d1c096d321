//! Prompt Builder — renders prompt text from typed input. No business math here.
//!
//! Every caller-supplied string passes through [`sanitize_field`] before it is
//! embedded, so user text cannot close a quoted value, open a code fence, fake a
//! `--- SECTION ---` delimiter, or inject a template placeholder.

use crate::llm_client::MODEL;
use crate::models::survey::SurveyInput;
use crate::report::prompts::{DEPARTMENTS_PROMPT_TEMPLATE, GENFOX_CONTEXT, ROI_PROMPT_TEMPLATE};

/// Cap for short survey answers and names.
pub const MAX_FIELD_CHARS: usize = 500;
/// Cap for the free-text description.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Neutralizes a user-supplied value for embedding inside a quoted prompt line.
pub fn sanitize_field(value: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(value.len().min(max_chars));
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;

    for c in value.chars() {
        let mapped = match c {
            '`' => continue,
            '"' => '\'',
            '{' => '(',
            '}' => ')',
            c if c.is_control() || c.is_whitespace() => ' ',
            c => c,
        };

        if matches!(mapped, '-' | '=' | '#') {
            if run_char == Some(mapped) {
                run_len += 1;
            } else {
                run_char = Some(mapped);
                run_len = 1;
            }
            // at most two in a row: no `---` / `===` / `###` delimiter survives
            if run_len > 2 {
                continue;
            }
        } else {
            run_char = None;
            run_len = 0;
        }

        out.push(mapped);
    }

    let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect::<String>().trim_end().to_string()
}

fn short(value: &str) -> String {
    sanitize_field(value, MAX_FIELD_CHARS)
}

/// Renders the full ROI audit prompt for a survey.
pub fn build_roi_prompt(input: &SurveyInput) -> String {
    let tools = input
        .current_tools()
        .iter()
        .map(|t| short(t))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();
    let tools = if tools.is_empty() {
        "None specified".to_string()
    } else {
        short(&tools.join(", "))
    };

    ROI_PROMPT_TEMPLATE
        .replace("{genfox_context}", GENFOX_CONTEXT)
        .replace("{organization_industry}", &short(&input.organization_industry))
        .replace("{department}", &short(&input.department))
        .replace("{company_size}", &short(&input.company_size))
        .replace("{human_count}", &input.human_count.to_string())
        .replace("{current_tools}", &tools)
        .replace(
            "{description}",
            &sanitize_field(input.description(), MAX_DESCRIPTION_CHARS),
        )
        .replace("{seniority_level}", &short(input.seniority_level()))
        .replace("{turnover_rate}", &short(input.turnover_rate()))
        .replace("{training_time}", &short(input.training_time()))
        .replace(
            "{monthly_task_volume}",
            &input.monthly_task_volume().to_string(),
        )
        .replace(
            "{avg_task_duration_minutes}",
            &input.avg_task_duration_minutes().to_string(),
        )
        .replace("{coverage_hours}", &short(input.coverage_hours()))
        .replace("{context_switching}", &short(input.context_switching()))
        .replace("{error_rate}", &short(input.error_rate()))
        .replace("{decision_complexity}", &short(input.decision_complexity()))
        .replace("{growth_projection}", &short(input.growth_projection()))
        .replace("{primary_bottleneck}", &short(input.primary_bottleneck()))
}

/// Renders the department suggestion prompt for an industry.
pub fn build_departments_prompt(industry: &str) -> String {
    DEPARTMENTS_PROMPT_TEMPLATE.replace("{industry}", &short(industry))
}

/// Short label used in logs so prompts themselves are never logged.
pub fn prompt_summary(prompt: &str) -> String {
    format!("{} chars for {MODEL}", prompt.chars().count())
}
