use crate::engine::{AuditOutcome, Capabilities, Capability, RiskTier};
use crate::recommendations::{recommendation, Recommendation};
use serde::Serialize;

pub const PLACEHOLDER: &str = "—";
pub const IDLE_RISK_LABEL: &str = "ANALYSIS";

/// Penalty at which the risk gauge is fully drained.
const GAUGE_EMPTY_AT: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct AuditView {
    pub complete: bool,
    pub clients_needed: String,
    pub leads_needed: String,
    pub min_budget: String,
    pub max_budget: String,
    pub targets: Option<CountTargets>,
    pub penalty_percent: Option<u32>,
    pub risk: RiskGauge,
    pub alert: Option<String>,
    pub status_rows: Vec<StatusRow>,
    pub recommendations: Vec<Recommendation>,
}

/// Whole-unit end values for the count-up animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountTargets {
    pub clients_needed: u64,
    pub leads_needed: u64,
    pub min_budget: u64,
    pub max_budget: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskGauge {
    pub tier: Option<RiskTier>,
    pub label: &'static str,
    pub percent_text: String,
    pub fill: f64,
    pub state: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    pub capability: Capability,
    pub title: &'static str,
    pub good: bool,
    pub description: &'static str,
}

pub fn render_view(capabilities: &Capabilities, outcome: &AuditOutcome) -> AuditView {
    let status_rows = status_rows(capabilities);

    let Some(report) = outcome.report() else {
        return AuditView {
            complete: false,
            clients_needed: PLACEHOLDER.to_string(),
            leads_needed: PLACEHOLDER.to_string(),
            min_budget: PLACEHOLDER.to_string(),
            max_budget: PLACEHOLDER.to_string(),
            targets: None,
            penalty_percent: None,
            risk: RiskGauge {
                tier: None,
                label: IDLE_RISK_LABEL,
                percent_text: PLACEHOLDER.to_string(),
                fill: 0.0,
                state: None,
            },
            alert: None,
            status_rows,
            recommendations: Vec::new(),
        };
    };

    let targets = CountTargets {
        clients_needed: ceil_units(report.clients_needed),
        leads_needed: ceil_units(report.leads_needed),
        min_budget: ceil_units(report.min_budget),
        max_budget: ceil_units(report.max_budget),
    };
    let penalty_percent = (report.penalty_ratio * 100.0).round() as u32;

    let alert = (report.penalty_ratio > 0.0).then(|| {
        format!("Gaps in your setup are raising the ad budget by {penalty_percent}%.")
    });

    AuditView {
        complete: true,
        clients_needed: format_grouped(targets.clients_needed),
        leads_needed: format_grouped(targets.leads_needed),
        min_budget: format_money(report.min_budget),
        max_budget: format_money(report.max_budget),
        targets: Some(targets),
        penalty_percent: Some(penalty_percent),
        risk: risk_gauge(report.risk_tier, report.penalty_ratio),
        alert,
        status_rows,
        recommendations: report
            .recommendation_keys
            .iter()
            .map(|key| *recommendation(*key))
            .collect(),
    }
}

fn risk_gauge(tier: RiskTier, penalty_ratio: f64) -> RiskGauge {
    let fill = (1.0 - penalty_ratio / GAUGE_EMPTY_AT).clamp(0.0, 1.0);
    let percent_text = format!("{}%", (fill * 100.0).round() as u32);

    RiskGauge {
        tier: Some(tier),
        label: tier.label(),
        percent_text,
        fill,
        state: Some(tier.css_state()),
    }
}

fn status_rows(capabilities: &Capabilities) -> Vec<StatusRow> {
    Capability::ALL
        .into_iter()
        .map(|capability| {
            let good = capabilities.has(capability);
            let (title, good_text, bad_text) = match capability {
                Capability::Crm => ("CRM system", "Active and working", "Clients are likely to slip away"),
                Capability::Sales => ("Sales team", "Managers are active", "Conversion stays low"),
                Capability::Smm => ("SMM / marketing", "Active and working", "No traffic channel"),
            };
            StatusRow {
                capability,
                title,
                good,
                description: if good { good_text } else { bad_text },
            }
        })
        .collect()
}

/// Rounds up to the next whole unit; negative and NaN values clamp to zero.
/// Complete reports never exceed `MAX_EXACT_UNITS`, so the cast is exact.
pub fn ceil_units(value: f64) -> u64 {
    value.ceil() as u64
}

/// Formats with en-US thousands separators, e.g. `1234567` as `1,234,567`.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_money(value: f64) -> String {
    format!("${}", format_grouped(ceil_units(value)))
}
