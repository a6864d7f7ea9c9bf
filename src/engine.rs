//! Deterministic audit calculation: inputs in, metrics and risk out.
//!
//! `compute` is a pure function. Anything short of three positive numbers
//! yields [`AuditOutcome::Incomplete`], which is the normal "not enough data
//! yet" state rather than a failure.

use serde::{Deserialize, Serialize};

/// Lower bound of the assumed cost per lead, in currency units.
pub const CPL_MIN: f64 = 0.8;
/// Upper bound of the assumed cost per lead, in currency units.
pub const CPL_MAX: f64 = 1.5;

/// Largest whole number an `f64` holds exactly (2^53). Derived quantities
/// above it cannot be shown as exact integers and count as incomplete.
pub const MAX_EXACT_UNITS: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Crm,
    Sales,
    Smm,
}

impl Capability {
    /// Declaration order; recommendations are emitted in this order.
    pub const ALL: [Capability; 3] = [Capability::Crm, Capability::Sales, Capability::Smm];

    pub fn penalty_weight(self) -> f64 {
        f64::from(penalty_points(self)) / 100.0
    }

    pub fn recommendation(self) -> RecommendationKey {
        match self {
            Capability::Crm => RecommendationKey::Crm,
            Capability::Sales => RecommendationKey::Sales,
            Capability::Smm => RecommendationKey::Smm,
        }
    }
}

/// Penalty weight per missing capability, in whole percentage points.
/// Summing integers keeps every reachable ratio exact (0.0 ..= 0.5).
fn penalty_points(capability: Capability) -> u32 {
    match capability {
        Capability::Crm => 20,
        Capability::Sales => 20,
        Capability::Smm => 10,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub has_crm: bool,
    pub has_sales: bool,
    pub has_smm: bool,
}

impl Capabilities {
    pub const ALL_PRESENT: Capabilities = Capabilities {
        has_crm: true,
        has_sales: true,
        has_smm: true,
    };

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Crm => self.has_crm,
            Capability::Sales => self.has_sales,
            Capability::Smm => self.has_smm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditInputs {
    pub income_goal: f64,
    pub avg_check: f64,
    pub conversion_rate_percent: f64,
    pub capabilities: Capabilities,
}

impl AuditInputs {
    fn is_complete(&self) -> bool {
        [self.income_goal, self.avg_check, self.conversion_rate_percent]
            .iter()
            .all(|value| value.is_finite() && *value > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Safe,
    Medium,
    Critical,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Safe => "SAFE",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Critical => "CRITICAL",
        }
    }

    pub fn css_state(self) -> &'static str {
        match self {
            RiskTier::Safe => "state-safe",
            RiskTier::Medium => "state-medium",
            RiskTier::Critical => "state-danger",
        }
    }
}

/// Boundaries of the stepwise risk classification.
///
/// A penalty at or below `safe_up_to` is safe, at or above `critical_from`
/// is critical, anything between is medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub safe_up_to: f64,
    pub critical_from: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            safe_up_to: 0.0,
            critical_from: 0.3,
        }
    }
}

impl RiskThresholds {
    /// Returns `None` unless `0 <= safe_up_to < critical_from` and both are finite.
    pub fn new(safe_up_to: f64, critical_from: f64) -> Option<Self> {
        let valid = safe_up_to.is_finite()
            && critical_from.is_finite()
            && safe_up_to >= 0.0
            && safe_up_to < critical_from;
        valid.then_some(Self {
            safe_up_to,
            critical_from,
        })
    }

    pub fn classify(&self, penalty_ratio: f64) -> RiskTier {
        if penalty_ratio >= self.critical_from {
            RiskTier::Critical
        } else if penalty_ratio > self.safe_up_to {
            RiskTier::Medium
        } else {
            RiskTier::Safe
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKey {
    Crm,
    Sales,
    Smm,
    BudgetTest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub clients_needed: f64,
    pub leads_needed: f64,
    pub penalty_ratio: f64,
    pub min_budget: f64,
    pub max_budget: f64,
    pub risk_tier: RiskTier,
    pub recommendation_keys: Vec<RecommendationKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    Incomplete,
    Complete(AuditReport),
}

impl AuditOutcome {
    pub fn report(&self) -> Option<&AuditReport> {
        match self {
            AuditOutcome::Complete(report) => Some(report),
            AuditOutcome::Incomplete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.report().is_some()
    }
}

pub fn missing_capabilities(capabilities: &Capabilities) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|capability| !capabilities.has(*capability))
        .collect()
}

pub fn penalty_ratio(capabilities: &Capabilities) -> f64 {
    let points: u32 = missing_capabilities(capabilities)
        .into_iter()
        .map(penalty_points)
        .sum();
    f64::from(points) / 100.0
}

pub fn compute(inputs: &AuditInputs) -> AuditOutcome {
    compute_with(inputs, &RiskThresholds::default())
}

pub fn compute_with(inputs: &AuditInputs, thresholds: &RiskThresholds) -> AuditOutcome {
    if !inputs.is_complete() {
        return AuditOutcome::Incomplete;
    }

    let clients_needed = inputs.income_goal / inputs.avg_check;
    let leads_needed = clients_needed / (inputs.conversion_rate_percent / 100.0);

    let penalty_ratio = penalty_ratio(&inputs.capabilities);
    let min_budget = leads_needed * CPL_MIN * (1.0 + penalty_ratio);
    let max_budget = leads_needed * CPL_MAX * (1.0 + penalty_ratio);

    if ![clients_needed, leads_needed, min_budget, max_budget]
        .iter()
        .all(|value| value.is_finite() && value.ceil() <= MAX_EXACT_UNITS)
    {
        return AuditOutcome::Incomplete;
    }

    let mut recommendation_keys: Vec<RecommendationKey> = missing_capabilities(&inputs.capabilities)
        .into_iter()
        .map(Capability::recommendation)
        .collect();
    recommendation_keys.push(RecommendationKey::BudgetTest);

    AuditOutcome::Complete(AuditReport {
        clients_needed,
        leads_needed,
        penalty_ratio,
        min_budget,
        max_budget,
        risk_tier: thresholds.classify(penalty_ratio),
        recommendation_keys,
    })
}

/// Lenient number parsing for raw form text.
///
/// Reads the longest leading numeric prefix (`"12abc"` is 12, `" 3.5 "` is
/// 3.5). Empty, unparsable or non-finite text coerces to zero.
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// A two-option choice counts as present only when it reads "yes".
pub fn coerce_toggle(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "on"
    )
}
