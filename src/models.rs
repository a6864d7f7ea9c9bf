use crate::display::AuditView;
use crate::engine::{coerce_number, coerce_toggle, AuditInputs, AuditOutcome, Capabilities};
use crate::theme::{Theme, ThemePreference};
use serde::{de::IgnoredAny, Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppData {
    pub theme: ThemePreference,
}

/// A numeric field as the page sends it: a JSON number or raw input text.
/// Any other JSON shape is accepted and reads as "not provided".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawNumber {
    pub fn coerce(&self) -> f64 {
        match self {
            RawNumber::Number(value) if value.is_finite() => *value,
            RawNumber::Number(_) => 0.0,
            RawNumber::Text(text) => coerce_number(text),
            RawNumber::Other(_) => 0.0,
        }
    }
}

/// A yes/no choice: a JSON bool or the checked radio value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawToggle {
    Flag(bool),
    Choice(String),
    Other(IgnoredAny),
}

impl RawToggle {
    pub fn coerce(&self) -> bool {
        match self {
            RawToggle::Flag(value) => *value,
            RawToggle::Choice(text) => coerce_toggle(text),
            RawToggle::Other(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditRequest {
    pub income_goal: Option<RawNumber>,
    pub avg_check: Option<RawNumber>,
    pub conversion_rate: Option<RawNumber>,
    pub crm: Option<RawToggle>,
    pub sales: Option<RawToggle>,
    pub smm: Option<RawToggle>,
}

impl AuditRequest {
    pub fn to_inputs(&self) -> AuditInputs {
        let number = |field: &Option<RawNumber>| field.as_ref().map_or(0.0, RawNumber::coerce);
        let toggle = |field: &Option<RawToggle>| field.as_ref().is_some_and(RawToggle::coerce);

        AuditInputs {
            income_goal: number(&self.income_goal),
            avg_check: number(&self.avg_check),
            conversion_rate_percent: number(&self.conversion_rate),
            capabilities: Capabilities {
                has_crm: toggle(&self.crm),
                has_sales: toggle(&self.sales),
                has_smm: toggle(&self.smm),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub outcome: AuditOutcome,
    pub view: AuditView,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeQuery {
    pub prefers_dark: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeUpdateRequest {
    pub theme: Option<String>,
    pub prefers_dark: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeToggleRequest {
    pub current: Option<String>,
    pub prefers_dark: bool,
}

#[derive(Debug, Deserialize)]
pub struct SystemThemeRequest {
    pub prefers_dark: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub saved: Option<Theme>,
    pub updated_at: Option<String>,
    pub toggle_label: String,
}

impl ThemeResponse {
    pub fn new(theme: Theme, preference: &ThemePreference) -> Self {
        Self {
            theme,
            saved: preference.theme,
            updated_at: preference.updated_at.clone(),
            toggle_label: theme.toggle_label().to_string(),
        }
    }
}
