use crate::engine::RecommendationKey;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Danger,
    Warning,
    Default,
}

impl RecommendationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationKind::Danger => "danger",
            RecommendationKind::Warning => "warning",
            RecommendationKind::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub key: RecommendationKey,
    pub kind: RecommendationKind,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

const CRM: Recommendation = Recommendation {
    key: RecommendationKey::Crm,
    kind: RecommendationKind::Danger,
    title: "Set up a CRM system",
    description: "Cuts the risk of losing clients by 30-50%",
    icon: r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect width="18" height="18" x="3" y="3" rx="2"/><path d="M3 9h18"/><path d="M9 21V9"/></svg>"#,
};

const SALES: Recommendation = Recommendation {
    key: RecommendationKey::Sales,
    kind: RecommendationKind::Danger,
    title: "Hire a sales manager",
    description: "A chance to lift conversion two to three times",
    icon: r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2"/><circle cx="9" cy="7" r="4"/><path d="M22 21v-2a4 4 0 0 0-3-3.87"/><path d="M16 3.13a4 4 0 0 1 0 7.75"/></svg>"#,
};

const SMM: Recommendation = Recommendation {
    key: RecommendationKey::Smm,
    kind: RecommendationKind::Warning,
    title: "SMM and targeted ads",
    description: "Balance organic and paid traffic",
    icon: r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M18 2h-3a5 5 0 0 0-5 5v3H7v4h3v8h4v-8h3l1-4h-4V7a1 1 0 0 1 1-1h3z"/></svg>"#,
};

const BUDGET_TEST: Recommendation = Recommendation {
    key: RecommendationKey::BudgetTest,
    kind: RecommendationKind::Default,
    title: "Test the ad budget ($100)",
    description: "Find the most effective channels with an A/B test",
    icon: r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M3 3v18h18"/><path d="m19 9-5 5-4-4-3 3"/></svg>"#,
};

pub fn recommendation(key: RecommendationKey) -> &'static Recommendation {
    match key {
        RecommendationKey::Crm => &CRM,
        RecommendationKey::Sales => &SALES,
        RecommendationKey::Smm => &SMM,
        RecommendationKey::BudgetTest => &BUDGET_TEST,
    }
}
