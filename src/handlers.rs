use crate::display::render_view;
use crate::engine::compute_with;
use crate::errors::AppError;
use crate::models::{
    AppData, AuditRequest, AuditResponse, SystemThemeRequest, ThemeQuery, ThemeResponse,
    ThemeToggleRequest, ThemeUpdateRequest,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::theme::{Theme, ThemePreference};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::{debug, info};

pub async fn index(
    State(state): State<AppState>,
    Query(request): Query<AuditRequest>,
) -> Html<String> {
    let response = run_audit(&state, &request);
    let saved = state.data.lock().await.theme.theme;
    Html(render_index(&request.to_inputs(), &response.view, saved))
}

pub async fn audit_query(
    State(state): State<AppState>,
    Query(request): Query<AuditRequest>,
) -> Json<AuditResponse> {
    Json(run_audit(&state, &request))
}

pub async fn audit(
    State(state): State<AppState>,
    Json(request): Json<AuditRequest>,
) -> Json<AuditResponse> {
    Json(run_audit(&state, &request))
}

fn run_audit(state: &AppState, request: &AuditRequest) -> AuditResponse {
    let inputs = request.to_inputs();
    let outcome = compute_with(&inputs, &state.thresholds);
    match outcome.report() {
        Some(report) => debug!(
            penalty = report.penalty_ratio,
            tier = report.risk_tier.label(),
            leads = report.leads_needed,
            "audit computed"
        ),
        None => debug!("audit incomplete"),
    }

    let view = render_view(&inputs.capabilities, &outcome);
    AuditResponse { outcome, view }
}

pub async fn get_theme(
    State(state): State<AppState>,
    Query(query): Query<ThemeQuery>,
) -> Json<ThemeResponse> {
    let data = state.data.lock().await;
    let theme = data.theme.resolve(query.prefers_dark);
    Json(ThemeResponse::new(theme, &data.theme))
}

pub async fn put_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeUpdateRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let requested = payload
        .theme
        .as_deref()
        .map(str::parse::<Theme>)
        .transpose()
        .map_err(AppError::bad_request)?;

    let mut data = state.data.lock().await;
    let mut next = data.theme.clone();
    match requested {
        Some(theme) => next.set(theme),
        None => next.clear(),
    }
    commit_theme(&state, &mut data, next).await?;
    info!(theme = ?data.theme.theme, "theme preference updated");

    let theme = data.theme.resolve(payload.prefers_dark);
    Ok(Json(ThemeResponse::new(theme, &data.theme)))
}

pub async fn toggle_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeToggleRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let current = payload
        .current
        .as_deref()
        .map(str::parse::<Theme>)
        .transpose()
        .map_err(AppError::bad_request)?;

    let mut data = state.data.lock().await;
    let current = current.unwrap_or_else(|| data.theme.resolve(payload.prefers_dark));
    let mut preference = data.theme.clone();
    let next = preference.toggle(current);
    commit_theme(&state, &mut data, preference).await?;
    info!(from = %current, to = %next, "theme toggled");

    Ok(Json(ThemeResponse::new(next, &data.theme)))
}

/// Writes `next` to disk and only then swaps it into the shared state.
async fn commit_theme(
    state: &AppState,
    data: &mut AppData,
    next: ThemePreference,
) -> Result<(), AppError> {
    let mut staged = data.clone();
    staged.theme = next;
    persist_data(&state.data_path, &staged).await?;
    *data = staged;
    Ok(())
}

pub async fn system_theme(
    State(state): State<AppState>,
    Json(payload): Json<SystemThemeRequest>,
) -> Json<ThemeResponse> {
    let data = state.data.lock().await;
    let theme = match data.theme.sync_with_system(payload.prefers_dark) {
        Some(theme) => {
            debug!(%theme, "following system theme");
            theme
        }
        None => data.theme.resolve(payload.prefers_dark),
    };
    Json(ThemeResponse::new(theme, &data.theme))
}

pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwritable_state() -> AppState {
        // A directory cannot be overwritten as a file, so every persist fails.
        AppState::new(std::env::temp_dir(), AppData::default(), Default::default())
    }

    #[tokio::test]
    async fn failed_persist_keeps_previous_theme() {
        let state = unwritable_state();
        let result = put_theme(
            State(state.clone()),
            Json(ThemeUpdateRequest {
                theme: Some("dark".to_string()),
                prefers_dark: false,
            }),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(state.data.lock().await.theme.theme, None);

        let Json(fetched) = get_theme(State(state), Query(ThemeQuery { prefers_dark: false })).await;
        assert_eq!(fetched.theme, Theme::Light);
        assert!(fetched.saved.is_none());
    }

    #[tokio::test]
    async fn failed_persist_leaves_toggle_unapplied() {
        let state = unwritable_state();
        let result = toggle_theme(
            State(state.clone()),
            Json(ThemeToggleRequest {
                current: Some("light".to_string()),
                prefers_dark: false,
            }),
        )
        .await;
        assert!(result.is_err());
        let data = state.data.lock().await;
        assert_eq!(data.theme, ThemePreference::default());
    }

    #[tokio::test]
    async fn successful_update_is_applied() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "biznes_audit_handlers_{}_{nanos}.json",
            std::process::id()
        ));
        let state = AppState::new(path.clone(), AppData::default(), Default::default());

        let Json(response) = put_theme(
            State(state.clone()),
            Json(ThemeUpdateRequest {
                theme: Some("dark".to_string()),
                prefers_dark: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.theme, Theme::Dark);
        assert_eq!(state.data.lock().await.theme.theme, Some(Theme::Dark));
        let _ = std::fs::remove_file(&path);
    }
}
