use sea_orm::{EntityTrait, Set, TransactionTrait, sea_query::OnConflict};

use crate::{
    audit,
    dto::admin::{RichTextRequest, RichTextResponse},
    entity::settings::{ActiveModel, Column, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    richtext::Editor,
    settings::{RICH_TEXT_KEYS, SiteSettings},
    state::AppState,
};

/// Reads the `settings` table into the shared state.
pub async fn load(state: &AppState) -> AppResult<SiteSettings> {
    let rows = Settings::find().all(&state.orm).await?;
    let settings = SiteSettings::from_rows(rows.into_iter().map(|row| (row.key, row.value)));

    let problems = settings.validate();
    if !problems.is_empty() {
        tracing::warn!(?problems, "stored settings failed validation");
    }

    *state.settings.write().await = settings.clone();
    tracing::debug!("site settings loaded");
    Ok(settings)
}

async fn store_rows(state: &AppState, rows: Vec<(String, String)>) -> AppResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let txn = state.orm.begin().await?;
    Settings::insert_many(rows.into_iter().map(|(key, value)| ActiveModel {
        key: Set(key),
        value: Set(Some(value)),
    }))
    .on_conflict(
        OnConflict::column(Column::Key)
            .update_column(Column::Value)
            .to_owned(),
    )
    .exec(&txn)
    .await?;
    txn.commit().await?;
    Ok(())
}

pub async fn get_settings(state: &AppState) -> AppResult<ApiResponse<SiteSettings>> {
    Ok(ApiResponse::success("Settings", state.site_settings().await, None))
}

pub async fn update_settings(
    state: &AppState,
    user: &AuthUser,
    payload: SiteSettings,
) -> AppResult<ApiResponse<SiteSettings>> {
    let problems = payload.validate();
    if !problems.is_empty() {
        return Err(AppError::BadRequest(format!(
            "INVALID_SETTINGS: {}",
            problems.join(", ")
        )));
    }

    store_rows(state, payload.to_rows()).await?;
    let settings = load(state).await?;
    state.cache.invalidate_all().await;

    audit::record(
        state,
        user,
        "settings_update",
        "settings",
        serde_json::json!({}),
    )
    .await;

    Ok(ApiResponse::success("Settings saved", settings, None))
}

/// Runs editor commands against a stored rich-text value and saves the resulting HTML.
pub async fn apply_rich_text(
    state: &AppState,
    user: &AuthUser,
    key: &str,
    payload: RichTextRequest,
) -> AppResult<ApiResponse<RichTextResponse>> {
    if !RICH_TEXT_KEYS.contains(&key) {
        return Err(AppError::NotFound);
    }

    let current = state.site_settings().await;
    let stored = current.rich_text(key).unwrap_or_default();

    let mut editor = Editor::from_stored(stored);
    if let Some(selection) = payload.selection {
        editor.save_selection(selection);
    }
    let mut changed = false;
    for command in &payload.commands {
        changed |= editor.apply(command);
    }
    let html = editor.html().to_string();

    if changed {
        store_rows(state, vec![(key.to_string(), html.clone())]).await?;
        load(state).await?;
        state.cache.invalidate_all().await;
        audit::record(
            state,
            user,
            "settings_rich_text",
            "settings",
            serde_json::json!({ "key": key, "commands": payload.commands.len() }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Rich text applied",
        RichTextResponse {
            key: key.to_string(),
            html,
        },
        None,
    ))
}
