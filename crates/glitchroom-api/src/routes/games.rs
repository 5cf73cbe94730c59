//! Routes for creating, driving and viewing games.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use glitchroom_orchestrator::application::query_handlers::GameView;
use glitchroom_orchestrator::application::{command_handlers, query_handlers};
use glitchroom_orchestrator::domain::commands;
use glitchroom_orchestrator::domain::events::GameEvent;
use glitchroom_orchestrator::domain::phase::TransitionState;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    /// The new game.
    pub game_id: Uuid,
}

/// Optional request body for POST /{id}/skip.
#[derive(Debug, Default, Deserialize)]
pub struct SkipRequest {
    /// The phase the client is showing; a stale value makes the skip a no-op.
    pub expected_phase: Option<TransitionState>,
}

/// Query string for GET /{id}/events.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Only return events with a higher sequence number.
    pub after: Option<u64>,
}

/// Response body returned after a command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Whether the command changed the game.
    pub accepted: bool,
    /// The game after the command.
    pub view: GameView,
}

/// Response body for GET /{id}/events.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    /// Journal entries in sequence order.
    pub events: Vec<GameEvent>,
}

/// POST /
#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateGameResponse>), ApiError> {
    let game_id = state.create_game()?;
    Ok((StatusCode::CREATED, Json(CreateGameResponse { game_id })))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let view = state.with_game(game_id, |session| {
        Ok(query_handlers::get_game_view(session, state.clock.as_ref()))
    })?;
    Ok(Json(view))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.remove_game(game_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /{id}/events
#[instrument(skip(state, query))]
async fn get_events(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>, ApiError> {
    let events = state.with_game(game_id, |session| {
        Ok(query_handlers::get_game_events(
            session,
            state.clock.as_ref(),
            query.after,
        ))
    })?;
    Ok(Json(EventsResponse { events }))
}

/// POST /{id}/start
#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartGame {
        correlation_id: Uuid::new_v4(),
        game_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    let response = state.with_game(game_id, |session| {
        let result = command_handlers::handle_start_game(&command, state.clock.as_ref(), session)?;
        Ok(CommandResponse {
            accepted: result.accepted,
            view: query_handlers::build_view(session),
        })
    })?;
    Ok(Json(response))
}

/// POST /{id}/skip
#[instrument(skip(state, body))]
async fn skip_wait(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    body: Option<Json<SkipRequest>>,
) -> Result<Json<CommandResponse>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let command = commands::SkipWait {
        correlation_id: Uuid::new_v4(),
        game_id,
        expected_phase: request.expected_phase,
    };

    info!(correlation_id = %command.correlation_id, "handling skip_wait command");

    let response = state.with_game(game_id, |session| {
        let result = command_handlers::handle_skip_wait(&command, state.clock.as_ref(), session)?;
        Ok(CommandResponse {
            accepted: result.accepted,
            view: query_handlers::build_view(session),
        })
    })?;
    Ok(Json(response))
}

/// POST /{id}/modules/{index}/input
#[instrument(skip(state, input))]
async fn submit_input(
    State(state): State<AppState>,
    Path((game_id, module)): Path<(Uuid, usize)>,
    Json(input): Json<serde_json::Value>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SubmitInput {
        correlation_id: Uuid::new_v4(),
        game_id,
        module,
        input,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_input command");

    let response = state.with_game(game_id, |session| {
        let result =
            command_handlers::handle_submit_input(&command, state.clock.as_ref(), session)?;
        Ok(CommandResponse {
            accepted: result.accepted,
            view: query_handlers::build_view(session),
        })
    })?;
    Ok(Json(response))
}

/// Returns the router for games.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/{id}", get(get_game).delete(delete_game))
        .route("/{id}/events", get(get_events))
        .route("/{id}/start", post(start_game))
        .route("/{id}/skip", post(skip_wait))
        .route("/{id}/modules/{index}/input", post(submit_input))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use glitchroom_core::capability::Challenge;
    use glitchroom_core::clock::Clock;
    use glitchroom_test_support::{ManualClock, ScriptedChallenge};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn scripted(_kind: &str) -> Option<Box<dyn Challenge>> {
        Some(Box::new(ScriptedChallenge::new()))
    }

    fn test_app_state(clock: Arc<ManualClock>) -> AppState {
        let script = glitchroom_content::default_script().unwrap();
        let clock: Arc<dyn Clock> = clock;
        AppState::new(clock, Arc::new(script), scripted)
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router().with_state(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_create_game_returns_201_with_id() {
        // Arrange
        let state = test_app_state(Arc::new(ManualClock::default()));

        // Act
        let (status, json) = send(&state, "POST", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        let id: Uuid = json["game_id"].as_str().unwrap().parse().unwrap();
        assert_eq!(state.game_count().unwrap(), 1);
        assert!(state.with_game(id, |_| Ok(())).is_ok());
    }

    #[tokio::test]
    async fn test_start_returns_accepted_welcoming_view() {
        // Arrange
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();

        // Act
        let (status, json) = send(&state, "POST", &format!("/{id}/start"), None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], true);
        assert_eq!(json["view"]["phase"]["phase"], "welcoming");
        assert_eq!(json["view"]["skippable"], true);
        assert_eq!(json["view"]["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skip_with_stale_expected_phase_is_not_accepted() {
        // Arrange
        let clock = Arc::new(ManualClock::default());
        let state = test_app_state(Arc::clone(&clock));
        let id = state.create_game().unwrap();
        send(&state, "POST", &format!("/{id}/start"), None).await;
        clock.advance(Duration::from_secs(30));

        // Act
        let (status, json) = send(
            &state,
            "POST",
            &format!("/{id}/skip"),
            Some(json!({ "expected_phase": { "phase": "welcoming" } })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], false);
        assert_eq!(
            json["view"]["phase"],
            json!({ "phase": "introducing_module", "module": 0 })
        );
    }

    #[tokio::test]
    async fn test_skip_without_body_advances() {
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();
        send(&state, "POST", &format!("/{id}/start"), None).await;

        let (status, json) = send(&state, "POST", &format!("/{id}/skip"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], true);
        assert_eq!(json["view"]["phase"]["phase"], "introducing_module");
    }

    #[tokio::test]
    async fn test_input_for_inactive_module_is_not_accepted() {
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();

        let (status, json) = send(
            &state,
            "POST",
            &format!("/{id}/modules/0/input"),
            Some(json!({ "action": "solve" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], false);
        assert_eq!(json["view"]["phase"]["phase"], "idle");
    }

    #[tokio::test]
    async fn test_input_for_unknown_module_returns_404() {
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();

        let (status, json) = send(
            &state,
            "POST",
            &format!("/{id}/modules/9/input"),
            Some(json!({ "action": "solve" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "module_not_found");
    }

    #[tokio::test]
    async fn test_malformed_input_returns_422() {
        // Arrange
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();
        send(&state, "POST", &format!("/{id}/start"), None).await;
        send(&state, "POST", &format!("/{id}/skip"), None).await;
        send(&state, "POST", &format!("/{id}/skip"), None).await;

        // Act
        let (status, json) = send(
            &state,
            "POST",
            &format!("/{id}/modules/0/input"),
            Some(json!({ "action": "dance" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_unknown_game_returns_404() {
        let state = test_app_state(Arc::new(ManualClock::default()));

        let (status, json) = send(&state, "GET", &format!("/{}", Uuid::new_v4()), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "game_not_found");
    }

    #[tokio::test]
    async fn test_delete_game_returns_204_then_404() {
        // Arrange
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();

        // Act
        let (deleted, _) = send(&state, "DELETE", &format!("/{id}"), None).await;
        let (again, json) = send(&state, "DELETE", &format!("/{id}"), None).await;

        // Assert
        assert_eq!(deleted, StatusCode::NO_CONTENT);
        assert_eq!(again, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "game_not_found");
        assert_eq!(state.game_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_events_can_be_filtered_by_sequence() {
        // Arrange
        let state = test_app_state(Arc::new(ManualClock::default()));
        let id = state.create_game().unwrap();
        send(&state, "POST", &format!("/{id}/start"), None).await;
        send(&state, "POST", &format!("/{id}/skip"), None).await;

        // Act
        let (_, all) = send(&state, "GET", &format!("/{id}/events"), None).await;
        let (_, newer) = send(&state, "GET", &format!("/{id}/events?after=2"), None).await;

        // Assert
        let all = all["events"].as_array().unwrap();
        let newer = newer["events"].as_array().unwrap();
        assert_eq!(all[0]["kind"]["type"], "phase_entered");
        assert_eq!(all.len(), newer.len() + 2);
        assert_eq!(newer[0]["metadata"]["sequence_number"], 3);
    }
}
