//! Authenticated-actor middleware.
//!
//! Authentication itself happens upstream. The gateway forwards the verified
//! user id in a header (see `ACTOR_HEADER`); this middleware turns it into an
//! [`Actor`] request extension for the handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use log::debug;
use uuid::Uuid;

use crate::{error::ApiError, AppState};

/// The user on whose behalf a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

/// Parses the actor header value.
pub fn parse_actor(value: &str) -> Option<Actor> {
    Uuid::parse_str(value.trim()).ok().map(Actor)
}

/// Rejects requests without a valid actor header with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = req
        .headers()
        .get(state.actor_header.as_str())
        .and_then(|value| value.to_str().ok())
        .and_then(parse_actor)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized request"))?;

    debug!("Request authenticated as {}", actor.0);
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
