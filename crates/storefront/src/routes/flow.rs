//! Intro flow route handlers.
//!
//! The browser plays the animations and reports each one finishing through
//! `POST /flow/event`; the controller itself lives in the session and owns
//! every timed transition. The page polls `GET /flow` when the controller
//! reports a pending deadline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use karma_shop_core::Notice;
use karma_shop_core::flow::{FlowController, FlowEvent, Stage};
use karma_shop_core::storage::{keys, record_terms_accepted, terms_accepted};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::PageContext;
use super::shop::ShopView;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::storage::SessionStorage;

/// Session keys the flow handlers read.
const FLOW_KEYS: &[&str] = &[keys::FLOW, keys::TOS_ACCEPTED, keys::TERMS_ACCEPTED];

/// Flow state as reported to the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowView {
    pub stage: Stage,
    pub show_intro: bool,
    pub show_eye_reveal: bool,
    pub eyes_opened: bool,
    pub show_terms: bool,
    pub page_visible: bool,
    pub terms_accepted: bool,
    /// When to poll again, if a timer or stall deadline is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_check_in_ms: Option<i64>,
}

impl FlowView {
    #[must_use]
    pub fn of(controller: &FlowController, now: DateTime<Utc>) -> Self {
        Self {
            stage: controller.stage(),
            show_intro: controller.show_intro(),
            show_eye_reveal: controller.show_eye_reveal(),
            eyes_opened: controller.eyes_opened(),
            show_terms: controller.show_terms(),
            page_visible: controller.page_visible(),
            terms_accepted: controller.terms_accepted(),
            next_check_in_ms: controller.next_check_in(now),
        }
    }
}

/// Flow event request body.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub event: FlowEvent,
}

/// Flow event response body.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub flow: FlowView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Landing page template: intro overlay over the shop listing.
#[derive(Template, WebTemplate)]
#[template(path = "intro.html")]
pub struct IntroTemplate {
    pub ctx: PageContext,
    pub flow: FlowView,
    pub shop: ShopView,
}

/// Display the landing page and start a fresh intro sequence.
#[instrument(skip(state, session, ctx))]
pub async fn intro(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
) -> Result<IntroTemplate> {
    let now = Utc::now();
    let mut storage = SessionStorage::load(&session, FLOW_KEYS).await?;

    let controller = FlowController::new(terms_accepted(&storage), state.config().flow, now);
    controller.save(&mut storage);
    storage.commit(&session).await?;

    tracing::debug!(
        terms_accepted = controller.terms_accepted(),
        "Starting intro sequence"
    );

    Ok(IntroTemplate {
        ctx,
        flow: FlowView::of(&controller, now),
        shop: ShopView::new(None),
    })
}

/// Current flow state with any due timers applied.
///
/// Visitors without a stored sequence are treated as having skipped the intro.
#[instrument(skip(state, session))]
pub async fn state(State(state): State<AppState>, session: Session) -> Result<Json<FlowView>> {
    let now = Utc::now();
    let mut storage = SessionStorage::load(&session, FLOW_KEYS).await?;

    let mut controller = load_controller(&storage, &state);
    let entered = controller.advance(now);
    if !entered.is_empty() {
        tracing::debug!(?entered, "Applied due flow transitions");
        controller.save(&mut storage);
        storage.commit(&session).await?;
    }

    Ok(Json(FlowView::of(&controller, now)))
}

/// Apply a flow event reported by the browser.
#[instrument(skip(state, session))]
pub async fn event(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>> {
    let now = Utc::now();
    let mut storage = SessionStorage::load(&session, FLOW_KEYS).await?;

    let mut controller = load_controller(&storage, &state);
    let notice = controller.handle(request.event, now);

    if request.event == FlowEvent::AcceptTerms && controller.terms_accepted() {
        record_terms_accepted(&mut storage);
    }

    controller.save(&mut storage);
    storage.commit(&session).await?;

    Ok(Json(EventResponse {
        flow: FlowView::of(&controller, now),
        notice,
    }))
}

fn load_controller(storage: &SessionStorage, state: &AppState) -> FlowController {
    FlowController::load(storage)
        .unwrap_or_else(|| FlowController::skip_intro(terms_accepted(storage), state.config().flow))
}
