//! Static page route handlers: terms, privacy, about and shop information.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::Redirect;
use chrono::Utc;
use karma_shop_core::Notice;
use karma_shop_core::catalog::links;
use karma_shop_core::flow::{FlowController, Stage};
use karma_shop_core::storage::{keys, record_terms_accepted, terms_accepted};
use tower_sessions::Session;
use tracing::instrument;

use super::{PageContext, flash_notice};
use crate::error::Result;
use crate::filters;
use crate::storage::SessionStorage;

/// Date shown at the bottom of both policy pages.
pub const POLICIES_UPDATED: &str = "April 29, 2025";

/// Terms of service page template.
#[derive(Template, WebTemplate)]
#[template(path = "terms.html")]
pub struct TermsTemplate {
    pub ctx: PageContext,
    pub accepted: bool,
    pub contact_url: &'static str,
    pub updated: &'static str,
}

/// Privacy policy page template.
#[derive(Template, WebTemplate)]
#[template(path = "privacy.html")]
pub struct PrivacyTemplate {
    pub ctx: PageContext,
    pub contact_url: &'static str,
    pub updated: &'static str,
}

/// About page template: creator profile links and issue reporting.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub ctx: PageContext,
    pub roblox_profile: &'static str,
    pub scratch_profile: &'static str,
    pub contact_url: &'static str,
    pub report_template: &'static str,
}

/// Shop information template: purchases, legal notes, FAQ and support.
#[derive(Template, WebTemplate)]
#[template(path = "info.html")]
pub struct InfoTemplate {
    pub ctx: PageContext,
    pub contact_url: &'static str,
    pub report_template: &'static str,
}

/// Display the terms of service.
#[instrument(skip(session, ctx))]
pub async fn terms(session: Session, ctx: PageContext) -> Result<TermsTemplate> {
    let storage =
        SessionStorage::load(&session, &[keys::TOS_ACCEPTED, keys::TERMS_ACCEPTED]).await?;

    Ok(TermsTemplate {
        ctx,
        accepted: terms_accepted(&storage),
        contact_url: links::CONTACT_STUDIO,
        updated: POLICIES_UPDATED,
    })
}

/// Record acceptance and continue to the shop.
///
/// A flow sequence waiting on the terms gate moves on as well.
#[instrument(skip(session))]
pub async fn accept_terms(session: Session) -> Result<Redirect> {
    let mut storage = SessionStorage::load(&session, &[keys::FLOW]).await?;
    record_terms_accepted(&mut storage);

    if let Some(mut controller) = FlowController::load(&storage)
        && controller.stage() == Stage::Terms
    {
        controller.accept_terms(Utc::now());
        controller.save(&mut storage);
    }

    storage.commit(&session).await?;
    flash_notice(&session, &Notice::terms_accepted()).await?;

    tracing::info!("Terms accepted");
    Ok(Redirect::to("/shop"))
}

/// Decline the terms and return to the landing page.
#[instrument(skip(session))]
pub async fn decline_terms(session: Session) -> Result<Redirect> {
    flash_notice(&session, &Notice::terms_declined()).await?;
    tracing::info!("Terms declined");
    Ok(Redirect::to("/"))
}

/// Display the privacy policy.
#[instrument(skip(ctx))]
pub async fn privacy(ctx: PageContext) -> PrivacyTemplate {
    PrivacyTemplate {
        ctx,
        contact_url: links::CONTACT_STUDIO,
        updated: POLICIES_UPDATED,
    }
}

/// Display the about page.
#[instrument(skip(ctx))]
pub async fn about(ctx: PageContext) -> AboutTemplate {
    AboutTemplate {
        ctx,
        roblox_profile: links::ROBLOX_PROFILE,
        scratch_profile: links::SCRATCH_PROFILE,
        contact_url: links::CONTACT_STUDIO,
        report_template: links::REPORT_TEMPLATE,
    }
}

/// Display purchase, legal and support information.
#[instrument(skip(ctx))]
pub async fn info(ctx: PageContext) -> InfoTemplate {
    InfoTemplate {
        ctx,
        contact_url: links::CONTACT_STUDIO,
        report_template: links::REPORT_TEMPLATE,
    }
}
