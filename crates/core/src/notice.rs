//! Transient notifications shown to the visitor.

use serde::{Deserialize, Serialize};

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A short toast-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    #[must_use]
    pub fn new(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    #[must_use]
    pub fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    #[must_use]
    pub fn added_to_cart(name: &str) -> Self {
        Self::new("Added to cart", format!("{name} has been added to your cart."))
    }

    #[must_use]
    pub fn verification_failed() -> Self {
        Self::destructive(
            "Verification Failed",
            "This gamepass could not be verified. It may no longer be available.",
        )
    }

    #[must_use]
    pub fn verification_error() -> Self {
        Self::destructive(
            "Verification Error",
            "An error occurred while verifying this gamepass.",
        )
    }

    #[must_use]
    pub fn welcome() -> Self {
        Self::new("Welcome!", "Thank you for accepting the terms of service.")
    }

    #[must_use]
    pub fn terms_required() -> Self {
        Self::destructive(
            "Terms Required",
            "You must accept the terms to use this website",
        )
    }

    #[must_use]
    pub fn terms_accepted() -> Self {
        Self::new("Terms Accepted", "You have accepted the Terms of Service.")
    }

    #[must_use]
    pub fn terms_declined() -> Self {
        Self::destructive(
            "Terms Declined",
            "You must accept the Terms of Service to use the shop.",
        )
    }

    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self.variant, NoticeVariant::Destructive)
    }
}
