//! Shop listing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use karma_shop_core::catalog::{
    ALL_GAME_PASSES, ALL_PRODUCTS, GamePass, ProductPage, game_pass_categories,
    game_passes_by_category, product_categories,
};
use serde::Deserialize;
use tracing::instrument;

use super::{HxRequest, PageContext};
use crate::filters;

/// Game pass listing with its category filter.
#[derive(Debug, Clone)]
pub struct ShopView {
    pub categories: Vec<String>,
    pub selected: String,
    pub passes: Vec<&'static GamePass>,
}

impl ShopView {
    /// Listing for `category`, defaulting to every pass.
    #[must_use]
    pub fn new(category: Option<&str>) -> Self {
        let selected = category
            .filter(|c| !c.is_empty())
            .unwrap_or(ALL_GAME_PASSES)
            .to_string();
        Self {
            categories: game_pass_categories(),
            passes: game_passes_by_category(&selected),
            selected,
        }
    }

    #[must_use]
    pub fn is_selected(&self, category: &str) -> bool {
        self.selected == category
    }
}

/// Query parameters for the shop listing.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// Query parameters for the product grid.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub visible: Option<usize>,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub ctx: PageContext,
    pub shop: ShopView,
}

/// Product grid page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub ctx: PageContext,
    pub categories: &'static [&'static str],
    pub page: ProductPage,
}

impl ProductsTemplate {
    fn is_selected(&self, category: &str) -> bool {
        self.page.category == category
    }
}

/// Product grid fragment template (for HTMX "load more" and filters).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub page: ProductPage,
}

/// Display the game pass shop without the intro sequence.
#[instrument(skip(ctx))]
pub async fn index(ctx: PageContext, Query(query): Query<ShopQuery>) -> ShopTemplate {
    ShopTemplate {
        ctx,
        shop: ShopView::new(query.category.as_deref()),
    }
}

/// Display the product grid.
///
/// HTMX requests get only the grid so "load more" and the category pills can
/// swap it in place.
#[instrument(skip(ctx))]
pub async fn products(
    HxRequest(hx): HxRequest,
    ctx: PageContext,
    Query(query): Query<ProductsQuery>,
) -> Response {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(ALL_PRODUCTS);
    let page = ProductPage::new(category, query.visible);

    if hx {
        return ProductGridTemplate { page }.into_response();
    }

    ProductsTemplate {
        ctx,
        categories: product_categories(),
        page,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_view_defaults_to_all() {
        let view = ShopView::new(None);
        assert_eq!(view.selected, ALL_GAME_PASSES);
        assert_eq!(view.categories.first().map(String::as_str), Some(ALL_GAME_PASSES));
        assert!(!view.passes.is_empty());

        assert_eq!(ShopView::new(Some("")).selected, ALL_GAME_PASSES);
    }

    #[test]
    fn test_shop_view_filters_by_category() {
        let view = ShopView::new(Some("Donation"));
        assert!(!view.passes.is_empty());
        assert!(view.passes.iter().all(|p| p.category.name() == "Donation"));

        assert!(ShopView::new(Some("Nope")).passes.is_empty());
    }
}
