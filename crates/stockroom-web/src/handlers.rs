//! Request handlers for the inventory pages.
//!
//! Every handler here runs behind [`crate::auth::require_session`]; the
//! add-product and draw-stock handlers additionally behind the stock-manager
//! role guard.

use crate::error::WebError;
use crate::forms::{AddProductForm, DrawStockForm, shortfall_message};
use crate::pages;
use crate::state::AppState;
use axum::{
    Extension, Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;
use stockroom_core::CurrentUser;
use stockroom_store::WithdrawOutcome;

/// Handler for the inventory dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, WebError> {
    let products = state.store().list_products().await?;
    Ok(Html(pages::dashboard_page(&user, &products)))
}

/// Handler for the summary page.
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, WebError> {
    let threshold = state.low_stock_threshold();
    let summary = state.store().inventory_summary(threshold).await?;
    tracing::debug!(user = %user.username(), "rendering summary");
    Ok(Html(pages::summary_page(&user, &summary, threshold)))
}

pub async fn add_product_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, WebError> {
    let categories = state.store().list_categories().await?;
    Ok(Html(pages::add_product_page(
        &user,
        &categories,
        None,
        &AddProductForm::default(),
    )))
}

pub async fn add_product_submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<AddProductForm>,
) -> Result<Response, WebError> {
    let categories = state.store().list_categories().await?;
    let product = match form.validate(&categories) {
        Ok(product) => product,
        Err(message) => {
            let page = pages::add_product_page(&user, &categories, Some(message), &form);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let product_id = state.store().insert_product(&product).await?;
    tracing::info!(
        user = %user.username(),
        product_id,
        name = %product.name,
        "product added"
    );
    Ok(Redirect::to("/").into_response())
}

pub async fn draw_stock_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, WebError> {
    let products = state.store().list_products().await?;
    Ok(Html(pages::draw_stock_page(
        &user,
        &products,
        None,
        &DrawStockForm::default(),
    )))
}

pub async fn draw_stock_submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<DrawStockForm>,
) -> Result<Response, WebError> {
    let withdrawal = match form.validate() {
        Ok(withdrawal) => withdrawal,
        Err(message) => {
            let products = state.store().list_products().await?;
            let page = pages::draw_stock_page(&user, &products, Some(message), &form);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let outcome = state
        .store()
        .withdraw_stock(withdrawal.product_id, withdrawal.quantity)
        .await?;

    match outcome {
        WithdrawOutcome::Withdrawn => {
            tracing::info!(
                user = %user.username(),
                product_id = withdrawal.product_id,
                quantity = withdrawal.quantity.get(),
                "stock withdrawn"
            );
            Ok(Redirect::to("/").into_response())
        }
        WithdrawOutcome::InsufficientStock => {
            tracing::info!(
                product_id = withdrawal.product_id,
                quantity = withdrawal.quantity.get(),
                "withdrawal refused: insufficient stock"
            );
            let products = state.store().list_products().await?;
            let message = shortfall_message(&products, &withdrawal);
            let page = pages::draw_stock_page(&user, &products, Some(&message), &form);
            Ok((StatusCode::CONFLICT, Html(page)).into_response())
        }
    }
}

/// Liveness check.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "stockroom" }))
}
