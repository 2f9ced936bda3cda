//! Order handlers (spec.md S6 "Engine — consumed by HTTP, simulator, demo
//! worker").

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::matching::book::OrderBookSnapshot;
use crate::models::{OrderSide, OrderStatus, OrderType};
use crate::utils::response::ApiResponse;

use super::super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct TradeDto {
    pub trade_id: Uuid,
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub status: OrderStatus,
    pub timestamp: i64,
    pub trades: Vec<TradeDto>,
}

pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<Json<ApiResponse<PlaceOrderResponse>>, ExchangeError> {
    let new_order = crate::models::NewOrder {
        id: None,
        symbol: req.symbol,
        side: req.side,
        order_type: req.order_type,
        quantity: req.quantity,
        price: req.price,
        timestamp: None,
    };

    let outcome = state.engine.place_order(new_order)?;

    let status = if outcome.order.is_filled() {
        OrderStatus::Filled
    } else if outcome.trades.is_empty() {
        OrderStatus::Active
    } else {
        OrderStatus::Partial
    };

    let response = PlaceOrderResponse {
        order_id: outcome.order.id,
        symbol: outcome.order.symbol.clone(),
        side: outcome.order.side,
        order_type: outcome.order.order_type,
        quantity: outcome.order.original_quantity,
        price: outcome.order.price,
        status,
        timestamp: outcome.order.timestamp,
        trades: outcome
            .trades
            .iter()
            .map(|t| TradeDto {
                trade_id: t.id,
                quantity: t.quantity,
                price: t.price,
            })
            .collect(),
    };

    Ok(Json(ApiResponse::success(response)))
}

pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ExchangeError> {
    state.engine.cancel_order(id)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn get_order_book(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<OrderBookSnapshot>>, ExchangeError> {
    let snapshot = state.engine.get_order_book(&symbol)?;
    Ok(Json(ApiResponse::success(snapshot)))
}
