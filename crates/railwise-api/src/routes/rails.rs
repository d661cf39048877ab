//! Rail comparison, quoting and settlement endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use railwise_core::{FeeSchedule, Rail, RailError, RateTable};
use rails::{
    compare, crypto_details, generate_quote, progress_percentage, stage_index, stage_info,
    synthesize_failed_legs, synthesize_legs, CryptoLeg, CryptoTransactionDetails, NigerianBank,
    Quote, RailComparison, RatesSnapshot, Stage, SUPPORTED_BANKS,
};

use crate::dto::{ApiError, CompareQuery, QuoteRequest, StageResponse, TransferRequest};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create rail routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rates", get(get_rates).put(put_rates))
        .route("/fees", get(get_fees))
        .route("/compare", get(compare_rails))
        .route("/quote", post(quote))
        .route("/legs", post(legs))
        .route("/transaction", post(transaction))
        .route("/stages", get(list_stages))
        .route("/stages/:stage", get(get_stage))
        .route("/banks", get(list_banks))
}

fn rail_error(err: RailError) -> (StatusCode, Json<ApiError>) {
    tracing::warn!(code = err.error_code(), "Rejected rail request: {}", err);
    (
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiError::from(&err)),
    )
}

fn bad_request(message: String) -> (StatusCode, Json<ApiError>) {
    tracing::warn!("Rejected malformed request: {}", message);
    (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message)))
}

fn parse_stage(name: &str) -> Result<Stage, (StatusCode, Json<ApiError>)> {
    name.parse::<Stage>().map_err(rail_error)
}

/// GET /rails/rates - Current rate table
pub async fn get_rates(State(state): State<AppState>) -> Json<RatesSnapshot> {
    Json(state.rates_snapshot().await)
}

/// PUT /rails/rates - Replace the rate table
pub async fn put_rates(
    State(state): State<AppState>,
    body: Result<Json<RateTable>, JsonRejection>,
) -> ApiResult<RatesSnapshot> {
    let Json(rates) = body.map_err(|e| bad_request(e.body_text()))?;
    let snapshot = state.set_rates(rates).await.map_err(rail_error)?;
    Ok(Json(snapshot))
}

/// GET /rails/fees - Per-rail fee schedule
pub async fn get_fees(State(state): State<AppState>) -> Json<FeeSchedule> {
    Json(state.config().await.fees)
}

/// GET /rails/compare?amount= - Compare all rails for a GBP amount
pub async fn compare_rails(
    State(state): State<AppState>,
    query: Result<Query<CompareQuery>, QueryRejection>,
) -> ApiResult<RailComparison> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;
    let amount = query
        .amount
        .ok_or_else(|| bad_request("Missing query parameter: amount".to_string()))?;

    let (rates, fees) = state.pricing().await;
    let comparison = compare(amount, &rates, &fees).map_err(rail_error)?;
    Ok(Json(comparison))
}

/// POST /rails/quote - Time-limited quote for one rail
pub async fn quote(
    State(state): State<AppState>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> ApiResult<Quote> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let rail = request.rail.parse::<Rail>().map_err(rail_error)?;

    let (rates, fees) = state.pricing().await;
    let quote =
        generate_quote(request.amount, rail, &rates, &fees, Utc::now()).map_err(rail_error)?;
    Ok(Json(quote))
}

/// POST /rails/legs - Settlement legs of a crypto transfer
pub async fn legs(
    State(state): State<AppState>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<[CryptoLeg; 4]> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let rail = request.rail.parse::<Rail>().map_err(rail_error)?;
    let stage = parse_stage(&request.stage)?;
    let failed_at = request.failed_at.as_deref().map(parse_stage).transpose()?;

    let (rates, fees) = state.pricing().await;
    let legs = match (stage, failed_at) {
        (Stage::Failed, Some(point)) => {
            synthesize_failed_legs(request.amount, rail, point, request.created_at, &rates, &fees)
        }
        (_, Some(_)) => Err(RailError::InvalidStage {
            reason: format!("failure point given for a transfer at {}", stage),
        }),
        (_, None) => synthesize_legs(
            request.amount,
            rail,
            stage,
            request.created_at,
            &rates,
            &fees,
        ),
    }
    .map_err(rail_error)?;

    Ok(Json(legs))
}

/// POST /rails/transaction - Crypto details of a transfer record
pub async fn transaction(
    State(state): State<AppState>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<CryptoTransactionDetails> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let rail = request.rail.parse::<Rail>().map_err(rail_error)?;
    let stage = parse_stage(&request.stage)?;
    let failed_at = request.failed_at.as_deref().map(parse_stage).transpose()?;

    let (rates, fees) = state.pricing().await;
    let details = crypto_details(
        request.amount,
        rail,
        stage,
        failed_at,
        request.created_at,
        &rates,
        &fees,
    )
    .map_err(rail_error)?;

    Ok(Json(details))
}

fn stage_response(name: &str) -> StageResponse {
    let info = stage_info(name);
    StageResponse {
        stage: name.to_string(),
        index: stage_index(name),
        progress_percentage: progress_percentage(name),
        label: info.label,
        description: info.description,
    }
}

/// GET /rails/stages - Every stage with progress and display text
pub async fn list_stages() -> Json<Vec<StageResponse>> {
    Json(
        Stage::ALL
            .iter()
            .map(|stage| stage_response(stage.as_str()))
            .collect(),
    )
}

/// GET /rails/stages/:stage - One stage; unknown names are echoed back
pub async fn get_stage(Path(name): Path<String>) -> Json<StageResponse> {
    Json(stage_response(&name))
}

/// GET /rails/banks - Banks that can receive NGN payouts
pub async fn list_banks() -> Json<[NigerianBank; 10]> {
    Json(SUPPORTED_BANKS)
}
