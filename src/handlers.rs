use crate::analysis::{AnalysisRequest, RiskAnalyzer};
use crate::config::Config;
use crate::crypto::FieldCipher;
use crate::db_storage::{AnalysisStorage, NewAnalysisRecord};
use crate::errors::AppError;
use crate::models::AnalyzeResponse;
use crate::{extract, metrics, report};
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: SqlitePool,
    /// Application configuration.
    pub config: Config,
    /// Risk analyzer; owns the optional AI client.
    pub analyzer: RiskAnalyzer,
    /// Process-wide cipher for encryption at rest.
    pub cipher: Arc<FieldCipher>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "finhealth-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/analyze
///
/// Accepts a multipart upload with a required `file` part and optional
/// `industry`/`lang` fields, runs the document-to-metrics pipeline, obtains
/// the AI risk assessment (or its simulated fallback), stores an encrypted
/// audit record, and returns the composed analysis.
///
/// Only a missing file or an unparseable document rejects the request; AI and
/// storage failures degrade gracefully and never surface as errors.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `multipart` - The multipart form payload.
///
/// # Returns
///
/// * `Result<Json<AnalyzeResponse>, AppError>` - The analysis or a 400 rejection.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut industry = "Services".to_string();
    let mut lang = "en".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file part: {}", e))
                })?;
                upload = Some((file_name, data));
            }
            "industry" => {
                industry = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read industry field: {}", e))
                })?;
            }
            "lang" => {
                lang = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read lang field: {}", e))
                })?;
            }
            _ => {}
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    tracing::info!(
        "POST /analyze - file: {}, industry: {}, lang: {}",
        file_name,
        industry,
        lang
    );

    // 1. Math layer
    let figures = extract::extract_figures(&file_name, &data)?;
    let metrics = metrics::derive_metrics(&figures);

    // 2. Intelligence layer
    let assessment = state
        .analyzer
        .assess(&AnalysisRequest {
            industry: &industry,
            lang: &lang,
            revenue: figures.revenue,
            expense: figures.expense,
            profit: metrics.profit,
        })
        .await;

    // 3. Secure storage, fire-and-forget relative to the response
    let storage = AnalysisStorage::new(state.db.clone());
    let record = NewAnalysisRecord {
        industry: &industry,
        revenue: figures.revenue,
        profit: metrics.profit,
        risk_level: &assessment.analysis.risk_level,
        ai_summary: &assessment.analysis.summary_en,
    };
    match storage.store_analysis(&state.cipher, &record).await {
        Ok(id) => tracing::info!("Encrypted analysis record stored: {}", id),
        Err(e) => tracing::error!("Failed to store analysis record: {}", e),
    }

    // 4. Prepare response
    let report = report::compose_reports(&lang, &metrics, figures.revenue, &assessment.analysis);

    Ok(Json(AnalyzeResponse {
        revenue: figures.revenue,
        expense: figures.expense,
        profit: metrics.profit,
        working_capital: metrics.working_capital,
        profit_margin: metrics::margin_percentage(&metrics),
        credit_score: metrics.credit_score,
        risk_level_display: assessment.analysis.risk_level.clone(),
        cost_suggestions_display: assessment.analysis.recommendations.clone(),
        investor_report_display: report.display,
        risk_level_en: assessment.analysis.risk_level.clone(),
        benchmark_status_en: "AI Analyzed".to_string(),
        cost_suggestions_en: assessment.analysis.recommendations.clone(),
        investor_report_en: report.english,
        analysis_source: assessment.source,
    }))
}
