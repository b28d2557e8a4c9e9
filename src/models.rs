use serde::{Deserialize, Serialize};

// ============ Extraction Models ============

/// Revenue and expense totals recovered from an uploaded document.
///
/// Extraction is all-or-nothing: a document either yields both figures or an
/// error for the whole upload. There is no partially extracted state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialFigures {
    /// Total revenue, non-negative.
    pub revenue: f64,
    /// Total expenses, non-negative.
    pub expense: f64,
}

// ============ Derived Metrics ============

/// Solvency metrics derived from [`FinancialFigures`].
///
/// Recomputed on every request; never stored independently of the figures
/// they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Revenue minus expenses.
    pub profit: f64,
    /// Identical to profit in this model (not the current-assets definition).
    pub working_capital: f64,
    /// Profit over revenue; 0 whenever revenue is not positive. Not clamped.
    pub profit_margin: f64,
    /// Additive threshold score, always clamped to [0, 100].
    pub credit_score: i64,
}

// ============ AI Analysis Models ============

/// Narrative risk assessment, from the AI service or the simulated fallback.
///
/// Structurally identical in both cases; provenance is carried separately in
/// [`AnalysisSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    /// Risk classification, e.g. "Low"/"Medium"/"High".
    pub risk_level: String,
    /// Strategic recommendations; three expected, not enforced.
    pub recommendations: Vec<String>,
    /// Canonical English investor summary.
    pub summary_en: String,
    /// Summary in the requested target language.
    pub summary_localized: String,
}

/// Where an [`AiAnalysis`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Produced by the external AI completion service.
    Ai,
    /// Produced by the deterministic offline fallback.
    Simulated,
}

/// An [`AiAnalysis`] tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub analysis: AiAnalysis,
    pub source: AnalysisSource,
}

// ============ API Models ============

/// Response body for `POST /api/v1/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub working_capital: f64,
    /// Profit margin as a percentage, rounded to two decimals.
    pub profit_margin: f64,
    pub credit_score: i64,
    pub risk_level_display: String,
    pub cost_suggestions_display: Vec<String>,
    pub investor_report_display: String,
    pub risk_level_en: String,
    /// Fixed status marker.
    pub benchmark_status_en: String,
    pub cost_suggestions_en: Vec<String>,
    pub investor_report_en: String,
    /// Whether the narrative came from the AI service or the fallback.
    pub analysis_source: AnalysisSource,
}
