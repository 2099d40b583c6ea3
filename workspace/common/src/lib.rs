//! Common transport-layer types shared between the backend and external
//! frontends. The aggregation core produces these rows; the rendering
//! layer (charts, tables, JSON consumers) receives them as-is. No
//! currency formatting or styling happens here.

mod analytics;

pub use analytics::{
    AtRiskStage, CurvePoint, DailyProgressPoint, MonthlyAmount, ParetoRow, PortfolioKpis,
    ProgressVariance, ProjectSummaryRow, ProjectionPoint, VarianceStatus,
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// Error response body. For validation failures `fields` names the
/// offending request fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Offending field names, when the error is a validation error
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            fields: Vec::new(),
            success: false,
        }
    }

    pub fn validation(error: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            error: error.into(),
            code: "validation".to_string(),
            fields,
            success: false,
        }
    }
}
