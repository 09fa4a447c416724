//! BOM Import Handlers
//!
//! Accepts spreadsheet uploads and pasted clipboard text, classifies them
//! into a Block → Section → Item tree, and flattens selections into lines.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use execbom_models::{BomData, BomSummary};
use execbom_utils::bom::{
    classify_with_report, BomFormat, BomLine, BomValidator, ClassificationReport, GridDecoder,
    SelectionExtractor, UuidGenerator, ValidationResult,
};
use execbom_utils::{validate_file_size, validate_file_type, validate_model, ErrorResponse, ExecBomError, ExecBomResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::AppState;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Result of importing a file or pasted text
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub source: String,
    pub format: String,
    pub total_rows: usize,
    pub bom: BomData,
    pub summary: BomSummary,
    pub report: ClassificationReport,
    pub validation: ValidationResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportFileQuery {
    /// Overrides detection from the file name: xlsx, xls, csv or txt.
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasteImportRequest {
    #[validate(length(max = 4194304, message = "Pasted text exceeds 4 MiB"))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LinesRequest {
    pub bom: BomData,
    pub merge_duplicates: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<BomLine>,
    #[serde(serialize_with = "execbom_models::quantity::serialize")]
    pub total_qty: f64,
}

pub fn api_error(error: ExecBomError) -> ApiError {
    tracing::warn!(code = error.error_code(), error = %error, "BOM request failed");
    let status = StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(error)))
}

/// Explicit format first, then the file extension, then the part's content type.
pub fn resolve_format(
    explicit: Option<&str>,
    filename: &str,
    content_type: Option<&str>,
    allowed_extensions: &[String],
) -> ExecBomResult<BomFormat> {
    if let Some(name) = explicit {
        return name.parse();
    }

    if let Some(format) = BomFormat::from_extension(Path::new(filename)) {
        validate_file_type(filename, allowed_extensions)?;
        return Ok(format);
    }

    content_type
        .and_then(BomFormat::from_content_type)
        .ok_or_else(|| ExecBomError::unsupported_format(filename))
}

fn build_response(source: String, format: BomFormat, total_rows: usize, bom: BomData, report: ClassificationReport) -> ImportResponse {
    let validation = BomValidator::new().validate(&bom);

    tracing::info!(
        source = %source,
        %format,
        rows = total_rows,
        items = report.item_rows,
        valid = validation.is_valid,
        "BOM imported"
    );

    ImportResponse {
        source,
        format: format.to_string(),
        total_rows,
        summary: bom.summary(),
        bom,
        report,
        validation,
    }
}

/// Upload a spreadsheet and classify its first sheet
///
/// POST /api/v1/bom/import/file
pub async fn import_file(
    State(state): State<AppState>,
    Query(query): Query<ImportFileQuery>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| api_error(ExecBomError::validation("file", format!("Failed to read upload: {}", e))))?
        .ok_or_else(|| api_error(ExecBomError::validation("file", "No file provided")))?;

    let filename = field.file_name().map(|s| s.to_string()).unwrap_or_else(|| "upload".to_string());
    let content_type = field.content_type().map(|s| s.to_string());

    let format = resolve_format(
        query.format.as_deref(),
        &filename,
        content_type.as_deref(),
        &state.config.import.allowed_extensions,
    )
    .map_err(api_error)?;

    let data = field
        .bytes()
        .await
        .map_err(|e| api_error(ExecBomError::validation("file", format!("Failed to read file data: {}", e))))?;
    validate_file_size(data.len() as u64, state.config.server.max_request_size as u64).map_err(api_error)?;

    let max_rows = state.config.import.max_rows;
    let name = filename.clone();
    let (total_rows, bom, report) = tokio::task::spawn_blocking(move || -> ExecBomResult<_> {
        let grid = GridDecoder::new().with_max_rows(max_rows).decode(&name, &data, Some(format))?;
        let (bom, report) = classify_with_report(&grid, UuidGenerator);
        Ok((grid.len(), bom, report))
    })
    .await
    .map_err(|e| api_error(ExecBomError::internal(format!("Import task failed: {}", e))))?
    .map_err(api_error)?;

    Ok(Json(build_response(filename, format, total_rows, bom, report)))
}

/// Classify text pasted from a spreadsheet
///
/// POST /api/v1/bom/import/text
pub async fn import_text(
    State(state): State<AppState>,
    Json(request): Json<PasteImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    validate_model(&request).map_err(api_error)?;

    let grid = GridDecoder::new()
        .with_max_rows(state.config.import.max_rows)
        .decode_text(&request.text)
        .map_err(api_error)?;
    let (bom, report) = classify_with_report(&grid, UuidGenerator);

    Ok(Json(build_response("paste".to_string(), BomFormat::Text, grid.len(), bom, report)))
}

/// Flatten the selected items of a tree into lines
///
/// POST /api/v1/bom/lines
pub async fn extract_lines(
    State(state): State<AppState>,
    Json(request): Json<LinesRequest>,
) -> Json<LinesResponse> {
    let merge = request.merge_duplicates.unwrap_or(state.config.import.merge_duplicate_lines);
    let lines = SelectionExtractor::new().with_merge_duplicates(merge).extract(&request.bom);
    let total_qty: f64 = lines.iter().map(|l| l.qty).sum();

    Json(LinesResponse { lines, total_qty })
}
