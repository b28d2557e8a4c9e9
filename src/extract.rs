/// Document-to-figures extraction pipeline
///
/// This module turns an uploaded financial document into revenue/expense
/// totals:
/// 1. Classify the upload by filename suffix
/// 2. Tabular files: locate revenue/expense columns and sum them
/// 3. PDF documents: extract text and scan for labeled amounts
///
/// Tabular extraction fails all-or-nothing for the document; text scanning
/// never fails on its own and defaults an unmatched figure to 0.
use crate::errors::AppError;
use crate::models::FinancialFigures;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use regex::Regex;
use std::io::Cursor;

/// Labels scanned for the revenue figure, in priority order.
const REVENUE_LABELS: &[&str] = &["Total Revenue", "Revenue", "Sales", "Income"];

/// Labels scanned for the expense figure, in priority order.
const EXPENSE_LABELS: &[&str] = &["Total Expenses", "Expenses", "Cost", "Spending"];

/// Amount token: digits with optional thousands separators and decimals.
const AMOUNT_PATTERN: &str = r"[\d,]+(?:\.\d+)?";

/// Upload classification by case-insensitive filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Csv,
    Spreadsheet,
    Pdf,
    Unsupported,
}

impl DocumentFormat {
    pub fn from_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".csv") {
            DocumentFormat::Csv
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            DocumentFormat::Spreadsheet
        } else if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else {
            DocumentFormat::Unsupported
        }
    }
}

/// Extract revenue/expense totals from an uploaded document.
///
/// Dispatches on [`DocumentFormat`]; every failure path is a
/// [`AppError::BadRequest`] so the caller rejects the upload rather than
/// serving a partial result.
pub fn extract_figures(file_name: &str, bytes: &[u8]) -> Result<FinancialFigures, AppError> {
    match DocumentFormat::from_name(file_name) {
        DocumentFormat::Csv => sum_csv(bytes),
        DocumentFormat::Spreadsheet => sum_workbook(bytes),
        DocumentFormat::Pdf => scan_pdf(bytes),
        DocumentFormat::Unsupported => Err(AppError::BadRequest(format!(
            "Unsupported file format: {}",
            file_name
        ))),
    }
}

/// Sum the revenue/expense columns of a CSV file.
fn sum_csv(bytes: &[u8]) -> Result<FinancialFigures, AppError> {
    let mut reader = ReaderBuilder::new().from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("File error: {}", e)))?
        .clone();
    let revenue_col = find_column(headers.iter(), "revenue")?;
    let expense_col = find_column(headers.iter(), "expense")?;

    let mut revenue = 0.0;
    let mut expense = 0.0;
    for record in reader.records() {
        let record = record.map_err(|e| AppError::BadRequest(format!("File error: {}", e)))?;
        revenue += parse_amount_cell(record.get(revenue_col).unwrap_or(""))?;
        expense += parse_amount_cell(record.get(expense_col).unwrap_or(""))?;
    }

    Ok(FinancialFigures { revenue, expense })
}

/// Sum the revenue/expense columns of the first worksheet of an XLS/XLSX
/// workbook.
fn sum_workbook(bytes: &[u8]) -> Result<FinancialFigures, AppError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::BadRequest(format!("File error: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::BadRequest("File error: workbook has no sheets".to_string()))?
        .map_err(|e| AppError::BadRequest(format!("File error: {}", e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| AppError::BadRequest("File error: empty worksheet".to_string()))?;
    let header_names = header.iter().map(|cell| match cell {
        Data::String(s) => s.as_str(),
        _ => "",
    });
    let revenue_col = find_column(header_names.clone(), "revenue")?;
    let expense_col = find_column(header_names, "expense")?;

    let mut revenue = 0.0;
    let mut expense = 0.0;
    for row in rows {
        revenue += numeric_cell(row.get(revenue_col))?;
        expense += numeric_cell(row.get(expense_col))?;
    }

    Ok(FinancialFigures { revenue, expense })
}

/// Locate a required column by case-insensitive header name.
fn find_column<'a>(
    headers: impl Iterator<Item = &'a str>,
    name: &str,
) -> Result<usize, AppError> {
    headers
        .enumerate()
        .find(|(_, header)| header.trim().eq_ignore_ascii_case(name))
        .map(|(idx, _)| idx)
        .ok_or_else(|| AppError::BadRequest(format!("File error: missing '{}' column", name)))
}

/// Coerce one tabular cell to a number. Empty cells contribute 0; anything
/// non-numeric fails the whole document.
fn parse_amount_cell(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .replace(',', "")
        .parse()
        .map_err(|_| AppError::BadRequest(format!("File error: non-numeric value '{}'", trimmed)))
}

/// Coerce one spreadsheet cell to a number.
fn numeric_cell(cell: Option<&Data>) -> Result<f64, AppError> {
    match cell {
        None | Some(Data::Empty) => Ok(0.0),
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(Data::String(s)) => parse_amount_cell(s),
        Some(other) => Err(AppError::BadRequest(format!(
            "File error: non-numeric cell '{}'",
            other
        ))),
    }
}

/// Extract the text of a PDF document and scan it for labeled amounts.
fn scan_pdf(bytes: &[u8]) -> Result<FinancialFigures, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::BadRequest(format!("File error: {}", e)))?;
    Ok(scan_text(&text))
}

/// Scan free text for revenue and expense totals.
///
/// Each figure is the first amount following a known label on the same line;
/// an unmatched figure is 0 rather than an error. Callers must not read a 0
/// here as "no financial activity confirmed".
pub fn scan_text(text: &str) -> FinancialFigures {
    FinancialFigures {
        revenue: scan_labeled_amount(text, REVENUE_LABELS),
        expense: scan_labeled_amount(text, EXPENSE_LABELS),
    }
}

/// First-match-wins labeled amount scan.
fn scan_labeled_amount(text: &str, labels: &[&str]) -> f64 {
    let pattern = format!("(?i)({}).*?({})", labels.join("|"), AMOUNT_PATTERN);
    let re = Regex::new(&pattern).unwrap();

    re.captures(text)
        .and_then(|caps| caps.get(2))
        .and_then(|amount| amount.as_str().replace(',', "").parse().ok())
        .unwrap_or(0.0)
}
