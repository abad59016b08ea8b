//! Payment receipt rendering

use crate::{
    error::AppError,
    models::payment::{PaymentReceipt, PaymentRequest, PaymentStatus},
    services::payment_service::mask_account,
};
use chrono::SecondsFormat;
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 9.0;
// fits the 170 mm text column at 12 pt Helvetica
const MAX_LINE_CHARS: usize = 75;

/// Single-page A4 receipt. The account number is printed masked.
pub fn render_receipt(receipt: &PaymentReceipt, request: &PaymentRequest) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new(
        "Payment Receipt",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Receipt",
    );

    let title_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Internal(format!("Failed to load receipt font: {}", e)))?;
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(format!("Failed to load receipt font: {}", e)))?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text("Payment Receipt", 20.0, Mm(MARGIN_MM), Mm(y), &title_font);
    y -= LINE_HEIGHT_MM * 2.0;

    let status = match receipt.status {
        PaymentStatus::Success => "SUCCESS",
        PaymentStatus::Failed => "FAILED",
    };

    for line in [
        format!("Transaction ID: {}", receipt.transaction_id),
        format!("Status: {}", status),
        format!("Message: {}", receipt.message),
        format!(
            "Date: {}",
            receipt.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        format!("Account: {}", mask_account(&request.bank_account_number)),
        format!("Amount: {:.2}", request.amount),
        format!("Payment info: {}", request.payment_info),
    ] {
        for row in wrap_text(&line, MAX_LINE_CHARS) {
            layer.use_text(row, 12.0, Mm(MARGIN_MM), Mm(y), &body_font);
            y -= LINE_HEIGHT_MM;
        }
    }

    doc.save_to_bytes().map_err(|e| {
        tracing::error!("Failed to render receipt: {}", e);
        AppError::Internal(format!("Failed to render receipt: {}", e))
    })
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while !word.is_empty() {
            let used = current.chars().count();
            let sep = usize::from(used > 0);

            if used + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.drain(..));
            } else if used > 0 {
                lines.push(std::mem::take(&mut current));
            } else {
                current.extend(word.drain(..width));
                lines.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
