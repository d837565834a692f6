use crate::application::ports::local_store::{LocalStore, PRINTER_SETTINGS_KEY};
use crate::domain::entities::printer::PrinterSettings;
use crate::domain::entities::Repair;
use crate::shared::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;

/// Characters per receipt line on the thermal roll.
const RECEIPT_WIDTH: usize = 32;

const LOGO_LINES: [&str; 2] = ["RepairDesk", "Device repair service"];
const FOOTER_LINES: [&str; 2] = ["Thank you for your trust!", "Repair time: 15-90 days"];

/// Formats repair records into fixed-width receipt text and keeps the
/// printer preferences. The rendering itself is pure; only the preference
/// lookup touches storage.
pub struct TicketService {
    store: Arc<dyn LocalStore>,
}

impl TicketService {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Stored preferences; unreadable or missing settings fall back to the
    /// defaults so printing always works.
    pub async fn settings(&self) -> Result<PrinterSettings, AppError> {
        match self.store.get(PRINTER_SETTINGS_KEY).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    warn!("printer settings unreadable, using defaults: {err}");
                    Ok(PrinterSettings::default())
                }
            },
            None => Ok(PrinterSettings::default()),
        }
    }

    pub async fn update_settings(&self, settings: &PrinterSettings) -> Result<(), AppError> {
        let json = serde_json::to_string(settings)?;
        self.store.set(PRINTER_SETTINGS_KEY, &json).await
    }

    pub async fn render(&self, repair: &Repair) -> Result<String, AppError> {
        let settings = self.settings().await?;
        Ok(render_ticket(repair, &settings))
    }
}

/// Builds the receipt body for one record.
pub fn render_ticket(repair: &Repair, settings: &PrinterSettings) -> String {
    let divider = "-".repeat(RECEIPT_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    if settings.show_logo {
        for line in LOGO_LINES {
            lines.push(center(line));
        }
    }

    if !settings.custom_header.is_empty() {
        lines.push(divider.clone());
        for line in settings.custom_header.lines() {
            lines.push(center(line.trim()));
        }
    }

    lines.push(divider.clone());

    lines.push(format!("Repair #: {}", repair.repair_number));
    lines.push(format!("Date: {}", format_date(repair.received_date)));
    lines.push(format!(
        "Status: {}",
        repair.status.as_str().to_uppercase()
    ));
    lines.push(divider.clone());

    lines.push("CLIENT".to_string());
    lines.push(format!(
        "Name: {} {}",
        repair.client.name, repair.client.surname
    ));
    lines.push(format!("Phone: {}", repair.client.phone));
    if !repair.client.email.is_empty() {
        lines.push(clip(&format!("Email: {}", repair.client.email)));
    }
    lines.push(divider.clone());

    lines.push("DEVICE".to_string());
    lines.push(format!("Article: {}", repair.article));
    lines.push(format!("Brand: {}", repair.brand));
    lines.push(format!("Model: {}", repair.model));
    if !repair.serial_imei.is_empty() {
        lines.push(format!("Serial/IMEI: {}", repair.serial_imei));
    }
    lines.push(divider.clone());

    lines.push("REPORTED PROBLEM".to_string());
    lines.extend(wrap(&repair.problem));
    lines.push(divider.clone());

    lines.push(format!(
        "Warranty: {}",
        if repair.warranty { "YES" } else { "NO" }
    ));
    lines.push(format!(
        "Budget requested: {}",
        if repair.request_budget { "YES" } else { "NO" }
    ));
    if let Some(delivered) = repair.delivery_date {
        lines.push(format!("Delivered: {}", format_date(delivered)));
    }

    if settings.show_footer {
        lines.push(divider.clone());
        for line in FOOTER_LINES {
            lines.push(center(line));
        }
    }

    if !settings.custom_footer.is_empty() {
        lines.push(divider);
        for line in settings.custom_footer.lines() {
            lines.push(center(line.trim()));
        }
    }

    // Paper feed so the tear-off line clears the print head.
    lines.push("\n\n".to_string());

    lines.join("\n")
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn center(text: &str) -> String {
    let padding = RECEIPT_WIDTH.saturating_sub(text.chars().count());
    format!("{}{}", " ".repeat(padding / 2), text)
}

fn clip(text: &str) -> String {
    if text.chars().count() <= RECEIPT_WIDTH {
        return text.to_string();
    }
    let clipped: String = text.chars().take(RECEIPT_WIDTH - 3).collect();
    format!("{clipped}...")
}

fn wrap(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= RECEIPT_WIDTH {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
