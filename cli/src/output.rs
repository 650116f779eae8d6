//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use survey_intake::{SurveyRecord, ZipCodeEntry};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
        }
    }

    pub fn print_surveys(&self, records: &[SurveyRecord]) {
        match self {
            OutputFormat::Table => {
                let rows: Vec<SurveyRow> = records.iter().map(SurveyRow::from).collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
            _ => self.print(&records),
        }
    }

    pub fn print_zip(&self, entry: &ZipCodeEntry) {
        match self {
            OutputFormat::Table => {
                println!("{}", Table::new([ZipRow::from(entry)]).with(Style::rounded()));
            }
            _ => self.print(entry),
        }
    }
}

#[derive(Tabled)]
struct SurveyRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Recommendation")]
    recommendation: &'static str,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&SurveyRecord> for SurveyRow {
    fn from(record: &SurveyRecord) -> Self {
        Self {
            id: record.id.value(),
            name: record.full_name(),
            email: record.fields.email.clone(),
            date: record.fields.survey_date.to_string(),
            recommendation: record.fields.recommendation.label(),
            location: format!("{}, {}", record.fields.city, record.fields.state),
        }
    }
}

#[derive(Tabled)]
struct ZipRow {
    #[tabled(rename = "ZIP")]
    zip: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&ZipCodeEntry> for ZipRow {
    fn from(entry: &ZipCodeEntry) -> Self {
        Self {
            zip: entry.zip.to_string(),
            city: entry.city.clone(),
            state: entry.state.clone(),
        }
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn field_error(field: &str, message: &str) {
    eprintln!("  {} {}", format!("{field}:").yellow(), message);
}
