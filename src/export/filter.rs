use chrono::NaiveDate;

use crate::export::error::ExportError;
use crate::form_data::FormData;
use crate::text_utils::sanitize_text_field;

pub const FIELD_TAG: &str = "tag";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DATE_FROM: &str = "date_from";
pub const FIELD_DATE_TO: &str = "date_to";
pub const FIELD_FILENAME: &str = "filename";

/// Export constraints after sanitization. Empty form fields become `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub tag: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub output_filename: Option<String>,
}

impl Filter {
    pub fn from_form(form: &FormData) -> Result<Filter, ExportError> {
        Ok(Filter {
            tag: text_field(form, FIELD_TAG),
            category: text_field(form, FIELD_CATEGORY),
            date_from: date_field(form, FIELD_DATE_FROM)?,
            date_to: date_field(form, FIELD_DATE_TO)?,
            output_filename: text_field(form, FIELD_FILENAME)
                .map(|name| name.replace(['"', '/', '\\'], ""))
                .filter(|name| !name.is_empty()),
        })
    }

    /// Download name: the operator's choice with a `.zip` extension, or today's date
    pub fn file_name(&self, today: NaiveDate) -> String {
        match self.output_filename {
            Some(ref name) if name.to_lowercase().ends_with(".zip") => name.clone(),
            Some(ref name) => format!("{}.zip", name),
            None => default_file_name(today),
        }
    }
}

pub fn default_file_name(today: NaiveDate) -> String {
    format!("{}.zip", today.format("%Y-%m-%d"))
}

fn text_field(form: &FormData, name: &str) -> Option<String> {
    let value = sanitize_text_field(form.get(name)?);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn date_field(form: &FormData, name: &str) -> Result<Option<NaiveDate>, ExportError> {
    let Some(value) = text_field(form, name) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ExportError::InvalidFilter(format!("{} must be a date in the YYYY-MM-DD format, got {}", name, value)))
}
