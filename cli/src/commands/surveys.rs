//! Survey commands

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use survey_intake::{
    CampusLiked, FieldName, FormError, IntakeForm, SubmitOutcome, SurveyId, SyncError,
};

use super::{auto_fill_index, Context};
use crate::output;
use crate::SurveyCommands;

pub async fn handle(action: SurveyCommands, ctx: &Context) -> Result<(), String> {
    let sync = ctx.sync()?;

    match action {
        SurveyCommands::List => {
            let records = sync.list_all().await.map_err(|e| e.to_string())?;
            ctx.format.print_surveys(&records);
        }
        SurveyCommands::Get { id } => {
            let record = sync.fetch_by_id(SurveyId::new(id)).await.map_err(|e| e.to_string())?;
            ctx.format.print(&record);
        }
        SurveyCommands::Delete { id } => {
            sync.delete_by_id(SurveyId::new(id)).await.map_err(|e| e.to_string())?;
            output::success("Survey deleted successfully!");
        }
        SurveyCommands::Count => {
            let count = sync.count().await.map_err(|e| e.to_string())?;
            println!("{count}");
        }
        SurveyCommands::Submit { file, id, zips } => {
            let draft = read_draft(&file)?;
            let index = auto_fill_index(ctx.zip_dataset(zips).as_deref());
            let mut form = IntakeForm::new(Arc::new(index));

            if let Some(id) = id {
                sync.load_for_edit(&mut form, SurveyId::new(id))
                    .await
                    .map_err(|e| e.to_string())?;
            }
            replay(&mut form, &draft)?;

            match sync.submit(&mut form).await {
                Ok(SubmitOutcome::Failed(err)) => return Err(failure_message(&form, &err)),
                Ok(outcome) => {
                    output::success(form.success_message().unwrap_or("Survey saved"));
                    if let Some(record) = outcome.record() {
                        ctx.format.print(record);
                    }
                }
                Err(FormError::Invalid(_)) => {
                    for field in FieldName::ALL {
                        if let Some(message) = form.visible_error_message(field) {
                            output::field_error(field.as_str(), &message);
                        }
                    }
                    return Err(form.error_message().unwrap_or_default().to_string());
                }
                Err(err) => return Err(err.to_string()),
            }
        }
    }
    Ok(())
}

/// User-facing text for a failed sync; the cause only goes to the log.
fn failure_message(form: &IntakeForm, err: &SyncError) -> String {
    tracing::debug!(error = %err, "submit failed");
    form.error_message().unwrap_or(err.user_message()).to_string()
}

/// Draft file: camelCase field name → raw value
fn read_draft(path: &Path) -> Result<BTreeMap<FieldName, Value>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    let raw: BTreeMap<String, Value> = serde_json::from_str(&content).map_err(|e| e.to_string())?;

    raw.into_iter()
        .map(|(key, value)| {
            key.parse::<FieldName>()
                .map(|field| (field, value))
                .map_err(|e| e.to_string())
        })
        .collect()
}

/// Type the draft into the form in form order, blurring the ZIP field as a
/// user would. Fields absent from the draft keep their current value.
fn replay(form: &mut IntakeForm, draft: &BTreeMap<FieldName, Value>) -> Result<(), String> {
    for (&field, value) in draft {
        match (field, value) {
            (FieldName::CampusLiked, Value::Array(tags)) => {
                let wanted: Vec<CampusLiked> = tags
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|tag| tag.parse().ok())
                    .collect();
                for category in CampusLiked::ALL {
                    if form.is_category_selected(category) != wanted.contains(&category) {
                        form.toggle_category(category).map_err(|e| e.to_string())?;
                    }
                }
            }
            (field, value) => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                form.edit_field(field, &text).map_err(|e| e.to_string())?;
            }
        }

        if field == FieldName::ZipCode {
            form.blur_zip().map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}
