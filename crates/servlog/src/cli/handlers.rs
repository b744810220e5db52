//! Command handlers for the servlog CLI.
//!
//! Each handler calls the API, prints the rendered result and hands the
//! [`CmdResult`] back so the caller can pick the exit code. Handlers are
//! generic over the store, like the API itself.

use super::prompt::confirm;
use super::render::{self, View};
use super::setup::{DraftCommands, LogCommands, LogFilterArgs, OutputFormat};
use anyhow::{bail, Result};
use servlogapp::api::ServlogApi;
use servlogapp::commands::{CmdMessage, CmdResult};
use servlogapp::dates::is_iso_date;
use servlogapp::filters::TypeFilter;
use servlogapp::init::ServlogContext;
use servlogapp::store::DataStore;

pub fn print(result: &CmdResult, view: View, format: OutputFormat) {
    let out = render::render_result(result, view, format);
    match format {
        OutputFormat::Json => println!("{}", out),
        OutputFormat::Text => print!("{}", out),
    }
}

fn cancelled() -> CmdResult {
    CmdResult::default().with_message(CmdMessage::info("Cancelled."))
}

pub fn list_drafts<S: DataStore>(api: &ServlogApi<S>, format: OutputFormat) -> CmdResult {
    let result = api.list_drafts();
    if result.listed_drafts.is_empty() && format == OutputFormat::Text {
        print!("{}", render::render_draft_list(&[]));
    } else {
        print(&result, View::Drafts, format);
    }
    result
}

pub fn draft<S: DataStore>(
    api: &mut ServlogApi<S>,
    cmd: DraftCommands,
    format: OutputFormat,
) -> Result<CmdResult> {
    let (result, view) = match cmd {
        DraftCommands::New => (api.create_draft()?, View::Drafts),
        DraftCommands::List => return Ok(list_drafts(api, format)),
        DraftCommands::Show { selector } => {
            (api.show_draft(selector.as_deref())?, View::DraftDetail)
        }
        DraftCommands::Select { selector } => (api.select_draft(&selector)?, View::Drafts),
        DraftCommands::Set {
            field,
            value,
            draft,
        } => (
            api.set_draft_field(draft.as_deref(), &field, &value)?,
            View::Drafts,
        ),
        DraftCommands::Check { selector } => (api.check_draft(selector.as_deref())?, View::Drafts),
        DraftCommands::Delete { selector, confirm: c } => {
            // Resolve first, so a bad selector fails before the question.
            let target = api.show_draft(selector.as_deref())?;
            let label = target
                .listed_drafts
                .first()
                .map(render::draft_label)
                .unwrap_or_else(|| "this draft".to_string());
            let result = if confirm(&format!("Delete {}?", label), c.yes)? {
                match target.listed_drafts.first() {
                    Some(shown) => api.delete_draft_by_id(shown.draft.id)?,
                    None => CmdResult::default(),
                }
            } else {
                cancelled()
            };
            (result, View::Drafts)
        }
        DraftCommands::Clear { confirm: c } => {
            let count = api.state().drafts.len();
            let result = if count == 0 || confirm(&format!("Delete all {} drafts?", count), c.yes)? {
                api.clear_drafts()?
            } else {
                cancelled()
            };
            (result, View::Drafts)
        }
    };
    print(&result, view, format);
    Ok(result)
}

pub fn promote<S: DataStore>(api: &mut ServlogApi<S>, format: OutputFormat) -> CmdResult {
    let result = api.promote();
    print(&result, View::Logs, format);
    result
}

pub fn log<S: DataStore>(
    api: &mut ServlogApi<S>,
    cmd: LogCommands,
    format: OutputFormat,
) -> Result<CmdResult> {
    let (result, view) = match cmd {
        LogCommands::List(args) => {
            apply_filters(api, args)?;
            let result = api.list_logs();
            if result.listed_logs.is_empty() && format == OutputFormat::Text {
                print!("{}", render::render_no_logs(!api.filters().is_default()));
                return Ok(result);
            }
            (result, View::Logs)
        }
        LogCommands::Show { selector } => (api.show_log(&selector)?, View::LogDetail),
        LogCommands::Edit {
            selector,
            assignments,
        } => (api.edit_log(&selector, &assignments)?, View::Logs),
        LogCommands::Delete { selector, confirm: c } => {
            let target = api.show_log(&selector)?;
            let result = match target.listed_logs.first() {
                Some(shown) => {
                    if confirm(&format!("Delete {}?", render::log_label(shown)), c.yes)? {
                        api.delete_log(&shown.log.id.to_string())?
                    } else {
                        cancelled()
                    }
                }
                None => CmdResult::default(),
            };
            (result, View::Logs)
        }
    };
    print(&result, view, format);
    Ok(result)
}

fn apply_filters<S: DataStore>(api: &mut ServlogApi<S>, args: LogFilterArgs) -> Result<()> {
    if let Some(search) = args.search {
        api.set_search(search);
    }
    if let Some(service_type) = args.service_type {
        api.set_type_filter(service_type.parse::<TypeFilter>()?);
    }
    if let Some(from) = args.from {
        api.set_start_from(Some(filter_date(&from)?));
    }
    if let Some(to) = args.to {
        api.set_start_to(Some(filter_date(&to)?));
    }
    Ok(())
}

/// Filter bounds are compared as text, so anything but `YYYY-MM-DD` would
/// silently match the wrong logs.
pub fn filter_date(raw: &str) -> Result<String> {
    let value = raw.trim();
    if !is_iso_date(value) {
        bail!("Invalid date: {} (expected YYYY-MM-DD)", raw);
    }
    Ok(value.to_string())
}

pub fn config(ctx: &ServlogContext, format: OutputFormat) -> Result<()> {
    let config_file_found = ctx.config_path.exists();
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "config": ctx.config,
                "configFile": ctx.config_path,
                "configFileFound": config_file_found,
                "dataDir": ctx.data_dir,
                "document": ctx.api.location(),
            });
            println!("{}", render::render_json(&value));
        }
        OutputFormat::Text => {
            println!("autosave_delay_ms = {}", ctx.config.autosave_delay_ms);
            println!("root_key = {:?}", ctx.config.root_key);
            println!("data_dir = {:?}", ctx.data_dir.display().to_string());
            println!();
            println!(
                "config file: {}{}",
                ctx.config_path.display(),
                if config_file_found { "" } else { " (not found, using defaults)" }
            );
            println!("document: {}", ctx.api.location());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_dates_must_be_iso() {
        assert_eq!(filter_date(" 2024-01-10 ").unwrap(), "2024-01-10");
        assert!(filter_date("10/01/2024").is_err());
        assert!(filter_date("2024-1-10").is_err());
    }
}
