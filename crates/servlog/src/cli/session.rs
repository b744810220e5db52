//! # Interactive Session
//!
//! `servlog session` is a line-oriented editor over the same API the one-shot
//! commands use. What it adds is time: the process stays up, so the autosave
//! debounce runs for real. Every edit (re)arms the draft's quiet period, and
//! the loop settles drafts as their deadlines pass.
//!
//! The loop runs on a current-thread tokio runtime and waits on two things at
//! once: the next input line, and the earliest autosave deadline. At end of
//! input (or `quit`) every pending save is flushed.
//!
//! Destructive commands ask first; the next line answers the question.

use super::handlers::filter_date;
use super::prompt::is_yes;
use super::render::{self, View};
use super::setup::OutputFormat;
use anyhow::{bail, Result};
use colored::Colorize;
use servlogapp::api::ServlogApi;
use servlogapp::commands::{CmdMessage, CmdResult};
use servlogapp::filters::TypeFilter;
use servlogapp::store::DataStore;
use std::io::{IsTerminal, Write};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

const HELP: &str = "\
Drafts:
  new                      create a draft and make it active
  list                     list drafts (* marks the active one)
  select SEL               make a draft active
  set FIELD VALUE          edit the active draft (empty VALUE clears)
  show [SEL]               show a draft with its errors
  check [SEL]              validate a draft
  delete [SEL]             delete a draft
  clear                    delete every draft
  promote                  turn the active draft into a service log
Service logs:
  logs                     list logs with the current filters
  log SEL                  show one log
  edit SEL FIELD VALUE     change one field of a log
  rmlog SEL                delete a log
Filters:
  search [TEXT]            text filter (no TEXT clears it)
  type all|planned|unplanned|emergency
  from [DATE], to [DATE]   start-date bounds (no DATE clears)
  filters                  show the current filters
  reset                    clear all filters
Other:
  help, quit";

/// A destructive command waiting for its yes/no.
#[derive(Debug, Clone, PartialEq)]
enum Pending {
    DeleteDraft(Uuid),
    ClearDrafts,
    DeleteLog(Uuid),
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

struct Session {
    pending: Option<Pending>,
    interactive: bool,
}

pub fn run<S: DataStore>(api: &mut ServlogApi<S>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(api))
}

async fn session_loop<S: DataStore>(api: &mut ServlogApi<S>) -> Result<()> {
    let mut session = Session {
        pending: None,
        interactive: std::io::stdin().is_terminal(),
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if session.interactive {
        println!("servlog session. Type `help` for commands, `quit` to leave.");
    }

    loop {
        session.prompt();
        let deadline = api.next_autosave_deadline();

        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if session.handle(api, &line) == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = wait_until(deadline) => {
                session.autosave(api);
            }
        }
    }

    let flushed = api.flush_autosave()?;
    tracing::debug!(count = flushed.len(), "session ended, pending saves flushed");
    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending::<()>().await,
    }
}

impl Session {
    fn prompt(&self) {
        if self.interactive {
            print!("{} ", ">".dimmed());
            let _ = std::io::stdout().flush();
        }
    }

    fn autosave<S: DataStore>(&self, api: &mut ServlogApi<S>) {
        match api.run_autosave(Instant::now()) {
            Ok(saved) if !saved.is_empty() && self.interactive => {
                // Clear the prompt we already printed.
                println!("\r{}", format!("saved {} draft(s)", saved.len()).dimmed());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "autosave failed, will retry"),
        }
    }

    fn handle<S: DataStore>(&mut self, api: &mut ServlogApi<S>, line: &str) -> Flow {
        let outcome = match self.pending.take() {
            Some(pending) => answer(api, pending, is_yes(line)).map(|r| (r, View::Drafts)),
            None => {
                let line = line.trim();
                if line.is_empty() {
                    return Flow::Continue;
                }
                let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                match cmd {
                    "quit" | "exit" | "q" => return Flow::Quit,
                    "help" | "?" => {
                        println!("{}", HELP);
                        return Flow::Continue;
                    }
                    _ => self.dispatch(api, cmd, rest.trim()),
                }
            }
        };

        match outcome {
            Ok((result, view)) => {
                print!("{}", render::render_result(&result, view, OutputFormat::Text));
            }
            Err(e) => eprintln!("Error: {}", e),
        }
        Flow::Continue
    }

    fn dispatch<S: DataStore>(
        &mut self,
        api: &mut ServlogApi<S>,
        cmd: &str,
        rest: &str,
    ) -> Result<(CmdResult, View)> {
        let arg = if rest.is_empty() { None } else { Some(rest) };
        let out = match cmd {
            "new" => (api.create_draft()?, View::Drafts),
            "list" | "ls" => {
                let result = api.list_drafts();
                if result.listed_drafts.is_empty() {
                    print!("{}", render::render_draft_list(&[]));
                }
                (result, View::Drafts)
            }
            "select" => (api.select_draft(required(arg, "select SEL")?)?, View::Drafts),
            "set" => {
                let (field, value) = split_field(rest, "set FIELD VALUE")?;
                (api.set_draft_field(None, field, value)?, View::Drafts)
            }
            "show" => (api.show_draft(arg)?, View::DraftDetail),
            "check" => (api.check_draft(arg)?, View::Drafts),
            "delete" | "rm" => {
                let target = api.show_draft(arg)?;
                match target.listed_drafts.first() {
                    Some(shown) => {
                        self.ask(
                            &format!("Delete {}?", render::draft_label(shown)),
                            Pending::DeleteDraft(shown.draft.id),
                        );
                        (CmdResult::default(), View::Drafts)
                    }
                    None => (CmdResult::default(), View::Drafts),
                }
            }
            "clear" => {
                let count = api.state().drafts.len();
                if count == 0 {
                    (api.clear_drafts()?, View::Drafts)
                } else {
                    self.ask(&format!("Delete all {} drafts?", count), Pending::ClearDrafts);
                    (CmdResult::default(), View::Drafts)
                }
            }
            "promote" => (api.promote(), View::Logs),
            "logs" => {
                let result = api.list_logs();
                if result.listed_logs.is_empty() {
                    print!("{}", render::render_no_logs(!api.filters().is_default()));
                }
                (result, View::Logs)
            }
            "log" => (api.show_log(required(arg, "log SEL")?)?, View::LogDetail),
            "edit" => {
                let (selector, assignment) = split_field(rest, "edit SEL FIELD VALUE")?;
                let (field, value) = split_field(assignment, "edit SEL FIELD VALUE")?;
                let assignment = format!("{}={}", field, value);
                (api.edit_log(selector, &[assignment])?, View::Logs)
            }
            "rmlog" => {
                let target = api.show_log(required(arg, "rmlog SEL")?)?;
                if let Some(shown) = target.listed_logs.first() {
                    self.ask(
                        &format!("Delete {}?", render::log_label(shown)),
                        Pending::DeleteLog(shown.log.id),
                    );
                }
                (CmdResult::default(), View::Logs)
            }
            "search" => {
                api.set_search(rest);
                (filters_notice(api), View::Logs)
            }
            "type" => {
                let filter: TypeFilter = required(arg, "type all|planned|unplanned|emergency")?.parse()?;
                api.set_type_filter(filter);
                (filters_notice(api), View::Logs)
            }
            "from" => {
                api.set_start_from(arg.map(filter_date).transpose()?);
                (filters_notice(api), View::Logs)
            }
            "to" => {
                api.set_start_to(arg.map(filter_date).transpose()?);
                (filters_notice(api), View::Logs)
            }
            "filters" => (filters_notice(api), View::Logs),
            "reset" => {
                api.clear_filters();
                (filters_notice(api), View::Logs)
            }
            other => bail!("Unknown command: {} (try `help`)", other),
        };
        Ok(out)
    }

    fn ask(&mut self, question: &str, pending: Pending) {
        println!("{} [y/N]", question);
        self.pending = Some(pending);
    }
}

fn answer<S: DataStore>(api: &mut ServlogApi<S>, pending: Pending, yes: bool) -> Result<CmdResult> {
    if !yes {
        return Ok(CmdResult::default().with_message(CmdMessage::info("Cancelled.")));
    }
    let result = match pending {
        Pending::DeleteDraft(id) => api.delete_draft_by_id(id)?,
        Pending::ClearDrafts => api.clear_drafts()?,
        Pending::DeleteLog(id) => api.delete_log(&id.to_string())?,
    };
    Ok(result)
}

fn required<'a>(arg: Option<&'a str>, usage: &str) -> Result<&'a str> {
    match arg {
        Some(a) => Ok(a),
        None => bail!("Usage: {}", usage),
    }
}

/// Splits "FIELD rest of line". The value may be empty or contain spaces.
fn split_field<'a>(rest: &'a str, usage: &str) -> Result<(&'a str, &'a str)> {
    let rest = rest.trim_start();
    if rest.is_empty() {
        bail!("Usage: {}", usage);
    }
    let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((field, value.trim_start()))
}

fn filters_notice<S: DataStore>(api: &ServlogApi<S>) -> CmdResult {
    let f = api.filters();
    let describe = |v: Option<&str>| v.unwrap_or("-").to_string();
    let summary = format!(
        "search: {:?}, type: {}, from: {}, to: {}",
        f.search(),
        f.service_type(),
        describe(f.start_from()),
        describe(f.start_to())
    );
    CmdResult::default().with_message(CmdMessage::info("Filters").with_description(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use servlogapp::autosave::DEFAULT_DELAY;
    use servlogapp::model::SavingStatus;
    use servlogapp::store::memory::InMemoryStore;

    fn setup() -> (Session, ServlogApi<InMemoryStore>) {
        colored::control::set_override(false);
        let session = Session {
            pending: None,
            interactive: false,
        };
        (session, ServlogApi::new(InMemoryStore::new(), DEFAULT_DELAY))
    }

    #[test]
    fn split_field_keeps_spaces_in_value() {
        assert_eq!(
            split_field("serviceDescription Oil and filter", "x").unwrap(),
            ("serviceDescription", "Oil and filter")
        );
        assert_eq!(split_field("odometer", "x").unwrap(), ("odometer", ""));
        assert!(split_field("  ", "x").is_err());
    }

    #[test]
    fn set_arms_autosave_and_quit_stops() {
        let (mut session, mut api) = setup();
        session.handle(&mut api, "new");
        session.handle(&mut api, "set carId TRUCK-9");
        assert_eq!(api.pending_autosaves(), 1);
        let draft = api.state().drafts.active().unwrap();
        assert_eq!(draft.car_id, "TRUCK-9");
        assert_eq!(draft.saving_status, SavingStatus::Saving);
        assert_eq!(session.handle(&mut api, "quit"), Flow::Quit);
    }

    #[test]
    fn delete_waits_for_an_answer() {
        let (mut session, mut api) = setup();
        session.handle(&mut api, "new");
        let id = api.state().drafts.active_id().unwrap();

        session.handle(&mut api, "delete");
        assert_eq!(session.pending, Some(Pending::DeleteDraft(id)));
        assert!(api.state().drafts.get(&id).is_some());

        // Anything but yes cancels.
        session.handle(&mut api, "no");
        assert!(session.pending.is_none());
        assert!(api.state().drafts.get(&id).is_some());

        session.handle(&mut api, "delete 1");
        session.handle(&mut api, "y");
        assert!(api.state().drafts.get(&id).is_none());
        assert_eq!(api.pending_autosaves(), 0);
    }

    #[test]
    fn filters_are_session_state() {
        let (mut session, mut api) = setup();
        session.handle(&mut api, "type planned");
        session.handle(&mut api, "from 2024-01-10");
        assert_eq!(api.filters().start_from(), Some("2024-01-10"));
        session.handle(&mut api, "from");
        assert_eq!(api.filters().start_from(), None);
        session.handle(&mut api, "reset");
        assert!(api.filters().is_default());
    }

    #[test]
    fn bad_input_does_not_end_the_session() {
        let (mut session, mut api) = setup();
        assert_eq!(session.handle(&mut api, "frobnicate"), Flow::Continue);
        assert_eq!(session.handle(&mut api, "from yesterday"), Flow::Continue);
        assert_eq!(session.handle(&mut api, "set odometer 5"), Flow::Continue);
        assert!(api.filters().is_default());
    }
}
