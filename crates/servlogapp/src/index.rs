//! # Referring to Drafts and Logs
//!
//! Drafts and logs are identified by UUIDs, which nobody wants to type. The
//! CLI therefore accepts a [`Selector`]:
//!
//! - **Index**: `N`, the 1-based position in the full collection (`1` is the
//!   newest). Positions come from the unfiltered store, so `servlog log show 2`
//!   means the same log whether or not a filter is active.
//! - **Id**: a full UUID.
//! - **Prefix**: the first 4 or more characters of a UUID, if exactly one
//!   record matches.
//!
//! Inputs made only of digits are always read as indexes.
//!
//! [`index_drafts`] and [`index_logs`] pair each record with its display
//! index. List commands always go through them, never through a manual
//! enumerate, so the numbers users see are the numbers selectors accept.

use crate::drafts::DraftStore;
use crate::error::{Result, ServlogError};
use crate::logs::LogStore;
use crate::model::{ServiceDraft, ServiceLog};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const MIN_PREFIX_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Index(usize),
    Id(Uuid),
    Prefix(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(i) => write!(f, "{}", i),
            Selector::Id(id) => write!(f, "{}", id),
            Selector::Prefix(p) => write!(f, "{}…", p),
        }
    }
}

impl FromStr for Selector {
    type Err = ServlogError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(0) | Err(_) => Err(ServlogError::Selector(format!(
                    "Invalid index: {} (indexes start at 1)",
                    s
                ))),
                Ok(n) => Ok(Selector::Index(n)),
            };
        }
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(Selector::Id(id));
        }
        let is_prefix = s.len() >= MIN_PREFIX_LEN
            && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
        if is_prefix {
            return Ok(Selector::Prefix(s.to_ascii_lowercase()));
        }
        Err(ServlogError::Selector(format!(
            "Invalid selector: {:?} (use an index, an id, or an id prefix of at least {} characters)",
            s, MIN_PREFIX_LEN
        )))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayDraft {
    pub index: usize,
    pub active: bool,
    pub draft: ServiceDraft,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayLog {
    pub index: usize,
    pub log: ServiceLog,
}

pub fn index_drafts(drafts: &DraftStore) -> Vec<DisplayDraft> {
    let active = drafts.active_id();
    drafts
        .iter()
        .enumerate()
        .map(|(i, d)| DisplayDraft {
            index: i + 1,
            active: Some(d.id) == active,
            draft: d.clone(),
        })
        .collect()
}

pub fn display_draft(drafts: &DraftStore, id: &Uuid) -> Option<DisplayDraft> {
    let draft = drafts.get(id)?;
    let index = drafts.position(id)? + 1;
    Some(DisplayDraft {
        index,
        active: drafts.active_id() == Some(*id),
        draft: draft.clone(),
    })
}

pub fn index_logs(logs: &LogStore) -> Vec<DisplayLog> {
    logs.iter()
        .enumerate()
        .map(|(i, l)| DisplayLog {
            index: i + 1,
            log: l.clone(),
        })
        .collect()
}

pub fn display_log(logs: &LogStore, id: &Uuid) -> Option<DisplayLog> {
    let log = logs.get(id)?;
    let index = logs.position(id)? + 1;
    Some(DisplayLog {
        index,
        log: log.clone(),
    })
}

pub fn resolve_draft(drafts: &DraftStore, selector: &Selector) -> Result<Uuid> {
    match resolve(drafts.ids().iter().copied(), selector, "draft")? {
        Some(id) => Ok(id),
        None => match selector {
            Selector::Id(id) => Err(ServlogError::DraftNotFound(*id)),
            _ => Err(ServlogError::Selector(format!("No draft matches {}", selector))),
        },
    }
}

pub fn resolve_log(logs: &LogStore, selector: &Selector) -> Result<Uuid> {
    match resolve(logs.iter().map(|l| l.id), selector, "service log")? {
        Some(id) => Ok(id),
        None => match selector {
            Selector::Id(id) => Err(ServlogError::LogNotFound(*id)),
            _ => Err(ServlogError::Selector(format!(
                "No service log matches {}",
                selector
            ))),
        },
    }
}

fn resolve(
    mut ids: impl Iterator<Item = Uuid>,
    selector: &Selector,
    kind: &str,
) -> Result<Option<Uuid>> {
    match selector {
        Selector::Index(n) => Ok(ids.nth(n.saturating_sub(1))),
        Selector::Id(wanted) => Ok(ids.find(|id| id == wanted)),
        Selector::Prefix(prefix) => {
            let matches: Vec<Uuid> = ids
                .filter(|id| id.to_string().starts_with(prefix.as_str()))
                .collect();
            match matches.as_slice() {
                [] => Ok(None),
                [one] => Ok(Some(*one)),
                many => Err(ServlogError::Selector(format!(
                    "Ambiguous {} prefix {:?} matches {} records",
                    kind,
                    prefix,
                    many.len()
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::tests::sample_log;

    #[test]
    fn parses_selectors() {
        assert_eq!("3".parse::<Selector>().unwrap(), Selector::Index(3));
        assert_eq!(" 12 ".parse::<Selector>().unwrap(), Selector::Index(12));
        let id = Uuid::new_v4();
        assert_eq!(id.to_string().parse::<Selector>().unwrap(), Selector::Id(id));
        assert_eq!(
            "ABCD-e".parse::<Selector>().unwrap(),
            Selector::Prefix("abcd-e".into())
        );
    }

    #[test]
    fn rejects_bad_selectors() {
        assert!("0".parse::<Selector>().is_err());
        assert!("abc".parse::<Selector>().is_err());
        assert!("zzzzzz".parse::<Selector>().is_err());
        assert!("".parse::<Selector>().is_err());
    }

    #[test]
    fn indexes_follow_store_order() {
        let mut drafts = DraftStore::new();
        let a = drafts.create_draft().id;
        let b = drafts.create_draft().id;
        let listed = index_drafts(&drafts);
        assert_eq!(listed[0].draft.id, b);
        assert_eq!(listed[0].index, 1);
        assert!(listed[0].active);
        assert_eq!(listed[1].draft.id, a);
        assert!(!listed[1].active);

        assert_eq!(resolve_draft(&drafts, &Selector::Index(2)).unwrap(), a);
        assert!(resolve_draft(&drafts, &Selector::Index(3)).is_err());
    }

    #[test]
    fn resolves_by_id_and_prefix() {
        let mut logs = LogStore::new();
        let log = sample_log("A", "2024-01-01");
        let id = log.id;
        logs.add_log(log);

        assert_eq!(resolve_log(&logs, &Selector::Id(id)).unwrap(), id);
        let prefix = id.to_string()[..8].to_string();
        assert_eq!(resolve_log(&logs, &Selector::Prefix(prefix)).unwrap(), id);

        let missing = Uuid::new_v4();
        assert!(matches!(
            resolve_log(&logs, &Selector::Id(missing)),
            Err(ServlogError::LogNotFound(m)) if m == missing
        ));
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let mut logs = LogStore::new();
        for id in [
            "abcd0000-0000-4000-8000-000000000001",
            "abcd0000-0000-4000-8000-000000000002",
        ] {
            let mut log = sample_log("A", "2024-01-01");
            log.id = Uuid::parse_str(id).unwrap();
            logs.add_log(log);
        }

        let err = resolve_log(&logs, &"abcd".parse().unwrap());
        assert!(matches!(err, Err(ServlogError::Selector(m)) if m.contains("Ambiguous")));

        let still_ambiguous = resolve_log(&logs, &"abcd0000-0000-4000-8000-0000000000".parse().unwrap());
        assert!(still_ambiguous.is_err());
        let exact = "abcd0000-0000-4000-8000-000000000002";
        assert_eq!(
            resolve_log(&logs, &exact.parse().unwrap()).unwrap().to_string(),
            exact
        );
        assert!(resolve_log(&logs, &"ffff".parse().unwrap()).is_err());
    }
}
