//! Command handlers, one module per subcommand.

pub mod board;
pub mod bulk;
pub mod create;
pub mod dups;
pub mod export;
pub mod import;
pub mod list;
pub mod stats;

use anyhow::Result;
use clap::Args;
use std::str::FromStr;

use corral_core::view::{CountFilter, FilterState, SortKey, SortOrder, SortState};
use corral_core::Priority;

/// Filter flags shared by every view-driven command.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Case-insensitive substring search.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter by category (repeatable; empty = all).
    #[arg(short, long)]
    pub category: Vec<String>,

    /// Filter by status (repeatable; empty = all).
    #[arg(long)]
    pub status: Vec<String>,

    /// Filter by priority: low, medium, high (repeatable; empty = all).
    #[arg(short, long)]
    pub priority: Vec<String>,

    /// Only records assigned to the configured current user.
    #[arg(long)]
    pub mine: bool,

    /// Only records with a next-action date before today.
    #[arg(long)]
    pub overdue: bool,

    /// Constrain contact count: any, none, has.
    #[arg(long, default_value = "any")]
    pub contacts: String,

    /// Constrain note count: any, none, has.
    #[arg(long, default_value = "any")]
    pub notes: String,
}

impl Default for FilterArgs {
    fn default() -> Self {
        Self {
            search: None,
            category: Vec::new(),
            status: Vec::new(),
            priority: Vec::new(),
            mine: false,
            overdue: false,
            contacts: "any".into(),
            notes: "any".into(),
        }
    }
}

impl FilterArgs {
    /// Build the core filter state, rejecting unknown enum values.
    pub fn to_state(&self) -> Result<FilterState> {
        let priorities = self
            .priority
            .iter()
            .map(|p| Priority::from_str(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FilterState {
            search: self.search.clone().unwrap_or_default(),
            categories: self.category.clone(),
            statuses: self.status.clone(),
            priorities,
            only_mine: self.mine,
            overdue_only: self.overdue,
            contact_count: CountFilter::from_str(&self.contacts)?,
            note_count: CountFilter::from_str(&self.notes)?,
        })
    }
}

/// Sort flags shared by view-driven commands.
#[derive(Args, Debug, Default)]
pub struct SortArgs {
    /// Sort key: label, priority, status, value, last-contact.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long)]
    pub desc: bool,
}

impl SortArgs {
    /// Build the core sort state, falling back to the configured default.
    pub fn to_state(&self, default_key: SortKey, default_order: SortOrder) -> Result<SortState> {
        let key = match self.sort.as_deref() {
            Some(raw) => SortKey::from_str(raw)?,
            None => default_key,
        };
        let order = if self.desc {
            SortOrder::Desc
        } else if self.sort.is_none() {
            default_order
        } else {
            SortOrder::Asc
        };
        Ok(SortState { key, order })
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterArgs, SortArgs};
    use corral_core::view::{CountFilter, SortKey, SortOrder};
    use corral_core::Priority;

    #[test]
    fn filter_args_default_is_match_all() {
        let state = FilterArgs::default().to_state().unwrap();
        assert_eq!(state, corral_core::view::FilterState::default());
    }

    #[test]
    fn filter_args_parse_enums() {
        let args = FilterArgs {
            priority: vec!["high".into(), "Medium".into()],
            contacts: "has".into(),
            notes: "none".into(),
            ..FilterArgs::default()
        };
        let state = args.to_state().unwrap();
        assert_eq!(state.priorities, [Priority::High, Priority::Medium]);
        assert_eq!(state.contact_count, CountFilter::Has);
        assert_eq!(state.note_count, CountFilter::None);

        let bad = FilterArgs {
            priority: vec!["urgent".into()],
            contacts: "any".into(),
            notes: "any".into(),
            ..FilterArgs::default()
        };
        assert!(bad.to_state().is_err());
    }

    #[test]
    fn sort_args_fall_back_to_defaults() {
        let state = SortArgs::default()
            .to_state(SortKey::Priority, SortOrder::Desc)
            .unwrap();
        assert_eq!(state.key, SortKey::Priority);
        assert_eq!(state.order, SortOrder::Desc);

        let explicit = SortArgs {
            sort: Some("value".into()),
            desc: false,
        };
        let state = explicit
            .to_state(SortKey::Priority, SortOrder::Desc)
            .unwrap();
        assert_eq!(state.key, SortKey::Value);
        assert_eq!(state.order, SortOrder::Asc);
    }
}
