//! Per-record action menu.
//!
//! The menu is a single level: one optional context action chosen by the
//! record's value type, then Share, Copy, Delete and Cancel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::{DecodedRecord, RecordId, ValueType};

/// What a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Launch the display value in the browser (Url records only).
    OpenBrowser,
    /// Hand a `tel:` URI to the URL launcher (Phone records only).
    OpenDialer,
    Share,
    Copy,
    Delete,
    Cancel,
}

impl ActionKind {
    /// Button text shown in the action sheet.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::OpenBrowser => "Open in Browser",
            ActionKind::OpenDialer => "Open in Contacts",
            ActionKind::Share => "Share",
            ActionKind::Copy => "Copy",
            ActionKind::Delete => "Delete",
            ActionKind::Cancel => "Cancel",
        }
    }

    pub fn role(&self) -> ActionRole {
        match self {
            ActionKind::Delete => ActionRole::Destructive,
            ActionKind::Cancel => ActionRole::Cancel,
            _ => ActionRole::Default,
        }
    }

    /// Command-line spelling, e.g. `open-browser`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::OpenBrowser => "open-browser",
            ActionKind::OpenDialer => "open-dialer",
            ActionKind::Share => "share",
            ActionKind::Copy => "copy",
            ActionKind::Delete => "delete",
            ActionKind::Cancel => "cancel",
        }
    }

    /// The context action for a value type, if it has one.
    pub fn context_action(value_type: ValueType) -> Option<ActionKind> {
        match value_type {
            ValueType::Url => Some(ActionKind::OpenBrowser),
            ValueType::Phone => Some(ActionKind::OpenDialer),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open-browser" | "browser" => Ok(ActionKind::OpenBrowser),
            "open-dialer" | "dialer" | "open-contacts" => Ok(ActionKind::OpenDialer),
            "share" => Ok(ActionKind::Share),
            "copy" => Ok(ActionKind::Copy),
            "delete" => Ok(ActionKind::Delete),
            "cancel" => Ok(ActionKind::Cancel),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// Presentation role of a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionRole {
    Default,
    Destructive,
    Cancel,
}

/// One selectable entry, bound to the record it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuAction {
    pub record_id: RecordId,
    pub kind: ActionKind,
    pub label: String,
    pub role: ActionRole,
}

impl MenuAction {
    pub fn new(record_id: RecordId, kind: ActionKind) -> Self {
        Self {
            record_id,
            kind,
            label: kind.label().to_string(),
            role: kind.role(),
        }
    }
}

/// The action sheet for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMenu {
    pub header: String,
    pub record_id: RecordId,
    pub actions: Vec<MenuAction>,
}

impl ActionMenu {
    pub const HEADER: &'static str = "Options";

    const BASE_ACTIONS: [ActionKind; 4] = [
        ActionKind::Share,
        ActionKind::Copy,
        ActionKind::Delete,
        ActionKind::Cancel,
    ];

    /// Builds the menu for a record.
    pub fn for_record(record: &DecodedRecord) -> Self {
        let actions = ActionKind::context_action(record.value_type)
            .into_iter()
            .chain(Self::BASE_ACTIONS)
            .map(|kind| MenuAction::new(record.id, kind))
            .collect();

        Self {
            header: Self::HEADER.to_string(),
            record_id: record.id,
            actions,
        }
    }

    /// Finds the entry of the given kind, if the menu offers it.
    pub fn find(&self, kind: ActionKind) -> Option<&MenuAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    pub fn kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(|a| a.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BarcodeFormat, ScannedBarcode};

    fn record_of(value_type: ValueType) -> DecodedRecord {
        DecodedRecord::from_scan(ScannedBarcode {
            raw_value: "payload".to_string(),
            display_value: "payload".to_string(),
            value_type,
            format: BarcodeFormat::QrCode,
        })
    }

    #[test]
    fn test_url_menu_starts_with_browser() {
        let menu = ActionMenu::for_record(&record_of(ValueType::Url));
        assert_eq!(
            menu.kinds(),
            vec![
                ActionKind::OpenBrowser,
                ActionKind::Share,
                ActionKind::Copy,
                ActionKind::Delete,
                ActionKind::Cancel,
            ]
        );
        assert_eq!(menu.actions[0].label, "Open in Browser");
    }

    #[test]
    fn test_phone_menu_starts_with_contacts() {
        let menu = ActionMenu::for_record(&record_of(ValueType::Phone));
        assert_eq!(menu.actions[0].kind, ActionKind::OpenDialer);
        assert_eq!(menu.actions[0].label, "Open in Contacts");
        assert_eq!(menu.actions.len(), 5);
    }

    #[test]
    fn test_other_types_start_with_share() {
        for value_type in [ValueType::Text, ValueType::Email, ValueType::Wifi, ValueType::Unknown] {
            let menu = ActionMenu::for_record(&record_of(value_type));
            assert_eq!(
                menu.kinds(),
                vec![
                    ActionKind::Share,
                    ActionKind::Copy,
                    ActionKind::Delete,
                    ActionKind::Cancel,
                ]
            );
        }
    }

    #[test]
    fn test_menu_entries_are_bound_to_record() {
        let record = record_of(ValueType::Url);
        let menu = ActionMenu::for_record(&record);
        assert_eq!(menu.header, "Options");
        assert!(menu.actions.iter().all(|a| a.record_id == record.id));
        assert_eq!(menu.actions.last().unwrap().role, ActionRole::Cancel);
        assert_eq!(menu.find(ActionKind::Delete).unwrap().role, ActionRole::Destructive);
        assert!(menu.find(ActionKind::OpenDialer).is_none());
    }

    #[test]
    fn test_action_kind_parsing() {
        assert_eq!("open-browser".parse(), Ok(ActionKind::OpenBrowser));
        assert_eq!("Dialer".parse(), Ok(ActionKind::OpenDialer));
        assert!("launch".parse::<ActionKind>().is_err());
    }
}
