use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

use crate::{document::FieldPath, store::ContentStore};

/// Command interface between the editing UI and a domain's [`ContentStore`].
///
/// Every structured mutation the editor performs is one of these values, so
/// frontends have a single serializable wire format for edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditOp {
    /// Replace the value at a field path.
    SetField(FieldPath, Value),
    /// Append a record to the list at a path.
    AppendItem(FieldPath, Value),
    /// Append the domain's default record to the list at a path.
    AppendDefaultItem(FieldPath),
    /// Remove the record at an index. Out-of-range is a no-op.
    RemoveItem(FieldPath, usize),
    /// Update one field of the record at an index.
    SetItemField(FieldPath, usize, String, Value),
    /// Discard all working-copy mutations.
    Reset,
}

impl Display for EditOp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EditOp::SetField(path, _) => write!(f, "SetField({path})"),
            EditOp::AppendItem(path, _) => write!(f, "AppendItem({path})"),
            EditOp::AppendDefaultItem(path) => write!(f, "AppendDefaultItem({path})"),
            EditOp::RemoveItem(path, idx) => write!(f, "RemoveItem({path}[{idx}])"),
            EditOp::SetItemField(path, idx, field, _) => {
                write!(f, "SetItemField({path}[{idx}].{field})")
            }
            EditOp::Reset => write!(f, "Reset"),
        }
    }
}

impl ContentStore {
    /// Apply one edit operation. Returns whether the document changed shape
    /// at the addressed location; defensive no-ops (missing intermediates,
    /// out-of-range indices) return false.
    pub fn apply(&mut self, op: EditOp) -> bool {
        tracing::debug!("{}: applying {op}", self.domain());
        match op {
            EditOp::SetField(path, value) => self.update_field(&path, value),
            EditOp::AppendItem(path, record) => self.append_item(&path, record),
            EditOp::AppendDefaultItem(path) => self.append_default_item(&path),
            EditOp::RemoveItem(path, idx) => self.remove_item(&path, idx),
            EditOp::SetItemField(path, idx, field, value) => {
                self.update_item_field(&path, idx, &field, value)
            }
            EditOp::Reset => {
                self.reset();
                true
            }
        }
    }
}
