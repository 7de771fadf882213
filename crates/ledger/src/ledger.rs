use serde::{Deserialize, Serialize};

use quotegen_core::{DomainError, DomainResult, Money};

use crate::item::{ItemUpdate, LineItem, compute_amount};

/// The live, ordered list of rows behind the quotation form.
///
/// Never empty: it is created with one blank row and refuses to drop its last
/// one. Row order is the order rows will be numbered in on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Ledger {
    items: Vec<LineItem>,
}

/// A ledger operation expressed as data, for input surfaces that replay edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerEdit {
    AddItem,
    RemoveItem { index: usize },
    UpdateItem { index: usize, update: ItemUpdate },
}

impl Ledger {
    /// A fresh ledger holding one blank row.
    pub fn new() -> Self {
        Self {
            items: vec![LineItem::blank()],
        }
    }

    /// Restore a ledger from a snapshot. An empty snapshot gives a fresh ledger.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let items: Vec<LineItem> = items.into_iter().collect();
        if items.is_empty() {
            Self::new()
        } else {
            Self { items }
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept so the type reads like any other collection.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a blank row.
    pub fn add_item(&mut self) {
        self.items.push(LineItem::blank());
        tracing::debug!(rows = self.items.len(), "ledger row added");
    }

    /// Remove the row at `index`, unless it is the only row left.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds while more than one row exists.
    pub fn remove_item(&mut self, index: usize) {
        if self.items.len() <= 1 {
            tracing::debug!(index, "ignoring removal of the last ledger row");
            return;
        }
        self.items.remove(index);
        tracing::debug!(index, rows = self.items.len(), "ledger row removed");
    }

    /// Overwrite one field of one row. Values are stored as given.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn update_item(&mut self, index: usize, update: ItemUpdate) {
        let field = update.field();
        self.items[index].apply(update);
        tracing::debug!(index, ?field, "ledger row updated");
    }

    /// Apply an edit coming from outside the process.
    ///
    /// Unlike the direct operations, an index that does not name a row is
    /// reported as a validation error instead of panicking.
    pub fn apply(&mut self, edit: LedgerEdit) -> DomainResult<()> {
        match edit {
            LedgerEdit::AddItem => self.add_item(),
            LedgerEdit::RemoveItem { index } => {
                self.ensure_row(index)?;
                self.remove_item(index);
            }
            LedgerEdit::UpdateItem { index, update } => {
                self.ensure_row(index)?;
                self.update_item(index, update);
            }
        }
        Ok(())
    }

    /// Amount of the row at `index`, if it exists.
    pub fn amount_at(&self, index: usize) -> Option<Money> {
        self.items.get(index).map(compute_amount)
    }

    /// Sum of every row's amount, eligible or not.
    pub fn grand_total(&self) -> Money {
        self.items.iter().map(compute_amount).sum()
    }

    /// Rows that may appear on a document, in ledger order.
    pub fn eligible_items(&self) -> impl Iterator<Item = &LineItem> + '_ {
        self.items.iter().filter(|item| item.is_eligible())
    }

    /// Sum of the eligible rows' amounts; the figure a document would print.
    pub fn eligible_total(&self) -> Money {
        self.eligible_items().map(compute_amount).sum()
    }

    fn ensure_row(&self, index: usize) -> DomainResult<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "row {} does not exist (ledger has {} rows)",
                index + 1,
                self.items.len()
            )))
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<LineItem>> for Ledger {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Ledger> for Vec<LineItem> {
    fn from(ledger: Ledger) -> Self {
        ledger.items
    }
}
