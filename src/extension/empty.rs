//! Placeholder shown while the field holds no item.

use crate::catalog::Item;
use crate::extension::{BrowseKind, ExtensionError, FieldHost};

/// The empty-field placeholder: a label and one browse button per catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Empty;

/// A browse button of the placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrowseButton {
    pub label: &'static str,
    pub kind: BrowseKind,
}

impl Empty {
    pub const LABEL: &'static str = "No product selected!";

    /// Returns the browse buttons in display order.
    #[must_use]
    pub fn buttons(self) -> [BrowseButton; 2] {
        BrowseKind::ALL.map(|kind| BrowseButton {
            label: kind.modal().title,
            kind,
        })
    }

    /// Opens the browse modal for `kind` and returns the chosen item.
    ///
    /// # Errors
    ///
    /// Returns whatever [`FieldHost::open_modal`] fails with.
    pub async fn browse<H>(self, host: &H, kind: BrowseKind) -> Result<Option<Item>, ExtensionError>
    where
        H: FieldHost + ?Sized,
    {
        let modal = kind.modal();
        tracing::debug!(modal = modal.id, "opening browse modal");
        let item = host.open_modal(&modal).await?;
        if item.is_none() {
            tracing::debug!(modal = modal.id, "browse modal closed without a selection");
        }
        Ok(item)
    }
}
