//! Host capabilities used by the field extension.
//!
//! The CMS editor embeds the extension and hands it a context: plugin
//! parameters, the form values, the path of the edited field, a way to write
//! the field and a way to open a modal. [`FieldHost`] is that context; a
//! modal resolves through [`ModalResolver`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::catalog::{Item, ItemKind};
use crate::extension::ExtensionError;

/// Width of a host modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalWidth {
    S,
    M,
    L,
    Xl,
}

/// Request to open a modal registered by the plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModalSpec {
    /// Id the plugin registered the modal under.
    pub id: &'static str,
    pub title: &'static str,
    pub width: ModalWidth,
}

/// Which catalog a browse modal lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BrowseKind {
    Products,
    Collections,
}

impl BrowseKind {
    /// Both browse kinds, in the order their buttons are shown.
    pub const ALL: [Self; 2] = [Self::Products, Self::Collections];

    /// Returns the modal listing this catalog.
    #[must_use]
    pub const fn modal(self) -> ModalSpec {
        match self {
            Self::Products => ModalSpec {
                id: "browseProducts",
                title: "Browse Shopify products",
                width: ModalWidth::Xl,
            },
            Self::Collections => ModalSpec {
                id: "browseCollections",
                title: "Browse Shopify collections",
                width: ModalWidth::Xl,
            },
        }
    }

    /// Returns the kind of item a selection in this modal produces.
    #[must_use]
    pub const fn item_kind(self) -> ItemKind {
        match self {
            Self::Products => ItemKind::Product,
            Self::Collections => ItemKind::Collection,
        }
    }

    /// Returns the browse kind for a modal id.
    #[must_use]
    pub fn from_modal_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.modal().id == id)
    }
}

/// Context the CMS host provides to a field extension.
#[async_trait]
pub trait FieldHost: Send + Sync {
    /// Returns the plugin's configured parameters (`null` when unset).
    fn plugin_parameters(&self) -> Value;

    /// Returns the current values of the whole form.
    fn form_values(&self) -> Value;

    /// Returns the dotted path of the edited field inside the form values.
    fn field_path(&self) -> String;

    /// Writes `value` to the field at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Host`] if the host rejects the write.
    async fn set_field_value(&self, path: &str, value: Value) -> Result<(), ExtensionError>;

    /// Opens a modal and waits until it is resolved or closed.
    ///
    /// Returns `None` when the editor closes the modal without choosing.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Host`] if the modal cannot be opened.
    async fn open_modal(&self, modal: &ModalSpec) -> Result<Option<Item>, ExtensionError>;
}

/// Resolves the modal a browse component is rendered in.
pub trait ModalResolver: Send + Sync {
    /// Closes the modal, handing `item` back to whoever opened it.
    fn resolve(&self, item: Item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_modal_specs_match_registered_modals() {
        assert_eq!(
            serde_json::to_value(BrowseKind::Products.modal()).unwrap(),
            json!({"id": "browseProducts", "title": "Browse Shopify products", "width": "xl"})
        );
        assert_eq!(
            serde_json::to_value(BrowseKind::Collections.modal()).unwrap(),
            json!({"id": "browseCollections", "title": "Browse Shopify collections", "width": "xl"})
        );
    }

    #[test]
    fn test_from_modal_id() {
        assert_eq!(
            BrowseKind::from_modal_id("browseCollections"),
            Some(BrowseKind::Collections)
        );
        assert_eq!(BrowseKind::from_modal_id("browseVariants"), None);
    }

    #[test]
    fn test_item_kind_per_browse_kind() {
        assert_eq!(BrowseKind::Products.item_kind(), ItemKind::Product);
        assert_eq!(BrowseKind::Collections.item_kind(), ItemKind::Collection);
    }
}
