//! Field-extension entrypoint.
//!
//! [`FieldExtension`] reads the edited field through its [`FieldHost`],
//! decides what to show and writes the field back when the editor selects or
//! clears an item.
//!
//! The field holds a JSON-encoded [`Item`]. Reading is lenient: a missing
//! value, an empty string, a JSON object or a JSON string are all accepted,
//! and anything without a handle shows the empty placeholder.

use serde_json::{json, Value};

use crate::catalog::{CatalogApi, Item, ShopifyClient};
use crate::config::PluginConfig;
use crate::extension::{
    BrowseKind, CollectionValue, Empty, ExtensionError, FieldHost, ProductValue, ValueView,
};
use crate::store::Store;

/// Value written to the field when it is cleared.
pub const EMPTY_FIELD_VALUE: &str = "{}";

/// What the field currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldView {
    /// Nothing selected.
    Empty,
    /// A product reference.
    Product { handle: String },
    /// A collection reference.
    Collection { handle: String },
    /// A handle with a `type` this extension does not render.
    Unsupported { handle: String, kind: String },
}

/// What the field extension renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldRender {
    Empty(Empty),
    Value(ValueView),
    /// The field references an item of unknown type; nothing is shown.
    Nothing,
}

/// Looks up a dotted path such as `blocks.0.product` in the form values.
///
/// Numeric segments index into arrays.
#[must_use]
pub fn value_at_path<'v>(values: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(values);
    }
    path.split('.').try_fold(values, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Interprets the raw value of the field at `path`.
///
/// # Errors
///
/// Returns [`ExtensionError::InvalidFieldValue`] if the field holds a
/// non-empty string that is not JSON.
pub fn parse_field_value(path: &str, raw: Option<&Value>) -> Result<FieldView, ExtensionError> {
    match raw {
        None | Some(Value::Null) => Ok(FieldView::Empty),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(FieldView::Empty),
        Some(Value::String(text)) => {
            let value: Value =
                serde_json::from_str(text).map_err(|source| ExtensionError::InvalidFieldValue {
                    path: path.to_string(),
                    source,
                })?;
            Ok(classify(&value))
        }
        Some(value) => Ok(classify(value)),
    }
}

fn classify(value: &Value) -> FieldView {
    let Some(handle) = value
        .get("handle")
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())
    else {
        return FieldView::Empty;
    };
    let handle = handle.to_string();

    match value.get("type").and_then(Value::as_str) {
        Some("Product") => FieldView::Product { handle },
        Some("Collection") => FieldView::Collection { handle },
        other => FieldView::Unsupported {
            handle,
            kind: other.unwrap_or_default().to_string(),
        },
    }
}

/// The field extension bound to one host context.
#[derive(Debug)]
pub struct FieldExtension<H> {
    host: H,
}

impl<H> FieldExtension<H>
where
    H: FieldHost,
{
    pub const fn new(host: H) -> Self {
        Self { host }
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Reads the plugin configuration from the host's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Config`] if the parameters are incomplete.
    pub fn config(&self) -> Result<PluginConfig, ExtensionError> {
        Ok(PluginConfig::from_parameters(&self.host.plugin_parameters())?)
    }

    /// Creates a catalog client from the plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Config`] or [`ExtensionError::Client`].
    pub fn client(&self) -> Result<ShopifyClient, ExtensionError> {
        Ok(ShopifyClient::new(&self.config()?)?)
    }

    /// Reads what the field currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::InvalidFieldValue`] if the stored string is
    /// not JSON.
    pub fn view(&self) -> Result<FieldView, ExtensionError> {
        let values = self.host.form_values();
        let path = self.host.field_path();
        parse_field_value(&path, value_at_path(&values, &path))
    }

    /// Stores `item` in the field.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Host`] if the host rejects the write.
    pub async fn select(&self, item: &Item) -> Result<(), ExtensionError> {
        let path = self.host.field_path();
        let encoded = json!({ "handle": item.handle, "type": item.kind.as_str() }).to_string();
        tracing::debug!(%path, handle = %item.handle, kind = %item.kind, "storing selection");
        self.host.set_field_value(&path, Value::String(encoded)).await
    }

    /// Clears the field.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Host`] if the host rejects the write.
    pub async fn reset(&self) -> Result<(), ExtensionError> {
        let path = self.host.field_path();
        tracing::debug!(%path, "clearing selection");
        self.host
            .set_field_value(&path, Value::String(EMPTY_FIELD_VALUE.to_string()))
            .await
    }

    /// Opens the browse modal for `kind` and stores the chosen item.
    ///
    /// Returns the stored item, or `None` if the modal was closed.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Host`] if the modal or the write fails.
    pub async fn browse(&self, kind: BrowseKind) -> Result<Option<Item>, ExtensionError> {
        let item = Empty.browse(&self.host, kind).await?;
        if let Some(item) = &item {
            self.select(item).await?;
        }
        Ok(item)
    }

    /// Picks the component for the current field value, fetching the
    /// selected entity through `api` first.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::InvalidFieldValue`] if the field cannot be
    /// read. Fetch failures are rendered, not returned.
    pub async fn render<A>(&self, store: &Store, api: &A) -> Result<FieldRender, ExtensionError>
    where
        A: CatalogApi + ?Sized,
    {
        match self.view()? {
            FieldView::Empty => Ok(FieldRender::Empty(Empty)),
            FieldView::Product { handle } => {
                let value = ProductValue::new(store, handle);
                value.load(api).await;
                Ok(FieldRender::Value(value.view()))
            }
            FieldView::Collection { handle } => {
                let value = CollectionValue::new(store, handle);
                value.load(api).await;
                Ok(FieldRender::Value(value.view()))
            }
            FieldView::Unsupported { handle, kind } => {
                tracing::warn!(%handle, %kind, "field references an unsupported item type");
                Ok(FieldRender::Nothing)
            }
        }
    }
}
