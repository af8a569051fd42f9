//! Presentation layer of the field extension.
//!
//! Components here render nothing themselves; each one computes a plain view
//! value from the [`Store`](crate::store::Store) that a UI layer can draw.
//!
//! - [`FieldExtension`]: the entrypoint; reads and writes the CMS field
//! - [`Empty`]: placeholder with the two browse buttons
//! - [`BrowseModal`]: search a catalog and pick an entry
//! - [`ProductValue`], [`CollectionValue`]: show the selected item
//! - [`PriceLabel`]: single price or min/max range
//!
//! The host environment is reached only through [`FieldHost`] and
//! [`ModalResolver`].

pub mod browse;
mod empty;
mod errors;
pub mod field;
mod host;
mod price;
mod value;

pub use browse::{BrowseEntry, BrowseModal, BrowseView};
pub use empty::{BrowseButton, Empty};
pub use errors::ExtensionError;
pub use field::{FieldExtension, FieldRender, FieldView};
pub use host::{BrowseKind, FieldHost, ModalResolver, ModalSpec, ModalWidth};
pub use price::PriceLabel;
pub use value::{CollectionValue, ProductCard, ProductValue, ValueView};
