//! # dashform-provider
//!
//! The `datadog_dashboard` resource.
//!
//! - [`schema`]: immutable descriptors of the resource and their validator
//! - [`codec`]: configuration tree to and from the typed [`Dashboard`](dashform_model::Dashboard)
//! - [`ResourceData`]: the state handed to each entry point
//! - [`DashboardResource`]: Create / Read / Update / Delete / Exists / Import
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use dashform_datadog::MemoryBoardApi;
//! use dashform_provider::{DashboardResource, ResourceData};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let resource = DashboardResource::new(Arc::new(MemoryBoardApi::new()));
//!
//! let serde_json::Value::Object(config) = json!({
//!     "title": "Service overview",
//!     "layout_type": "ordered",
//!     "widget": [{"note_definition": [{"content": "Owned by the platform team"}]}]
//! }) else { unreachable!() };
//!
//! let mut data = ResourceData::from_config(config);
//! resource.create(&mut data).await?;
//! assert!(data.id().is_some());
//! # Ok::<(), dashform_provider::Error>(())
//! # }).unwrap();
//! ```

pub mod codec;
pub mod error;
pub mod resource;
pub mod resource_data;
pub mod schema;

pub use error::{Error, Result};
pub use resource::{DashboardResource, ReadOutcome};
pub use resource_data::ResourceData;
pub use schema::{Attribute, AttributeType, Block, Constraint, Elem};
