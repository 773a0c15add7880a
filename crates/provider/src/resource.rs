//! The `datadog_dashboard` resource: CRUD entry points over a [`BoardApi`].

use std::sync::Arc;

use dashform_datadog::{ApiError, BoardApi, ClientConfig, DatadogClient};
use dashform_model::Dashboard;
use tracing::{debug, info, instrument};

use crate::codec::widget_json::{WIDGET_JSON, configured_documents};
use crate::codec::{WidgetStyle, decode_dashboard, encode_dashboard};
use crate::error::{Error, Result};
use crate::resource_data::ResourceData;
use crate::schema::{Block, dashboard_schema};

/// Result of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The dashboard exists and state was refreshed
    Present,
    /// The dashboard was deleted remotely; the id has been cleared
    Gone,
}

/// Dashboard resource bound to a boards API.
///
/// Configuration errors are detected before any request is sent, so a failed
/// entry point never leaves a half-written dashboard behind.
#[derive(Debug)]
pub struct DashboardResource<A: ?Sized> {
    api: Arc<A>,
    schema: Block,
}

impl DashboardResource<DatadogClient> {
    /// Resource backed by the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientSetup`] if the client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let client = DatadogClient::new(config).map_err(|source| Error::ClientSetup { source })?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Resource backed by the HTTP client, configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientSetup`] when credentials are missing.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env().map_err(|source| Error::ClientSetup { source })?;
        Self::from_config(config)
    }
}

impl<A: BoardApi + ?Sized> DashboardResource<A> {
    /// Binds the resource to an API client.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            schema: dashboard_schema(),
        }
    }

    /// Schema of the resource.
    #[must_use]
    pub const fn schema(&self) -> &Block {
        &self.schema
    }

    /// The API client.
    #[must_use]
    pub const fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Checks the configuration against the schema. Sends nothing.
    pub fn validate(&self, data: &ResourceData) -> Result<()> {
        self.schema.validate(data.attributes())?;
        Ok(())
    }

    /// Creates the dashboard and adopts the id the API assigns.
    #[instrument(name = "dashboard_create", skip_all, fields(api = self.api.api_name()))]
    pub async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let dashboard = self.assemble(data)?;
        debug!(
            title = %dashboard.title,
            widgets = dashboard.widget_count(),
            "Creating dashboard"
        );

        let created = self
            .api
            .create_board(&dashboard)
            .await
            .map_err(|source| Error::CreateFailed { source })?;
        let Some(id) = created.id.clone() else {
            return Err(Error::CreateFailed {
                source: ApiError::MissingId,
            });
        };

        info!(%id, "Dashboard created");
        data.set_id(Some(id));
        write_state(data, &created)
    }

    /// Refreshes state from the API.
    ///
    /// A dashboard deleted outside the provider is not an error: the id is
    /// cleared and [`ReadOutcome::Gone`] is returned.
    #[instrument(name = "dashboard_read", skip_all, fields(id = ?data.id()))]
    pub async fn read(&self, data: &mut ResourceData) -> Result<ReadOutcome> {
        let id = require_id(data, "read")?;
        match self.api.get_board(&id).await {
            Ok(dashboard) => {
                debug!(widgets = dashboard.widget_count(), "Fetched dashboard");
                write_state(data, &dashboard)?;
                Ok(ReadOutcome::Present)
            }
            Err(err) if err.is_not_found() => {
                info!(%id, "Dashboard no longer exists, removing it from state");
                data.set_id(None);
                Ok(ReadOutcome::Gone)
            }
            Err(source) => Err(Error::ReadFailed { id, source }),
        }
    }

    /// Replaces the remote dashboard with the configuration, then reads it back.
    #[instrument(name = "dashboard_update", skip_all, fields(id = ?data.id()))]
    pub async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = require_id(data, "update")?;
        let dashboard = self.assemble(data)?;
        debug!(widgets = dashboard.widget_count(), "Updating dashboard");

        self.api
            .update_board(&dashboard)
            .await
            .map_err(|source| Error::UpdateFailed { id, source })?;
        self.read(data).await?;
        Ok(())
    }

    /// Deletes the remote dashboard and clears the id.
    #[instrument(name = "dashboard_delete", skip_all, fields(id = ?data.id()))]
    pub async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = require_id(data, "delete")?;
        self.api
            .delete_board(&id)
            .await
            .map_err(|source| Error::DeleteFailed {
                id: id.clone(),
                source,
            })?;

        info!(%id, "Dashboard deleted");
        data.set_id(None);
        Ok(())
    }

    /// Whether the dashboard still exists remotely.
    #[instrument(name = "dashboard_exists", skip_all, fields(id = ?data.id()))]
    pub async fn exists(&self, data: &ResourceData) -> Result<bool> {
        let id = require_id(data, "check")?;
        match self.api.get_board(&id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(source) => Err(Error::ReadFailed { id, source }),
        }
    }

    /// Imports an existing dashboard by id.
    #[instrument(name = "dashboard_import", skip(self))]
    pub async fn import(&self, id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::from_id(id);
        match self.read(&mut data).await? {
            ReadOutcome::Present => Ok(data),
            ReadOutcome::Gone => Err(Error::ImportNotFound { id: id.to_string() }),
        }
    }

    fn assemble(&self, data: &ResourceData) -> Result<Dashboard> {
        self.validate(data)?;
        let mut tree = data.attributes().clone();
        self.schema.apply_defaults(&mut tree);

        let mut dashboard = decode_dashboard(&tree)?;
        dashboard.id = data.id().map(str::to_string);
        Ok(dashboard)
    }
}

fn require_id(data: &ResourceData, operation: &'static str) -> Result<String> {
    data.id()
        .map(str::to_string)
        .ok_or(Error::MissingId { operation })
}

/// Overwrites state with a dashboard, keeping the widget style the user chose.
fn write_state(data: &mut ResourceData, dashboard: &Dashboard) -> Result<()> {
    let configured = data
        .get_ok(WIDGET_JSON)
        .map(|_| configured_documents(data.attributes()));
    let style = match &configured {
        Some(documents) => WidgetStyle::Json(documents),
        None => WidgetStyle::Blocks,
    };

    let tree = encode_dashboard(dashboard, style)?;
    data.replace_attributes(tree);
    if let Some(id) = &dashboard.id {
        data.set_id(Some(id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashform_datadog::MemoryBoardApi;
    use serde_json::{Value, json};

    fn resource() -> DashboardResource<MemoryBoardApi> {
        DashboardResource::new(Arc::new(MemoryBoardApi::new()))
    }

    fn config(value: Value) -> ResourceData {
        match value {
            Value::Object(map) => ResourceData::from_config(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_entry_points_need_an_id() {
        let resource = resource();
        let mut data = config(json!({"title": "No id", "layout_type": "ordered"}));

        let err = tokio_test::block_on(resource.delete(&mut data)).unwrap_err();
        assert!(matches!(err, Error::MissingId { operation: "delete" }));
        let err = tokio_test::block_on(resource.read(&mut data)).unwrap_err();
        assert!(matches!(err, Error::MissingId { operation: "read" }));
        assert_eq!(resource.api().calls(), 0);
    }

    #[test]
    fn test_invalid_config_sends_nothing() {
        let resource = resource();
        let mut data = config(json!({
            "title": "Bad",
            "layout_type": "ordered",
            "widget": [{"note_definition": [{"background_color": "pink"}]}]
        }));

        let err = tokio_test::block_on(resource.create(&mut data)).unwrap_err();
        let path = err.as_configuration().and_then(|e| e.path()).unwrap();
        assert_eq!(path.to_string(), "widget.0.note_definition.0.content");
        assert!(data.id().is_none());
        assert_eq!(resource.api().calls(), 0);
    }

    #[test]
    fn test_defaults_are_applied() {
        let resource = resource();
        let mut data = config(json!({"title": "Defaults", "layout_type": "ordered"}));
        tokio_test::block_on(resource.create(&mut data)).unwrap();

        assert_eq!(data.get("is_read_only"), Some(&json!(false)));
        assert_eq!(data.id(), Some("abc-def-001"));
    }
}
