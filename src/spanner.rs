use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, DatabaseDialect, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert, update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SpannerConfig;
use crate::models::{Contact, ContactPayload};
use crate::store::{parse_id, ContactStore, StoreError};

const PERSONS_TABLE: &str = "persons";

const PERSONS_DDL: &str = r#"
CREATE TABLE persons (
    id STRING(36) NOT NULL,
    name STRING(MAX) NOT NULL,
    number STRING(MAX) NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#;

/// Shareable Spanner-backed contact store
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
}

impl SpannerClient {
    /// Create a new Spanner client from configuration
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST on its own
    /// and connects to the emulator when it is set.
    ///
    /// The instance, database and `persons` table are created first if they
    /// don't exist.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Run a query in a single-use read-only transaction and map every row
    async fn query_contacts(&self, statement: Statement) -> Result<Vec<Contact>> {
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query persons from Spanner")?;

        let mut contacts = Vec::new();
        while let Some(row) = result_set.next().await? {
            contacts.push(contact_from_row(&row)?);
        }
        Ok(contacts)
    }

    async fn read(&self, id: Uuid) -> Result<Option<Contact>> {
        let mut statement = Statement::new(
            "SELECT id, name, number FROM persons WHERE id = @id"
        );
        statement.add_param("id", &id.to_string());

        let contact = self.query_contacts(statement).await?.into_iter().next();
        match &contact {
            Some(_) => tracing::debug!("Read contact with id: {}", id),
            None => tracing::debug!("Contact not found with id: {}", id),
        }
        Ok(contact)
    }
}

fn contact_from_row(row: &Row) -> Result<Contact> {
    Ok(Contact {
        id: row.column_by_name("id")?,
        name: row.column_by_name("name")?,
        number: row.column_by_name("number")?,
    })
}

#[async_trait]
impl ContactStore for SpannerClient {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        let statement = Statement::new(
            "SELECT id, name, number FROM persons ORDER BY created_at ASC, id ASC"
        );
        let contacts = self.query_contacts(statement).await?;
        tracing::debug!("Listed {} contacts", contacts.len());
        Ok(contacts)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let statement = Statement::new("SELECT COUNT(*) AS count FROM persons");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction for count")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute count query")?;

        let count: i64 = match result_set.next().await.context("Failed to read count row")? {
            Some(row) => row.column_by_name("count").context("Failed to decode count")?,
            None => 0,
        };

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.read(id).await?)
    }

    async fn create(&self, payload: ContactPayload) -> Result<Contact, StoreError> {
        let fields = payload.validate()?;
        let id_str = Uuid::new_v4().to_string();

        let mutation = insert(
            PERSONS_TABLE,
            &["id", "name", "number", "created_at", "updated_at"],
            &[
                &id_str,
                &fields.name,
                &fields.number,
                &CommitTimestamp::new(),
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to insert person into Spanner")?;

        tracing::debug!("Inserted contact with id: {}", id_str);
        Ok(fields.into_contact(id_str))
    }

    async fn update(
        &self,
        id: &str,
        payload: ContactPayload,
    ) -> Result<Option<Contact>, StoreError> {
        let id_str = parse_id(id)?.to_string();
        let fields = payload.validate()?;

        // The existence read and the update commit together; an update
        // mutation on a missing row would fail the whole commit.
        let (_, found) = self
            .inner
            .read_write_transaction::<bool, SpannerError, _>(|tx| {
                let id_str = id_str.clone();
                let name = fields.name.clone();
                let number = fields.number.clone();
                Box::pin(async move {
                    let mut statement = Statement::new("SELECT id FROM persons WHERE id = @id");
                    statement.add_param("id", &id_str);

                    let exists = {
                        let mut rows = tx.query(statement).await?;
                        rows.next().await?.is_some()
                    };
                    if !exists {
                        return Ok(false);
                    }

                    tx.buffer_write(vec![update(
                        PERSONS_TABLE,
                        &["id", "name", "number", "updated_at"],
                        &[&id_str, &name, &number, &CommitTimestamp::new()],
                    )]);
                    Ok(true)
                })
            })
            .await
            .context("Failed to update person in Spanner")?;

        if !found {
            tracing::debug!("Contact not found for update with id: {}", id_str);
            return Ok(None);
        }

        tracing::debug!("Updated contact with id: {}", id_str);
        Ok(Some(fields.into_contact(id_str)))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id_str = parse_id(id)?.to_string();

        self.inner
            .apply(vec![delete(PERSONS_TABLE, Key::new(&id_str))])
            .await
            .context("Failed to delete person from Spanner")?;

        tracing::debug!("Deleted contact with id: {}", id_str);
        Ok(())
    }

    /// Lightweight `SELECT 1` round trip
    async fn health_check(&self) -> Result<(), StoreError> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await.context("Failed to read health check row")?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results").into())
        }
    }
}

/// Provision the Spanner instance, database and table when missing
///
/// Makes zero-setup local development against the emulator possible.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    let admin = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    provision_instance(&admin, config, &project_path, &instance_path).await?;
    provision_database(&admin, config, &instance_path, &database_path).await?;
    ensure_table_exists(&admin, &database_path).await?;

    tracing::info!("Spanner schema ready at {}", database_path);
    Ok(())
}

/// Turn an admin lookup into presence, with NOT_FOUND meaning absent
fn is_present<T>(lookup: Result<T, Status>, resource: &str) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(status) if status.code() == Code::NotFound => Ok(false),
        Err(status) => bail!("Failed to look up {}: {}", resource, status.message()),
    }
}

async fn provision_instance(
    admin: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let lookup = admin
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.to_string(),
                field_mask: None,
            },
            None,
        )
        .await;
    if is_present(lookup, instance_path)? {
        tracing::debug!("Using existing instance {}", instance_path);
        return Ok(());
    }

    // The emulator only knows its own placement
    let placement = match config.emulator_host {
        Some(_) => "emulator-config",
        None => "regional-us-central1",
    };

    tracing::info!("Provisioning instance {} ({})", instance_path, placement);
    let request = CreateInstanceRequest {
        parent: project_path.to_string(),
        instance_id: config.instance.clone(),
        instance: Some(Instance {
            name: instance_path.to_string(),
            config: format!("{}/instanceConfigs/{}", project_path, placement),
            display_name: "Phonebook contacts".to_string(),
            node_count: 1,
            ..Default::default()
        }),
    };

    admin
        .instance()
        .create_instance(request, None)
        .await
        .context("Failed to request instance creation")?
        .wait(None)
        .await
        .with_context(|| format!("Failed to provision instance {}", instance_path))?;
    Ok(())
}

async fn provision_database(
    admin: &AdminClient,
    config: &SpannerConfig,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let lookup = admin
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.to_string(),
            },
            None,
        )
        .await;
    if is_present(lookup, database_path)? {
        tracing::debug!("Using existing database {}", database_path);
        return Ok(());
    }

    tracing::info!("Provisioning database {}", database_path);
    let request = CreateDatabaseRequest {
        parent: instance_path.to_string(),
        create_statement: format!("CREATE DATABASE `{}`", config.database),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: DatabaseDialect::GoogleStandardSql as i32,
        proto_descriptors: vec![],
    };

    admin
        .database()
        .create_database(request, None)
        .await
        .context("Failed to request database creation")?
        .wait(None)
        .await
        .with_context(|| format!("Failed to provision database {}", database_path))?;
    Ok(())
}

async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response
        .into_inner()
        .statements
        .iter()
        .any(|stmt| declares_persons_table(stmt));

    if table_exists {
        tracing::info!("Table '{}' already exists", PERSONS_TABLE);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", PERSONS_TABLE);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![PERSONS_DDL.trim().to_string()],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", PERSONS_TABLE);
    Ok(())
}

fn declares_persons_table(stmt: &str) -> bool {
    stmt.contains("CREATE TABLE persons ") || stmt.contains("CREATE TABLE `persons`")
}
