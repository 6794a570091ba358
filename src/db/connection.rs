use tokio_postgres::{Client, NoTls};

/// Connection descriptor for the warehouse. The database to connect to is
/// supplied per call: the table identity's catalog maps to it.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

/// Open a single connection to the given database.
///
/// The assistant deliberately does not pool: every schema fetch and every
/// execution opens its own connection, which closes when the client drops.
/// Callers map the error into their stage of the pipeline.
pub async fn connect(
    config: &WarehouseConfig,
    database: &str,
) -> std::result::Result<Client, tokio_postgres::Error> {
    let conn_string = format!(
        "host={} port={} dbname={} user={} password={}",
        config.host, config.port, database, config.user, config.password
    );

    let (client, connection) = tokio_postgres::connect(&conn_string, NoTls).await?;

    // Drive the connection until the client is dropped
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!("warehouse connection error: {e}");
        }
    });

    Ok(client)
}
