use crate::error::TestInfraError;
use ::redis::aio::MultiplexedConnection;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

const REDIS_PORT: u16 = 6379;

/// A throwaway Redis server, stopped when dropped.
pub struct RedisServer {
    #[allow(dead_code)]
    container: ContainerAsync<GenericImage>,
    url: String,
}

impl RedisServer {
    pub async fn start() -> Result<Self, TestInfraError> {
        let container = GenericImage::new("redis", "8.6.0")
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;

        let host = match container.get_host().await?.to_string().as_str() {
            "localhost" => String::from("127.0.0.1"),
            host => host.to_string(),
        };
        let port = container.get_host_port_ipv4(REDIS_PORT).await?;
        let url = format!("redis://{host}:{port}");

        Ok(Self { container, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opens a fresh connection, e.g. to plant raw values next to a store.
    pub async fn connection(&self) -> Result<MultiplexedConnection, TestInfraError> {
        let client = ::redis::Client::open(self.url.as_str())?;
        Ok(client.get_multiplexed_async_connection().await?)
    }
}
