use async_trait::async_trait;
use burrow_core::store::Result;
use burrow_core::{Atomicity, Link, LinkRecord, ReadStore, ShortCode, StorageError, Store};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::trace;

/// Generates the Redis key for a short code.
fn link_key(code: &ShortCode) -> String {
    format!("burrow:link:{}", code.as_str())
}

fn map_redis_error(err: redis::RedisError) -> StorageError {
    let message = err.to_string();

    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Query(message)
    }
}

/// Redis implementation of the store contract.
///
/// Each link is a JSON document under `burrow:link:{code}`. Creation uses
/// `SET ... NX`, making it an atomic create-if-absent.
#[derive(Clone)]
pub struct RedisStore {
    redis: MultiplexedConnection,
}

impl RedisStore {
    /// Creates a store from an existing multiplexed connection.
    pub fn new(redis: MultiplexedConnection) -> Self {
        Self { redis }
    }

    /// Creates a store by opening a new connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(map_redis_error)?;
        let redis = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_error)?;
        Ok(Self::new(redis))
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ReadStore for RedisStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let key = link_key(code);
        trace!(code = %code, "redis get");

        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(&key).await.map_err(map_redis_error)?;

        raw.map(|json| {
            serde_json::from_str::<LinkRecord>(&json).map_err(|e| {
                StorageError::InvalidData(format!("undecodable record under '{}': {e}", key))
            })
        })
        .transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let mut redis = self.redis.clone();
        redis
            .exists::<_, bool>(link_key(code))
            .await
            .map_err(map_redis_error)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn create(&self, code: &ShortCode, link: Link) -> Result<()> {
        let key = link_key(code);
        let json = serde_json::to_string(&link)
            .map_err(|e| StorageError::Operation(format!("failed to encode link: {e}")))?;

        let mut redis = self.redis.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(json)
            .arg("NX")
            .query_async(&mut redis)
            .await
            .map_err(map_redis_error)?;

        match reply {
            Some(_) => {
                trace!(code = %code, "redis create");
                Ok(())
            }
            None => Err(StorageError::Conflict(code.to_string())),
        }
    }

    fn atomicity(&self) -> Atomicity {
        Atomicity::CreateIfAbsent
    }
}
