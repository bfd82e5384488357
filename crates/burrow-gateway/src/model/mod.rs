mod url;

pub use url::{HealthResponse, ShortenRequest};
