use burrow_generator::{Alphabet, SymbolMapping, SynthesizerSettings};
use burrow_shortener::RetryPolicy;
use burrow_telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "BURROW_BASE_URL";
pub const CODE_LENGTH_ENV: &str = "LINK_ID_LENGTH";
pub const ALPHABET_ENV: &str = "BURROW_ALPHABET";
pub const SYMBOL_MAPPING_ENV: &str = "BURROW_SYMBOL_MAPPING";
pub const MAX_ATTEMPTS_ENV: &str = "BURROW_MAX_ATTEMPTS";
pub const REQUEST_TIMEOUT_MS_ENV: &str = "BURROW_REQUEST_TIMEOUT_MS";
pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "BURROW_REDIS_URL";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const ENV_FILE: &str = ".env";
pub const DEV_ENV_FILE: &str = ".env.dev";
pub const DEV_FLAG: &str = "--dev";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolMappingArg {
    #[value(name = "uniform")]
    Uniform,
    #[value(name = "legacy")]
    Legacy,
}

impl From<SymbolMappingArg> for SymbolMapping {
    fn from(arg: SymbolMappingArg) -> Self {
        match arg {
            SymbolMappingArg::Uniform => SymbolMapping::Uniform,
            SymbolMappingArg::Legacy => SymbolMapping::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow-gateway")]
pub struct CLI {
    /// Development mode: read `.env.dev` instead of `.env`.
    #[arg(long)]
    pub dev: bool,

    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public prefix of issued short URLs.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Symbols per code. Unset, empty, unparseable or zero values fall back
    /// to the default.
    #[arg(long, env = CODE_LENGTH_ENV)]
    pub code_length: Option<String>,

    #[arg(long, env = ALPHABET_ENV)]
    pub alphabet: Option<String>,

    #[arg(
        long,
        env = SYMBOL_MAPPING_ENV,
        value_enum,
        default_value_t = SymbolMappingArg::Uniform
    )]
    pub symbol_mapping: SymbolMappingArg,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(
        long,
        env = REQUEST_TIMEOUT_MS_ENV,
        default_value_t = DEFAULT_REQUEST_TIMEOUT_MS
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,
}

impl CLI {
    /// Resolves the generator settings, logging every fallback taken.
    pub fn synthesizer_settings(&self) -> anyhow::Result<SynthesizerSettings> {
        let alphabet = match self.alphabet.as_deref() {
            Some(symbols) => {
                let alphabet: Alphabet = symbols.parse()?;
                let duplicates = alphabet.duplicates();
                if !duplicates.is_empty() {
                    warn!(
                        ?duplicates,
                        "alphabet repeats symbols; repeated symbols are drawn more often"
                    );
                }
                alphabet
            }
            None => Alphabet::default(),
        };

        Ok(SynthesizerSettings::builder()
            .length(parse_code_length(self.code_length.as_deref()))
            .alphabet(alphabet)
            .mapping(self.symbol_mapping.into())
            .build())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(self.max_attempts)
            .build()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// The env file to load for the given command line.
///
/// Looked up before clap runs, since the file feeds clap's env fallbacks.
pub fn env_file<I, S>(args: I) -> &'static str
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if args.into_iter().any(|arg| arg.as_ref() == DEV_FLAG) {
        DEV_ENV_FILE
    } else {
        ENV_FILE
    }
}

/// Loads `path` into the process environment without overriding variables
/// that are already set.
///
/// A missing file is only an error when `required`; `Ok(None)` otherwise.
pub fn load_env_file(path: &Path, required: bool) -> anyhow::Result<Option<PathBuf>> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(err) if err.not_found() && !required => Ok(None),
        Err(err) => Err(anyhow::anyhow!(
            "error loading env file {}: {err}",
            path.display()
        )),
    }
}

/// Parses the configured code length, falling back to
/// [`DEFAULT_CODE_LENGTH`] with a warning.
pub fn parse_code_length(raw: Option<&str>) -> usize {
    let raw = match raw.map(str::trim) {
        None | Some("") => {
            warn!(
                env = CODE_LENGTH_ENV,
                default = DEFAULT_CODE_LENGTH,
                "code length not configured, using default"
            );
            return DEFAULT_CODE_LENGTH;
        }
        Some(raw) => raw,
    };

    match raw.parse::<usize>() {
        Ok(0) => {
            warn!(default = DEFAULT_CODE_LENGTH, "code length must be positive, using default");
            DEFAULT_CODE_LENGTH
        }
        Ok(length) => length,
        Err(err) => {
            warn!(
                value = raw,
                error = %err,
                default = DEFAULT_CODE_LENGTH,
                "invalid code length, using default"
            );
            DEFAULT_CODE_LENGTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_length_falls_back_to_default() {
        assert_eq!(parse_code_length(None), DEFAULT_CODE_LENGTH);
        assert_eq!(parse_code_length(Some("")), DEFAULT_CODE_LENGTH);
        assert_eq!(parse_code_length(Some("six")), DEFAULT_CODE_LENGTH);
        assert_eq!(parse_code_length(Some("-3")), DEFAULT_CODE_LENGTH);
        assert_eq!(parse_code_length(Some("0")), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn code_length_accepts_positive_integers() {
        assert_eq!(parse_code_length(Some("8")), 8);
        assert_eq!(parse_code_length(Some(" 12 ")), 12);
    }

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["gateway"]).unwrap();

        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.symbol_mapping, SymbolMappingArg::Uniform);
        assert_eq!(cli.retry_policy().max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(cli.request_timeout(), Duration::from_secs(5));

        let settings = cli.synthesizer_settings().unwrap();
        assert_eq!(settings.alphabet, Alphabet::default());
        assert_eq!(settings.mapping, SymbolMapping::Uniform);
    }

    #[test]
    fn parses_flags() {
        let cli = CLI::try_parse_from([
            "gateway",
            "--code-length",
            "9",
            "--alphabet",
            "abc",
            "--symbol-mapping",
            "legacy",
            "--max-attempts",
            "3",
        ])
        .unwrap();

        let settings = cli.synthesizer_settings().unwrap();
        assert_eq!(settings.length, 9);
        assert_eq!(settings.alphabet.as_str(), "abc");
        assert_eq!(settings.mapping, SymbolMapping::Legacy);
        assert_eq!(cli.retry_policy().max_attempts, 3);
    }

    #[test]
    fn redis_backend_requires_url() {
        assert!(CLI::try_parse_from(["gateway", "--storage", "redis"]).is_err());
        let cli = CLI::try_parse_from([
            "gateway",
            "--storage",
            "redis",
            "--redis-url",
            "redis://127.0.0.1/",
        ])
        .unwrap();
        assert_eq!(cli.redis_url.as_deref(), Some("redis://127.0.0.1/"));
    }

    #[test]
    fn dev_flag_selects_dev_env_file() {
        assert_eq!(env_file(["gateway"]), ENV_FILE);
        assert_eq!(env_file(["gateway", "--dev"]), DEV_ENV_FILE);
        assert_eq!(env_file(["gateway", "--storage", "in-memory", "--dev"]), DEV_ENV_FILE);

        let cli = CLI::try_parse_from(["gateway", "--dev"]).unwrap();
        assert!(cli.dev);
    }

    #[test]
    fn env_file_values_fill_unset_variables_only() {
        let dir = std::env::temp_dir().join(format!("burrow-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(DEV_ENV_FILE);
        std::fs::write(
            &path,
            "BURROW_ENV_FILE_TEST_FRESH=from-file\nBURROW_ENV_FILE_TEST_SET=from-file\n",
        )
        .unwrap();
        std::env::set_var("BURROW_ENV_FILE_TEST_SET", "from-process");

        let loaded = load_env_file(&path, true).unwrap();

        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(std::env::var("BURROW_ENV_FILE_TEST_FRESH").unwrap(), "from-file");
        assert_eq!(std::env::var("BURROW_ENV_FILE_TEST_SET").unwrap(), "from-process");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_env_file_is_an_error_only_when_required() {
        let path = std::env::temp_dir().join("burrow-env-file-that-does-not-exist");

        assert_eq!(load_env_file(&path, false).unwrap(), None);
        assert!(load_env_file(&path, true).is_err());
    }

    #[test]
    fn rejects_invalid_alphabet() {
        let cli = CLI::try_parse_from(["gateway", "--alphabet", "ab/c"]).unwrap();
        assert!(cli.synthesizer_settings().is_err());
    }
}
