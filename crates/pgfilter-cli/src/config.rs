use crate::cli::ConnectArgs;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = "pgfilter.toml";

/// Resolved connection settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub max_sql_length: Option<usize>,
}

impl Settings {
    /// `--database` beats the config file, which beats `DATABASE_URL`.
    ///
    /// An explicit `--config` must exist; the default `pgfilter.toml` is
    /// optional. With `--database` only the file's `[logging]` table is read,
    /// so its `[database]` section is neither expanded nor validated.
    pub fn resolve(args: &ConnectArgs) -> anyhow::Result<Self> {
        let path = match &args.config {
            Some(path) => Some(path.as_path()),
            None if Path::new(DEFAULT_CONFIG).exists() => Some(Path::new(DEFAULT_CONFIG)),
            None => None,
        };

        if let Some(url) = &args.database {
            let logging = match path {
                Some(path) => ConfigFile::load_logging(path)?,
                None => LoggingConfig::default(),
            };
            return Ok(Self {
                database_url: url.clone(),
                max_sql_length: logging.max_sql_length,
            });
        }

        let file = path.map(ConfigFile::load).transpose()?;
        let max_sql_length = file.as_ref().and_then(|f| f.logging.max_sql_length);
        let database_url = match file {
            Some(file) => file.database.url,
            None => std::env::var("DATABASE_URL").map_err(|_| {
                anyhow::anyhow!(
                    "no database configured: pass --database, set DATABASE_URL, or create {DEFAULT_CONFIG}"
                )
            })?,
        };

        Ok(Self {
            database_url,
            max_sql_length,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub max_sql_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingOnly {
    #[serde(default)]
    logging: LoggingConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = read(path)?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config file {}: {e:#}", path.display()))
    }

    /// Read just the `[logging]` table.
    pub fn load_logging(path: &Path) -> anyhow::Result<LoggingConfig> {
        let raw = read(path)?;
        Self::parse_logging(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config file {}: {e:#}", path.display()))
    }

    fn parse_logging(raw: &str) -> anyhow::Result<LoggingConfig> {
        let file: LoggingOnly = toml::from_str(raw)?;
        Ok(file.logging)
    }

    fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.database.url = expand_env_vars(&file.database.url)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        Ok(())
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
