// Startup configuration.
//
// `.env` discovery runs once before anything else, then the environment is
// snapshotted into an `AppConfig` that gets passed to whoever needs it.
// Nothing reads the process environment after that.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

const ENV_FILE_NAME: &str = ".env";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Where the settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvSource {
    File(PathBuf),
    Environment,
}

/// Result of `.env` discovery. Runs before logging is set up, so problems
/// are collected here and logged by the caller.
#[derive(Debug)]
pub struct EnvLoad {
    pub source: EnvSource,
    /// Files that existed but could not be parsed.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Candidate `.env` locations, most specific first: the working directory,
/// then one and two levels above the directory holding the executable.
pub fn candidate_env_paths(cwd: Option<&Path>, exe: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(cwd) = cwd {
        candidates.push(cwd.join(ENV_FILE_NAME));
    }

    if let Some(exe_dir) = exe.and_then(Path::parent) {
        for ancestor in exe_dir.ancestors().skip(1).take(2) {
            candidates.push(ancestor.join(ENV_FILE_NAME));
        }
    }

    candidates.dedup();
    candidates
}

/// Candidates for the running process.
pub fn default_env_paths() -> Vec<PathBuf> {
    let cwd = env::current_dir().ok();
    let exe = env::current_exe().ok();
    candidate_env_paths(cwd.as_deref(), exe.as_deref())
}

/// Loads the first `.env` file that exists into the process environment.
///
/// Variables already set in the environment are left untouched, so system
/// settings win over the file. A missing file is fine; a file that cannot be
/// parsed is skipped in favour of the next candidate.
pub fn load_env_file(candidates: &[PathBuf]) -> EnvLoad {
    let mut skipped = Vec::new();

    for path in candidates.iter().filter(|p| p.is_file()) {
        match read_env_file(path) {
            Ok(vars) => {
                for (key, value) in vars {
                    if env::var_os(&key).is_none() {
                        env::set_var(key, value);
                    }
                }
                return EnvLoad {
                    source: EnvSource::File(path.clone()),
                    skipped,
                };
            }
            Err(e) => skipped.push((path.clone(), e.to_string())),
        }
    }

    EnvLoad {
        source: EnvSource::Environment,
        skipped,
    }
}

/// Parses the whole file before anything is applied, so a file with a bad
/// line leaves the environment untouched.
fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, dotenv::Error> {
    dotenv::from_path_iter(path)?.collect()
}

#[derive(Clone)]
pub struct AppConfig {
    pub sheet_id: String,
    pub credentials_path: Option<PathBuf>,
    pub private_key: Option<String>,
    pub client_email: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    /// Abort startup when the spreadsheet client cannot be initialized.
    pub fail_fast: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sheet_id = get("GOOGLE_SHEET_ID").ok_or(ConfigError::Missing("GOOGLE_SHEET_ID"))?;

        let host = match get("HOST") {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::Invalid { key: "HOST", value })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 3000,
        };

        let fail_fast = match get("SHEETS_FAIL_FAST") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                key: "SHEETS_FAIL_FAST",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            sheet_id,
            credentials_path: get("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from),
            private_key: get("GOOGLE_PRIVATE_KEY"),
            client_email: get("GOOGLE_CLIENT_EMAIL"),
            host,
            port,
            fail_fast,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// Key material stays out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("sheet_id", &self.sheet_id)
            .field("credentials_path", &self.credentials_path)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("client_email", &self.client_email)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("fail_fast", &self.fail_fast)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
