use std::{env, fs, io::ErrorKind, path::PathBuf};

use tracing::info;

use crate::error::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub migrations_dir: PathBuf,
}

impl Config {
    pub fn new(database_url: String, migrations_dir: PathBuf) -> Config {
        Config {
            database_url,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            migrations_dir,
        }
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let migrations_dir = PathBuf::from(env::var("MIGRATIONS_DIR")?);

    let max_connections = match env::var("DB_MAX_CONNECTIONS") {
        Ok(value) => value.parse()?,
        Err(env::VarError::NotPresent) => DEFAULT_MAX_CONNECTIONS,
        Err(e) => return Err(Error::VAR(e)),
    };

    if max_connections == 0 {
        return Err(Error::ConfigurationError(String::from(
            "DB_MAX_CONNECTIONS must be greater than 0",
        )));
    }

    let config = Config {
        database_url,
        max_connections,
        migrations_dir,
    };

    Ok(config)
}

/// Loads `.env` from the crate directory into the process environment.
/// A missing file is not an error, the variables may already be exported.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No {} found, using process environment", path);
            return Ok(());
        },
        Err(e) => return Err(Error::Io(e)),
    };

    parse_config_string(config_string)?;

    Ok(())
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k.trim(), v[1..].trim()));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        if key.is_empty() {
            continue;
        }
        env::set_var(key, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_lines() {
        let data = String::from(
            "# comment\nTRADE_STORE_TEST_A=postgres://u:p@h/db?x=1\n\nTRADE_STORE_TEST_B = 7 \nbroken line\n",
        );
        parse_config_string(data).unwrap();

        assert_eq!(
            env::var("TRADE_STORE_TEST_A").unwrap(),
            "postgres://u:p@h/db?x=1"
        );
        assert_eq!(env::var("TRADE_STORE_TEST_B").unwrap(), "7");
    }

    #[test]
    fn new_uses_default_pool_size() {
        let config = Config::new(
            String::from("postgres://localhost/trades"),
            PathBuf::from("migrations"),
        );
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }
}
