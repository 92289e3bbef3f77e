use std::env;
use std::fmt;

/// Which SQL engine backs the task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbEngine::Postgres => write!(f, "postgres"),
            DbEngine::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub engine: DbEngine,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub sqlite_path: String,
    pub frontend_origin: String,
    pub bind_addr: String,
}

impl Config {
    /// Every variable has a default, so a bare `cargo run` against a local
    /// postgres works with no .env file at all.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let engine = match env::var("DB_ENGINE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => DbEngine::Sqlite,
            _ => DbEngine::Postgres,
        };

        Self {
            engine,
            db_host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            db_port: env::var("DB_PORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()
                .unwrap_or(5432),
            db_user: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            db_password: env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "todolist".to_string()),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "tasks.db".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        }
    }

    pub fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
        )
    }
}
