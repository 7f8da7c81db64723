use actix_web::web;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use questionnaire_api::config::{AppConfig, DatabaseConfig, ServerConfig, StaticConfig};
use questionnaire_api::database::Database;
use questionnaire_api::handlers::AppState;

/// A fully configured test application backed by an isolated temporary
/// database and static directory.
pub struct TestApp {
    pub temp_dir: TempDir,
    pub database: Arc<Database>,
    pub app_state: web::Data<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("responses.db");
        let static_dir = temp_dir.path().join("static");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            static_files: StaticConfig {
                dir: static_dir,
            },
        };

        let database = Arc::new(Database::new(&db_path)?);

        let app_state = web::Data::new(AppState {
            database: Arc::clone(&database),
            config: Arc::new(config),
        });

        Ok(Self {
            temp_dir,
            database,
            app_state,
        })
    }

    pub fn app_state(&self) -> &web::Data<AppState> {
        &self.app_state
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.database
    }

    pub fn static_dir(&self) -> PathBuf {
        self.temp_dir.path().join("static")
    }

    /// Writes a dashboard asset into the test static directory.
    pub fn install_dashboard_asset(&self, content: &str) -> anyhow::Result<()> {
        let static_dir = self.static_dir();
        std::fs::create_dir_all(&static_dir)?;
        std::fs::write(static_dir.join("admin.html"), content)?;
        Ok(())
    }
}
