//! Conexión a PostgreSQL
//!
//! Crea el pool, aplica las migraciones embebidas y comprueba la conexión.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

/// Conexión a la base de datos lista para usar
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🗄️ Conectando a {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("Error creando el pool de conexiones")?;

        run_migrations(&pool).await?;
        test_connection(&pool).await?;

        info!("✅ Base de datos conectada");
        Ok(Self { pool })
    }

    /// Conectar usando `DATABASE_URL`
    pub async fn new_default() -> Result<Self> {
        Self::new(&DatabaseConfig::from_env()?).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Error ejecutando migraciones")?;
    info!("📦 Migraciones aplicadas");
    Ok(())
}

/// Verificar que la conexión funciona
async fn test_connection(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("La base de datos no responde")?;
    Ok(())
}
