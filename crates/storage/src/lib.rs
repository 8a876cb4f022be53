use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Disease, DiseaseDraft, DiseaseId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// All diseases, newest first.
    pub async fn list_diseases(&self) -> Result<Vec<Disease>> {
        let rows = sqlx::query("SELECT id, name, symptoms FROM diseases ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list diseases")?;
        Ok(rows
            .into_iter()
            .map(|r| Disease {
                id: DiseaseId(r.get::<i64, _>(0)),
                name: r.get::<String, _>(1),
                symptoms: r.get::<String, _>(2),
            })
            .collect())
    }

    pub async fn insert_disease(&self, draft: &DiseaseDraft) -> Result<DiseaseId> {
        let rec = sqlx::query("INSERT INTO diseases (name, symptoms) VALUES (?, ?) RETURNING id")
            .bind(&draft.name)
            .bind(&draft.symptoms)
            .fetch_one(&self.pool)
            .await
            .context("failed to insert disease")?;
        Ok(DiseaseId(rec.get::<i64, _>(0)))
    }

    /// Returns `false` when no row carries `disease_id`.
    pub async fn update_disease(
        &self,
        disease_id: DiseaseId,
        draft: &DiseaseDraft,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE diseases SET name = ?, symptoms = ? WHERE id = ?")
            .bind(&draft.name)
            .bind(&draft.symptoms)
            .bind(disease_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to update disease {disease_id}"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when no row carries `disease_id`.
    pub async fn delete_disease(&self, disease_id: DiseaseId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM diseases WHERE id = ?")
            .bind(disease_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete disease {disease_id}"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn disease(&self, disease_id: DiseaseId) -> Result<Option<Disease>> {
        let row = sqlx::query("SELECT id, name, symptoms FROM diseases WHERE id = ?")
            .bind(disease_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Disease {
            id: DiseaseId(r.get::<i64, _>(0)),
            name: r.get::<String, _>(1),
            symptoms: r.get::<String, _>(2),
        }))
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
