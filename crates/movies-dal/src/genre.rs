use crate::error::Result;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateGenre {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

pub type GenreRepository = GenreRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct GenreRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GenreRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateGenre) -> Result<Genre> {
        let result = sqlx::query("INSERT INTO genre (name) VALUES (?)")
            .bind(&payload.name)
            .execute(&self.executor)
            .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn update(&self, id: i64, payload: CreateGenre) -> Result<Genre> {
        let result = sqlx::query("UPDATE genre SET name = ? WHERE id = ?")
            .bind(&payload.name)
            .bind(id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            Err(crate::Error::RecordNotFound("Genre".to_string()))
        } else {
            self.get(id).await
        }
    }

    pub async fn list(&self) -> Result<Vec<Genre>> {
        let records =
            sqlx::query_as::<_, Genre>("SELECT id, name FROM genre ORDER BY name")
                .fetch_all(&self.executor)
                .await?;
        Ok(records)
    }

    pub async fn delete(&self, id: i64) -> Result<Genre> {
        let record = self.get(id).await?;
        sqlx::query("DELETE FROM genre WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;
        Ok(record)
    }

    pub async fn get(&self, id: i64) -> Result<Genre> {
        let record = sqlx::query_as::<_, Genre>("SELECT id, name FROM genre WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| crate::Error::RecordNotFound("Genre".to_string()))?;
        Ok(record)
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM genre WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.executor)
            .await?;
        Ok(found)
    }
}
