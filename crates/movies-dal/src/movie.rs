use crate::error::Result;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

#[derive(Debug, Clone, Validate)]
pub struct CreateMovie {
    #[garde(length(min = 1, max = 250))]
    pub title: String,
    #[garde(skip)]
    pub year: i32,
    #[garde(skip)]
    pub rate: f64,
    #[garde(length(min = 1, max = 2500))]
    pub story_line: String,
    #[garde(skip)]
    pub poster: Vec<u8>,
    #[garde(range(min = 0))]
    pub genre_id: i64,
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateMovie {
    #[garde(length(min = 1, max = 250))]
    pub title: String,
    #[garde(skip)]
    pub year: i32,
    #[garde(skip)]
    pub rate: f64,
    #[garde(length(min = 1, max = 2500))]
    pub story_line: String,
    /// Replaces the stored poster only when present.
    #[garde(skip)]
    pub poster: Option<Vec<u8>>,
    #[garde(range(min = 0))]
    pub genre_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub rate: f64,
    pub story_line: String,
    pub poster: Vec<u8>,
    pub genre_id: i64,
}

/// Read projection of a movie joined with its genre.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub id: i64,
    pub genre_id: i64,
    pub genre_name: String,
    pub poster: Vec<u8>,
    pub rate: f64,
    pub story_line: String,
    pub title: String,
    pub year: i32,
}

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

const DETAILS_SELECT: &str = r#"
SELECT m.id, m.genre_id, g.name AS genre_name, m.poster, m.rate, m.story_line, m.title, m.year
FROM movie m
INNER JOIN genre g ON m.genre_id = g.id
"#;

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Lists all movies as details records, best rated first. With `genre_id`
    /// restricts to that genre; an unknown genre yields an empty list.
    pub async fn list(&self, genre_id: Option<i64>) -> Result<Vec<MovieDetails>> {
        let query = match genre_id {
            Some(genre_id) => {
                let sql = format!("{DETAILS_SELECT} WHERE m.genre_id = ? ORDER BY m.rate DESC");
                sqlx::query_as::<_, MovieDetails>(&sql)
                    .bind(genre_id)
                    .fetch_all(&self.executor)
                    .await?
            }
            None => {
                let sql = format!("{DETAILS_SELECT} ORDER BY m.rate DESC");
                sqlx::query_as::<_, MovieDetails>(&sql)
                    .fetch_all(&self.executor)
                    .await?
            }
        };
        Ok(query)
    }

    pub async fn get_details(&self, id: i64) -> Result<MovieDetails> {
        let sql = format!("{DETAILS_SELECT} WHERE m.id = ?");
        let record = sqlx::query_as::<_, MovieDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| crate::Error::RecordNotFound("Movie".to_string()))?;
        Ok(record)
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        let record = sqlx::query_as::<_, Movie>(
            "SELECT id, title, year, rate, story_line, poster, genre_id FROM movie WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| crate::Error::RecordNotFound("Movie".to_string()))?;
        Ok(record)
    }

    pub async fn create(&self, payload: CreateMovie) -> Result<Movie> {
        let result = sqlx::query(
            "INSERT INTO movie (title, year, rate, story_line, poster, genre_id) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(payload.year)
        .bind(payload.rate)
        .bind(&payload.story_line)
        .bind(&payload.poster)
        .bind(payload.genre_id)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created movie {id}");
        self.get(id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateMovie) -> Result<Movie> {
        let result = match &payload.poster {
            Some(poster) => {
                sqlx::query(
                    "UPDATE movie SET title = ?, year = ?, rate = ?, story_line = ?, \
                     genre_id = ?, poster = ? WHERE id = ?",
                )
                .bind(&payload.title)
                .bind(payload.year)
                .bind(payload.rate)
                .bind(&payload.story_line)
                .bind(payload.genre_id)
                .bind(poster)
                .bind(id)
                .execute(&self.executor)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE movie SET title = ?, year = ?, rate = ?, story_line = ?, \
                     genre_id = ? WHERE id = ?",
                )
                .bind(&payload.title)
                .bind(payload.year)
                .bind(payload.rate)
                .bind(&payload.story_line)
                .bind(payload.genre_id)
                .bind(id)
                .execute(&self.executor)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            Err(crate::Error::RecordNotFound("Movie".to_string()))
        } else {
            self.get(id).await
        }
    }

    pub async fn delete(&self, id: i64) -> Result<Movie> {
        let record = self.get(id).await?;
        sqlx::query("DELETE FROM movie WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;
        Ok(record)
    }
}
