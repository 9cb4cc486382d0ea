use movies_dal::genre::GenreRepository;
use movies_dal::movie::MovieRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
#[allow(unused_imports)]
use axum::routing::{delete, get, post, put};
use bytes::Bytes;

crate::repository_from_request!(MovieRepository);

pub const MAX_POSTER_SIZE: usize = 1_048_576;
const ALLOWED_POSTER_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Uploaded poster file part, buffered in memory.
#[derive(Debug)]
struct Poster {
    file_name: String,
    data: Bytes,
}

impl Poster {
    fn validate(&self) -> ApiResult<()> {
        if !extension_allowed(&self.file_name) {
            return Err(ApiError::InvalidRequest(
                "only .png or .jpg images are allowed!".to_string(),
            ));
        }
        if self.data.len() > MAX_POSTER_SIZE {
            return Err(ApiError::InvalidRequest(
                "max allowed size for poster is 1MB!".to_string(),
            ));
        }
        Ok(())
    }
}

fn extension_allowed(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_POSTER_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Multipart payload shared by create and update. All scalar fields are
/// required, the poster part is checked by the handlers themselves.
#[derive(Debug, Default)]
struct MovieForm {
    title: Option<String>,
    year: Option<i32>,
    rate: Option<f64>,
    story_line: Option<String>,
    genre_id: Option<i64>,
    poster: Option<Poster>,
}

impl MovieForm {
    async fn from_multipart(mut multipart: axum::extract::Multipart) -> ApiResult<Self> {
        let mut form = MovieForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(ToString::to_string);
            match name.as_deref() {
                Some("title") => form.title = Some(field.text().await?),
                Some("year") => form.year = Some(parse_field("year", &field.text().await?)?),
                Some("rate") => form.rate = Some(parse_field("rate", &field.text().await?)?),
                Some("storyLine") => form.story_line = Some(field.text().await?),
                Some("genreId") => {
                    form.genre_id = Some(parse_field("genreId", &field.text().await?)?)
                }
                Some("poster") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?;
                    form.poster = Some(Poster { file_name, data });
                }
                // unknown parts are ignored, as form binders commonly do
                _ => {}
            }
        }
        Ok(form)
    }

    fn require<T>(value: Option<T>, name: &str) -> ApiResult<T> {
        value.ok_or_else(|| ApiError::InvalidRequest(format!("missing form field {name}")))
    }
}

fn parse_field<T>(name: &str, value: &str) -> ApiResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ApiError::InvalidRequest(format!("invalid value for {name}: {e}")))
}

mod crud_api {
    use super::*;
    use axum::{
        extract::{Multipart, Path, Query},
        response::IntoResponse,
        Json,
    };
    use garde::Validate as _;
    use http::StatusCode;
    use movies_dal::movie::{CreateMovie, UpdateMovie};
    use serde::Deserialize;
    use tracing::debug;

    pub async fn list(repository: MovieRepository) -> ApiResult<impl IntoResponse> {
        let movies = repository.list(None).await?;
        Ok((StatusCode::OK, Json(movies)))
    }

    #[derive(Debug, Deserialize)]
    pub struct GenreIdQuery {
        #[serde(rename = "genreId")]
        genre_id: i64,
    }

    pub async fn list_by_genre(
        Query(query): Query<GenreIdQuery>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        // an unknown genre id is not an error, it just matches nothing
        let movies = repository.list(Some(query.genre_id)).await?;
        Ok((StatusCode::OK, Json(movies)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get_details(id).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn create(
        repository: MovieRepository,
        genres: GenreRepository,
        multipart: Multipart,
    ) -> ApiResult<impl IntoResponse> {
        let form = MovieForm::from_multipart(multipart).await?;

        let poster = form
            .poster
            .ok_or_else(|| ApiError::InvalidRequest("poster is required!".to_string()))?;
        poster.validate()?;

        let genre_id = MovieForm::require(form.genre_id, "genreId")?;
        if !genres.exists(genre_id).await? {
            return Err(ApiError::InvalidRequest("Invalid Genre Id!".to_string()));
        }

        let payload = CreateMovie {
            title: MovieForm::require(form.title, "title")?,
            year: MovieForm::require(form.year, "year")?,
            rate: MovieForm::require(form.rate, "rate")?,
            story_line: MovieForm::require(form.story_line, "storyLine")?,
            poster: poster.data.to_vec(),
            genre_id,
        };
        payload.validate()?;

        let record = repository.create(payload).await?;
        debug!("Created movie {} titled {:?}", record.id, record.title);

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn update(
        Path(id): Path<i64>,
        repository: MovieRepository,
        genres: GenreRepository,
        multipart: Multipart,
    ) -> ApiResult<impl IntoResponse> {
        let form = MovieForm::from_multipart(multipart).await?;

        // existence first, then reference and poster checks, only then mutate
        repository.get(id).await.map_err(|e| match e {
            movies_dal::Error::RecordNotFound(_) => {
                ApiError::NotFound(format!("no movies found with ID! {id}"))
            }
            other => other.into(),
        })?;

        let genre_id = MovieForm::require(form.genre_id, "genreId")?;
        if !genres.exists(genre_id).await? {
            return Err(ApiError::InvalidRequest("Invalid genre ID!".to_string()));
        }

        if let Some(poster) = &form.poster {
            poster.validate()?;
        }

        let payload = UpdateMovie {
            title: MovieForm::require(form.title, "title")?,
            year: MovieForm::require(form.year, "year")?,
            rate: MovieForm::require(form.rate, "rate")?,
            story_line: MovieForm::require(form.story_line, "storyLine")?,
            poster: form.poster.map(|p| p.data.to_vec()),
            genre_id,
        };
        payload.validate()?;

        let record = repository.update(id, payload).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn delete(
        Path(id): Path<i64>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.delete(id).await.map_err(|e| match e {
            movies_dal::Error::RecordNotFound(_) => {
                ApiError::NotFound(format!("No Movie Was Found {id}"))
            }
            other => other.into(),
        })?;

        // deleted record's last known values
        Ok((StatusCode::OK, Json(record)))
    }
}

pub fn router(upload_limit_mb: usize) -> axum::Router<AppState> {
    use axum::extract::DefaultBodyLimit;

    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route("/GetByGenreId", get(crud_api::list_by_genre))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
        // must stay above MAX_POSTER_SIZE so oversized posters get the
        // descriptive 400 instead of a 413 from the framework
        .layer(DefaultBodyLimit::max(1024 * 1024 * upload_limit_mb))
}
