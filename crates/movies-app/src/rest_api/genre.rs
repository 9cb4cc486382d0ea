use movies_dal::genre::{CreateGenre, GenreRepository};

use crate::state::AppState;
#[allow(unused_imports)]
use axum::routing::{delete, get, post, put};
crate::repository_from_request!(GenreRepository);

mod crud_api {
    use super::*;
    use crate::error::{ApiError, ApiResult};
    use axum::{extract::Path, response::IntoResponse, Json};
    use axum_valid::Garde;
    use http::StatusCode;

    pub async fn list(repository: GenreRepository) -> ApiResult<impl IntoResponse> {
        let genres = repository.list().await?;
        Ok((StatusCode::OK, Json(genres)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: GenreRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(id).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn create(
        repository: GenreRepository,
        Garde(Json(payload)): Garde<Json<CreateGenre>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;

        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn update(
        Path(id): Path<i64>,
        repository: GenreRepository,
        Garde(Json(payload)): Garde<Json<CreateGenre>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository
            .update(id, payload)
            .await
            .map_err(|e| match e {
                movies_dal::Error::RecordNotFound(_) => {
                    ApiError::NotFound(format!("no genre found with ID! {id}"))
                }
                other => other.into(),
            })?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn delete(
        Path(id): Path<i64>,
        repository: GenreRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.delete(id).await.map_err(|e| match e {
            movies_dal::Error::RecordNotFound(_) => {
                ApiError::NotFound(format!("no genre found with ID! {id}"))
            }
            other => other.into(),
        })?;

        // deleted record's last known values
        Ok((StatusCode::OK, Json(record)))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
}
