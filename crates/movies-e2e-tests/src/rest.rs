use anyhow::Result;
use movies_dal::{genre::Genre, movie::Movie};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde_json::json;
use tracing::info;

pub async fn create_genre(client: &reqwest::Client, base_url: &Url, name: &str) -> Result<Genre> {
    let payload = json!({"name": name});
    let api_url = base_url.join("api/genres")?;

    let response = client.post(api_url.clone()).json(&payload).send().await?;
    assert!(response.status().is_success());
    assert_eq!(response.status().as_u16(), 201);

    let new_genre: Genre = response.json().await?;
    Ok(new_genre)
}

pub fn movie_form(
    title: &str,
    year: i32,
    rate: f64,
    story_line: &str,
    genre_id: i64,
    poster: Option<(&str, Vec<u8>)>,
) -> Form {
    let mut form = Form::new()
        .text("title", title.to_string())
        .text("year", year.to_string())
        .text("rate", rate.to_string())
        .text("storyLine", story_line.to_string())
        .text("genreId", genre_id.to_string());
    if let Some((file_name, data)) = poster {
        form = form.part("poster", Part::bytes(data).file_name(file_name.to_string()));
    }
    form
}

pub async fn create_movie(client: &reqwest::Client, base_url: &Url, form: Form) -> Result<Movie> {
    let api_url = base_url.join("api/movies")?;

    let response = client.post(api_url.clone()).multipart(form).send().await?;
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    assert_eq!(response.status().as_u16(), 200);

    let new_movie: Movie = response.json().await?;
    Ok(new_movie)
}
