use movies_dal::movie::MovieDetails;
use movies_e2e_tests::rest::{create_genre, create_movie, movie_form};
use movies_e2e_tests::{launch_env, prepare_env};
use tracing::info;
use tracing_test::traced_test;

const POSTER_BYTES: &[u8] = &[1, 2, 3];

#[tokio::test]
#[traced_test]
async fn test_create_and_list() {
    let (args, _config_guard) = prepare_env("test_create_and_list").unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args).await.unwrap();

    let drama = create_genre(&client, &base_url, "Drama").await.unwrap();
    let comedy = create_genre(&client, &base_url, "Comedy").await.unwrap();

    let movie = create_movie(
        &client,
        &base_url,
        movie_form("X", 2020, 7.5, "...", drama.id, Some(("p.png", POSTER_BYTES.to_vec()))),
    )
    .await
    .unwrap();
    assert!(movie.id > 0);
    assert_eq!(movie.poster, POSTER_BYTES);
    assert_eq!(movie.genre_id, drama.id);

    let better = create_movie(
        &client,
        &base_url,
        movie_form("Y", 2021, 9.1, "...", comedy.id, Some(("q.jpg", vec![7]))),
    )
    .await
    .unwrap();
    assert_ne!(better.id, movie.id);

    let response = client
        .get(base_url.join("api/movies").unwrap())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let movies: Vec<MovieDetails> = response.json().await.unwrap();
    info!("Listed {} movies", movies.len());
    assert_eq!(movies.len(), 2);
    // best rated first
    assert_eq!(movies[0].title, "Y");
    assert_eq!(movies[1].title, "X");
    assert_eq!(movies[1].genre_name, "Drama");
    assert_eq!(movies[1].poster, POSTER_BYTES);

    // filter by genre
    let response = client
        .get(base_url.join("api/movies/GetByGenreId").unwrap())
        .query(&[("genreId", drama.id)])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let movies: Vec<MovieDetails> = response.json().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "X");

    // unknown genre matches nothing
    let response = client
        .get(base_url.join("api/movies/GetByGenreId").unwrap())
        .query(&[("genreId", 9999)])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let movies: Vec<MovieDetails> = response.json().await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_get_by_id() {
    let (args, _config_guard) = prepare_env("test_get_by_id").unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args).await.unwrap();

    let genre = create_genre(&client, &base_url, "Drama").await.unwrap();
    let movie = create_movie(
        &client,
        &base_url,
        movie_form("X", 2020, 7.5, "...", genre.id, Some(("p.png", POSTER_BYTES.to_vec()))),
    )
    .await
    .unwrap();

    let url = base_url
        .join(&format!("api/movies/{}", movie.id))
        .unwrap();
    let response = client.get(url).send().await.unwrap();
    assert!(response.status().is_success());
    let details: MovieDetails = response.json().await.unwrap();
    assert_eq!(details.id, movie.id);
    assert_eq!(details.title, "X");
    assert_eq!(details.year, 2020);
    assert_eq!(details.rate, 7.5);
    assert_eq!(details.story_line, "...");
    assert_eq!(details.genre_id, genre.id);
    assert_eq!(details.genre_name, "Drama");
    assert_eq!(details.poster, POSTER_BYTES);

    let url = base_url.join("api/movies/9999").unwrap();
    let response = client.get(url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_create_rejections() {
    let (args, _config_guard) = prepare_env("test_create_rejections").unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args).await.unwrap();

    let genre = create_genre(&client, &base_url, "Drama").await.unwrap();
    let api_url = base_url.join("api/movies").unwrap();

    // missing poster
    let form = movie_form("X", 2020, 7.5, "...", genre.id, None);
    let response = client
        .post(api_url.clone())
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "poster is required!");

    // wrong extension
    let form = movie_form("X", 2020, 7.5, "...", genre.id, Some(("p.gif", vec![1])));
    let response = client
        .post(api_url.clone())
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "only .png or .jpg images are allowed!"
    );

    // oversized poster
    let oversized = vec![0u8; 1_048_577];
    let form = movie_form("X", 2020, 7.5, "...", genre.id, Some(("p.png", oversized)));
    let response = client
        .post(api_url.clone())
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "max allowed size for poster is 1MB!"
    );

    // unknown genre
    let form = movie_form("X", 2020, 7.5, "...", 9999, Some(("p.png", vec![1])));
    let response = client
        .post(api_url.clone())
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid Genre Id!");

    // none of the rejected requests persisted anything
    let response = client.get(api_url.clone()).send().await.unwrap();
    let movies: Vec<MovieDetails> = response.json().await.unwrap();
    assert!(movies.is_empty());

    // extension check is case insensitive
    let movie = create_movie(
        &client,
        &base_url,
        movie_form("X", 2020, 7.5, "...", genre.id, Some(("P.JPG", vec![1, 2]))),
    )
    .await
    .unwrap();
    assert_eq!(movie.poster, vec![1, 2]);
}

#[tokio::test]
#[traced_test]
async fn test_update() {
    let (args, _config_guard) = prepare_env("test_update").unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args).await.unwrap();

    let drama = create_genre(&client, &base_url, "Drama").await.unwrap();
    let horror = create_genre(&client, &base_url, "Horror").await.unwrap();
    let movie = create_movie(
        &client,
        &base_url,
        movie_form("X", 2020, 7.5, "...", drama.id, Some(("p.png", POSTER_BYTES.to_vec()))),
    )
    .await
    .unwrap();

    // unknown id
    let response = client
        .put(base_url.join("api/movies/9999").unwrap())
        .multipart(movie_form("X", 2020, 7.5, "...", drama.id, None))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        response.text().await.unwrap(),
        "no movies found with ID! 9999"
    );

    let movie_url = base_url
        .join(&format!("api/movies/{}", movie.id))
        .unwrap();

    // unknown genre, nothing mutated
    let response = client
        .put(movie_url.clone())
        .multipart(movie_form("Z", 2022, 8.0, "rewritten", 9999, None))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid genre ID!");

    // invalid poster, nothing mutated
    let response = client
        .put(movie_url.clone())
        .multipart(movie_form(
            "Z",
            2022,
            8.0,
            "rewritten",
            horror.id,
            Some(("p.bmp", vec![9])),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client.get(movie_url.clone()).send().await.unwrap();
    let details: MovieDetails = response.json().await.unwrap();
    assert_eq!(details.title, "X");
    assert_eq!(details.genre_id, drama.id);

    // update without poster overwrites scalars, keeps poster bytes
    let response = client
        .put(movie_url.clone())
        .multipart(movie_form("Z", 2022, 8.0, "rewritten", horror.id, None))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: movies_dal::movie::Movie = response.json().await.unwrap();
    assert_eq!(updated.title, "Z");
    assert_eq!(updated.year, 2022);
    assert_eq!(updated.rate, 8.0);
    assert_eq!(updated.story_line, "rewritten");
    assert_eq!(updated.genre_id, horror.id);
    assert_eq!(updated.poster, POSTER_BYTES);

    // update with poster replaces bytes
    let response = client
        .put(movie_url.clone())
        .multipart(movie_form(
            "Z",
            2022,
            8.0,
            "rewritten",
            horror.id,
            Some(("new.jpg", vec![4, 5, 6, 7])),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: movies_dal::movie::Movie = response.json().await.unwrap();
    assert_eq!(updated.poster, vec![4, 5, 6, 7]);
}

#[tokio::test]
#[traced_test]
async fn test_delete() {
    let (args, _config_guard) = prepare_env("test_delete").unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args).await.unwrap();

    let genre = create_genre(&client, &base_url, "Drama").await.unwrap();
    let movie = create_movie(
        &client,
        &base_url,
        movie_form("X", 2020, 7.5, "...", genre.id, Some(("p.png", POSTER_BYTES.to_vec()))),
    )
    .await
    .unwrap();

    let movie_url = base_url
        .join(&format!("api/movies/{}", movie.id))
        .unwrap();

    let response = client.delete(movie_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let deleted: movies_dal::movie::Movie = response.json().await.unwrap();
    assert_eq!(deleted.id, movie.id);
    assert_eq!(deleted.title, "X");
    assert_eq!(deleted.poster, POSTER_BYTES);

    let response = client.get(movie_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client.delete(movie_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        response.text().await.unwrap(),
        format!("No Movie Was Found {}", movie.id)
    );
}
