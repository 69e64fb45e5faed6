use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    models::{CreateMovieRequest, Movie, MovieFilter, UpdateMovieRequest},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// list_movies
///
/// [Public Route] Lists movies, optionally filtered by category, classification and a
/// case-insensitive title search.
#[utoipa::path(
    get,
    path = "/api/peliculas",
    params(MovieFilter),
    responses((status = 200, description = "Movies", body = [Movie]))
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(filter): Query<MovieFilter>,
) -> Result<Json<Vec<Movie>>, AppError> {
    Ok(Json(state.repo.list_movies(filter).await?))
}

/// get_movie
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/api/peliculas/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Found", body = Movie),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Movie>, AppError> {
    state
        .repo
        .get_movie(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("movie"))
}

/// create_movie
///
/// [Authenticated Route] Category and classification ids, when given, must exist (409 otherwise).
#[utoipa::path(
    post,
    path = "/api/peliculas",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Created", body = Movie),
        (status = 400, description = "Invalid title or duration"),
        (status = 409, description = "Unknown category or classification")
    )
)]
pub async fn create_movie(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<(StatusCode, Json<Movie>), AppError> {
    payload.validate().map_err(AppError::BadRequest)?;
    let movie = state.repo.create_movie(payload).await?;
    tracing::info!(user_id = user.id, movie_id = movie.id, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

/// update_movie
///
/// [Authenticated Route] Partial update.
#[utoipa::path(
    put,
    path = "/api/peliculas/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Updated", body = Movie),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_movie(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<Json<Movie>, AppError> {
    payload.validate().map_err(AppError::BadRequest)?;
    state
        .repo
        .update_movie(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("movie"))
}

/// delete_movie
///
/// [Authenticated Route]
#[utoipa::path(
    delete,
    path = "/api/peliculas/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_movie(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_movie(id).await? {
        tracing::info!(user_id = user.id, movie_id = id, "movie deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("movie"))
    }
}
