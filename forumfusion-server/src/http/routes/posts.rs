//! Post endpoints: feed, author listings, banner search

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{FeedSort, NewPost, Post, PostRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidEmail, ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{
    search_term, Body, Email, Paginated, Pagination, PaginationParams, TagName, Title,
};

/// A tag as clients send it: a bare name or a `{ "name": ... }` object
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    Name(String),
    Object { name: String },
}

impl TagInput {
    fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Object { name } => name,
        }
    }
}

/// Tag as returned to clients
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
}

/// Create post request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub author_name: String,
    pub author_email: Option<String>,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<TagInput>,
}

/// Post response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: Vec<TagRef>,
    pub up_vote: i32,
    pub down_vote: i32,
    pub comments_count: i32,
    pub post_time: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            author_name: p.author_name,
            author_email: p.author_email,
            author_image: p.author_image,
            title: p.title,
            description: p.description,
            tags: p.tags.into_iter().map(|name| TagRef { name }).collect(),
            up_vote: p.up_vote,
            down_vote: p.down_vote,
            comments_count: p.comments_count,
            post_time: p.post_time.to_rfc3339(),
        }
    }
}

/// Feed query: `page`, `size` (or `perPage`), `popularity`
#[derive(Deserialize)]
pub struct FeedParams {
    pub page: Option<u32>,
    #[serde(alias = "size", alias = "perPage")]
    pub per_page: Option<u32>,
    pub popularity: Option<bool>,
}

impl FeedParams {
    fn sort(&self) -> FeedSort {
        if self.popularity.unwrap_or(false) {
            FeedSort::Popularity
        } else {
            FeedSort::Recent
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::from(PaginationParams {
            page: self.page,
            per_page: self.per_page,
        })
    }
}

/// Feed response: the page, the ordering that produced it and page navigation
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub sort: &'static str,
    #[serde(flatten)]
    pub page: Paginated<PostResponse>,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl FeedResponse {
    fn new(sort: FeedSort, page: Paginated<PostResponse>) -> Self {
        Self {
            sort: sort.as_str(),
            total_pages: page.total_pages(),
            has_next: page.has_next(),
            has_prev: page.has_prev(),
            page,
        }
    }
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_count: u64,
}

#[derive(Deserialize)]
pub struct BannerSearchParams {
    pub q: Option<String>,
}

/// POST /addPost
async fn create_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let author_email = Email::new(req.author_email.as_deref().unwrap_or(user.email()))?;
    let title = Title::new(&req.title)?;
    let description = Body::new("description", &req.description)?;
    let tags = req
        .tags
        .iter()
        .map(|tag| TagName::new(tag.name()))
        .collect::<Result<Vec<_>, _>>()?;

    let post = PostRepo::new(&state.pool)
        .create(NewPost {
            author_name: req.author_name.trim().to_owned(),
            author_email,
            author_image: req.author_image,
            title,
            description,
            tags,
        })
        .await?;

    tracing::info!(post_id = %post.id, author = %post.author_email, "post created");
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// GET /posts?page=&size=&popularity=
async fn feed(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<FeedParams>,
) -> Result<Json<FeedResponse>, ApiError> {
    let sort = params.sort();
    let page = PostRepo::new(&state.pool)
        .feed(sort, params.pagination())
        .await?;

    Ok(Json(FeedResponse::new(sort, page.map(PostResponse::from))))
}

/// GET /postsCount
async fn count_posts(State(state): State<Arc<AppState>>) -> Result<Json<CountResponse>, ApiError> {
    let count = PostRepo::new(&state.pool).count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /myPosts/{email}
async fn posts_by_author(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidEmail(email): ValidEmail,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostRepo::new(&state.pool).by_author(email.as_str()).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /recentPosts/{email}
async fn recent_posts_by_author(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidEmail(email): ValidEmail,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostRepo::new(&state.pool)
        .recent_by_author(email.as_str())
        .await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /post/{id}
async fn get_post(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// DELETE /deletePost/{id} - comments and votes go with it
async fn delete_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted_count = PostRepo::new(&state.pool).delete(id).await?;
    tracing::info!(post_id = %id, by = %user.email(), deleted_count, "post deleted");
    Ok(Json(DeletedResponse { deleted_count }))
}

/// GET /bannerSearch?q=
async fn banner_search(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<BannerSearchParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostRepo::new(&state.pool)
        .search_by_tag(search_term(params.q.as_deref()))
        .await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/addPost", post(create_post))
        .route("/posts", get(feed))
        .route("/postsCount", get(count_posts))
        .route("/myPosts/{email}", get(posts_by_author))
        .route("/recentPosts/{email}", get(recent_posts_by_author))
        .route("/post/{id}", get(get_post))
        .route("/deletePost/{id}", delete(delete_post))
        .route("/bannerSearch", get(banner_search))
}
