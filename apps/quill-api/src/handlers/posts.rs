//! Post handlers: CRUD, public listing, owner dashboard.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, PostChange, User};
use quill_core::ports::{PageRequest, PostRepository, UserRepository};
use quill_shared::dto::{
    AuthorResponse, CreatePostRequest, MessageResponse, MyPostsResponse, PaginationInfo,
    PostListQuery, PostListResponse, PostResponse, PostStatsResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

fn post_view(post: Post, author: &User) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author: AuthorResponse {
            id: author.id,
            username: author.username.clone(),
            email: author.email.clone(),
        },
    }
}

/// Load the author of `post`. The foreign key makes a miss an internal
/// inconsistency, not a client error.
async fn author_of(state: &AppState, post: &Post) -> AppResult<User> {
    state
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Author missing for post {}", post.id)))
}

/// Resolve author views for a page of posts, one lookup per distinct author.
async fn with_authors(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostResponse>> {
    let mut authors: HashMap<Uuid, User> = HashMap::new();
    let mut views = Vec::with_capacity(posts.len());

    for post in posts {
        if !authors.contains_key(&post.author_id) {
            let author = author_of(state, &post).await?;
            authors.insert(post.author_id, author);
        }
        let author = &authors[&post.author_id];
        views.push(post_view(post, author));
    }

    Ok(views)
}

/// Sanitize page/limit query values; bad input falls back to defaults.
fn page_params(query: &PostListQuery) -> (u64, u64) {
    let page = query.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);
    (page, limit)
}

/// POST /api/posts - Protected
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = Post::new(
        identity.user_id,
        &req.title,
        &req.content,
        req.published.unwrap_or(false),
    )?;
    let post = state.posts.insert(post).await?;

    tracing::info!(post_id = %post.id, author_id = %identity.user_id, "Post created");

    let author = author_of(&state, &post).await?;
    Ok(HttpResponse::Created().json(post_view(post, &author)))
}

/// GET /api/posts - Public listing of published posts, newest first.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let (page, limit) = page_params(&query);

    let posts = state
        .posts
        .list_published(PageRequest::new(page, limit))
        .await?;
    let total = state.posts.count_published().await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: with_authors(&state, posts).await?,
        pagination: PaginationInfo::new(page, limit, total),
    }))
}

/// GET /api/posts/{id} - Public. No published filter: the detail page is
/// reachable from both public links and the owner's dashboard.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let author = author_of(&state, &post).await?;
    Ok(HttpResponse::Ok().json(post_view(post, &author)))
}

/// Fetch a post and check the requester owns it. Shared by update and delete.
async fn owned_post(state: &AppState, id: Uuid, requester: Uuid) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if !post.is_owned_by(requester) {
        return Err(AppError::Forbidden(
            "You can only modify your own posts".to_string(),
        ));
    }

    Ok(post)
}

/// PUT /api/posts/{id} - Protected, owner only.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut post = owned_post(&state, path.into_inner(), identity.user_id).await?;

    post.apply(PostChange {
        title: req.title,
        content: req.content,
        published: req.published,
    })?;

    let post = state.posts.update(post).await?;

    tracing::info!(post_id = %post.id, "Post updated");

    let author = author_of(&state, &post).await?;
    Ok(HttpResponse::Ok().json(post_view(post, &author)))
}

/// DELETE /api/posts/{id} - Protected, owner only. Irreversible.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, path.into_inner(), identity.user_id).await?;

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

/// GET /api/posts/my/posts - Protected. The owner sees drafts too, with
/// stats computed over their full post set regardless of filter or page.
pub async fn my_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let (page, limit) = page_params(&query);

    let posts = state
        .posts
        .list_by_author(identity.user_id, query.published, PageRequest::new(page, limit))
        .await?;
    let total = state
        .posts
        .count_by_author(identity.user_id, query.published)
        .await?;
    let stats = state.posts.author_stats(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(MyPostsResponse {
        posts: with_authors(&state, posts).await?,
        pagination: PaginationInfo::new(page, limit, total),
        stats: PostStatsResponse {
            total_posts: stats.total,
            published_posts: stats.published,
            draft_posts: stats.drafts,
        },
    }))
}
