//! Glossary routes under `/api`.
//!
//! | method | path | result |
//! |---|---|---|
//! | GET | `/api/terms?skip&limit` | page of terms with total |
//! | POST | `/api/terms` | created term, `201` |
//! | GET | `/api/terms/search?q=` | matching terms |
//! | GET | `/api/terms/categories` | sorted categories |
//! | GET | `/api/terms/category/{category}` | terms in category |
//! | GET/PUT/DELETE | `/api/terms/{id}` | term, replaced term, `204` |
//! | GET | `/api/terms/{id}/related` | resolved relations |
//! | GET | `/api/relation-types` | relation vocabulary |

use axum::{
    extract::State,
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppContext,
    config::GlossarySettings,
    controller::{format, Json, Path, Query, Routes},
    glossary::{Pagination, RelationType, TermId, TermInput},
    Error, Result,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListParams {
    /// Resolves the requested window against the configured page sizes.
    ///
    /// # Errors
    ///
    /// Fails when `limit` is zero or above the configured maximum.
    pub fn pagination(&self, settings: &GlossarySettings) -> Result<Pagination> {
        let limit = self.limit.unwrap_or(settings.default_page_size);
        if limit == 0 || limit > settings.max_page_size {
            return Err(Error::Unprocessable(format!(
                "limit must be between 1 and {}",
                settings.max_page_size
            )));
        }
        Ok(Pagination::new(self.skip, limit))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RelationTypeView {
    pub label: &'static str,
    pub alias: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RelationTypesResponse {
    pub relation_types: Vec<RelationTypeView>,
}

pub async fn list(
    State(ctx): State<AppContext>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let page = params.pagination(ctx.glossary.settings())?;
    format::json(ctx.glossary.repository().list(page).await?)
}

pub async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    params.validate()?;
    format::json(ctx.glossary.repository().search(&params.q).await?)
}

pub async fn categories(State(ctx): State<AppContext>) -> Result<Response> {
    let categories = ctx.glossary.repository().categories().await?;
    format::json(CategoriesResponse { categories })
}

pub async fn by_category(
    State(ctx): State<AppContext>,
    Path(category): Path<String>,
) -> Result<Response> {
    format::json(ctx.glossary.repository().list_by_category(&category).await?)
}

pub async fn get_one(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response> {
    let term = ctx
        .glossary
        .repository()
        .get(&TermId::new(id))
        .await?
        .ok_or(Error::NotFound)?;
    format::json(term)
}

pub async fn related(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response> {
    let related = ctx
        .glossary
        .repository()
        .related(&TermId::new(id))
        .await?
        .ok_or(Error::NotFound)?;
    format::json(related)
}

pub async fn add(
    State(ctx): State<AppContext>,
    Json(input): Json<TermInput>,
) -> Result<Response> {
    input.validate()?;
    let term = ctx.glossary.repository().create(input).await?;
    tracing::info!(id = %term.id, "term created");
    format::created(term)
}

pub async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(input): Json<TermInput>,
) -> Result<Response> {
    input.validate()?;
    let term = ctx
        .glossary
        .repository()
        .update(&TermId::new(id), input)
        .await?
        .ok_or(Error::NotFound)?;
    tracing::info!(id = %term.id, "term updated");
    format::json(term)
}

pub async fn remove(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = TermId::new(id);
    if !ctx.glossary.repository().delete(&id).await? {
        return Err(Error::NotFound);
    }
    tracing::info!(id = %id, "term deleted");
    format::no_content()
}

pub async fn relation_types() -> Result<Response> {
    format::json(RelationTypesResponse {
        relation_types: RelationType::ALL
            .into_iter()
            .map(|kind| RelationTypeView {
                label: kind.label(),
                alias: kind.alias(),
            })
            .collect(),
    })
}

pub fn routes() -> Routes {
    Routes::new()
        .prefix("/api")
        .add("/terms", get(list).post(add))
        .add("/terms/search", get(search))
        .add("/terms/categories", get(categories))
        .add("/terms/category/{category}", get(by_category))
        .add("/terms/{id}", get(get_one).put(update).delete(remove))
        .add("/terms/{id}/related", get(related))
        .add("/relation-types", get(relation_types))
}
