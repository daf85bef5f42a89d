//! Pagination extractor
//!
//! Reads `?page=&limit=` into a clamped [`PageRequest`], and the feed's `?sort=`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use wayfarer_core::{PageRequest, PostSort};

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Validated page/limit pagination
#[derive(Debug, Clone, Copy)]
pub struct PagePagination(pub PageRequest);

impl From<PaginationParams> for PagePagination {
    fn from(params: PaginationParams) -> Self {
        PagePagination(PageRequest::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PagePagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(params.into())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SortParams {
    #[serde(default)]
    sort: PostSort,
}

/// `?sort=latest|popular`, latest when absent
#[derive(Debug, Clone, Copy)]
pub struct FeedSort(pub PostSort);

#[async_trait]
impl<S> FromRequestParts<S> for FeedSort
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<SortParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(FeedSort(params.sort))
    }
}
