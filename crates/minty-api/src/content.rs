//! Read-only handlers over the testimonial and case-study collections.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/testimonials` | `?industry=<slug\|all>&minRating=<0-5>` |
//! | `GET`  | `/testimonials/featured` | Carousel items |
//! | `GET`  | `/testimonials/industries` | Dropdown options |
//! | `GET`  | `/case-studies` | `?category=<name\|all>&search=<text>` |
//! | `GET`  | `/case-studies/featured` | |
//! | `GET`  | `/case-studies/categories` | |
//! | `GET`  | `/case-studies/{slug}` | 404 if not found |
//!
//! Responses borrow from the store and are serialised before returning.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
  response::{IntoResponse, Response},
};
use minty_core::{
  content::{CaseStudy, ContentStore},
  envelope::Envelope,
  filter::{
    self, CaseStudyCriteria, Filtered, Selection, TestimonialCriteria,
  },
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Related studies shown under a case study.
pub const RELATED_LIMIT: usize = 2;

/// A filtered listing with the counts the page header shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<'a, T> {
  pub items:       Vec<&'a T>,
  pub showing:     usize,
  pub total:       usize,
  pub needs_reset: bool,
}

impl<'a, T> From<Filtered<'a, T>> for Listing<'a, T> {
  fn from(f: Filtered<'a, T>) -> Self {
    Self {
      showing:     f.items.len(),
      total:       f.total,
      needs_reset: f.needs_reset(),
      items:       f.items,
    }
  }
}

fn ok<T: Serialize>(data: T) -> Response {
  Json(Envelope::ok(data)).into_response()
}

fn query<T>(q: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
  q.map(|Query(params)| params).map_err(|e| {
    ApiError::Validation(format!("Invalid query: {}", e.body_text()))
  })
}

// ─── Testimonials ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialParams {
  pub industry:   Option<String>,
  pub min_rating: Option<u8>,
}

/// `GET /testimonials[?industry=..][&minRating=..]`
pub async fn testimonials(
  State(store): State<Arc<ContentStore>>,
  params: Result<Query<TestimonialParams>, QueryRejection>,
) -> Result<Response, ApiError> {
  let params = query(params)?;
  let criteria = TestimonialCriteria {
    industry:   Selection::from(params.industry),
    min_rating: params.min_rating.unwrap_or(0),
  };
  Ok(ok(Listing::from(filter::filter(store.testimonials(), &criteria))))
}

/// `GET /testimonials/featured`
pub async fn featured_testimonials(
  State(store): State<Arc<ContentStore>>,
) -> Response {
  ok(store.featured_testimonials())
}

/// `GET /testimonials/industries`
pub async fn industries(State(store): State<Arc<ContentStore>>) -> Response {
  ok(filter::industry_options(store.testimonials()))
}

// ─── Case studies ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CaseStudyParams {
  pub category: Option<String>,
  pub search:   Option<String>,
}

/// `GET /case-studies[?category=..][&search=..]`
pub async fn case_studies(
  State(store): State<Arc<ContentStore>>,
  params: Result<Query<CaseStudyParams>, QueryRejection>,
) -> Result<Response, ApiError> {
  let params = query(params)?;
  let criteria = CaseStudyCriteria {
    category: Selection::from(params.category),
    search:   params.search.unwrap_or_default(),
  };
  Ok(ok(Listing::from(filter::filter(store.case_studies(), &criteria))))
}

/// `GET /case-studies/featured`
pub async fn featured_case_studies(
  State(store): State<Arc<ContentStore>>,
) -> Response {
  ok(store.featured_case_studies())
}

/// `GET /case-studies/categories`
pub async fn categories(State(store): State<Arc<ContentStore>>) -> Response {
  ok(filter::categories(store.case_studies()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyPage<'a> {
  pub case_study: &'a CaseStudy,
  pub related:    Vec<&'a CaseStudy>,
}

/// `GET /case-studies/{slug}`
pub async fn case_study(
  State(store): State<Arc<ContentStore>>,
  Path(slug): Path<String>,
) -> Result<Response, ApiError> {
  let study = store
    .case_study(&slug)
    .ok_or_else(|| ApiError::NotFound("Case study not found".into()))?;
  Ok(ok(CaseStudyPage {
    case_study: study,
    related:    store.related(study, RELATED_LIMIT),
  }))
}
