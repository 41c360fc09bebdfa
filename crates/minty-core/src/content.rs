//! The content store: testimonials and case studies loaded once from JSON.
//!
//! Everything here is immutable after [`ContentStore::load`]. Share the store
//! behind an `Arc`; no locking is needed.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const TESTIMONIALS_FILE: &str = "testimonials.json";
pub const CASE_STUDIES_FILE: &str = "case_studies.json";

// ─── Records ─────────────────────────────────────────────────────────────────

/// A client quote shown on the home-page carousel and the testimonials page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
  pub id:               String,
  pub author:           String,
  /// Avatar initials, e.g. `"SC"`.
  pub initial:          String,
  pub title:            String,
  pub company:          String,
  pub quote:            String,
  /// Star rating, 1 to 5.
  pub rating:           u8,
  pub industry:         String,
  pub project_duration: String,
  pub team_size:        String,
  #[serde(default)]
  pub featured:         bool,
}

/// One headline number on a case study, e.g. `{"metric":"3x","label":"faster releases"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetric {
  pub metric: String,
  pub label:  String,
}

/// The client quote embedded in a case study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudyQuote {
  pub quote:   String,
  pub author:  String,
  pub title:   String,
  pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
  pub id:           String,
  pub category:     String,
  pub duration:     String,
  pub title:        String,
  pub team_size:    String,
  pub challenge:    String,
  pub solution:     String,
  pub results:      Vec<ResultMetric>,
  pub testimonial:  CaseStudyQuote,
  pub technologies: Vec<String>,
  #[serde(default)]
  pub featured:     bool,
  /// Unique across the store; used as the detail route key.
  pub slug:         String,
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
  testimonials: Vec<Testimonial>,
  case_studies: Vec<CaseStudy>,
}

impl ContentStore {
  /// Read `testimonials.json` and `case_studies.json` from `dir`.
  pub fn load(dir: &Path) -> Result<Self> {
    let testimonials = read_json(&dir.join(TESTIMONIALS_FILE))?;
    let case_studies = read_json(&dir.join(CASE_STUDIES_FILE))?;
    Self::new(testimonials, case_studies)
  }

  /// Build a store from in-memory collections, enforcing the rating range
  /// and slug uniqueness.
  pub fn new(
    testimonials: Vec<Testimonial>,
    case_studies: Vec<CaseStudy>,
  ) -> Result<Self> {
    if let Some(t) = testimonials.iter().find(|t| !(1..=5).contains(&t.rating))
    {
      return Err(Error::RatingOutOfRange {
        id:     t.id.clone(),
        rating: t.rating,
      });
    }

    let mut seen = HashSet::new();
    for cs in &case_studies {
      if !seen.insert(cs.slug.as_str()) {
        return Err(Error::DuplicateSlug(cs.slug.clone()));
      }
    }

    Ok(Self {
      testimonials,
      case_studies,
    })
  }

  pub fn testimonials(&self) -> &[Testimonial] { &self.testimonials }

  pub fn case_studies(&self) -> &[CaseStudy] { &self.case_studies }

  /// Testimonials flagged for the home-page carousel, in file order.
  pub fn featured_testimonials(&self) -> Vec<&Testimonial> {
    self.testimonials.iter().filter(|t| t.featured).collect()
  }

  /// Case studies flagged for the home-page highlight list, in file order.
  pub fn featured_case_studies(&self) -> Vec<&CaseStudy> {
    self.case_studies.iter().filter(|cs| cs.featured).collect()
  }

  pub fn case_study(&self, slug: &str) -> Option<&CaseStudy> {
    self.case_studies.iter().find(|cs| cs.slug == slug)
  }

  /// Up to `limit` other case studies in the same category as `study`.
  pub fn related<'a>(
    &'a self,
    study: &CaseStudy,
    limit: usize,
  ) -> Vec<&'a CaseStudy> {
    self
      .case_studies
      .iter()
      .filter(|cs| cs.id != study.id && cs.category == study.category)
      .take(limit)
      .collect()
  }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
  let raw = fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&raw).map_err(|source| Error::Parse {
    path: path.to_path_buf(),
    source,
  })
}
