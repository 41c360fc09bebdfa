//! The filter engine behind the testimonial and case-study listings.
//!
//! Filters are pure projections over borrowed records: they keep input order,
//! never re-sort and never touch the store. Each criterion has an "all"
//! sentinel that matches everything, and active criteria combine with AND.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::content::{CaseStudy, Testimonial};

/// Value used by listing pages to mean "no restriction".
pub const ALL: &str = "all";

// ─── Criteria ────────────────────────────────────────────────────────────────

/// A predicate over records of type `T`.
pub trait Criteria<T> {
  fn matches(&self, item: &T) -> bool;

  /// `false` when every predicate is at its sentinel value.
  fn is_active(&self) -> bool;
}

/// A single-choice dropdown value: either everything, or one option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
  #[default]
  All,
  Only(String),
}

impl Selection {
  /// Empty strings and `"all"` (any case) select everything.
  pub fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
      Self::All
    } else {
      Self::Only(raw.to_owned())
    }
  }

  fn admits(&self, value: &str) -> bool {
    match self {
      Self::All => true,
      Self::Only(v) => v == value,
    }
  }
}

impl From<Option<String>> for Selection {
  fn from(raw: Option<String>) -> Self {
    raw.as_deref().map(Self::parse).unwrap_or_default()
  }
}

/// Testimonial listing filters: industry dropdown plus minimum star rating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestimonialCriteria {
  /// Compared against [`slugify`]`(testimonial.industry)`.
  pub industry:   Selection,
  /// `0` admits every rating.
  pub min_rating: u8,
}

impl Criteria<Testimonial> for TestimonialCriteria {
  fn matches(&self, t: &Testimonial) -> bool {
    self.industry.admits(&slugify(&t.industry))
      && (self.min_rating == 0 || t.rating >= self.min_rating)
  }

  fn is_active(&self) -> bool {
    self.industry != Selection::All || self.min_rating != 0
  }
}

/// Case-study listing filters: category dropdown plus a free-text search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseStudyCriteria {
  /// Exact match on `category`.
  pub category: Selection,
  /// Case-insensitive substring over title, challenge and category.
  pub search:   String,
}

impl Criteria<CaseStudy> for CaseStudyCriteria {
  fn matches(&self, cs: &CaseStudy) -> bool {
    if !self.category.admits(&cs.category) {
      return false;
    }
    let needle = self.search.trim().to_lowercase();
    needle.is_empty()
      || [&cs.title, &cs.challenge, &cs.category]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
  }

  fn is_active(&self) -> bool {
    self.category != Selection::All || !self.search.trim().is_empty()
  }
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// The outcome of running a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered<'a, T> {
  pub items:  Vec<&'a T>,
  /// Number of records considered.
  pub total:  usize,
  /// Whether any criterion was narrowing the listing.
  pub active: bool,
}

impl<T> Filtered<'_, T> {
  /// An empty listing caused by the current criteria, as opposed to an empty
  /// collection. The UI offers "clear all filters" in this case.
  pub fn needs_reset(&self) -> bool { self.active && self.items.is_empty() }
}

/// Keep the records matching `criteria`, in input order.
pub fn filter<'a, T, C, I>(records: I, criteria: &C) -> Filtered<'a, T>
where
  T: 'a,
  C: Criteria<T>,
  I: IntoIterator<Item = &'a T>,
{
  let mut total = 0;
  let items = records
    .into_iter()
    .inspect(|_| total += 1)
    .filter(|item| criteria.matches(item))
    .collect();
  Filtered {
    items,
    total,
    active: criteria.is_active(),
  }
}

// ─── Dropdown options ────────────────────────────────────────────────────────

/// Lower-case `s` and replace each run of whitespace with a single `-`.
pub fn slugify(s: &str) -> String {
  s.split_whitespace()
    .map(str::to_lowercase)
    .collect::<Vec<_>>()
    .join("-")
}

/// One entry in the industry dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryOption {
  pub label: String,
  pub value: String,
}

/// Distinct industries in first-seen order, keyed by slug.
pub fn industry_options(testimonials: &[Testimonial]) -> Vec<IndustryOption> {
  let mut seen = HashSet::new();
  testimonials
    .iter()
    .map(|t| IndustryOption {
      label: t.industry.clone(),
      value: slugify(&t.industry),
    })
    .filter(|opt| seen.insert(opt.value.clone()))
    .collect()
}

/// Distinct categories in first-seen order.
pub fn categories(case_studies: &[CaseStudy]) -> Vec<&str> {
  let mut seen = HashSet::new();
  case_studies
    .iter()
    .map(|cs| cs.category.as_str())
    .filter(|c| seen.insert(*c))
    .collect()
}
