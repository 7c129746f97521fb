//! Hairstyle recommendation aggregation.
//!
//! Expands classified shape features into hairstyles through an external
//! catalog, merging duplicates by keeping the strongest supporting signal: a
//! hairstyle reachable through several plausible face shapes is ranked by
//! its best probability, not diluted by weaker ones.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::classifier::LabeledProbability;
use crate::error::ManeError;

/// External lookup joining shape features to hairstyles and hairstyles to
/// their presentation images.
pub trait HairstyleCatalog: Send + Sync {
    /// The hairstyles configured for `feature`.
    ///
    /// An absent feature is a configuration fault and fails with
    /// [`ManeError::UnknownFeature`]; it is never reported as an empty list.
    fn featured_hairstyles(&self, feature: &str) -> Result<Vec<String>, ManeError>;

    /// The stored image reference for `hairstyle`.
    fn hairstyle_image(&self, hairstyle: &str) -> Result<String, ManeError>;
}

/// A ranked hairstyle suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct HairstyleRecommendation {
    /// The hairstyle name.
    pub hairstyle: String,
    /// Opaque image reference for presentation.
    pub image: String,
    /// Strongest supporting probability across matching features.
    pub probability: f32,
}

/// Catalog backed by eagerly-loaded in-memory maps.
///
/// This is the lookup the pipeline runs against at request time; ingestion
/// from persistent storage happens elsewhere and hands the finished maps in.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    featured: HashMap<String, Vec<String>>,
    images: HashMap<String, String>,
}

impl MemoryCatalog {
    /// Build a catalog from feature->hairstyles and hairstyle->image maps.
    pub fn new(featured: HashMap<String, Vec<String>>, images: HashMap<String, String>) -> Self {
        Self { featured, images }
    }
}

impl HairstyleCatalog for MemoryCatalog {
    fn featured_hairstyles(&self, feature: &str) -> Result<Vec<String>, ManeError> {
        self.featured
            .get(feature)
            .cloned()
            .ok_or_else(|| ManeError::UnknownFeature(feature.to_string()))
    }

    fn hairstyle_image(&self, hairstyle: &str) -> Result<String, ManeError> {
        self.images
            .get(hairstyle)
            .cloned()
            .ok_or_else(|| ManeError::UnknownHairstyle(hairstyle.to_string()))
    }
}

/// Merge per-feature hairstyle matches into one deduplicated, ranked list.
///
/// For each classified `(feature, probability)` pair, every matching
/// hairstyle records that probability; a hairstyle seen again keeps the
/// maximum of its recorded and new probability. The final list is sorted by
/// probability descending with a stable sort, so ties keep first-seen order.
pub fn aggregate_recommendations(
    ranked: &[LabeledProbability],
    catalog: &dyn HairstyleCatalog,
) -> Result<Vec<HairstyleRecommendation>, ManeError> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut merged: HashMap<String, f32> = HashMap::new();

    for feature in ranked {
        for hairstyle in catalog.featured_hairstyles(&feature.label)? {
            match merged.entry(hairstyle) {
                Entry::Occupied(mut entry) => {
                    if feature.probability > *entry.get() {
                        entry.insert(feature.probability);
                    }
                }
                Entry::Vacant(entry) => {
                    first_seen.push(entry.key().clone());
                    entry.insert(feature.probability);
                }
            }
        }
    }

    let mut recommendations = Vec::with_capacity(first_seen.len());
    for hairstyle in first_seen {
        let image = catalog.hairstyle_image(&hairstyle)?;
        let probability = merged[&hairstyle];
        recommendations.push(HairstyleRecommendation {
            hairstyle,
            image,
            probability,
        });
    }
    recommendations.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
    Ok(recommendations)
}
