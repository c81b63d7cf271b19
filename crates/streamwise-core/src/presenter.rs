//! Result presentation.
//!
//! Turns a [`ScoredResult`] into display-ready content. The narrative
//! variation is drawn once, when the result arrives, and pinned in the
//! [`ResultView`] so every later render shows the same text. Nothing here
//! fails: unknown traits and streams degrade to documented defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::content::{self, StreamCategory, TraitContent, Variation, VARIATIONS_PER_TRAIT};
use crate::model::{RegistrationProfile, ReportId, ScoredResult};

/// Decimal places used when showing trait percentages.
pub const SCORE_DECIMALS: usize = 0;

/// Heading shown when the service names no dominant trait.
pub const UNNAMED_TRAIT_LABEL: &str = "General";

/// Pick the trait content and a uniformly random variation index for it.
///
/// Unknown traits resolve to the default trait's content.
pub fn select_variation<R: Rng + ?Sized>(
    dominant_trait: &str,
    rng: &mut R,
) -> (&'static TraitContent, usize) {
    let content = content::lookup_or_default(dominant_trait);
    (content, rng.gen_range(0..VARIATIONS_PER_TRAIT))
}

/// Map a stream name to its visual treatment.
pub fn select_stream_presentation(suggested_stream: &str) -> StreamCategory {
    StreamCategory::from_stream_name(suggested_stream)
}

/// One trait percentage, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedScore {
    pub trait_name: String,
    /// Raw percentage clamped to `[0, 100]`, for bar widths.
    pub percent: f64,
    /// Rounded percentage text, e.g. `"72%"`.
    pub display: String,
}

/// Format each trait's percentage, known traits first in canonical order.
///
/// Works on a borrowed map; the scored result itself is never touched.
pub fn format_scores(scores: &BTreeMap<String, f64>, decimals: usize) -> Vec<FormattedScore> {
    let mut entries: Vec<(&String, &f64)> = scores.iter().collect();
    entries.sort_by_key(|(name, _)| content::canonical_rank(name).unwrap_or(usize::MAX));

    entries
        .into_iter()
        .map(|(name, value)| {
            let percent = if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                0.0
            };
            FormattedScore {
                trait_name: name.clone(),
                percent,
                display: format!("{percent:.decimals$}%"),
            }
        })
        .collect()
}

/// A scored result pinned for display, with its narrative variation chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    profile: RegistrationProfile,
    scored: ScoredResult,
    variation_index: usize,
    received_at: DateTime<Utc>,
}

impl ResultView {
    /// Pin a freshly received result, drawing its variation from `rng`.
    pub fn new<R: Rng + ?Sized>(
        profile: RegistrationProfile,
        scored: ScoredResult,
        rng: &mut R,
    ) -> Self {
        let (_, variation_index) = select_variation(&scored.dominant_trait, rng);
        Self::with_variation(profile, scored, variation_index)
    }

    /// Pin a result with an explicit variation index (wrapped into range).
    pub fn with_variation(
        profile: RegistrationProfile,
        scored: ScoredResult,
        variation_index: usize,
    ) -> Self {
        Self {
            profile,
            scored,
            variation_index: variation_index % VARIATIONS_PER_TRAIT,
            received_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> &RegistrationProfile {
        &self.profile
    }

    pub fn scored(&self) -> &ScoredResult {
        &self.scored
    }

    pub fn report_id(&self) -> &ReportId {
        &self.scored.report_id
    }

    pub fn variation_index(&self) -> usize {
        self.variation_index
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn trait_content(&self) -> &'static TraitContent {
        content::lookup_or_default(&self.scored.dominant_trait)
    }

    pub fn variation(&self) -> &'static Variation {
        &self.trait_content().variations[self.variation_index]
    }

    pub fn stream(&self) -> StreamCategory {
        select_stream_presentation(&self.scored.suggested_stream)
    }

    /// Stream name as reported by the service, or the fallback category's
    /// name when it reported none.
    pub fn stream_name(&self) -> &str {
        match self.scored.suggested_stream.trim() {
            "" => self.stream().display_name(),
            name => name,
        }
    }

    /// Dominant trait as reported by the service, or [`UNNAMED_TRAIT_LABEL`].
    pub fn dominant_trait(&self) -> &str {
        match self.scored.dominant_trait.trim() {
            "" => UNNAMED_TRAIT_LABEL,
            name => name,
        }
    }

    /// Build everything a front-end needs to show the results page.
    ///
    /// Names come from the service verbatim; the fallbacks only choose the
    /// theme, icon and narrative.
    pub fn render(&self) -> Presentation {
        let content = self.trait_content();
        let variation = self.variation();
        let stream_name = self.stream_name().to_string();
        Presentation {
            greeting: format!("Mission Accomplished, {}!", self.profile.name),
            stream: self.stream(),
            stream_blurb: format!(
                "Based on our expert analysis, the {stream_name} stream perfectly aligns with your natural talents and interests."
            ),
            stream_name,
            dominant_trait: self.dominant_trait().to_string(),
            trait_name: content.name,
            icon: content.icon,
            description: variation.description,
            suggestion: variation.suggestion,
            scores: format_scores(&self.scored.scores, SCORE_DECIMALS),
            report_id: self.scored.report_id.clone(),
        }
    }
}

/// Display-ready results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub greeting: String,
    /// Theme category for the recommended stream.
    pub stream: StreamCategory,
    /// Recommended stream as reported.
    pub stream_name: String,
    pub stream_blurb: String,
    /// Dominant trait as reported.
    pub dominant_trait: String,
    /// Name of the trait whose content is shown.
    pub trait_name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub suggestion: &'static str,
    pub scores: Vec<FormattedScore>,
    pub report_id: ReportId,
}
