//! Static narrative content for results.
//!
//! One entry per RIASEC trait, each with exactly three description /
//! suggestion variations and an icon token, plus the stream themes.

use std::fmt;

use serde::Serialize;

/// Trait whose content is shown when the dominant trait is not recognized.
pub const DEFAULT_TRAIT: &str = "Realistic";

/// Number of narrative variations per trait.
pub const VARIATIONS_PER_TRAIT: usize = 3;

/// One narrative variation for a trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Variation {
    pub description: &'static str,
    pub suggestion: &'static str,
}

/// Narrative content for one trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraitContent {
    pub name: &'static str,
    /// `glyph:tint` token for the front-end icon.
    pub icon: &'static str,
    pub variations: [Variation; VARIATIONS_PER_TRAIT],
}

/// All traits in canonical RIASEC order.
pub static TRAITS: [TraitContent; 6] = [
    TraitContent {
        name: "Realistic",
        icon: "rocket:pink",
        variations: [
            Variation {
                description: "You're a natural-born Engineer! You have a gifted hand for building, repairing, and understanding how complex machines click together.",
                suggestion: "Consider Civil Engineering, Mechanical Repair, Robotics, or specialized Aviation technology.",
            },
            Variation {
                description: "You're a technical Pioneer! You thrive when working hands-on with tools and creating physical solutions to everyday problems.",
                suggestion: "Explore paths in Architecture, Construction Management, Agriculture, or Automotive Engineering.",
            },
            Variation {
                description: "You're a master of the Physical World! You prefer activities that involve systematic manipulation of objects, tools, or animals.",
                suggestion: "You'd excel as a Wildlife Officer, Sports Scientist, Marine Technician, or Industrial Designer.",
            },
        ],
    },
    TraitContent {
        name: "Investigative",
        icon: "sparkles:blue",
        variations: [
            Variation {
                description: "You're a brilliant Scientist! Your mind naturally seeks to observe, learn, and evaluate through careful logic and research.",
                suggestion: "Consider a career as a Surgeon, Research Scientist, Data Analyst, or Forensic Expert.",
            },
            Variation {
                description: "You're a world-class Strategist! You enjoy solving abstract problems and digging deep into the 'why' behind everything.",
                suggestion: "Explore paths in Software Engineering, Psychology, Astrophysics, or Market Research.",
            },
            Variation {
                description: "You're an intellectual Explorer! You find fulfillment in discovering new facts and pushing the boundaries of human knowledge.",
                suggestion: "You'd be amazing as a Philosopher, Historian, Epidemiologist, or Cybersecurity Architect.",
            },
        ],
    },
    TraitContent {
        name: "Artistic",
        icon: "sparkles:purple",
        variations: [
            Variation {
                description: "You're a creative Visionary! You thrive in unstructured environments where you can express your unique perspective and original ideas.",
                suggestion: "Consider Graphic Design, Film Directing, Fashion Styling, or Novel Writing.",
            },
            Variation {
                description: "You're a master Performer! You have a natural flair for visual or performing arts and value self-expression above all else.",
                suggestion: "Explore paths in Music Production, Fine Arts, Theater, or Interior Architecture.",
            },
            Variation {
                description: "You're an Innovative Designer! You enjoy bringing beautiful concepts to life and challenging the status quo with your creativity.",
                suggestion: "You'd excel as an Advertising Creative, User Experience (UX) Designer, or Landscape Architect.",
            },
        ],
    },
    TraitContent {
        name: "Social",
        icon: "heart:red",
        variations: [
            Variation {
                description: "You're a gifted Educator! You find your true calling in helping, teaching, and developing the potential of those around you.",
                suggestion: "Consider paths in Teaching, Counseling, Healthcare Management, or Humanitarian Work.",
            },
            Variation {
                description: "You're a compassionate Healer! You have a natural ability to empathize with others and provide the support they need to thrive.",
                suggestion: "Explore careers in Medicine, Nursing, Physical Therapy, or Occupational Psychology.",
            },
            Variation {
                description: "You're a community Leader! You enjoy collaborating with people to solve social issues and improve the quality of life for others.",
                suggestion: "You'd be amazing in Public Relations, Social Work, Non-Profit Leadership, or Human Resources.",
            },
        ],
    },
    TraitContent {
        name: "Enterprising",
        icon: "rocket:orange",
        variations: [
            Variation {
                description: "You're a bold Entrepreneur! You have the drive and charisma to lead projects, influence people, and turn ideas into profitable realities.",
                suggestion: "Consider high-stakes paths in Business Management, Startup Leadership, Law, or Sales.",
            },
            Variation {
                description: "You're a strategic Businessman! You enjoy the challenge of competition and the satisfaction of reaching ambitious financial goals.",
                suggestion: "Explore careers in Venture Capital, Marketing Strategy, Corporate Law, or Stock Trading.",
            },
            Variation {
                description: "You're a dynamic Politician! You have a natural talent for public speaking and persuading others to join your vision for the future.",
                suggestion: "You'd excel in Political Science, International Relations, Public Policy, or Real Estate Development.",
            },
        ],
    },
    TraitContent {
        name: "Conventional",
        icon: "sparkles:green",
        variations: [
            Variation {
                description: "You're an organizational Expert! You appreciate precision, order, and working within clearly defined systems and data structures.",
                suggestion: "Consider vital roles in Finance, Accounting, Actuarial Science, or Database Administration.",
            },
            Variation {
                description: "You're a methodical Analyst! You have a sharp eye for detail and excel at ensuring everything runs smoothly and accurately.",
                suggestion: "Explore paths in Cybersecurity, Quality Assurance, Logistics Planning, or Technical Writing.",
            },
            Variation {
                description: "You're a master Coordinator! You find satisfaction in managing complex information and keeping operations perfectly organized.",
                suggestion: "You'd be amazing as a Compliance Officer, Office Manager, Information Architect, or Librarian.",
            },
        ],
    },
];

/// Content for `trait_name`, if it is one of the known traits.
pub fn lookup(trait_name: &str) -> Option<&'static TraitContent> {
    TRAITS.iter().find(|t| t.name == trait_name)
}

/// Content for `trait_name`, falling back to [`DEFAULT_TRAIT`].
pub fn lookup_or_default(trait_name: &str) -> &'static TraitContent {
    lookup(trait_name).unwrap_or(&TRAITS[0])
}

/// Position of a trait in canonical order, used to sort score listings.
pub fn canonical_rank(trait_name: &str) -> Option<usize> {
    TRAITS.iter().position(|t| t.name == trait_name)
}

/// Visual treatment for a recommended stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamCategory {
    Science,
    Commerce,
    Arts,
}

impl StreamCategory {
    /// Stream used when the service returns something unrecognized.
    pub const DEFAULT: StreamCategory = StreamCategory::Commerce;

    /// Map a stream name onto its category, ignoring case and surrounding
    /// whitespace. Unknown names fall back to [`Self::DEFAULT`].
    pub fn from_stream_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "science" => StreamCategory::Science,
            "commerce" => StreamCategory::Commerce,
            "arts" => StreamCategory::Arts,
            _ => Self::DEFAULT,
        }
    }

    /// Lowercase theme key.
    pub fn key(&self) -> &'static str {
        match self {
            StreamCategory::Science => "science",
            StreamCategory::Commerce => "commerce",
            StreamCategory::Arts => "arts",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StreamCategory::Science => "Science",
            StreamCategory::Commerce => "Commerce",
            StreamCategory::Arts => "Arts",
        }
    }
}

impl fmt::Display for StreamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_trait_has_three_distinct_variations() {
        for t in &TRAITS {
            assert_eq!(t.variations.len(), VARIATIONS_PER_TRAIT);
            assert_ne!(t.variations[0], t.variations[1], "{}", t.name);
            assert_ne!(t.variations[1], t.variations[2], "{}", t.name);
            assert!(!t.icon.is_empty());
        }
    }

    #[test]
    fn unknown_trait_falls_back_to_default() {
        assert!(lookup("Unknown").is_none());
        assert_eq!(lookup_or_default("Unknown").name, DEFAULT_TRAIT);
        assert_eq!(lookup_or_default("").name, DEFAULT_TRAIT);
        assert_eq!(lookup_or_default("Social").icon, "heart:red");
    }

    #[test]
    fn stream_names_are_case_normalized() {
        assert_eq!(
            StreamCategory::from_stream_name("SCIENCE"),
            StreamCategory::Science
        );
        assert_eq!(StreamCategory::from_stream_name(" arts "), StreamCategory::Arts);
        assert_eq!(
            StreamCategory::from_stream_name("Vocational"),
            StreamCategory::Commerce
        );
        assert_eq!(StreamCategory::from_stream_name(""), StreamCategory::Commerce);
        assert_eq!(StreamCategory::Arts.key(), "arts");
    }

    #[test]
    fn canonical_order() {
        assert_eq!(canonical_rank("Realistic"), Some(0));
        assert_eq!(canonical_rank("Conventional"), Some(5));
        assert_eq!(canonical_rank("General"), None);
    }
}
