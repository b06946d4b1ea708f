//! Episode filtering: selector options and the filter predicate.
//!
//! Filters always run against the full dataset. Each recomputation starts
//! from the complete list, so filters never accumulate across calls.

use crate::types::Episode;

/// Distinct values offered by the era, doctor and companion selectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub eras: Vec<String>,
    pub doctors: Vec<String>,
    pub companions: Vec<String>,
}

/// The current filter inputs. `None` means "no filter" for a selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub name_query: String,
    pub era: Option<String>,
    pub doctor: Option<String>,
    pub companion: Option<String>,
}

impl FilterCriteria {
    /// Whether every input is at its default.
    pub fn is_default(&self) -> bool {
        self.name_query.is_empty()
            && self.era.is_none()
            && self.doctor.is_none()
            && self.companion.is_none()
    }

    /// Test a single episode against all four conditions.
    pub fn matches(&self, episode: &Episode) -> bool {
        let matches_name = episode
            .title
            .to_lowercase()
            .contains(&self.name_query.to_lowercase());
        let matches_era = self
            .era
            .as_deref()
            .is_none_or(|era| episode.era.label() == era);
        let matches_doctor = self
            .doctor
            .as_deref()
            .is_none_or(|doctor| episode.doctor.actor == doctor);
        let matches_companion = self
            .companion
            .as_deref()
            .is_none_or(|companion| episode.companion_actor() == Some(companion));

        matches_name && matches_era && matches_doctor && matches_companion
    }
}

/// Collect distinct selector values in first-seen order.
///
/// Episodes without a companion contribute nothing to the companion list.
pub fn derive_options(episodes: &[Episode]) -> FilterOptions {
    let mut options = FilterOptions::default();

    for episode in episodes {
        push_unique(&mut options.eras, episode.era.label());
        push_unique(&mut options.doctors, &episode.doctor.actor);
        if let Some(actor) = episode.companion_actor() {
            push_unique(&mut options.companions, actor);
        }
    }

    options
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// Return the episodes matching `criteria`, in their original order.
pub fn apply_filters(episodes: &[Episode], criteria: &FilterCriteria) -> Vec<Episode> {
    episodes
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::parse_episodes;

    fn sample() -> Vec<Episode> {
        parse_episodes(
            r#"{"episodes": [
            {"rank": 1, "title": "Rose", "series": 1, "era": "Modern",
             "doctor": {"actor": "Christopher Eccleston", "incarnation": "Ninth Doctor"},
             "companion": {"actor": "Billie Piper", "character": "Rose Tyler"}},
            {"rank": 2, "title": "Blink", "series": 3, "era": "Modern",
             "doctor": {"actor": "David Tennant", "incarnation": "Tenth Doctor"},
             "companion": {"actor": "Freema Agyeman", "character": "Martha Jones"}},
            {"rank": 3, "title": "Heaven Sent", "series": 9, "era": "Recent",
             "doctor": {"actor": "Peter Capaldi", "incarnation": "Twelfth Doctor"}},
            {"rank": 4, "title": "The Doctor Falls", "series": 10, "era": "Recent",
             "doctor": {"actor": "Peter Capaldi", "incarnation": "Twelfth Doctor"},
             "companion": {"actor": "Pearl Mackie", "character": "Bill Potts"}}
        ]}"#,
        )
        .unwrap()
    }

    fn titles(episodes: &[Episode]) -> Vec<&str> {
        episodes.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_default_criteria_keeps_everything_in_order() {
        let data = sample();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_default());
        assert_eq!(apply_filters(&data, &criteria), data);
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let data = sample();
        let criteria = FilterCriteria {
            name_query: "DOC".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&apply_filters(&data, &criteria)), vec!["The Doctor Falls"]);
    }

    #[test]
    fn test_era_filter() {
        let data = sample();
        let criteria = FilterCriteria {
            era: Some("Recent".to_string()),
            ..Default::default()
        };
        assert_eq!(
            titles(&apply_filters(&data, &criteria)),
            vec!["Heaven Sent", "The Doctor Falls"]
        );
    }

    #[test]
    fn test_missing_companion_never_matches_companion_filter() {
        let data = sample();
        let criteria = FilterCriteria {
            companion: Some("River Song".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&data, &criteria).is_empty());
    }

    #[test]
    fn test_filters_are_anded() {
        let data = sample();
        let criteria = FilterCriteria {
            name_query: "e".to_string(),
            doctor: Some("Peter Capaldi".to_string()),
            companion: Some("Pearl Mackie".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&apply_filters(&data, &criteria)), vec!["The Doctor Falls"]);
    }

    #[test]
    fn test_derive_options_first_seen_order() {
        let options = derive_options(&sample());
        assert_eq!(options.eras, vec!["Modern", "Recent"]);
        assert_eq!(
            options.doctors,
            vec!["Christopher Eccleston", "David Tennant", "Peter Capaldi"]
        );
        assert_eq!(
            options.companions,
            vec!["Billie Piper", "Freema Agyeman", "Pearl Mackie"]
        );
    }

    #[test]
    fn test_derive_options_empty() {
        assert_eq!(derive_options(&[]), FilterOptions::default());
    }
}
