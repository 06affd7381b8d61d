//! View models for the experience and education cards.

use serde::Serialize;

use crate::models::resume::{Education, Experience, Project};
use crate::resume::images::ImageFallback;
use crate::resume::store::ResumeStore;

/// Which experience card, if any, currently shows its project story.
/// At most one card is expanded at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: Option<String>,
}

impl ExpansionState {
    pub fn new(expanded: Option<String>) -> Self {
        Self { expanded }
    }

    pub fn is_expanded(&self, experience_id: &str) -> bool {
        self.expanded.as_deref() == Some(experience_id)
    }

    /// Expands `experience_id`, or collapses it if it is already expanded.
    pub fn toggle(&mut self, experience_id: &str) {
        if self.is_expanded(experience_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(experience_id.to_string());
        }
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStory<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    /// Image source to try first; `None` renders the placeholder.
    pub image_src: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceCard<'a> {
    #[serde(flatten)]
    pub experience: &'a Experience,
    /// True when the card offers the expand/collapse toggle.
    pub expandable: bool,
    pub expanded: bool,
    pub toggle_label: Option<&'static str>,
    /// Present only while the card is expanded.
    pub story: Option<ProjectStory<'a>>,
    /// Thumbnail under the dates, shown whenever the linked project has an image.
    pub thumbnail: Option<String>,
}

const EXPAND_LABEL: &str = "Expand for project details";
const COLLAPSE_LABEL: &str = "Collapse project details";

/// Builds the experience cards in display order (most recent first).
pub fn experience_cards<'a>(
    store: &'a ResumeStore,
    expansion: &ExpansionState,
    current_year: i32,
) -> Vec<ExperienceCard<'a>> {
    store
        .sorted_experience(current_year)
        .into_iter()
        .map(|experience| build_card(experience, store.project_for(experience), expansion))
        .collect()
}

fn build_card<'a>(
    experience: &'a Experience,
    project: Option<&'a Project>,
    expansion: &ExpansionState,
) -> ExperienceCard<'a> {
    let Some(project) = project else {
        return ExperienceCard {
            experience,
            expandable: false,
            expanded: false,
            toggle_label: None,
            story: None,
            thumbnail: None,
        };
    };

    let expanded = expansion.is_expanded(&experience.id);
    let image_src = ImageFallback::new(project.image.as_deref()).current().map(str::to_string);
    ExperienceCard {
        experience,
        expandable: true,
        expanded,
        toggle_label: Some(if expanded { COLLAPSE_LABEL } else { EXPAND_LABEL }),
        story: expanded.then(|| ProjectStory {
            project,
            image_src: image_src.clone(),
        }),
        thumbnail: image_src,
    }
}

/// Education entries in display order (most recent first).
pub fn education_cards(store: &ResumeStore, current_year: i32) -> Vec<&Education> {
    store.sorted_education(current_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::store::fixtures::*;

    #[test]
    fn test_toggle_expands_then_collapses() {
        let mut state = ExpansionState::default();
        state.toggle("exp-1");
        assert!(state.is_expanded("exp-1"));
        state.toggle("exp-2");
        assert!(!state.is_expanded("exp-1"));
        assert!(state.is_expanded("exp-2"));
        state.toggle("exp-2");
        assert_eq!(state.expanded(), None);
    }

    #[test]
    fn test_unresolved_project_has_no_detail_section() {
        let store = ResumeStore::new(resume(
            vec![experience("exp-1", "2020 — 2022", Some("proj-missing"))],
            vec![],
            vec![project("proj-1", Some("projects/a.png"))],
        ));
        let expansion = ExpansionState::new(Some("exp-1".to_string()));

        let cards = experience_cards(&store, &expansion, 2026);
        assert_eq!(cards.len(), 1);
        assert!(!cards[0].expandable);
        assert!(!cards[0].expanded);
        assert!(cards[0].story.is_none());
        assert!(cards[0].toggle_label.is_none());
    }

    #[test]
    fn test_expanded_card_carries_project_story() {
        let store = ResumeStore::new(resume(
            vec![
                experience("exp-1", "2020 — 2022", Some("proj-1")),
                experience("exp-2", "2018 — 2020", Some("proj-1")),
            ],
            vec![],
            vec![project("proj-1", Some("projects/a.png"))],
        ));
        let expansion = ExpansionState::new(Some("exp-1".to_string()));

        let cards = experience_cards(&store, &expansion, 2026);
        let first = &cards[0];
        assert!(first.expanded);
        assert_eq!(first.toggle_label, Some(COLLAPSE_LABEL));
        let story = first.story.as_ref().unwrap();
        assert_eq!(story.project.id, "proj-1");
        assert_eq!(story.image_src.as_deref(), Some("projects/a.png"));

        let second = &cards[1];
        assert!(second.expandable);
        assert!(!second.expanded);
        assert!(second.story.is_none());
        assert_eq!(second.thumbnail.as_deref(), Some("projects/a.png"));
    }

    #[test]
    fn test_card_serializes_flattened_experience() {
        let store = ResumeStore::new(resume(
            vec![experience("exp-1", "2020", None)],
            vec![],
            vec![],
        ));
        let cards = experience_cards(&store, &ExpansionState::default(), 2026);
        let value = serde_json::to_value(&cards[0]).unwrap();
        assert_eq!(value["id"], "exp-1");
        assert_eq!(value["expandable"], false);
    }
}
