use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    About,
    Experience,
    Education,
}

impl SectionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::About => "about",
            SectionId::Experience => "experience",
            SectionId::Education => "education",
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            SectionId::About => "about",
            SectionId::Experience => "Professional Experience",
            SectionId::Education => "Educational Qualifications",
        }
    }
}

const DESKTOP_SECTIONS: &[SectionId] = &[SectionId::About, SectionId::Experience];
const COMPACT_SECTIONS: &[SectionId] = &[
    SectionId::About,
    SectionId::Experience,
    SectionId::Education,
];

/// Sections in the scrollable column. On desktop, education moves to the
/// fixed left column and is no longer navigable.
pub fn section_ids(is_desktop: bool) -> &'static [SectionId] {
    if is_desktop {
        DESKTOP_SECTIONS
    } else {
        COMPACT_SECTIONS
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub id: SectionId,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub is_desktop: bool,
    pub nav: Vec<NavItem>,
    /// Education list rendered in the left column (desktop only).
    pub education_in_header: bool,
    pub show_timeline: bool,
}

pub fn page_layout(is_desktop: bool, active: SectionId) -> PageLayout {
    PageLayout {
        is_desktop,
        nav: section_ids(is_desktop)
            .iter()
            .map(|&id| NavItem {
                id,
                label: id.nav_label(),
                active: id == active,
            })
            .collect(),
        education_in_header: is_desktop,
        show_timeline: is_desktop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_hides_education_section() {
        assert_eq!(
            section_ids(true),
            &[SectionId::About, SectionId::Experience]
        );
        assert_eq!(section_ids(false).len(), 3);
    }

    #[test]
    fn test_page_layout_marks_active_nav_item() {
        let layout = page_layout(false, SectionId::Education);
        let active: Vec<_> = layout.nav.iter().filter(|n| n.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "Educational Qualifications");
        assert!(!layout.show_timeline);
    }
}
