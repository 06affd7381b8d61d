use serde::{Deserialize, Serialize};

/// Icon shown next to a social link. Unknown names deserialize to `Other`
/// and render as a generic external-link icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconName {
    Github,
    Linkedin,
    Twitter,
    Mail,
    FileText,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon_name: IconName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    /// Free-text date range, e.g. "May 2021 — Sep 2024".
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Project story embedded under this experience, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Path relative to the asset directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

/// The whole resume record. Loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub availability: bool,
    /// Target of the "View Full Resume" link, kept apart from the socials.
    #[serde(default)]
    pub resume_url: String,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_camel_case_record() {
        let value = json!({
            "name": "Ada",
            "title": "Engineer",
            "bio": "bio",
            "location": "Somewhere",
            "availability": true,
            "resumeUrl": "resume.pdf",
            "socials": [{ "platform": "GitHub", "url": "https://github.com/ada", "iconName": "Github" }],
            "experience": [{
                "id": "exp-1",
                "company": "Acme",
                "role": "Engineer",
                "period": "2020 — Present",
                "description": "d",
                "technologies": ["Rust"],
                "projectId": "proj-1"
            }],
            "education": [],
            "projects": [],
            "skills": []
        });

        let data: ResumeData = serde_json::from_value(value).unwrap();
        assert_eq!(data.resume_url, "resume.pdf");
        assert_eq!(data.socials[0].icon_name, IconName::Github);
        assert_eq!(data.experience[0].project_id.as_deref(), Some("proj-1"));
    }

    #[test]
    fn test_unknown_icon_falls_back_to_other() {
        let link: SocialLink = serde_json::from_value(json!({
            "platform": "Mastodon",
            "url": "https://example.social/@ada",
            "iconName": "Mastodon"
        }))
        .unwrap();
        assert_eq!(link.icon_name, IconName::Other);
    }

    #[test]
    fn test_optional_project_fields_are_omitted_when_absent() {
        let project = Project {
            id: "proj-1".to_string(),
            title: "Bracket".to_string(),
            description: "d".to_string(),
            technologies: vec![],
            link: None,
            github: None,
            image: None,
            details: None,
        };
        let value = serde_json::to_value(&project).unwrap();
        assert!(value.get("image").is_none());
        assert!(value.get("details").is_none());
    }
}
