use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::resume::{Education, Experience, Project, ResumeData};
use crate::resume::periods::sort_year;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityIssue {
    DuplicateId,
    DanglingProjectRef,
}

/// Advisory finding about the loaded record. Never blocks loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityWarning {
    pub issue: IntegrityIssue,
    pub list: &'static str,
    pub entry_id: String,
    pub description: String,
}

/// Read-only resume record plus the lookups the page needs.
#[derive(Debug)]
pub struct ResumeStore {
    data: ResumeData,
    project_index: HashMap<String, usize>,
}

impl ResumeStore {
    pub fn new(data: ResumeData) -> Self {
        let mut project_index = HashMap::new();
        for (idx, project) in data.projects.iter().enumerate() {
            // First entry wins when ids collide.
            project_index.entry(project.id.clone()).or_insert(idx);
        }
        Self {
            data,
            project_index,
        }
    }

    /// Loads the record from a JSON file and logs any integrity warnings.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read resume file '{}'", path.display()))?;
        let data: ResumeData = serde_json::from_str(&raw)
            .with_context(|| format!("Resume file '{}' is not valid JSON", path.display()))?;

        let store = Self::new(data);
        for warning in store.integrity_warnings() {
            warn!(
                list = warning.list,
                entry_id = %warning.entry_id,
                "{}",
                warning.description
            );
        }
        info!(
            "Loaded resume for {} ({} experience, {} education, {} projects)",
            store.data.name,
            store.data.experience.len(),
            store.data.education.len(),
            store.data.projects.len()
        );
        Ok(store)
    }

    pub fn data(&self) -> &ResumeData {
        &self.data
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.project_index.get(id).map(|&idx| &self.data.projects[idx])
    }

    /// Resolves an experience's project reference; a dangling id is absent.
    pub fn project_for(&self, experience: &Experience) -> Option<&Project> {
        experience
            .project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    /// Experience entries, most recent first.
    pub fn sorted_experience(&self, current_year: i32) -> Vec<&Experience> {
        let mut entries: Vec<_> = self.data.experience.iter().collect();
        entries.sort_by_key(|e| std::cmp::Reverse(sort_year(&e.period, current_year)));
        entries
    }

    /// Education entries, most recent first.
    pub fn sorted_education(&self, current_year: i32) -> Vec<&Education> {
        let mut entries: Vec<_> = self.data.education.iter().collect();
        entries.sort_by_key(|e| std::cmp::Reverse(sort_year(&e.period, current_year)));
        entries
    }

    pub fn integrity_warnings(&self) -> Vec<IntegrityWarning> {
        let mut warnings = Vec::new();

        let lists: [(&'static str, Vec<&str>); 3] = [
            (
                "experience",
                self.data.experience.iter().map(|e| e.id.as_str()).collect(),
            ),
            (
                "education",
                self.data.education.iter().map(|e| e.id.as_str()).collect(),
            ),
            (
                "projects",
                self.data.projects.iter().map(|p| p.id.as_str()).collect(),
            ),
        ];
        for (list, ids) in lists {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    warnings.push(IntegrityWarning {
                        issue: IntegrityIssue::DuplicateId,
                        list,
                        entry_id: id.to_string(),
                        description: format!("Id '{id}' appears more than once in {list}"),
                    });
                }
            }
        }

        for exp in &self.data.experience {
            if let Some(project_id) = exp.project_id.as_deref() {
                if self.project(project_id).is_none() {
                    warnings.push(IntegrityWarning {
                        issue: IntegrityIssue::DanglingProjectRef,
                        list: "experience",
                        entry_id: exp.id.clone(),
                        description: format!(
                            "Experience '{}' references unknown project '{project_id}'; detail section will be hidden",
                            exp.id
                        ),
                    });
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::resume::{Education, Experience, Project, ResumeData};

    pub fn experience(id: &str, period: &str, project_id: Option<&str>) -> Experience {
        Experience {
            id: id.to_string(),
            company: format!("{id} Corp"),
            role: "Engineer".to_string(),
            period: period.to_string(),
            description: "Built things".to_string(),
            technologies: vec!["Rust".to_string()],
            project_id: project_id.map(str::to_string),
        }
    }

    pub fn education(id: &str, institution: &str, period: &str) -> Education {
        Education {
            id: id.to_string(),
            institution: institution.to_string(),
            degree: "MS".to_string(),
            period: period.to_string(),
        }
    }

    pub fn project(id: &str, image: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            title: format!("{id} story"),
            description: "A project".to_string(),
            technologies: vec![],
            link: None,
            github: None,
            image: image.map(str::to_string),
            details: Some(vec!["First paragraph".to_string()]),
        }
    }

    pub fn resume(
        experience: Vec<Experience>,
        education: Vec<Education>,
        projects: Vec<Project>,
    ) -> ResumeData {
        ResumeData {
            name: "Ada Example".to_string(),
            title: "Design Engineer".to_string(),
            bio: "Builds things".to_string(),
            location: "Detroit, MI".to_string(),
            availability: true,
            resume_url: "resume.pdf".to_string(),
            socials: vec![],
            experience,
            education,
            projects,
            skills: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_dangling_project_ref_resolves_to_none() {
        let store = ResumeStore::new(resume(
            vec![experience("exp-1", "2020 — 2022", Some("missing"))],
            vec![],
            vec![project("proj-1", None)],
        ));
        let exp = &store.data().experience[0];
        assert!(store.project_for(exp).is_none());

        let warnings = store.integrity_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].issue, IntegrityIssue::DanglingProjectRef);
        assert_eq!(warnings[0].entry_id, "exp-1");
    }

    #[test]
    fn test_duplicate_ids_are_reported_per_list() {
        let store = ResumeStore::new(resume(
            vec![
                experience("dup", "2020", None),
                experience("dup", "2021", None),
            ],
            vec![education("dup", "Tech", "2010")],
            vec![],
        ));
        let warnings = store.integrity_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].issue, IntegrityIssue::DuplicateId);
        assert_eq!(warnings[0].list, "experience");
    }

    #[test]
    fn test_sorted_experience_is_most_recent_first() {
        let store = ResumeStore::new(resume(
            vec![
                experience("old", "Sep 2010 — Dec 2013", None),
                experience("current", "Sep 2024 — Present", None),
                experience("undated", "Sometime", None),
                experience("mid", "May 2021 — Sep 2024", None),
            ],
            vec![],
            vec![],
        ));
        let ids: Vec<_> = store
            .sorted_experience(2026)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        // "current" and "mid" share sort year 2024; stable order keeps input order.
        assert_eq!(ids, vec!["current", "mid", "old", "undated"]);
    }

    #[test]
    fn test_sorted_education_uses_current_year_for_open_ended() {
        let store = ResumeStore::new(resume(
            vec![],
            vec![
                education("bs", "State", "2006 — 2010"),
                education("ms", "Tech", "Present"),
            ],
            vec![],
        ));
        let ids: Vec<_> = store
            .sorted_education(2026)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ms", "bs"]);
    }

    #[tokio::test]
    async fn test_load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        let data = resume(vec![], vec![], vec![project("proj-1", None)]);
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        let store = ResumeStore::load(&path).await.unwrap();
        assert_eq!(store.data(), &data);
        assert!(store.project("proj-1").is_some());
    }

    #[tokio::test]
    async fn test_load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResumeStore::load(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read resume file"));
    }

    #[tokio::test]
    async fn test_bundled_sample_is_consistent() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/resume.json");
        let store = ResumeStore::load(&path).await.unwrap();
        assert!(store.integrity_warnings().is_empty());
        assert_eq!(store.sorted_experience(2026)[0].id, "exp-1");
    }
}
