use std::collections::HashMap;

use crate::formats::{DegreeData, DegreeSummary};

/// Degree structures keyed by slug (source file stem). Built once; exact
/// lookup only, no fuzzy matching.
#[derive(Debug)]
pub struct DegreeRepository {
    degrees: Vec<(String, DegreeData)>,
    by_slug: HashMap<String, usize>,
    /// Slugs whose source failed to parse. Kept so listings still show an
    /// entry for them instead of silently shrinking.
    failed_slugs: Vec<String>,
}

impl DegreeRepository {
    pub fn new(degrees: Vec<(String, DegreeData)>, failed_slugs: Vec<String>) -> Self {
        let by_slug = degrees
            .iter()
            .enumerate()
            .map(|(idx, (slug, _))| (slug.clone(), idx))
            .collect();
        Self {
            degrees,
            by_slug,
            failed_slugs,
        }
    }

    pub fn get(&self, slug: &str) -> Option<&DegreeData> {
        self.by_slug.get(slug).map(|&idx| &self.degrees[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DegreeData)> {
        self.degrees
            .iter()
            .map(|(slug, data)| (slug.as_str(), data))
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.degrees.iter().map(|(slug, _)| slug.as_str()).collect()
    }

    /// Listing rows sorted by title, ascending and case-insensitive. A
    /// degree whose source failed to parse gets a title derived from its
    /// slug and an empty department, so the listing page never breaks.
    pub fn summaries(&self) -> Vec<DegreeSummary> {
        let mut summaries: Vec<DegreeSummary> = self
            .degrees
            .iter()
            .map(|(slug, data)| DegreeSummary {
                slug: slug.clone(),
                title: data.degree_metadata.title.clone(),
                department: data.degree_metadata.department.clone(),
            })
            .collect();
        summaries.extend(self.failed_slugs.iter().map(|slug| DegreeSummary {
            slug: slug.clone(),
            title: title_from_slug(slug),
            department: String::new(),
        }));
        summaries.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        summaries
    }
}

/// `btech-ece-vlsi` → `Btech Ece Vlsi`.
fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{DegreeMetadata, DegreeStructure, PoolMap};

    fn degree(title: &str, department: &str) -> DegreeData {
        DegreeData {
            degree_metadata: DegreeMetadata {
                title: title.to_owned(),
                department: department.to_owned(),
                handbook_version: "2022".to_owned(),
                total_credits_required: 160,
            },
            structure: DegreeStructure {
                semesters: Vec::new(),
                elective_pools: PoolMap::default(),
            },
            footnotes: Vec::new(),
        }
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let repo = DegreeRepository::new(
            vec![("btech-cse".to_owned(), degree("B.Tech CSE", "CSE"))],
            Vec::new(),
        );
        assert!(repo.get("btech-cse").is_some());
        assert!(repo.get("btech").is_none());
        assert!(repo.get("BTECH-CSE").is_none());
    }

    #[test]
    fn summaries_sort_by_title_case_insensitive() {
        let repo = DegreeRepository::new(
            vec![
                ("b".to_owned(), degree("zeta Engineering", "Z")),
                ("a".to_owned(), degree("Alpha Engineering", "A")),
                ("c".to_owned(), degree("beta Engineering", "B")),
            ],
            Vec::new(),
        );
        let titles: Vec<String> = repo.summaries().into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Alpha Engineering", "beta Engineering", "zeta Engineering"]
        );
    }

    #[test]
    fn failed_source_still_gets_a_summary_row() {
        let repo = DegreeRepository::new(
            vec![("btech-cse".to_owned(), degree("B.Tech CSE", "CSE"))],
            vec!["btech-ece-vlsi".to_owned()],
        );
        let summaries = repo.summaries();
        assert_eq!(summaries.len(), 2);
        let placeholder = summaries
            .iter()
            .find(|s| s.slug == "btech-ece-vlsi")
            .expect("placeholder row");
        assert_eq!(placeholder.title, "Btech Ece Vlsi");
        assert!(placeholder.department.is_empty());
        assert!(repo.get("btech-ece-vlsi").is_none());
    }
}
