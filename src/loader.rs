use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::formats::{Course, DegreeData, Department};

/// A source file (or a single record inside one) that could not be parsed.
/// Load never aborts on these; the validator reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceIssue {
    pub file: String,
    pub detail: String,
}

#[derive(Debug)]
pub struct DepartmentSource {
    /// File stem, e.g. `ece` for `ece.json`.
    pub file: String,
    pub department: Department,
}

#[derive(Debug, Default)]
pub struct DepartmentSet {
    pub sources: Vec<DepartmentSource>,
    pub issues: Vec<SourceIssue>,
}

#[derive(Debug, Default)]
pub struct DegreeSet {
    /// `(slug, data)` in filename order.
    pub degrees: Vec<(String, DegreeData)>,
    pub issues: Vec<SourceIssue>,
    /// Slugs whose source file exists but failed to parse.
    pub failed_slugs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DepartmentDoc {
    department: RawDepartment,
}

#[derive(Debug, Deserialize)]
struct RawDepartment {
    name: String,
    #[serde(default)]
    courses: Vec<serde_json::Value>,
}

pub fn load_departments(dir: &Path) -> anyhow::Result<DepartmentSet> {
    let mut set = DepartmentSet::default();

    for (file_name, contents) in read_json_files(dir)? {
        let doc: DepartmentDoc = match serde_json::from_str(&contents) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(file = %file_name, %err, "skipping unparseable department file");
                set.issues.push(SourceIssue {
                    file: file_name,
                    detail: err.to_string(),
                });
                continue;
            }
        };

        // Records parse individually so one bad record does not sink its file.
        let mut courses = Vec::with_capacity(doc.department.courses.len());
        for (idx, value) in doc.department.courses.into_iter().enumerate() {
            match serde_json::from_value::<Course>(value) {
                Ok(course) => courses.push(course),
                Err(err) => {
                    tracing::warn!(file = %file_name, record = idx, %err, "skipping invalid course record");
                    set.issues.push(SourceIssue {
                        file: file_name.clone(),
                        detail: format!("course record {idx}: {err}"),
                    });
                }
            }
        }

        set.sources.push(DepartmentSource {
            file: file_stem(&file_name),
            department: Department {
                name: doc.department.name,
                courses,
            },
        });
    }

    Ok(set)
}

pub fn load_degrees(dir: &Path) -> anyhow::Result<DegreeSet> {
    let mut set = DegreeSet::default();

    for (file_name, contents) in read_json_files(dir)? {
        match serde_json::from_str::<DegreeData>(&contents) {
            Ok(data) => set.degrees.push((file_stem(&file_name), data)),
            Err(err) => {
                tracing::warn!(file = %file_name, %err, "skipping unparseable degree file");
                set.failed_slugs.push(file_stem(&file_name));
                set.issues.push(SourceIssue {
                    file: file_name,
                    detail: err.to_string(),
                });
            }
        }
    }

    Ok(set)
}

/// `*.json` entries of `dir` in filename order. A missing directory is an
/// empty dataset, not an error.
fn read_json_files(dir: &Path) -> anyhow::Result<Vec<(String, String)>> {
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "data directory does not exist");
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read data dir: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_owned());
        }
    }
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("read data file: {}", path.display()))?;
        files.push((name, contents));
    }
    Ok(files)
}

fn file_stem(file_name: &str) -> String {
    file_name
        .strip_suffix(".json")
        .unwrap_or(file_name)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).expect("write fixture");
    }

    #[test]
    fn department_load_skips_bad_files_and_records() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        write(
            temp.path(),
            "cse.json",
            r#"{"department": {"name": "CSE", "courses": [
                {"code": "CS101", "title": "Intro to CS"},
                {"title": "missing code"}
            ]}}"#,
        );
        write(temp.path(), "broken.json", "{ not json");

        let set = load_departments(temp.path())?;
        assert_eq!(set.sources.len(), 1);
        assert_eq!(set.sources[0].file, "cse");
        assert_eq!(set.sources[0].department.courses.len(), 1);
        assert_eq!(set.issues.len(), 2);
        assert!(set.issues.iter().any(|i| i.file == "broken.json"));
        assert!(
            set.issues
                .iter()
                .any(|i| i.file == "cse.json" && i.detail.starts_with("course record 1"))
        );
        Ok(())
    }

    #[test]
    fn degree_load_keeps_failed_slugs() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        write(temp.path(), "btech-bad.json", "[]");

        let set = load_degrees(temp.path())?;
        assert!(set.degrees.is_empty());
        assert_eq!(set.failed_slugs, vec!["btech-bad"]);
        assert_eq!(set.issues.len(), 1);
        Ok(())
    }

    #[test]
    fn missing_directory_is_empty_dataset() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let set = load_departments(&temp.path().join("nope"))?;
        assert!(set.sources.is_empty() && set.issues.is_empty());
        Ok(())
    }
}
