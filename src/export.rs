use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::cli::ExportArgs;
use crate::courses::CourseRepository;
use crate::formats::SearchResult;
use crate::loader;

pub const COURSES_FILE: &str = "courses.json";
pub const COURSE_MAP_FILE: &str = "course-map.json";

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let departments = loader::load_departments(Path::new(&args.departments))?;
    let courses = CourseRepository::load(&departments.sources);
    write_artifacts(&courses, Path::new(&args.out))
}

/// Writes the reconciled set as two views of the same data: the ordered
/// course list and a code-indexed map, so clients fetch precomputed data
/// instead of re-running reconciliation.
pub fn write_artifacts(courses: &CourseRepository, out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create export output dir: {}", out_dir.display()))?;

    tracing::info!(unique_courses = courses.len(), "reconciled course set");

    let list_path = out_dir.join(COURSES_FILE);
    let list_json = serde_json::to_vec(courses.all()).context("serialize course list")?;
    std::fs::write(&list_path, &list_json)
        .with_context(|| format!("write course list: {}", list_path.display()))?;
    tracing::info!(path = %list_path.display(), bytes = list_json.len(), "wrote course list artifact");

    let map: BTreeMap<&str, &SearchResult> = courses
        .all()
        .iter()
        .map(|course| (course.code.as_str(), course))
        .collect();
    let map_path = out_dir.join(COURSE_MAP_FILE);
    let map_json = serde_json::to_vec(&map).context("serialize course map")?;
    std::fs::write(&map_path, &map_json)
        .with_context(|| format!("write course map: {}", map_path.display()))?;
    tracing::info!(path = %map_path.display(), bytes = map_json.len(), "wrote course map artifact");

    Ok(())
}
