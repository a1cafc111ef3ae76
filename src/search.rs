use std::path::Path;

use crate::cli::SearchArgs;
use crate::courses::CourseRepository;
use crate::loader;

pub fn run(args: SearchArgs) -> anyhow::Result<()> {
    let departments = loader::load_departments(Path::new(&args.departments))?;
    let courses = CourseRepository::load(&departments.sources);

    let results = courses.search(&args.query, args.limit);
    tracing::debug!(query = %args.query, hits = results.len(), "search finished");

    for course in results {
        println!("{}\t{}\t{}", course.code, course.title, course.department);
    }

    Ok(())
}
