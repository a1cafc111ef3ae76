use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::cli::CheckArgs;
use crate::courses::CourseRepository;
use crate::formats::{DegreeData, ElectivePool};
use crate::loader::{self, SourceIssue};
use crate::resolve::{CodeClass, classify_code};

/// One unresolvable course reference inside a degree structure.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenRef {
    pub degree: String,
    pub file: String,
    pub code: String,
    pub context: String,
}

/// An elective slot pointing at a pool its degree does not define.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenPool {
    pub degree: String,
    pub file: String,
    pub pool: String,
    pub context: String,
}

#[derive(Debug, Default)]
pub struct Report {
    pub missing_courses: Vec<BrokenRef>,
    pub missing_pools: Vec<BrokenPool>,
    pub placeholder_codes: Vec<BrokenRef>,
    pub data_inconsistencies: Vec<SourceIssue>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.missing_courses.is_empty()
            && self.missing_pools.is_empty()
            && self.placeholder_codes.is_empty()
    }
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let departments = loader::load_departments(Path::new(&args.departments))?;
    let degrees = loader::load_degrees(Path::new(&args.degrees))?;
    let courses = CourseRepository::load(&departments.sources);

    let mut report = build_report(&courses, &degrees.degrees);
    report.data_inconsistencies.extend(departments.issues);
    report.data_inconsistencies.extend(degrees.issues);

    let rendered = render_report(&report);
    match &args.out {
        Some(out) => {
            let out_path = Path::new(out);
            if let Some(parent) = out_path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create report dir: {}", parent.display()))?;
            }
            std::fs::write(out_path, &rendered)
                .with_context(|| format!("write report: {}", out_path.display()))?;
            tracing::info!(out = %out_path.display(), "wrote report");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Walks every degree's core courses, elective slots, and elective pools,
/// classifying each referenced code. Read-only; a diagnostic, not a gate.
pub fn build_report(courses: &CourseRepository, degrees: &[(String, DegreeData)]) -> Report {
    let mut report = Report::default();

    for (slug, data) in degrees {
        let degree = data.degree_metadata.title.clone();
        let file = format!("{slug}.json");

        let check_code = |report: &mut Report, code: &str, context: String| {
            match classify_code(code, courses) {
                CodeClass::Placeholder => report.placeholder_codes.push(BrokenRef {
                    degree: degree.clone(),
                    file: file.clone(),
                    code: code.to_owned(),
                    context,
                }),
                CodeClass::Missing => report.missing_courses.push(BrokenRef {
                    degree: degree.clone(),
                    file: file.clone(),
                    code: code.to_owned(),
                    context,
                }),
                CodeClass::Resolved(_) | CodeClass::Special(_) => {}
            }
        };

        for sem in &data.structure.semesters {
            for code in &sem.core_courses {
                check_code(
                    &mut report,
                    code,
                    format!("Core course in Sem {}", sem.sem_index),
                );
            }

            for slot in &sem.elective_slots {
                if let Some(code) = &slot.course_code {
                    check_code(
                        &mut report,
                        code,
                        format!("Elective slot {} in Sem {}", slot.label, sem.sem_index),
                    );
                }

                if let Some(pool_ref) = &slot.pool_ref
                    && data.structure.elective_pools.get(pool_ref).is_none()
                {
                    report.missing_pools.push(BrokenPool {
                        degree: degree.clone(),
                        file: file.clone(),
                        pool: pool_ref.clone(),
                        context: format!("Slot {} in Sem {}", slot.label, sem.sem_index),
                    });
                }

                if let Some(inline) = &slot.courses {
                    for code in inline {
                        check_code(
                            &mut report,
                            code,
                            format!(
                                "Inline elective in slot {} Sem {}",
                                slot.label, sem.sem_index
                            ),
                        );
                    }
                }
            }
        }

        for (pool_name, pool) in data.structure.elective_pools.iter() {
            match pool {
                ElectivePool::Flat(codes) => {
                    for code in codes {
                        check_code(&mut report, code, format!("Pool {pool_name}"));
                    }
                }
                ElectivePool::TrackList(tracks) => {
                    for track in tracks {
                        for code in &track.courses {
                            check_code(
                                &mut report,
                                code,
                                format!("Track {} in Pool {pool_name}", track.track_name),
                            );
                        }
                    }
                }
                ElectivePool::TrackMap(entries) => {
                    for (track_name, codes) in entries {
                        for code in codes {
                            check_code(
                                &mut report,
                                code,
                                format!("Track {track_name} in Pool {pool_name}"),
                            );
                        }
                    }
                }
            }
        }
    }

    report
}

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("# Broken Data/Links Report\n\n");
    let _ = writeln!(
        out,
        "Generated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );

    if !report.missing_courses.is_empty() {
        out.push_str("## Missing Courses\n");
        out.push_str("| Degree | Code | Context | File |\n");
        out.push_str("|---|---|---|---|\n");
        for entry in &report.missing_courses {
            let _ = writeln!(
                out,
                "| {} | `{}` | {} | `{}` |",
                entry.degree, entry.code, entry.context, entry.file
            );
        }
        out.push('\n');
    }

    if !report.missing_pools.is_empty() {
        out.push_str("## Missing Elective Pools\n");
        out.push_str("| Degree | Pool Reference | Context | File |\n");
        out.push_str("|---|---|---|---|\n");
        for entry in &report.missing_pools {
            let _ = writeln!(
                out,
                "| {} | `{}` | {} | `{}` |",
                entry.degree, entry.pool, entry.context, entry.file
            );
        }
        out.push('\n');
    }

    if !report.placeholder_codes.is_empty() {
        out.push_str("## Placeholder/Incomplete Codes\n");
        out.push_str("| Degree | Code | Context | File |\n");
        out.push_str("|---|---|---|---|\n");
        for entry in &report.placeholder_codes {
            let _ = writeln!(
                out,
                "| {} | `{}` | {} | `{}` |",
                entry.degree, entry.code, entry.context, entry.file
            );
        }
        out.push('\n');
    }

    if !report.data_inconsistencies.is_empty() {
        out.push_str("## Data Inconsistencies/Errors\n");
        for issue in &report.data_inconsistencies {
            let _ = writeln!(out, "- **{}**: {}", issue.file, issue.detail);
        }
        out.push('\n');
    }

    if report.is_clean() {
        out.push_str("No broken links or missing data found!\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{
        Course, DegreeMetadata, DegreeStructure, Department, ElectiveSlot, MixedNumber, PoolMap,
        PoolTrack, Semester,
    };
    use crate::loader::DepartmentSource;

    fn course_repo(codes: &[&str]) -> CourseRepository {
        let courses = codes
            .iter()
            .map(|code| Course {
                sem: None,
                code: (*code).to_owned(),
                title: format!("{code} Title"),
                credits: None,
                tags: Vec::new(),
                syllabus: Vec::new(),
                references: Vec::new(),
                flags: Vec::new(),
            })
            .collect();
        CourseRepository::load(&[DepartmentSource {
            file: "cse".to_owned(),
            department: Department {
                name: "CSE".to_owned(),
                courses,
            },
        }])
    }

    fn degree(semesters: Vec<Semester>, pools: PoolMap) -> DegreeData {
        DegreeData {
            degree_metadata: DegreeMetadata {
                title: "B.Tech Test".to_owned(),
                department: "CSE".to_owned(),
                handbook_version: "2022".to_owned(),
                total_credits_required: 160,
            },
            structure: DegreeStructure {
                semesters,
                elective_pools: pools,
            },
            footnotes: Vec::new(),
        }
    }

    fn semester(
        index: u32,
        core: &[&str],
        slots: Vec<ElectiveSlot>,
    ) -> Semester {
        Semester {
            sem_index: index,
            year: "I".to_owned(),
            total_contact_hours: None,
            total_credits: MixedNumber::Number(20.0),
            core_courses: core.iter().map(|c| (*c).to_owned()).collect(),
            elective_slots: slots,
        }
    }

    #[test]
    fn buckets_split_missing_placeholder_and_special() {
        let courses = course_repo(&["CS101"]);
        let degrees = vec![(
            "btech-test".to_owned(),
            degree(
                vec![semester(3, &["CS101", "ZZ999", "XX4191", "YY****"], Vec::new())],
                PoolMap::default(),
            ),
        )];

        let report = build_report(&courses, &degrees);
        assert_eq!(report.missing_courses.len(), 1);
        assert_eq!(report.missing_courses[0].code, "ZZ999");
        assert_eq!(report.missing_courses[0].context, "Core course in Sem 3");
        assert_eq!(report.placeholder_codes.len(), 1);
        assert_eq!(report.placeholder_codes[0].code, "YY****");
        assert!(report.missing_pools.is_empty());
    }

    #[test]
    fn dangling_pool_ref_is_reported_per_slot() {
        let courses = course_repo(&[]);
        let slot = ElectiveSlot {
            slot_id: "pe1".to_owned(),
            label: "Program Elective I".to_owned(),
            pool_ref: Some("track_A".to_owned()),
            course_code: None,
            courses: None,
        };
        let pools: PoolMap = [(
            "track_B".to_owned(),
            crate::formats::ElectivePool::Flat(Vec::new()),
        )]
        .into_iter()
        .collect();
        let degrees = vec![(
            "btech-test".to_owned(),
            degree(vec![semester(5, &[], vec![slot])], pools),
        )];

        let report = build_report(&courses, &degrees);
        assert_eq!(report.missing_pools.len(), 1);
        assert_eq!(report.missing_pools[0].pool, "track_A");
        assert_eq!(
            report.missing_pools[0].context,
            "Slot Program Elective I in Sem 5"
        );
    }

    #[test]
    fn pool_entries_are_checked_in_all_three_shapes() {
        let courses = course_repo(&[]);
        let pools: PoolMap = [
            (
                "flat".to_owned(),
                crate::formats::ElectivePool::Flat(vec!["F1".to_owned()]),
            ),
            (
                "listed".to_owned(),
                crate::formats::ElectivePool::TrackList(vec![PoolTrack {
                    track_name: "T".to_owned(),
                    courses: vec!["L1".to_owned()],
                }]),
            ),
            (
                "mapped".to_owned(),
                crate::formats::ElectivePool::TrackMap(vec![(
                    "M_Track".to_owned(),
                    vec!["M1".to_owned()],
                )]),
            ),
        ]
        .into_iter()
        .collect();
        let degrees = vec![("btech-test".to_owned(), degree(Vec::new(), pools))];

        let report = build_report(&courses, &degrees);
        let contexts: Vec<&str> = report
            .missing_courses
            .iter()
            .map(|e| e.context.as_str())
            .collect();
        assert_eq!(
            contexts,
            vec![
                "Pool flat",
                "Track T in Pool listed",
                "Track M_Track in Pool mapped"
            ]
        );
    }

    #[test]
    fn clean_report_prints_the_sentinel() {
        let report = Report::default();
        let rendered = render_report(&report);
        assert!(rendered.contains("# Broken Data/Links Report"));
        assert!(rendered.contains("No broken links or missing data found!"));
    }

    #[test]
    fn inconsistencies_do_not_suppress_the_sentinel() {
        let mut report = Report::default();
        report.data_inconsistencies.push(SourceIssue {
            file: "btech-bad.json".to_owned(),
            detail: "expected struct DegreeData".to_owned(),
        });
        let rendered = render_report(&report);
        assert!(rendered.contains("## Data Inconsistencies/Errors"));
        assert!(rendered.contains("- **btech-bad.json**: expected struct DegreeData"));
        assert!(rendered.contains("No broken links or missing data found!"));
    }

    #[test]
    fn broken_refs_render_as_markdown_tables() {
        let mut report = Report::default();
        report.missing_courses.push(BrokenRef {
            degree: "B.Tech Test".to_owned(),
            file: "btech-test.json".to_owned(),
            code: "ZZ999".to_owned(),
            context: "Core course in Sem 3".to_owned(),
        });
        let rendered = render_report(&report);
        assert!(rendered.contains("## Missing Courses"));
        assert!(rendered.contains("| Degree | Code | Context | File |"));
        assert!(
            rendered.contains("| B.Tech Test | `ZZ999` | Core course in Sem 3 | `btech-test.json` |")
        );
        assert!(!rendered.contains("No broken links or missing data found!"));
    }
}
