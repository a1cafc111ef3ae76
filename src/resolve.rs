use serde::Serialize;

use crate::courses::CourseRepository;
use crate::formats::{
    CreditStructure, DegreeData, DegreeMetadata, ElectivePool, ElectiveSlot, Footnote, MixedNumber,
    PoolMap, SearchResult, Semester,
};

/// Marker the source publisher leaves in codes whose curriculum data is not
/// finalized. Such codes are never looked up.
pub const PLACEHOLDER_MARKER: &str = "****";

/// Generic project courses identified by code suffix (the department prefix
/// varies). Synthesized info-only entries, never looked up in the main set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialCourse {
    pub suffix: &'static str,
    pub title: &'static str,
    pub credits: u32,
}

pub const SPECIAL_COURSES: [SpecialCourse; 3] = [
    SpecialCourse {
        suffix: "4191",
        title: "Mini Project for Minor Specialisation",
        credits: 8,
    },
    SpecialCourse {
        suffix: "4293",
        title: "Project Work / Practice School (Honours)",
        credits: 12,
    },
    SpecialCourse {
        suffix: "4292",
        title: "Project Work",
        credits: 12,
    },
];

pub fn is_placeholder(code: &str) -> bool {
    code.contains(PLACEHOLDER_MARKER)
}

pub fn special_course(code: &str) -> Option<&'static SpecialCourse> {
    let code = code.trim();
    SPECIAL_COURSES.iter().find(|s| code.ends_with(s.suffix))
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeClass<'a> {
    /// Contains the placeholder marker; takes precedence over everything,
    /// even a coincidental hit in the course set.
    Placeholder,
    /// Present in the reconciled course set.
    Resolved(&'a SearchResult),
    /// Absent from the set but matching a reserved project-course suffix.
    Special(&'static SpecialCourse),
    /// Absent from the set with no excuse.
    Missing,
}

pub fn classify_code<'a>(code: &str, courses: &'a CourseRepository) -> CodeClass<'a> {
    let trimmed = code.trim();
    if is_placeholder(trimmed) {
        return CodeClass::Placeholder;
    }
    if let Some(course) = courses.get(trimmed) {
        return CodeClass::Resolved(course);
    }
    if let Some(special) = special_course(trimmed) {
        return CodeClass::Special(special);
    }
    CodeClass::Missing
}

/// Canonical pool shape: either a flat option list or named tracks. The
/// three physical encodings collapse here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedPool {
    Simple(Vec<String>),
    Tracks(Vec<(String, Vec<String>)>),
}

impl NormalizedPool {
    /// `(track name, code)` pairs; `None` track for the flat shape. Tracks
    /// and codes keep their source order.
    pub fn pairs(&self) -> Vec<(Option<&str>, &str)> {
        match self {
            NormalizedPool::Simple(codes) => {
                codes.iter().map(|code| (None, code.as_str())).collect()
            }
            NormalizedPool::Tracks(tracks) => tracks
                .iter()
                .flat_map(|(name, codes)| {
                    codes
                        .iter()
                        .map(move |code| (Some(name.as_str()), code.as_str()))
                })
                .collect(),
        }
    }
}

pub fn normalize_pool(pool: &ElectivePool) -> NormalizedPool {
    match pool {
        ElectivePool::Flat(codes) => NormalizedPool::Simple(codes.clone()),
        ElectivePool::TrackList(tracks) => NormalizedPool::Tracks(
            tracks
                .iter()
                .map(|track| (track.track_name.clone(), track.courses.clone()))
                .collect(),
        ),
        // Map keys double as display names; underscores become spaces.
        ElectivePool::TrackMap(entries) => NormalizedPool::Tracks(
            entries
                .iter()
                .map(|(name, codes)| (name.replace('_', " "), codes.clone()))
                .collect(),
        ),
    }
}

/// Slot resolution, first match wins: a valid pool reference, the inline
/// code list, the single inline code, then nothing. An invalid pool
/// reference still falls through to the inline forms.
pub fn resolve_slot_pool(slot: &ElectiveSlot, pools: &PoolMap) -> Option<NormalizedPool> {
    if let Some(pool_ref) = slot.pool_ref.as_deref()
        && let Some(pool) = pools.get(pool_ref)
    {
        return Some(normalize_pool(pool));
    }
    if let Some(courses) = &slot.courses {
        return Some(NormalizedPool::Simple(courses.clone()));
    }
    if let Some(code) = &slot.course_code {
        return Some(NormalizedPool::Simple(vec![code.clone()]));
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Resolved,
    Special,
    Placeholder,
    Missing,
}

const TITLE_NOT_FOUND: &str = "Course data not found";

/// One renderable course row: the code as written in the source plus the
/// display title, credit columns, and classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseLine {
    pub code: String,
    pub title: String,
    pub status: CodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<CreditStructure>,
    /// The C column: catalog credit total, or the fixed value of a
    /// reserved-suffix course.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_value: Option<f64>,
}

pub fn course_line(code: &str, courses: &CourseRepository) -> CourseLine {
    match classify_code(code, courses) {
        CodeClass::Resolved(course) => CourseLine {
            code: code.to_owned(),
            title: course.title.clone(),
            status: CodeStatus::Resolved,
            credit_value: course.credits.as_ref().and_then(|credits| credits.c),
            credits: course.credits.clone(),
        },
        CodeClass::Special(special) => CourseLine {
            code: code.to_owned(),
            title: special.title.to_owned(),
            status: CodeStatus::Special,
            credits: None,
            credit_value: Some(f64::from(special.credits)),
        },
        CodeClass::Placeholder => CourseLine {
            code: code.to_owned(),
            title: TITLE_NOT_FOUND.to_owned(),
            status: CodeStatus::Placeholder,
            credits: None,
            credit_value: None,
        },
        CodeClass::Missing => CourseLine {
            code: code.to_owned(),
            title: TITLE_NOT_FOUND.to_owned(),
            status: CodeStatus::Missing,
            credits: None,
            credit_value: None,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    pub name: String,
    pub courses: Vec<CourseLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SlotResolution {
    /// Flat pool (or inline codes): a plain option list.
    Options { courses: Vec<CourseLine> },
    /// Pool subdivided into specialization tracks.
    Tracks { tracks: Vec<TrackView> },
    /// No pool data anywhere; rendered as an inline warning.
    PoolMissing {
        #[serde(skip_serializing_if = "Option::is_none")]
        pool_ref: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotView {
    pub slot_id: String,
    pub label: String,
    #[serde(flatten)]
    pub resolution: SlotResolution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterView {
    pub sem_index: u32,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_contact_hours: Option<MixedNumber>,
    pub total_credits: MixedNumber,
    pub core_courses: Vec<CourseLine>,
    pub elective_slots: Vec<SlotView>,
}

/// A degree structure with every course reference resolved and classified,
/// ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeView {
    pub slug: String,
    pub metadata: DegreeMetadata,
    pub semesters: Vec<SemesterView>,
    pub footnotes: Vec<Footnote>,
}

pub fn degree_view(slug: &str, data: &DegreeData, courses: &CourseRepository) -> DegreeView {
    DegreeView {
        slug: slug.to_owned(),
        metadata: data.degree_metadata.clone(),
        semesters: data
            .structure
            .semesters
            .iter()
            .map(|sem| semester_view(sem, &data.structure.elective_pools, courses))
            .collect(),
        footnotes: data.footnotes.clone(),
    }
}

fn semester_view(semester: &Semester, pools: &PoolMap, courses: &CourseRepository) -> SemesterView {
    SemesterView {
        sem_index: semester.sem_index,
        year: semester.year.clone(),
        total_contact_hours: semester.total_contact_hours.clone(),
        total_credits: semester.total_credits.clone(),
        core_courses: semester
            .core_courses
            .iter()
            .map(|code| course_line(code, courses))
            .collect(),
        elective_slots: semester
            .elective_slots
            .iter()
            .map(|slot| slot_view(slot, pools, courses))
            .collect(),
    }
}

fn slot_view(slot: &ElectiveSlot, pools: &PoolMap, courses: &CourseRepository) -> SlotView {
    let resolution = match resolve_slot_pool(slot, pools) {
        Some(NormalizedPool::Simple(codes)) => SlotResolution::Options {
            courses: codes.iter().map(|code| course_line(code, courses)).collect(),
        },
        Some(NormalizedPool::Tracks(tracks)) => SlotResolution::Tracks {
            tracks: tracks
                .into_iter()
                .map(|(name, codes)| TrackView {
                    name,
                    courses: codes.iter().map(|code| course_line(code, courses)).collect(),
                })
                .collect(),
        },
        None => SlotResolution::PoolMissing {
            pool_ref: slot.pool_ref.clone(),
        },
    };

    SlotView {
        slot_id: slot.slot_id.clone(),
        label: slot.label.clone(),
        resolution,
    }
}
