use std::collections::HashMap;

use crate::formats::SearchResult;
use crate::loader::DepartmentSource;

// Completeness-score weights, preserved from the upstream dataset tooling
// for behavioral compatibility. Tuning values, not load-bearing design.
const DEPARTMENT_WEIGHT: f64 = 10.0;
const REFERENCE_WEIGHT: f64 = 2.0;
const CREDIT_FIELD_WEIGHT: f64 = 1.0;
const SEMESTER_WEIGHT: f64 = 2.0;
const SYLLABUS_CHARS_PER_POINT: f64 = 100.0;
const TITLE_CHARS_PER_POINT: f64 = 10.0;

/// The authoritative, deduplicated course set. Built once from the full set
/// of department sources; immutable afterwards, safe to share by reference.
#[derive(Debug)]
pub struct CourseRepository {
    courses: Vec<SearchResult>,
    by_code: HashMap<String, usize>,
}

impl CourseRepository {
    /// Reconciles every course across all department sources. Codes are
    /// trim-normalized; on a repeated sighting the candidate with the
    /// strictly higher completeness score wins, ties keep the first-seen
    /// entry. Output order is first-sighted order.
    pub fn load(sources: &[DepartmentSource]) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut best: HashMap<String, SearchResult> = HashMap::new();

        for source in sources {
            for course in &source.department.courses {
                let candidate =
                    SearchResult::from_course(course, &source.department.name, &source.file);
                match best.get(&candidate.code) {
                    None => {
                        order.push(candidate.code.clone());
                        best.insert(candidate.code.clone(), candidate);
                    }
                    Some(existing) => {
                        if completeness_score(&candidate) > completeness_score(existing) {
                            best.insert(candidate.code.clone(), candidate);
                        }
                    }
                }
            }
        }

        let courses: Vec<SearchResult> = order
            .into_iter()
            .filter_map(|code| best.remove(&code))
            .collect();
        let by_code = courses
            .iter()
            .enumerate()
            .map(|(idx, course)| (course.code.clone(), idx))
            .collect();

        Self { courses, by_code }
    }

    pub fn all(&self) -> &[SearchResult] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Point lookup by trim-normalized code.
    pub fn get(&self, code: &str) -> Option<&SearchResult> {
        self.by_code
            .get(code.trim())
            .map(|&idx| &self.courses[idx])
    }

    /// Case-insensitive substring search over code, title, and syllabus
    /// lines, truncated to `limit`. An empty query lists the first `limit`
    /// courses. No ranking beyond first-sighted order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&SearchResult> {
        if query.is_empty() {
            return self.courses.iter().take(limit).collect();
        }

        let query = query.to_lowercase();
        self.courses
            .iter()
            .filter(|course| {
                course.code.to_lowercase().contains(&query)
                    || course.title.to_lowercase().contains(&query)
                    || course
                        .syllabus
                        .iter()
                        .any(|line| line.to_lowercase().contains(&query))
            })
            .take(limit)
            .collect()
    }
}

/// How much descriptive data a record carries. Richer records beat the thin
/// placeholder entries departments publish for courses owned elsewhere.
pub fn completeness_score(course: &SearchResult) -> f64 {
    let mut score = 0.0;

    if !course.department.trim().is_empty() {
        score += DEPARTMENT_WEIGHT;
    }
    if !course.syllabus.is_empty() {
        score += course.syllabus.len() as f64;
        let chars: usize = course.syllabus.iter().map(|line| line.chars().count()).sum();
        score += chars as f64 / SYLLABUS_CHARS_PER_POINT;
    }
    score += course.references.len() as f64 * REFERENCE_WEIGHT;
    score += course.tags.len() as f64;
    if let Some(credits) = &course.credits {
        for field in [credits.l, credits.t, credits.p, credits.c] {
            if field.is_some() {
                score += CREDIT_FIELD_WEIGHT;
            }
        }
    }
    score += course.title.chars().count() as f64 / TITLE_CHARS_PER_POINT;
    if course.sem.is_some() {
        score += SEMESTER_WEIGHT;
    }

    score
}
