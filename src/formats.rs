use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditStructure {
    pub l: Option<f64>,
    pub t: Option<f64>,
    pub p: Option<f64>,
    pub c: Option<f64>,
}

/// A course record as published in a department file. `code` and `title`
/// are required; a record missing either is rejected at the load boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub sem: Option<u32>,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub credits: Option<CreditStructure>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub syllabus: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Department {
    pub name: String,
    pub courses: Vec<Course>,
}

/// A reconciled course: the winning variant of its code across all
/// department sources, annotated with the department name and source file
/// stem it came from. The only course form exposed outside the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub sem: Option<u32>,
    pub code: String,
    pub title: String,
    pub credits: Option<CreditStructure>,
    pub tags: Vec<String>,
    pub syllabus: Vec<String>,
    pub references: Vec<String>,
    pub flags: Vec<String>,
    pub department: String,
    pub source_file: String,
}

impl SearchResult {
    pub fn from_course(course: &Course, department: &str, source_file: &str) -> Self {
        Self {
            sem: course.sem,
            code: course.code.trim().to_owned(),
            title: course.title.clone(),
            credits: course.credits.clone(),
            tags: course.tags.clone(),
            syllabus: course.syllabus.clone(),
            references: course.references.clone(),
            flags: course.flags.clone(),
            department: department.to_owned(),
            source_file: source_file.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeMetadata {
    pub title: String,
    pub department: String,
    pub handbook_version: String,
    pub total_credits_required: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    pub symbol: String,
    pub text: String,
}

/// Numeric-or-string field; the handbook sources mix `25` and `"25*"` for
/// semester totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MixedNumber {
    Number(f64),
    Text(String),
}

impl fmt::Display for MixedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixedNumber::Number(n) => write!(f, "{n}"),
            MixedNumber::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectiveSlot {
    pub slot_id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub sem_index: u32,
    pub year: String,
    #[serde(default)]
    pub total_contact_hours: Option<MixedNumber>,
    pub total_credits: MixedNumber,
    #[serde(default)]
    pub core_courses: Vec<String>,
    #[serde(default)]
    pub elective_slots: Vec<ElectiveSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolTrack {
    pub track_name: String,
    #[serde(default)]
    pub courses: Vec<String>,
}

/// The three historical encodings of an elective pool. All three are
/// first-class inputs; `resolve::normalize_pool` collapses them to one
/// canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ElectivePool {
    /// `["CSE 4301", "CSE 4302"]`
    Flat(Vec<String>),
    /// `[{"track_name": "...", "courses": [...]}, ...]`
    TrackList(Vec<PoolTrack>),
    /// `{"Track_Name": [...], ...}` — entries kept in document order.
    TrackMap(Vec<(String, Vec<String>)>),
}

impl<'de> Deserialize<'de> for ElectivePool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PoolVisitor;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PoolEntry {
            Code(String),
            Track(PoolTrack),
        }

        impl<'de> Visitor<'de> for PoolVisitor {
            type Value = ElectivePool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(
                    "a list of course codes, a list of tracks, or a map of track name to course codes",
                )
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut codes = Vec::new();
                let mut tracks = Vec::new();
                while let Some(entry) = seq.next_element::<PoolEntry>()? {
                    match entry {
                        PoolEntry::Code(code) => {
                            if !tracks.is_empty() {
                                return Err(serde::de::Error::custom(
                                    "elective pool mixes course codes and tracks",
                                ));
                            }
                            codes.push(code);
                        }
                        PoolEntry::Track(track) => {
                            if !codes.is_empty() {
                                return Err(serde::de::Error::custom(
                                    "elective pool mixes course codes and tracks",
                                ));
                            }
                            tracks.push(track);
                        }
                    }
                }
                if tracks.is_empty() {
                    Ok(ElectivePool::Flat(codes))
                } else {
                    Ok(ElectivePool::TrackList(tracks))
                }
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((name, courses)) = map.next_entry::<String, Vec<String>>()? {
                    entries.push((name, courses));
                }
                Ok(ElectivePool::TrackMap(entries))
            }
        }

        deserializer.deserialize_any(PoolVisitor)
    }
}

impl Serialize for ElectivePool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ElectivePool::Flat(codes) => codes.serialize(serializer),
            ElectivePool::TrackList(tracks) => tracks.serialize(serializer),
            ElectivePool::TrackMap(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, courses) in entries {
                    map.serialize_entry(name, courses)?;
                }
                map.end()
            }
        }
    }
}

/// `elective_pools` mapping, kept in document order so reports and views
/// are stable across runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoolMap(Vec<(String, ElectivePool)>);

impl PoolMap {
    pub fn get(&self, name: &str) -> Option<&ElectivePool> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, pool)| pool)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElectivePool)> {
        self.0.iter().map(|(name, pool)| (name.as_str(), pool))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ElectivePool)> for PoolMap {
    fn from_iter<I: IntoIterator<Item = (String, ElectivePool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for PoolMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PoolMapVisitor;

        impl<'de> Visitor<'de> for PoolMapVisitor {
            type Value = PoolMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of pool name to elective pool")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((name, pool)) = map.next_entry::<String, ElectivePool>()? {
                    entries.push((name, pool));
                }
                Ok(PoolMap(entries))
            }
        }

        deserializer.deserialize_map(PoolMapVisitor)
    }
}

impl Serialize for PoolMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, pool) in &self.0 {
            map.serialize_entry(name, pool)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeStructure {
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub elective_pools: PoolMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeData {
    pub degree_metadata: DegreeMetadata,
    pub structure: DegreeStructure,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeSummary {
    pub slug: String,
    pub title: String,
    pub department: String,
}
