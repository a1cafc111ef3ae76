use std::path::Path;

/// Two department files claiming `CS101`: `cse.json` carries the rich
/// record, `math.json` a thin stub that must lose reconciliation.
pub fn write_departments(dir: &Path) {
    std::fs::create_dir_all(dir).expect("create departments dir");

    std::fs::write(
        dir.join("cse.json"),
        r#"{
  "department": {
    "name": "Computer Science and Engineering",
    "courses": [
      {
        "sem": 3,
        "code": "CS101",
        "title": "Introduction to Computer Science",
        "credits": {"l": 3, "t": 1, "p": 0, "c": 4},
        "tags": ["core"],
        "syllabus": [
          "Models of computation",
          "Recursion and iteration",
          "Abstract data types",
          "Complexity basics",
          "Program correctness"
        ],
        "references": ["Abelson and Sussman, SICP"],
        "flags": []
      },
      {
        "sem": 1,
        "code": "MA101",
        "title": "Engineering Mathematics I",
        "credits": {"l": 3, "t": 1, "p": 0, "c": 4},
        "tags": [],
        "syllabus": ["Limits and continuity", "Series"],
        "references": [],
        "flags": []
      }
    ]
  }
}
"#,
    )
    .expect("write cse.json");

    std::fs::write(
        dir.join("math.json"),
        r#"{
  "department": {
    "name": "Mathematics",
    "courses": [
      {
        "code": " CS101 ",
        "title": "Introduction to Computer Science"
      }
    ]
  }
}
"#,
    )
    .expect("write math.json");
}

/// One well-formed degree exercising core courses, all slot fallbacks, a
/// dict-shaped pool, and a dangling pool reference.
pub fn write_degrees(dir: &Path) {
    std::fs::create_dir_all(dir).expect("create degrees dir");

    std::fs::write(
        dir.join("btech-cse.json"),
        r#"{
  "degree_metadata": {
    "title": "B.Tech Computer Science and Engineering",
    "department": "Computer Science and Engineering",
    "handbook_version": "2022.1",
    "total_credits_required": 160
  },
  "structure": {
    "semesters": [
      {
        "sem_index": 3,
        "year": "II",
        "total_contact_hours": 25,
        "total_credits": 22,
        "core_courses": ["CS101", "ZZ999", "XX4191", "CS ****"],
        "elective_slots": [
          {"slot_id": "pe1", "label": "Program Elective I", "pool_ref": "pe_pool"},
          {"slot_id": "pe2", "label": "Program Elective II", "pool_ref": "track_A"},
          {"slot_id": "oe1", "label": "Open Elective", "courses": ["MA101", "QQ111"]}
        ]
      }
    ],
    "elective_pools": {
      "pe_pool": {
        "Systems_Track": ["CS101"],
        "Theory_Track": ["MA101"]
      }
    }
  },
  "footnotes": [
    {"symbol": "*", "text": "Subject to revision by the academic council."}
  ]
}
"#,
    )
    .expect("write btech-cse.json");
}

pub fn write_broken_degree(dir: &Path) {
    std::fs::create_dir_all(dir).expect("create degrees dir");
    std::fs::write(dir.join("btech-broken.json"), "{ not json").expect("write btech-broken.json");
}
