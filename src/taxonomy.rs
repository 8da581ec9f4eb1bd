//! Keyword taxonomy for the NDT circular-construction review.
//!
//! All keywords are stored lower-case; callers match them against lower-cased
//! title + abstract text.

use serde::Serialize;
use std::fmt;

/// Core NDT methods. A paper must mention at least one.
pub const NDT_METHODS: &[&str] = &[
    // Acoustic
    "ultrasonic pulse velocity",
    "upv",
    "impact echo",
    "impact-echo",
    "phased array ultrasonic",
    "paut",
    "tofd",
    // Electromagnetic
    "ground penetrating radar",
    "gpr",
    "eddy current testing",
    "magnetic flux leakage",
    // Electrochemical
    "half-cell potential",
    "half cell potential",
    "resistivity measurement",
    "wenner probe",
    // Mechanical / semi-destructive
    "sonreb",
    "rebound hammer",
    "schmidt hammer",
    "pull-out test",
    "pullout test",
    "capo test",
    "lok test",
    "flat-jack",
    "flatjack",
    "resistance drilling",
    "resistograph",
    // Surface
    "magnetic particle testing",
    "dye penetrant",
    "visual grading",
    // Thermal
    "infrared thermography",
    // General
    "non-destructive testing",
    "nondestructive testing",
    "non-destructive evaluation",
    "nondestructive evaluation",
];

/// Structural material classes: reinforced concrete, steel, timber, masonry.
pub const STRUCTURAL_MATERIALS: &[&str] = &[
    "reinforced concrete",
    "rc structure",
    "rc beam",
    "rc column",
    "concrete bridge",
    "concrete building",
    "concrete structure",
    "prestressed concrete",
    "post-tensioned concrete",
    "structural steel",
    "steel structure",
    "steel bridge",
    "steel beam",
    "steel column",
    "steel connection",
    "timber structure",
    "timber beam",
    "timber building",
    "glulam",
    "laminated timber",
    "wood structure",
    "masonry structure",
    "masonry wall",
    "masonry building",
    "brick masonry",
    "stone masonry",
    "historic masonry",
    "heritage building",
    "unreinforced masonry",
];

pub const TASK_GEOMETRY: &[&str] = &[
    "geometry verification",
    "geometric verification",
    "dimension measurement",
    "cross-section measurement",
    "reinforcement layout",
    "reinforcement mapping",
    "rebar detection",
    "cover depth",
    "concrete cover",
    "section geometry",
    "connection detail",
    "structural geometry",
    "thickness measurement",
    "section loss measurement",
];

pub const TASK_STRENGTH: &[&str] = &[
    "strength estimation",
    "strength assessment",
    "strength evaluation",
    "compressive strength",
    "tensile strength",
    "flexural strength",
    "characteristic strength",
    "characteristic value",
    "design value",
    "material strength",
    "load capacity",
    "residual strength",
    "in-situ strength",
    "strength prediction",
    "strength determination",
];

pub const TASK_DETERIORATION: &[&str] = &[
    "deterioration assessment",
    "deterioration evaluation",
    "corrosion detection",
    "corrosion assessment",
    "corrosion rate",
    "decay assessment",
    "decay detection",
    "wood decay",
    "chemical attack",
    "sulfate attack",
    "alkali-silica reaction",
    "residual capacity",
    "degradation assessment",
    "carbonation depth",
    "chloride penetration",
    "chloride ingress",
    "service life",
    "durability assessment",
];

pub const TASK_DEFECTS: &[&str] = &[
    "defect identification",
    "defect detection",
    "flaw detection",
    "crack detection",
    "crack mapping",
    "crack characterization",
    "void detection",
    "void identification",
    "honeycombing",
    "delamination detection",
    "delamination assessment",
    "hidden damage",
    "internal damage",
    "damage detection",
    "fire damage",
    "impact damage",
    "structural damage",
];

pub const TASK_MOISTURE: &[&str] = &[
    "moisture content",
    "moisture measurement",
    "moisture assessment",
    "moisture condition",
    "moisture distribution",
    "moisture meter",
    "resistance meter",
    "moisture-related",
    "moisture damage",
    "water ingress",
    "drying",
    "wetting",
    "hygroscopic",
];

/// Structural reuse context. Can stand in for a task match.
pub const CIRCULAR_ECONOMY: &[&str] = &[
    "circular construction",
    "circular economy building",
    "structural reuse",
    "component reuse",
    "element reuse",
    "building reuse",
    "material reuse",
    "deconstruction",
    "selective demolition",
    "design for disassembly",
    "reuse assessment",
    "reusability assessment",
];

/// Off-topic domains. Any hit rejects the paper outright; list order decides
/// which term is reported.
pub const EXCLUSIONS: &[&str] = &[
    // Medical / clinical
    "cancer",
    "tumor",
    "tumour",
    "patient",
    "clinical trial",
    "biomedical",
    "medical imaging",
    "cell culture",
    "pharmaceutical",
    "surgery",
    "hospital",
    "diagnosis patient",
    "therapy",
    // Food / agriculture
    "food quality",
    "fruit quality",
    "vegetable",
    "meat quality",
    "agricultural",
    "crop",
    "grain",
    "fish quality",
    "poultry",
    // Non-civil manufacturing
    "aerospace",
    "aircraft",
    "wind turbine blade",
    "wind energy",
    "additive manufacturing",
    "semiconductor",
    "electronics",
    "battery",
    "lithium",
    "nuclear reactor",
    "pipeline weld",
    // Geoscience / oil & gas
    "seismic exploration",
    "oil reservoir",
    "petroleum",
    "mining exploration",
    "geological",
    "rock formation",
    // Automotive
    "automotive",
    "vehicle",
    "car body",
    "engine component",
    // Non-structural concrete
    "pavement",
    "asphalt",
    "road surface",
    "runway",
];

/// The five assessment tasks of the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Geometry,
    Strength,
    Deterioration,
    Defects,
    Moisture,
}

impl TaskCategory {
    /// All tasks in reporting order.
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Geometry,
        TaskCategory::Strength,
        TaskCategory::Deterioration,
        TaskCategory::Defects,
        TaskCategory::Moisture,
    ];

    /// Short label used in classifier reasons and summary keys.
    pub fn name(self) -> &'static str {
        match self {
            TaskCategory::Geometry => "geometry",
            TaskCategory::Strength => "strength",
            TaskCategory::Deterioration => "deterioration",
            TaskCategory::Defects => "defects",
            TaskCategory::Moisture => "moisture",
        }
    }

    /// Heading as printed in the review.
    pub fn title(self) -> &'static str {
        match self {
            TaskCategory::Geometry => "Geometry verification",
            TaskCategory::Strength => "Strength estimation",
            TaskCategory::Deterioration => "Deterioration assessment",
            TaskCategory::Defects => "Defect identification",
            TaskCategory::Moisture => "Moisture condition",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            TaskCategory::Geometry => TASK_GEOMETRY,
            TaskCategory::Strength => TASK_STRENGTH,
            TaskCategory::Deterioration => TASK_DETERIORATION,
            TaskCategory::Defects => TASK_DEFECTS,
            TaskCategory::Moisture => TASK_MOISTURE,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Material buckets for the summary. Broader than [`STRUCTURAL_MATERIALS`]:
/// a bare mention of the material is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialClass {
    Concrete,
    Steel,
    Timber,
    Masonry,
}

impl MaterialClass {
    pub const ALL: [MaterialClass; 4] = [
        MaterialClass::Concrete,
        MaterialClass::Steel,
        MaterialClass::Timber,
        MaterialClass::Masonry,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MaterialClass::Concrete => "concrete",
            MaterialClass::Steel => "steel",
            MaterialClass::Timber => "timber",
            MaterialClass::Masonry => "masonry",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            MaterialClass::Concrete => &["concrete"],
            MaterialClass::Steel => &["steel"],
            MaterialClass::Timber => &["timber", "wood"],
            MaterialClass::Masonry => &["masonry"],
        }
    }

    /// Whether lower-cased `text` mentions this material.
    pub fn detect(self, text: &str) -> bool {
        self.keywords().iter().any(|k| text.contains(k))
    }
}

/// One OpenAlex query, tagged with the review focus it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTerm {
    pub focus: &'static str,
    pub query: &'static str,
}

const fn term(focus: &'static str, query: &'static str) -> QueryTerm {
    QueryTerm { focus, query }
}

/// Fixed query list, searched in order.
pub const SEARCH_TERMS: &[QueryTerm] = &[
    // Geometry verification
    term("geometry", r#""reinforcement mapping" "ground penetrating radar""#),
    term("geometry", r#""cover depth" concrete "non-destructive""#),
    term("geometry", r#""rebar detection" ultrasonic"#),
    term("geometry", r#""geometry verification" structure"#),
    term("geometry", r#""GPR" "reinforced concrete""#),
    term("geometry", r#""reinforcement detection" concrete"#),
    term("geometry", r#""section geometry" "non-destructive""#),
    term("geometry", r#""cover depth measurement" concrete"#),
    // Strength estimation
    term("strength", r#""strength estimation" concrete"#),
    term("strength", r#""rebound hammer" concrete strength"#),
    term("strength", r#""compressive strength" "non-destructive" concrete"#),
    term("strength", r#""sonreb" concrete"#),
    term("strength", r#""pull-out test" concrete"#),
    term("strength", r#""in-situ strength" concrete"#),
    term("strength", r#""ultrasonic pulse velocity" strength concrete"#),
    term("strength", r#""characteristic value" strength concrete"#),
    term("strength", r#""schmidt hammer" concrete"#),
    // Deterioration assessment
    term("deterioration", r#""corrosion detection" "reinforced concrete""#),
    term("deterioration", r#""half-cell potential" corrosion"#),
    term("deterioration", r#""carbonation depth" concrete"#),
    term("deterioration", r#""chloride penetration" concrete"#),
    term("deterioration", r#""corrosion assessment" concrete"#),
    term("deterioration", r#""decay assessment" timber"#),
    term("deterioration", r#""resistance drilling" timber"#),
    term("deterioration", r#""degradation assessment" concrete"#),
    term("deterioration", r#""corrosion rate" reinforcement"#),
    term("deterioration", r#""service life" concrete NDT"#),
    term("deterioration", r#""durability assessment" concrete"#),
    // Defect identification
    term("defects", r#""crack detection" concrete"#),
    term("defects", r#""delamination detection" concrete"#),
    term("defects", r#""impact echo" concrete"#),
    term("defects", r#""void detection" concrete"#),
    term("defects", r#""defect detection" concrete"#),
    term("defects", r#""flaw detection" steel"#),
    term("defects", r#""ultrasonic testing" concrete defect"#),
    term("defects", r#""internal damage" concrete"#),
    term("defects", r#""hidden damage" structure"#),
    term("defects", r#""damage detection" "non-destructive""#),
    // Moisture condition
    term("moisture", r#""moisture content" timber"#),
    term("moisture", r#""moisture measurement" building"#),
    term("moisture", r#""infrared thermography" moisture"#),
    term("moisture", r#""moisture assessment" concrete"#),
    term("moisture", r#""water ingress" building"#),
    term("moisture", r#""moisture meter" timber"#),
    term("moisture", r#""moisture distribution" concrete"#),
    // Core NDT methods on structural materials
    term("methods", r#""non-destructive testing" "reinforced concrete""#),
    term("methods", r#""non-destructive testing" "structural steel""#),
    term("methods", r#""non-destructive evaluation" concrete bridge"#),
    term("methods", r#""ultrasonic pulse velocity" concrete structure"#),
    term("methods", r#""ground penetrating radar" concrete structure"#),
    term("methods", r#""infrared thermography" concrete building"#),
    // Masonry and timber
    term("materials", r#""masonry structure" "non-destructive""#),
    term("materials", r#""timber structure" "non-destructive""#),
    term("materials", r#""historic masonry" assessment"#),
    term("materials", r#""heritage building" "non-destructive""#),
    term("materials", r#""flat-jack" masonry"#),
    term("materials", r#""resistograph" timber"#),
    // Circular construction and reuse
    term("circular", r#""structural reuse" assessment"#),
    term("circular", r#""circular construction" building"#),
    term("circular", r#""existing building" assessment NDT"#),
    term("circular", r#""condition assessment" existing structure"#),
    term("circular", r#""reuse assessment" building"#),
    term("circular", r#""building reuse" "non-destructive""#),
];
