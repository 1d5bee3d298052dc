//! Starter content stamped onto every new account: the built-in syllabus
//! taxonomy and the motivational quote pool.

use rand::Rng;
use serde::Serialize;

use crate::models::{ExamType, SyllabusItem};

struct SeedTopic {
    exam_type: ExamType,
    subject: &'static str,
    topic: &'static str,
    subtopics: &'static [&'static str],
    high_yield: bool,
}

const SEED_SYLLABUS: [SeedTopic; 20] = [
    // mains / physics
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "physics",
        topic: "Mechanics",
        subtopics: &["Kinematics", "Dynamics", "Rotational Motion"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "physics",
        topic: "Thermodynamics",
        subtopics: &["Laws of Thermodynamics", "Heat Engines", "Kinetic Theory"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "physics",
        topic: "Waves & Oscillations",
        subtopics: &["SHM", "Wave Motion", "Sound Waves"],
        high_yield: false,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "physics",
        topic: "Electromagnetism",
        subtopics: &["Electrostatics", "Current Electricity", "Magnetic Effects"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "physics",
        topic: "Optics",
        subtopics: &["Ray Optics", "Wave Optics", "Optical Instruments"],
        high_yield: false,
    },
    // mains / chemistry
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "chemistry",
        topic: "Organic Chemistry",
        subtopics: &["Hydrocarbons", "Functional Groups", "Biomolecules"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "chemistry",
        topic: "Inorganic Chemistry",
        subtopics: &["Periodic Table", "Chemical Bonding", "Coordination Compounds"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "chemistry",
        topic: "Physical Chemistry",
        subtopics: &["Chemical Kinetics", "Electrochemistry", "Solutions"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "chemistry",
        topic: "Environmental Chemistry",
        subtopics: &["Pollution", "Green Chemistry"],
        high_yield: false,
    },
    // mains / mathematics
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "mathematics",
        topic: "Calculus",
        subtopics: &["Limits", "Derivatives", "Integrals", "Differential Equations"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "mathematics",
        topic: "Coordinate Geometry",
        subtopics: &["Straight Lines", "Circles", "Parabola", "Hyperbola"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "mathematics",
        topic: "Algebra",
        subtopics: &["Quadratic Equations", "Sequences & Series", "Permutations"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "mathematics",
        topic: "Trigonometry",
        subtopics: &["Ratios", "Identities", "Inverse Functions"],
        high_yield: false,
    },
    SeedTopic {
        exam_type: ExamType::Mains,
        subject: "mathematics",
        topic: "Vector & 3D Geometry",
        subtopics: &["Vectors", "Planes", "Lines in 3D"],
        high_yield: false,
    },
    // advanced / physics
    SeedTopic {
        exam_type: ExamType::Advanced,
        subject: "physics",
        topic: "Modern Physics",
        subtopics: &["Quantum Mechanics", "Nuclear Physics", "Semiconductor"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Advanced,
        subject: "physics",
        topic: "Advanced Mechanics",
        subtopics: &["Rigid Body Dynamics", "Fluid Mechanics"],
        high_yield: true,
    },
    // advanced / chemistry
    SeedTopic {
        exam_type: ExamType::Advanced,
        subject: "chemistry",
        topic: "Advanced Organic",
        subtopics: &["Reaction Mechanisms", "Stereochemistry"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Advanced,
        subject: "chemistry",
        topic: "Advanced Inorganic",
        subtopics: &["Transition Elements", "Organometallics"],
        high_yield: false,
    },
    // advanced / mathematics
    SeedTopic {
        exam_type: ExamType::Advanced,
        subject: "mathematics",
        topic: "Advanced Calculus",
        subtopics: &["Multiple Integrals", "Vector Calculus"],
        high_yield: true,
    },
    SeedTopic {
        exam_type: ExamType::Advanced,
        subject: "mathematics",
        topic: "Complex Numbers",
        subtopics: &["De Moivre's Theorem", "Applications"],
        high_yield: false,
    },
];

/// Builds the full starter syllabus for a new user
///
/// ### Arguments
///
/// * `user_id` - The id of the user the items will belong to
///
/// ### Returns
///
/// One not-started [`SyllabusItem`] per seed topic, across both exam tracks
pub fn initial_syllabus_items(user_id: &str) -> Vec<SyllabusItem> {
    SEED_SYLLABUS
        .iter()
        .map(|seed| {
            SyllabusItem::new(
                user_id,
                seed.exam_type,
                seed.subject,
                seed.topic,
                seed.subtopics.iter().map(|s| s.to_string()).collect(),
                seed.high_yield,
            )
        })
        .collect()
}

/// A motivational quote paired with a study tip.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Quote {
    pub quote: &'static str,
    pub tip: &'static str,
}

pub const MOTIVATIONAL_QUOTES: [Quote; 5] = [
    Quote {
        quote: "Success is the sum of small efforts repeated day in and day out.",
        tip: "Break complex topics into smaller, manageable chunks for better retention.",
    },
    Quote {
        quote: "The expert in anything was once a beginner.",
        tip: "Focus on understanding concepts rather than memorizing formulas.",
    },
    Quote {
        quote: "Your limitation—it's only your imagination.",
        tip: "Practice previous year questions to understand exam patterns.",
    },
    Quote {
        quote: "Push yourself, because no one else is going to do it for you.",
        tip: "Set daily study targets and track your progress consistently.",
    },
    Quote {
        quote: "Great things never come from comfort zones.",
        tip: "Challenge yourself with difficult problems to build confidence.",
    },
];

/// Picks a quote at random.
pub fn random_quote() -> Quote {
    let index = rand::rng().random_range(0..MOTIVATIONAL_QUOTES.len());
    MOTIVATIONAL_QUOTES[index]
}
