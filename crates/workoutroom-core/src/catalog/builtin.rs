//! Built-in exercise and plan tables.

use super::types::{Difficulty, Exercise, MuscleGroup, Timing, WorkoutPlan};

struct ExerciseRow {
    id: &'static str,
    name: &'static str,
    group: MuscleGroup,
    secondary: &'static [MuscleGroup],
    difficulty: Difficulty,
    instructions: &'static [&'static str],
    duration: u32,
    glyphs: (&'static str, &'static str),
}

const EXERCISES: &[ExerciseRow] = &[
    ExerciseRow {
        id: "jumping-jacks",
        name: "Jumping Jacks",
        group: MuscleGroup::Cardio,
        secondary: &[MuscleGroup::Legs, MuscleGroup::Shoulders],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Stand with feet together and arms at your sides",
            "Jump feet apart while raising arms overhead",
            "Jump back to the starting position",
        ],
        duration: 30,
        glyphs: ("🙆", "🧍"),
    },
    ExerciseRow {
        id: "push-ups",
        name: "Push-ups",
        group: MuscleGroup::Chest,
        secondary: &[MuscleGroup::Arms, MuscleGroup::Shoulders, MuscleGroup::Core],
        difficulty: Difficulty::Intermediate,
        instructions: &[
            "Start in a high plank with hands under shoulders",
            "Lower your chest until it nearly touches the floor",
            "Push back up to full arm extension",
        ],
        duration: 30,
        glyphs: ("🫸", "💪"),
    },
    ExerciseRow {
        id: "knee-push-ups",
        name: "Knee Push-ups",
        group: MuscleGroup::Chest,
        secondary: &[MuscleGroup::Arms],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Kneel and place hands slightly wider than shoulders",
            "Lower your chest while keeping hips in line",
            "Press back up",
        ],
        duration: 30,
        glyphs: ("🫸", "💪"),
    },
    ExerciseRow {
        id: "squats",
        name: "Bodyweight Squats",
        group: MuscleGroup::Legs,
        secondary: &[MuscleGroup::Glutes, MuscleGroup::Core],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Stand with feet shoulder-width apart",
            "Sit hips back and down until thighs are parallel",
            "Drive through your heels to stand",
        ],
        duration: 30,
        glyphs: ("🧍", "🏋"),
    },
    ExerciseRow {
        id: "jump-squats",
        name: "Jump Squats",
        group: MuscleGroup::Legs,
        secondary: &[MuscleGroup::Glutes, MuscleGroup::Cardio],
        difficulty: Difficulty::Advanced,
        instructions: &[
            "Lower into a squat",
            "Explode upward into a jump",
            "Land softly and go straight into the next rep",
        ],
        duration: 30,
        glyphs: ("🏋", "🚀"),
    },
    ExerciseRow {
        id: "lunges",
        name: "Alternating Lunges",
        group: MuscleGroup::Legs,
        secondary: &[MuscleGroup::Glutes],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Step forward and lower the back knee toward the floor",
            "Push off the front foot to return",
            "Alternate legs each rep",
        ],
        duration: 30,
        glyphs: ("🚶", "🧍"),
    },
    ExerciseRow {
        id: "glute-bridges",
        name: "Glute Bridges",
        group: MuscleGroup::Glutes,
        secondary: &[MuscleGroup::Core, MuscleGroup::Legs],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Lie on your back with knees bent",
            "Drive hips up until your body forms a straight line",
            "Lower with control",
        ],
        duration: 30,
        glyphs: ("🛌", "🌉"),
    },
    ExerciseRow {
        id: "plank",
        name: "Plank",
        group: MuscleGroup::Core,
        secondary: &[MuscleGroup::Shoulders],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Rest on forearms and toes",
            "Keep a straight line from head to heels",
            "Brace your core and breathe",
        ],
        duration: 30,
        glyphs: ("🧱", "✅"),
    },
    ExerciseRow {
        id: "mountain-climbers",
        name: "Mountain Climbers",
        group: MuscleGroup::Core,
        secondary: &[MuscleGroup::Cardio, MuscleGroup::Shoulders],
        difficulty: Difficulty::Intermediate,
        instructions: &[
            "Start in a high plank",
            "Drive one knee toward your chest",
            "Switch legs quickly",
        ],
        duration: 30,
        glyphs: ("⛰", "🏃"),
    },
    ExerciseRow {
        id: "bicycle-crunches",
        name: "Bicycle Crunches",
        group: MuscleGroup::Core,
        secondary: &[],
        difficulty: Difficulty::Intermediate,
        instructions: &[
            "Lie on your back with hands behind your head",
            "Bring opposite elbow to opposite knee",
            "Alternate sides in a pedalling motion",
        ],
        duration: 30,
        glyphs: ("🚲", "✅"),
    },
    ExerciseRow {
        id: "burpees",
        name: "Burpees",
        group: MuscleGroup::FullBody,
        secondary: &[MuscleGroup::Chest, MuscleGroup::Legs, MuscleGroup::Cardio],
        difficulty: Difficulty::Advanced,
        instructions: &[
            "Drop into a squat and place hands on the floor",
            "Kick feet back into a plank and do a push-up",
            "Jump feet in and leap up with arms overhead",
        ],
        duration: 30,
        glyphs: ("🔥", "🚀"),
    },
    ExerciseRow {
        id: "superman",
        name: "Superman Hold",
        group: MuscleGroup::Back,
        secondary: &[MuscleGroup::Glutes],
        difficulty: Difficulty::Beginner,
        instructions: &[
            "Lie face down with arms extended",
            "Lift arms, chest and legs off the floor",
            "Hold, then lower with control",
        ],
        duration: 30,
        glyphs: ("🦸", "✅"),
    },
];

pub(super) fn exercises() -> Vec<Exercise> {
    EXERCISES
        .iter()
        .map(|row| Exercise {
            id: row.id.to_string(),
            name: row.name.to_string(),
            muscle_group: row.group,
            secondary_muscles: row.secondary.to_vec(),
            difficulty: row.difficulty,
            instructions: row.instructions.iter().map(|s| s.to_string()).collect(),
            default_duration: row.duration,
            start_glyph: row.glyphs.0.to_string(),
            end_glyph: row.glyphs.1.to_string(),
        })
        .collect()
}

fn plan(
    id: &str,
    name: &str,
    description: &str,
    difficulty: Difficulty,
    estimated_minutes: u32,
    exercises: &[&str],
    timing: (u32, u32, u32),
) -> WorkoutPlan {
    WorkoutPlan {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        difficulty,
        estimated_minutes,
        exercises: exercises.iter().map(|s| s.to_string()).collect(),
        timing: Timing {
            work_seconds: timing.0,
            rest_seconds: timing.1,
            rounds: timing.2,
            prep_seconds: None,
        },
    }
}

pub(super) fn plans() -> Vec<WorkoutPlan> {
    vec![
        plan(
            "quick-start",
            "Quick Start",
            "A gentle full-body circuit for getting moving.",
            Difficulty::Beginner,
            9,
            &["jumping-jacks", "squats", "knee-push-ups", "plank"],
            (20, 20, 3),
        ),
        plan(
            "classic-tabata",
            "Classic Tabata",
            "Eight rounds of 20s on, 10s off.",
            Difficulty::Intermediate,
            5,
            &["burpees"],
            (20, 10, 8),
        ),
        plan(
            "core-crusher",
            "Core Crusher",
            "Plank variations and crunches for a strong midsection.",
            Difficulty::Intermediate,
            13,
            &["plank", "mountain-climbers", "bicycle-crunches", "glute-bridges"],
            (40, 20, 3),
        ),
        plan(
            "full-body-burn",
            "Full Body Burn",
            "High-intensity compound moves with short rests.",
            Difficulty::Advanced,
            25,
            &[
                "burpees",
                "jump-squats",
                "push-ups",
                "mountain-climbers",
                "lunges",
                "superman",
            ],
            (45, 15, 4),
        ),
    ]
}
