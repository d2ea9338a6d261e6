use serde::{Deserialize, Serialize};

/// Identifier of a workout type grouping
pub type WorkoutTypeId = i64;

/// Identifier of an exercise template in the catalog
pub type TemplateId = i64;

/// Workout type as returned by `GET /workout_types`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutType {
    pub id: WorkoutTypeId,
    pub name: String,
}

/// Exercise category; decides which measurements an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Flexibility,
    Balance,
    Sports,
    Functional,
}

impl ExerciseCategory {
    pub const ALL: [ExerciseCategory; 6] = [
        ExerciseCategory::Strength,
        ExerciseCategory::Cardio,
        ExerciseCategory::Flexibility,
        ExerciseCategory::Balance,
        ExerciseCategory::Sports,
        ExerciseCategory::Functional,
    ];

    /// Strength exercises record sets/reps/weight, everything else records duration
    pub fn is_strength(self) -> bool {
        self == ExerciseCategory::Strength
    }
}

impl std::fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseCategory::Strength => write!(f, "strength"),
            ExerciseCategory::Cardio => write!(f, "cardio"),
            ExerciseCategory::Flexibility => write!(f, "flexibility"),
            ExerciseCategory::Balance => write!(f, "balance"),
            ExerciseCategory::Sports => write!(f, "sports"),
            ExerciseCategory::Functional => write!(f, "functional"),
        }
    }
}

impl std::str::FromStr for ExerciseCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Ok(ExerciseCategory::Strength),
            "cardio" => Ok(ExerciseCategory::Cardio),
            "flexibility" => Ok(ExerciseCategory::Flexibility),
            "balance" => Ok(ExerciseCategory::Balance),
            "sports" => Ok(ExerciseCategory::Sports),
            "functional" => Ok(ExerciseCategory::Functional),
            _ => Err(anyhow::anyhow!("Invalid exercise category: {}", s)),
        }
    }
}

/// Catalog definition of an exercise, read-only on the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ExerciseCategory,
    #[serde(default)]
    pub supports_distance: bool,
}

/// Filter criteria for browsing templates
#[derive(Debug, Default, Clone)]
pub struct TemplateFilter {
    pub search: Option<String>,
    pub category: Option<ExerciseCategory>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &ExerciseTemplate) -> bool {
        if let Some(ref term) = self.search {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !template.name.to_lowercase().contains(&term) {
                return false;
            }
        }

        if let Some(category) = self.category {
            if template.category != category {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, templates: &'a [ExerciseTemplate]) -> Vec<&'a ExerciseTemplate> {
        templates.iter().filter(|t| self.matches(t)).collect()
    }
}
