use serde::Serialize;

use crate::meals::repo::Meal;

/// Adherence summary over one user's meals.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietMetrics {
    pub total_meals: usize,
    pub meals_in_diet: usize,
    pub meals_out_of_diet: usize,
    pub best_sequence: usize,
}

/// Single left-to-right scan in retrieval order: count totals and track the
/// longest contiguous on-diet run. An unset flag counts as off-diet and
/// breaks the run.
pub fn compute(meals: &[Meal]) -> DietMetrics {
    let mut metrics = DietMetrics {
        total_meals: meals.len(),
        meals_in_diet: 0,
        meals_out_of_diet: 0,
        best_sequence: 0,
    };

    let mut current_run = 0;
    for meal in meals {
        if meal.is_on_diet() {
            metrics.meals_in_diet += 1;
            current_run += 1;
            metrics.best_sequence = metrics.best_sequence.max(current_run);
        } else {
            metrics.meals_out_of_diet += 1;
            current_run = 0;
        }
    }

    metrics
}
