use crate::domain::{FeedDays, FilterCriteria, ObjectRecord};

/// Flatten per-day collections into one list, keeping API order (days as
/// returned, records within a day as returned) and dropping records that do
/// not match `criteria`. No sorting; an empty result is a normal outcome.
pub fn filter_records(days: FeedDays, criteria: &FilterCriteria) -> Vec<ObjectRecord> {
    days.into_iter()
        .flat_map(|day| day.objects)
        .filter(|rec| criteria.matches(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CloseApproach, FeedDay};

    fn rec(name: &str, avg: f64, hazardous: bool) -> ObjectRecord {
        ObjectRecord {
            name: name.to_string(),
            diameter_min_m: avg * 0.5,
            diameter_max_m: avg * 1.5,
            hazardous,
            close_approaches: vec![CloseApproach {
                date: None,
                relative_velocity_kph: "1000".to_string(),
                miss_distance_km: "500000".to_string(),
            }],
        }
    }

    fn day(date: &str, objects: Vec<ObjectRecord>) -> FeedDay {
        FeedDay {
            date: date.to_string(),
            objects,
        }
    }

    fn names(v: &[ObjectRecord]) -> Vec<&str> {
        v.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> FeedDays {
        vec![day(
            "2025-01-01",
            vec![rec("a", 10.0, true), rec("b", 60.0, false), rec("c", 150.0, true)],
        )]
    }

    #[test]
    fn hazardous_only_keeps_input_order() {
        let out = filter_records(sample(), &FilterCriteria::hazardous());
        assert_eq!(names(&out), vec!["a", "c"]);
        let avgs: Vec<f64> = out.iter().map(|r| r.average_diameter()).collect();
        assert_eq!(avgs, vec![10.0, 150.0]);
    }

    #[test]
    fn size_thresholds_are_inclusive() {
        let out = filter_records(sample(), &FilterCriteria::at_least(60.0));
        assert_eq!(names(&out), vec!["b", "c"]);

        let out = filter_records(sample(), &FilterCriteria::at_most(60.0));
        assert_eq!(names(&out), vec!["a", "b"]);
    }

    #[test]
    fn criteria_are_anded() {
        let criteria = FilterCriteria {
            hazardous_only: true,
            min_size: Some(20.0),
            max_size: Some(200.0),
        };
        let out = filter_records(sample(), &criteria);
        assert_eq!(names(&out), vec!["c"]);
    }

    #[test]
    fn days_flatten_in_response_order() {
        let days = vec![
            day("2025-01-03", vec![rec("z", 1.0, false)]),
            day("2025-01-01", vec![rec("x", 1.0, false), rec("y", 1.0, false)]),
            day("2025-01-02", vec![]),
        ];
        let out = filter_records(days, &FilterCriteria::none());
        assert_eq!(names(&out), vec!["z", "x", "y"]);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let criteria = FilterCriteria {
            hazardous_only: false,
            min_size: Some(15.0),
            max_size: Some(100.0),
        };
        let once = filter_records(sample(), &criteria);
        let twice = filter_records(
            vec![FeedDay {
                date: "2025-06-10".to_string(),
                objects: once.clone(),
            }],
            &criteria,
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let out = filter_records(sample(), &FilterCriteria::at_least(10_000.0));
        assert!(out.is_empty());
        assert!(filter_records(Vec::new(), &FilterCriteria::none()).is_empty());
    }
}
