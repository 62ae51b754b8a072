//! Splitting shows into past and upcoming relative to a reference instant, plus the aggregations
//! built on top of that split (per-entity upcoming counts and the location directory).
//!
//! Every past/upcoming decision in the crate goes through `ShowTiming::classify`.

use chrono::NaiveDateTime;
use fnv::FnvHashMap as HashMap;

use crate::models::{Area, ListingSummary, ShowSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowTiming {
    Past,
    Upcoming,
}

impl ShowTiming {
    /// A show is upcoming iff it starts strictly after `reference`.  A show starting exactly at
    /// `reference` is past.
    pub fn classify(start_time: NaiveDateTime, reference: NaiveDateTime) -> Self {
        if start_time > reference {
            ShowTiming::Upcoming
        } else {
            ShowTiming::Past
        }
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct PartitionedShows {
    pub upcoming_shows: Vec<ShowSummary>,
    pub past_shows: Vec<ShowSummary>,
    pub upcoming_count: usize,
    pub past_count: usize,
}

/// Splits all shows attached to one venue or artist.  Both halves are ordered by start time, with
/// ties broken by the id of the entity on the other side of the show.
pub fn partition_shows(mut shows: Vec<ShowSummary>, reference: NaiveDateTime) -> PartitionedShows {
    shows.sort_by_key(|show| (show.start_time, show.counterpart_id));

    let (upcoming_shows, past_shows): (Vec<_>, Vec<_>) = shows
        .into_iter()
        .partition(|show| ShowTiming::classify(show.start_time, reference) == ShowTiming::Upcoming);

    PartitionedShows {
        upcoming_count: upcoming_shows.len(),
        past_count: past_shows.len(),
        upcoming_shows,
        past_shows,
    }
}

/// Counts upcoming shows per owner given `(owner_id, start_time)` pairs.  Owners without any
/// upcoming shows are absent from the returned map.
pub fn count_upcoming(
    show_times: impl IntoIterator<Item = (i32, NaiveDateTime)>,
    reference: NaiveDateTime,
) -> HashMap<i32, usize> {
    show_times
        .into_iter()
        .filter(|&(_, start_time)| {
            ShowTiming::classify(start_time, reference) == ShowTiming::Upcoming
        })
        .fold(HashMap::default(), |mut acc, (owner_id, _)| {
            *acc.entry(owner_id).or_insert(0) += 1;
            acc
        })
}

/// Builds the venue directory from `(city, state, venue)` rows.  Each distinct location appears
/// exactly once no matter how the rows are ordered or how many venues share it.  Areas are sorted
/// by `(state, city)` and the venues inside each area by id.
pub fn group_by_location(
    venues: impl IntoIterator<Item = (String, String, ListingSummary)>,
) -> Vec<Area> {
    let mut area_ix_by_location: HashMap<(String, String), usize> = HashMap::default();
    let mut areas: Vec<Area> = Vec::new();

    for (city, state, venue) in venues {
        let area_ix = *area_ix_by_location
            .entry((city.clone(), state.clone()))
            .or_insert_with(|| {
                areas.push(Area {
                    city,
                    state,
                    venues: Vec::new(),
                });
                areas.len() - 1
            });
        areas[area_ix].venues.push(venue);
    }

    for area in &mut areas {
        area.venues.sort_by_key(|venue| venue.id);
    }
    areas.sort_by(|a, b| (&a.state, &a.city).cmp(&(&b.state, &b.city)));
    areas
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(20, 0, 0))
            .expect("valid date")
    }

    fn show(counterpart_id: i32, offset_hours: i64) -> ShowSummary {
        ShowSummary {
            counterpart_id,
            counterpart_name: format!("Counterpart {}", counterpart_id),
            counterpart_image_link: String::new(),
            start_time: reference() + Duration::hours(offset_hours),
        }
    }

    fn summary(id: i32) -> ListingSummary {
        ListingSummary {
            id,
            name: format!("Venue {}", id),
            upcoming_count: 0,
        }
    }

    #[test]
    fn classify_boundary_is_past() {
        let now = reference();
        assert_eq!(ShowTiming::classify(now, now), ShowTiming::Past);
        assert_eq!(
            ShowTiming::classify(now + Duration::seconds(1), now),
            ShowTiming::Upcoming
        );
        assert_eq!(
            ShowTiming::classify(now - Duration::seconds(1), now),
            ShowTiming::Past
        );
    }

    #[test]
    fn every_show_lands_in_exactly_one_half() {
        let shows = vec![show(1, -48), show(2, 0), show(3, 1), show(4, 72), show(5, -1)];
        let total = shows.len();

        let partitioned = partition_shows(shows, reference());

        assert_eq!(partitioned.upcoming_count + partitioned.past_count, total);
        assert_eq!(partitioned.upcoming_count, partitioned.upcoming_shows.len());
        assert_eq!(partitioned.past_count, partitioned.past_shows.len());
        assert_eq!(partitioned.upcoming_count, 2);
        // The show starting exactly at the reference instant is past
        assert!(partitioned.past_shows.iter().any(|s| s.counterpart_id == 2));
    }

    #[test]
    fn halves_are_ordered_by_start_time_then_counterpart() {
        let shows = vec![show(9, 5), show(3, 2), show(7, 5), show(1, -3), show(2, -10)];

        let partitioned = partition_shows(shows, reference());

        let upcoming: Vec<i32> = partitioned
            .upcoming_shows
            .iter()
            .map(|s| s.counterpart_id)
            .collect();
        let past: Vec<i32> = partitioned
            .past_shows
            .iter()
            .map(|s| s.counterpart_id)
            .collect();
        assert_eq!(upcoming, vec![3, 7, 9]);
        assert_eq!(past, vec![2, 1]);
    }

    #[test]
    fn no_shows_partition_to_empty() {
        assert_eq!(
            partition_shows(Vec::new(), reference()),
            PartitionedShows::default()
        );
    }

    #[test]
    fn counts_upcoming_per_owner() {
        let now = reference();
        let counts = count_upcoming(
            vec![
                (1, now + Duration::days(1)),
                (1, now + Duration::days(2)),
                (1, now - Duration::days(2)),
                (2, now),
                (3, now + Duration::minutes(5)),
            ],
            now,
        );

        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), None);
        assert_eq!(counts.get(&3), Some(&1));
    }

    #[test]
    fn shared_location_yields_one_area() {
        let rows = vec![
            ("Boston".to_string(), "MA".to_string(), summary(4)),
            ("San Francisco".to_string(), "CA".to_string(), summary(1)),
            ("Boston".to_string(), "MA".to_string(), summary(2)),
        ];

        let areas = group_by_location(rows);

        assert_eq!(areas.len(), 2);
        let boston: Vec<&Area> = areas
            .iter()
            .filter(|area| area.city == "Boston" && area.state == "MA")
            .collect();
        assert_eq!(boston.len(), 1);
        let ids: Vec<i32> = boston[0].venues.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn areas_sorted_by_state_then_city() {
        let rows = vec![
            ("Seattle".to_string(), "WA".to_string(), summary(1)),
            ("Oakland".to_string(), "CA".to_string(), summary(2)),
            ("Berkeley".to_string(), "CA".to_string(), summary(3)),
            ("Seattle".to_string(), "WA".to_string(), summary(4)),
        ];

        let locations: Vec<(String, String)> = group_by_location(rows)
            .into_iter()
            .map(|area| (area.city, area.state))
            .collect();

        assert_eq!(
            locations,
            vec![
                ("Berkeley".to_string(), "CA".to_string()),
                ("Oakland".to_string(), "CA".to_string()),
                ("Seattle".to_string(), "WA".to_string()),
            ]
        );
    }

    #[test]
    fn same_city_in_different_states_stays_separate() {
        let rows = vec![
            ("Portland".to_string(), "OR".to_string(), summary(1)),
            ("Portland".to_string(), "ME".to_string(), summary(2)),
        ];

        assert_eq!(group_by_location(rows).len(), 2);
    }
}
