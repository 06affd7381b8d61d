//! Timeline strip: dated education and experience events placed
//! proportionally between a fixed start year and the current year.

pub mod handlers;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeData;
use crate::resume::periods::timeline_year;

/// Starts a bit before the earliest event so the first marker is not clipped.
pub const START_YEAR: i32 = 2004;
/// Vertical spacing between same-year markers.
pub const STACK_GAP_PX: f64 = 22.0;
pub const LEFT_EDGE_THRESHOLD: f64 = 12.0;
pub const RIGHT_EDGE_THRESHOLD: f64 = 88.0;
pub const ANIM_STAGGER_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Education,
    Experience,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub period: String,
    pub title: String,
    pub subtitle: String,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedEvent {
    pub event: TimelineEvent,
    /// Horizontal position in percent of the strip width.
    pub position: f64,
    pub stack_offset_y: f64,
    pub tooltip_align: TooltipAlign,
    pub anim_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub start_year: i32,
    pub end_year: i32,
    pub label_years: Vec<i32>,
    pub events: Vec<PositionedEvent>,
}

/// Dated events sorted ascending by year; undated entries are dropped.
pub fn collect_events(data: &ResumeData) -> Vec<TimelineEvent> {
    let education = data.education.iter().map(|edu| {
        (
            edu.id.clone(),
            EventKind::Education,
            edu.period.clone(),
            edu.degree.clone(),
            edu.institution.clone(),
        )
    });
    let experience = data.experience.iter().map(|exp| {
        (
            exp.id.clone(),
            EventKind::Experience,
            exp.period.clone(),
            exp.role.clone(),
            exp.company.clone(),
        )
    });

    let mut events: Vec<_> = education
        .chain(experience)
        .filter_map(|(id, kind, period, title, subtitle)| {
            let year = timeline_year(&period)?;
            Some(TimelineEvent {
                id,
                kind,
                period,
                title,
                subtitle,
                year,
            })
        })
        .collect();
    events.sort_by_key(|e| e.year);
    events
}

fn position(year: i32, end_year: i32) -> f64 {
    let total = (end_year - START_YEAR).max(1) as f64;
    (year - START_YEAR) as f64 / total * 100.0
}

fn tooltip_align(position: f64) -> TooltipAlign {
    if position < LEFT_EDGE_THRESHOLD {
        TooltipAlign::Left
    } else if position > RIGHT_EDGE_THRESHOLD {
        TooltipAlign::Right
    } else {
        TooltipAlign::Center
    }
}

fn within_year(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    a.kind.cmp(&b.kind).then_with(|| {
        let at = format!("{} {}", a.subtitle, a.title).to_lowercase();
        let bt = format!("{} {}", b.subtitle, b.title).to_lowercase();
        at.cmp(&bt)
    })
}

pub fn derive_timeline(data: &ResumeData, current_year: i32) -> Timeline {
    let mut by_year: BTreeMap<i32, Vec<TimelineEvent>> = BTreeMap::new();
    for event in collect_events(data) {
        by_year.entry(event.year).or_default().push(event);
    }

    let mut events = Vec::new();
    for (&year, year_events) in by_year.iter_mut() {
        year_events.sort_by(within_year);
        let x = position(year, current_year);
        let align = tooltip_align(x);
        let center = (year_events.len() as f64 - 1.0) / 2.0;

        for (i, event) in year_events.drain(..).enumerate() {
            let anim_delay_ms = events.len() as u64 * ANIM_STAGGER_MS;
            events.push(PositionedEvent {
                event,
                position: x,
                stack_offset_y: (i as f64 - center) * STACK_GAP_PX,
                tooltip_align: align,
                anim_delay_ms,
            });
        }
    }

    Timeline {
        start_year: START_YEAR,
        end_year: current_year,
        label_years: by_year.keys().copied().collect(),
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::store::fixtures::*;

    #[test]
    fn test_undated_entries_are_excluded() {
        let data = resume(
            vec![
                experience("exp-1", "Sep 2010 — Dec 2013", None),
                experience("exp-2", "Someday", None),
            ],
            vec![education("edu-1", "Tech", "TBD")],
            vec![],
        );
        let events = collect_events(&data);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "exp-1");
        assert_eq!(events[0].year, 2010);
    }

    #[test]
    fn test_zero_year_entries_are_excluded() {
        let data = resume(
            vec![
                experience("zero", "0000 — 2001", None),
                experience("real", "2010 — 2012", None),
            ],
            vec![],
            vec![],
        );
        let ids: Vec<_> = collect_events(&data).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["real"]);
    }

    #[test]
    fn test_events_sorted_ascending_by_first_year() {
        let data = resume(
            vec![
                experience("late", "May 2021 — Sep 2024", None),
                experience("early", "Aug 2015 — Mar 2019", None),
            ],
            vec![education("edu", "Tech", "2024 — Present")],
            vec![],
        );
        let years: Vec<_> = collect_events(&data).iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2015, 2021, 2024]);
    }

    #[test]
    fn test_positions_are_linear_between_start_and_current_year() {
        let data = resume(
            vec![
                experience("a", "2004", None),
                experience("b", "2015", None),
                experience("c", "2026", None),
            ],
            vec![],
            vec![],
        );
        let timeline = derive_timeline(&data, 2026);
        let positions: Vec<_> = timeline.events.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.0, 50.0, 100.0]);
        assert_eq!(timeline.events[0].tooltip_align, TooltipAlign::Left);
        assert_eq!(timeline.events[1].tooltip_align, TooltipAlign::Center);
        assert_eq!(timeline.events[2].tooltip_align, TooltipAlign::Right);
    }

    #[test]
    fn test_degenerate_range_does_not_divide_by_zero() {
        let data = resume(vec![experience("a", "2004", None)], vec![], vec![]);
        let timeline = derive_timeline(&data, 2004);
        assert_eq!(timeline.events[0].position, 0.0);
    }

    #[test]
    fn test_same_year_events_stack_education_first() {
        let data = resume(
            vec![
                experience("exp-b", "2015 — 2016", None),
                experience("exp-a", "2015 — 2019", None),
            ],
            vec![education("edu", "Zeta University", "2015 — 2017")],
            vec![],
        );
        let timeline = derive_timeline(&data, 2026);
        let ids: Vec<_> = timeline
            .events
            .iter()
            .map(|p| p.event.id.as_str())
            .collect();
        assert_eq!(ids, vec!["edu", "exp-a", "exp-b"]);

        let offsets: Vec<_> = timeline.events.iter().map(|p| p.stack_offset_y).collect();
        assert_eq!(offsets, vec![-22.0, 0.0, 22.0]);

        let delays: Vec<_> = timeline.events.iter().map(|p| p.anim_delay_ms).collect();
        assert_eq!(delays, vec![0, 150, 300]);
        assert_eq!(timeline.label_years, vec![2015]);
    }

    #[test]
    fn test_event_kind_serializes_as_type() {
        let data = resume(vec![], vec![education("edu", "Tech", "2010")], vec![]);
        let value = serde_json::to_value(&collect_events(&data)[0]).unwrap();
        assert_eq!(value["type"], "education");
    }
}
