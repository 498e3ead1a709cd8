//! Askama templates for the web frontend.

use askama::Template;

use crate::knowledge::KnowledgeBase;
use crate::narrate::{NO_ROUTE_MESSAGE, narrate, summary};
use crate::planner::{SearchOutcome, SearchResult};

use super::dto::CANCELLED_MESSAGE;

/// Home page with the route form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub loaded: bool,
    pub stations: Vec<StationOption>,
}

/// Route result fragment, swapped into the index page.
#[derive(Template)]
#[template(path = "route_result.html")]
pub struct RouteResultTemplate {
    pub view: RouteView,
}

/// A station in the form's drop-downs.
#[derive(Debug, Clone)]
pub struct StationOption {
    pub id: String,
    pub name: String,
}

impl StationOption {
    pub fn all(base: &KnowledgeBase) -> Vec<Self> {
        base.stations()
            .into_iter()
            .map(|s| StationOption {
                id: s.id.to_string(),
                name: s.name.clone(),
            })
            .collect()
    }
}

/// Route view model for templates.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub found: bool,
    /// Shown instead of the summary when nothing was found.
    pub message: String,
    pub summary: Vec<String>,
    pub steps: Vec<String>,
    pub warnings: Vec<String>,
}

impl RouteView {
    pub fn from_result(base: &KnowledgeBase, result: &SearchResult) -> Self {
        let (found, message, summary, steps) = match &result.outcome {
            SearchOutcome::Found(route) => (
                true,
                String::new(),
                summary(route),
                narrate(base, route).iter().map(|s| s.to_string()).collect(),
            ),
            SearchOutcome::NoRoute => (false, NO_ROUTE_MESSAGE.to_string(), Vec::new(), Vec::new()),
            SearchOutcome::Cancelled => {
                (false, CANCELLED_MESSAGE.to_string(), Vec::new(), Vec::new())
            }
        };

        Self {
            found,
            message,
            summary,
            steps,
            warnings: result.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, LineId, Metrics, Route, StationId};
    use crate::knowledge::TransitData;
    use crate::planner::SearchStats;
    use chrono::NaiveDate;
    use serde_json::json;

    fn base() -> KnowledgeBase {
        let data: TransitData = serde_json::from_value(json!({
            "stations": [
                {"id": "B", "name": "Beta <North>", "latitude": 0.0, "longitude": 0.01},
                {"id": "A", "name": "Alpha", "latitude": 0.0, "longitude": 0.0},
            ],
            "rules": [{"type": "mystery"}],
        }))
        .unwrap();
        KnowledgeBase::from_data(data).unwrap()
    }

    fn result(outcome: SearchOutcome) -> SearchResult {
        SearchResult {
            outcome,
            warnings: base().rule_warnings().to_vec(),
            at: NaiveDate::from_ymd_opt(2024, 3, 18)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn station_options_are_sorted() {
        let ids: Vec<_> = StationOption::all(&base()).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn index_renders_and_escapes() {
        let html = IndexTemplate {
            loaded: true,
            stations: StationOption::all(&base()),
        }
        .render()
        .unwrap();

        assert!(html.contains("value=\"A\""));
        assert!(html.contains("Beta &lt;North&gt;"));
    }

    #[test]
    fn index_renders_unloaded() {
        let html = IndexTemplate {
            loaded: false,
            stations: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("No network data is loaded"));
    }

    #[test]
    fn found_route_view() {
        let a = StationId::parse("A").unwrap();
        let b = StationId::parse("B").unwrap();
        let hop = ConnectionId::new(a.clone(), b.clone(), LineId::parse("L1").unwrap());
        let route = Route::new(vec![a, b], vec![hop], Metrics::ZERO).unwrap();

        let view = RouteView::from_result(&base(), &result(SearchOutcome::Found(route)));
        assert!(view.found);
        assert_eq!(view.steps.len(), 2);
        assert_eq!(view.warnings.len(), 1);

        let html = RouteResultTemplate { view }.render().unwrap();
        assert!(html.contains("Start at Alpha. Take line L1 toward Beta &lt;North&gt;."));
        assert!(html.contains("rule #0 (mystery) skipped"));
    }

    #[test]
    fn missing_route_view() {
        let view = RouteView::from_result(&base(), &result(SearchOutcome::NoRoute));
        assert!(!view.found);

        let html = RouteResultTemplate { view }.render().unwrap();
        assert!(html.contains(NO_ROUTE_MESSAGE));
    }
}
