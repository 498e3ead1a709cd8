//! Serialized record layout for transit data sets.
//!
//! Field names follow the English layout; the Spanish names used by older
//! data files are accepted as aliases. Rules are kept as raw JSON values so
//! that one malformed entry can be skipped without rejecting the file.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Connection, ConnectionId, CongestionFactor, Coordinates, DaySchedule, LineId, Rule,
    RuleWindow, Schedule, ScheduledRule, Station, StationId, TimeWindow, clock_time,
    parse_weekday,
};

use super::error::{LoadError, RuleWarning};

/// Congestion factor used when a rule doesn't specify one.
pub const DEFAULT_CONGESTION_FACTOR: f64 = 1.5;

/// A complete data set as supplied by a file or remote source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitData {
    #[serde(default, alias = "estaciones")]
    pub stations: Vec<StationRecord>,

    #[serde(default, alias = "conexiones")]
    pub connections: Vec<ConnectionRecord>,

    #[serde(default, alias = "reglas")]
    pub rules: Vec<serde_json::Value>,
}

impl TransitData {
    /// Parse a data set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: String,

    #[serde(alias = "nombre")]
    pub name: String,

    #[serde(alias = "latitud")]
    pub latitude: f64,

    #[serde(alias = "longitud")]
    pub longitude: f64,

    #[serde(default, alias = "lineas")]
    pub lines: Vec<String>,

    #[serde(default, alias = "servicios")]
    pub services: Vec<String>,
}

impl StationRecord {
    pub(crate) fn to_station(&self) -> Result<Station, LoadError> {
        let invalid = |reason: String| LoadError::InvalidStation {
            id: self.id.clone(),
            reason,
        };

        let id = StationId::parse(&self.id).map_err(|e| invalid(e.to_string()))?;
        let coordinates =
            Coordinates::new(self.latitude, self.longitude).map_err(|e| invalid(e.to_string()))?;
        let lines = self
            .lines
            .iter()
            .map(|l| LineId::parse(l))
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Station {
            id,
            name: self.name.clone(),
            coordinates,
            lines,
            services: self.services.iter().cloned().collect(),
        })
    }
}

/// Operating hours for one weekday, as `[hour, minute]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayScheduleRecord {
    #[serde(alias = "inicio")]
    pub start: [u32; 2],

    #[serde(alias = "fin")]
    pub end: [u32; 2],

    #[serde(default, alias = "frecuencia", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(alias = "origen")]
    pub origin: String,

    #[serde(alias = "destino")]
    pub destination: String,

    #[serde(alias = "linea")]
    pub line: String,

    /// Average travel time in minutes.
    #[serde(alias = "tiempo")]
    pub time: u32,

    /// Distance in kilometres.
    #[serde(alias = "distancia")]
    pub distance: f64,

    #[serde(default, alias = "activa", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Weekday name → operating hours.
    #[serde(default, alias = "horario", skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<String, DayScheduleRecord>>,
}

impl ConnectionRecord {
    fn label(&self) -> String {
        format!("{}-{}-{}", self.origin, self.destination, self.line)
    }

    pub(crate) fn to_connection(&self) -> Result<Connection, LoadError> {
        let invalid = |reason: String| LoadError::InvalidConnection {
            connection: self.label(),
            reason,
        };

        let origin = StationId::parse(&self.origin).map_err(|e| invalid(e.to_string()))?;
        let destination =
            StationId::parse(&self.destination).map_err(|e| invalid(e.to_string()))?;
        let line = LineId::parse(&self.line).map_err(|e| invalid(e.to_string()))?;

        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(invalid(format!(
                "distance must be a non-negative number, got {}",
                self.distance
            )));
        }

        let schedule = match &self.schedule {
            Some(days) => Some(parse_schedule(days).map_err(invalid)?),
            None => None,
        };

        Ok(Connection {
            id: ConnectionId::new(origin, destination, line),
            avg_time_mins: self.time,
            distance_km: self.distance,
            active: self.active.unwrap_or(true),
            schedule,
        })
    }
}

fn parse_schedule(days: &BTreeMap<String, DayScheduleRecord>) -> Result<Schedule, String> {
    let mut schedule = Schedule::new();
    for (name, hours) in days {
        let day = parse_weekday(name).map_err(|e| e.to_string())?;
        let start = clock_time(hours.start[0], hours.start[1]).map_err(|e| e.to_string())?;
        let end = clock_time(hours.end[0], hours.end[1]).map_err(|e| e.to_string())?;
        schedule.set(
            day,
            DaySchedule {
                window: TimeWindow::new(start, end),
                frequency_mins: hours.frequency,
            },
        );
    }
    Ok(schedule)
}

/// Lenient view of one rule entry; every field is optional so that the
/// missing ones can be reported individually.
#[derive(Debug, Deserialize)]
struct RuleRecord {
    #[serde(default, rename = "type", alias = "tipo")]
    kind: Option<String>,

    #[serde(default, alias = "estacion_id")]
    station_id: Option<String>,

    #[serde(default, alias = "linea")]
    line: Option<String>,

    #[serde(default, alias = "origen")]
    origin: Option<String>,

    #[serde(default, alias = "destino")]
    destination: Option<String>,

    #[serde(default)]
    factor: Option<f64>,

    #[serde(default, alias = "dias")]
    days: Option<Vec<String>>,

    #[serde(default, alias = "hora_inicio")]
    start_time: Option<[u32; 2]>,

    #[serde(default, alias = "hora_fin")]
    end_time: Option<[u32; 2]>,

    #[serde(default, alias = "fecha_inicio")]
    start_date: Option<NaiveDate>,

    #[serde(default, alias = "fecha_fin")]
    end_date: Option<NaiveDate>,

    #[serde(default, alias = "motivo")]
    reason: Option<String>,
}

/// Convert one raw rule entry, or explain why it must be skipped.
pub(crate) fn parse_rule(
    index: usize,
    value: &serde_json::Value,
    stations: &HashMap<StationId, Station>,
) -> Result<ScheduledRule, RuleWarning> {
    // Pick up the declared type first so even malformed entries are labelled.
    let declared = value
        .get("type")
        .or_else(|| value.get("tipo"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let record: RuleRecord = serde_json::from_value(value.clone())
        .map_err(|e| RuleWarning::new(index, declared.clone(), format!("malformed rule: {e}")))?;

    let warn = |reason: String| RuleWarning::new(index, record.kind.clone(), reason);

    let kind = record
        .kind
        .as_deref()
        .ok_or_else(|| warn("missing rule type".to_string()))?;

    let rule = match kind {
        "closure_station" | "cierre_estacion" => {
            let raw = required(&record.station_id, "station_id").map_err(warn)?;
            let station = StationId::parse(raw).map_err(|e| warn(e.to_string()))?;
            if !stations.contains_key(&station) {
                return Err(warn(format!("unknown station {station}")));
            }
            Rule::StationClosure { station }
        }
        "closure_line" | "cierre_linea" => {
            let raw = required(&record.line, "line").map_err(warn)?;
            let line = LineId::parse(raw).map_err(|e| warn(e.to_string()))?;
            Rule::LineClosure { line }
        }
        "maintenance_segment" | "mantenimiento_tramo" => {
            let origin = required(&record.origin, "origin").map_err(warn)?;
            let destination = required(&record.destination, "destination").map_err(warn)?;
            Rule::SegmentMaintenance {
                origin: StationId::parse(origin).map_err(|e| warn(e.to_string()))?,
                destination: StationId::parse(destination).map_err(|e| warn(e.to_string()))?,
            }
        }
        "congestion" | "congestión" => {
            let raw = required(&record.line, "line").map_err(warn)?;
            let line = LineId::parse(raw).map_err(|e| warn(e.to_string()))?;
            let factor = CongestionFactor::new(record.factor.unwrap_or(DEFAULT_CONGESTION_FACTOR))
                .map_err(|e| warn(e.to_string()))?;
            Rule::Congestion { line, factor }
        }
        other => return Err(warn(format!("unknown rule type '{other}'"))),
    };

    let window = parse_window(&record).map_err(warn)?;

    Ok(ScheduledRule {
        rule,
        window,
        reason: record.reason.clone(),
    })
}

fn required<'r>(field: &'r Option<String>, name: &str) -> Result<&'r str, String> {
    field
        .as_deref()
        .ok_or_else(|| format!("missing field '{name}'"))
}

fn parse_window(record: &RuleRecord) -> Result<RuleWindow, String> {
    let days = record
        .days
        .iter()
        .flatten()
        .map(|d| parse_weekday(d).map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    let hours = match (record.start_time, record.end_time) {
        (None, None) => None,
        (Some(start), Some(end)) => Some(TimeWindow::new(
            clock_time(start[0], start[1]).map_err(|e| e.to_string())?,
            clock_time(end[0], end[1]).map_err(|e| e.to_string())?,
        )),
        _ => return Err("start_time and end_time must be given together".to_string()),
    };

    Ok(RuleWindow {
        days,
        hours,
        start_date: record.start_date,
        end_date: record.end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    fn stations() -> HashMap<StationId, Station> {
        let record = StationRecord {
            id: "EST005".into(),
            name: "Five".into(),
            latitude: 4.6,
            longitude: -74.0,
            lines: vec!["L1".into()],
            services: vec![],
        };
        let station = record.to_station().unwrap();
        [(station.id.clone(), station)].into_iter().collect()
    }

    #[test]
    fn spanish_data_set() {
        let json = r#"{
            "estaciones": [
                {"id": "EST001", "nombre": "Terminal Central", "latitud": 4.6097,
                 "longitud": -74.0817, "lineas": ["L1", "L2"], "servicios": ["wifi"]}
            ],
            "conexiones": [
                {"origen": "EST001", "destino": "EST002", "linea": "L1", "tiempo": 5,
                 "distancia": 1.2, "horario": {"lunes": {"inicio": [5, 0], "fin": [23, 0]}}}
            ],
            "reglas": [{"tipo": "cierre_linea", "linea": "L2"}]
        }"#;
        let data = TransitData::from_json(json).unwrap();
        assert_eq!(data.stations.len(), 1);
        assert_eq!(data.stations[0].name, "Terminal Central");
        assert_eq!(data.connections[0].time, 5);
        assert_eq!(data.rules.len(), 1);

        let connection = data.connections[0].to_connection().unwrap();
        assert!(connection.active);
        let schedule = connection.schedule.unwrap();
        assert!(schedule.for_day(Weekday::Mon).is_some());
        assert!(schedule.for_day(Weekday::Tue).is_none());
    }

    #[test]
    fn english_data_set() {
        let json = r#"{
            "stations": [
                {"id": "A", "name": "Alpha", "latitude": 0.0, "longitude": 0.0, "lines": ["L1"]}
            ],
            "connections": [
                {"origin": "A", "destination": "B", "line": "L1", "time": 7, "distance": 1.4,
                 "active": false,
                 "schedule": {"Friday": {"start": [6, 30], "end": [22, 0], "frequency": 10}}}
            ]
        }"#;
        let data = TransitData::from_json(json).unwrap();
        assert!(data.rules.is_empty());
        assert!(data.stations[0].services.is_empty());

        let connection = data.connections[0].to_connection().unwrap();
        assert!(!connection.active);
        let friday = *connection
            .schedule
            .unwrap()
            .for_day(Weekday::Fri)
            .unwrap();
        assert_eq!(friday.frequency_mins, Some(10));
        assert_eq!(friday.window.to_string(), "06:30-22:00");
    }

    #[test]
    fn negative_time_rejected_by_parser() {
        let json = r#"{"connections": [{"origin": "A", "destination": "B", "line": "L1",
                        "time": -3, "distance": 1.0}]}"#;
        assert!(matches!(
            TransitData::from_json(json),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn negative_distance_rejected() {
        let record = ConnectionRecord {
            origin: "A".into(),
            destination: "B".into(),
            line: "L1".into(),
            time: 3,
            distance: -1.0,
            active: None,
            schedule: None,
        };
        let err = record.to_connection().unwrap_err();
        assert!(matches!(err, LoadError::InvalidConnection { .. }));
    }

    #[test]
    fn bad_weekday_rejected() {
        let mut days = BTreeMap::new();
        days.insert(
            "someday".to_string(),
            DayScheduleRecord {
                start: [5, 0],
                end: [23, 0],
                frequency: None,
            },
        );
        let record = ConnectionRecord {
            origin: "A".into(),
            destination: "B".into(),
            line: "L1".into(),
            time: 3,
            distance: 1.0,
            active: None,
            schedule: Some(days),
        };
        let err = record.to_connection().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid connection A-B-L1: invalid time: unknown weekday 'someday'"
        );
    }

    #[test]
    fn invalid_station_coordinates() {
        let record = StationRecord {
            id: "X".into(),
            name: "Nowhere".into(),
            latitude: 123.0,
            longitude: 0.0,
            lines: vec![],
            services: vec![],
        };
        assert!(matches!(
            record.to_station(),
            Err(LoadError::InvalidStation { .. })
        ));
    }

    #[test]
    fn parse_each_rule_kind() {
        let stations = stations();

        let rule = parse_rule(
            0,
            &json!({"tipo": "cierre_estacion", "estacion_id": "EST005"}),
            &stations,
        )
        .unwrap();
        assert_eq!(rule.rule.kind(), "closure_station");

        let rule = parse_rule(1, &json!({"type": "closure_line", "line": "L1"}), &stations).unwrap();
        assert_eq!(rule.rule.kind(), "closure_line");

        let rule = parse_rule(
            2,
            &json!({"type": "maintenance_segment", "origin": "A", "destination": "B"}),
            &stations,
        )
        .unwrap();
        assert_eq!(rule.rule.kind(), "maintenance_segment");

        let rule = parse_rule(
            3,
            &json!({"tipo": "congestion", "linea": "L1", "factor": 1.8}),
            &stations,
        )
        .unwrap();
        match rule.rule {
            Rule::Congestion { factor, .. } => assert_eq!(factor.value(), 1.8),
            other => panic!("unexpected rule {other:?}"),
        }
    }

    #[test]
    fn congestion_factor_defaults() {
        let rule = parse_rule(0, &json!({"type": "congestion", "line": "L1"}), &stations()).unwrap();
        match rule.rule {
            Rule::Congestion { factor, .. } => {
                assert_eq!(factor.value(), DEFAULT_CONGESTION_FACTOR)
            }
            other => panic!("unexpected rule {other:?}"),
        }
    }

    #[test]
    fn rule_window_fields() {
        let rule = parse_rule(
            0,
            &json!({
                "tipo": "congestion", "linea": "L1", "factor": 1.8,
                "hora_inicio": [7, 0], "hora_fin": [9, 0],
                "dias": ["lunes", "martes"],
                "fecha_inicio": "2023-06-01", "fecha_fin": "2023-06-15",
                "motivo": "Hora pico"
            }),
            &stations(),
        )
        .unwrap();
        assert_eq!(rule.window.days, vec![Weekday::Mon, Weekday::Tue]);
        assert_eq!(rule.window.hours.unwrap().to_string(), "07:00-09:00");
        assert_eq!(rule.window.start_date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(rule.window.end_date, NaiveDate::from_ymd_opt(2023, 6, 15));
        assert_eq!(rule.reason.as_deref(), Some("Hora pico"));
    }

    #[test]
    fn malformed_rules_become_warnings() {
        let stations = stations();

        let w = parse_rule(0, &json!({"line": "L1"}), &stations).unwrap_err();
        assert_eq!(w.reason, "missing rule type");

        let w = parse_rule(1, &json!({"type": "teleport"}), &stations).unwrap_err();
        assert_eq!(w.reason, "unknown rule type 'teleport'");
        assert_eq!(w.kind.as_deref(), Some("teleport"));

        let w = parse_rule(2, &json!({"type": "closure_line"}), &stations).unwrap_err();
        assert_eq!(w.reason, "missing field 'line'");

        let w = parse_rule(
            3,
            &json!({"type": "congestion", "line": "L1", "factor": 0.5}),
            &stations,
        )
        .unwrap_err();
        assert!(w.reason.contains("greater than 1"));

        let w = parse_rule(
            4,
            &json!({"type": "congestion", "line": "L1", "factor": "fast"}),
            &stations,
        )
        .unwrap_err();
        assert!(w.reason.starts_with("malformed rule"));
        assert_eq!(w.kind.as_deref(), Some("congestion"));

        let w = parse_rule(
            5,
            &json!({"type": "closure_station", "station_id": "NOPE"}),
            &stations,
        )
        .unwrap_err();
        assert_eq!(w.reason, "unknown station NOPE");

        let w = parse_rule(6, &json!("closure_line"), &stations).unwrap_err();
        assert!(w.reason.starts_with("malformed rule"));

        let w = parse_rule(
            7,
            &json!({"type": "closure_line", "line": "L1", "hora_inicio": [7, 0]}),
            &stations,
        )
        .unwrap_err();
        assert_eq!(w.reason, "start_time and end_time must be given together");
    }
}
