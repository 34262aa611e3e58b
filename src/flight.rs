use crate::airport::AirportId;
use crate::runway::RunwayId;
use crate::scheduler::SchedulingKey;
use crate::time::Time;
use std::fmt;
use std::sync::Arc;
use tabled::Tabled;

pub type FlightNumber = Arc<str>;

/// Index of a flight in the tower's history. Flight numbers may repeat, keys never do.
pub type FlightKey = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightStatus {
    Waiting,
    Scheduled,
    RunwayAssigned,
    Cancelled,
    Departed,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightStatus::Waiting => "Waiting",
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::RunwayAssigned => "Runway Assigned",
            FlightStatus::Cancelled => "Cancelled",
            FlightStatus::Departed => "Departed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub number: FlightNumber,
    pub destination: AirportId,
    pub departure_time: Time,
    pub is_emergency: bool,
    pub status: FlightStatus,
    /// Display-only back-reference; the runway pool owns occupancy.
    pub assigned_runway: Option<RunwayId>,
}

impl Flight {
    pub const EMERGENCY_PRIORITY: u8 = 1;
    pub const NORMAL_PRIORITY: u8 = 2;

    pub fn new(number: FlightNumber, destination: AirportId, departure_time: Time, is_emergency: bool) -> Self {
        Flight {
            number,
            destination,
            departure_time,
            is_emergency,
            status: FlightStatus::Waiting,
            assigned_runway: None,
        }
    }

    /// Lower is more urgent.
    pub fn priority(&self) -> u8 {
        if self.is_emergency {
            Self::EMERGENCY_PRIORITY
        } else {
            Self::NORMAL_PRIORITY
        }
    }

    pub fn scheduling_key(&self) -> SchedulingKey {
        SchedulingKey {
            priority: self.priority(),
            departure_time: self.departure_time,
        }
    }

    pub fn row(&self) -> FlightRow {
        FlightRow {
            number: self.number.to_string(),
            destination: self.destination.to_string(),
            departure: self.departure_time.0.format("%d %b %H:%M").to_string(),
            kind: if self.is_emergency { "EMERGENCY" } else { "Normal" }.to_string(),
            status: self.status.to_string(),
            runway: self
                .assigned_runway
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_emergency { "EMERGENCY" } else { "Normal" };
        write!(
            f,
            "{} -> {} ({}) - {}",
            self.number,
            self.destination,
            kind,
            self.departure_time.0.format("%H:%M")
        )
    }
}

/// Table row for flight listings.
#[derive(Tabled)]
pub struct FlightRow {
    #[tabled(rename = "Flight")]
    pub number: String,
    #[tabled(rename = "Destination")]
    pub destination: String,
    #[tabled(rename = "Departure")]
    pub departure: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Runway")]
    pub runway: String,
}
