use crate::park::person::{Employee, Person, Visitor};
use crate::park::ride::Ride;
use failure::{Error, Fail};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

pub const DEFAULT_EXPORT_PATH: &str = "ride_history_export.csv";

#[derive(Debug, Fail)]
#[fail(display = "validation failed because of \"{}\"", error)]
pub struct ValidationError {
    error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideConfig {
    pub name: String,
    pub ride_type: String,
    #[serde(default)]
    pub operator: Option<Employee>,
    pub max_rider: i32, // Values below 1 are raised to 1
    #[serde(default)]
    pub queue: Vec<Visitor>,
    #[serde(default)]
    pub history: Vec<Visitor>,
    #[serde(default)]
    pub lookups: Vec<Visitor>, // Visitors looked up in the history by the history demo
}

impl RideConfig {
    pub fn build(&self) -> Ride {
        let mut ride = Ride::new(&self.name, &self.ride_type, self.operator.clone(), self.max_rider);

        for visitor in self.queue.iter() {
            ride.push_queue(visitor.clone());
        }

        for visitor in self.history.iter() {
            ride.push_history(visitor.clone());
        }

        ride
    }

    fn visitors(&self) -> impl Iterator<Item = &Visitor> {
        self.queue.iter().chain(self.history.iter()).chain(self.lookups.iter())
    }
}

/// One ride per demonstration routine plus the file shared by export and import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    pub queue_demo: RideConfig,
    pub history_demo: RideConfig,
    pub sorting_demo: RideConfig,
    pub cycle_demo: RideConfig,
    pub export_demo: RideConfig,
    pub import_demo: RideConfig,
    pub export_path: String,
}

impl ParkConfig {
    pub fn rides(&self) -> Vec<&RideConfig> {
        vec![
            &self.queue_demo,
            &self.history_demo,
            &self.sorting_demo,
            &self.cycle_demo,
            &self.export_demo,
            &self.import_demo,
        ]
    }
}

impl Default for ParkConfig {
    fn default() -> ParkConfig {
        ParkConfig {
            queue_demo: RideConfig {
                name: "Roller Coaster".to_string(),
                ride_type: "Thrill".to_string(),
                operator: Some(Employee::new("Zhang San", 30, "13800138001", "EMP001", "Coaster operator")),
                max_rider: 2,
                queue: vec![
                    Visitor::new("Jack", 25, "13900139001", "VIS001", true),
                    Visitor::new("Sharon", 22, "13900139002", "VIS002", false),
                    Visitor::new("Benny", 30, "13900139003", "VIS003", true),
                    Visitor::new("Leo", 28, "13900139004", "VIS004", false),
                    Visitor::new("Lily", 24, "13900139005", "VIS005", true),
                ],
                history: Vec::new(),
                lookups: Vec::new(),
            },
            history_demo: RideConfig {
                name: "Thunderstorm".to_string(),
                ride_type: "Water".to_string(),
                operator: Some(Employee::new("Wang Wu", 28, "13800138002", "EMP003", "Water ride operator")),
                max_rider: 4,
                queue: Vec::new(),
                history: vec![
                    Visitor::new("Tom", 27, "13700137001", "VIS006", true),
                    Visitor::new("Sherly", 23, "13700137002", "VIS007", false),
                    Visitor::new("Ben", 32, "13700137003", "VIS008", true),
                    Visitor::new("David", 29, "13700137004", "VIS009", false),
                    Visitor::new("Amy", 26, "13700137005", "VIS010", true),
                ],
                lookups: vec![
                    Visitor::new("Sherly", 23, "13700137002", "VIS007", false),
                    Visitor::new("Mike", 20, "13700137006", "VIS011", false),
                ],
            },
            sorting_demo: RideConfig {
                name: "Ferris Wheel".to_string(),
                ride_type: "Sightseeing".to_string(),
                operator: Some(Employee::new("Zhao Liu", 35, "13800138003", "EMP004", "Sightseeing ride operator")),
                max_rider: 8,
                queue: Vec::new(),
                history: vec![
                    Visitor::new("Bob", 35, "13600136001", "VIS012", false),
                    Visitor::new("Alice", 22, "13600136002", "VIS013", true),
                    Visitor::new("Charlie", 28, "13600136003", "VIS014", false),
                    Visitor::new("Anna", 22, "13600136004", "VIS015", true),
                    Visitor::new("David", 30, "13600136005", "VIS016", false),
                ],
                lookups: Vec::new(),
            },
            cycle_demo: RideConfig {
                name: "Carousel".to_string(),
                ride_type: "Family".to_string(),
                operator: Some(Employee::new("Li Si", 35, "13500135001", "EMP002", "Carousel operator")),
                max_rider: 3,
                queue: (0..10)
                    .map(|i| {
                        Visitor::new(
                            &format!("Guest {}", i + 1),
                            10 + i,
                            &format!("1340013400{}", i + 1),
                            &format!("VIS0{}", 17 + i),
                            i % 2 == 0,
                        )
                    })
                    .collect(),
                history: Vec::new(),
                lookups: Vec::new(),
            },
            export_demo: RideConfig {
                name: "Log Flume".to_string(),
                ride_type: "Water".to_string(),
                operator: Some(Employee::new("Sun Qi", 32, "13800138004", "EMP005", "Water ride operator")),
                max_rider: 6,
                queue: Vec::new(),
                history: vec![
                    Visitor::new("Emma", 24, "13300133001", "VIS027", true),
                    Visitor::new("Olivia", 26, "13300133002", "VIS028", false),
                    Visitor::new("Noah", 29, "13300133003", "VIS029", true),
                    Visitor::new("Liam", 27, "13300133004", "VIS030", false),
                    Visitor::new("Sophia", 23, "13300133005", "VIS031", true),
                ],
                lookups: Vec::new(),
            },
            import_demo: RideConfig {
                name: "Import Test Ride".to_string(),
                ride_type: "Test".to_string(),
                operator: Some(Employee::new("Zhou Ba", 29, "13800138005", "EMP006", "Test ride operator")),
                max_rider: 5,
                queue: Vec::new(),
                history: Vec::new(),
                lookups: Vec::new(),
            },
            export_path: DEFAULT_EXPORT_PATH.to_string(),
        }
    }
}

pub fn validate_config(config: &ParkConfig) -> Result<(), Error> {
    let mut names = HashSet::new();

    for ride in config.rides() {
        if ride.name.trim().is_empty() {
            return Err(ValidationError {
                error: "There is a ride without a name".to_string(),
            }
            .into());
        }

        if !names.insert(ride.name.as_str()) {
            return Err(ValidationError {
                error: format!("There is ride name \"{}\" collision", ride.name),
            }
            .into());
        }

        if ride.max_rider < 1 {
            warn!(
                "ride \"{}\" asks for {} riders per cycle, using 1",
                ride.name, ride.max_rider
            );
        }

        for visitor in ride.visitors() {
            let has_comma = visitor.name().contains(',')
                || visitor.phone_number().contains(',')
                || visitor.visitor_id().contains(',');

            if has_comma {
                return Err(ValidationError {
                    error: format!(
                        "Visitor \"{}\" of ride \"{}\" contains a comma and cannot be stored in the history file",
                        visitor.visitor_id(),
                        ride.name
                    ),
                }
                .into());
            }
        }
    }

    if config.export_path.trim().is_empty() {
        return Err(ValidationError {
            error: "The export path is blank".to_string(),
        }
        .into());
    }

    Ok(())
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ParkConfig, Error> {
    let file = File::open(path.as_ref())?;

    let config = serde_json::from_reader(file)?;

    Ok(config)
}
