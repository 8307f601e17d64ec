use crate::config::{ParkConfig, RideConfig};
use crate::park::{AgeThenName, Member, Person, Ride, RideError};
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    Queue,
    History,
    Sorting,
    Cycle,
    Export,
    Import,
    All,
}

impl Routine {
    pub const ALL: [Routine; 7] = [
        Routine::Queue,
        Routine::History,
        Routine::Sorting,
        Routine::Cycle,
        Routine::Export,
        Routine::Import,
        Routine::All,
    ];

    /// Menu numbers start at 1, 0 is left for leaving the menu
    pub fn from_choice(choice: u32) -> Option<Routine> {
        match choice {
            1..=7 => Some(Routine::ALL[(choice - 1) as usize]),
            _ => None,
        }
    }

    pub fn choice(self) -> u32 {
        Routine::ALL.iter().position(|routine| *routine == self).unwrap_or(0) as u32 + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Routine::Queue => "Waiting queue management",
            Routine::History => "Ride history management",
            Routine::Sorting => "Sorting the ride history",
            Routine::Cycle => "Running one ride cycle",
            Routine::Export => "Exporting the ride history to a file",
            Routine::Import => "Importing the ride history from a file",
            Routine::All => "All of the above",
        }
    }
}

pub fn menu() -> String {
    let mut menu = format!("\n{}\n", "===== Theme Park Ride Visitor Management =====".bold());

    for routine in Routine::ALL.iter() {
        menu.push_str(&format!("{}. {}\n", routine.choice(), routine.title()));
    }

    menu.push_str("0. Exit\n");
    menu.push_str("Choose an option (0-7): ");

    menu
}

fn section(title: &str) {
    println!("\n--- {} ---", title.cyan());
}

fn print_success(message: String) {
    println!("{}", message.green());
}

fn print_failure(error: &RideError) {
    println!("{} {}", "Error:".red().bold(), error.to_string().red());
}

/// Prints the status message of one ride operation and hands back its value
fn report<T, F>(result: Result<T, RideError>, describe: F) -> Option<T>
where
    F: FnOnce(&T) -> String,
{
    match result {
        Ok(value) => {
            print_success(describe(&value));
            Some(value)
        }
        Err(error) => {
            print_failure(&error);
            None
        }
    }
}

pub struct Demo {
    config: ParkConfig,
}

impl Demo {
    pub fn new(config: ParkConfig) -> Demo {
        Demo { config }
    }

    pub fn run(&self, routine: Routine) {
        println!("\n{}", format!("===== {} =====", routine.title()).bold());

        match routine {
            Routine::Queue => self.queue(),
            Routine::History => self.history(),
            Routine::Sorting => self.sorting(),
            Routine::Cycle => self.cycle(),
            Routine::Export => self.export(),
            Routine::Import => self.import(),
            Routine::All => {
                for routine in Routine::ALL.iter().filter(|routine| **routine != Routine::All) {
                    self.run(*routine);
                }
            }
        }
    }

    fn empty_ride(config: &RideConfig) -> Ride {
        Ride::new(&config.name, &config.ride_type, config.operator.clone(), config.max_rider)
    }

    fn queue(&self) {
        let config = &self.config.queue_demo;
        let mut ride = Demo::empty_ride(config);

        section(&format!("Adding {} visitors to the queue", config.queue.len()));
        for visitor in config.queue.iter() {
            let name = visitor.name().to_string();
            report(ride.add_to_queue(visitor.clone()), |_| {
                format!("{} joined the queue of \"{}\"", name, config.name)
            });
        }

        section("Current queue");
        print!("{}", ride.list_queue());

        section("Removing one visitor");
        report(ride.remove_from_queue(), |visitor| {
            format!("{} left the queue of \"{}\"", visitor.name(), config.name)
        });

        section("Queue after the removal");
        print!("{}", ride.list_queue());
    }

    fn history(&self) {
        let config = &self.config.history_demo;
        let mut ride = Demo::empty_ride(config);

        section(&format!("Adding {} visitors to the history", config.history.len()));
        for visitor in config.history.iter() {
            let name = visitor.name().to_string();
            report(ride.add_to_history(visitor.clone()), |_| {
                format!("{} added to the history of \"{}\"", name, config.name)
            });
        }

        section("Checking visitors against the history");
        for visitor in config.lookups.iter() {
            report(ride.has_ridden_before(visitor), |ridden| {
                if *ridden {
                    format!("{} has ridden \"{}\" before", visitor.name(), config.name)
                } else {
                    format!("{} has not ridden \"{}\" yet", visitor.name(), config.name)
                }
            });
        }

        section("Number of visitors in the history");
        println!("\"{}\" has been ridden by {} visitors", ride.name(), ride.history_count());

        section("History details");
        print!("{}", ride.list_history());
    }

    fn sorting(&self) {
        let ride_config = &self.config.sorting_demo;
        let mut ride = ride_config.build();

        section("History before sorting");
        print!("{}", ride.list_history());

        section("Sorting by age, then by name");
        report(ride.sort_history(Some(&AgeThenName)), |_| {
            format!("history of \"{}\" sorted", ride_config.name)
        });

        section("History after sorting");
        print!("{}", ride.list_history());
    }

    fn cycle(&self) {
        let ride_config = &self.config.cycle_demo;
        let mut ride = ride_config.build();

        if let Some(operator) = ride.operator() {
            section("Staff on duty");
            println!("{}", Member::from(operator.clone()));
        }

        section("Queue before the cycle");
        print!("{}", ride.list_queue());

        section(&format!("Running one cycle (at most {} riders)", ride.max_rider()));
        report(ride.run_one_cycle(), |report| {
            format!(
                "cycle {} of \"{}\" finished with {} riders",
                report.cycle,
                ride_config.name,
                report.riders
            )
        });

        section("Queue after the cycle");
        print!("{}", ride.list_queue());

        section("History after the cycle");
        print!("{}", ride.list_history());
    }

    fn export(&self) {
        let ride_config = &self.config.export_demo;
        let ride = ride_config.build();
        let path = &self.config.export_path;

        section("Current history");
        print!("{}", ride.list_history());

        section("Exporting the history");
        report(ride.export_history(path), |written| {
            format!("exported {} visitors of \"{}\" to {}", written, ride_config.name, path)
        });
    }

    fn import(&self) {
        let ride_config = &self.config.import_demo;
        let mut ride = ride_config.build();
        let path = &self.config.export_path;

        section("History before the import");
        print!("{}", ride.list_history());

        section("Importing the history");
        report(ride.import_history(path), |summary| {
            format!(
                "imported {} visitors from {} into \"{}\" ({} lines skipped)",
                summary.imported,
                path,
                ride_config.name,
                summary.skipped
            )
        });

        section("History after the import");
        println!("\"{}\" has been ridden by {} visitors", ride.name(), ride.history_count());
        print!("{}", ride.list_history());
    }
}
