use crate::park::ordering::VisitorComparator;
use crate::park::person::{Employee, Person, Visitor};
use failure::Fail;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::cmp::{max, min};
use std::collections::vec_deque::{self, VecDeque};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::slice;

#[derive(Debug, Fail)]
pub enum RideError {
    #[fail(display = "visitor must not be empty")]
    NullInput,
    #[fail(display = "waiting queue of \"{}\" is empty", ride)]
    EmptyQueue { ride: String },
    #[fail(display = "ride history of \"{}\" is empty", ride)]
    EmptyHistory { ride: String },
    #[fail(display = "no comparator given, history left as it is")]
    NullComparator,
    #[fail(display = "\"{}\" has no operator assigned and cannot run", ride)]
    NoOperator { ride: String },
    #[fail(display = "file path must not be blank")]
    InvalidPath,
    #[fail(display = "file \"{}\" does not exist", path)]
    FileNotFound { path: String },
    #[fail(display = "reading or writing \"{}\" failed: {}", path, cause)]
    Io {
        path: String,
        #[fail(cause)]
        cause: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Ready,
}

/// Outcome of one `Ride::run_one_cycle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Number of the cycle which just ended, starting from 1
    pub cycle: u32,
    pub riders: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// 1. `Ride` when
///     * `Unconfigured` (no operator)
///         * `run_one_cycle` fails with `NoOperator`, nothing moves
///     * `Ready` (operator assigned)
///         * `run_one_cycle` with an empty queue fails with `EmptyQueue`
///         * otherwise moves `min(max_rider, queue_size)` visitors from the head of the
///           queue to the tail of the history and bumps `num_of_cycles`
///     * There is no terminal state, the operator can be replaced or removed at any time
///
/// A ride has no internal locking, callers sharing one between threads have to
/// synchronize access themselves.
#[derive(Debug)]
pub struct Ride {
    name: String,
    ride_type: String,
    operator: Option<Employee>,
    max_rider: usize,
    waiting_queue: VecDeque<Visitor>,
    ride_history: Vec<Visitor>,
    num_of_cycles: u32,
}

impl Default for Ride {
    fn default() -> Ride {
        Ride::new("", "", None, 1)
    }
}

impl Ride {
    pub fn new<E: Into<Option<Employee>>>(name: &str, ride_type: &str, operator: E, max_rider: i32) -> Ride {
        Ride {
            name: name.to_string(),
            ride_type: ride_type.to_string(),
            operator: operator.into(),
            max_rider: clamp_riders(max_rider),
            waiting_queue: VecDeque::new(),
            ride_history: Vec::new(),
            num_of_cycles: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn ride_type(&self) -> &str {
        &self.ride_type
    }

    pub fn set_ride_type(&mut self, ride_type: &str) {
        self.ride_type = ride_type.to_string();
    }

    pub fn operator(&self) -> Option<&Employee> {
        self.operator.as_ref()
    }

    pub fn set_operator<E: Into<Option<Employee>>>(&mut self, operator: E) {
        self.operator = operator.into();
    }

    pub fn max_rider(&self) -> usize {
        self.max_rider
    }

    /// Anything below one rider per cycle is raised to one
    pub fn set_max_rider(&mut self, max_rider: i32) {
        self.max_rider = clamp_riders(max_rider);
    }

    pub fn num_of_cycles(&self) -> u32 {
        self.num_of_cycles
    }

    pub fn state(&self) -> State {
        match self.operator {
            Some(_) => State::Ready,
            None => State::Unconfigured,
        }
    }

    pub fn queue(&self) -> vec_deque::Iter<'_, Visitor> {
        self.waiting_queue.iter()
    }

    pub fn history(&self) -> slice::Iter<'_, Visitor> {
        self.ride_history.iter()
    }

    pub fn queue_size(&self) -> usize {
        self.waiting_queue.len()
    }

    pub fn history_size(&self) -> usize {
        self.ride_history.len()
    }

    pub fn add_to_queue<V: Into<Option<Visitor>>>(&mut self, visitor: V) -> Result<(), RideError> {
        let visitor = visitor.into().ok_or(RideError::NullInput)?;
        self.push_queue(visitor);

        Ok(())
    }

    pub fn push_queue(&mut self, visitor: Visitor) {
        info!("{} joined the queue of \"{}\"", visitor.name(), self.name);
        self.waiting_queue.push_back(visitor);
    }

    pub fn remove_from_queue(&mut self) -> Result<Visitor, RideError> {
        let visitor = self.waiting_queue.pop_front().ok_or_else(|| RideError::EmptyQueue {
            ride: self.name.clone(),
        })?;

        info!("{} left the queue of \"{}\"", visitor.name(), self.name);

        Ok(visitor)
    }

    pub fn list_queue(&self) -> Listing<'_, vec_deque::Iter<'_, Visitor>> {
        Listing {
            title: "Waiting queue",
            empty: "No visitors waiting",
            ride: &self.name,
            visitors: self.waiting_queue.iter(),
        }
    }

    pub fn add_to_history<V: Into<Option<Visitor>>>(&mut self, visitor: V) -> Result<(), RideError> {
        let visitor = visitor.into().ok_or(RideError::NullInput)?;
        self.push_history(visitor);

        Ok(())
    }

    pub fn push_history(&mut self, visitor: Visitor) {
        info!("{} added to the history of \"{}\"", visitor.name(), self.name);
        self.ride_history.push(visitor);
    }

    pub fn has_ridden_before<'v, V: Into<Option<&'v Visitor>>>(&self, visitor: V) -> Result<bool, RideError> {
        let visitor = visitor.into().ok_or(RideError::NullInput)?;

        Ok(self.ride_history.iter().any(|ridden| ridden == visitor))
    }

    pub fn history_count(&self) -> usize {
        self.ride_history.len()
    }

    pub fn list_history(&self) -> Listing<'_, slice::Iter<'_, Visitor>> {
        Listing {
            title: "Ride history",
            empty: "No visitors have ridden yet",
            ride: &self.name,
            visitors: self.ride_history.iter(),
        }
    }

    /// Stable sort, visitors the rule considers equal keep their order
    pub fn sort_history(&mut self, rule: Option<&dyn VisitorComparator>) -> Result<(), RideError> {
        let rule = rule.ok_or(RideError::NullComparator)?;

        if self.ride_history.is_empty() {
            return Err(RideError::EmptyHistory { ride: self.name.clone() });
        }

        self.ride_history.sort_by(|a, b| rule.compare(a, b));
        info!("history of \"{}\" sorted", self.name);

        Ok(())
    }

    pub fn run_one_cycle(&mut self) -> Result<CycleReport, RideError> {
        let operator = match &self.operator {
            Some(operator) => operator,
            None => return Err(RideError::NoOperator { ride: self.name.clone() }),
        };

        if self.waiting_queue.is_empty() {
            return Err(RideError::EmptyQueue { ride: self.name.clone() });
        }

        info!(
            "\"{}\" starting cycle {} (capacity {}), operated by {} ({})",
            self.name,
            self.num_of_cycles + 1,
            self.max_rider,
            operator.name(),
            operator.position()
        );

        let riders_to_move = min(self.max_rider, self.waiting_queue.len());
        let name = &self.name;

        self.ride_history.extend(
            self.waiting_queue
                .drain(..riders_to_move)
                .inspect(|visitor| debug!("{} boarded \"{}\"", visitor.name(), name)),
        );

        self.num_of_cycles += 1;
        info!(
            "\"{}\" finished cycle {} with {} riders",
            self.name, self.num_of_cycles, riders_to_move
        );

        Ok(CycleReport {
            cycle: self.num_of_cycles,
            riders: riders_to_move,
        })
    }

    /// Writes the history, one record per line, replacing whatever is at `path`
    pub fn export_history<P: AsRef<Path>>(&self, path: P) -> Result<usize, RideError> {
        let path = path.as_ref();
        check_path(path)?;

        if self.ride_history.is_empty() {
            return Err(RideError::EmptyHistory { ride: self.name.clone() });
        }

        let file = File::create(path).map_err(|cause| io_error(path, cause))?;
        let mut writer = BufWriter::new(file);

        for visitor in self.ride_history.iter() {
            writeln!(writer, "{}", visitor.to_record()).map_err(|cause| io_error(path, cause))?;
        }

        writer.flush().map_err(|cause| io_error(path, cause))?;

        info!(
            "exported {} visitors of \"{}\" to {}",
            self.ride_history.len(),
            self.name,
            path.display()
        );

        Ok(self.ride_history.len())
    }

    /// Appends every well formed record of the file to the history.
    ///
    /// Malformed lines are logged and skipped, bytes which are not UTF-8 are
    /// replaced. When reading fails half way the records read so far stay in
    /// the history.
    pub fn import_history<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportSummary, RideError> {
        let path = path.as_ref();
        check_path(path)?;

        if !path.exists() {
            return Err(RideError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path).map_err(|cause| io_error(path, cause))?;
        let mut reader = BufReader::new(file);
        let mut buffer = Vec::new();
        let mut summary = ImportSummary::default();

        loop {
            buffer.clear();

            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|cause| io_error(path, cause))?;

            if read == 0 {
                break;
            }

            let decoded = String::from_utf8_lossy(&buffer);

            if let Cow::Owned(_) = decoded {
                warn!("history line with invalid UTF-8 in {}, bytes replaced", path.display());
            }

            let line = decoded.trim();

            if line.is_empty() {
                continue;
            }

            match Visitor::from_record(line) {
                Ok(visitor) => {
                    self.ride_history.push(visitor);
                    summary.imported += 1;
                }
                Err(error) => {
                    warn!("skipping history line: {}", error);
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "imported {} visitors from {} into \"{}\"",
            summary.imported,
            path.display(),
            self.name
        );

        Ok(summary)
    }
}

fn clamp_riders(max_rider: i32) -> usize {
    max(1, max_rider) as usize
}

fn check_path(path: &Path) -> Result<(), RideError> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(RideError::InvalidPath);
    }

    Ok(())
}

fn io_error(path: &Path, cause: io::Error) -> RideError {
    RideError::Io {
        path: path.display().to_string(),
        cause,
    }
}

/// Numbered view over the queue or the history, front to back
pub struct Listing<'a, I> {
    title: &'static str,
    empty: &'static str,
    ride: &'a str,
    visitors: I,
}

impl<'a, I> Listing<'a, I>
where
    I: Iterator<Item = &'a Visitor> + Clone,
{
    pub fn len(&self) -> usize {
        self.visitors.clone().count()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.clone().next().is_none()
    }
}

impl<'a, I> fmt::Display for Listing<'a, I>
where
    I: Iterator<Item = &'a Visitor> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} of \"{}\" ({} visitors):", self.title, self.ride, self.len())?;

        if self.is_empty() {
            return writeln!(f, "{}", self.empty);
        }

        for (index, visitor) in self.visitors.clone().enumerate() {
            writeln!(f, "{}. {}", index + 1, visitor)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::park::ordering::AgeThenName;

    fn operator() -> Employee {
        Employee::new("Zhang", 30, "13800138001", "EMP001", "Coaster operator")
    }

    fn visitor(name: &str, age: u32, id: &str) -> Visitor {
        Visitor::new(name, age, "139", id, false)
    }

    #[test]
    fn max_rider_is_at_least_one() {
        let mut ride = Ride::new("Coaster", "Thrill", operator(), 0);
        assert_eq!(ride.max_rider(), 1);

        ride.set_max_rider(-4);
        assert_eq!(ride.max_rider(), 1);

        ride.set_max_rider(6);
        assert_eq!(ride.max_rider(), 6);

        assert_eq!(Ride::default().max_rider(), 1);
    }

    #[test]
    fn plain_visitors_are_pushed_without_checks() {
        let mut ride = Ride::new("Coaster", "Thrill", operator(), 2);

        ride.push_queue(visitor("Jack", 25, "VIS001"));
        ride.push_history(visitor("Tom", 27, "VIS006"));

        assert_eq!(ride.queue().next().unwrap().name(), "Jack");
        assert!(ride.has_ridden_before(&visitor("Tom", 27, "VIS006")).unwrap());
    }

    #[test]
    fn absent_visitor_is_rejected() {
        let mut ride = Ride::new("Coaster", "Thrill", operator(), 2);

        match ride.add_to_queue(None) {
            Err(RideError::NullInput) => {}
            other => panic!("unexpected {:?}", other),
        }
        match ride.add_to_history(None) {
            Err(RideError::NullInput) => {}
            other => panic!("unexpected {:?}", other),
        }
        match ride.has_ridden_before(None) {
            Err(RideError::NullInput) => {}
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(ride.queue_size(), 0);
        assert_eq!(ride.history_size(), 0);
    }

    #[test]
    fn empty_queue_cannot_shrink() {
        let mut ride = Ride::new("Coaster", "Thrill", operator(), 2);

        match ride.remove_from_queue() {
            Err(RideError::EmptyQueue { ride }) => assert_eq!(ride, "Coaster"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn listing_is_numbered_from_one() {
        let mut ride = Ride::new("Coaster", "Thrill", operator(), 2);
        assert!(ride.list_queue().is_empty());
        assert!(ride.list_queue().to_string().contains("No visitors waiting"));

        ride.add_to_queue(visitor("Jack", 25, "VIS001")).unwrap();
        ride.add_to_queue(visitor("Sharon", 22, "VIS002")).unwrap();

        let rendered = ride.list_queue().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Waiting queue of \"Coaster\" (2 visitors):");
        assert!(lines[1].starts_with("1. Name: Jack"));
        assert!(lines[2].starts_with("2. Name: Sharon"));
        assert_eq!(ride.list_queue().len(), 2);
    }

    #[test]
    fn history_listing_keeps_stored_order() {
        let mut ride = Ride::new("Ferris Wheel", "Sightseeing", operator(), 8);
        assert!(ride.list_history().to_string().contains("No visitors have ridden yet"));

        ride.add_to_history(visitor("Bob", 35, "VIS012")).unwrap();
        ride.add_to_history(visitor("Alice", 22, "VIS013")).unwrap();

        let rendered = ride.list_history().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[1].starts_with("1. Name: Bob"));
        assert!(lines[2].starts_with("2. Name: Alice"));
    }

    #[test]
    fn sorting_needs_rule_and_history() {
        let mut ride = Ride::new("Ferris Wheel", "Sightseeing", operator(), 8);

        match ride.sort_history(Some(&AgeThenName)) {
            Err(RideError::EmptyHistory { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }

        ride.add_to_history(visitor("Bob", 35, "VIS012")).unwrap();
        ride.add_to_history(visitor("Alice", 22, "VIS013")).unwrap();

        match ride.sort_history(None) {
            Err(RideError::NullComparator) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(ride.history().next().unwrap().name(), "Bob");

        ride.sort_history(Some(&AgeThenName)).unwrap();
        assert_eq!(ride.history().next().unwrap().name(), "Alice");
    }

    #[test]
    fn cycle_without_operator_changes_nothing() {
        let mut ride = Ride::new("Carousel", "Family", None, 3);
        assert_eq!(ride.state(), State::Unconfigured);
        ride.add_to_queue(visitor("Jack", 25, "VIS001")).unwrap();

        match ride.run_one_cycle() {
            Err(RideError::NoOperator { ride }) => assert_eq!(ride, "Carousel"),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(ride.queue_size(), 1);
        assert_eq!(ride.history_size(), 0);
        assert_eq!(ride.num_of_cycles(), 0);

        ride.set_operator(operator());
        assert_eq!(ride.state(), State::Ready);
        assert_eq!(ride.run_one_cycle().unwrap(), CycleReport { cycle: 1, riders: 1 });
    }

    #[test]
    fn cycle_with_empty_queue_fails() {
        let mut ride = Ride::new("Carousel", "Family", operator(), 3);

        match ride.run_one_cycle() {
            Err(RideError::EmptyQueue { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(ride.num_of_cycles(), 0);
    }

    #[test]
    fn short_queue_still_counts_a_cycle() {
        let mut ride = Ride::new("Carousel", "Family", operator(), 5);
        ride.add_to_queue(visitor("Jack", 25, "VIS001")).unwrap();
        ride.add_to_queue(visitor("Sharon", 22, "VIS002")).unwrap();

        let report = ride.run_one_cycle().unwrap();

        assert_eq!(report, CycleReport { cycle: 1, riders: 2 });
        assert_eq!(ride.queue_size(), 0);
        assert_eq!(ride.history_count(), 2);
    }

    #[test]
    fn blank_paths_are_rejected() {
        let mut ride = Ride::new("Log Flume", "Water", operator(), 6);
        ride.add_to_history(visitor("Emma", 24, "VIS027")).unwrap();

        match ride.export_history("   ") {
            Err(RideError::InvalidPath) => {}
            other => panic!("unexpected {:?}", other),
        }
        match ride.import_history("") {
            Err(RideError::InvalidPath) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(ride.history_size(), 1);
    }

    #[test]
    fn empty_history_is_not_exported() {
        let ride = Ride::new("Log Flume", "Water", operator(), 6);

        match ride.export_history("unused.csv") {
            Err(RideError::EmptyHistory { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(!Path::new("unused.csv").exists());
    }

    #[test]
    fn missing_file_is_reported() {
        let mut ride = Ride::new("Import", "Test", operator(), 5);

        match ride.import_history("definitely/not/here.csv") {
            Err(RideError::FileNotFound { path }) => assert_eq!(path, "definitely/not/here.csv"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let mut ride = Ride::new("Log Flume", "Water", operator(), 6);
        ride.add_to_history(visitor("Emma", 24, "VIS027")).unwrap();

        match ride.export_history("definitely/not/here/history.csv") {
            Err(RideError::Io { path, .. }) => assert_eq!(path, "definitely/not/here/history.csv"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
