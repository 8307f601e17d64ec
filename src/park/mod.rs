pub mod ordering;
pub mod person;
pub mod ride;

pub use ordering::{AgeThenName, VisitorComparator};
pub use person::{Employee, Member, Person, Profile, RecordError, Visitor};
pub use ride::{CycleReport, ImportSummary, Listing, Ride, RideError, State};
