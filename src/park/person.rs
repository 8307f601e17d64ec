use failure::Fail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::ParseIntError;

/// Number of comma separated fields in one visitor record
pub const RECORD_FIELDS: usize = 5;

/// Shared shape of everybody moving around the park
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub phone_number: String,
}

impl Profile {
    pub fn new(name: &str, age: u32, phone_number: &str) -> Profile {
        Profile {
            name: name.to_string(),
            age,
            phone_number: phone_number.to_string(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}, Age: {}, Phone: {}", self.name, self.age, self.phone_number)
    }
}

/// Accessors every person variant gets on top of its `Profile`
pub trait Person {
    fn profile(&self) -> &Profile;
    fn profile_mut(&mut self) -> &mut Profile;

    fn name(&self) -> &str {
        &self.profile().name
    }

    fn set_name(&mut self, name: &str) {
        self.profile_mut().name = name.to_string();
    }

    fn age(&self) -> u32 {
        self.profile().age
    }

    fn set_age(&mut self, age: u32) {
        self.profile_mut().age = age;
    }

    fn phone_number(&self) -> &str {
        &self.profile().phone_number
    }

    fn set_phone_number(&mut self, phone_number: &str) {
        self.profile_mut().phone_number = phone_number.to_string();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    profile: Profile,
    employee_id: String,
    position: String,
}

impl Employee {
    pub fn new(name: &str, age: u32, phone_number: &str, employee_id: &str, position: &str) -> Employee {
        Employee {
            profile: Profile::new(name, age, phone_number),
            employee_id: employee_id.to_string(),
            position: position.to_string(),
        }
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn set_employee_id(&mut self, employee_id: &str) {
        self.employee_id = employee_id.to_string();
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn set_position(&mut self, position: &str) {
        self.position = position.to_string();
    }
}

impl Person for Employee {
    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Employee ID: {}, Position: {}", self.profile, self.employee_id, self.position)
    }
}

#[derive(Debug, Fail)]
pub enum RecordError {
    #[fail(display = "expected {} fields but found {} in \"{}\"", expected, found, line)]
    FieldCount {
        expected: usize,
        found: usize,
        line: String,
    },
    #[fail(display = "invalid age \"{}\" in \"{}\"", value, line)]
    Age {
        value: String,
        line: String,
        #[fail(cause)]
        cause: ParseIntError,
    },
}

/// A guest of the park.
///
/// Two visitors are the same guest when their `visitor_id` matches, whatever the
/// rest of their fields say. Equality and hashing only look at the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Visitor {
    #[serde(flatten)]
    profile: Profile,
    visitor_id: String,
    #[serde(default)]
    has_fast_pass: bool,
}

impl Visitor {
    pub fn new(name: &str, age: u32, phone_number: &str, visitor_id: &str, has_fast_pass: bool) -> Visitor {
        Visitor {
            profile: Profile::new(name, age, phone_number),
            visitor_id: visitor_id.to_string(),
            has_fast_pass,
        }
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    pub fn set_visitor_id(&mut self, visitor_id: &str) {
        self.visitor_id = visitor_id.to_string();
    }

    pub fn has_fast_pass(&self) -> bool {
        self.has_fast_pass
    }

    pub fn set_has_fast_pass(&mut self, has_fast_pass: bool) {
        self.has_fast_pass = has_fast_pass;
    }

    /// Single history file line: `name,age,phone,id,fast_pass`.
    ///
    /// Commas inside the free text fields are written as they are, such a record
    /// will not read back.
    pub fn to_record(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.profile.name, self.profile.age, self.profile.phone_number, self.visitor_id, self.has_fast_pass
        )
    }

    pub fn from_record(line: &str) -> Result<Visitor, RecordError> {
        let mut parts: Vec<&str> = line.split(',').collect();

        // Trailing empty fields do not count, `a,1,p,id,` has four
        while parts.len() > 1 && parts.last() == Some(&"") {
            parts.pop();
        }

        if parts.len() != RECORD_FIELDS {
            return Err(RecordError::FieldCount {
                expected: RECORD_FIELDS,
                found: parts.len(),
                line: line.to_string(),
            });
        }

        let age = parts[1].parse::<u32>().map_err(|cause| RecordError::Age {
            value: parts[1].to_string(),
            line: line.to_string(),
            cause,
        })?;

        // Anything but `true` in any case reads as no fast pass
        let has_fast_pass = parts[4].eq_ignore_ascii_case("true");

        Ok(Visitor::new(parts[0], age, parts[2], parts[3], has_fast_pass))
    }
}

impl Person for Visitor {
    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }
}

impl PartialEq for Visitor {
    fn eq(&self, other: &Visitor) -> bool {
        self.visitor_id == other.visitor_id
    }
}

impl Eq for Visitor {}

impl Hash for Visitor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.visitor_id.hash(state);
    }
}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Visitor ID: {}, Fast Pass: {}",
            self.profile,
            self.visitor_id,
            if self.has_fast_pass { "Yes" } else { "No" }
        )
    }
}

/// Anybody known to the park, tagged by role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Member {
    Employee(Employee),
    Visitor(Visitor),
}

impl From<Employee> for Member {
    fn from(employee: Employee) -> Member {
        Member::Employee(employee)
    }
}

impl From<Visitor> for Member {
    fn from(visitor: Visitor) -> Member {
        Member::Visitor(visitor)
    }
}

impl Person for Member {
    fn profile(&self) -> &Profile {
        match self {
            Member::Employee(employee) => employee.profile(),
            Member::Visitor(visitor) => visitor.profile(),
        }
    }

    fn profile_mut(&mut self) -> &mut Profile {
        match self {
            Member::Employee(employee) => employee.profile_mut(),
            Member::Visitor(visitor) => visitor.profile_mut(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Employee(employee) => write!(f, "[staff] {}", employee),
            Member::Visitor(visitor) => write!(f, "[guest] {}", visitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn renders_labels() {
        let visitor = Visitor::new("Jack", 25, "13900139001", "VIS001", true);
        assert_eq!(
            visitor.to_string(),
            "Name: Jack, Age: 25, Phone: 13900139001, Visitor ID: VIS001, Fast Pass: Yes"
        );

        let employee = Employee::new("Zhang", 30, "13800138001", "EMP001", "Coaster operator");
        assert_eq!(
            employee.to_string(),
            "Name: Zhang, Age: 30, Phone: 13800138001, Employee ID: EMP001, Position: Coaster operator"
        );

        assert_eq!(Profile::default().to_string(), "Name: , Age: 0, Phone: ");
    }

    #[test]
    fn equality_only_looks_at_id() {
        let a = Visitor::new("Tom", 27, "1", "VIS006", true);
        let b = Visitor::new("Thomas", 72, "2", "VIS006", false);
        let c = Visitor::new("Tom", 27, "1", "VIS007", true);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Visitor> = vec![a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn record_reads_back() {
        let visitor = Visitor::new("Emma", 24, "13300133001", "VIS027", true);
        let line = visitor.to_record();
        assert_eq!(line, "Emma,24,13300133001,VIS027,true");

        let parsed = Visitor::from_record(&line).unwrap();
        assert_eq!(parsed, visitor);
        assert_eq!(parsed.to_string(), visitor.to_string());
    }

    #[test]
    fn fast_pass_flag_ignores_case() {
        let parsed = Visitor::from_record("Liam,27,133,VIS030,FALSE").unwrap();
        assert!(!parsed.has_fast_pass());

        let parsed = Visitor::from_record("Noah,29,133,VIS029,True").unwrap();
        assert!(parsed.has_fast_pass());
    }

    #[test]
    fn unknown_fast_pass_flag_reads_as_false() {
        for flag in ["yes", "Yes", "0", "1", "maybe"].iter() {
            let parsed = Visitor::from_record(&format!("Ann,22,1,VIS1,{}", flag)).unwrap();
            assert!(!parsed.has_fast_pass());
            assert_eq!(parsed.visitor_id(), "VIS1");
        }
    }

    #[test]
    fn rejects_malformed_records() {
        match Visitor::from_record("Ann,Smith,22,1,VIS1,true") {
            Err(RecordError::FieldCount { expected: 5, found: 6, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }

        match Visitor::from_record("Ann,old,1,VIS1,true") {
            Err(RecordError::Age { value, .. }) => assert_eq!(value, "old"),
            other => panic!("unexpected {:?}", other),
        }

        match Visitor::from_record("Ann,-3,1,VIS1,true") {
            Err(RecordError::Age { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }

        match Visitor::from_record("Ann,22,1,VIS1,") {
            Err(RecordError::FieldCount { found: 4, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }

        match Visitor::from_record("Ann,22,1,,") {
            Err(RecordError::FieldCount { found: 3, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn member_dispatches_on_variant() {
        let mut member: Member = Visitor::new("Lily", 24, "139", "VIS005", false).into();
        member.set_age(25);

        assert_eq!(member.age(), 25);
        assert!(member.to_string().starts_with("[guest] Name: Lily, Age: 25"));

        let staff: Member = Employee::new("Li", 35, "135", "EMP002", "Carousel operator").into();
        assert_eq!(staff.name(), "Li");
    }
}
