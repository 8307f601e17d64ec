use crate::park::person::{Person, Visitor};
use std::cmp::Ordering;

/// Total order over visitors, used to sort the ride history
pub trait VisitorComparator {
    fn compare(&self, a: &Visitor, b: &Visitor) -> Ordering;
}

impl<F> VisitorComparator for F
where
    F: Fn(&Visitor, &Visitor) -> Ordering,
{
    fn compare(&self, a: &Visitor, b: &Visitor) -> Ordering {
        self(a, b)
    }
}

/// Youngest first, same age falls back to the name ignoring case
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeThenName;

impl VisitorComparator for AgeThenName {
    fn compare(&self, a: &Visitor, b: &Visitor) -> Ordering {
        a.age()
            .cmp(&b.age())
            .then_with(|| compare_ignore_case(a.name(), b.name()))
    }
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_comes_first() {
        let young = Visitor::new("Zoe", 20, "1", "A", false);
        let old = Visitor::new("Adam", 40, "2", "B", false);

        assert_eq!(AgeThenName.compare(&young, &old), Ordering::Less);
        assert_eq!(AgeThenName.compare(&old, &young), Ordering::Greater);
    }

    #[test]
    fn name_breaks_ties_ignoring_case() {
        let anna = Visitor::new("anna", 22, "1", "A", false);
        let alice = Visitor::new("Alice", 22, "2", "B", false);
        let shouting = Visitor::new("ANNA", 22, "3", "C", true);

        assert_eq!(AgeThenName.compare(&alice, &anna), Ordering::Less);
        assert_eq!(AgeThenName.compare(&anna, &shouting), Ordering::Equal);
    }

    #[test]
    fn closures_are_comparators() {
        let by_id = |a: &Visitor, b: &Visitor| a.visitor_id().cmp(b.visitor_id());
        let a = Visitor::new("x", 1, "1", "A", false);
        let b = Visitor::new("x", 1, "1", "B", false);

        assert_eq!(by_id.compare(&a, &b), Ordering::Less);
    }
}
