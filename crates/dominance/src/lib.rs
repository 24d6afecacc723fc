//! Generic dominance engine.
//!
//! A record `a` dominates `b` when it is at least as good on every tracked dimension and
//! strictly better on one. The comparison is driven by a [`Criteria`] table so drives,
//! reactors and drive+reactor combos all share the same relation and the same
//! all-pairs [`annotate`] scan.

use std::borrow::Cow;

use tracing::trace;

/// Capability interface a record kind exposes to the engine.
///
/// Dimension values are read through the accessors stored in [`Criteria`]; the trait only
/// covers what every record kind has in common.
pub trait Record {
    /// Name reported in dominator lists.
    fn label(&self) -> Cow<'_, str>;

    /// Group identity used by the same-class veto. `None` never matches anything.
    fn class_key(&self) -> Option<&str> {
        None
    }

    /// Research cost needed to unlock the record; zero means no cost data.
    fn unlock_cost(&self) -> f64 {
        0.0
    }
}

/// Preferred direction of a comparison dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Higher,
    Lower,
}

/// Numeric comparison dimension.
pub struct Dimension<R> {
    pub name: &'static str,
    pub direction: Direction,
    pub value: fn(&R) -> f64,
}

impl<R> Dimension<R> {
    fn read(&self, record: &R) -> f64 {
        let v = (self.value)(record);
        // NaN compares false both ways, which would silently block every dominance.
        if v.is_nan() { 0.0 } else { v }
    }
}

/// Boolean property a dominator may never give up.
///
/// If `b` has the property and `a` lacks it, `a` cannot dominate `b` whatever the numeric
/// dimensions say. If `a` has it and `b` does not, that alone counts as a strict improvement.
pub struct Gate<R> {
    pub name: &'static str,
    pub holds: fn(&R) -> bool,
}

/// Comparison table for one record kind.
pub struct Criteria<R> {
    dimensions: Vec<Dimension<R>>,
    gates: Vec<Gate<R>>,
    same_class_veto: bool,
}

impl<R> Default for Criteria<R> {
    fn default() -> Self {
        Self {
            dimensions: Vec::new(),
            gates: Vec::new(),
            same_class_veto: false,
        }
    }
}

impl<R> Criteria<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension where larger values are better.
    pub fn prefer_higher(mut self, name: &'static str, value: fn(&R) -> f64) -> Self {
        self.dimensions.push(Dimension {
            name,
            direction: Direction::Higher,
            value,
        });
        self
    }

    /// Add a dimension where smaller values are better.
    pub fn prefer_lower(mut self, name: &'static str, value: fn(&R) -> f64) -> Self {
        self.dimensions.push(Dimension {
            name,
            direction: Direction::Lower,
            value,
        });
        self
    }

    /// Add a gate; see [`Gate`].
    pub fn gate(mut self, name: &'static str, holds: fn(&R) -> bool) -> Self {
        self.gates.push(Gate { name, holds });
        self
    }

    /// Disallow dominance between records sharing a class key.
    pub fn same_class_veto(mut self, enabled: bool) -> Self {
        self.same_class_veto = enabled;
        self
    }

    pub fn dimensions(&self) -> &[Dimension<R>] {
        &self.dimensions
    }

    pub fn gates(&self) -> &[Gate<R>] {
        &self.gates
    }
}

/// Outcome of comparing `a` against `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `a` dominates `b`.
    Dominates,
    /// Both records share a class key and the same-class veto is on.
    SameClass,
    /// `b` holds a gate property that `a` lacks.
    GateLost(&'static str),
    /// `a` is worse than `b` on the named dimension.
    Worse(&'static str),
    /// `a` is nowhere worse but also nowhere strictly better.
    NoImprovement,
}

impl<R: Record> Criteria<R> {
    /// Compare `a` against `b`, reporting why dominance does or does not hold.
    pub fn compare(&self, a: &R, b: &R) -> Verdict {
        if self.same_class_veto {
            if let (Some(ka), Some(kb)) = (a.class_key(), b.class_key()) {
                if ka == kb {
                    return Verdict::SameClass;
                }
            }
        }

        let mut strictly_better = false;
        for gate in &self.gates {
            match ((gate.holds)(a), (gate.holds)(b)) {
                (false, true) => return Verdict::GateLost(gate.name),
                (true, false) => strictly_better = true,
                _ => {}
            }
        }

        for dim in &self.dimensions {
            let (va, vb) = (dim.read(a), dim.read(b));
            let (not_worse, better) = match dim.direction {
                Direction::Higher => (va >= vb, va > vb),
                Direction::Lower => (va <= vb, va < vb),
            };
            if !not_worse {
                return Verdict::Worse(dim.name);
            }
            strictly_better |= better;
        }

        if strictly_better {
            Verdict::Dominates
        } else {
            Verdict::NoImprovement
        }
    }

    /// Does `a` dominate `b`?
    pub fn dominates(&self, a: &R, b: &R) -> bool {
        self.compare(a, b) == Verdict::Dominates
    }
}

/// Free-function form of [`Criteria::dominates`].
pub fn dominates<R: Record>(a: &R, b: &R, criteria: &Criteria<R>) -> bool {
    criteria.dominates(a, b)
}

/// Per-record result of the all-pairs scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    /// Some other record dominates this one.
    pub obsolete: bool,
    /// Labels of the dominating records, in input order.
    pub dominated_by: Vec<String>,
    /// How many other records this one dominates.
    pub dominates_count: usize,
    /// `dominates_count * 1000 / unlock_cost` when both are positive.
    pub domination_efficiency: Option<f64>,
}

/// A record paired with its annotation.
#[derive(Debug, Clone)]
pub struct Annotated<R> {
    pub record: R,
    pub annotation: Annotation,
}

impl<R> Annotated<R> {
    pub fn is_obsolete(&self) -> bool {
        self.annotation.obsolete
    }
}

/// Run the full pairwise scan and return one annotation per input record, in input order.
pub fn annotations<R: Record>(records: &[R], criteria: &Criteria<R>) -> Vec<Annotation> {
    let mut out = vec![Annotation::default(); records.len()];

    for (i, target) in records.iter().enumerate() {
        for (j, candidate) in records.iter().enumerate() {
            if i == j || !criteria.dominates(candidate, target) {
                continue;
            }
            trace!(
                target: "ppp.dominance",
                dominator = %candidate.label(),
                dominated = %target.label(),
                "dominance found"
            );
            out[i].obsolete = true;
            out[i].dominated_by.push(candidate.label().into_owned());
            out[j].dominates_count += 1;
        }
    }

    for (annotation, record) in out.iter_mut().zip(records) {
        annotation.domination_efficiency =
            domination_efficiency(annotation.dominates_count, record.unlock_cost());
    }

    out
}

/// Annotate an owned record set, keeping input order.
pub fn annotate<R: Record>(records: Vec<R>, criteria: &Criteria<R>) -> Vec<Annotated<R>> {
    let notes = annotations(&records, criteria);
    records
        .into_iter()
        .zip(notes)
        .map(|(record, annotation)| Annotated { record, annotation })
        .collect()
}

/// Records of an annotated set that nothing dominates.
pub fn current<R>(annotated: &[Annotated<R>]) -> impl Iterator<Item = &R> {
    annotated
        .iter()
        .filter(|entry| !entry.is_obsolete())
        .map(|entry| &entry.record)
}

fn domination_efficiency(count: usize, unlock_cost: f64) -> Option<f64> {
    if count > 0 && unlock_cost > 0.0 {
        Some(count as f64 * 1000.0 / unlock_cost)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        name: &'static str,
        class: &'static str,
        speed: f64,
        mass: f64,
        shielded: bool,
        cost: f64,
    }

    impl Record for Item {
        fn label(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.name)
        }

        fn class_key(&self) -> Option<&str> {
            Some(self.class)
        }

        fn unlock_cost(&self) -> f64 {
            self.cost
        }
    }

    fn item(name: &'static str, speed: f64, mass: f64) -> Item {
        Item {
            name,
            class: name,
            speed,
            mass,
            shielded: false,
            cost: 0.0,
        }
    }

    fn criteria() -> Criteria<Item> {
        Criteria::new()
            .prefer_higher("speed", |i: &Item| i.speed)
            .prefer_lower("mass", |i| i.mass)
    }

    #[test]
    fn never_dominates_itself() {
        let a = item("a", 10.0, 5.0);
        let c = criteria().gate("shielded", |i| i.shielded);
        assert!(!c.dominates(&a, &a));
        assert_eq!(c.compare(&a, &a), Verdict::NoImprovement);
    }

    #[test]
    fn needs_one_strict_improvement() {
        let a = item("a", 10.0, 5.0);
        let b = item("b", 10.0, 5.0);
        let c = item("c", 11.0, 5.0);
        let crit = criteria();
        assert!(!crit.dominates(&a, &b));
        assert!(crit.dominates(&c, &a));
        assert_eq!(crit.compare(&a, &c), Verdict::Worse("speed"));
    }

    #[test]
    fn lower_dimension_counts_as_improvement() {
        let light = item("light", 10.0, 4.0);
        let heavy = item("heavy", 10.0, 5.0);
        assert!(criteria().dominates(&light, &heavy));
        assert!(!criteria().dominates(&heavy, &light));
    }

    #[test]
    fn same_class_veto_blocks_both_directions() {
        let mut a = item("a", 20.0, 1.0);
        let mut b = item("b", 10.0, 5.0);
        a.class = "family";
        b.class = "family";
        let crit = criteria().same_class_veto(true);
        assert_eq!(crit.compare(&a, &b), Verdict::SameClass);
        assert!(!crit.dominates(&b, &a));
        assert!(criteria().dominates(&a, &b));
    }

    #[test]
    fn gate_is_a_hard_veto_and_a_strict_trigger() {
        let mut plain = item("plain", 20.0, 1.0);
        let mut shielded = item("shielded", 10.0, 5.0);
        shielded.shielded = true;
        let crit = criteria().gate("shielded", |i| i.shielded);
        assert_eq!(crit.compare(&plain, &shielded), Verdict::GateLost("shielded"));

        plain.speed = 10.0;
        plain.mass = 5.0;
        assert!(crit.dominates(&shielded, &plain));
    }

    #[test]
    fn annotate_tallies_are_independent() {
        let items = vec![
            item("best", 30.0, 1.0),
            item("mid", 20.0, 2.0),
            item("worst", 10.0, 3.0),
            item("odd", 40.0, 9.0),
        ];
        let out = annotate(items, &criteria());
        let best = &out[0].annotation;
        assert!(!best.obsolete);
        assert_eq!(best.dominates_count, 2);
        let worst = &out[2].annotation;
        assert!(worst.obsolete);
        assert_eq!(worst.dominated_by, vec!["best".to_string(), "mid".to_string()]);
        assert_eq!(worst.dominates_count, 0);
        let odd = &out[3].annotation;
        assert!(!odd.obsolete);
        assert_eq!(odd.dominates_count, 0);
        let names: Vec<_> = current(&out).map(|i| i.name).collect();
        assert_eq!(names, vec!["best", "odd"]);
    }

    #[test]
    fn empty_criteria_marks_nothing() {
        let items = vec![item("a", 1.0, 1.0), item("b", 2.0, 0.5)];
        let out = annotations(&items, &Criteria::new());
        assert!(out.iter().all(|a| !a.obsolete && a.dominates_count == 0));
    }

    #[test]
    fn efficiency_needs_cost_and_count() {
        let mut a = item("a", 30.0, 1.0);
        a.cost = 500.0;
        let mut b = item("b", 10.0, 3.0);
        b.cost = 200.0;
        let out = annotations(&[a, b], &criteria());
        assert_eq!(out[0].domination_efficiency, Some(2.0));
        assert_eq!(out[1].domination_efficiency, None);
    }

    #[test]
    fn nan_reads_as_zero() {
        let a = item("a", f64::NAN, 1.0);
        let b = item("b", 0.0, 2.0);
        assert!(criteria().dominates(&a, &b));
    }
}
