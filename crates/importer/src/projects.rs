//! Research project graph and cumulative unlock costs.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use crate::Entry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectNode {
    pub cost: f64,
    /// Required prerequisites. When alternatives exist, the first entry may be swapped for any
    /// of them.
    pub prereqs: Vec<String>,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectGraph {
    nodes: BTreeMap<String, ProjectNode>,
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    let name = name.trim();
    if !name.is_empty() && !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

fn read_cost(value: Option<&Value>) -> f64 {
    let cost = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if cost.is_finite() { cost } else { 0.0 }
}

impl ProjectGraph {
    /// Build the graph from project template entries. Entries without a `dataName` are skipped.
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut nodes = BTreeMap::new();
        for entry in entries {
            let Some(name) = entry.get("dataName").and_then(Value::as_str).map(str::trim) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let mut node = ProjectNode {
                cost: read_cost(entry.get("researchCost")),
                ..ProjectNode::default()
            };
            match entry.get("prereqs") {
                Some(Value::Array(items)) => {
                    for item in items.iter().filter_map(Value::as_str) {
                        push_unique(&mut node.prereqs, item);
                    }
                }
                Some(Value::String(single)) => push_unique(&mut node.prereqs, single),
                _ => {}
            }
            for (key, value) in entry {
                if key.starts_with("altPrereq") {
                    if let Some(alt) = value.as_str() {
                        push_unique(&mut node.alternatives, alt);
                    }
                }
            }
            if nodes.insert(name.to_string(), node).is_some() {
                warn!(
                    target: "ppp.importer",
                    project = name,
                    "duplicate project; keeping the last one"
                );
            }
        }
        Self { nodes }
    }

    pub fn insert(&mut self, name: impl Into<String>, node: ProjectNode) {
        self.nodes.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&ProjectNode> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cheapest cumulative research cost of every project, including its prerequisite chain.
    ///
    /// Unknown prerequisites cost nothing, and a prerequisite cycle is cut where it is first
    /// revisited.
    pub fn total_costs(&self) -> BTreeMap<String, f64> {
        let mut memo = BTreeMap::new();
        for name in self.nodes.keys() {
            let mut visiting = BTreeSet::new();
            self.total_cost(name, &mut memo, &mut visiting);
        }
        memo
    }

    fn total_cost<'a>(
        &'a self,
        name: &'a str,
        memo: &mut BTreeMap<String, f64>,
        visiting: &mut BTreeSet<&'a str>,
    ) -> f64 {
        if let Some(cost) = memo.get(name) {
            return *cost;
        }
        let Some(node) = self.nodes.get(name) else {
            return 0.0;
        };
        if !visiting.insert(name) {
            return 0.0;
        }

        let (fixed, choices): (&[String], Vec<&String>) = match node.prereqs.split_first() {
            Some((first, rest)) if !node.alternatives.is_empty() => {
                let mut options = vec![first];
                options.extend(node.alternatives.iter());
                (rest, options)
            }
            Some(_) => (node.prereqs.as_slice(), Vec::new()),
            None => (&[], node.alternatives.iter().collect()),
        };

        let mut total = node.cost;
        for prereq in fixed {
            total += self.total_cost(prereq, memo, visiting);
        }
        let cheapest = choices
            .into_iter()
            .map(|choice| self.total_cost(choice, memo, visiting))
            .fold(None, |best: Option<f64>, c| Some(best.map_or(c, |b| b.min(c))));
        total += cheapest.unwrap_or(0.0);

        visiting.remove(name);
        memo.insert(name.to_string(), total);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(cost: f64, prereqs: &[&str], alternatives: &[&str]) -> ProjectNode {
        ProjectNode {
            cost,
            prereqs: prereqs.iter().map(|s| s.to_string()).collect(),
            alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn sums_fixed_prereqs_and_takes_cheapest_alternative() {
        let mut graph = ProjectGraph::default();
        graph.insert("Base", node(100.0, &[], &[]));
        graph.insert("Expensive", node(1000.0, &["Base"], &[]));
        graph.insert("Cheap", node(10.0, &[], &[]));
        graph.insert("Target", node(50.0, &["Expensive", "Base"], &["Cheap"]));

        let costs = graph.total_costs();
        assert_eq!(costs["Expensive"], 1100.0);
        // Expensive may be replaced by Cheap; Base stays required.
        assert_eq!(costs["Target"], 50.0 + 100.0 + 10.0);
    }

    #[test]
    fn unknown_prereqs_are_free_and_cycles_terminate() {
        let mut graph = ProjectGraph::default();
        graph.insert("A", node(5.0, &["B", "Ghost"], &[]));
        graph.insert("B", node(7.0, &["A"], &[]));
        let costs = graph.total_costs();
        assert_eq!(costs["A"], 12.0);
        assert!(costs["B"].is_finite());
    }

    #[test]
    fn reads_prereq_spellings_from_entries() {
        let raw = serde_json::json!([
            {"dataName": "A", "researchCost": "250", "prereqs": "B"},
            {"dataName": "B", "researchCost": 100, "prereqs": ["", "C", "C"], "altPrereq0": "D"},
            {"dataName": "", "researchCost": 1},
            {"researchCost": 1}
        ]);
        let entries: Vec<Entry> = raw
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        let graph = ProjectGraph::from_entries(&entries);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("A").unwrap().prereqs, vec!["B"]);
        let b = graph.get("B").unwrap();
        assert_eq!(b.prereqs, vec!["C"]);
        assert_eq!(b.alternatives, vec!["D"]);
        assert_eq!(graph.total_costs()["A"], 350.0);
    }
}
