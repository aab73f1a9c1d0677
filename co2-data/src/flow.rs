//! Region → country → emission-type flow graph for alluvial charts.

use crate::aggregate::{exclude_unknown_region, filter_by_period, group_and_sum, top_n};
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::record::Record;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A graph node, namespaced by level so equal display names never alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Region(String),
    Country(String),
    Terminal(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Region(name) => write!(f, "region-{name}"),
            NodeId::Country(name) => write!(f, "country-{name}"),
            NodeId::Terminal(name) => write!(f, "terminal-{name}"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// A terminal emission category fed by one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    /// Short id, used in the terminal's [`NodeId`].
    pub id: String,
    /// Legend label.
    pub name: String,
    pub metric: Metric,
}

impl Terminal {
    pub fn new(id: &str, name: &str, metric: Metric) -> Self {
        Terminal {
            id: id.to_string(),
            name: name.to_string(),
            metric,
        }
    }

    pub fn fossil() -> Self {
        Terminal::new("fossil", "Fossil Emissions", Metric::Annual)
    }

    pub fn land_use() -> Self {
        Terminal::new("land", "Land-use Change", Metric::LandUse)
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::Terminal(self.id.clone())
    }
}

/// Parameters for [`build_flow_graph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    pub period: Period,
    pub top_n: usize,
    /// Ranks countries and weights region → country edges.
    pub primary: Metric,
    pub secondary: [Terminal; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    /// Regions, then countries in rank order, then terminals.
    pub nodes: Vec<Node>,
    /// One edge per contributing record and level, in record order.
    pub edges: Vec<Edge>,
}

impl FlowGraph {
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Total weight of edges entering `id`.
    pub fn inflow(&self, id: &NodeId) -> f64 {
        self.edges
            .iter()
            .filter(|edge| &edge.target == id)
            .map(|edge| edge.weight)
            .sum()
    }

    /// Total weight of edges leaving `id`.
    pub fn outflow(&self, id: &NodeId) -> f64 {
        self.edges
            .iter()
            .filter(|edge| &edge.source == id)
            .map(|edge| edge.weight)
            .sum()
    }
}

/// Build the alluvial flow graph for the top `params.top_n` countries.
///
/// Only positive values produce edges. A country is attached to the region
/// of its first record, so each country has exactly one parent region, and a
/// country with no positive primary value is left out of the graph.
pub fn build_flow_graph(records: &[Record], params: &FlowParams) -> FlowGraph {
    let in_period = exclude_unknown_region(filter_by_period(records, params.period));
    let primary = params.primary;
    let groups = group_and_sum(
        in_period.iter().copied(),
        |r| Some(r.entity.as_str()),
        |r| r.metric(primary),
    );
    let ranked = top_n(&groups, params.top_n);
    let kept: IndexSet<&str> = ranked.iter().map(|p| p.label.as_str()).collect();

    let mut parent_region: HashMap<&str, &str> = HashMap::new();
    let mut regions: IndexSet<&str> = IndexSet::new();
    let mut flowing: IndexSet<&str> = IndexSet::new();
    let mut edges = Vec::new();

    for record in &in_period {
        let country = record.entity.trim();
        if !kept.contains(country) {
            continue;
        }
        let region = record.region.as_deref().map(str::trim).unwrap_or_default();
        let region = *parent_region.entry(country).or_insert(region);

        let weight = record.metric(primary);
        if weight <= 0.0 {
            continue;
        }
        regions.insert(region);
        flowing.insert(country);
        let country_id = NodeId::Country(country.to_string());
        edges.push(Edge {
            source: NodeId::Region(region.to_string()),
            target: country_id.clone(),
            weight,
        });
        for terminal in &params.secondary {
            let value = record.metric(terminal.metric);
            if value > 0.0 {
                edges.push(Edge {
                    source: country_id.clone(),
                    target: terminal.node_id(),
                    weight: value,
                });
            }
        }
    }

    let mut nodes: IndexMap<NodeId, Node> = IndexMap::new();
    for region in &regions {
        let id = NodeId::Region(region.to_string());
        nodes.entry(id.clone()).or_insert(Node {
            id,
            name: region.to_string(),
        });
    }
    for country in kept.iter().filter(|c| flowing.contains(*c)) {
        let id = NodeId::Country(country.to_string());
        nodes.entry(id.clone()).or_insert(Node {
            id,
            name: country.to_string(),
        });
    }
    if !flowing.is_empty() {
        for terminal in &params.secondary {
            nodes.entry(terminal.node_id()).or_insert(Node {
                id: terminal.node_id(),
                name: terminal.name.clone(),
            });
        }
    }

    debug!(
        "build_flow_graph: {} of {} ranked countries flowing, {} nodes, {} edges",
        flowing.len(),
        kept.len(),
        nodes.len(),
        edges.len()
    );
    FlowGraph {
        nodes: nodes.into_values().collect(),
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(top_n: usize) -> FlowParams {
        FlowParams {
            period: Period::Year(2020),
            top_n,
            primary: Metric::IncludingLandUse,
            secondary: [Terminal::fossil(), Terminal::land_use()],
        }
    }

    fn record(entity: &str, region: &str, total: f64, fossil: f64, land: f64) -> Record {
        Record::new(entity, 2020)
            .with_region(region)
            .with_metric(Metric::IncludingLandUse, total)
            .with_metric(Metric::Annual, fossil)
            .with_metric(Metric::LandUse, land)
    }

    fn id(node: &str) -> NodeId {
        match node.split_once('-') {
            Some(("region", name)) => NodeId::Region(name.to_string()),
            Some(("country", name)) => NodeId::Country(name.to_string()),
            Some(("terminal", name)) => NodeId::Terminal(name.to_string()),
            _ => panic!("bad node id {node}"),
        }
    }

    #[test]
    fn test_single_country_graph() {
        let graph = build_flow_graph(&[record("X", "Europe", 50.0, 40.0, 10.0)], &params(1));
        let ids: Vec<String> = graph.nodes.iter().map(|n| n.id.to_string()).collect();
        assert_eq!(
            ids,
            vec!["region-Europe", "country-X", "terminal-fossil", "terminal-land"]
        );
        assert_eq!(
            graph.edges,
            vec![
                Edge { source: id("region-Europe"), target: id("country-X"), weight: 50.0 },
                Edge { source: id("country-X"), target: id("terminal-fossil"), weight: 40.0 },
                Edge { source: id("country-X"), target: id("terminal-land"), weight: 10.0 },
            ]
        );
        assert_eq!(graph.node(&id("terminal-land")).unwrap().name, "Land-use Change");
    }

    #[test]
    fn test_zero_and_negative_values_make_no_edges() {
        let records = vec![
            record("A", "Asia", 30.0, 30.0, 0.0),
            record("B", "Asia", 20.0, 25.0, -5.0),
            record("C", "Asia", 0.0, 4.0, 0.0),
        ];
        let graph = build_flow_graph(&records, &params(3));
        assert!(graph.edges.iter().all(|e| e.weight > 0.0));
        assert_eq!(graph.outflow(&id("country-A")), 30.0);
        assert_eq!(graph.inflow(&id("terminal-land")), 0.0);
        assert!(graph.node(&id("country-C")).is_none());
    }

    #[test]
    fn test_colliding_names_stay_distinct() {
        let records = vec![
            record("Georgia", "Georgia", 5.0, 5.0, 0.0),
            record("fossil", "Europe", 3.0, 3.0, 0.0),
        ];
        let graph = build_flow_graph(&records, &params(5));
        let ids: HashSet<String> = graph.nodes.iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids.len(), graph.nodes.len());
        assert!(ids.contains("region-Georgia"));
        assert!(ids.contains("country-Georgia"));
        assert!(ids.contains("country-fossil"));
        assert!(ids.contains("terminal-fossil"));
    }

    #[test]
    fn test_top_n_and_unknown_regions() {
        let records = vec![
            record("Small", "Africa", 1.0, 1.0, 0.0),
            record("Big", "Asia", 100.0, 90.0, 10.0),
            record("World", "Unknown", 1000.0, 900.0, 100.0),
            record("Mid", "Europe", 50.0, 50.0, 0.0),
        ];
        let graph = build_flow_graph(&records, &params(2));
        let names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Asia", "Europe", "Big", "Mid", "Fossil Emissions", "Land-use Change"]
        );
    }

    #[test]
    fn test_every_country_has_one_parent_region() {
        let mut records = vec![
            record("A", "Asia", 10.0, 10.0, 0.0),
            record("B", "Europe", 5.0, 4.0, 1.0),
        ];
        let mut moved = record("A", "Oceania", 7.0, 7.0, 0.0);
        moved.year = 2021;
        records.push(moved.clone());
        moved.year = 2025;
        records.push(moved);
        let mut p = params(5);
        p.period = Period::Decade(2020);
        let graph = build_flow_graph(&records, &p);

        for node in graph.nodes.iter().filter(|n| matches!(n.id, NodeId::Country(_))) {
            let parents: HashSet<&NodeId> = graph
                .edges
                .iter()
                .filter(|e| e.target == node.id)
                .map(|e| &e.source)
                .collect();
            assert_eq!(parents.len(), 1, "{} has parents {:?}", node.id, parents);
            assert!(parents.iter().all(|p| matches!(p, NodeId::Region(_))));
        }
        assert_eq!(graph.inflow(&id("country-A")), 24.0);
        assert!(graph.node(&id("region-Oceania")).is_none());
    }

    #[test]
    fn test_empty_input() {
        let graph = build_flow_graph(&[], &params(20));
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_node_id_serializes_as_string() {
        let json = serde_json::to_string(&NodeId::Country("X".to_string())).unwrap();
        assert_eq!(json, "\"country-X\"");
    }
}
