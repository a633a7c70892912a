// src/tree.rs
//! Turns the member list into a node/edge description of the family tree.

use serde::Serialize;
use std::fmt::Write as _;

use crate::models::member::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Leluhur di atas, keturunan di bawah.
    TopToBottom,
}

impl Direction {
    fn rankdir(self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyGraph {
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// One node per member, one parent -> child edge per parent reference.
///
/// Parent ids are emitted even when no member carries them, the renderer
/// draws those as bare nodes.
pub fn build_graph(members: &[Member]) -> FamilyGraph {
    let nodes = members
        .iter()
        .map(|member| Node {
            id: member.id,
            label: format!("{}\n({})", member.name, member.group),
        })
        .collect();

    let edges = members
        .iter()
        .flat_map(|member| {
            member
                .parents()
                .into_iter()
                .flatten()
                .map(move |parent| Edge {
                    from: parent,
                    to: member.id,
                })
        })
        .collect();

    FamilyGraph {
        direction: Direction::TopToBottom,
        nodes,
        edges,
    }
}

impl FamilyGraph {
    /// Graphviz DOT source for this graph, nodes drawn as boxes.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph {\n");
        let _ = writeln!(dot, "\trankdir={}", self.direction.rankdir());
        for node in &self.nodes {
            let _ = writeln!(
                dot,
                "\t{} [label=\"{}\" shape=box]",
                node.id,
                escape_label(&node.label)
            );
        }
        for edge in &self.edges {
            let _ = writeln!(dot, "\t{} -> {}", edge.from, edge.to);
        }
        dot.push_str("}\n");
        dot
    }
}

fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Member> {
        vec![
            Member::new(1, "Budi", "Kakek"),
            Member::new(2, "Ani", "Nenek"),
            Member::new(3, "Sari", "Anak").with_parents(Some(1), Some(2)),
            Member::new(4, "Tono", "Cucu").with_parents(Some(3), None),
        ]
    }

    #[test]
    fn one_node_per_member_with_name_and_group() {
        let graph = build_graph(&sample());

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(
            graph.nodes[2],
            Node {
                id: 3,
                label: "Sari\n(Anak)".to_string()
            }
        );
    }

    #[test]
    fn one_edge_per_parent_reference() {
        let graph = build_graph(&sample());

        assert_eq!(
            graph.edges,
            vec![
                Edge { from: 1, to: 3 },
                Edge { from: 2, to: 3 },
                Edge { from: 3, to: 4 },
            ]
        );
        assert!(graph.edges.len() <= 2 * graph.nodes.len());
    }

    #[test]
    fn second_parent_alone_still_yields_edge() {
        let members = vec![Member::new(5, "E", "G").with_parents(None, Some(9))];

        assert_eq!(build_graph(&members).edges, vec![Edge { from: 9, to: 5 }]);
    }

    #[test]
    fn empty_family_gives_empty_graph() {
        let graph = build_graph(&[]);

        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.direction, Direction::TopToBottom);
    }

    #[test]
    fn dot_output_is_top_to_bottom_with_boxes() {
        let dot = build_graph(&sample()).to_dot();

        assert!(dot.starts_with("digraph {\n\trankdir=TB\n"));
        assert!(dot.contains("\t3 [label=\"Sari\\n(Anak)\" shape=box]\n"));
        assert!(dot.contains("\t3 -> 4\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn dot_labels_are_escaped() {
        let members = vec![Member::new(1, "Si \"Ucok\"", "a\\b")];
        let dot = build_graph(&members).to_dot();

        assert!(dot.contains(r#"label="Si \"Ucok\"\n(a\\b)""#));
    }
}
