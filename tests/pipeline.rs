//! End-to-end runs of the upload pipeline on CSV bytes.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::collections::BTreeSet;

use tagnet::error::{LoadError, NetworkError};
use tagnet::network::Table;
use tagnet::{IsolatedProjects, NetworkConfig, analyze_upload};

const CHAIN: &str = "Project,Tag 1,Tag 2\nProjA,#x,#y\nProjB,#y,#z\nProjC,#z,\n";

fn tags(list: &[&str]) -> BTreeSet<String> {
	list.iter().map(|t| t.to_string()).collect()
}

#[test]
fn chain_example_links_only_neighbours() {
	let analysis = analyze_upload("projects.csv", CHAIN.as_bytes(), &NetworkConfig::default()).unwrap();
	let graph = &analysis.graph;

	let (a, b, c) = (
		graph.index_of("ProjA").unwrap(),
		graph.index_of("ProjB").unwrap(),
		graph.index_of("ProjC").unwrap(),
	);
	assert_eq!(graph.edge_count(), 2);
	assert_eq!(graph.edge_between(a, b).unwrap().tags, tags(&["#y"]));
	assert_eq!(graph.edge_between(b, c).unwrap().tags, tags(&["#z"]));
	assert!(graph.edge_between(a, c).is_none());
}

#[test]
fn shared_pair_of_tags_is_one_edge() {
	let csv = "Project,T1,T2\nA,#x,#y\nB,#y,#x\n";
	let analysis = analyze_upload("two.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap();

	assert_eq!(analysis.graph.edge_count(), 1);
	assert_eq!(analysis.graph.edges[0].tags.len(), 2);
	assert_eq!(analysis.figure.edge_labels[0].text, "#x, #y");
}

#[test]
fn isolated_projects_follow_policy() {
	let csv = "Project,T1\nA,#x\nB,#x\nLoner,#solo\nEmpty,\n";

	let omit = analyze_upload("t.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap();
	assert_eq!(omit.graph.node_count(), 2);
	assert!(omit.graph.index_of("Loner").is_none());

	let config = NetworkConfig {
		isolated: IsolatedProjects::Show,
		..NetworkConfig::default()
	};
	let show = analyze_upload("t.csv", csv.as_bytes(), &config).unwrap();
	assert_eq!(show.graph.node_count(), 4);
	assert_eq!(show.graph.degree(show.graph.index_of("Loner").unwrap()), 0);
	// every node, isolated or not, lands in exactly one cluster
	for node in 0..show.graph.node_count() {
		assert!(show.partition.cluster_of(node).is_some());
	}
}

#[test]
fn single_column_table_is_rejected() {
	let csv = "Project\nA\nB\n";
	let err = analyze_upload("t.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap_err();
	assert!(matches!(
		err,
		NetworkError::Load(LoadError::MissingHashtagColumns(1))
	));
	assert!(err.to_string().contains("hashtag column"));
}

#[test]
fn binary_garbage_is_rejected() {
	let err = analyze_upload("upload.bin", &[0xff, 0xfe, 0x00, 0x81], &NetworkConfig::default())
		.unwrap_err();
	assert!(matches!(
		err,
		NetworkError::Load(LoadError::UnrecognizedFormat(_))
	));
}

#[test]
fn table_without_shared_tags_still_renders() {
	let csv = "Project,T1\nA,#a\nB,#b\nC,\n";
	let config = NetworkConfig {
		isolated: IsolatedProjects::Show,
		..NetworkConfig::default()
	};
	let analysis = analyze_upload("t.csv", csv.as_bytes(), &config).unwrap();

	assert_eq!(analysis.graph.edge_count(), 0);
	assert_eq!(analysis.partition.len(), 3);
	assert_eq!(analysis.modularity, 0.0);
	assert!(analysis.html().unwrap().contains("graph-data"));

	let empty = analyze_upload("t.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap();
	assert_eq!(empty.graph.node_count(), 0);
	assert!(empty.html().is_ok());
}

#[test]
fn csv_export_reloads_cell_for_cell() {
	let csv = "Project,Tag 1,Tag 2,Tag 3\n\"Big, Project\",#x,,#z\nSmall,#x,#y\n";
	let analysis = analyze_upload("t.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap();

	let exported = analysis.csv().unwrap();
	assert!(exported.starts_with("Project,Tag 1,Tag 2,Tag 3\n"));
	assert_eq!(Table::from_csv(exported.as_bytes()).unwrap(), analysis.table);
}

#[test]
fn html_export_carries_every_project_and_label() {
	let analysis = analyze_upload("p.csv", CHAIN.as_bytes(), &NetworkConfig::default()).unwrap();
	let html = analysis.html().unwrap();

	assert!(html.starts_with("<!DOCTYPE html>"));
	for name in ["ProjA", "ProjB", "ProjC"] {
		assert!(html.contains(name), "missing {name}");
	}
	assert!(html.contains("#y"));
	assert!(html.contains("#z"));
}

#[test]
fn repeated_runs_are_identical() {
	let csv = "Project,T1,T2\nA,#x,#y\nB,#x,\nC,#y,#z\nD,#z,#x\nE,#q,#z\n";
	let first = analyze_upload("t.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap();
	let second = analyze_upload("t.csv", csv.as_bytes(), &NetworkConfig::default()).unwrap();

	assert_eq!(first.layout, second.layout);
	assert_eq!(first.partition, second.partition);
	assert_eq!(first.figure, second.figure);
	assert_eq!(first.html().unwrap(), second.html().unwrap());
}
