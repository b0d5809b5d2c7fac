use std::path::{Path, PathBuf};

use log::info;

use super::EdgeListWriter;
use crate::{exact::SubRoute, graph::*};

pub const BRIDGE_LIST_FILE: &str = "bridges.edges";
pub const COMPONENT_PREFIX: &str = "subgraph-";
pub const DIVISION_PREFIX: &str = "division-";
pub const EDGE_LIST_EXTENSION: &str = "edges";

#[derive(Debug, Default)]
pub struct ExportedPartition {
    pub bridges: Vec<SubRoute>,
    pub bridge_file: PathBuf,
    pub component_files: Vec<PathBuf>,
}

/// Splits `network` at its bridges and writes the bridges plus one edge list per
/// remaining component (named after its first vertex) into `dir`. Components without
/// edges are not written.
pub fn export_bridge_partition<P: AsRef<Path>>(
    network: &RouteNetwork,
    dir: P,
) -> std::io::Result<ExportedPartition> {
    let dir = dir.as_ref();
    let mut working = network.clone();
    working.remove_trivial_vertices();

    let mut result = ExportedPartition {
        bridge_file: dir.join(BRIDGE_LIST_FILE),
        ..Default::default()
    };

    for e in working.compute_bridges() {
        if let Some(edge) = working.remove_edge(e) {
            result.bridges.push(SubRoute::from_edge(&working, &edge));
        }
    }
    result.bridges.try_write_edge_list_file(&result.bridge_file)?;
    info!("Wrote {} bridges to {}", result.bridges.len(), result.bridge_file.display());

    working.remove_trivial_vertices();

    let split = working.split_into_components();
    for component in split.iter() {
        if component.number_of_edges() == 0 {
            continue;
        }
        let Some(first) = component.first_vertex() else {
            continue;
        };

        let path = component_file(dir, component.name_of(first));
        component.try_write_edge_list_file(&path)?;
        info!(
            "Wrote component with {} nodes to {}",
            component.number_of_nodes(),
            path.display()
        );
        result.component_files.push(path);
    }

    Ok(result)
}

/// `<dir>/subgraph-<name>.edges`
pub fn component_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{COMPONENT_PREFIX}{name}.{EDGE_LIST_EXTENSION}"))
}

/// `<dir>/division-<name>.edges`, the cut file belonging to a component file
pub fn division_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{DIVISION_PREFIX}{name}.{EDGE_LIST_EXTENSION}"))
}

/// Returns the `<name>` of a `subgraph-<name>.edges` path
pub fn component_name(path: &Path) -> Option<&str> {
    if path.extension()? != EDGE_LIST_EXTENSION {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix(COMPONENT_PREFIX)
}
