use std::io::Write;

use log::warn;
use serde::Serialize;

use crate::{errors::PostmanError, exact::*, graph::*};

/// Human readable listing of a network
pub fn write_network<W: Write>(mut writer: W, network: &RouteNetwork) -> std::io::Result<()> {
    write!(writer, "Vertices:")?;
    if network.is_empty() {
        writeln!(writer, " (None)")?;
    } else {
        for u in network.vertices() {
            write!(writer, " {}", network.name_of(u))?;
        }
        writeln!(writer)?;
    }

    if network.number_of_edges() == 0 {
        writeln!(writer, "  (No edge contained)")?;
    }
    for (_, edge) in network.edges() {
        let (u, v) = network.names_of_edge(&edge);
        writeln!(writer, "  Edge: {u} - {v} (Distance = {})", edge.weight())?;
    }

    Ok(())
}

pub fn write_solution<W: Write>(
    mut writer: W,
    network: &RouteNetwork,
    solution: &PostmanSolution,
) -> std::io::Result<()> {
    writeln!(writer, "[Graph Structure]")?;
    write_network(&mut writer, network)?;
    writeln!(writer)?;

    for route in &solution.bridges {
        writeln!(writer, "Traverse twice <bridge>:   {}", describe(route))?;
    }
    for route in &solution.doubled_edges {
        writeln!(writer, "Traverse twice <matching>: {}", describe(route))?;
    }
    if solution.skipped_components > 0 {
        writeln!(
            writer,
            "Warning: {} components could not be solved",
            solution.skipped_components
        )?;
    }

    writeln!(writer, "Total distance:      {}", solution.base_distance)?;
    writeln!(writer, "Duplicated distance: {}", solution.duplicated_distance())?;
    writeln!(writer, "Traversed distance:  {}", solution.traversed_distance())?;

    Ok(())
}

/// Writes the best assignment of a border search. Every line that is not an edge starts
/// with `#`, so the report itself is a valid edge list of all doubled stretches.
pub fn write_border_solution<W: Write>(
    mut writer: W,
    solution: &BorderSolution,
) -> std::io::Result<()> {
    writeln!(writer, "# ---------- Best Result ----------")?;
    if !solution.complete {
        writeln!(writer, "# Search was interrupted; best assignment found so far")?;
    }
    writeln!(writer, "# Total distance of all graph edges = {}", solution.base_distance)?;
    writeln!(writer, "# Total distance of doubled edges = {}", solution.duplicated_distance())?;
    writeln!(writer, "# Total distance of traversed edges = {}", solution.traversed_distance())?;

    if !solution.bridges.is_empty() {
        writeln!(writer, "# Bridges traversed twice")?;
        write_routes(&mut writer, &solution.bridges)?;
    }

    writeln!(writer, "# Edges traversed twice in cuts")?;
    write_routes(&mut writer, &solution.doubled_cut_edges)?;

    for (i, routes) in solution.component_doubled_edges.iter().enumerate() {
        writeln!(writer, "# Edges traversed twice in component {}", i + 1)?;
        write_routes(&mut writer, routes)?;
    }

    Ok(())
}

/// Writes the outcome of one border search in a batch run. A search that was interrupted
/// before it found any assignment is noted as a comment, so the batch can go on. Every
/// other error is returned.
pub fn write_border_outcome<W: Write>(
    mut writer: W,
    outcome: Result<BorderSolution, PostmanError>,
) -> anyhow::Result<()> {
    match outcome {
        Ok(solution) => write_border_solution(writer, &solution)?,
        Err(e @ PostmanError::Interrupted) => {
            warn!("{e}");
            writeln!(writer, "# {e}")?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn write_routes<W: Write>(mut writer: W, routes: &[SubRoute]) -> std::io::Result<()> {
    for route in routes {
        writeln!(writer, "{} {} {}", route.weight, route.from, route.to)?;
    }
    Ok(())
}

fn describe(route: &SubRoute) -> String {
    format!("{} - {} (Distance: {})", route.from, route.to, route.weight)
}

#[derive(Serialize)]
struct SolutionReport<'a, S> {
    #[serde(flatten)]
    solution: &'a S,
    duplicated_distance: Weight,
    traversed_distance: Weight,
}

pub fn write_solution_json<W: Write>(writer: W, solution: &PostmanSolution) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(
        writer,
        &SolutionReport {
            solution,
            duplicated_distance: solution.duplicated_distance(),
            traversed_distance: solution.traversed_distance(),
        },
    )
}

pub fn write_border_solution_json<W: Write>(
    writer: W,
    solution: &BorderSolution,
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(
        writer,
        &SolutionReport {
            solution,
            duplicated_distance: solution.duplicated_distance(),
            traversed_distance: solution.traversed_distance(),
        },
    )
}
