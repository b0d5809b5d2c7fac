use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{exact::SubRoute, graph::*};

/// Writes `<distance> <vertex> <vertex>` lines, readable by
/// [`EdgeListReader`](super::EdgeListReader)
pub trait EdgeListWriter {
    fn try_write_edge_list<W: Write>(&self, writer: W) -> std::io::Result<()>;

    fn try_write_edge_list_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.try_write_edge_list(&mut writer)?;
        writer.flush()
    }
}

impl EdgeListWriter for RouteNetwork {
    fn try_write_edge_list<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for (_, edge) in self.edges() {
            let (u, v) = self.names_of_edge(&edge);
            writeln!(writer, "{} {u} {v}", edge.weight())?;
        }
        Ok(())
    }
}

impl EdgeListWriter for [SubRoute] {
    fn try_write_edge_list<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for route in self {
            writeln!(writer, "{} {} {}", route.weight, route.from, route.to)?;
        }
        Ok(())
    }
}
