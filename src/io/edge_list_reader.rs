use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;

use crate::{errors::ReadError, graph::*};

macro_rules! raise_error_unless {
    ($cond : expr, $err : expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

pub type Result<T> = std::result::Result<T, ReadError>;

/// Largest total distance of an edge list; twice this value still fits into [`Weight`]
pub const MAX_TOTAL_DISTANCE: Weight = Weight::MAX / 2;

/// Reads edge lists with one `<distance> <vertex> <vertex>` triple per line. Blank lines
/// and lines starting with `#` are skipped; tokens after the second name are ignored.
/// A list without any edge is rejected with [`ReadError::Empty`].
pub trait EdgeListReader: Sized {
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self>;

    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading edge list {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        Self::try_read_edge_list(reader)
    }
}

impl EdgeListReader for RouteNetwork {
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        let mut network = RouteNetwork::new();
        let mut total: Weight = 0;

        for (i, line) in reader.lines().enumerate() {
            if let Some((distance, u, v)) = parse_edge_line(&line?, i + 1)? {
                // a closed route traverses every edge at most twice
                total = total
                    .checked_add(distance)
                    .filter(|&t| t <= MAX_TOTAL_DISTANCE)
                    .ok_or(ReadError::DistanceOverflow { line: i + 1 })?;
                network.add_named_edge(u, v, distance);
            }
        }

        raise_error_unless!(total > 0, ReadError::Empty);
        Ok(network)
    }
}

fn parse_edge_line(line: &str, line_number: usize) -> Result<Option<(Weight, &str, &str)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();

    let Some(distance) = parts.next().and_then(|t| t.parse::<Weight>().ok()) else {
        return Err(ReadError::InvalidDistance { line: line_number });
    };
    raise_error_unless!(distance > 0, ReadError::InvalidDistance { line: line_number });

    let (Some(u), Some(v)) = (parts.next(), parts.next()) else {
        return Err(ReadError::MissingVertexName { line: line_number });
    };

    Ok(Some((distance, u, v)))
}

#[cfg(test)]
mod test {
    use super::*;

    use glob::glob;

    fn read(input: &str) -> Result<RouteNetwork> {
        RouteNetwork::try_read_edge_list(input.as_bytes())
    }

    #[test]
    fn comments_and_blank_lines() {
        let net = read("# depot\n\n3 A B\r\n  4   B C  trailing\n#5 C A\n1 C A\n").unwrap();
        assert_eq!(net.number_of_nodes(), 3);
        assert_eq!(net.number_of_edges(), 3);
        assert_eq!(net.total_distance(), 8);
        assert_eq!(net.name_of(0), "A");
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        assert!(matches!(read("1 A B\n0 B C\n"), Err(ReadError::InvalidDistance { line: 2 })));
        assert!(matches!(read("-3 A B\n"), Err(ReadError::InvalidDistance { line: 1 })));
        assert!(matches!(read("x A B\n"), Err(ReadError::InvalidDistance { line: 1 })));
        assert!(matches!(read("\n\n2 A\n"), Err(ReadError::MissingVertexName { line: 3 })));
        assert!(matches!(read(""), Err(ReadError::Empty)));
        assert!(matches!(read("# nothing\n"), Err(ReadError::Empty)));
    }

    #[test]
    fn total_distance_must_fit() {
        let half = MAX_TOTAL_DISTANCE / 2 + 1;
        let input = format!("{half} A B\n{half} B C\n{half} C A\n");
        assert!(matches!(read(&input), Err(ReadError::DistanceOverflow { line: 2 })));

        let input = format!("{} A B\n1 B C\n", Weight::MAX);
        assert!(matches!(read(&input), Err(ReadError::DistanceOverflow { line: 1 })));

        let net = read(&format!("{MAX_TOTAL_DISTANCE} A B\n")).unwrap();
        assert_eq!(net.total_distance(), MAX_TOTAL_DISTANCE);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            RouteNetwork::try_read_edge_list_file("/nonexistent/route.edges"),
            Err(ReadError::Io(_))
        ));
    }

    #[test]
    fn read_fixtures() {
        let mut count = 0;
        for path in glob("instances/tiny/*.edges").unwrap().flatten() {
            let net = RouteNetwork::try_read_edge_list_file(&path).unwrap();
            assert!(net.number_of_edges() > 0, "{}", path.display());
            count += 1;
        }
        assert!(count > 0);
    }
}
