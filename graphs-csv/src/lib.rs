//! CSV adjacency-matrix import/export.
//!
//! The extract is treated as a square matrix with row/column headers
//! equal to node identifiers; cell (i, j) is the directed distance from
//! row i to column j. Empty or negative cells mean no edge. Import
//! materializes no buildings — the resulting Map answers Dijkstra queries
//! but no building-level query.

use std::path::Path;

use graphs_routing::{Graph, Map, Node};

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("CSV row {0} has a different column count than the header")]
    RaggedRow(usize),
    #[error("CSV header cell {0:?} is not a valid node id")]
    InvalidHeader(String),
    #[error("CSV row label {0:?} is not a valid node id")]
    InvalidRowLabel(String),
}

/// Parses a CSV adjacency matrix into a Map with no buildings.
pub fn import(path: impl AsRef<Path>) -> Result<Map, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;

    let mut records = reader.records();
    let header = records
        .next()
        .transpose()?
        .unwrap_or_else(csv::StringRecord::new);

    let column_ids: Vec<u64> = header
        .iter()
        .skip(1)
        .map(|cell| {
            cell.trim()
                .parse::<u64>()
                .map_err(|_| CsvError::InvalidHeader(cell.to_string()))
        })
        .collect::<Result<_, _>>()?;

    let mut graph = Graph::new();
    for record in records {
        let record = record?;
        if record.len() != column_ids.len() + 1 {
            return Err(CsvError::RaggedRow(record.position().map(|p| p.line() as usize).unwrap_or(0)));
        }
        let row_id: u64 = record[0]
            .trim()
            .parse()
            .map_err(|_| CsvError::InvalidRowLabel(record[0].to_string()))?;
        let from = Node::new(row_id, 0.0, 0.0);

        for (cell, &col_id) in record.iter().skip(1).zip(&column_ids) {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Ok(distance) = trimmed.parse::<f64>() else {
                continue;
            };
            if distance < 0.0 {
                continue;
            }
            let to = Node::new(col_id, 0.0, 0.0);
            graph.add_edge_one_way(from, to, distance);
        }
    }

    tracing::info!(nodes = column_ids.len(), "CSV adjacency matrix imported");
    Ok(Map::new(Vec::new(), graph))
}

/// Writes `graph` as a CSV adjacency matrix of the same shape `import`
/// expects: row/column headers are node ids, missing edges are blank.
pub fn export(path: impl AsRef<Path>, graph: &Graph) -> Result<(), CsvError> {
    let mut node_ids: Vec<u64> = graph
        .nodes()
        .iter()
        .flat_map(|(&from, neighbors)| {
            std::iter::once(from.id()).chain(neighbors.keys().map(|n| n.id()))
        })
        .collect();
    node_ids.sort_unstable();
    node_ids.dedup();

    let mut writer = csv::WriterBuilder::new().from_path(path.as_ref())?;

    let mut header = vec![String::new()];
    header.extend(node_ids.iter().map(|id| id.to_string()));
    writer.write_record(&header)?;

    for &row_id in &node_ids {
        let from = Node::new(row_id, 0.0, 0.0);
        let mut row = vec![row_id.to_string()];
        for &col_id in &node_ids {
            let to = Node::new(col_id, 0.0, 0.0);
            let cell = graph
                .nodes()
                .get(&from)
                .and_then(|neighbors| neighbors.get(&to))
                .map(|d| d.to_string())
                .unwrap_or_default();
            row.push(cell);
        }
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|e| CsvError::Csv(e.into()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.csv");

        let mut graph = Graph::new();
        graph.add_edge_one_way(Node::new(1, 0.0, 0.0), Node::new(2, 0.0, 0.0), 10.0);
        graph.add_edge_one_way(Node::new(2, 0.0, 0.0), Node::new(3, 0.0, 0.0), 5.0);

        export(&path, &graph).unwrap();
        let map = import(&path).unwrap();

        assert!(map.buildings().is_empty());
        let n1 = Node::new(1, 0.0, 0.0);
        let n2 = Node::new(2, 0.0, 0.0);
        let n3 = Node::new(3, 0.0, 0.0);
        assert_eq!(map.graph().nodes()[&n1][&n2], 10.0);
        assert_eq!(map.graph().nodes()[&n2][&n3], 5.0);
    }

    #[test]
    fn negative_and_empty_cells_are_no_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.csv");
        std::fs::write(&path, ",2,3\n1,,-5\n2,3,0\n").unwrap();

        let map = import(&path).unwrap();
        let n1 = Node::new(1, 0.0, 0.0);
        let n2 = Node::new(2, 0.0, 0.0);
        let n3 = Node::new(3, 0.0, 0.0);

        assert!(map.graph().nodes().get(&n1).map_or(true, |n| n.is_empty()));
        assert_eq!(map.graph().nodes()[&n2][&n3], 0.0);
        assert!(!map.graph().nodes()[&n2].contains_key(&n2));
    }
}
