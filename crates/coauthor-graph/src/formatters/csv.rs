//! CSV rendering of node and edge tables.

use crate::models::{EdgeRow, NodeRow};

/// Node table header.
pub const NODE_HEADER: &str =
    "Author,Total papers,First authors,Last authors,Citations,Max keyword,Major keyword,id";

/// Edge table header.
pub const EDGE_HEADER: &str = "Author1,Author2,nPapers,nCitations,id1,id2";

/// Format the node table as CSV.
#[must_use]
pub fn format_nodes_csv(nodes: &[NodeRow]) -> String {
    let mut output = format!("{NODE_HEADER}\n");

    for node in nodes {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            csv_escape(&node.author),
            node.total_papers,
            node.first_authors,
            node.last_authors,
            node.citations,
            csv_escape(&node.max_keyword),
            csv_escape(&node.major_keyword),
            node.id
        ));
    }

    output
}

/// Format the edge table as CSV.
#[must_use]
pub fn format_edges_csv(edges: &[EdgeRow]) -> String {
    let mut output = format!("{EDGE_HEADER}\n");

    for edge in edges {
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_escape(&edge.author1),
            csv_escape(&edge.author2),
            edge.n_papers,
            edge.n_citations,
            edge.id1,
            edge.id2
        ));
    }

    output
}

/// Escape a string for CSV output.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        // Prefix with single quote to prevent formula injection in spreadsheets
        let escaped = s.replace('"', "\"\"");
        if starts_with_formula(&escaped) {
            format!("\"'{}\"", escaped)
        } else {
            format!("\"{}\"", escaped)
        }
    } else if starts_with_formula(s) {
        format!("'{}", s)
    } else {
        s.to_string()
    }
}

fn starts_with_formula(s: &str) -> bool {
    s.starts_with(['=', '+', '-', '@'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_escape("-x,y"), "\"'-x,y\"");
    }

    #[test]
    fn test_format_nodes_csv() {
        let nodes = vec![NodeRow {
            author: "Seth Rhoades".to_string(),
            total_papers: 3,
            first_authors: 2,
            last_authors: 1,
            citations: 10,
            max_keyword: "metabolomics, lcms".to_string(),
            major_keyword: "omics".to_string(),
            id: 0,
        }];

        let csv = format_nodes_csv(&nodes);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], NODE_HEADER);
        assert_eq!(lines[1], "Seth Rhoades,3,2,1,10,\"metabolomics, lcms\",omics,0");
    }

    #[test]
    fn test_format_edges_csv_empty() {
        assert_eq!(format_edges_csv(&[]), format!("{EDGE_HEADER}\n"));
    }
}
