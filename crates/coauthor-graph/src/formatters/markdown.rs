//! Markdown run summaries.

use crate::identity::Identity;
use crate::models::GraphTables;

/// Rows listed in the "Strongest collaborations" section.
const TOP_EDGES: usize = 10;

/// Summarize a finished graph for the terminal.
#[must_use]
pub fn format_graph_summary(seed: &Identity, tables: &GraphTables) -> String {
    let mut output = format!(
        "# Collaboration Network: {}\n\n**Authors:** {} | **Coauthorships:** {}\n\n",
        seed.display_name(),
        tables.nodes.len(),
        tables.edges.len()
    );

    if let Some(node) = tables.nodes.first() {
        output.push_str(&format!(
            "**Papers:** {} | **First author:** {} | **Last author:** {} | **Citations:** {}\n\n",
            node.total_papers, node.first_authors, node.last_authors, node.citations
        ));
        if !node.major_keyword.is_empty() {
            output.push_str(&format!("**Field:** {}\n\n", node.major_keyword));
        }
    }

    if tables.edges.is_empty() {
        output.push_str("*No coauthorships between profiled authors.*\n");
        return output;
    }

    let mut edges: Vec<_> = tables.edges.iter().collect();
    edges.sort_by(|a, b| b.n_papers.cmp(&a.n_papers).then_with(|| a.id1.cmp(&b.id1)));

    output.push_str("## Strongest collaborations\n\n");
    for (i, edge) in edges.iter().take(TOP_EDGES).enumerate() {
        output.push_str(&format!(
            "{}. **{}** & **{}** - {} shared papers\n",
            i + 1,
            edge.author1,
            edge.author2,
            edge.n_papers
        ));
    }

    output
}
