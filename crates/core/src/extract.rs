use std::cmp::Ordering;

use tracing::debug;
use url::Url;

use crate::dom_tree::DomTree;
use crate::scoring::{TextDensity, calculate_score, density_std, symbol_density, text_density};
use crate::{DensaError, Result};

/// Configuration for the density analyzer
#[derive(Debug, Clone, Default)]
pub struct DensityConfig {
    /// Emit a debug event with every node's score and statistics
    pub debug: bool,
    /// Multiply each score by `ln(std)` of all node densities
    pub weight_by_density_std: bool,
}

/// A scored node
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// Text statistics of the node
    pub density: TextDensity,
    /// Node ID in the [`DomTree`]
    pub node: usize,
    /// Symbol density, never 0
    pub symbol_density: f64,
    /// Descendant `<p>` count
    pub paragraph_tag_count: usize,
    /// Final score, always finite
    pub score: f64,
}

/// The result of content extraction
#[derive(Debug, Clone)]
pub struct ContentExtraction {
    /// The highest scoring node
    pub root: NodeInfo,
    /// Population standard deviation of the density of every visited node
    pub density_std: f64,
    /// Number of nodes that had text to score
    pub candidates: usize,
}

fn node_info(tree: &DomTree, id: usize) -> NodeInfo {
    let density = text_density(tree, id);
    let symbol_density = symbol_density(&density);
    let paragraph_tag_count = density.pi;
    NodeInfo { density, node: id, symbol_density, paragraph_tag_count, score: 0.0 }
}

/// Select the node most likely to hold the article body.
///
/// Every element from `body` down is scored; nodes without any text cannot
/// be selected. Ties keep document order: the first node with the maximal
/// score wins.
///
/// # Errors
///
/// Returns [`DensaError::NoCandidate`] if no node under `body` has text.
pub fn extract_content(tree: &DomTree, body: usize, config: &DensityConfig) -> Result<ContentExtraction> {
    let mut infos: Vec<NodeInfo> =
        std::iter::once(body).chain(tree.descendants(body)).map(|id| node_info(tree, id)).collect();

    // text nodes count toward the deviation but are never candidates
    let densities: Vec<f64> = infos.iter().map(|info| info.density.density).collect();
    let density_std = density_std(&densities);
    let std_weight = config.weight_by_density_std.then_some(density_std);

    infos.retain(|info| tree.is_element(info.node) && !info.density.combined_text.is_empty());
    for info in infos.iter_mut() {
        info.score = calculate_score(info.density.density, info.paragraph_tag_count, info.symbol_density, std_weight);
    }

    infos.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if config.debug {
        trace_scores(tree, &infos, density_std);
    }

    let candidates = infos.len();
    let root = infos.into_iter().next().ok_or(DensaError::NoCandidate)?;

    debug!(
        score = root.score,
        tag = tree.tag_name(root.node).unwrap_or_default(),
        candidates,
        density_std,
        "selected content root"
    );

    Ok(ContentExtraction { root, density_std, candidates })
}

fn trace_scores(tree: &DomTree, infos: &[NodeInfo], density_std: f64) {
    debug!(target: "densa::density", nodes = infos.len(), density_std, "density trace begin");
    for info in infos {
        debug!(
            target: "densa::density",
            score = info.score,
            density = info.density.density,
            ti = info.density.ti,
            lti = info.density.lti,
            tgi = info.density.tgi,
            ltgi = info.density.ltgi,
            sbdi = info.symbol_density,
            tags = info.paragraph_tag_count,
            tag = tree.tag_name(info.node).unwrap_or_default(),
            text = %info.density.combined_text,
            "scored node"
        );
    }
    debug!(target: "densa::density", "density trace end");
}

/// `src` of every `<img>` under `root`, in document order, duplicates kept.
///
/// With a base URL, relative sources are resolved against it. Blank sources
/// and sources that fail to resolve are kept as written.
pub fn collect_images(tree: &DomTree, root: usize, base_url: Option<&Url>) -> Vec<String> {
    tree.find_all(root, &["img"])
        .filter_map(|img| tree.attr(img, "src"))
        .map(|src| match base_url.filter(|_| !src.trim().is_empty()).and_then(|base| base.join(src).ok()) {
            Some(absolute) => absolute.to_string(),
            None => src.to_string(),
        })
        .collect()
}
