//! Per-node text and symbol density.
//!
//! For a node *i* the text density is
//!
//! ```text
//!          Ti - LTi
//! TDi = -----------
//!         TGi - LTGi
//! ```
//!
//! where `Ti` is the character count of the node's text, `LTi` the character
//! count of its link text, `TGi` its descendant tag count and `LTGi` its
//! descendant anchor count. The symbol density is
//!
//! ```text
//!          Ti - LTi
//! SbDi = -----------
//!          Sbi + 1
//! ```
//!
//! with `Sbi` the number of punctuation characters. The final score is
//! `TDi * log10(Pi + 2) * ln(SbDi)`, `Pi` being the number of `<p>` descendants.

use crate::dom_tree::DomTree;

/// Punctuation counted by [`count_punctuation`], CJK and Latin
pub const PUNCTUATION: &str = "！，。？、；：“”‘’《》%（）,.?:;'\"!%()";

/// Text statistics of one node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDensity {
    /// `|(Ti - LTi) / (TGi - LTGi)|`, 0 for degenerate nodes
    pub density: f64,
    /// Every descendant text node, whitespace-collapsed, joined with `\n`
    pub combined_text: String,
    /// Character count of `combined_text` with the link character count already subtracted
    pub ti: i64,
    /// Character count of link text
    pub lti: i64,
    /// Descendant element count, not counting `p`/`span` without text
    pub tgi: usize,
    /// Descendant `<a>` count
    pub ltgi: usize,
    /// Descendant `<p>` count
    pub pi: usize,
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_collapsed(parts: &mut Vec<String>, text: &str) {
    let text = collapse_whitespace(text);
    if !text.is_empty() {
        parts.push(text);
    }
}

/// Compute the [`TextDensity`] of node `id`.
///
/// Text and link text include the node itself (a text node contributes its
/// own text, an `<a>` its own link text); the tag counts cover descendants only.
pub fn text_density(tree: &DomTree, id: usize) -> TextDensity {
    let mut ti_parts = Vec::new();
    let mut lti_parts = Vec::new();
    let (mut tgi, mut ltgi, mut pi) = (0usize, 0usize, 0usize);

    if let Some(text) = tree.own_text(id) {
        push_collapsed(&mut ti_parts, text);
    }
    if tree.tag_name(id) == Some("a") {
        push_collapsed(&mut lti_parts, &tree.text(id));
    }

    for d in tree.descendants(id) {
        let Some(tag) = tree.tag_name(d) else {
            if let Some(text) = tree.own_text(d) {
                push_collapsed(&mut ti_parts, text);
            }
            continue;
        };

        match tag {
            "a" => {
                ltgi += 1;
                push_collapsed(&mut lti_parts, &tree.text(d));
            }
            "p" => pi += 1,
            _ => {}
        }

        if matches!(tag, "p" | "span") && tree.text(d).is_empty() {
            continue;
        }
        tgi += 1;
    }

    let combined_text = ti_parts.join("\n");
    let raw_ti = combined_text.chars().count() as i64;
    let lti = lti_parts.join("\n").chars().count() as i64;

    let mut result = TextDensity { density: 0.0, combined_text, ti: raw_ti - lti, lti, tgi, ltgi, pi };

    let mut effective_ltgi = ltgi;
    if tgi == ltgi {
        if !has_dense_paragraphs(raw_ti, pi) {
            return result;
        }
        effective_ltgi = 0;
    }

    let tags = tgi as i64 - effective_ltgi as i64;
    if tags == 0 {
        return result;
    }

    result.density = ((raw_ti - lti) as f64 / tags as f64).abs();
    result
}

/// More than ten characters per paragraph (integer ratio)
fn has_dense_paragraphs(ti: i64, pi: usize) -> bool {
    if pi == 0 {
        return false;
    }
    ti / pi as i64 > 10
}

/// Count the characters of `text` that appear in [`PUNCTUATION`].
pub fn count_punctuation(text: &str) -> usize {
    text.chars().filter(|c| PUNCTUATION.contains(*c)).count()
}

/// Symbol density of a node, never 0.
///
/// Uses the stored `ti` (link characters already netted out) minus `lti`.
pub fn symbol_density(density: &TextDensity) -> f64 {
    let symbols = count_punctuation(&density.combined_text);
    let sbdi = (density.ti - density.lti) as f64 / (symbols + 1) as f64;
    if sbdi == 0.0 { 1.0 } else { sbdi }
}

/// Population standard deviation, 0 for an empty slice
pub fn density_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Final node score; non-finite results are clamped to 0.
///
/// `std_weight`, when given, multiplies the score by `ln(std)`.
pub fn calculate_score(density: f64, paragraph_tag_count: usize, symbol_density: f64, std_weight: Option<f64>) -> f64 {
    let mut score = density * ((paragraph_tag_count + 2) as f64).log10() * symbol_density.ln();
    if let Some(std) = std_weight {
        score *= std.ln();
    }

    if score.is_finite() { score } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    fn density_of(html: &str, tag: &str) -> TextDensity {
        let tree = DomTree::from_document(&Document::parse(html).unwrap());
        let id = tree.find_all(tree.root(), &[tag]).next().unwrap();
        text_density(&tree, id)
    }

    #[test]
    fn test_text_density_paragraphs() {
        let d = density_of("<html><body><div><p>Hello, world.</p><p>Second   one.</p></div></body></html>", "div");

        assert_eq!(d.combined_text, "Hello, world.\nSecond one.");
        assert_eq!(d.ti, 25);
        assert_eq!(d.lti, 0);
        assert_eq!(d.tgi, 2);
        assert_eq!(d.ltgi, 0);
        assert_eq!(d.pi, 2);
        assert_eq!(d.density, 12.5);
    }

    #[test]
    fn test_link_text_is_netted_out_of_ti() {
        let d = density_of(
            r#"<html><body><div><p>Some prose here</p><a href="/x">link text</a></div></body></html>"#,
            "div",
        );
        assert_eq!(d.combined_text, "Some prose here\nlink text");
        assert_eq!(d.lti, 9);
        assert_eq!(d.ti, 25 - 9);
        assert_eq!(d.tgi, 2);
        assert_eq!(d.ltgi, 1);
        assert_eq!(d.density, 16.0);
    }

    #[test]
    fn test_empty_p_and_span_not_counted_as_tags() {
        let d = density_of("<html><body><div><p></p><span></span><p>Text.</p><em></em></div></body></html>", "div");
        assert_eq!(d.tgi, 2);
        assert_eq!(d.pi, 3);
    }

    #[test]
    fn test_link_only_block_is_degenerate() {
        let d = density_of(
            r#"<html><body><nav><a href="/">Home</a><a href="/about">About us</a></nav></body></html>"#,
            "nav",
        );
        assert_eq!(d.tgi, 2);
        assert_eq!(d.ltgi, 2);
        assert_eq!(d.density, 0.0);
    }

    #[test]
    fn test_equal_tags_with_sparse_paragraphs_is_zero() {
        let d = density_of(r##"<html><body><div>ab<a href="#">c</a><p></p></div></body></html>"##, "div");
        assert_eq!((d.tgi, d.ltgi, d.pi), (1, 1, 1));
        assert_eq!(d.density, 0.0);
    }

    #[test]
    fn test_equal_tags_with_dense_paragraphs_drops_link_tags() {
        let d = density_of(
            r##"<html><body><div>A long run of prose text<a href="#">link</a><p></p></div></body></html>"##,
            "div",
        );
        assert_eq!((d.tgi, d.ltgi, d.pi), (1, 1, 1));
        // raw chars 24 + 1 + 4 = 29, minus 4 link chars over one tag
        assert_eq!(d.density, 25.0);
    }

    #[test]
    fn test_text_node_and_anchor_self_text() {
        let tree = DomTree::from_document(&Document::parse(r#"<html><body><a href="/">  Go   home </a></body></html>"#).unwrap());
        let a = tree.find_all(tree.root(), &["a"]).next().unwrap();
        let d = text_density(&tree, a);
        assert_eq!(d.combined_text, "Go home");
        assert_eq!(d.lti, 7);
        assert_eq!(d.ti, 0);
        assert_eq!(d.density, 0.0);

        let text = tree.get_node(a).unwrap().child_ids[0];
        let d = text_density(&tree, text);
        assert_eq!(d.combined_text, "Go home");
        assert_eq!(d.tgi, 0);
    }

    #[test]
    fn test_count_punctuation() {
        assert_eq!(count_punctuation("Hello, world. (Yes!)"), 5);
        assert_eq!(count_punctuation("你好，世界。《书》"), 4);
        assert_eq!(count_punctuation("no punctuation here"), 0);
    }

    #[test]
    fn test_symbol_density() {
        let d = TextDensity { combined_text: "Hello, world.".to_string(), ti: 13, ..Default::default() };
        assert_eq!(symbol_density(&d), 13.0 / 3.0);
    }

    #[test]
    fn test_symbol_density_zero_is_coerced_to_one() {
        let d = TextDensity::default();
        assert_eq!(symbol_density(&d), 1.0);

        let d = TextDensity { combined_text: "link".to_string(), ti: 4, lti: 4, ..Default::default() };
        assert_eq!(symbol_density(&d), 1.0);
    }

    #[test]
    fn test_density_std() {
        assert_eq!(density_std(&[]), 0.0);
        assert_eq!(density_std(&[3.0, 3.0]), 0.0);
        assert_eq!(density_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
    }

    #[test]
    fn test_calculate_score() {
        let score = calculate_score(12.5, 2, 6.25, None);
        let expected = 12.5 * 4f64.log10() * 6.25f64.ln();
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_score_clamps_non_finite() {
        assert_eq!(calculate_score(10.0, 1, -3.0, None), 0.0);
        assert_eq!(calculate_score(f64::INFINITY, 1, 2.0, None), 0.0);
        assert_eq!(calculate_score(10.0, 1, 2.0, Some(0.0)), 0.0);
    }

    #[test]
    fn test_calculate_score_with_std_weight() {
        let plain = calculate_score(10.0, 1, 5.0, None);
        let weighted = calculate_score(10.0, 1, 5.0, Some(std::f64::consts::E));
        assert!((plain - weighted).abs() < 1e-9);
    }
}
