/// Signature extraction: reduce a cluster's message blob to a short
/// frequency-ranked phrase for human scanning.
use rustc_hash::FxHashMap;

const SIGNATURE_TOKENS: usize = 6;

/// Build a signature from a blob of concatenated messages.
///
/// ':' and '.' are treated as separators, tokens are lowercased and split
/// on whitespace, then ranked by descending frequency. Ties keep the order
/// in which the tokenizer first saw each token, so the result is
/// deterministic for a fixed blob.
pub fn build_signature(blob: &str) -> String {
    let normalized: String = blob
        .to_lowercase()
        .chars()
        .map(|c| if c == ':' || c == '.' { ' ' } else { c })
        .collect();

    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut first_seen: Vec<&str> = Vec::new();

    for token in normalized.split_whitespace() {
        let entry = counts.entry(token).or_insert(0);
        if *entry == 0 {
            first_seen.push(token);
        }
        *entry += 1;
    }

    let mut ranked: Vec<(usize, &str)> = first_seen
        .iter()
        .enumerate()
        .map(|(order, &token)| (order, token))
        .collect();
    ranked.sort_by(|a, b| counts[b.1].cmp(&counts[a.1]).then(a.0.cmp(&b.0)));

    ranked
        .iter()
        .take(SIGNATURE_TOKENS)
        .map(|&(_, token)| token)
        .collect::<Vec<_>>()
        .join(" ")
}
