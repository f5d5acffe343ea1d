/*!
 * Fuzzy title search over the cached index.
 *
 * Users rarely type a title exactly the way the source site lists it.
 * Matching runs on a normalized form (lowercased, leading article and
 * punctuation dropped) and combines Levenshtein similarity with a
 * substring bonus, so "godfather" finds "The Godfather" without ranking
 * every title containing a 'g' next to it.
 */

/// Fuzzy matcher for screenplay titles
#[derive(Debug, Clone)]
pub struct TitleMatcher {
    /// Minimum score for a match to count (0.0-1.0, higher = stricter)
    threshold: f32,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self { threshold: 0.6 }
    }
}

impl TitleMatcher {
    /// Create a matcher with a custom threshold
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score a title against a query (0.0-1.0)
    ///
    /// Exact normalized equality scores 1.0. A query contained in the
    /// title scores at least 0.75, growing with coverage. Everything else
    /// falls back to normalized Levenshtein similarity.
    pub fn score(&self, query: &str, title: &str) -> f32 {
        let q = normalize_title(query);
        let t = normalize_title(title);
        if q.is_empty() || t.is_empty() {
            return 0.0;
        }
        if q == t {
            return 1.0;
        }

        let base = similarity(&q, &t);
        if t.contains(&q) {
            let coverage = q.chars().count() as f32 / t.chars().count() as f32;
            base.max(0.75 + 0.2 * coverage)
        } else {
            base
        }
    }

    /// Score every title and rank them, best first. Ties resolve by
    /// title so the order is stable across runs.
    pub fn rank<'a>(&self, query: &str, titles: &'a [String]) -> Vec<(&'a str, f32)> {
        let mut scored: Vec<(&'a str, f32)> = titles
            .iter()
            .map(|title| (title.as_str(), self.score(query, title)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        scored
    }

    /// The best title at or above the threshold, if any
    pub fn best_match<'a>(&self, query: &str, titles: &'a [String]) -> Option<(&'a str, f32)> {
        self.rank(query, titles)
            .into_iter()
            .next()
            .filter(|(_, score)| *score >= self.threshold)
    }

    /// All titles at or above the threshold, best first
    pub fn matches<'a>(&self, query: &str, titles: &'a [String]) -> Vec<(&'a str, f32)> {
        self.rank(query, titles)
            .into_iter()
            .filter(|(_, score)| *score >= self.threshold)
            .collect()
    }
}

/// Normalize a title for comparison: lowercase, leading article removed,
/// punctuation dropped, whitespace collapsed.
fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            cleaned.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == ':' {
            cleaned.push(' ');
        }
    }
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => collapsed,
    }
}

/// Normalized Levenshtein similarity (0.0-1.0)
fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let distance = levenshtein_distance(a, b);
    let max_len = a.chars().count().max(b.chars().count());
    1.0 - (distance as f32 / max_len as f32)
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Two-row optimization for space efficiency
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr_row[0] = i;

        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
