//! Weighted production rules and the rule-text parser.

use rand::Rng;

use super::symbol;

/// One stochastic production: `lhs -> replacements[i]` with probability
/// `weights[i] / 100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: char,
    pub replacements: Vec<String>,
    /// Percentages, parallel to `replacements`.
    pub weights: Vec<u32>,
}

/// Result of rewriting one symbol.
///
/// Everything from the first branch-close symbol of the chosen replacement
/// onward is held back in `deferred` instead of being emitted in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Production {
    pub emit: String,
    pub deferred: String,
}

impl Rule {
    /// Picks a replacement by drawing in `[1, 100]` against the cumulative
    /// weights. Falls back to the left-hand symbol itself if no branch
    /// reaches the draw.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Production {
        let draw: u32 = rng.gen_range(1..=100);
        let mut cumulative = 0u32;
        for (replacement, &weight) in self.replacements.iter().zip(&self.weights) {
            cumulative = cumulative.saturating_add(weight);
            if draw <= cumulative {
                return split_at_branch_close(replacement);
            }
        }
        Production {
            emit: self.lhs.to_string(),
            deferred: String::new(),
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.weights.iter().sum()
    }
}

fn split_at_branch_close(replacement: &str) -> Production {
    match replacement.find(symbol::BRANCH_CLOSE) {
        Some(at) => Production {
            emit: replacement[..at].to_string(),
            deferred: replacement[at..].to_string(),
        },
        None => Production {
            emit: replacement.to_string(),
            deferred: String::new(),
        },
    }
}

/// Rules parsed from `LHS{RHS:weight,...}LHS2{...}` text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parses rule text. Never fails: segments without `{` or with an empty
    /// left-hand side are skipped, and weights that do not parse count as 0.
    pub fn parse(text: &str) -> Self {
        let mut rules = Vec::new();
        let mut skipped = 0usize;

        for segment in text.split('}').filter(|s| !s.trim().is_empty()) {
            let Some((lhs, body)) = segment.split_once('{') else {
                skipped += 1;
                continue;
            };
            let Some(lhs) = lhs.trim_start().chars().next() else {
                skipped += 1;
                continue;
            };

            let mut rule = Rule {
                lhs,
                replacements: Vec::new(),
                weights: Vec::new(),
            };
            for branch in body.split(',').filter(|b| !b.is_empty()) {
                let (replacement, weight) = match branch.split_once(':') {
                    Some((replacement, weight)) => {
                        (replacement, weight.trim().parse::<u32>().unwrap_or(0))
                    }
                    None => (branch, 0),
                };
                rule.replacements.push(replacement.to_string());
                rule.weights.push(weight);
            }
            rules.push(rule);
        }

        log::debug!("parsed {} rules ({} malformed segments skipped)", rules.len(), skipped);
        Self { rules }
    }

    /// First rule whose left-hand side is `sym`.
    pub fn rule_for(&self, sym: char) -> Option<&Rule> {
        self.rules.iter().find(|r| r.lhs == sym)
    }

    /// Rewrites `sym`, or returns `None` if no rule applies.
    pub fn rewrite<R: Rng + ?Sized>(&self, sym: char, rng: &mut R) -> Option<Production> {
        self.rule_for(sym).map(|rule| rule.choose(rng))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_parse_single_rule() {
        let rules = RuleSet::parse("F{[F]F:25,-F:25,+F:25,FF:25}");
        assert_eq!(rules.len(), 1);
        let rule = rules.rule_for('F').unwrap();
        assert_eq!(rule.replacements, vec!["[F]F", "-F", "+F", "FF"]);
        assert_eq!(rule.weights, vec![25, 25, 25, 25]);
        assert_eq!(rule.total_weight(), 100);
    }

    #[test]
    fn test_parse_multiple_rules() {
        let rules = RuleSet::parse("F{FF:50,F+F:50}L{FL:100}\n E{E:100}");
        assert_eq!(rules.len(), 3);
        assert!(rules.rule_for('L').is_some());
        assert!(rules.rule_for('E').is_some());
        assert!(rules.rule_for('X').is_none());
    }

    #[test]
    fn test_parse_malformed_segments() {
        let rules = RuleSet::parse("garbage}{FF:10}F{F+:abc,-F}");
        assert_eq!(rules.len(), 1);
        let rule = rules.rule_for('F').unwrap();
        assert_eq!(rule.weights, vec![0, 0]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(RuleSet::parse("").is_empty());
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = RuleSet::parse("F{A:100}F{B:100}");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(rules.rewrite('F', &mut rng).unwrap().emit, "A");
    }

    #[test]
    fn test_identity_fallback_under_weight() {
        let rules = RuleSet::parse("F{FF:0}");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let p = rules.rewrite('F', &mut rng).unwrap();
            assert_eq!(p.emit, "F");
            assert!(p.deferred.is_empty());
        }
    }

    #[test]
    fn test_branch_close_is_deferred() {
        let rules = RuleSet::parse("F{[+F]F:100}");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let p = rules.rewrite('F', &mut rng).unwrap();
        assert_eq!(p.emit, "[+F");
        assert_eq!(p.deferred, "]F");
    }

    #[test]
    fn test_weighted_selection_frequency() {
        let rules = RuleSet::parse("F{A:20,B:30,C:50}");
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let n = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            match rules.rewrite('F', &mut rng).unwrap().emit.as_str() {
                "A" => counts[0] += 1,
                "B" => counts[1] += 1,
                "C" => counts[2] += 1,
                other => panic!("unexpected production {}", other),
            }
        }
        for (count, expected) in counts.iter().zip([0.2, 0.3, 0.5]) {
            let freq = *count as f64 / n as f64;
            assert!((freq - expected).abs() < 0.02, "freq {} vs {}", freq, expected);
        }
    }
}
