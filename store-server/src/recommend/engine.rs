//! Suggestion pipeline
//!
//! Three stages, in order:
//! 1. rank the matching rules by lift DESC, confidence DESC, support DESC;
//! 2. walk their consequents in stored order, skipping seeds and inactive
//!    products, deduplicating globally by id, until `limit` is reached;
//! 3. pad the remainder with active products ranked by how many recorded
//!    co-purchases they appear in (ties broken by product code).
//!
//! Reordering any of these stages changes what shoppers see, so the walk
//! and the padding are pure functions pinned down by unit tests.

use std::collections::{HashMap, HashSet};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{AssociationRuleFull, ProductCard, RuleMatch};
use crate::db::repository::{
    AssociationRuleRepository, ProductRepository, TransactionRepository,
};
use crate::utils::AppResult;

/// How many products one suggestion request returns at most
pub const SUGGESTION_LIMIT: usize = 12;

#[derive(Clone)]
pub struct SuggestionEngine {
    rules: AssociationRuleRepository,
    products: ProductRepository,
    transactions: TransactionRepository,
}

impl SuggestionEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            rules: AssociationRuleRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            transactions: TransactionRepository::new(db),
        }
    }

    /// "Customers who bought the seeds also bought…"
    ///
    /// Empty seeds skip the rule lookup entirely and fall straight through
    /// to the popularity padding (cold start). The result length is
    /// `min(limit, active products excluding the seeds)`.
    pub async fn suggest(&self, seeds: &[RecordId], limit: usize) -> AppResult<Vec<ProductCard>> {
        let seed_set: HashSet<RecordId> = seeds.iter().cloned().collect();

        let mut picked: Vec<ProductCard> = Vec::new();
        if !seeds.is_empty() {
            let mut rules = self.rules.find_matching(seeds).await?;
            rules.truncate(limit);

            let consequent_ids: Vec<RecordId> = rules
                .iter()
                .flat_map(|r| r.consequents.iter().cloned())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            let cards = self.products.find_cards_by_ids(&consequent_ids).await?;
            let by_id: HashMap<RecordId, ProductCard> =
                cards.into_iter().map(|c| (c.id.clone(), c)).collect();

            picked = walk_rules(&rules, &by_id, &seed_set, limit);
        }

        if picked.len() < limit {
            let mut except: Vec<RecordId> = seeds.to_vec();
            except.extend(picked.iter().map(|c| c.id.clone()));

            let candidates = self.products.find_active_cards_excluding(&except).await?;
            let counts = self.transactions.purchase_counts().await?;
            picked.extend(pad_by_popularity(candidates, &counts, limit - picked.len()));
        }

        Ok(picked)
    }

    /// Rules with their product lists resolved, for the admin dashboard
    pub async fn list_rules(&self) -> AppResult<Vec<AssociationRuleFull>> {
        let rules = self.rules.find_all().await?;

        let ids: Vec<RecordId> = rules
            .iter()
            .flat_map(|r| r.antecedents.iter().chain(r.consequents.iter()).cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let cards = self.products.find_cards_by_ids(&ids).await?;
        let by_id: HashMap<RecordId, ProductCard> =
            cards.into_iter().map(|c| (c.id.clone(), c)).collect();

        let resolve = |ids: &[RecordId]| -> Vec<ProductCard> {
            ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
        };

        Ok(rules
            .into_iter()
            .map(|r| AssociationRuleFull {
                id: r.id.clone(),
                product_antecedents: resolve(&r.antecedents),
                product_consequents: resolve(&r.consequents),
                antecedent_support: r.antecedent_support,
                consequent_support: r.consequent_support,
                support: r.support,
                confidence: r.confidence,
                lift: r.lift,
            })
            .collect())
    }
}

/// Stage 2: walk rules in rank order, consequents in stored order
///
/// A product is appended when it is not a seed, still active, and not
/// already picked from an earlier (or the same) rule. Stops as soon as
/// `limit` products are collected.
fn walk_rules(
    rules: &[RuleMatch],
    cards: &HashMap<RecordId, ProductCard>,
    seeds: &HashSet<RecordId>,
    limit: usize,
) -> Vec<ProductCard> {
    let mut picked: Vec<ProductCard> = Vec::new();
    let mut seen: HashSet<RecordId> = HashSet::new();

    'rules: for rule in rules {
        for id in &rule.consequents {
            if seeds.contains(id) || seen.contains(id) {
                continue;
            }
            let Some(card) = cards.get(id) else {
                continue;
            };
            if !card.is_active {
                continue;
            }
            seen.insert(id.clone());
            picked.push(card.clone());
            if picked.len() == limit {
                break 'rules;
            }
        }
    }

    picked
}

/// Stage 3: global-popularity fallback
///
/// Candidates already exclude seeds and picked ids; rank them by recorded
/// co-purchase count descending, ties by product code, and take `n`.
fn pad_by_popularity(
    mut candidates: Vec<ProductCard>,
    counts: &HashMap<RecordId, i64>,
    n: usize,
) -> Vec<ProductCard> {
    candidates.sort_by(|a, b| {
        let ca = counts.get(&a.id).copied().unwrap_or(0);
        let cb = counts.get(&b.id).copied().unwrap_or(0);
        cb.cmp(&ca).then_with(|| a.code.cmp(&b.code))
    });
    candidates.truncate(n);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(key: &str) -> RecordId {
        RecordId::from_table_key("product", key)
    }

    fn card(key: &str, code: &str) -> ProductCard {
        ProductCard {
            id: pid(key),
            code: code.into(),
            name: key.to_uppercase(),
            image: String::new(),
            unit: "pc".into(),
            price: 1000.0,
            amount: 10,
            is_active: true,
            category: RecordId::from_table_key("category", "misc"),
            category_name: Some("Misc".into()),
        }
    }

    fn rule(lift: f64, confidence: f64, support: f64, consequents: &[&str]) -> RuleMatch {
        RuleMatch {
            lift,
            confidence,
            support,
            consequents: consequents.iter().map(|k| pid(k)).collect(),
        }
    }

    fn card_map(keys: &[(&str, &str)]) -> HashMap<RecordId, ProductCard> {
        keys.iter()
            .map(|(key, code)| (pid(key), card(key, code)))
            .collect()
    }

    #[test]
    fn walk_is_deterministic_and_dedups_across_rules() {
        // R1{lift 2.0, [A, B]} outranks R2{lift 1.5, [B, C]}; B appears in
        // both but must only be emitted once, at its first position.
        let rules = vec![rule(2.0, 0.5, 0.1, &["a", "b"]), rule(1.5, 0.5, 0.1, &["b", "c"])];
        let cards = card_map(&[("a", "P.A"), ("b", "P.B"), ("c", "P.C")]);
        let seeds: HashSet<RecordId> = [pid("x")].into();

        let picked = walk_rules(&rules, &cards, &seeds, 3);
        let keys: Vec<String> = picked.iter().map(|c| c.id.key().to_string()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn walk_excludes_seeds() {
        let rules = vec![rule(2.0, 0.5, 0.1, &["x", "a"])];
        let cards = card_map(&[("x", "P.X"), ("a", "P.A")]);
        let seeds: HashSet<RecordId> = [pid("x")].into();

        let picked = walk_rules(&rules, &cards, &seeds, 5);
        let keys: Vec<String> = picked.iter().map(|c| c.id.key().to_string()).collect();
        assert_eq!(keys, vec!["a"]);
    }

    #[test]
    fn walk_skips_inactive_consequents() {
        let rules = vec![rule(2.0, 0.5, 0.1, &["a", "b"])];
        let mut cards = card_map(&[("a", "P.A"), ("b", "P.B")]);
        cards.get_mut(&pid("a")).unwrap().is_active = false;

        let picked = walk_rules(&rules, &cards, &HashSet::new(), 5);
        let keys: Vec<String> = picked.iter().map(|c| c.id.key().to_string()).collect();
        assert_eq!(keys, vec!["b"]);
    }

    #[test]
    fn walk_stops_at_limit() {
        let rules = vec![rule(2.0, 0.5, 0.1, &["a", "b", "c", "d"])];
        let cards = card_map(&[("a", "P.A"), ("b", "P.B"), ("c", "P.C"), ("d", "P.D")]);

        let picked = walk_rules(&rules, &cards, &HashSet::new(), 2);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn padding_ranks_by_count_then_code() {
        let candidates = vec![card("a", "P.C"), card("b", "P.A"), card("c", "P.B")];
        let counts: HashMap<RecordId, i64> = [(pid("c"), 5), (pid("a"), 5), (pid("b"), 1)].into();

        let padded = pad_by_popularity(candidates, &counts, 3);
        let keys: Vec<String> = padded.iter().map(|c| c.id.key().to_string()).collect();
        // a and c tie on count 5 → code P.B (c) before P.C (a); b trails
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn padding_takes_exactly_n() {
        let candidates = vec![card("a", "P.A"), card("b", "P.B"), card("c", "P.C")];
        let padded = pad_by_popularity(candidates, &HashMap::new(), 2);
        assert_eq!(padded.len(), 2);
    }
}
