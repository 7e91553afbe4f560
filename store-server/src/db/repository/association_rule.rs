//! Association Rule Repository
//!
//! Read-only: rules are refreshed wholesale by the external mining job.
//! Antecedent/consequent references are stored as "product:id" strings
//! (the miner writes them that way), so seed matching compares strings.

use super::{BaseRepository, RepoResult};
use crate::db::models::{AssociationRule, RuleMatch};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct AssociationRuleRepository {
    base: BaseRepository,
}

impl AssociationRuleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All rules, strongest lift first (admin dashboard)
    pub async fn find_all(&self) -> RepoResult<Vec<AssociationRule>> {
        let rules: Vec<AssociationRule> = self
            .base
            .db()
            .query("SELECT * FROM association_rule ORDER BY lift DESC")
            .await?
            .take(0)?;
        Ok(rules)
    }

    /// Rules whose antecedent set intersects the seed set, ranked by
    /// lift DESC, confidence DESC, support DESC
    ///
    /// The caller applies the limit: on the embedded engine, LIMIT combined
    /// with WHERE + ORDER BY has dropped leading rows, so we truncate in
    /// Rust instead.
    pub async fn find_matching(&self, seeds: &[RecordId]) -> RepoResult<Vec<RuleMatch>> {
        let seed_strings: Vec<String> = seeds.iter().map(|s| s.to_string()).collect();
        let rules: Vec<RuleMatch> = self
            .base
            .db()
            .query(
                "SELECT lift, confidence, support, consequents FROM association_rule \
                 WHERE antecedents ANYINSIDE $seeds \
                 ORDER BY lift DESC, confidence DESC, support DESC",
            )
            .bind(("seeds", seed_strings))
            .await?
            .take(0)?;
        Ok(rules)
    }
}
