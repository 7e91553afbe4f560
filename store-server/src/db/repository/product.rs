//! Product Repository
//!
//! Read-side queries only. All writes to `product.amount` live in the
//! inventory ledger so the two write paths cannot diverge.

use super::{BaseRepository, RepoResult};
use crate::db::models::{Product, ProductCard};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(id.clone()).await?;
        Ok(product)
    }

    /// Resolve card projections (with category name) for a set of ids
    ///
    /// Missing ids are silently absent from the result; callers detect and
    /// report them per line.
    pub async fn find_cards_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<ProductCard>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cards: Vec<ProductCard> = self
            .base
            .db()
            .query(
                "SELECT id, code, name, image, unit, price, amount, is_active, category, \
                 (<record> category).name AS category_name \
                 FROM product WHERE id INSIDE $ids",
            )
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(cards)
    }

    /// Active products excluding the given ids, ordered by code
    ///
    /// Popularity ordering happens in the caller: the transaction counts
    /// come from a different table.
    pub async fn find_active_cards_excluding(
        &self,
        except: &[RecordId],
    ) -> RepoResult<Vec<ProductCard>> {
        let cards: Vec<ProductCard> = self
            .base
            .db()
            .query(
                "SELECT id, code, name, image, unit, price, amount, is_active, category, \
                 (<record> category).name AS category_name \
                 FROM product WHERE is_active = true AND id NOTINSIDE $except ORDER BY code",
            )
            .bind(("except", except.to_vec()))
            .await?
            .take(0)?;
        Ok(cards)
    }
}
