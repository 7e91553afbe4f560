//! Shared test fixtures: per-test embedded database plus catalog seeding

#![allow(dead_code)]

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tempfile::TempDir;

use store_server::CurrentUser;
use store_server::db::DbService;
use store_server::db::models::{CustomerInfo, Order, OrderCreate, OrderLineInput, Product, User};
use store_server::orders::OrderService;
use store_server::services::MailService;

pub struct TestCtx {
    pub db: Surreal<Db>,
    // Keeps the database directory alive for the duration of the test
    _tmp: TempDir,
}

/// Fresh embedded database with the schema applied
pub async fn setup() -> TestCtx {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("store.db")).await.unwrap();
    TestCtx {
        db: service.db,
        _tmp: tmp,
    }
}

pub fn order_service(db: &Surreal<Db>) -> OrderService {
    OrderService::new(db.clone(), MailService::disabled())
}

pub fn admin() -> CurrentUser {
    CurrentUser {
        user_id: "user:admin".into(),
        is_admin: true,
    }
}

pub fn shopper(key: &str) -> CurrentUser {
    CurrentUser {
        user_id: format!("user:{key}"),
        is_admin: false,
    }
}

pub async fn seed_category(db: &Surreal<Db>, key: &str, name: &str) -> RecordId {
    let id = RecordId::from_table_key("category", key);
    db.query("CREATE $id SET name = $name")
        .bind(("id", id.clone()))
        .bind(("name", name.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
    id
}

pub async fn seed_product(
    db: &Surreal<Db>,
    key: &str,
    code: &str,
    name: &str,
    price: f64,
    amount: i64,
    is_active: bool,
    category: &RecordId,
) -> RecordId {
    let product = Product {
        id: None,
        code: code.into(),
        name: name.into(),
        image: String::new(),
        unit: "pc".into(),
        price,
        amount,
        is_active,
        category: category.clone(),
        created_at: None,
        updated_at: None,
    };
    let created: Option<Product> = db
        .create(("product", key))
        .content(product)
        .await
        .unwrap();
    created.unwrap().id.unwrap()
}

pub async fn seed_user(db: &Surreal<Db>, key: &str, cart_entries: usize) -> RecordId {
    let user = User {
        id: None,
        name: key.into(),
        email: format!("{key}@example.com"),
        phone_number: Some("0912345678".into()),
        cart: (0..cart_entries)
            .map(|i| serde_json::json!({ "product": format!("product:p{i}"), "amount": 1 }))
            .collect(),
        created_at: None,
        updated_at: None,
    };
    let created: Option<User> = db.create(("user", key)).content(user).await.unwrap();
    created.unwrap().id.unwrap()
}

pub fn customer_info() -> CustomerInfo {
    CustomerInfo {
        name: "Alice".into(),
        phone: "0912345678".into(),
        email: "alice@example.com".into(),
        address: "12 Market St".into(),
    }
}

pub fn cart_line(product: &RecordId, amount: i64) -> OrderLineInput {
    OrderLineInput {
        product: product.to_string(),
        amount,
    }
}

pub async fn place_order(
    db: &Surreal<Db>,
    user: &CurrentUser,
    lines: Vec<OrderLineInput>,
) -> Order {
    order_service(db)
        .create(
            user,
            OrderCreate {
                products: lines,
                customer: customer_info(),
                note: None,
            },
        )
        .await
        .unwrap()
}

pub async fn product_amount(db: &Surreal<Db>, id: &RecordId) -> i64 {
    let product: Option<Product> = db.select(id.clone()).await.unwrap();
    product.unwrap().amount
}
