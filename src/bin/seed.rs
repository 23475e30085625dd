use catalog_favorites_api::{
    config,
    db::{create_orm_conn, run_migrations},
    entity::customers::{ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = config::database_url()?;

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let customers = [
        ("Jane Admin", "jane@example.com"),
        ("John Doe", "john@example.com"),
        ("Ana Souza", "ana@example.com"),
    ];

    for (name, email) in customers {
        let id = ensure_customer(&orm, name, email).await?;
        println!("Ensured customer {email} (id={id})");
    }

    println!("Seed completed");
    Ok(())
}

async fn ensure_customer(orm: &DatabaseConnection, name: &str, email: &str) -> anyhow::Result<i32> {
    let existing = Customers::find()
        .filter(CustomerCol::Email.eq(email))
        .filter(CustomerCol::DeletedAt.is_null())
        .one(orm)
        .await?;
    if let Some(customer) = existing {
        return Ok(customer.id);
    }

    let now = Utc::now();
    let customer = CustomerActive {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(orm)
    .await?;

    Ok(customer.id)
}
