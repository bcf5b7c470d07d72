//! SeaORM implementation of ProductRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};

use crate::domain::{
    DomainError, NewProduct, PageRequest, Paginated, Product, ProductChanges, ProductDetail,
    ProductFilter, ProductRepository, ProductSort, ProductSummary, Sku, Variant, VariantGroup,
};
use crate::models::category::{self, Entity as CategoryEntity};
use crate::models::product::{self, ActiveModel, Column, Entity as ProductEntity, STATUS_ACTIVE};
use crate::models::shop::{self, Entity as ShopEntity};
use crate::models::sku::{self, Entity as SkuEntity};
use crate::models::sku_variant::{self, Entity as SkuVariantEntity};
use crate::models::variant::{self, Entity as VariantEntity};
use crate::models::variant_group::{self, Entity as VariantGroupEntity};

/// SeaORM-based implementation of ProductRepository
pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// One row of the grouped product listing query
#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: i32,
    shop_id: i32,
    category_id: i32,
    name: String,
    slug: String,
    created_at: String,
    min_price: Option<f64>,
    max_price: Option<f64>,
    total_stock: Option<i64>,
}

fn sku_min_price() -> SimpleExpr {
    Expr::col((SkuEntity, sku::Column::Price)).min()
}

fn sku_max_price() -> SimpleExpr {
    Expr::col((SkuEntity, sku::Column::Price)).max()
}

/// Make `%`, `_` and the escape char itself match literally in a LIKE pattern
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Variant names per SKU id, ordered by their group position
async fn sku_variant_names<C: ConnectionTrait>(
    conn: &C,
    sku_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    if sku_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = SkuVariantEntity::find()
        .filter(sku_variant::Column::SkuId.is_in(sku_ids))
        .all(conn)
        .await?;
    let variant_ids: Vec<i32> = links.iter().map(|l| l.variant_id).collect();
    if variant_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let variants_with_groups = VariantEntity::find()
        .filter(variant::Column::Id.is_in(variant_ids))
        .find_also_related(VariantGroupEntity)
        .all(conn)
        .await?;
    let variants: HashMap<i32, (i32, String)> = variants_with_groups
        .into_iter()
        .map(|(v, group)| {
            let position = group.map(|g| g.position).unwrap_or(i32::MAX);
            (v.id, (position, v.name))
        })
        .collect();

    let mut by_sku: HashMap<i32, Vec<(i32, String)>> = HashMap::new();
    for link in links {
        if let Some((position, name)) = variants.get(&link.variant_id) {
            by_sku
                .entry(link.sku_id)
                .or_default()
                .push((*position, name.clone()));
        }
    }

    Ok(by_sku
        .into_iter()
        .map(|(sku_id, mut names)| {
            names.sort_by_key(|(position, _)| *position);
            (sku_id, names.into_iter().map(|(_, name)| name).collect())
        })
        .collect())
}

fn to_sku(model: sku::Model, variants: Vec<String>) -> Sku {
    Sku {
        id: model.id,
        product_id: model.product_id,
        code: model.code,
        price: model.price,
        stock: model.stock,
        image_url: model.image_url,
        variants,
    }
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    model: product::Model,
) -> Result<ProductDetail, DbErr> {
    let skus = SkuEntity::find()
        .filter(sku::Column::ProductId.eq(model.id))
        .filter(sku::Column::DeletedAt.is_null())
        .order_by_asc(sku::Column::Id)
        .all(conn)
        .await?;
    let mut names = sku_variant_names(conn, skus.iter().map(|s| s.id).collect()).await?;
    let skus = skus
        .into_iter()
        .map(|s| {
            let variants = names.remove(&s.id).unwrap_or_default();
            to_sku(s, variants)
        })
        .collect();

    let groups = VariantGroupEntity::find()
        .filter(variant_group::Column::ProductId.eq(model.id))
        .order_by_asc(variant_group::Column::Position)
        .all(conn)
        .await?;
    let group_ids: Vec<i32> = groups.iter().map(|g| g.id).collect();
    let mut variants_by_group: HashMap<i32, Vec<Variant>> = HashMap::new();
    if !group_ids.is_empty() {
        let variants = VariantEntity::find()
            .filter(variant::Column::VariantGroupId.is_in(group_ids))
            .order_by_asc(variant::Column::Position)
            .all(conn)
            .await?;
        for v in variants {
            variants_by_group
                .entry(v.variant_group_id)
                .or_default()
                .push(Variant {
                    id: v.id,
                    name: v.name,
                });
        }
    }
    let variant_groups = groups
        .into_iter()
        .map(|g| VariantGroup {
            variants: variants_by_group.remove(&g.id).unwrap_or_default(),
            id: g.id,
            name: g.name,
        })
        .collect();

    Ok(ProductDetail {
        product: Product::from(model),
        skus,
        variant_groups,
    })
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_page(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Paginated<ProductSummary>, DomainError> {
        let mut query = ProductEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::ShopId)
            .column(Column::CategoryId)
            .column(Column::Name)
            .column(Column::Slug)
            .column(Column::CreatedAt)
            .column_as(sku_min_price(), "min_price")
            .column_as(sku_max_price(), "max_price")
            .column_as(Expr::col((SkuEntity, sku::Column::Stock)).sum(), "total_stock")
            .join(JoinType::LeftJoin, product::Relation::Skus.def())
            .filter(Column::DeletedAt.is_null())
            .filter(sku::Column::DeletedAt.is_null())
            .filter(Column::Status.eq(STATUS_ACTIVE))
            .group_by(Column::Id);

        if let Some(category_ids) = filter.category_ids {
            query = query.filter(Column::CategoryId.is_in(category_ids));
        }
        if let Some(shop_id) = filter.shop_id {
            query = query.filter(Column::ShopId.eq(shop_id));
        }
        if let Some(q) = filter.query.as_deref().map(str::trim) {
            if !q.is_empty() {
                let pattern = format!("%{}%", escape_like(q));
                query = query.filter(
                    Expr::col((ProductEntity, Column::Name))
                        .like(LikeExpr::new(pattern).escape('\\')),
                );
            }
        }
        if let Some(min_price) = filter.min_price {
            query = query.having(Expr::expr(sku_min_price()).gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.having(Expr::expr(sku_min_price()).lte(max_price));
        }

        query = match filter.sort {
            ProductSort::Newest => query
                .order_by_desc(Column::CreatedAt)
                .order_by_desc(Column::Id),
            ProductSort::PriceAsc => query
                .order_by(sku_min_price(), Order::Asc)
                .order_by_asc(Column::Id),
            ProductSort::PriceDesc => query
                .order_by(sku_min_price(), Order::Desc)
                .order_by_asc(Column::Id),
            ProductSort::Name => query.order_by_asc(Column::Name).order_by_asc(Column::Id),
        };

        let paginator = query
            .into_model::<ProductRow>()
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.page() - 1).await?;

        let shop_ids: Vec<i32> = rows.iter().map(|r| r.shop_id).collect();
        let category_ids: Vec<i32> = rows.iter().map(|r| r.category_id).collect();
        let shop_names: HashMap<i32, String> = if shop_ids.is_empty() {
            HashMap::new()
        } else {
            ShopEntity::find()
                .filter(shop::Column::Id.is_in(shop_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect()
        };
        let category_names: HashMap<i32, String> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        let items = rows
            .into_iter()
            .map(|row| ProductSummary {
                shop_name: shop_names.get(&row.shop_id).cloned(),
                category_name: category_names.get(&row.category_id).cloned(),
                id: row.id,
                shop_id: row.shop_id,
                category_id: row.category_id,
                name: row.name,
                slug: row.slug,
                min_price: row.min_price,
                max_price: row.max_price,
                total_stock: row.total_stock.unwrap_or(0),
                created_at: row.created_at,
            })
            .collect();

        Ok(Paginated::new(items, total, &page))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let product = ProductEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(product.map(Product::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, DomainError> {
        let product = ProductEntity::find()
            .filter(Column::Slug.eq(slug))
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(product.map(Product::from))
    }

    async fn find_detail(&self, id: i32) -> Result<Option<ProductDetail>, DomainError> {
        let product = ProductEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        match product {
            Some(model) => Ok(Some(load_detail(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        let count = ProductEntity::find()
            .filter(Column::Slug.eq(slug))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, input: NewProduct) -> Result<ProductDetail, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            shop_id: Set(input.shop_id),
            category_id: Set(input.category_id),
            name: Set(input.name),
            slug: Set(input.slug),
            description: Set(input.description),
            status: Set(input.status),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut variant_ids: HashMap<String, i32> = HashMap::new();
        for (group_position, group) in input.variant_groups.into_iter().enumerate() {
            let saved_group = variant_group::ActiveModel {
                product_id: Set(model.id),
                name: Set(group.name),
                position: Set(group_position as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            for (position, name) in group.variants.into_iter().enumerate() {
                let saved_variant = variant::ActiveModel {
                    variant_group_id: Set(saved_group.id),
                    name: Set(name),
                    position: Set(position as i32),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                variant_ids.insert(saved_variant.name.trim().to_lowercase(), saved_variant.id);
            }
        }

        for new_sku in input.skus {
            let saved_sku = sku::ActiveModel {
                product_id: Set(model.id),
                code: Set(new_sku.code),
                price: Set(new_sku.price),
                stock: Set(new_sku.stock),
                image_url: Set(new_sku.image_url),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            for name in new_sku.variants {
                let variant_id = variant_ids.get(&name.trim().to_lowercase()).copied().ok_or_else(|| {
                    DomainError::validation(format!("unknown variant '{}' on sku", name))
                })?;
                sku_variant::ActiveModel {
                    sku_id: Set(saved_sku.id),
                    variant_id: Set(variant_id),
                }
                .insert(&txn)
                .await?;
            }
        }

        let detail = load_detail(&txn, model).await?;
        txn.commit().await?;

        tracing::info!(
            "Created product {} ({} skus) in shop {}",
            detail.product.id,
            detail.skus.len(),
            detail.product.shop_id
        );
        Ok(detail)
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError> {
        let existing = ProductEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Product::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let existing = ProductEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        // SKUs go with their product
        SkuEntity::update_many()
            .col_expr(sku::Column::DeletedAt, Expr::value(now.clone()))
            .col_expr(sku::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(sku::Column::ProductId.eq(id))
            .filter(sku::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;

        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn find_sku(&self, id: i32) -> Result<Option<Sku>, DomainError> {
        let Some(model) = SkuEntity::find_by_id(id)
            .filter(sku::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let mut names = sku_variant_names(&self.db, vec![model.id]).await?;
        let variants = names.remove(&model.id).unwrap_or_default();
        Ok(Some(to_sku(model, variants)))
    }

    async fn update_sku(
        &self,
        id: i32,
        price: Option<f64>,
        stock: Option<i32>,
    ) -> Result<Sku, DomainError> {
        let existing = SkuEntity::find_by_id(id)
            .filter(sku::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: sku::ActiveModel = existing.into();
        if let Some(price) = price {
            active.price = Set(price);
        }
        if let Some(stock) = stock {
            active.stock = Set(stock);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.db).await?;

        let mut names = sku_variant_names(&self.db, vec![model.id]).await?;
        let variants = names.remove(&model.id).unwrap_or_default();
        Ok(to_sku(model, variants))
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("kemeja"), "kemeja");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
    }
}
